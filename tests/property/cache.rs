//! Property tests for the response cache.
//!
//! Invariants tested:
//! - Occupancy never exceeds the configured capacity
//! - A fresh put is always readable back
//! - Every lookup lands in exactly one of hits or misses

use proptest::prelude::*;
use std::time::Duration;

use headroom_cache::{Cache, CacheConfig};

fn cache(max_entries: usize) -> Cache<u32> {
    Cache::new(
        CacheConfig::builder()
            .name("prop")
            .max_entries(max_entries)
            .default_ttl(Duration::from_secs(300))
            .build(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: the LRU bound holds at every step, not just at the end.
    #[test]
    fn occupancy_never_exceeds_capacity(
        capacity in 1usize..=32,
        keys in prop::collection::vec(0u16..64, 1..=128),
    ) {
        let cache = cache(capacity);
        for (i, key) in keys.iter().enumerate() {
            cache.put(format!("k{key}"), i as u32);
            prop_assert!(
                cache.len() <= capacity,
                "len {} exceeded capacity {}",
                cache.len(),
                capacity
            );
        }
        prop_assert!(cache.stats().size <= capacity);
    }

    /// Property: what goes in comes back out while the TTL holds.
    #[test]
    fn fresh_put_reads_back(
        key in "[a-z]{1,12}",
        value in any::<u32>(),
    ) {
        let cache = cache(16);
        cache.put(key.clone(), value);
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    /// Property: hit and miss counters account for every lookup.
    #[test]
    fn every_lookup_is_a_hit_or_a_miss(
        puts in prop::collection::vec(0u8..16, 0..=32),
        gets in prop::collection::vec(0u8..16, 1..=64),
    ) {
        let cache = cache(64);
        for (i, key) in puts.iter().enumerate() {
            cache.put(format!("k{key}"), i as u32);
        }
        for key in &gets {
            cache.get(&format!("k{key}"));
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, gets.len() as u64);
    }
}
