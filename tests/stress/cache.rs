//! Cache stress tests.

use std::time::{Duration, Instant};

use headroom_cache::{Cache, CacheConfig};

/// Test: 500k puts through a 10k-entry cache stay bounded.
#[test]
#[ignore]
fn stress_half_a_million_puts_stay_bounded() {
    let cache: Cache<u64> = Cache::new(
        CacheConfig::builder()
            .name("stress")
            .max_entries(10_000)
            .default_ttl(Duration::from_secs(600))
            .build(),
    );

    let start = Instant::now();
    for i in 0u64..500_000 {
        cache.put(format!("key-{i}"), i);
    }
    let elapsed = start.elapsed();

    let stats = cache.stats();
    println!("500k puts completed in {elapsed:?}");
    println!(
        "Throughput: {:.0} puts/sec",
        500_000.0 / elapsed.as_secs_f64()
    );
    println!("Final size: {}, evictions: {}", stats.size, stats.evictions);

    assert_eq!(stats.size, 10_000);
    assert_eq!(stats.evictions, 490_000);
}

/// Test: 8 threads hammering one cache keep counters consistent.
#[test]
#[ignore]
fn stress_concurrent_readers_and_writers() {
    let cache: Cache<u64> = Cache::new(
        CacheConfig::builder()
            .name("stress")
            .max_entries(1_000)
            .build(),
    );

    let start = Instant::now();
    let handles: Vec<_> = (0..8u64)
        .map(|thread| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..50_000u64 {
                    let key = format!("key-{}", (thread * 50_000 + i) % 2_000);
                    if i % 3 == 0 {
                        cache.put(key, i);
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let elapsed = start.elapsed();

    let stats = cache.stats();
    println!("400k mixed ops across 8 threads in {elapsed:?}");
    println!(
        "hits: {}, misses: {}, size: {}",
        stats.hits, stats.misses, stats.size
    );

    // 16,667 of every thread's 50k ops were puts, the rest lookups.
    let lookups: u64 = 8 * (50_000 - 16_667);
    assert_eq!(stats.hits + stats.misses, lookups);
    assert!(stats.size <= 1_000);
}

/// Test: invalidating a large prefix leaves the rest intact.
#[test]
#[ignore]
fn stress_prefix_invalidation_at_scale() {
    let cache: Cache<u64> = Cache::new(
        CacheConfig::builder()
            .name("stress")
            .max_entries(100_000)
            .build(),
    );

    for i in 0u64..50_000 {
        cache.put(format!("plans:{i}"), i);
        cache.put(format!("users:{i}"), i);
    }
    assert_eq!(cache.len(), 100_000);

    let start = Instant::now();
    let dropped = cache.invalidate_prefix("plans:");
    println!("Invalidated {dropped} entries in {:?}", start.elapsed());

    assert_eq!(dropped, 50_000);
    assert_eq!(cache.len(), 50_000);
    assert!(cache.get("users:123").is_some());
    assert!(cache.get("plans:123").is_none());
}
