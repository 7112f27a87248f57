//! Cache key construction.

/// Builds a cache key from an operation name and its arguments, joined
/// with `:`.
///
/// Keys built this way group naturally by operation, which is what
/// [`Cache::invalidate_prefix`](crate::Cache::invalidate_prefix) relies on:
///
/// ```
/// use headroom_cache::cache_key;
///
/// assert_eq!(cache_key("plans", ["123", "v2"]), "plans:123:v2");
/// assert_eq!(cache_key("account", [] as [&str; 0]), "account");
/// ```
pub fn cache_key<I, S>(operation: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::from(operation);
    for arg in args {
        key.push(':');
        key.push_str(arg.as_ref());
    }
    key
}
