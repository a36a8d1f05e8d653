/// Returns the cached value for a key, or evaluates the block, queues the
/// result for caching with the given TTL, and returns it.
///
/// The cache must provide `get_from_cache` and `set_in_background`; the block
/// must be a future resolving to `AppResult<T>`.
///
/// ```rust,ignore
/// let movies = cached!(cache, CacheKey::MovieSearch(title), SEARCH_CACHE_TTL, async move {
///     fetch_movies(&title).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(hit) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(hit)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
