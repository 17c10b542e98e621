//! lru_ttl demo driver
//!
//! Runs a short sequence of cache operations and prints the cache contents.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl::Config;

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Fill the cache, read every key, insert one more to force an eviction
/// 4. Wait, then print again so configured TTLs have a chance to fire
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, ttl={:?}s, memory_budget={:?}",
        config.capacity, config.ttl_secs, config.memory_budget
    );

    let cache = config.build_cache().context("failed to build cache")?;

    cache.put(1, "str1");
    cache.put(2, "str2");
    cache.put(3, "str3");
    println!("{}", cache);

    for key in [3, 2, 1, 3] {
        println!("{}", render_lookup(cache.get(key)));
    }

    cache.put(4, "str4");
    println!("{}", cache);

    tokio::time::sleep(Duration::from_secs(config.demo_wait_secs)).await;
    println!("{}", cache);

    let stats = serde_json::to_string(&cache.stats()).context("failed to encode stats")?;
    info!("Cache stats: {}", stats);

    Ok(())
}

/// Renders a lookup as `value found`, e.g. `str3 true` or ` false` on a miss.
fn render_lookup(value: Option<String>) -> String {
    let found = value.is_some();
    format!("{} {}", value.unwrap_or_default(), found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lookup_hit_and_miss() {
        assert_eq!(render_lookup(Some("str3".to_string())), "str3 true");
        assert_eq!(render_lookup(None), " false");
    }
}
