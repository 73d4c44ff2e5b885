use std::thread;

use access_cache::SharedCache;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cache = SharedCache::new();

    println!("Adding items to cache...");
    cache.set("user:1", "Alice")?;
    cache.set("user:2", "Bob")?;
    cache.set("user:3", "Charlie")?;
    cache.set("config:theme", "dark")?;
    cache.set("config:language", "en")?;

    println!("Cache size: {} items", cache.len()?);
    println!("Keys: {:?}\n", cache.keys()?);

    println!("Simulating access patterns...");
    let patterns = [
        ("user:1", 10),
        ("user:2", 5),
        ("user:3", 1),
        ("config:theme", 2),
        ("config:language", 1),
        ("nonexistent:1", 1),
        ("nonexistent:2", 1),
    ];
    let handles: Vec<_> = patterns
        .into_iter()
        .map(|(key, times)| {
            let cache = cache.clone();
            thread::spawn(move || -> access_cache::Result<()> {
                for _ in 0..times {
                    cache.get(key)?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("access thread panicked"))??;
    }

    let stats = cache.stats()?;
    println!("\nHits: {}", stats.hits());
    println!("Misses: {}", stats.misses());
    println!("Hit Rate: {:.1}%", stats.hit_rate());

    println!("\nMost accessed (top 3): {:?}", cache.most_accessed(3)?);
    println!("Least accessed (bottom 3): {:?}", cache.least_accessed(3)?);

    if let Some(value) = cache.get("user:1")? {
        println!("\nuser:1 = {value}");
    }

    println!("\nBefore delete - size: {}", cache.len()?);
    cache.delete("user:3")?;
    println!("After delete - size: {}", cache.len()?);
    println!("Keys: {:?}", cache.keys()?);

    Ok(())
}
