use lingoflow_cli::session::{load_settings, open_cache};

pub fn run_cache_stats_command(config: Option<&str>) -> Result<(), String> {
    let settings = load_settings(config)?;
    if !settings.cache.enabled {
        println!("Cache is disabled");
        return Ok(());
    }
    let cache = open_cache(&settings);
    println!("Cache file: {}", settings.cache.path.display());
    println!("Entries: {} / {}", cache.len(), cache.capacity());
    Ok(())
}

pub fn run_cache_clear_command(config: Option<&str>) -> Result<(), String> {
    let settings = load_settings(config)?;
    if !settings.cache.enabled {
        println!("Cache is disabled");
        return Ok(());
    }
    let cache = open_cache(&settings);
    let removed = cache.len();
    cache.clear();
    println!("✅ Removed {} cached translations", removed);
    Ok(())
}
