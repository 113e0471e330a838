use std::env;
use std::fs;
use std::path::PathBuf;

use fitrec_core::config::Config;
use fitrec_core::types::UserQuery;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query.json> [--limit N]", args[0]);
        eprintln!("Example: {} query.json --limit 10", args[0]);
        std::process::exit(1);
    }
    let query_path = PathBuf::from(&args[1]);
    let mut limit = 10usize;
    let mut i = 2; while i < args.len() { match args[i].as_str() {
        "--limit" => { if i + 1 < args.len() { if let Ok(l) = args[i + 1].parse::<usize>() { limit = l; i += 1; } else { eprintln!("Error: --limit requires a number"); std::process::exit(1); } } else { eprintln!("Error: --limit requires a number"); std::process::exit(1); } }
        _ => {} } i += 1; }

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let query: UserQuery = serde_json::from_str(&fs::read_to_string(&query_path)?)?;

    println!("🏋️ fitrec-recommend\n==================");
    println!("Query file: {}", query_path.display());
    println!("Catalog: {}", settings.catalog_path); println!("Vector cache: {}", settings.cache_path);

    let ctx = fitrec_engine::load_context(&settings)?;
    let results = ctx.recommend(&query)?;

    println!("\n🔍 {} recommendations (showing up to {})", results.len(), limit);
    for (i, rec) in results.iter().take(limit).enumerate() {
        println!("\n  {}. score={:.2}  option={}  equipment={}", i + 1, rec.score, rec.option.option_id, rec.option.equipment_id.as_deref().unwrap_or("-"));
        if let Some(name) = &rec.option.name { println!("     📝 {}", name); }
        if let Some(debug) = &rec.debug {
            println!("     🧮 similarity={:.2} rules={:.1}", debug.embedding_similarity, debug.rule_score);
            for hit in &debug.breakdown { println!("        +{:.0} {}", hit.weight, hit.label); }
        }
    }
    Ok(())
}
