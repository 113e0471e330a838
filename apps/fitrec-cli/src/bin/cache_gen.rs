use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use fitrec_core::catalog::Catalog;
use fitrec_core::config::{expand_path, Config};
use fitrec_core::text;
use fitrec_embed::get_default_embedder;
use fitrec_vector::VectorCache;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut catalog_path = expand_path(&settings.catalog_path);
    let mut output_path = expand_path(&settings.cache_path);
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--output" | "-o" => { if i + 1 < args.len() { output_path = PathBuf::from(&args[i + 1]); i += 1; } else { eprintln!("Error: --output requires a path"); std::process::exit(1); } }
        _ if !args[i].starts_with('-') => catalog_path = PathBuf::from(&args[i]), _ => {} } i += 1; }

    println!("Equipment Vector Cache Generator\n================================");
    println!("Catalog: {}", catalog_path.display());
    println!("Output: {}", output_path.display());

    let catalog = Catalog::load(&catalog_path)?;
    if catalog.is_empty() { println!("No catalog options found, nothing to embed"); return Ok(()); }

    let embedder = get_default_embedder(settings.embedding_dim);
    let mut cache = VectorCache::new(settings.embedding_dim);

    let pb = ProgressBar::new(catalog.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} options ({percent}%) {msg}").unwrap().progress_chars("#>-"));

    let batch_size = 64usize;
    for chunk in catalog.options().chunks(batch_size) {
        let texts: Vec<String> = chunk.iter().map(text::build_equipment_text).collect();
        let vectors = embedder.embed_batch(&texts)?;
        for (option, vector) in chunk.iter().zip(vectors) {
            cache.insert(option.option_id.clone(), vector)?;
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_with_message("embedding done");

    if let Some(parent) = output_path.parent() { std::fs::create_dir_all(parent)?; }
    cache.save(&output_path)?;
    println!("\n✅ Wrote {} vectors ({} dims) to {}", cache.len(), cache.dim(), output_path.display());
    println!("💡 To query, use: cargo run --bin fitrec-recommend '<query.json>'");
    Ok(())
}
