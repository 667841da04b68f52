use std::env;

use ragline_cli::{build_index, init_tracing, load_chunks, snippet, Settings};
use ragline_core::config::Config;
use ragline_retrieve::Retriever;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--strategy dense|keyword] [-k N]", args[0]);
        eprintln!("Example: {} 'borrow checker' --strategy keyword -k 5", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = Settings::from_config(&config)?;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--strategy" => {
                if let Some(value) = args.get(i + 1) {
                    settings.strategy = value.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
                    i += 1;
                } else {
                    eprintln!("Error: --strategy requires a value");
                    std::process::exit(1);
                }
            }
            "-k" => {
                if let Some(value) = args.get(i + 1) {
                    if let Ok(k) = value.parse::<usize>() {
                        settings.k = k;
                        i += 1;
                    } else {
                        eprintln!("Error: -k requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: -k requires a number");
                    std::process::exit(1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    println!("🔍 ragline-retrieve\n===================");
    println!("Query: {}", query_text);
    println!("Strategy: {}", settings.strategy);

    let chunks = load_chunks(&settings)?;
    let index = build_index(&settings, &chunks)?;
    let retriever = Retriever::new(chunks, index, settings.k)?;

    let hits = retriever.retrieve(query_text)?;
    println!("\n🔍 Found {} result(s) for: \"{}\"", hits.len(), query_text);
    for (rank, hit) in hits.iter().enumerate() {
        let content = retriever
            .chunks()
            .get(hit.index)
            .map(|c| snippet(&c.content, 150))
            .unwrap_or_default();
        println!("\n  {}. score={:.4}  chunk={}", rank + 1, hit.score, hit.index);
        println!("     📝 {content}");
    }
    Ok(())
}
