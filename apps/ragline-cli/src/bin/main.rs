use std::env;
use std::io::{self, Write};

use ragline_cli::{build_index, init_tracing, load_chunks, snippet, Settings, SourceSpec};
use ragline_core::config::{expand_path, Config};
use ragline_core::traits::Generator;
use ragline_remote::{ChatGenerator, LoggingGenerator};
use ragline_retrieve::{RagEngine, Retriever};

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} [options]");
    eprintln!("  --strategy <dense|keyword>   index strategy (default from config)");
    eprintln!("  --source <wikipedia|file|dir|literal>");
    eprintln!("  --title <page>               Wikipedia page title");
    eprintln!("  --path <path>                file or directory source path");
    eprintln!("  --text <text>                literal source text");
    eprintln!("  -k <n>                       chunks per query");
    eprintln!("  --verbose                    print retrieved chunks and prompts");
    std::process::exit(1);
}

fn parse_args(settings: &mut Settings) -> bool {
    let args: Vec<String> = env::args().collect();
    let prog = args[0].clone();
    let mut verbose = false;
    let mut source_kind: Option<String> = None;
    let mut title: Option<String> = None;
    let mut path: Option<String> = None;
    let mut text: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--strategy" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                match value.parse() {
                    Ok(strategy) => settings.strategy = strategy,
                    Err(e) => {
                        eprintln!("❌ {e}");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--source" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                source_kind = Some(value.clone());
                i += 2;
            }
            "--title" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                title = Some(value.clone());
                i += 2;
            }
            "--path" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                path = Some(value.clone());
                i += 2;
            }
            "--text" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                text = Some(value.clone());
                i += 2;
            }
            "-k" => {
                let Some(value) = args.get(i + 1) else { usage(&prog) };
                match value.parse::<usize>() {
                    Ok(k) => settings.k = k,
                    Err(_) => {
                        eprintln!("Error: -k requires a number");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            "--help" | "-h" => usage(&prog),
            other => {
                eprintln!("Unknown option: {other}");
                usage(&prog);
            }
        }
    }

    // A kind switch or kind-specific value overrides the config source
    let kind = source_kind.unwrap_or_else(|| match &settings.source {
        SourceSpec::Wikipedia { .. } => "wikipedia".to_string(),
        SourceSpec::File { .. } => "file".to_string(),
        SourceSpec::Dir { .. } => "dir".to_string(),
        SourceSpec::Literal { .. } => "literal".to_string(),
    });
    settings.source = match kind.as_str() {
        "wikipedia" => SourceSpec::Wikipedia {
            title: title.unwrap_or_else(|| match &settings.source {
                SourceSpec::Wikipedia { title } => title.clone(),
                _ => "Rust (programming language)".to_string(),
            }),
        },
        "file" => match path.map(expand_path) {
            Some(path) => SourceSpec::File { path },
            None => match &settings.source {
                SourceSpec::File { path } => SourceSpec::File { path: path.clone() },
                _ => {
                    eprintln!("Error: --source file requires --path");
                    std::process::exit(1);
                }
            },
        },
        "dir" => match path.map(expand_path) {
            Some(root) => SourceSpec::Dir { root },
            None => match &settings.source {
                SourceSpec::Dir { root } => SourceSpec::Dir { root: root.clone() },
                _ => {
                    eprintln!("Error: --source dir requires --path");
                    std::process::exit(1);
                }
            },
        },
        "literal" => SourceSpec::Literal {
            text: text.unwrap_or_else(|| match &settings.source {
                SourceSpec::Literal { text } => text.clone(),
                _ => String::new(),
            }),
        },
        other => {
            eprintln!("Unknown source kind: {other}");
            usage(&prog);
        }
    };

    verbose
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = Settings::from_config(&config)?;
    let verbose = parse_args(&mut settings);

    println!("🔍 ragline");
    println!("==========");

    let chunks = load_chunks(&settings)?;
    println!(
        "📥 Loaded {} chunk(s) (chunk_size={}, overlap={})",
        chunks.len(),
        settings.chunking.chunk_size,
        settings.chunking.overlap
    );

    let index = build_index(&settings, &chunks)?;
    println!("🧩 Index ready: {} over {} chunks", settings.strategy, index.len());

    let mut generator: Box<dyn Generator> = Box::new(ChatGenerator::new(settings.generator.clone())?);
    if verbose {
        generator = Box::new(LoggingGenerator::new(generator));
    }
    let retriever = Retriever::new(chunks, index, settings.k)?;
    let engine = RagEngine::new(retriever, generator);

    println!("\nRAG system ready! Type 'exit' to quit.");
    loop {
        print!("\nquestion> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("👋 Goodbye!");
            break;
        }

        match engine.answer(input) {
            Ok(answer) => {
                if verbose {
                    println!("\n🔍 Retrieved {} chunk(s):", answer.hits.len());
                    for (rank, hit) in answer.hits.iter().enumerate() {
                        let content = engine
                            .retriever()
                            .chunks()
                            .get(hit.index)
                            .map(|c| snippet(&c.content, 150))
                            .unwrap_or_default();
                        println!("  {}. score={:.4}  chunk={}", rank + 1, hit.score, hit.index);
                        println!("     📝 {content}");
                    }
                }
                println!("\n💬 Answer: {}", answer.text.trim());
            }
            Err(e) => println!("❌ Turn failed: {e:#}"),
        }
    }

    Ok(())
}
