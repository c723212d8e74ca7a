/// Markov Gen - trains a character model on a text file and prints generated text.
///
/// Usage: markov_gen <window_length> <seed_text> <length> <corpus.txt> [--seed <n>] [--dump]
///        markov_gen --config <settings.ron> <seed_text> <corpus.txt> [--dump]
use char_markov::core::config::GeneratorConfig;
use std::env;
use std::path::Path;
use std::process;

const USAGE: &str = "Usage: markov_gen <window_length> <seed_text> <length> <corpus.txt> [--seed <n>] [--dump]\n       markov_gen --config <settings.ron> <seed_text> <corpus.txt> [--dump]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut positional = Vec::new();
    let mut config_path = None;
    let mut seed = None;
    let mut dump = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(args[i].parse::<u64>().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a non-negative integer");
                    process::exit(1);
                }));
            }
            "--dump" => dump = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let (config, seed_text, corpus_path) = match config_path {
        Some(path) => {
            let [seed_text, corpus_path] = take_positional::<2>(positional);
            let mut config = GeneratorConfig::load_from_ron(Path::new(&path)).unwrap_or_else(|e| {
                eprintln!("Error loading config '{}': {}", path, e);
                process::exit(1);
            });
            if seed.is_some() {
                config.seed = seed;
            }
            (config, seed_text, corpus_path)
        }
        None => {
            let [window_length, seed_text, length, corpus_path] = take_positional::<4>(positional);
            let config = GeneratorConfig {
                window_length: parse_count("window_length", &window_length),
                seed,
                length: parse_count("length", &length),
            };
            (config, seed_text, corpus_path)
        }
    };

    let text = std::fs::read_to_string(&corpus_path).unwrap_or_else(|e| {
        eprintln!("Error reading corpus file '{}': {}", corpus_path, e);
        process::exit(1);
    });

    let mut model = config.build_model().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    model.train(&text);

    if dump {
        print!("{}", model);
    }

    println!("{}", model.generate(&seed_text, config.length));
}

fn take_positional<const N: usize>(positional: Vec<String>) -> [String; N] {
    positional.try_into().unwrap_or_else(|given: Vec<String>| {
        eprintln!("Error: expected {} positional arguments, got {}", N, given.len());
        eprintln!("{}", USAGE);
        process::exit(1);
    })
}

fn parse_count(name: &str, value: &str) -> usize {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: {} must be a non-negative integer, got '{}'", name, value);
        process::exit(1);
    })
}
