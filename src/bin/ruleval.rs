use clap::{command, Parser, Subcommand};
use ruleval::{config::EngineConfig, error::Error, RuleEngine};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a rule and print the composed tree as JSON
    Parse { rule: String },
    /// Evaluate a rule against bindings given as a JSON object of strings
    Eval {
        rule: String,

        #[arg(short, long, default_value = "{}")]
        bindings: String,
    },
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = if cli.config.exists() {
        EngineConfig::from_file(&cli.config)?
    } else {
        EngineConfig::default()
    };

    let engine = RuleEngine::new(&config)?;

    match &cli.command {
        Command::Parse { rule } => {
            let tree = engine.parse(rule)?;
            let rendered = serde_json::to_string_pretty(&tree)
                .map_err(|e| Error::internal(format!("failed to render tree: {}", e)))?;
            println!("{}", rendered);
        }
        Command::Eval { rule, bindings } => {
            let bindings: HashMap<String, String> = serde_json::from_str(bindings)
                .map_err(|e| Error::internal(format!("failed to parse bindings: {}", e)))?;
            println!("{}", engine.evaluate(rule, &bindings)?);
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
