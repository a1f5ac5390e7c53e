use clap::{Parser, ValueEnum};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use regexp_expressions::{eval_str, Backtracking, Linear, Registry, Scope};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineChoice {
    /// Linear-time `regex` engine; safe for untrusted patterns.
    Linear,
    /// Backtracking `fancy-regex` engine; adds look-around and back-references.
    Backtracking,
}

/// Evaluate a JSON expression with the pattern operations available.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Expression as JSON, e.g. '["$stringMatch", ["a.*?c", "g"]]'
    expression: String,
    /// Current value ($$VALUE)
    #[arg(long)]
    value: Option<String>,
    /// Extra scope bindings as a JSON object
    #[arg(long)]
    scope: Option<String>,
    /// Matching engine backing the pattern operations
    #[arg(long, value_enum, default_value_t = EngineChoice::Linear)]
    engine: EngineChoice,
    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bindings = match args.scope.as_deref().map(serde_json::from_str::<Map<String, Value>>) {
        None => Map::new(),
        Some(Ok(map)) => map,
        Some(Err(e)) => {
            eprintln!("Invalid scope: {e}");
            std::process::exit(1);
        }
    };
    let mut scope = Scope::new(bindings);
    if let Some(value) = args.value {
        scope = scope.bind(regexp_expressions::context::VALUE, value);
    }

    let registry = match args.engine {
        EngineChoice::Linear => Registry::with_regexp::<Linear>(),
        EngineChoice::Backtracking => Registry::with_regexp::<Backtracking>(),
    };

    let out = match eval_str(&registry, &scope, &args.expression) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let rendered = if args.compact {
        serde_json::to_string(&out)
    } else {
        serde_json::to_string_pretty(&out)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
