//! YAML Fragments CLI
//!
//! Usage:
//!   yaml-fragments [OPTIONS] <FILE> [-- --name value ...]
//!
//! Options:
//!   -p, --param <NAME=VALUE>  Template parameter (repeatable)
//!   -c, --config <FILE>       Config file (TOML format)
//!   -o, --output <FILE>       Write the generated YAML file
//!   --annotated <FILE>        Write a line-numbered copy of the resolved text
//!   -d, --debug               Log the resolved text with line numbers
//!   --trailing-colon          Accept `}:` as the end of a tfile directive
//!   --raw                     Print the resolved text instead of re-dumped YAML
//!   -h, --help                Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yaml_fragments::{dump, load_with_config, params_from_args, FragmentsConfig, LoadConfig};

#[derive(Parser)]
#[command(name = "yaml-fragments")]
#[command(about = "Reusable, parameterized YAML templates")]
struct Cli {
    /// Template file to resolve
    input: PathBuf,

    /// Template parameter as NAME=VALUE
    #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Config file with params and options (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the generated YAML file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a line-numbered copy of the resolved text
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Debug mode: log the resolved text with line numbers
    #[arg(short, long)]
    debug: bool,

    /// Accept `}:` as the end of a tfile directive
    #[arg(long)]
    trailing_colon: bool,

    /// Print the resolved text instead of the re-dumped YAML tree
    #[arg(long)]
    raw: bool,

    /// Extra parameters as `--name value` pairs
    #[arg(last = true, allow_hyphen_values = true)]
    extra: Vec<String>,
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", arg)),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "yaml_fragments=debug"
    } else {
        "yaml_fragments=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load config file
    let mut config = match &cli.config {
        Some(path) => match FragmentsConfig::from_file(path) {
            Ok(c) => c.into_load_config(),
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LoadConfig::new(),
    };

    // Command line overrides the config file
    config.params.extend(params_from_args(&cli.extra));
    config.params.extend(cli.params);
    if cli.trailing_colon {
        config.scan = config.scan.with_trailing_colon(true);
    }
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    if let Some(annotated) = cli.annotated {
        config = config.with_annotated_output(annotated);
    }
    if cli.debug {
        config = config.with_debug(true);
    }

    let loaded = match load_with_config(&cli.input, &config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e.format());
            std::process::exit(1);
        }
    };

    if cli.raw {
        println!("{}", loaded.text);
        return;
    }
    match dump(&loaded.value) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
