use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use hinge_exec::Renderer;
use hinge_parser::{StatementRegistry, Template};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "hinge")]
#[command(about = "hinge: extensible template tag compiler")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template to stdout
    Render {
        /// Input template file
        path: String,

        /// Seed for `random` output (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a template for errors without rendering it
    Check {
        /// Input template file
        path: String,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the registered tags
    Tags,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = StatementRegistry::builtin();

    match cli.command {
        Command::Render { path, seed, config } => {
            cmd_render(&path, seed, config.as_deref(), &registry)
        }
        Command::Check { path, config } => cmd_check(&path, config.as_deref(), &registry),
        Command::Tags => cmd_tags(&registry),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    match Config::resolve(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn compile(path: &str, config: &Config, registry: &StatementRegistry) -> Template {
    let source = read_source(path);

    match hinge_parser::Parser::parse_with(&source, &config.lexer, registry) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_render(
    path: &str,
    seed: Option<u64>,
    config_path: Option<&Path>,
    registry: &StatementRegistry,
) {
    let config = load_config(config_path);
    let template = compile(path, &config, registry);

    let mut renderer = match seed.or(config.seed) {
        Some(seed) => Renderer::with_seed(seed),
        None => Renderer::new(),
    };

    if let Err(e) = template.execute(&mut renderer) {
        eprintln!("{path}: {e}");
        std::process::exit(1);
    }

    print!("{}", renderer.output());
}

fn cmd_check(path: &str, config_path: Option<&Path>, registry: &StatementRegistry) {
    let config = load_config(config_path);
    let template = compile(path, &config, registry);

    tracing::info!(nodes = template.nodes.len(), "template compiled");
    eprintln!("OK: {path}");
}

fn cmd_tags(registry: &StatementRegistry) {
    for name in registry.names() {
        println!("{name}");
    }
}
