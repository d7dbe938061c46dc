//! fOS Compose - Main Entry Point
//!
//! Composes one template from a template directory and prints the result.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use fos_decorator::{Composer, DialectConfig, FileRepository, TemplateMode, VariableEvaluator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fos-compose", version, about = "Compose layout templates")]
struct Cli {
    /// Template to compose, relative to the template directory and without suffix
    template: String,

    /// Template directory
    #[arg(short, long, default_value = ".")]
    templates: PathBuf,

    /// File suffix of templates
    #[arg(long, default_value = ".html")]
    suffix: String,

    /// Dialect configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template mode, overriding the configuration
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Variable for title expressions. Repeatable.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Indent the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Html,
    LegacyHtml,
    Xml,
}

impl From<Mode> for TemplateMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Html => TemplateMode::Html,
            Mode::LegacyHtml => TemplateMode::LegacyHtml,
            Mode::Xml => TemplateMode::Xml,
        }
    }
}

fn parse_var(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{arg}'")),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<DialectConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            DialectConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => DialectConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.template_mode = mode.into();
    }
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    if !cli.templates.is_dir() {
        bail!("template directory {} does not exist", cli.templates.display());
    }
    let config = load_config(cli)?;
    tracing::debug!("Using {:?} templates from {}", config.template_mode, cli.templates.display());

    let repository = FileRepository::new(&cli.templates)
        .with_suffix(&cli.suffix)
        .with_mode(config.template_mode);
    let evaluator: VariableEvaluator = cli.vars.iter().cloned().collect();
    let composer = Composer::with_config(repository, config).with_evaluator(evaluator);

    let output = if cli.pretty {
        composer.render_pretty(&cli.template)
    } else {
        composer.render(&cli.template)
    };
    output.with_context(|| format!("cannot compose {}", cli.template))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
