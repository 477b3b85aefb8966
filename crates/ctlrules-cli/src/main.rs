//! CLI entrypoint for the rule configuration editor.

mod cli;
mod edit;
mod inspect;
mod remote;
mod style;

use std::path::Path;

use clap::Parser;
use ctlrules_model::config::EditorConfig;
use ctlrules_model::ConfigDocument;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    if let Err(err) = run() {
        eprintln!("{}", style::error(format!("Error: {err:#}")));
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = EditorConfig::load_or_default(&cli.config)?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Command::Init { doc, force } => inspect::init(&doc.file, &config, force),
        Command::Pull { doc } => remote::pull(&doc.file, &config),
        Command::Push { doc, force } => remote::push(&doc.file, &config, force),
        Command::Check { doc } => inspect::check(&doc.file),
        Command::Show { doc } => inspect::show(&doc.file),
        Command::Io { action } => edit::io(action),
        Command::Condition { action } => edit::condition(action),
        Command::Action { action } => edit::action(action),
        Command::Group { action } => edit::group(action),
    }
}

fn init_logging(config: &EditorConfig, verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        config
            .log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn read_document(path: &Path) -> anyhow::Result<ConfigDocument> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))?;
    let document = ConfigDocument::from_json(&text)
        .map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))?;
    Ok(document)
}

pub(crate) fn write_document(path: &Path, document: &ConfigDocument) -> anyhow::Result<()> {
    let mut text = document.to_json_pretty()?;
    text.push('\n');
    std::fs::write(path, text)
        .map_err(|err| anyhow::anyhow!("failed to write {}: {err}", path.display()))?;
    Ok(())
}
