//! Local document commands: init, check, show.

use std::path::Path;

use ctlrules_model::config::EditorConfig;
use ctlrules_model::{summary, ConfigDocument};

use crate::style;
use crate::{read_document, write_document};

pub fn init(path: &Path, config: &EditorConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let document = ConfigDocument::empty(&config.limits);
    write_document(path, &document)?;
    println!(
        "{}",
        style::success(format!(
            "Created {} ({} I/O variables, {} condition / {} action slots)",
            path.display(),
            document.io().len(),
            document.conditions().capacity(),
            document.actions().capacity()
        ))
    );
    Ok(())
}

pub fn check(path: &Path) -> anyhow::Result<()> {
    let document = read_document(path)?;
    document.validate()?;
    let diagnostics = document.diagnostics();
    if diagnostics.is_empty() {
        println!("{}", style::success(format!("{}: ok", path.display())));
        return Ok(());
    }
    for diagnostic in &diagnostics {
        println!("{}", style::diagnostic(diagnostic));
    }
    anyhow::bail!(
        "{}: {} problem(s) found",
        path.display(),
        diagnostics.len()
    )
}

pub fn show(path: &Path) -> anyhow::Result<()> {
    let document = read_document(path)?;
    println!("{}", style::accent(path.display().to_string()));
    print!("{}", summary::render(&document));
    Ok(())
}
