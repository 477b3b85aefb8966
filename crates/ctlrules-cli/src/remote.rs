//! Controller commands: pull and push.

use std::path::Path;

use ctlrules_model::config::EditorConfig;
use ctlrules_model::{ConfigTransport, HttpTransport, SaveOutcome, Session};
use tracing::warn;

use crate::style;
use crate::{read_document, write_document};

pub fn pull(path: &Path, config: &EditorConfig) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.controller);
    let session = Session::load(&transport)?;
    for diagnostic in session.document().diagnostics() {
        warn!("controller document: {diagnostic}");
    }
    write_document(path, session.document())?;
    println!(
        "{}",
        style::success(format!(
            "Pulled {} into {}",
            transport.endpoint(),
            path.display()
        ))
    );
    Ok(())
}

pub fn push(path: &Path, config: &EditorConfig, force: bool) -> anyhow::Result<()> {
    let document = read_document(path)?;
    let diagnostics = document.diagnostics();
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            println!("{}", style::diagnostic(diagnostic));
        }
        if !force {
            anyhow::bail!(
                "{} problem(s) found; fix them or push with --force",
                diagnostics.len()
            );
        }
    }

    let transport = HttpTransport::new(&config.controller);
    let session = Session::new(document);
    match session.save(&transport)? {
        SaveOutcome::Confirmed => println!(
            "{}",
            style::success(format!("Saved to {}", transport.endpoint()))
        ),
        SaveOutcome::Presumed => println!(
            "{}",
            style::warning(format!(
                "No reply from {} within {} ms; the controller is presumably restarting with the new configuration",
                transport.endpoint(),
                config.controller.save_window.as_millis()
            ))
        ),
    }
    Ok(())
}
