//! Terminal styling for command output.

use std::io::IsTerminal;

use ctlrules_model::document::Diagnostic;
use owo_colors::{AnsiColors, OwoColorize};

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => std::io::stdout().is_terminal(),
            Self::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

fn paint(stream: Stream, color: AnsiColors, text: &str) -> String {
    if stream.is_terminal() {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

pub fn success(text: impl AsRef<str>) -> String {
    paint(Stream::Stdout, AnsiColors::Green, text.as_ref())
}

pub fn warning(text: impl AsRef<str>) -> String {
    paint(Stream::Stdout, AnsiColors::Yellow, text.as_ref())
}

/// Error lines go to stderr, so color follows stderr.
pub fn error(text: impl AsRef<str>) -> String {
    paint(Stream::Stderr, AnsiColors::Red, text.as_ref())
}

pub fn accent(text: impl AsRef<str>) -> String {
    paint(Stream::Stdout, AnsiColors::Cyan, text.as_ref())
}

/// `subject: message` with the subject highlighted.
pub fn diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "{} {}",
        warning(format!("{}:", diagnostic.subject)),
        diagnostic.message
    )
}
