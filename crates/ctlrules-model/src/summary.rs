//! Plain-text rendering of a document, as shown by `ctlrules show`.

use std::fmt::Write as _;

use crate::document::ConfigDocument;
use crate::group::GroupKind;
use crate::kinds::IoKind;

/// Render the I/O registry and every active entry, one per line.
#[must_use]
pub fn render(document: &ConfigDocument) -> String {
    let mut out = String::new();
    let io = document.io();
    let _ = writeln!(out, "I/O variables: {}", io.len());
    for kind in IoKind::ALL.iter().copied() {
        let variables: Vec<_> = io.of_kind(kind).collect();
        if variables.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {kind}:");
        for variable in variables {
            let state = if variable.is_active() { "" } else { " (inactive)" };
            let _ = writeln!(
                out,
                "    {:<5} {:<16} {}{state}",
                variable.id().to_string(),
                variable.name(),
                variable.mode()
            );
        }
    }

    let conditions = document.conditions();
    let _ = writeln!(
        out,
        "Conditions: {}/{}",
        conditions.occupied_count(),
        conditions.capacity()
    );
    for (number, condition) in conditions.occupied() {
        let _ = write!(
            out,
            "  C{number:<3} {} {}",
            condition.target, condition.comparison
        );
        if condition.comparison.takes_value() {
            let _ = write!(out, " {}", condition.value);
        }
        out.push('\n');
    }

    let actions = document.actions();
    let _ = writeln!(
        out,
        "Actions: {}/{}",
        actions.occupied_count(),
        actions.capacity()
    );
    for (number, action) in actions.occupied() {
        let _ = write!(out, "  A{number:<3} {} {}", action.target, action.kind);
        if action.kind.takes_value() {
            let _ = write!(out, " {}", action.value);
        }
        out.push('\n');
    }

    for (title, kind) in [
        ("Condition groups", GroupKind::Condition),
        ("Action groups", GroupKind::Action),
    ] {
        let listed: Vec<_> = document.listed_groups(kind).collect();
        let _ = writeln!(
            out,
            "{title}: {}/{}",
            listed.len(),
            document.groups(kind).capacity()
        );
        for (number, group) in listed {
            let members: Vec<String> = group
                .refs
                .members()
                .map(|member| format!("{}{member}", kind.member_prefix()))
                .collect();
            let _ = writeln!(
                out,
                "  {}{number:<2} {} [{}]",
                kind.prefix(),
                group.logic.label().to_ascii_uppercase(),
                members.join(", ")
            );
        }
    }
    out
}
