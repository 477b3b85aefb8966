//! CLI definitions for ctlrules.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use ctlrules_model::group::GroupKind;
use ctlrules_model::io::IoRef;
use ctlrules_model::kinds::{ActionKind, Comparison, Logic, OperationMode};

#[derive(Debug, Parser)]
#[command(
    name = "ctlrules",
    version,
    about = "Rule configuration editor for I/O automation controllers",
    infer_subcommands = true,
    after_help = "Examples:\n  ctlrules pull --file plant.json\n  ctlrules condition add --target AI1 --comparison isGreater --value 600\n  ctlrules group set --kind condition --members 1,2 --logic or\n  ctlrules push --file plant.json"
)]
pub struct Cli {
    /// Show debug logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Editor configuration file.
    #[arg(long, global = true, default_value = "ctlrules.toml")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

/// Local configuration document to operate on.
#[derive(Debug, Args)]
pub struct DocumentArg {
    /// Configuration document (JSON).
    #[arg(long, short, default_value = "controller.json")]
    pub file: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty document sized by `[limits]`.
    Init {
        #[command(flatten)]
        doc: DocumentArg,
        /// Overwrite an existing file.
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Download the controller's document.
    Pull {
        #[command(flatten)]
        doc: DocumentArg,
    },
    /// Upload a document to the controller (the controller restarts).
    Push {
        #[command(flatten)]
        doc: DocumentArg,
        /// Upload even when consistency warnings are reported.
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Report entries the controller would not execute as intended.
    Check {
        #[command(flatten)]
        doc: DocumentArg,
    },
    /// Print the document's active entries.
    Show {
        #[command(flatten)]
        doc: DocumentArg,
    },
    /// Edit I/O variables.
    Io {
        #[command(subcommand)]
        action: IoAction,
    },
    /// Edit conditions.
    Condition {
        #[command(subcommand)]
        action: ConditionAction,
    },
    /// Edit actions.
    Action {
        #[command(subcommand)]
        action: ActionAction,
    },
    /// Edit condition and action groups.
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum IoAction {
    /// Rename, change the mode of, or (de)activate a variable.
    Set {
        #[command(flatten)]
        doc: DocumentArg,
        /// Variable, e.g. `DO2`.
        target: IoRef,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mode: Option<OperationMode>,
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "inactive")]
        active: bool,
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "active")]
        inactive: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConditionAction {
    /// Create a condition in the first free slot.
    Add {
        #[command(flatten)]
        doc: DocumentArg,
        #[arg(long)]
        target: IoRef,
        #[arg(long)]
        comparison: Comparison,
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Replace an active condition.
    Update {
        #[command(flatten)]
        doc: DocumentArg,
        number: u16,
        #[arg(long)]
        target: IoRef,
        #[arg(long)]
        comparison: Comparison,
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Delete a condition and drop it from every group.
    Delete {
        #[command(flatten)]
        doc: DocumentArg,
        number: u16,
    },
}

#[derive(Debug, Subcommand)]
pub enum ActionAction {
    /// Create an action in the first free slot.
    Add {
        #[command(flatten)]
        doc: DocumentArg,
        #[arg(long)]
        target: IoRef,
        #[arg(long = "do")]
        kind: ActionKind,
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Replace an active action.
    Update {
        #[command(flatten)]
        doc: DocumentArg,
        number: u16,
        #[arg(long)]
        target: IoRef,
        #[arg(long = "do")]
        kind: ActionKind,
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Delete an action and drop it from every group.
    Delete {
        #[command(flatten)]
        doc: DocumentArg,
        number: u16,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupAction {
    /// Create a group, or edit group `--number`, then commit it.
    Set {
        #[command(flatten)]
        doc: DocumentArg,
        #[arg(long)]
        kind: GroupKind,
        /// Existing group to edit.
        #[arg(long)]
        number: Option<u16>,
        /// Replace the member list (comma separated). The order given is the
        /// evaluation order, so this also reorders existing members.
        #[arg(long, value_delimiter = ',')]
        members: Option<Vec<u16>>,
        /// Append members.
        #[arg(long, value_delimiter = ',')]
        add: Vec<u16>,
        /// Remove members.
        #[arg(long, value_delimiter = ',')]
        remove: Vec<u16>,
        #[arg(long)]
        logic: Option<Logic>,
    },
    /// Delete a group.
    Delete {
        #[command(flatten)]
        doc: DocumentArg,
        #[arg(long)]
        kind: GroupKind,
        number: u16,
    },
}
