// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use clap::Parser;
use clap_complete::Shell;

use crate::domain::{MessageId, validate_actor_id};

#[derive(Parser, Debug)]
#[command(name = "threads")]
#[command(version)]
#[command(about = "Conflict-free discussion threads stored in git refs", long_about = None)]
pub struct Cli {
    /// Actor name to write as
    #[arg(short, long, global = true, env = "SEMILOG_ACTOR")]
    pub actor: Option<String>,

    /// Device number of this machine (0-65535)
    #[arg(short, long, global = true, env = "SEMILOG_DEVICE")]
    pub device: Option<u16>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Start a new thread
    New {
        /// Thread title
        #[arg(short, long)]
        title: String,
        /// Tag to vote for (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// First message
        message: String,
    },
    /// Reply to a message
    Reply {
        /// Message to reply to, as AUTHOR/ID
        #[arg(value_parser = parse_message_id)]
        parent: MessageId,
        message: String,
    },
    /// Add a new version of one of your messages
    Edit { id: u64, message: String },
    /// Hide one version of one of your messages
    Redact { id: u64, version: u64 },
    /// Replace the title of one of your threads
    Retitle { id: u64, title: String },
    /// React to a message
    React {
        /// Target message, as AUTHOR/ID
        #[arg(value_parser = parse_message_id)]
        target: MessageId,
        reaction: String,
        /// Withdraw the reaction instead
        #[arg(long)]
        remove: bool,
    },
    /// Vote tags on a thread up or down
    Tag {
        /// Target thread, as AUTHOR/ID
        #[arg(value_parser = parse_message_id)]
        target: MessageId,
        #[arg(long = "add")]
        add: Vec<String>,
        #[arg(long = "remove")]
        remove: Vec<String>,
    },
    /// Print every thread with its replies
    Show {
        /// Read the materialized cache instead of collating slices
        #[arg(long)]
        cached: bool,
    },
    /// Collate all slices and store the result in the cache ref
    Materialize,
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Print shell completions
    Completions { shell: Shell },
}

/// Parse `AUTHOR/ID`. Actor names cannot contain `/`, so the split is exact.
pub fn parse_message_id(raw: &str) -> Result<MessageId, String> {
    let (author, id) = raw
        .rsplit_once('/')
        .ok_or_else(|| format!("expected AUTHOR/ID, got '{raw}'"))?;
    validate_actor_id(author).map_err(|e| e.to_string())?;
    let id = id
        .parse::<u64>()
        .map_err(|e| format!("invalid message id '{id}': {e}"))?;
    Ok((author.to_string(), id))
}
