// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Not a git repository")]
    #[diagnostic(
        code(semilog::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Git error: {0}")]
    #[diagnostic(code(semilog::git::error))]
    Git(String),

    #[error("No actor configured")]
    #[diagnostic(
        code(semilog::actor::missing),
        help("Pass --actor <name>, set SEMILOG_ACTOR, or add `actor = \"...\"` to the config file")
    )]
    MissingActor,

    #[error("Invalid actor name '{name}'")]
    #[diagnostic(
        code(semilog::actor::invalid_name),
        help("Actor names must be non-empty and contain no '/', whitespace or control characters")
    )]
    InvalidActorName { name: String },

    #[error("Message {id} not found in your slice")]
    #[diagnostic(
        code(semilog::thread::message_not_found),
        help("Only your own messages can be edited, retitled or redacted")
    )]
    MessageNotFound { id: u64 },

    #[error("Message {id} has no version {version}")]
    #[diagnostic(code(semilog::thread::version_not_found))]
    VersionNotFound { id: u64, version: u64 },

    #[error("No materialized cache at {reference}")]
    #[diagnostic(
        code(semilog::cache::missing),
        help("Build it with: threads materialize")
    )]
    CacheMissing { reference: String },

    #[error("Failed to decode {what}: {message}")]
    #[diagnostic(code(semilog::store::decode))]
    Decode { what: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(semilog::config::error))]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
