// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::domain::validate_actor_id;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name written into message ids and used as the tree entry for our slice
    #[serde(default)]
    pub actor: Option<String>,

    /// Low 16 bits of every id minted from this machine
    #[serde(default)]
    pub device: u16,

    #[serde(default = "default_threads_ref")]
    pub threads_ref: String,

    #[serde(default = "default_cache_ref")]
    pub cache_ref: String,
}

fn default_threads_ref() -> String {
    "refs/threads".into()
}
fn default_cache_ref() -> String {
    "refs/threads-materialized".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor: None,
            device: 0,
            threads_ref: default_threads_ref(),
            cache_ref: default_cache_ref(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.semilog.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".semilog.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        // User-level config
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // Environment variables (SEMILOG_ACTOR, SEMILOG_THREADS_REF, ...)
        figment = figment.merge(Env::prefixed("SEMILOG_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // CLI overrides (highest priority)
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "semilog").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref actor) = cli.actor {
            self.actor = Some(actor.clone());
        }
        if let Some(device) = cli.device {
            self.device = device;
        }
    }

    /// The configured actor, required by every write command.
    pub fn require_actor(&self) -> Result<&str> {
        self.actor.as_deref().ok_or(Error::MissingActor)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref actor) = self.actor {
            validate_actor_id(actor)?;
        }

        for (name, reference) in [
            ("threads_ref", &self.threads_ref),
            ("cache_ref", &self.cache_ref),
        ] {
            if !reference.starts_with("refs/") || reference.ends_with('/') {
                return Err(Error::Config(format!(
                    "{name} must be a ref under refs/, got '{reference}'"
                )));
            }
        }

        if self.threads_ref == self.cache_ref {
            return Err(Error::Config(
                "threads_ref and cache_ref must differ".into(),
            ));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# semilog threads configuration

# Your actor name. It appears in every message id you create and names
# your slice inside refs/threads. No '/', whitespace or control characters.
# actor = "alice"

# Device number (0-65535). Give each machine you write from its own value.
device = 0

# Where per-actor slices are stored
threads_ref = "refs/threads"

# Where `threads materialize` writes the joined view
cache_ref = "refs/threads-materialized"
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
