// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use clap::CommandFactory;
use console::style;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::{Actor, Detailed, MessageId, Root};
use crate::error::Result;
use crate::services::git::ThreadStore;

pub struct App {
    cli: Cli,
    config: Config,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            actor = ?config.actor,
            device = config.device,
            threads_ref = %config.threads_ref,
            "config loaded"
        );
        Ok(Self { cli, config })
    }

    pub async fn run(&mut self) -> Result<()> {
        match &self.cli.command {
            Commands::Init => self.init(),
            Commands::Config => self.show_config(),
            Commands::Completions { shell } => {
                clap_complete::generate(
                    *shell,
                    &mut Cli::command(),
                    "threads",
                    &mut std::io::stdout(),
                );
                Ok(())
            }
            Commands::Show { cached } => self.show(*cached).await,
            Commands::Materialize => self.materialize().await,
            Commands::New {
                title,
                tags,
                message,
            } => {
                self.write(|actor| {
                    let id = actor.new_thread(title.clone(), message.clone(), tags.clone());
                    Ok(format!("Created thread {}", format_id(&id)))
                })
                .await
            }
            Commands::Reply { parent, message } => {
                self.write(|actor| {
                    let id = actor.reply(parent.clone(), message.clone());
                    Ok(format!("Replied with {}", format_id(&id)))
                })
                .await
            }
            Commands::Edit { id, message } => {
                self.write(|actor| {
                    let version = actor.edit(*id, message.clone())?;
                    Ok(format!("Saved version {version} of {}/{id}", actor.id))
                })
                .await
            }
            Commands::Redact { id, version } => {
                self.write(|actor| {
                    actor.redact(*id, *version)?;
                    Ok(format!("Redacted version {version} of {}/{id}", actor.id))
                })
                .await
            }
            Commands::Retitle { id, title } => {
                self.write(|actor| {
                    actor.retitle(*id, title.clone())?;
                    Ok(format!("Retitled {}/{id}", actor.id))
                })
                .await
            }
            Commands::React {
                target,
                reaction,
                remove,
            } => {
                self.write(|actor| {
                    actor.react(target.clone(), reaction.clone(), !remove);
                    Ok(format!("Reaction '{reaction}' on {}", format_id(target)))
                })
                .await
            }
            Commands::Tag {
                target,
                add,
                remove,
            } => {
                self.write(|actor| {
                    actor.adjust_tags(target.clone(), add.clone(), remove.clone());
                    Ok(format!("Updated tags on {}", format_id(target)))
                })
                .await
            }
        }
    }

    /// Apply one operation to our own slice and persist it.
    ///
    /// `op` returns the line reported on success.
    async fn write<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut Actor<'_>) -> Result<String>,
    {
        let actor_id = self.config.require_actor()?.to_string();
        let store = ThreadStore::discover(&self.config)?;

        let mut root = store.collate().await?;
        let slice = root.slice_mut(&actor_id);
        let mut actor = Actor::new(slice, actor_id.clone(), self.config.device);
        let outcome = op(&mut actor)?;

        store.save_slice(&root, &actor_id).await?;
        self.print_success(&outcome);
        Ok(())
    }

    async fn show(&self, cached: bool) -> Result<()> {
        let store = ThreadStore::discover(&self.config)?;
        let root: Root = if cached {
            store.load_cache().await?
        } else {
            store.collate().await?
        };

        let detailed = Detailed::from(root);
        let rendered = detailed.render();
        if rendered.is_empty() {
            self.print_info("No threads yet.");
        } else {
            print!("{rendered}");
        }
        Ok(())
    }

    async fn materialize(&self) -> Result<()> {
        let store = ThreadStore::discover(&self.config)?;
        let root = store.collate().await?;
        store.save_cache(&root).await?;
        self.print_success(&format!(
            "Materialized {} slice(s) into {}",
            root.inner.len(),
            self.config.cache_ref
        ));
        Ok(())
    }

    fn init(&self) -> Result<()> {
        let path = Config::create_default()?;
        self.print_success(&format!("Created config: {}", path.display()));
        Ok(())
    }

    fn show_config(&self) -> Result<()> {
        let rendered = toml::to_string_pretty(&self.config)
            .map_err(|e| crate::error::Error::Config(e.to_string()))?;
        print!("{rendered}");
        if let Some(path) = Config::config_path() {
            self.print_info(&format!("User config file: {}", path.display()));
        }
        Ok(())
    }

    fn print_success(&self, msg: &str) {
        eprintln!("{} {}", style("✓").green().bold(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }
}

fn format_id(id: &MessageId) -> String {
    format!("{}/{}", id.0, id.1)
}
