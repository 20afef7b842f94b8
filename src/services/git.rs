// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{Root, Slice, validate_actor_id};
use crate::lattice::Semilattice;
use crate::error::{Error, Result};

/// One line of `git ls-tree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String,
    pub kind: String,
    pub oid: String,
    pub name: String,
}

/// Stores each actor's slice as a blob in a tree behind the threads ref, and
/// a materialized [`Root`] as a blob behind the cache ref.
pub struct ThreadStore {
    git_dir: PathBuf,
    threads_ref: String,
    cache_ref: String,
}

impl ThreadStore {
    pub fn discover(config: &Config) -> Result<Self> {
        Self::discover_at(".", config)
    }

    pub fn discover_at(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let repo = gix::discover(path.as_ref()).map_err(|_| Error::NotAGitRepo)?;
        let git_dir = std::fs::canonicalize(repo.git_dir())?;
        debug!(git_dir = %git_dir.display(), "repository discovered");

        Ok(Self {
            git_dir,
            threads_ref: config.threads_ref.clone(),
            cache_ref: config.cache_ref.clone(),
        })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Write `actor`'s slice of `root` into the threads tree.
    ///
    /// Whatever is currently stored for `actor` is joined in first, so a
    /// write from another device of the same actor is never lost. The ref
    /// update is a compare-and-swap against the tree that was read; a writer
    /// that lands in between makes this fail instead of being overwritten.
    pub async fn save_slice(&self, root: &Root, actor: &str) -> Result<()> {
        validate_actor_id(actor)?;

        let mut slice = root.slice(actor).cloned().unwrap_or_default();

        let previous = self.resolve(&self.threads_ref).await?;
        let mut entries = match &previous {
            Some(tree) => self.list_tree(tree).await?,
            None => Vec::new(),
        };

        if let Some(stored) = entries
            .iter()
            .find(|entry| entry.name == actor && entry.kind == "blob")
        {
            let stored = self.decode_slice(&stored.oid, actor).await?;
            slice.join_assign(stored);
            debug!(actor, "joined stored slice");
        }

        let blob = self.write_blob(&serde_json::to_vec(&slice)?).await?;
        entries.retain(|entry| entry.name != actor);
        entries.push(TreeEntry {
            mode: "100644".into(),
            kind: "blob".into(),
            oid: blob,
            name: actor.to_string(),
        });

        let tree = self.write_tree(&entries).await?;
        self.update_ref(
            &self.threads_ref,
            &tree,
            Some(previous.as_deref().unwrap_or("")),
            &format!("threads: save slice of {actor}"),
        )
        .await?;

        debug!(actor, tree = %tree, "slice saved");
        Ok(())
    }

    /// Join every actor's slice found in the threads tree.
    pub async fn collate(&self) -> Result<Root> {
        let mut root = Root::default();

        let Some(tree) = self.resolve(&self.threads_ref).await? else {
            debug!(reference = %self.threads_ref, "no threads ref yet");
            return Ok(root);
        };

        for entry in self.list_tree(&tree).await? {
            if entry.kind != "blob" {
                warn!(name = %entry.name, kind = %entry.kind, "skipping non-blob entry");
                continue;
            }
            if validate_actor_id(&entry.name).is_err() {
                warn!(name = %entry.name, "skipping entry with invalid actor name");
                continue;
            }

            let slice = self.decode_slice(&entry.oid, &entry.name).await?;
            root.inner.join_at(entry.name, slice);
        }

        debug!(actors = root.inner.len(), "slices collated");
        Ok(root)
    }

    pub async fn load_cache(&self) -> Result<Root> {
        let Some(blob) = self.resolve(&self.cache_ref).await? else {
            return Err(Error::CacheMissing {
                reference: self.cache_ref.clone(),
            });
        };

        let bytes = self.read_blob(&blob).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            what: self.cache_ref.clone(),
            message: e.to_string(),
        })
    }

    pub async fn save_cache(&self, root: &Root) -> Result<()> {
        let blob = self.write_blob(&serde_json::to_vec(root)?).await?;
        self.update_ref(&self.cache_ref, &blob, None, "threads: materialize")
            .await?;

        debug!(blob = %blob, "cache saved");
        Ok(())
    }

    async fn decode_slice(&self, oid: &str, actor: &str) -> Result<Slice> {
        let bytes = self.read_blob(oid).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            what: format!("slice of {actor}"),
            message: e.to_string(),
        })
    }

    async fn resolve(&self, reference: &str) -> Result<Option<String>> {
        let output = self
            .run(&["rev-parse", "--verify", "--quiet", reference], None)
            .await?;

        if output.status.success() {
            return Ok(Some(stdout_line(&output)));
        }
        // --quiet keeps stderr empty when the ref simply does not exist
        if output.stderr.is_empty() {
            return Ok(None);
        }
        Err(git_error(&output))
    }

    async fn list_tree(&self, tree: &str) -> Result<Vec<TreeEntry>> {
        let stdout = self.git(&["ls-tree", "-z", tree], None).await?;
        parse_ls_tree(&stdout)
    }

    async fn write_tree(&self, entries: &[TreeEntry]) -> Result<String> {
        let mut input = Vec::new();
        for entry in entries {
            input.extend_from_slice(
                format!("{} {} {}\t{}", entry.mode, entry.kind, entry.oid, entry.name).as_bytes(),
            );
            input.push(0);
        }

        let stdout = self.git(&["mktree", "-z"], Some(&input)).await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    async fn write_blob(&self, content: &[u8]) -> Result<String> {
        let stdout = self
            .git(&["hash-object", "-w", "--stdin"], Some(content))
            .await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    async fn read_blob(&self, oid: &str) -> Result<Vec<u8>> {
        self.git(&["cat-file", "blob", oid], None).await
    }

    /// `expected` of `Some("")` requires the ref to not exist yet.
    async fn update_ref(
        &self,
        reference: &str,
        new: &str,
        expected: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let mut args = vec!["update-ref", "-m", message, reference, new];
        if let Some(old) = expected {
            args.push(old);
        }
        self.git(&args, None).await?;
        Ok(())
    }

    async fn git(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<Vec<u8>> {
        let output = self.run(args, stdin).await?;
        if !output.status.success() {
            return Err(git_error(&output));
        }
        Ok(output.stdout)
    }

    async fn run(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        let mut child = Command::new("git")
            .arg("--git-dir")
            .arg(&self.git_dir)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input).await?;
            // Closing stdin lets git see EOF.
            drop(pipe);
        }

        Ok(child.wait_with_output().await?)
    }
}

fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn git_error(output: &Output) -> Error {
    Error::Git(String::from_utf8_lossy(&output.stderr).trim().to_string())
}

/// Parse `git ls-tree -z` output: `<mode> SP <type> SP <oid> TAB <name> NUL`.
pub fn parse_ls_tree(raw: &[u8]) -> Result<Vec<TreeEntry>> {
    raw.split(|b| *b == 0)
        .filter(|record| !record.is_empty())
        .map(|record| {
            let record = String::from_utf8_lossy(record);
            let malformed = || Error::Git(format!("malformed ls-tree line: {record:?}"));

            let (meta, name) = record.split_once('\t').ok_or_else(malformed)?;
            let mut parts = meta.split(' ');
            let (Some(mode), Some(kind), Some(oid), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed());
            };

            Ok(TreeEntry {
                mode: mode.to_string(),
                kind: kind.to_string(),
                oid: oid.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}
