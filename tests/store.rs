// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! ThreadStore against real scratch repositories. Requires `git` on PATH.

#![cfg(feature = "threads")]

mod helpers;

use semilog::config::Config;
use semilog::domain::{Actor, Detailed, Root};
use semilog::error::Error;
use semilog::services::git::ThreadStore;
use helpers::{git, git_with_input, init_repo};

// ─── Test helpers ────────────────────────────────────────────────────────────

fn store(dir: &tempfile::TempDir) -> ThreadStore {
    ThreadStore::discover_at(dir.path(), &Config::default()).unwrap()
}

fn root_with_thread(actor: &str, title: &str) -> Root {
    let mut root = Root::default();
    Actor::new(root.slice_mut(actor), actor.to_string(), 0).new_thread(
        title.to_string(),
        format!("{title} body"),
        vec!["general".to_string()],
    );
    root
}

// ─── Discovery ───────────────────────────────────────────────────────────────

#[test]
fn discovers_from_subdirectory() {
    let dir = init_repo();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let store = ThreadStore::discover_at(&nested, &Config::default()).unwrap();
    assert!(store.git_dir().ends_with(".git"));
}

// ─── Slices ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn collate_without_ref_is_empty() {
    let dir = init_repo();
    let root = store(&dir).collate().await.unwrap();
    assert_eq!(root, Root::default());
}

#[tokio::test]
async fn saved_slice_collates_back() {
    let dir = init_repo();
    let store = store(&dir);
    let root = root_with_thread("alice", "Hello");

    store.save_slice(&root, "alice").await.unwrap();
    let collated = store.collate().await.unwrap();

    assert_eq!(collated, root);
}

#[tokio::test]
async fn slices_are_stored_as_blobs_under_actor_names() {
    let dir = init_repo();
    let store = store(&dir);

    store
        .save_slice(&root_with_thread("alice", "A"), "alice")
        .await
        .unwrap();
    store
        .save_slice(&root_with_thread("bob", "B"), "bob")
        .await
        .unwrap();

    let listing = git(dir.path(), &["ls-tree", "refs/threads"]);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("100644 blob ") && lines[0].ends_with("\talice"));
    assert!(lines[1].starts_with("100644 blob ") && lines[1].ends_with("\tbob"));
}

#[tokio::test]
async fn saving_again_replaces_the_actor_entry() {
    let dir = init_repo();
    let store = store(&dir);

    let mut root = root_with_thread("alice", "First");
    store.save_slice(&root, "alice").await.unwrap();

    Actor::new(root.slice_mut("alice"), "alice".into(), 0).new_thread(
        "Second".into(),
        "more".into(),
        Vec::new(),
    );
    store.save_slice(&root, "alice").await.unwrap();

    let listing = git(dir.path(), &["ls-tree", "refs/threads"]);
    assert_eq!(listing.lines().count(), 1);

    let collated = store.collate().await.unwrap();
    assert_eq!(collated.slice("alice").unwrap().owned.len(), 2);
}

#[tokio::test]
async fn same_actor_on_two_devices_keeps_both_writes() {
    let dir = init_repo();
    let store = store(&dir);

    // Both devices read the same (empty) state before writing.
    let mut laptop = store.collate().await.unwrap();
    let mut desktop = store.collate().await.unwrap();

    Actor::new(laptop.slice_mut("alice"), "alice".into(), 1).new_thread(
        "From laptop".into(),
        "one".into(),
        Vec::new(),
    );
    Actor::new(desktop.slice_mut("alice"), "alice".into(), 2).new_thread(
        "From desktop".into(),
        "two".into(),
        Vec::new(),
    );

    store.save_slice(&laptop, "alice").await.unwrap();
    store.save_slice(&desktop, "alice").await.unwrap();

    let collated = store.collate().await.unwrap();
    let owned = &collated.slice("alice").unwrap().owned;
    assert_eq!(owned.len(), 2);
    assert!(owned.contains_key(&1));
    assert!(owned.contains_key(&2));
}

#[tokio::test]
async fn two_actors_render_together() {
    let dir = init_repo();
    let store = store(&dir);

    let alice = root_with_thread("alice", "Hello");
    store.save_slice(&alice, "alice").await.unwrap();

    let mut root = store.collate().await.unwrap();
    let thread = ("alice".to_string(), 0);
    Actor::new(root.slice_mut("bob"), "bob".into(), 0).reply(thread, "welcome".into());
    store.save_slice(&root, "bob").await.unwrap();

    let rendered = Detailed::from(store.collate().await.unwrap()).render();
    assert_eq!(
        rendered,
        "== Hello ==\ntags: general (1)\nalice/0: Hello body\n  bob/0: welcome\n"
    );
}

#[tokio::test]
async fn invalid_actor_name_is_rejected() {
    let dir = init_repo();
    let err = store(&dir)
        .save_slice(&Root::default(), "a/b")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidActorName { .. }));
}

#[tokio::test]
async fn corrupt_slice_is_a_decode_error() {
    let dir = init_repo();
    let store = store(&dir);
    store
        .save_slice(&root_with_thread("alice", "A"), "alice")
        .await
        .unwrap();

    // Point refs/threads at a tree whose blob is not a slice.
    let blob = git_with_input(dir.path(), &["hash-object", "-w", "--stdin"], "not json");
    let tree = git_with_input(
        dir.path(),
        &["mktree"],
        &format!("100644 blob {blob}\tmallory\n"),
    );
    git(dir.path(), &["update-ref", "refs/threads", &tree]);

    let err = store.collate().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

// ─── Materialized cache ──────────────────────────────────────────────────────

#[tokio::test]
async fn missing_cache_is_reported() {
    let dir = init_repo();
    let err = store(&dir).load_cache().await.unwrap_err();
    assert!(
        matches!(err, Error::CacheMissing { ref reference } if reference == "refs/threads-materialized")
    );
}

#[tokio::test]
async fn cache_round_trips_root() {
    let dir = init_repo();
    let store = store(&dir);

    let mut root = root_with_thread("alice", "A");
    root.inner
        .join_at("bob".into(), root_with_thread("bob", "B").inner["bob"].clone());

    store.save_cache(&root).await.unwrap();
    assert_eq!(store.load_cache().await.unwrap(), root);

    let kind = git(dir.path(), &["cat-file", "-t", "refs/threads-materialized"]);
    assert_eq!(kind, "blob");
}

#[tokio::test]
async fn custom_refs_are_honoured() {
    let dir = init_repo();
    let config = Config {
        threads_ref: "refs/forum/slices".into(),
        cache_ref: "refs/forum/cache".into(),
        ..Config::default()
    };
    let store = ThreadStore::discover_at(dir.path(), &config).unwrap();

    store
        .save_slice(&root_with_thread("alice", "A"), "alice")
        .await
        .unwrap();

    let listing = git(dir.path(), &["ls-tree", "refs/forum/slices"]);
    assert!(listing.ends_with("\talice"));
}
