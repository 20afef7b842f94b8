// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Join-semilattice building blocks, and the `threads` tool built on them.
#![cfg_attr(
    feature = "derive",
    doc = r#"
`#[derive(Semilattice)]` joins structs field by field:

```
use semilog::{Max, Semilattice, Set};

#[derive(Clone, Debug, Default, PartialEq, Semilattice)]
struct Seen {
    latest: Max<u64>,
    tags: Set<String>,
}

let joined = Seen { latest: Max(1), tags: Set::singleton("a".into()) }
    .join(Seen { latest: Max(4), tags: Set::default() });
assert_eq!(joined.latest, Max(4));
assert!(joined.tags.contains("a"));
```

Enums have no field-wise join, so deriving on one is rejected:

```compile_fail
use semilog::Semilattice;

#[derive(Semilattice)]
enum Choice {
    Left,
    Right,
}
```

Unions are rejected the same way:

```compile_fail
use semilog::Semilattice;

#[derive(Semilattice)]
union Bits {
    int: u32,
    float: f32,
}
```
"#
)]

// Lets `#[derive(Semilattice)]` expand to `semilog::...` paths inside this crate.
extern crate self as semilog;

pub mod lattice;

pub use lattice::{GuardedPair, Map, Max, Redactable, Semilattice, Set, partial_ord_helper};

#[cfg(feature = "derive")]
pub use semilog_macros::Semilattice;

#[cfg(feature = "threads")]
pub mod app;
#[cfg(feature = "threads")]
pub mod cli;
#[cfg(feature = "threads")]
pub mod config;
#[cfg(feature = "threads")]
pub mod domain;
#[cfg(feature = "threads")]
pub mod error;
#[cfg(feature = "threads")]
pub mod services;

#[cfg(feature = "threads")]
pub use app::App;
#[cfg(feature = "threads")]
pub use cli::Cli;
#[cfg(feature = "threads")]
pub use config::Config;
#[cfg(feature = "threads")]
pub use error::{Error, Result};
