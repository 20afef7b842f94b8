// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

mod actor;
mod detailed;
mod thread;
mod vote;

pub use actor::*;
pub use detailed::*;
pub use thread::*;
pub use vote::*;
