// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![cfg(feature = "derive")]

use std::cmp::Ordering;

use semilog::{Map, Max, Semilattice, Set};

#[derive(Clone, Debug, Default, PartialEq, Semilattice)]
struct Profile {
    version: Max<u64>,
    nicknames: Set<String>,
    scores: Map<String, Max<u32>>,
}

#[derive(Clone, Debug, Default, PartialEq, Semilattice)]
struct Pair(Max<u8>, Set<u8>);

#[derive(Clone, Debug, Default, PartialEq, Semilattice)]
struct Marker;

#[derive(Clone, Debug, Default, PartialEq, Semilattice)]
struct Wrapper<T> {
    inner: T,
    seen: bool,
}

fn profile(version: u64, nicknames: &[&str], scores: &[(&str, u32)]) -> Profile {
    Profile {
        version: Max(version),
        nicknames: nicknames.iter().map(|n| n.to_string()).collect(),
        scores: scores
            .iter()
            .map(|(k, v)| (k.to_string(), Max(*v)))
            .collect(),
    }
}

// ─── Named fields ────────────────────────────────────────────────────────────

#[test]
fn named_fields_join_field_wise() {
    let a = profile(1, &["al"], &[("chess", 10)]);
    let b = profile(3, &["ally"], &[("chess", 4), ("go", 7)]);

    assert_eq!(
        a.join(b),
        profile(3, &["al", "ally"], &[("chess", 10), ("go", 7)])
    );
}

#[test]
fn named_fields_use_product_order() {
    let low = profile(1, &["al"], &[]);
    let high = profile(2, &["al", "x"], &[("go", 1)]);
    let crossed = profile(5, &[], &[]);

    assert_eq!(low.partial_cmp(&high), Some(Ordering::Less));
    assert_eq!(high.partial_cmp(&low), Some(Ordering::Greater));
    assert_eq!(low.partial_cmp(&low.clone()), Some(Ordering::Equal));
    // higher version but fewer nicknames
    assert_eq!(crossed.partial_cmp(&low), None);
}

// ─── Tuple, unit and generic structs ─────────────────────────────────────────

#[test]
fn tuple_struct_joins_by_position() {
    let joined = Pair(Max(2), Set::singleton(1)).join(Pair(Max(1), Set::singleton(9)));
    assert_eq!(joined.0, Max(2));
    assert_eq!(joined.1.len(), 2);
}

#[test]
fn unit_struct_is_trivial() {
    assert_eq!(Marker.join(Marker), Marker);
    assert_eq!(Marker.partial_cmp(&Marker), Some(Ordering::Equal));
}

#[test]
fn generic_struct_bounds_type_parameters() {
    let a = Wrapper {
        inner: Max(3u8),
        seen: false,
    };
    let b = Wrapper {
        inner: Max(1u8),
        seen: true,
    };
    let joined = a.clone().join(b.clone());

    assert_eq!(joined.inner, Max(3));
    assert!(joined.seen);
    assert!(a < joined);
    assert!(b < joined);
}

#[test]
fn join_assign_mutates_in_place() {
    let mut p = profile(1, &[], &[]);
    p.join_assign(profile(0, &["z"], &[]));
    assert_eq!(p, profile(1, &["z"], &[]));
}
