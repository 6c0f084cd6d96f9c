// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index strategy layer: the union / penalty / picksplit / consistent /
//! same primitives a GiST-style tree needs to key pages of ranges, plus
//! the compress / decompress hooks that move keys through the compact
//! stored form. Leaf keys hold an indexed range; internal keys hold the
//! bounding union of everything below them, so containment-style
//! predicates are relaxed at internal levels to tests that can never
//! prune a page with a matching leaf underneath.

use super::{AddressError, IpFam, IpRange};
use std::cmp::Ordering;
use tracing::trace;

/**
Operator strategy numbers. The numbering is a frozen external contract
between the strategy table and its callers; [consistent] also accepts
raw numbers and answers `false` for any it does not know.
*/
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum Strategy {
    /// `>>=` key contains query
    Contains = 1,
    /// `<<=` key contained in query
    ContainedIn = 2,
    /// `>>` key strictly contains query
    ContainsStrict = 3,
    /// `<<` key strictly contained in query
    ContainedInStrict = 4,
    /// `&&` key and query share at least one address
    Overlaps = 5,
    /// `=` key equals query
    Equal = 6,
}

impl Strategy {
    pub fn from_number(n: u16) -> Option<Strategy> {
        match n {
            1 => Some(Strategy::Contains),
            2 => Some(Strategy::ContainedIn),
            3 => Some(Strategy::ContainsStrict),
            4 => Some(Strategy::ContainedInStrict),
            5 => Some(Strategy::Overlaps),
            6 => Some(Strategy::Equal),
            _ => None,
        }
    }

    pub fn number(self) -> u16 {
        self as u16
    }
}

/* ---------------------------------- */

/// Stored form of a key entering the tree.
pub fn compress(key: &IpRange) -> Vec<u8> {
    key.pack()
}

/// Working form of a stored key. Only corrupt bytes can fail here.
pub fn decompress(bytes: &[u8]) -> Result<IpRange, AddressError> {
    IpRange::unpack(bytes)
}

/// Index-only scans hand the key back as the value; nothing to rebuild.
pub fn fetch(key: IpRange) -> IpRange {
    key
}

/**
Can the subtree (or leaf) behind `key` hold a match for `query` under
the operator named by `strategy`? Never asks the caller to recheck:
leaf answers are exact, internal answers only err towards `true`.
Unknown strategy numbers answer `false`.
*/
pub fn consistent(key: &IpRange, query: &IpRange, strategy: u16, leaf: bool) -> bool {
    let found: bool = match Strategy::from_number(strategy) {
        None => false,
        Some(op) if leaf => leaf_consistent(key, query, op),
        Some(op) => internal_consistent(key, query, op),
    };
    trace!(
        "consistent: {} s{} {} leaf={} -> {}",
        key,
        strategy,
        query,
        leaf,
        found
    );
    found
}

/// Exact predicate between a stored range and the query.
fn leaf_consistent(key: &IpRange, query: &IpRange, op: Strategy) -> bool {
    match op {
        Strategy::Contains => key.contains(query),
        Strategy::ContainedIn => query.contains(key),
        Strategy::ContainsStrict => key.contains_strict(query),
        Strategy::ContainedInStrict => query.contains_strict(key),
        Strategy::Overlaps => key.overlaps(query),
        Strategy::Equal => key == query,
    }
}

/**
Relaxed predicate between a page bound and the query. Contained-in and
overlap queries degrade to an overlap test and equality to non-strict
containment; only the contains operators keep their strictness. A
universal query under contained-strict matches no page at all.
*/
fn internal_consistent(key: &IpRange, query: &IpRange, op: Strategy) -> bool {
    if query.is_all() && op == Strategy::ContainedInStrict {
        return false;
    }
    if key.is_all() || query.is_all() {
        return true;
    }
    if key.family() != query.family() {
        return false;
    }
    match op {
        Strategy::ContainedIn | Strategy::ContainedInStrict | Strategy::Overlaps => {
            key.overlaps(query)
        }
        Strategy::ContainsStrict => key.contains_strict(query),
        Strategy::Contains | Strategy::Equal => key.contains(query),
    }
}

/* ---------------------------------- */

/**
Minimal bounding key for a page of entries. Mixed families (or any
universal member) escalate the bound to the universal range; a single
entry bounds itself.
*/
pub fn union(entries: &[IpRange]) -> IpRange {
    let (bound, _, _) = page_union(entries);
    trace!("union: {} entries -> {}", entries.len(), bound);
    bound
}

/// Bounding union plus the two flags picksplit steers by: all entries
/// equal, and all entries of one family. The scan stops as soon as the
/// bound reaches the universal range.
fn page_union(entries: &[IpRange]) -> (IpRange, bool, bool) {
    let (first, rest) = match entries.split_first() {
        Some(split) => split,
        None => return (IpRange::All, true, true),
    };
    let mut bound: IpRange = *first;
    let mut allequal: bool = true;
    let mut afequal: bool = true;

    for entry in rest {
        if bound.is_all() {
            break;
        }
        if entry.family() != bound.family() {
            bound = IpRange::All;
            afequal = false;
            allequal = false;
        }
    }
    if !bound.is_all() {
        for entry in rest {
            if allequal && entry != &bound {
                allequal = false;
            }
            bound = bound.union(entry);
        }
    }
    (bound, allequal, afequal)
}

/* ---------------------------------- */

/**
Address count added to `key` by absorbing `new`, as the insertion cost
for choosing a subtree. The cost is the sum of the two gaps outside the
key's bounds rather than a difference of whole-range sizes, which f64
cannot resolve at 128-bit scale. Absorbing the other concrete family
costs a flat `1e10`; a universal range on either side costs nothing.
The v6 gap sum is rescaled as `log2(x + 1)^4`, which tops out around
`2.7e8` for the full address span and so always stays under the
cross-family constant.
*/
pub fn penalty(key: &IpRange, new: &IpRange) -> f32 {
    let cost: f64 = match (key, new) {
        (IpRange::V4(key), IpRange::V4(new)) => {
            let mut gap: f64 = 0.0;
            if new.lower < key.lower {
                gap += f64::from(key.lower.0 - new.lower.0);
            }
            if key.upper < new.upper {
                gap += f64::from(new.upper.0 - key.upper.0);
            }
            gap
        }
        (IpRange::V6(key), IpRange::V6(new)) => {
            let mut gap: f64 = 0.0;
            if new.lower < key.lower {
                gap += (key.lower.to_u128() - new.lower.to_u128()) as f64;
            }
            if key.upper < new.upper {
                gap += (new.upper.to_u128() - key.upper.to_u128()) as f64;
            }
            (gap + 1.0).log2().powi(4)
        }
        (IpRange::V4(_), IpRange::V6(_)) | (IpRange::V6(_), IpRange::V4(_)) => 1e10,
        // one or both sides universal
        _ => 0.0,
    };
    trace!("penalty: {} <- {} = {}", key, new, cost);
    cost as f32
}

/* ---------------------------------- */

/// Page split decision: entry indexes for each side plus the bounding
/// key each side gets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PickSplit {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub left_union: IpRange,
    pub right_union: IpRange,
}

#[derive(Default)]
struct SplitSide {
    list: Vec<usize>,
    bound: Option<IpRange>,
}

impl SplitSide {
    fn push(&mut self, pos: usize, entry: &IpRange) {
        self.bound = Some(match self.bound {
            Some(bound) => bound.union(entry),
            None => *entry,
        });
        self.list.push(pos);
    }

    fn bound_or_all(&self) -> IpRange {
        self.bound.unwrap_or(IpRange::All)
    }
}

/// Which side of the page bound is `cur` nearer to: `Less` means the
/// left (lower) end. Distances are exact unsigned address counts.
fn nearer_side(cur: &IpRange, bound: &IpRange) -> Ordering {
    match (cur, bound) {
        (IpRange::V4(cur), IpRange::V4(bound)) => {
            (cur.upper.0 - bound.lower.0).cmp(&(bound.upper.0 - cur.lower.0))
        }
        (IpRange::V6(cur), IpRange::V6(bound)) => (cur.upper.to_u128() - bound.lower.to_u128())
            .cmp(&(bound.upper.to_u128() - cur.lower.to_u128())),
        _ => Ordering::Equal,
    }
}

/**
Linear-time split of an overfull page, one-dimensional in address
space. Priorities, in order: identical keys split by position; mixed
families split by family (universal entries alone on the right if any,
else v6 on the right, whatever the balance); otherwise each entry goes
to the nearer end of the page bound. If that leaves one side empty,
the entries are dealt out again in ascending size order with exact
distance ties going to whichever side holds fewer.
*/
pub fn picksplit(entries: &[IpRange]) -> PickSplit {
    let (bound, allequal, afequal) = page_union(entries);

    let split: PickSplit = if allequal {
        let half = entries.len() / 2;
        PickSplit {
            left: (0..half).collect(),
            right: (half..entries.len()).collect(),
            left_union: bound,
            right_union: bound,
        }
    } else if !afequal {
        let mut left = SplitSide::default();
        let mut right = SplitSide::default();
        let right_fam: Option<IpFam> = if entries.iter().any(|e| e.is_all()) {
            None
        } else {
            Some(IpFam::V6)
        };

        for (pos, entry) in entries.iter().enumerate() {
            if entry.family() == right_fam {
                right.push(pos, entry);
            } else {
                left.push(pos, entry);
            }
        }
        PickSplit {
            left_union: left.bound_or_all(),
            right_union: right.bound_or_all(),
            left: left.list,
            right: right.list,
        }
    } else {
        let mut left = SplitSide::default();
        let mut right = SplitSide::default();

        for (pos, entry) in entries.iter().enumerate() {
            if nearer_side(entry, &bound) == Ordering::Less {
                left.push(pos, entry);
            } else {
                right.push(pos, entry);
            }
        }

        // everything fell on one side: deal the entries out again by
        // ascending size, ties to whichever side is thinner
        if left.list.is_empty() || right.list.is_empty() {
            let mut order: Vec<usize> = (0..entries.len()).collect();
            order.sort_by(|&a, &b| entries[a].size().total_cmp(&entries[b].size()));

            left = SplitSide::default();
            right = SplitSide::default();

            for pos in order {
                let entry = &entries[pos];
                match nearer_side(entry, &bound) {
                    Ordering::Less => left.push(pos, entry),
                    Ordering::Greater => right.push(pos, entry),
                    Ordering::Equal if left.list.len() > right.list.len() => {
                        right.push(pos, entry);
                    }
                    Ordering::Equal => left.push(pos, entry),
                }
            }
        }

        PickSplit {
            left_union: left.bound_or_all(),
            right_union: right.bound_or_all(),
            left: left.list,
            right: right.list,
        }
    };

    trace!(
        "picksplit: {} entries -> {}/{}",
        entries.len(),
        split.left.len(),
        split.right.len()
    );
    split
}

/* ---------------------------------- */

/// Structural key equality; the universal range only equals itself.
pub fn same(a: &IpRange, b: &IpRange) -> bool {
    a == b
}

/* ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ALL_VS_ALL: [bool; 6] = [true, true, false, false, true, true];
    const KEY_ALL_VS_V4: [bool; 6] = [true, false, true, false, true, false];
    const KEY_V4_VS_ALL: [bool; 6] = [false, true, false, true, true, false];

    fn r(s: &str) -> IpRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_strategy_numbers() {
        for n in 1..=6u16 {
            let op = Strategy::from_number(n).unwrap();
            assert_eq!(op.number(), n);
        }
        assert_eq!(Strategy::from_number(3), Some(Strategy::ContainsStrict));
        assert_eq!(Strategy::from_number(0), None);
        assert_eq!(Strategy::from_number(7), None);
    }

    #[test]
    fn test_unknown_strategy_is_false() {
        let key = r("10.0.0.0/8");
        for strategy in [0u16, 7, 40] {
            assert!(!consistent(&key, &key, strategy, true));
            assert!(!consistent(&key, &key, strategy, false));
        }
    }

    #[test]
    fn test_leaf_consistent_same_family() {
        let key = r("10.0.0.0/8");
        let sub = r("10.1.0.0/16");
        let over = r("10.128.0.0-11.0.0.0");
        let apart = r("192.168.0.0/16");

        assert!(consistent(&key, &sub, 1, true));
        assert!(consistent(&key, &sub, 3, true));
        assert!(!consistent(&key, &key, 3, true));
        assert!(consistent(&sub, &key, 2, true));
        assert!(consistent(&sub, &key, 4, true));
        assert!(consistent(&key, &key, 6, true));
        assert!(!consistent(&key, &sub, 6, true));
        assert!(consistent(&key, &over, 5, true));
        assert!(!consistent(&key, &over, 1, true));
        assert!(!consistent(&key, &apart, 5, true));
        assert!(!consistent(&key, &r("2001:db8::/32"), 5, true));
    }

    #[test]
    fn test_leaf_consistent_universal_tables() {
        let all = IpRange::All;
        let v4 = r("10.0.0.0/8");

        for (i, expect) in KEY_ALL_VS_ALL.iter().enumerate() {
            let s = i as u16 + 1;
            assert_eq!(consistent(&all, &all, s, true), *expect, "all/all s{s}");
        }
        for (i, expect) in KEY_ALL_VS_V4.iter().enumerate() {
            let s = i as u16 + 1;
            assert_eq!(consistent(&all, &v4, s, true), *expect, "all/v4 s{s}");
        }
        for (i, expect) in KEY_V4_VS_ALL.iter().enumerate() {
            let s = i as u16 + 1;
            assert_eq!(consistent(&v4, &all, s, true), *expect, "v4/all s{s}");
        }
    }

    #[test]
    fn test_internal_consistent_relaxation() {
        let page = r("10.1.0.0/16");
        let query = r("10.0.0.0/8");

        // a page key inside the query region can still hold matches
        assert!(consistent(&page, &query, 2, false));
        assert!(consistent(&page, &query, 4, false));
        assert!(consistent(&page, &query, 5, false));
        // containment stays exact, strictness included
        assert!(!consistent(&page, &query, 1, false));
        assert!(!consistent(&page, &query, 3, false));
        assert!(consistent(&query, &page, 3, false));
        assert!(!consistent(&page, &page, 3, false));
        // equality degrades to non-strict containment
        assert!(consistent(&query, &page, 6, false));
        assert!(consistent(&page, &page, 6, false));
        assert!(!consistent(&page, &r("192.168.0.0/24"), 5, false));
        assert!(!consistent(&page, &r("2001:db8::/32"), 5, false));
    }

    #[test]
    fn test_internal_consistent_universal() {
        let all = IpRange::All;
        let v4 = r("10.0.0.0/8");

        // a universal query matches no page under contained-strict
        for strategy in 1..=6u16 {
            let expect = strategy != 4;
            assert_eq!(consistent(&v4, &all, strategy, false), expect, "s{strategy}");
            assert_eq!(consistent(&all, &all, strategy, false), expect, "s{strategy}");
        }
        // a universal page bound can hold anything
        for strategy in 1..=6u16 {
            assert!(consistent(&all, &v4, strategy, false), "s{strategy}");
        }
    }

    #[test]
    fn test_union_bounds() {
        assert_eq!(union(&[]), IpRange::All);
        assert_eq!(union(&[r("10.0.0.0/8")]), r("10.0.0.0/8"));
        assert_eq!(
            union(&[r("10.0.0.0/8"), r("10.64.0.0-11.0.0.0"), r("10.2.3.4")]),
            r("10.0.0.0-11.0.0.0")
        );
        assert_eq!(union(&[r("10.0.0.0/8"), r("2001:db8::/32")]), IpRange::All);
        assert_eq!(union(&[r("10.0.0.0/8"), IpRange::All]), IpRange::All);
    }

    #[test]
    fn test_page_union_flags() {
        let v4 = r("10.0.0.0/8");

        let (bound, allequal, afequal) = page_union(&[v4, v4, v4]);
        assert_eq!(bound, v4);
        assert!(allequal && afequal);

        let (bound, allequal, afequal) = page_union(&[v4, r("10.0.0.0/9")]);
        assert_eq!(bound, v4);
        assert!(!allequal && afequal);

        let (bound, allequal, afequal) = page_union(&[v4, r("::/64")]);
        assert_eq!(bound, IpRange::All);
        assert!(!allequal && !afequal);

        // a universal first entry ends the family scan before it starts
        let (bound, allequal, _) = page_union(&[IpRange::All, v4]);
        assert_eq!(bound, IpRange::All);
        assert!(allequal);
    }

    #[test]
    fn test_penalty_v4_gap_sum() {
        let key = r("10.0.0.10-10.0.0.19");
        assert_eq!(penalty(&key, &key), 0.0);
        assert_eq!(penalty(&key, &r("10.0.0.12-10.0.0.15")), 0.0);
        assert_eq!(penalty(&key, &r("10.0.0.0-10.0.0.29")), 20.0);
        assert_eq!(penalty(&key, &r("10.0.0.10-10.0.0.119")), 100.0);
        assert!(penalty(&key, &r("10.0.0.0/8")) > penalty(&key, &r("10.0.0.0/24")));
    }

    #[test]
    fn test_penalty_v6_rescale() {
        let key = r("2001:db8::10-2001:db8::1f");
        assert_eq!(penalty(&key, &key), 0.0);
        // gaps of 15 below and 16 above: log2(31 + 1)^4
        assert_eq!(penalty(&key, &r("2001:db8::1-2001:db8::2f")), 625.0);
        // gap of 15 below only: log2(16)^4
        assert_eq!(penalty(&key, &r("2001:db8::1-2001:db8::1f")), 256.0);
        assert!(penalty(&key, &r("::/0")) < 1e10);
    }

    #[test]
    fn test_penalty_family_mixes() {
        let v4 = r("10.0.0.0/8");
        let v6 = r("2001:db8::/32");
        assert_eq!(penalty(&v4, &v6), 1e10);
        assert_eq!(penalty(&v6, &v4), 1e10);
        assert_eq!(penalty(&IpRange::All, &v4), 0.0);
        assert_eq!(penalty(&v6, &IpRange::All), 0.0);
        assert_eq!(penalty(&IpRange::All, &IpRange::All), 0.0);
    }

    #[test]
    fn test_picksplit_identical_keys() {
        let key = r("10.0.0.0/8");
        let split = picksplit(&[key, key, key, key, key]);
        assert_eq!(split.left, vec![0, 1]);
        assert_eq!(split.right, vec![2, 3, 4]);
        assert_eq!(split.left_union, key);
        assert_eq!(split.right_union, key);
    }

    #[test]
    fn test_picksplit_separates_families() {
        let v4a = r("10.0.0.0/8");
        let v4b = r("192.168.0.0/16");
        let v6 = r("2001:db8::/32");

        let split = picksplit(&[v4a, v6, v4b]);
        assert_eq!(split.left, vec![0, 2]);
        assert_eq!(split.right, vec![1]);
        assert_eq!(split.left_union, r("10.0.0.0-192.168.255.255"));
        assert_eq!(split.right_union, v6);

        // universal entries outrank v6 for the right page
        let split = picksplit(&[v4a, IpRange::All, v6]);
        assert_eq!(split.left, vec![0, 2]);
        assert_eq!(split.right, vec![1]);
        assert_eq!(split.left_union, IpRange::All);
        assert_eq!(split.right_union, IpRange::All);
    }

    #[test]
    fn test_picksplit_nearer_side() {
        let low = r("0.0.0.0/24");
        let also_low = r("0.0.1.0/24");
        let high = r("255.255.255.0-255.255.255.255");

        let split = picksplit(&[low, high, also_low]);
        assert_eq!(split.left, vec![0, 2]);
        assert_eq!(split.right, vec![1]);
        assert_eq!(split.left_union, r("0.0.0.0/23"));
        assert_eq!(split.right_union, high);
    }

    #[test]
    fn test_picksplit_degenerate_resort() {
        // both entries sit nearer the right end of the bound, so the
        // first pass empties the left side
        let wide = r("10.0.0.50-10.0.0.100");
        let narrow = r("10.0.0.60-10.0.0.100");

        let split = picksplit(&[wide, narrow]);
        assert_eq!(split.left, vec![0]);
        assert_eq!(split.right, vec![1]);
        assert_eq!(split.left_union, wide);
        assert_eq!(split.right_union, narrow);
    }

    #[test]
    fn test_picksplit_small_pages() {
        let split = picksplit(&[]);
        assert!(split.left.is_empty() && split.right.is_empty());

        let one = r("10.0.0.0/8");
        let split = picksplit(&[one]);
        assert!(split.left.is_empty());
        assert_eq!(split.right, vec![0]);
        assert_eq!(split.left_union, one);
        assert_eq!(split.right_union, one);
    }

    #[test]
    fn test_storage_adapters() {
        for s in ["-", "10.0.0.0/8", "fe80::1-fe80::4", "::/64"] {
            let key = r(s);
            assert_eq!(decompress(&compress(&key)).unwrap(), key, "{s}");
            assert_eq!(fetch(key), key);
        }
        assert!(decompress(&[0u8; 5]).is_err());

        assert!(same(&r("10.0.0.0/8"), &r("10.0.0.0/8")));
        assert!(same(&IpRange::All, &IpRange::All));
        assert!(!same(&IpRange::All, &r("10.0.0.0/8")));
        assert!(!same(&r("::/0"), &IpRange::All));
    }
}
