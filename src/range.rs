// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Family-generic wrappers: [Ip] unifies the two address families into
//! one ordered value, [IpRange] adds the universal range on top and
//! carries the mixed-family set algebra the index layer works on.

use crate::{
    ip4::{CidrSplit4, Ip4, Ip4r},
    ip6::{CidrSplit6, Ip6, Ip6r},
    strings::*,
    AddressError, IPV4_BITS, IPV6_BITS,
};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use lazy_static::lazy_static;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    ops,
    str::FromStr,
};

lazy_static! {
    /// 2^129, the address count reported for the unconstrained range.
    static ref ALL_SIZE: BigUint = BigUint::from(1u8) << 129u32;
}

/// IP address family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum IpFam {
    V4,
    V6,
}

/* ---------------------------------- */

/// Either-family IP address. The derived order puts every IPv4 address
/// before every IPv6 address; equality across families is always false.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ip {
    V4(Ip4),
    V6(Ip6),
}

impl Ip {
    pub fn family(&self) -> IpFam {
        match self {
            Ip::V4(_) => IpFam::V4,
            Ip::V6(_) => IpFam::V6,
        }
    }

    /// Address width in bits: 32 or 128.
    pub fn bits(&self) -> u8 {
        match self {
            Ip::V4(_) => IPV4_BITS,
            Ip::V6(_) => IPV6_BITS,
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, Ip::V4(_))
    }

    pub fn is_v6(&self) -> bool {
        matches!(self, Ip::V6(_))
    }

    /// Add a signed offset within the family's address space.
    pub fn add_i64(self, addend: i64) -> Result<Ip, AddressError> {
        match self {
            Ip::V4(ip) => Ok(Ip::V4(ip.add_i64(addend)?)),
            Ip::V6(ip) => Ok(Ip::V6(ip.add_i64(addend)?)),
        }
    }

    /// Subtract a signed offset within the family's address space.
    pub fn sub_i64(self, subtrahend: i64) -> Result<Ip, AddressError> {
        match self {
            Ip::V4(ip) => Ok(Ip::V4(ip.sub_i64(subtrahend)?)),
            Ip::V6(ip) => Ok(Ip::V6(ip.sub_i64(subtrahend)?)),
        }
    }

    /// Signed difference between two same-family addresses.
    pub fn diff(self, other: Ip) -> Result<BigInt, AddressError> {
        match (self, other) {
            (Ip::V4(a), Ip::V4(b)) => Ok(BigInt::from(a.diff(b))),
            (Ip::V6(a), Ip::V6(b)) => Ok(a.diff(b)),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }

    pub fn and(self, other: Ip) -> Result<Ip, AddressError> {
        match (self, other) {
            (Ip::V4(a), Ip::V4(b)) => Ok(Ip::V4(a & b)),
            (Ip::V6(a), Ip::V6(b)) => Ok(Ip::V6(a & b)),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }

    pub fn or(self, other: Ip) -> Result<Ip, AddressError> {
        match (self, other) {
            (Ip::V4(a), Ip::V4(b)) => Ok(Ip::V4(a | b)),
            (Ip::V6(a), Ip::V6(b)) => Ok(Ip::V6(a | b)),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }

    pub fn xor(self, other: Ip) -> Result<Ip, AddressError> {
        match (self, other) {
            (Ip::V4(a), Ip::V4(b)) => Ok(Ip::V4(a ^ b)),
            (Ip::V6(a), Ip::V6(b)) => Ok(Ip::V6(a ^ b)),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }
}

impl ops::Not for Ip {
    type Output = Ip;
    fn not(self) -> Ip {
        match self {
            Ip::V4(ip) => Ip::V4(!ip),
            Ip::V6(ip) => Ip::V6(!ip),
        }
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ip::V4(ip) => ip.fmt(f),
            Ip::V6(ip) => ip.fmt(f),
        }
    }
}

impl FromStr for Ip {
    type Err = AddressError;

    /// Text with a `:` anywhere parses as IPv6, anything else as IPv4.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(COLON) {
            Ok(Ip::V6(s.parse()?))
        } else {
            Ok(Ip::V4(s.parse()?))
        }
    }
}

impl From<Ip4> for Ip {
    fn from(ip: Ip4) -> Ip {
        Ip::V4(ip)
    }
}

impl From<Ip6> for Ip {
    fn from(ip: Ip6) -> Ip {
        Ip::V6(ip)
    }
}

impl From<IpAddr> for Ip {
    fn from(addr: IpAddr) -> Ip {
        match addr {
            IpAddr::V4(a) => Ip::V4(Ip4::from(a)),
            IpAddr::V6(a) => Ip::V6(Ip6::from(a)),
        }
    }
}

impl From<Ip> for IpAddr {
    fn from(ip: Ip) -> IpAddr {
        match ip {
            Ip::V4(a) => IpAddr::V4(Ipv4Addr::from(a)),
            Ip::V6(a) => IpAddr::V6(Ipv6Addr::from(a)),
        }
    }
}

/* -------------------------------------------------------------------------- */

/// Either-family address range, or the universal range spanning both
/// families. [IpRange::All] is what mixed-family unions escalate to;
/// its text form is `-`. The derived order is `All < V4 < V6`, then
/// `(lower, upper)` within a family.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IpRange {
    /// every address of either family
    All,
    V4(Ip4r),
    V6(Ip6r),
}

impl IpRange {
    /// Create a range from ordered same-family bounds.
    pub fn new(lower: Ip, upper: Ip) -> Result<IpRange, AddressError> {
        match (lower, upper) {
            (Ip::V4(a), Ip::V4(b)) => Ok(IpRange::V4(Ip4r::new(a, b)?)),
            (Ip::V6(a), Ip::V6(b)) => Ok(IpRange::V6(Ip6r::new(a, b)?)),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }

    /// Create a range from two same-family endpoints in either order.
    pub fn between(a: Ip, b: Ip) -> Result<IpRange, AddressError> {
        match (a, b) {
            (Ip::V4(x), Ip::V4(y)) => Ok(IpRange::V4(Ip4r::between(x, y))),
            (Ip::V6(x), Ip::V6(y)) => Ok(IpRange::V6(Ip6r::between(x, y))),
            (a, b) => Err(AddressError::Mismatch(a, b)),
        }
    }

    /// The CIDR block `prefix/len` in the prefix's family.
    pub fn from_cidr(prefix: Ip, len: u8) -> Result<IpRange, AddressError> {
        match prefix {
            Ip::V4(p) => Ok(IpRange::V4(Ip4r::from_cidr(p, len)?)),
            Ip::V6(p) => Ok(IpRange::V6(Ip6r::from_cidr(p, len)?)),
        }
    }

    /// The `/len` network around `addr`.
    pub fn net_prefix(addr: Ip, len: u8) -> Result<IpRange, AddressError> {
        match addr {
            Ip::V4(a) => Ok(IpRange::V4(Ip4r::net_prefix(a, len)?)),
            Ip::V6(a) => Ok(IpRange::V6(Ip6r::net_prefix(a, len)?)),
        }
    }

    /// The network around `addr` given a same-family netmask.
    pub fn net_mask(addr: Ip, mask: Ip) -> Result<IpRange, AddressError> {
        match (addr, mask) {
            (Ip::V4(a), Ip::V4(m)) => Ok(IpRange::V4(Ip4r::net_mask(a, m)?)),
            (Ip::V6(a), Ip::V6(m)) => Ok(IpRange::V6(Ip6r::net_mask(a, m)?)),
            (a, m) => Err(AddressError::Mismatch(a, m)),
        }
    }

    /// Concrete family of the range; [IpRange::All] has none.
    pub fn family(&self) -> Option<IpFam> {
        match self {
            IpRange::All => None,
            IpRange::V4(_) => Some(IpFam::V4),
            IpRange::V6(_) => Some(IpFam::V6),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, IpRange::All)
    }

    /// Lowest address; for `All` the bottom of the total order.
    pub fn lower(&self) -> Ip {
        match self {
            IpRange::All => Ip::V4(Ip4(0)),
            IpRange::V4(r) => Ip::V4(r.lower),
            IpRange::V6(r) => Ip::V6(r.lower),
        }
    }

    /// Highest address; for `All` the top of the total order.
    pub fn upper(&self) -> Ip {
        match self {
            IpRange::All => Ip::V6(Ip6 {
                hi: u64::MAX,
                lo: u64::MAX,
            }),
            IpRange::V4(r) => Ip::V4(r.upper),
            IpRange::V6(r) => Ip::V6(r.upper),
        }
    }

    /// Prefix length if the range is exactly one CIDR block of one
    /// family; never for `All`.
    pub fn masklen(&self) -> Option<u8> {
        match self {
            IpRange::All => None,
            IpRange::V4(r) => r.masklen(),
            IpRange::V6(r) => r.masklen(),
        }
    }

    pub fn is_cidr(&self) -> bool {
        self.masklen().is_some()
    }

    /// `All` contains everything; a concrete family contains nothing of
    /// the other family and never `All`.
    pub fn contains(&self, other: &IpRange) -> bool {
        match (self, other) {
            (IpRange::All, _) => true,
            (_, IpRange::All) => false,
            (IpRange::V4(a), IpRange::V4(b)) => a.contains(b),
            (IpRange::V6(a), IpRange::V6(b)) => a.contains(b),
            _ => false,
        }
    }

    pub fn contains_strict(&self, other: &IpRange) -> bool {
        match (self, other) {
            (IpRange::All, IpRange::All) => false,
            (IpRange::All, _) => true,
            (_, IpRange::All) => false,
            (IpRange::V4(a), IpRange::V4(b)) => a.contains_strict(b),
            (IpRange::V6(a), IpRange::V6(b)) => a.contains_strict(b),
            _ => false,
        }
    }

    pub fn contains_addr(&self, addr: Ip) -> bool {
        match (self, addr) {
            (IpRange::All, _) => true,
            (IpRange::V4(r), Ip::V4(a)) => r.contains_addr(a),
            (IpRange::V6(r), Ip::V6(a)) => r.contains_addr(a),
            _ => false,
        }
    }

    /// `All` overlaps everything; concrete ranges of different families
    /// never overlap.
    pub fn overlaps(&self, other: &IpRange) -> bool {
        match (self, other) {
            (IpRange::All, _) | (_, IpRange::All) => true,
            (IpRange::V4(a), IpRange::V4(b)) => a.overlaps(b),
            (IpRange::V6(a), IpRange::V6(b)) => a.overlaps(b),
            _ => false,
        }
    }

    /// Smallest range covering both inputs; any family mixture escalates
    /// to [IpRange::All].
    pub fn union(&self, other: &IpRange) -> IpRange {
        match (self, other) {
            (IpRange::V4(a), IpRange::V4(b)) => IpRange::V4(a.union(b)),
            (IpRange::V6(a), IpRange::V6(b)) => IpRange::V6(a.union(b)),
            _ => IpRange::All,
        }
    }

    /// Overlapping part of the two ranges. [IpRange::All] is the
    /// identity; disjoint ranges (including mixed concrete families)
    /// yield `None`.
    pub fn intersect(&self, other: &IpRange) -> Option<IpRange> {
        match (self, other) {
            (IpRange::All, r) | (r, IpRange::All) => Some(*r),
            (IpRange::V4(a), IpRange::V4(b)) => a.intersect(b).map(IpRange::V4),
            (IpRange::V6(a), IpRange::V6(b)) => a.intersect(b).map(IpRange::V6),
            _ => None,
        }
    }

    /// Number of addresses as a float; the unconstrained range reports
    /// 2^129.
    pub fn size(&self) -> f64 {
        match self {
            IpRange::All => 2f64.powi(129),
            IpRange::V4(r) => r.size(),
            IpRange::V6(r) => r.size(),
        }
    }

    /// Number of addresses, exactly.
    pub fn size_exact(&self) -> BigUint {
        match self {
            IpRange::All => ALL_SIZE.clone(),
            IpRange::V4(r) => r.size_exact(),
            IpRange::V6(r) => r.size_exact(),
        }
    }

    /// Decompose into minimal CIDR blocks; [IpRange::All] yields the
    /// two family-wide blocks.
    pub fn cidr_split(self) -> CidrSplit {
        CidrSplit {
            state: match self {
                IpRange::All => SplitState::All4,
                IpRange::V4(r) => SplitState::V4(r.cidr_split()),
                IpRange::V6(r) => SplitState::V6(r.cidr_split()),
            },
        }
    }
}

impl From<Ip4r> for IpRange {
    fn from(range: Ip4r) -> IpRange {
        IpRange::V4(range)
    }
}

impl From<Ip6r> for IpRange {
    fn from(range: Ip6r) -> IpRange {
        IpRange::V6(range)
    }
}

impl From<Ip> for IpRange {
    /// Degenerate single-address range.
    fn from(ip: Ip) -> IpRange {
        match ip {
            Ip::V4(a) => IpRange::V4(Ip4r::from(a)),
            Ip::V6(a) => IpRange::V6(Ip6r::from(a)),
        }
    }
}

impl From<IpAddr> for IpRange {
    fn from(addr: IpAddr) -> IpRange {
        IpRange::from(Ip::from(addr))
    }
}

impl From<IpNet> for IpRange {
    fn from(net: IpNet) -> IpRange {
        match net {
            IpNet::V4(n) => IpRange::V4(Ip4r::from(n)),
            IpNet::V6(n) => IpRange::V6(Ip6r::from(n)),
        }
    }
}

impl TryFrom<IpRange> for IpNet {
    type Error = AddressError;

    /// Only single-family CIDR-shaped ranges convert to a network.
    fn try_from(range: IpRange) -> Result<IpNet, AddressError> {
        match range {
            IpRange::All => Err(AddressError::Misaligned(range.to_string())),
            IpRange::V4(r) => Ok(IpNet::V4(Ipv4Net::try_from(r)?)),
            IpRange::V6(r) => Ok(IpNet::V6(Ipv6Net::try_from(r)?)),
        }
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpRange::All => f.write_str(DASH),
            IpRange::V4(r) => r.fmt(f),
            IpRange::V6(r) => r.fmt(f),
        }
    }
}

impl FromStr for IpRange {
    type Err = AddressError;

    /// The exact string `-` is the universal range; text with a `:`
    /// anywhere parses as an IPv6 range, anything else as IPv4.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DASH {
            return Ok(IpRange::All);
        }
        if s.contains(COLON) {
            Ok(IpRange::V6(s.parse()?))
        } else {
            Ok(IpRange::V4(s.parse()?))
        }
    }
}

/* ---------------------------------- */

/// Iterator over the CIDR decomposition of an [IpRange].
pub struct CidrSplit {
    state: SplitState,
}

enum SplitState {
    All4,
    All6,
    V4(CidrSplit4),
    V6(CidrSplit6),
    Done,
}

impl Iterator for CidrSplit {
    type Item = IpRange;

    fn next(&mut self) -> Option<IpRange> {
        match &mut self.state {
            SplitState::All4 => {
                self.state = SplitState::All6;
                Some(IpRange::V4(Ip4r {
                    lower: Ip4(0),
                    upper: Ip4(u32::MAX),
                }))
            }
            SplitState::All6 => {
                self.state = SplitState::Done;
                Some(IpRange::V6(Ip6r {
                    lower: Ip6 { hi: 0, lo: 0 },
                    upper: Ip6 {
                        hi: u64::MAX,
                        lo: u64::MAX,
                    },
                }))
            }
            SplitState::V4(it) => it.next().map(IpRange::V4),
            SplitState::V6(it) => it.next().map(IpRange::V6),
            SplitState::Done => None,
        }
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = "-";
    const NET_V4: &str = "10.0.0.0/8";
    const NET_V6: &str = "2001:db8::/32";

    fn r(s: &str) -> IpRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(r(ALL), IpRange::All);
        assert_eq!(IpRange::All.to_string(), ALL);
        assert!(matches!(r(NET_V4), IpRange::V4(_)));
        assert!(matches!(r(NET_V6), IpRange::V6(_)));
        assert_eq!(r(NET_V4).to_string(), NET_V4);
        assert_eq!(r(NET_V6).to_string(), NET_V6);
        assert_eq!(r("::1-::2").to_string(), "::1-::2");
        assert!("".parse::<IpRange>().is_err());
        assert!("--".parse::<IpRange>().is_err());
        assert!("10.0.0.0/8/1".parse::<IpRange>().is_err());
    }

    #[test]
    fn test_union_escalation() {
        assert_eq!(
            r(NET_V4).union(&r("11.0.0.0/8")),
            r("10.0.0.0-11.255.255.255")
        );
        assert_eq!(r(NET_V4).union(&r(NET_V6)), IpRange::All);
        assert_eq!(IpRange::All.union(&r(NET_V4)), IpRange::All);
        assert_eq!(IpRange::All.union(&IpRange::All), IpRange::All);
    }

    #[test]
    fn test_intersection_policies() {
        assert_eq!(IpRange::All.intersect(&r(NET_V4)), Some(r(NET_V4)));
        assert_eq!(r(NET_V6).intersect(&IpRange::All), Some(r(NET_V6)));
        assert_eq!(IpRange::All.intersect(&IpRange::All), Some(IpRange::All));
        assert_eq!(r(NET_V4).intersect(&r(NET_V6)), None);
        assert_eq!(
            r(NET_V4).intersect(&r("10.1.0.0/16")),
            Some(r("10.1.0.0/16"))
        );
        assert_eq!(r(NET_V4).intersect(&r("11.0.0.0/8")), None);
    }

    #[test]
    fn test_containment_policies() {
        assert!(IpRange::All.contains(&r(NET_V4)));
        assert!(IpRange::All.contains(&r(NET_V6)));
        assert!(IpRange::All.contains(&IpRange::All));
        assert!(IpRange::All.contains_strict(&r(NET_V6)));
        assert!(!IpRange::All.contains_strict(&IpRange::All));
        assert!(!r(NET_V4).contains(&IpRange::All));
        assert!(!r(NET_V4).contains(&r(NET_V6)));
        assert!(r(NET_V4).contains(&r("10.1.0.0/16")));
        assert!(IpRange::All.contains_addr("1.2.3.4".parse().unwrap()));
        assert!(IpRange::All.contains_addr("::1".parse().unwrap()));
        assert!(!r(NET_V4).contains_addr("::1".parse().unwrap()));
    }

    #[test]
    fn test_overlap_policies() {
        assert!(IpRange::All.overlaps(&r(NET_V4)));
        assert!(r(NET_V6).overlaps(&IpRange::All));
        assert!(!r(NET_V4).overlaps(&r(NET_V6)));
        assert!(r(NET_V4).overlaps(&r("10.255.0.0-11.0.0.0")));
    }

    #[test]
    fn test_universal_extremes() {
        assert_eq!(IpRange::All.lower(), Ip::V4(Ip4(0)));
        assert_eq!(
            IpRange::All.upper(),
            Ip::V6(Ip6 {
                hi: u64::MAX,
                lo: u64::MAX
            })
        );
        assert_eq!(IpRange::All.masklen(), None);
        assert!(!IpRange::All.is_cidr());
        assert_eq!(IpRange::All.family(), None);
        assert_eq!(r(NET_V4).family(), Some(IpFam::V4));
        assert_eq!(r(NET_V6).family(), Some(IpFam::V6));
    }

    #[test]
    fn test_total_order() {
        assert!(IpRange::All < r("0.0.0.0/0"));
        assert!(r("255.255.255.255") < r("::"));
        assert!(r(NET_V4) < r(NET_V6));
        assert!(Ip::V4(Ip4(u32::MAX)) < Ip::V6(Ip6 { hi: 0, lo: 0 }));
    }

    #[test]
    fn test_size_of_universal() {
        assert_eq!(IpRange::All.size(), 2f64.powi(129));
        assert_eq!(IpRange::All.size_exact(), BigUint::from(1u8) << 129u32);
        assert_eq!(r(NET_V4).size(), f64::from(1u32 << 24));
    }

    #[test]
    fn test_split_universal() {
        let parts: Vec<String> = IpRange::All.cidr_split().map(|p| p.to_string()).collect();
        assert_eq!(parts, ["0.0.0.0/0", "::/0"]);
        let parts: Vec<IpRange> = r("10.0.0.1-10.0.0.4").cidr_split().collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.is_cidr()));
        let parts: Vec<IpRange> = r(NET_V6).cidr_split().collect();
        assert_eq!(parts, vec![r(NET_V6)]);
    }

    #[test]
    fn test_generic_address_ops() {
        let a: Ip = "10.0.0.1".parse().unwrap();
        let b: Ip = "::1".parse().unwrap();
        assert_eq!(a.family(), IpFam::V4);
        assert_eq!(b.bits(), 128);
        assert!(a.is_v4() && b.is_v6());
        assert_eq!(a.add_i64(4).unwrap().to_string(), "10.0.0.5");
        assert_eq!(b.sub_i64(1).unwrap().to_string(), "::");
        assert!(a.diff(b).is_err());
        assert_eq!(
            a.diff("10.0.0.3".parse().unwrap()).unwrap(),
            BigInt::from(-2)
        );
        assert!(matches!(a.and(b), Err(AddressError::Mismatch(_, _))));
        let mask: Ip = "255.0.0.0".parse().unwrap();
        assert_eq!(a.and(mask).unwrap().to_string(), "10.0.0.0");
        assert_eq!(a.or(!mask).unwrap().to_string(), "10.255.255.255");
        assert_eq!((!mask).to_string(), "0.255.255.255");
    }

    #[test]
    fn test_constructors_cross_family() {
        let v4: Ip = "10.0.0.1".parse().unwrap();
        let v6: Ip = "::1".parse().unwrap();
        assert!(matches!(
            IpRange::new(v4, v6),
            Err(AddressError::Mismatch(_, _))
        ));
        assert!(IpRange::between(v6, v4).is_err());
        assert_eq!(
            IpRange::between("10.0.0.9".parse().unwrap(), "10.0.0.1".parse().unwrap()).unwrap(),
            r("10.0.0.1-10.0.0.9")
        );
        assert_eq!(
            IpRange::from_cidr("10.0.0.0".parse().unwrap(), 8).unwrap(),
            r(NET_V4)
        );
        assert_eq!(
            IpRange::net_prefix(v4, 8).unwrap(),
            r(NET_V4)
        );
        assert_eq!(
            IpRange::net_mask(v4, "255.0.0.0".parse().unwrap()).unwrap(),
            r(NET_V4)
        );
        assert!(IpRange::net_mask(v4, "ffff::".parse().unwrap()).is_err());
        assert_eq!(IpRange::from(v6), r("::1"));
    }

    #[test]
    fn test_std_interop() {
        let addr: IpAddr = "10.0.0.1".parse().unwrap();
        assert_eq!(Ip::from(addr).to_string(), "10.0.0.1");
        assert_eq!(
            IpAddr::from(Ip::V6(Ip6 { hi: 0, lo: 1 })),
            "::1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(IpRange::from(addr), r("10.0.0.1"));
        let net: IpNet = "2001:db8::/32".parse().unwrap();
        assert_eq!(IpRange::from(net), r(NET_V6));
        assert_eq!(IpNet::try_from(r(NET_V6)).unwrap(), net);
        assert!(IpNet::try_from(IpRange::All).is_err());
    }
}
