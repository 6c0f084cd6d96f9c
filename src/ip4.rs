// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv4 address and range algebra over plain `u32` values: contiguous
//! masks, CIDR detection, containment/overlap/union/intersection, greedy
//! CIDR decomposition, checked arithmetic and window framing.

use crate::{
    range::Ip,
    raw::{format_ipv4, parse_ipv4},
    strings::*,
    AddressError, IPV4_BITS,
};
use ipnet::Ipv4Net;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::{fmt, net::Ipv4Addr, ops, str::FromStr};

/// low `32-len` bits set; `hostmask(0)` is all ones
pub(crate) fn hostmask(len: u8) -> u32 {
    if len == 0 {
        return u32::MAX;
    }
    (1u32 << (32 - len)) - 1
}

pub(crate) fn netmask(len: u8) -> u32 {
    !hostmask(len)
}

/**
Prefix length of `[lo, hi]` if the pair spans exactly one CIDR block.

`d = (lo ^ hi) + 1` is 0 when all bits differ, 1 when the bounds are
equal, and `1 << (32 - len)` for a CIDR candidate; any candidate still
has to recheck that `lo` has the host bits clear and `hi` has them set,
since other non-CIDR pairs can produce the same `d`.
*/
pub(crate) fn masklen(lo: u32, hi: u32) -> Option<u8> {
    let d: u32 = (lo ^ hi).wrapping_add(1);
    match d {
        0 => (lo == 0 && hi == u32::MAX).then_some(0),
        1 => (lo == hi).then_some(IPV4_BITS),
        _ => {
            if !d.is_power_of_two() {
                return None;
            }
            let len = IPV4_BITS - d.trailing_zeros() as u8;
            let mask = d - 1;
            ((lo & mask) == 0 && (hi & mask) == mask).then_some(len)
        }
    }
}

/* ---------------------------------- */

/// IPv4 address as its 32-bit numeric value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ip4(pub u32);

impl Ip4 {
    /// Netmask of the given prefix length, e.g. `/8` -> `255.0.0.0`.
    pub fn netmask(len: u8) -> Result<Ip4, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip4(netmask(len)))
    }

    /// Hostmask of the given prefix length, e.g. `/8` -> `0.255.255.255`.
    pub fn hostmask(len: u8) -> Result<Ip4, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip4(hostmask(len)))
    }

    /// Whether the value is a contiguous netmask (`255.255.0.0` yes,
    /// `255.0.255.0` no).
    pub fn is_netmask(self) -> bool {
        let d: u32 = (!self.0).wrapping_add(1);
        d == 0 || d.is_power_of_two()
    }

    /// Whether the value is a contiguous hostmask (`0.0.0.255` yes).
    pub fn is_hostmask(self) -> bool {
        let d: u32 = self.0.wrapping_add(1);
        d == 0 || d.is_power_of_two()
    }

    /// First address of the enclosing `/len` network.
    pub fn net_lower(self, len: u8) -> Result<Ip4, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip4(self.0 & netmask(len)))
    }

    /// Last address of the enclosing `/len` network.
    pub fn net_upper(self, len: u8) -> Result<Ip4, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip4(self.0 | hostmask(len)))
    }

    /// Add a signed offset, failing if the result leaves 32-bit space.
    pub fn add_i32(self, addend: i32) -> Result<Ip4, AddressError> {
        let result = Ip4(self.0.wrapping_add(addend as u32));
        if (addend < 0) != (result < self) {
            return Err(AddressError::OutOfRange);
        }
        Ok(result)
    }

    /// Subtract a signed offset, failing if the result leaves 32-bit space.
    pub fn sub_i32(self, subtrahend: i32) -> Result<Ip4, AddressError> {
        let result = Ip4(self.0.wrapping_sub(subtrahend as u32));
        if (subtrahend > 0) != (result < self) {
            return Err(AddressError::OutOfRange);
        }
        Ok(result)
    }

    /// 64-bit addend variant of [Ip4::add_i32]; the result must also
    /// round-trip through 32 bits.
    pub fn add_i64(self, addend: i64) -> Result<Ip4, AddressError> {
        let ip = i64::from(self.0);
        let result = ip.checked_add(addend).ok_or(AddressError::OutOfRange)?;
        if (addend < 0) != (result < ip) || result != i64::from(result as u32) {
            return Err(AddressError::OutOfRange);
        }
        Ok(Ip4(result as u32))
    }

    /// 64-bit subtrahend variant of [Ip4::sub_i32].
    pub fn sub_i64(self, subtrahend: i64) -> Result<Ip4, AddressError> {
        let ip = i64::from(self.0);
        let result = ip.checked_sub(subtrahend).ok_or(AddressError::OutOfRange)?;
        if (subtrahend > 0) != (result < ip) || result != i64::from(result as u32) {
            return Err(AddressError::OutOfRange);
        }
        Ok(Ip4(result as u32))
    }

    /// Signed difference `self - other`; always exact in 64 bits.
    pub fn diff(self, other: Ip4) -> i64 {
        i64::from(self.0) - i64::from(other.0)
    }

    /**
    Evaluate `self CMP (base OP offset)` where `OP` is `-` if `sub` else
    `+`, and `CMP` is `<=` if `less` else `>=`.

    A negative offset `-n` frames `base` to its `/n` CIDR boundary
    instead: down to the network address when subtracting, up to the
    broadcast address when adding. Offsets outside `-32..=4294967295`
    are rejected.
    */
    pub fn in_range_signed(
        self,
        base: Ip4,
        offset: i64,
        sub: bool,
        less: bool,
    ) -> Result<bool, AddressError> {
        if offset >= 0x1_0000_0000 || offset < -i64::from(IPV4_BITS) {
            return Err(AddressError::BadOffset(offset));
        }
        if offset < 0 {
            let bits = (-offset) as u8;
            let base = if sub {
                Ip4(base.0 & netmask(bits))
            } else {
                Ip4(base.0 | hostmask(bits))
            };
            return Ok(if less { self <= base } else { self >= base });
        }
        // val CMP (base OP offset) == (val - base) CMP (OP offset), which
        // cannot overflow in 64 bits
        let delta = self.diff(base);
        let offset = if sub { -offset } else { offset };
        Ok(if less { delta <= offset } else { delta >= offset })
    }

    /// Address-valued offset form of [Ip4::in_range_signed].
    pub fn in_range_addr(self, base: Ip4, offset: Ip4, sub: bool, less: bool) -> bool {
        let delta = self.diff(base);
        let offs = if sub {
            -i64::from(offset.0)
        } else {
            i64::from(offset.0)
        };
        if less {
            delta <= offs
        } else {
            delta >= offs
        }
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Ip4 {
        Ip4(u32::from_be_bytes(bytes))
    }
}

impl fmt::Display for Ip4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_ipv4(*self))
    }
}

impl FromStr for Ip4 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ipv4(s)
    }
}

impl From<Ipv4Addr> for Ip4 {
    fn from(addr: Ipv4Addr) -> Ip4 {
        Ip4(u32::from(addr))
    }
}

impl From<Ip4> for Ipv4Addr {
    fn from(ip: Ip4) -> Ipv4Addr {
        Ipv4Addr::from(ip.0)
    }
}

impl ops::BitAnd for Ip4 {
    type Output = Ip4;
    fn bitand(self, rhs: Ip4) -> Ip4 {
        Ip4(self.0 & rhs.0)
    }
}

impl ops::BitOr for Ip4 {
    type Output = Ip4;
    fn bitor(self, rhs: Ip4) -> Ip4 {
        Ip4(self.0 | rhs.0)
    }
}

impl ops::BitXor for Ip4 {
    type Output = Ip4;
    fn bitxor(self, rhs: Ip4) -> Ip4 {
        Ip4(self.0 ^ rhs.0)
    }
}

impl ops::Not for Ip4 {
    type Output = Ip4;
    fn not(self) -> Ip4 {
        Ip4(!self.0)
    }
}

/* ---------------------------------- */

/// Inclusive range of IPv4 addresses. Constructors establish
/// `lower <= upper`; the ordering is `(lower, upper)` lexicographic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ip4r {
    pub lower: Ip4,
    /// inclusive
    pub upper: Ip4,
}

impl Ip4r {
    /// Create a range from ordered bounds.
    pub fn new(lower: Ip4, upper: Ip4) -> Result<Ip4r, AddressError> {
        if lower > upper {
            return Err(AddressError::RangeOrder(Ip::V4(lower), Ip::V4(upper)));
        }
        Ok(Ip4r { lower, upper })
    }

    /// Create a range from two endpoints in either order.
    pub fn between(a: Ip4, b: Ip4) -> Ip4r {
        if a <= b {
            Ip4r { lower: a, upper: b }
        } else {
            Ip4r { lower: b, upper: a }
        }
    }

    /// The CIDR block `prefix/len`. The prefix must have its host bits
    /// clear.
    pub fn from_cidr(prefix: Ip4, len: u8) -> Result<Ip4r, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        let mask = hostmask(len);
        if prefix.0 & mask != 0 {
            return Err(AddressError::Misaligned(format!("{prefix}{SLASH}{len}")));
        }
        Ok(Ip4r {
            lower: prefix,
            upper: Ip4(prefix.0 | mask),
        })
    }

    /// The `/len` network around `addr`; host bits are masked away
    /// rather than rejected.
    pub fn net_prefix(addr: Ip4, len: u8) -> Result<Ip4r, AddressError> {
        if len > IPV4_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        let mask = hostmask(len);
        Ok(Ip4r {
            lower: Ip4(addr.0 & !mask),
            upper: Ip4(addr.0 | mask),
        })
    }

    /// The network around `addr` given a literal netmask.
    pub fn net_mask(addr: Ip4, mask: Ip4) -> Result<Ip4r, AddressError> {
        if !mask.is_netmask() {
            return Err(AddressError::BadNetmask(mask.to_string()));
        }
        Ok(Ip4r {
            lower: Ip4(addr.0 & mask.0),
            upper: Ip4(addr.0 | !mask.0),
        })
    }

    /// Prefix length if the range is exactly one CIDR block.
    pub fn masklen(&self) -> Option<u8> {
        masklen(self.lower.0, self.upper.0)
    }

    pub fn is_cidr(&self) -> bool {
        self.masklen().is_some()
    }

    fn contains_internal(&self, other: &Ip4r, eqval: bool) -> bool {
        if self == other {
            return eqval;
        }
        self.lower <= other.lower && self.upper >= other.upper
    }

    pub fn contains(&self, other: &Ip4r) -> bool {
        self.contains_internal(other, true)
    }

    pub fn contains_strict(&self, other: &Ip4r) -> bool {
        self.contains_internal(other, false)
    }

    pub fn contains_addr(&self, addr: Ip4) -> bool {
        self.lower <= addr && self.upper >= addr
    }

    pub fn overlaps(&self, other: &Ip4r) -> bool {
        self.upper >= other.lower && self.lower <= other.upper
    }

    /// Entirely below `other` with no overlap.
    pub fn left_of(&self, other: &Ip4r) -> bool {
        self.upper < other.lower
    }

    /// Entirely above `other` with no overlap.
    pub fn right_of(&self, other: &Ip4r) -> bool {
        self.lower > other.upper
    }

    /// Smallest range covering both inputs.
    pub fn union(&self, other: &Ip4r) -> Ip4r {
        Ip4r {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Overlapping part of the two ranges, if any.
    pub fn intersect(&self, other: &Ip4r) -> Option<Ip4r> {
        if self.upper < other.lower || self.lower > other.upper {
            return None;
        }
        Some(Ip4r {
            lower: self.lower.max(other.lower),
            upper: self.upper.min(other.upper),
        })
    }

    /// Number of addresses in the range as a float.
    pub fn size(&self) -> f64 {
        f64::from(self.upper.0 - self.lower.0) + 1.0
    }

    /// Number of addresses in the range, exactly.
    pub fn size_exact(&self) -> BigUint {
        BigUint::from(u64::from(self.upper.0 - self.lower.0) + 1)
    }

    /// Decompose into the minimal ordered sequence of CIDR blocks.
    pub fn cidr_split(self) -> CidrSplit4 {
        CidrSplit4 { rest: Some(self) }
    }

    /// Lower then upper bound, big-endian.
    pub fn to_be_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.lower.to_be_bytes());
        out[4..].copy_from_slice(&self.upper.to_be_bytes());
        out
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Result<Ip4r, AddressError> {
        let lower = Ip4(u32::from_be_bytes(bytes[..4].try_into().unwrap()));
        let upper = Ip4(u32::from_be_bytes(bytes[4..].try_into().unwrap()));
        Ip4r::new(lower, upper)
    }
}

impl From<Ip4> for Ip4r {
    /// Degenerate single-address range.
    fn from(ip: Ip4) -> Ip4r {
        Ip4r {
            lower: ip,
            upper: ip,
        }
    }
}

impl fmt::Display for Ip4r {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            return write!(f, "{}", self.lower);
        }
        match self.masklen() {
            Some(len) => write!(f, "{}{SLASH}{}", self.lower, len),
            None => write!(f, "{}{DASH}{}", self.lower, self.upper),
        }
    }
}

impl FromStr for Ip4r {
    type Err = AddressError;

    /// Accepts a bare address, `lower-upper` (either order) or
    /// `prefix/len`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.find(|c| matches!(c, '-' | '/')) {
            None => Ok(Ip4r::from(parse_ipv4(s)?)),
            Some(pos) if s.as_bytes()[pos] == b'-' => {
                let a = parse_ipv4(&s[..pos])?;
                let b = parse_ipv4(&s[pos + 1..])?;
                Ok(Ip4r::between(a, b))
            }
            Some(pos) => {
                let prefix = parse_ipv4(&s[..pos])?;
                let len = &s[pos + 1..];
                if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(AddressError::Invalid(s.to_string()));
                }
                let len: u32 = len
                    .parse()
                    .map_err(|_| AddressError::Invalid(s.to_string()))?;
                if len > u32::from(IPV4_BITS) {
                    return Err(AddressError::InvalidPrefix(len));
                }
                Ip4r::from_cidr(prefix, len as u8)
            }
        }
    }
}

impl From<Ipv4Net> for Ip4r {
    fn from(net: Ipv4Net) -> Ip4r {
        Ip4r {
            lower: Ip4::from(net.network()),
            upper: Ip4::from(net.broadcast()),
        }
    }
}

impl TryFrom<Ip4r> for Ipv4Net {
    type Error = AddressError;

    /// Only CIDR-shaped ranges convert to a network.
    fn try_from(range: Ip4r) -> Result<Ipv4Net, AddressError> {
        match range.masklen() {
            Some(len) => Ipv4Net::new(range.lower.into(), len)
                .map_err(|_| AddressError::InvalidPrefix(len.into())),
            None => Err(AddressError::Misaligned(range.to_string())),
        }
    }
}

/* ---------------------------------- */

/// Iterator over the minimal CIDR decomposition of an [Ip4r]: at each
/// step the largest aligned block starting at the current lower bound
/// that still fits.
pub struct CidrSplit4 {
    rest: Option<Ip4r>,
}

impl Iterator for CidrSplit4 {
    type Item = Ip4r;

    fn next(&mut self) -> Option<Ip4r> {
        let cur = self.rest.take()?;
        let lo: u32 = cur.lower.0;
        let hi: u32 = cur.upper.0;

        if masklen(lo, hi).is_some() {
            return Some(cur);
        }

        // grow while the block stays aligned and inside the range; a
        // non-CIDR range can never be consumed whole, so the loop stops
        // before the mask overflows
        let mut mask: u32 = 1;
        while (lo & mask) == 0 && (lo | mask) <= hi {
            mask = (mask << 1) | 1;
        }
        mask >>= 1;

        self.rest = Some(Ip4r {
            lower: Ip4((lo | mask) + 1),
            upper: Ip4(hi),
        });
        Some(Ip4r {
            lower: Ip4(lo),
            upper: Ip4(lo | mask),
        })
    }
}

/* ---------------------------------- */
