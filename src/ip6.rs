// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv6 address and range algebra. Addresses are two big-endian 64-bit
//! limbs so the mask arithmetic stays word-wise like its IPv4 sibling;
//! `u128` conversions are provided at the edges for interop.

use crate::{
    range::Ip,
    raw::{format_ipv6, parse_ipv6},
    strings::*,
    AddressError, IPV6_BITS,
};
use ipnet::Ipv6Net;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::{fmt, net::Ipv6Addr, ops, str::FromStr};

/// high limb of the `/len` hostmask; zero for any `len >= 64`
pub(crate) fn hostmask6_hi(len: u8) -> u64 {
    match len {
        0 => u64::MAX,
        1..=63 => (1u64 << (64 - len)) - 1,
        _ => 0,
    }
}

/// low limb of the `/len` hostmask; all ones for any `len <= 64`
pub(crate) fn hostmask6_lo(len: u8) -> u64 {
    match len {
        0..=64 => u64::MAX,
        65..=127 => (1u64 << (128 - len)) - 1,
        _ => 0,
    }
}

/// One-limb worth of [masklen6]: the prefix bits this limb contributes
/// on top of `offset` if `[lo, hi]` spans a single block here.
fn masklen64(lo: u64, hi: u64, offset: u8) -> Option<u8> {
    let d: u64 = (lo ^ hi).wrapping_add(1);
    if d == 0 {
        // every bit differs; only a full limb span qualifies
        return (lo == 0).then_some(offset);
    }
    if !d.is_power_of_two() {
        return None;
    }
    let mask = d - 1;
    if (lo & mask) == 0 && (hi & mask) == mask {
        Some(offset + 64 - d.trailing_zeros() as u8)
    } else {
        None
    }
}

/// Prefix length of `[lo, hi]` if the pair spans exactly one CIDR block.
pub(crate) fn masklen6(lo: Ip6, hi: Ip6) -> Option<u8> {
    if lo.hi == hi.hi {
        return masklen64(lo.lo, hi.lo, 64);
    }
    if lo.lo == 0 && hi.lo == u64::MAX {
        return masklen64(lo.hi, hi.hi, 0);
    }
    None
}

/* ---------------------------------- */

/// IPv6 address as two 64-bit limbs, most significant first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ip6 {
    pub hi: u64,
    pub lo: u64,
}

impl Ip6 {
    /// Netmask of the given prefix length.
    pub fn netmask(len: u8) -> Result<Ip6, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip6 {
            hi: !hostmask6_hi(len),
            lo: !hostmask6_lo(len),
        })
    }

    /// Hostmask of the given prefix length.
    pub fn hostmask(len: u8) -> Result<Ip6, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip6 {
            hi: hostmask6_hi(len),
            lo: hostmask6_lo(len),
        })
    }

    /// Whether the value is a contiguous netmask.
    pub fn is_netmask(self) -> bool {
        let d: u64 = if self.hi == u64::MAX {
            (!self.lo).wrapping_add(1)
        } else if self.lo == 0 {
            (!self.hi).wrapping_add(1)
        } else {
            return false;
        };
        d == 0 || d.is_power_of_two()
    }

    /// Whether the value is a contiguous hostmask.
    pub fn is_hostmask(self) -> bool {
        let d: u64 = if self.hi == 0 {
            self.lo.wrapping_add(1)
        } else if self.lo == u64::MAX {
            self.hi.wrapping_add(1)
        } else {
            return false;
        };
        d == 0 || d.is_power_of_two()
    }

    pub(crate) fn mask_lower(self, len: u8) -> Ip6 {
        Ip6 {
            hi: self.hi & !hostmask6_hi(len),
            lo: self.lo & !hostmask6_lo(len),
        }
    }

    pub(crate) fn mask_upper(self, len: u8) -> Ip6 {
        Ip6 {
            hi: self.hi | hostmask6_hi(len),
            lo: self.lo | hostmask6_lo(len),
        }
    }

    /// First address of the enclosing `/len` network.
    pub fn net_lower(self, len: u8) -> Result<Ip6, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(self.mask_lower(len))
    }

    /// Last address of the enclosing `/len` network.
    pub fn net_upper(self, len: u8) -> Result<Ip6, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(self.mask_upper(len))
    }

    pub(crate) fn wrapping_add_u64(self, n: u64) -> Ip6 {
        let (lo, carry) = self.lo.overflowing_add(n);
        Ip6 {
            hi: self.hi.wrapping_add(u64::from(carry)),
            lo,
        }
    }

    pub(crate) fn wrapping_sub_u64(self, n: u64) -> Ip6 {
        let (lo, borrow) = self.lo.overflowing_sub(n);
        Ip6 {
            hi: self.hi.wrapping_sub(u64::from(borrow)),
            lo,
        }
    }

    /// 32-bit convenience form of [Ip6::add_i64].
    pub fn add_i32(self, addend: i32) -> Result<Ip6, AddressError> {
        self.add_i64(i64::from(addend))
    }

    /// 32-bit convenience form of [Ip6::sub_i64].
    pub fn sub_i32(self, subtrahend: i32) -> Result<Ip6, AddressError> {
        self.sub_i64(i64::from(subtrahend))
    }

    /// Add a signed offset, failing if the result leaves 128-bit space.
    pub fn add_i64(self, addend: i64) -> Result<Ip6, AddressError> {
        let result = if addend >= 0 {
            self.wrapping_add_u64(addend as u64)
        } else {
            self.wrapping_sub_u64(addend.unsigned_abs())
        };
        if (addend < 0) != (result < self) {
            return Err(AddressError::OutOfRange);
        }
        Ok(result)
    }

    /// Subtract a signed offset, failing if the result leaves 128-bit
    /// space.
    pub fn sub_i64(self, subtrahend: i64) -> Result<Ip6, AddressError> {
        let result = if subtrahend >= 0 {
            self.wrapping_sub_u64(subtrahend as u64)
        } else {
            self.wrapping_add_u64(subtrahend.unsigned_abs())
        };
        if (subtrahend > 0) != (result < self) {
            return Err(AddressError::OutOfRange);
        }
        Ok(result)
    }

    /// Add an arbitrary-precision offset.
    pub fn add_big(self, addend: &BigInt) -> Result<Ip6, AddressError> {
        Ip6::from_big(BigInt::from(self.to_u128()) + addend)
    }

    /// Subtract an arbitrary-precision offset.
    pub fn sub_big(self, subtrahend: &BigInt) -> Result<Ip6, AddressError> {
        Ip6::from_big(BigInt::from(self.to_u128()) - subtrahend)
    }

    fn from_big(value: BigInt) -> Result<Ip6, AddressError> {
        let mag = value.to_biguint().ok_or(AddressError::OutOfRange)?;
        if mag.bits() > u64::from(IPV6_BITS) {
            return Err(AddressError::OutOfRange);
        }
        let mut limbs = mag.iter_u64_digits();
        let lo = limbs.next().unwrap_or(0);
        let hi = limbs.next().unwrap_or(0);
        Ok(Ip6 { hi, lo })
    }

    /// Signed difference `self - other`.
    pub fn diff(self, other: Ip6) -> BigInt {
        BigInt::from(self.to_u128()) - BigInt::from(other.to_u128())
    }

    fn in_range_u128(self, base: Ip6, offset: u128, sub: bool, less: bool) -> bool {
        let val = self.to_u128();
        let base = base.to_u128();
        if sub {
            // val CMP (base - offset); when base < val the right side
            // can only be smaller still
            if base < val {
                return !less;
            }
            let diff = base - val;
            if less {
                !(diff < offset)
            } else {
                !(offset < diff)
            }
        } else {
            if val < base {
                return less;
            }
            let diff = val - base;
            if less {
                !(offset < diff)
            } else {
                !(diff < offset)
            }
        }
    }

    /**
    Evaluate `self CMP (base OP offset)` where `OP` is `-` if `sub` else
    `+`, and `CMP` is `<=` if `less` else `>=`.

    A negative offset `-n` frames `base` to its `/n` CIDR boundary
    instead: down to the network address when subtracting, up to the top
    of the block when adding. Offsets below `-128` are rejected.
    */
    pub fn in_range_signed(
        self,
        base: Ip6,
        offset: i64,
        sub: bool,
        less: bool,
    ) -> Result<bool, AddressError> {
        if offset < -i64::from(IPV6_BITS) {
            return Err(AddressError::BadOffset(offset));
        }
        if offset < 0 {
            let bits = (-offset) as u8;
            let base = if sub {
                base.mask_lower(bits)
            } else {
                base.mask_upper(bits)
            };
            return Ok(if less { self <= base } else { self >= base });
        }
        Ok(self.in_range_u128(base, offset as u128, sub, less))
    }

    /// Address-valued offset form of [Ip6::in_range_signed].
    pub fn in_range_addr(self, base: Ip6, offset: Ip6, sub: bool, less: bool) -> bool {
        self.in_range_u128(base, offset.to_u128(), sub, less)
    }

    pub fn to_u128(self) -> u128 {
        (u128::from(self.hi) << 64) | u128::from(self.lo)
    }

    pub fn from_u128(value: u128) -> Ip6 {
        Ip6 {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }

    /// The address as eight 16-bit groups, for text formatting.
    pub(crate) fn words(self) -> [u16; 8] {
        let mut out = [0u16; 8];
        for (i, word) in out.iter_mut().enumerate() {
            let limb = if i < 4 { self.hi } else { self.lo };
            *word = (limb >> (48 - 16 * (i % 4))) as u16;
        }
        out
    }

    pub fn to_be_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    pub fn from_be_bytes(bytes: [u8; 16]) -> Ip6 {
        Ip6 {
            hi: u64::from_be_bytes(bytes[..8].try_into().unwrap()),
            lo: u64::from_be_bytes(bytes[8..].try_into().unwrap()),
        }
    }
}

impl fmt::Display for Ip6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_ipv6(*self))
    }
}

impl FromStr for Ip6 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ipv6(s)
    }
}

impl From<Ipv6Addr> for Ip6 {
    fn from(addr: Ipv6Addr) -> Ip6 {
        Ip6::from_u128(u128::from(addr))
    }
}

impl From<Ip6> for Ipv6Addr {
    fn from(ip: Ip6) -> Ipv6Addr {
        Ipv6Addr::from(ip.to_u128())
    }
}

impl ops::BitAnd for Ip6 {
    type Output = Ip6;
    fn bitand(self, rhs: Ip6) -> Ip6 {
        Ip6 {
            hi: self.hi & rhs.hi,
            lo: self.lo & rhs.lo,
        }
    }
}

impl ops::BitOr for Ip6 {
    type Output = Ip6;
    fn bitor(self, rhs: Ip6) -> Ip6 {
        Ip6 {
            hi: self.hi | rhs.hi,
            lo: self.lo | rhs.lo,
        }
    }
}

impl ops::BitXor for Ip6 {
    type Output = Ip6;
    fn bitxor(self, rhs: Ip6) -> Ip6 {
        Ip6 {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }
}

impl ops::Not for Ip6 {
    type Output = Ip6;
    fn not(self) -> Ip6 {
        Ip6 {
            hi: !self.hi,
            lo: !self.lo,
        }
    }
}

/* ---------------------------------- */

/// Inclusive range of IPv6 addresses. Constructors establish
/// `lower <= upper`; the ordering is `(lower, upper)` lexicographic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ip6r {
    pub lower: Ip6,
    /// inclusive
    pub upper: Ip6,
}

impl Ip6r {
    /// Create a range from ordered bounds.
    pub fn new(lower: Ip6, upper: Ip6) -> Result<Ip6r, AddressError> {
        if lower > upper {
            return Err(AddressError::RangeOrder(Ip::V6(lower), Ip::V6(upper)));
        }
        Ok(Ip6r { lower, upper })
    }

    /// Create a range from two endpoints in either order.
    pub fn between(a: Ip6, b: Ip6) -> Ip6r {
        if a <= b {
            Ip6r { lower: a, upper: b }
        } else {
            Ip6r { lower: b, upper: a }
        }
    }

    /// The CIDR block `prefix/len`. The prefix must have its host bits
    /// clear.
    pub fn from_cidr(prefix: Ip6, len: u8) -> Result<Ip6r, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        if prefix.hi & hostmask6_hi(len) != 0 || prefix.lo & hostmask6_lo(len) != 0 {
            return Err(AddressError::Misaligned(format!("{prefix}{SLASH}{len}")));
        }
        Ok(Ip6r {
            lower: prefix,
            upper: prefix.mask_upper(len),
        })
    }

    /// The `/len` network around `addr`; host bits are masked away
    /// rather than rejected.
    pub fn net_prefix(addr: Ip6, len: u8) -> Result<Ip6r, AddressError> {
        if len > IPV6_BITS {
            return Err(AddressError::InvalidPrefix(len.into()));
        }
        Ok(Ip6r {
            lower: addr.mask_lower(len),
            upper: addr.mask_upper(len),
        })
    }

    /// The network around `addr` given a literal netmask.
    pub fn net_mask(addr: Ip6, mask: Ip6) -> Result<Ip6r, AddressError> {
        if !mask.is_netmask() {
            return Err(AddressError::BadNetmask(mask.to_string()));
        }
        Ok(Ip6r {
            lower: addr & mask,
            upper: addr | !mask,
        })
    }

    /// Prefix length if the range is exactly one CIDR block.
    pub fn masklen(&self) -> Option<u8> {
        masklen6(self.lower, self.upper)
    }

    pub fn is_cidr(&self) -> bool {
        self.masklen().is_some()
    }

    fn contains_internal(&self, other: &Ip6r, eqval: bool) -> bool {
        if self == other {
            return eqval;
        }
        self.lower <= other.lower && self.upper >= other.upper
    }

    pub fn contains(&self, other: &Ip6r) -> bool {
        self.contains_internal(other, true)
    }

    pub fn contains_strict(&self, other: &Ip6r) -> bool {
        self.contains_internal(other, false)
    }

    pub fn contains_addr(&self, addr: Ip6) -> bool {
        self.lower <= addr && self.upper >= addr
    }

    pub fn overlaps(&self, other: &Ip6r) -> bool {
        self.upper >= other.lower && self.lower <= other.upper
    }

    /// Entirely below `other` with no overlap.
    pub fn left_of(&self, other: &Ip6r) -> bool {
        self.upper < other.lower
    }

    /// Entirely above `other` with no overlap.
    pub fn right_of(&self, other: &Ip6r) -> bool {
        self.lower > other.upper
    }

    /// Smallest range covering both inputs.
    pub fn union(&self, other: &Ip6r) -> Ip6r {
        Ip6r {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Overlapping part of the two ranges, if any.
    pub fn intersect(&self, other: &Ip6r) -> Option<Ip6r> {
        if self.upper < other.lower || self.lower > other.upper {
            return None;
        }
        Some(Ip6r {
            lower: self.lower.max(other.lower),
            upper: self.upper.min(other.upper),
        })
    }

    /// Number of addresses in the range as a float.
    pub fn size(&self) -> f64 {
        (self.upper.to_u128() - self.lower.to_u128()) as f64 + 1.0
    }

    /// Number of addresses in the range, exactly.
    pub fn size_exact(&self) -> BigUint {
        BigUint::from(self.upper.to_u128() - self.lower.to_u128()) + 1u32
    }

    /// Decompose into the minimal ordered sequence of CIDR blocks.
    pub fn cidr_split(self) -> CidrSplit6 {
        CidrSplit6 { rest: Some(self) }
    }

    /// Lower then upper bound, big-endian.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.lower.to_be_bytes());
        out[16..].copy_from_slice(&self.upper.to_be_bytes());
        out
    }

    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Ip6r, AddressError> {
        let lower = Ip6::from_be_bytes(bytes[..16].try_into().unwrap());
        let upper = Ip6::from_be_bytes(bytes[16..].try_into().unwrap());
        Ip6r::new(lower, upper)
    }
}

impl From<Ip6> for Ip6r {
    /// Degenerate single-address range.
    fn from(ip: Ip6) -> Ip6r {
        Ip6r {
            lower: ip,
            upper: ip,
        }
    }
}

impl fmt::Display for Ip6r {
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

impl FromStr for Ip6r {
    type Err = AddressError;

    /// Accepts a bare address, `lower-upper` (either order) or
    /// `prefix/len`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.find(|c| matches!(c, '-' | '/')) {
            None => Ok(Ip6r::from(parse_ipv6(s)?)),
            Some(pos) if s.as_bytes()[pos] == b'-' => {
                let a = parse_ipv6(&s[..pos])?;
                let b = parse_ipv6(&s[pos + 1..])?;
                Ok(Ip6r::between(a, b))
            }
            Some(pos) => {
                let prefix = parse_ipv6(&s[..pos])?;
                let len = &s[pos + 1..];
                if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(AddressError::Invalid(s.to_string()));
                }
                let len: u32 = len
                    .parse()
                    .map_err(|_| AddressError::Invalid(s.to_string()))?;
                if len > u32::from(IPV6_BITS) {
                    return Err(AddressError::InvalidPrefix(len));
                }
                Ip6r::from_cidr(prefix, len as u8)
            }
        }
    }
}

impl From<Ipv6Net> for Ip6r {
    fn from(net: Ipv6Net) -> Ip6r {
        Ip6r {
            lower: Ip6::from(net.network()),
            upper: Ip6::from(net.broadcast()),
        }
    }
}

impl TryFrom<Ip6r> for Ipv6Net {
    type Error = AddressError;

    /// Only CIDR-shaped ranges convert to a network.
    fn try_from(range: Ip6r) -> Result<Ipv6Net, AddressError> {
        match range.masklen() {
            Some(len) => Ipv6Net::new(range.lower.into(), len)
                .map_err(|_| AddressError::InvalidPrefix(len.into())),
            None => Err(AddressError::Misaligned(range.to_string())),
        }
    }
}

/* ---------------------------------- */

/// Iterator over the minimal CIDR decomposition of an [Ip6r]: at each
/// step the largest aligned block starting at the current lower bound
/// that still fits.
pub struct CidrSplit6 {
    rest: Option<Ip6r>,
}

impl Iterator for CidrSplit6 {
    type Item = Ip6r;

    fn next(&mut self) -> Option<Ip6r> {
        let cur = self.rest.take()?;
        if masklen6(cur.lower, cur.upper).is_some() {
            return Some(cur);
        }
        let lo = cur.lower;

        // grow from /128 while the block stays aligned and inside the
        // range; a non-CIDR range can never be consumed whole, so the
        // bound never reaches the full span
        let mut len: u8 = IPV6_BITS;
        while len > 0 {
            let hm_hi = hostmask6_hi(len - 1);
            let hm_lo = hostmask6_lo(len - 1);
            let upper = Ip6 {
                hi: lo.hi | hm_hi,
                lo: lo.lo | hm_lo,
            };
            if (lo.hi & hm_hi) != 0 || (lo.lo & hm_lo) != 0 || upper > cur.upper {
                break;
            }
            len -= 1;
        }

        let upper = lo.mask_upper(len);
        self.rest = Some(Ip6r {
            lower: upper.wrapping_add_u64(1),
            upper: cur.upper,
        });
        Some(Ip6r { lower: lo, upper })
    }
}

/* ---------------------------------- */
