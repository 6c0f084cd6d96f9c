// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv4/IPv6 address and range value types: strict text parsing and RFC 5952
//! formatting, bit-level range algebra (masks, CIDR detection, containment,
//! splitting, arithmetic), a compact length-keyed binary encoding, and the
//! GiST-style index strategy layer (union / penalty / picksplit / consistent)
//! over the family-generic range type.

pub mod gist;
mod ip4;
mod ip6;
mod packed;
mod range;
mod raw;
mod strings;

use std::{error, fmt};
use strings::*;

pub use ip4::{CidrSplit4, Ip4, Ip4r};
pub use ip6::{CidrSplit6, Ip6, Ip6r};
pub use range::{CidrSplit, Ip, IpFam, IpRange};
pub use raw::{format_ipv4, format_ipv6, parse_ipv4, parse_ipv6};

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// malformed address or range text
    Invalid(String),
    /// prefix length beyond the family width
    InvalidPrefix(u32),
    /// CIDR prefix with bits set below the mask
    Misaligned(String),
    /// netmask is not a contiguous run of leading one bits
    BadNetmask(String),
    /// range endpoints reversed
    RangeOrder(Ip, Ip),
    /// operands are not the same IP family (v4 vs v6)
    Mismatch(Ip, Ip),
    /// address arithmetic wrapped past the family limits
    OutOfRange,
    /// window-frame offset outside the family's window
    BadOffset(i64),
    /// encoded range payload length is not one of {0, 8, 9, 17, 32}
    Corrupt(usize),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Invalid(text) => {
                write!(f, "{ERR_INVALID}: '{text}'")
            }
            AddressError::InvalidPrefix(len) => {
                write!(f, "{ERR_PREFIX}: {len}")
            }
            AddressError::Misaligned(prefix) => {
                write!(f, "{ERR_ALIGN}: '{prefix}'")
            }
            AddressError::BadNetmask(mask) => {
                write!(f, "{ERR_NETMASK}: '{mask}'")
            }
            AddressError::RangeOrder(beg, end) => {
                write!(f, "{ERR_RNG_ORDER} ({beg} > {end})")
            }
            AddressError::Mismatch(a, b) => {
                write!(f, "{ERR_MISMATCH}: {a} - {b}")
            }
            AddressError::OutOfRange => {
                write!(f, "{ERR_RANGE}")
            }
            AddressError::BadOffset(offset) => {
                write!(f, "{ERR_OFFSET}: {offset}")
            }
            AddressError::Corrupt(len) => {
                write!(f, "{ERR_CORRUPT}: {len}")
            }
        }
    }
}

impl error::Error for AddressError {}
