// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Length-keyed compact encoding for [IpRange]. Most stored ranges are
//! CIDR blocks, and of those most are /64 or shorter, so instead of a
//! fixed 32-byte record plus a format tag the payload length alone
//! selects the layout:
//!
//!   0 bytes            - the universal range
//!   8 bytes            - v4 range, `lower` then `upper`, big-endian
//!   9 bytes            - v6 CIDR /0..=/64: prefix byte + high limb of `lower`
//!   17 bytes           - v6 CIDR /65..=/128: prefix byte + 16-byte `lower`
//!   32 bytes           - arbitrary v6 range, `lower` then `upper`
//!
//! [pack](IpRange::pack) always emits the shortest legal form, so equal
//! ranges encode byte-identically and the encoded form can stand in for
//! the value as a hash or equality key. Any other payload length is
//! corruption: the encoding is only ever produced here, so
//! [unpack](IpRange::unpack) treats it as an internal error rather than
//! bad user input.

use super::{strings::*, AddressError, Ip4r, Ip6, Ip6r, IpRange};
use tracing::error;

impl IpRange {
    /**
    Encode this range into its shortest legal layout. The CIDR check
    runs first so every v6 block lands in the 9- or 17-byte form and
    never in the 32-byte fallback.
    */
    pub fn pack(&self) -> Vec<u8> {
        match self {
            IpRange::All => Vec::new(),
            IpRange::V4(r) => r.to_be_bytes().to_vec(),
            IpRange::V6(r) => match r.masklen() {
                Some(len) if len <= 64 => {
                    let mut buf: Vec<u8> = Vec::with_capacity(9);
                    buf.push(len);
                    buf.extend_from_slice(&r.lower.hi.to_be_bytes());
                    buf
                }
                Some(len) => {
                    let mut buf: Vec<u8> = Vec::with_capacity(17);
                    buf.push(len);
                    buf.extend_from_slice(&r.lower.to_be_bytes());
                    buf
                }
                None => r.to_be_bytes().to_vec(),
            },
        }
    }

    /**
    Decode a range packed by [pack](IpRange::pack). The payload length
    is the entire format tag; the prefixed forms rebuild `upper` by
    setting the host bits of `lower`.
    */
    pub fn unpack(bytes: &[u8]) -> Result<IpRange, AddressError> {
        match bytes.len() {
            0 => Ok(IpRange::All),
            8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Ok(IpRange::V4(Ip4r::from_be_bytes(buf)?))
            }
            9 => {
                let len: u8 = bytes[0];
                if len > 64 {
                    return Err(AddressError::InvalidPrefix(u32::from(len)));
                }
                let mut limb = [0u8; 8];
                limb.copy_from_slice(&bytes[1..9]);
                let lower = Ip6 { hi: u64::from_be_bytes(limb), lo: 0 };
                Ok(IpRange::V6(Ip6r { lower, upper: lower.mask_upper(len) }))
            }
            17 => {
                let len: u8 = bytes[0];
                if len > 128 {
                    return Err(AddressError::InvalidPrefix(u32::from(len)));
                }
                let mut addr = [0u8; 16];
                addr.copy_from_slice(&bytes[1..17]);
                let lower = Ip6::from_be_bytes(addr);
                Ok(IpRange::V6(Ip6r { lower, upper: lower.mask_upper(len) }))
            }
            32 => {
                let mut buf = [0u8; 32];
                buf.copy_from_slice(bytes);
                Ok(IpRange::V6(Ip6r::from_be_bytes(buf)?))
            }
            len => {
                let errmsg: String = format!("{ERR_CORRUPT}: {len} bytes");
                error!(errmsg);
                Err(AddressError::Corrupt(len))
            }
        }
    }
}

/* ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    /// one fixture per encoded layout, plus awkward CIDR boundaries
    const ROUND_TRIP: [&str; 12] = [
        "-",
        "1.2.3.4",
        "10.0.0.0/8",
        "10.0.0.1-10.0.0.4",
        "::",
        "::/0",
        "::/64",
        "::/65",
        "8000::/1",
        "2001:db8::/32",
        "2001:db8::1-2001:db8::ffff:0:1",
        "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
    ];

    fn r(s: &str) -> IpRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_pack_layouts() {
        assert!(r("-").pack().is_empty());
        assert_eq!(
            r("10.0.0.0/8").pack(),
            vec![0x0a, 0, 0, 0, 0x0a, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            r("2001:db8::/32").pack(),
            vec![32, 0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0]
        );
        let mut host = vec![128u8];
        host.extend_from_slice(&[0; 15]);
        host.push(1);
        assert_eq!(r("::1").pack(), host);
        assert_eq!(r("::/0").pack(), vec![0; 9]);
        assert_eq!(r("fe80::1-fe80::4").pack().len(), 32);
    }

    #[test]
    fn test_unpack_round_trip() {
        for s in ROUND_TRIP {
            let range = r(s);
            assert_eq!(IpRange::unpack(&range.pack()).unwrap(), range, "{s}");
        }
    }

    #[test]
    fn test_pack_deterministic() {
        let a = r("10.0.0.0/8");
        let b = IpRange::between("10.255.255.255".parse().unwrap(), "10.0.0.0".parse().unwrap())
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pack(), b.pack());
    }

    #[test]
    fn test_unpack_noncanonical_widths() {
        // a /32 block spelled in the 17-byte form still decodes, but
        // re-encoding collapses it back to the canonical 9 bytes
        let prefix: Ip6 = "2001:db8::".parse().unwrap();
        let mut wide = vec![32u8];
        wide.extend_from_slice(&prefix.to_be_bytes());
        let decoded = IpRange::unpack(&wide).unwrap();
        assert_eq!(decoded, r("2001:db8::/32"));
        assert_eq!(decoded.pack().len(), 9);
    }

    #[test]
    fn test_unpack_rejects_bad_lengths() {
        for len in [1usize, 2, 3, 4, 5, 6, 7, 10, 16, 18, 31, 33] {
            let blob = vec![0u8; len];
            assert!(
                matches!(IpRange::unpack(&blob), Err(AddressError::Corrupt(l)) if l == len),
                "{len} bytes"
            );
        }
    }

    #[test]
    fn test_unpack_rejects_bad_prefix_byte() {
        let mut blob = vec![65u8; 9];
        assert!(matches!(
            IpRange::unpack(&blob),
            Err(AddressError::InvalidPrefix(65))
        ));
        blob = vec![0u8; 17];
        blob[0] = 129;
        assert!(matches!(
            IpRange::unpack(&blob),
            Err(AddressError::InvalidPrefix(129))
        ));
    }

    #[test]
    fn test_unpack_rejects_reversed_bounds() {
        let mut blob = vec![0u8; 8];
        blob[3] = 9; // lower 0.0.0.9, upper 0.0.0.0
        assert!(matches!(
            IpRange::unpack(&blob),
            Err(AddressError::RangeOrder(..))
        ));
    }
}
