// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text codec for bare IPv4/IPv6 addresses: strict dotted-quad and colon-hex
//! grammars on input, RFC 5952 canonical form on output.

use crate::{AddressError, Ip4, Ip6};

fn invalid(s: &str) -> AddressError {
    AddressError::Invalid(s.to_string())
}

fn hexval(ch: u8) -> u16 {
    match ch {
        b'0'..=b'9' => u16::from(ch - b'0'),
        b'a'..=b'f' => u16::from(ch - b'a' + 10),
        _ => u16::from(ch - b'A' + 10),
    }
}

/* ---------------------------------- */

/**
Parse a dotted-quad IPv4 address.

Exactly four octets, each `0..=255`, digits and dots only. Octets must not
have leading zeros: `"1.2.3.04"` is rejected, `"1.2.3.0"` is fine.
*/
pub fn parse_ipv4(s: &str) -> Result<Ip4, AddressError> {
    let mut digits: u8 = 0;
    let mut octets: u8 = 0;
    let mut octet: u32 = 0;
    let mut tmp: u32 = 0;

    for ch in s.bytes() {
        match ch {
            b'0'..=b'9' => {
                // a second digit while the octet is still 0 is a leading zero
                if digits > 0 && octet == 0 {
                    return Err(invalid(s));
                }
                digits += 1;
                octet = octet * 10 + u32::from(ch - b'0');
                if octet > 255 {
                    return Err(invalid(s));
                }
            }
            b'.' => {
                if digits == 0 || octets == 3 {
                    return Err(invalid(s));
                }
                octets += 1;
                tmp = (tmp << 8) | octet;
                octet = 0;
                digits = 0;
            }
            _ => return Err(invalid(s)),
        }
    }

    if digits == 0 || octets != 3 {
        return Err(invalid(s));
    }

    Ok(Ip4((tmp << 8) | octet))
}

/**
Parse a colon-hex IPv6 address.

Up to eight 16-bit hex groups of 1-4 digits each (either case); at most one
`::` gap, which may stand for a single zero group. An embedded dotted-quad
may replace the final two groups when 1-6 groups (or a gap) precede it; the
tail is then held to the IPv4 rules above. A lone leading or trailing `:`
is rejected.
*/
pub fn parse_ipv6(s: &str) -> Result<Ip6, AddressError> {
    let bytes = s.as_bytes();
    let mut tmp: [u16; 8] = [0; 8];
    let mut word: u16 = 0;
    let mut digits: u8 = 0;
    let mut words: usize = 0;
    let mut gap: Option<usize> = None;
    let mut backtrack: usize = 0;
    let mut pos: usize = 0;

    if bytes.first() == Some(&b':') {
        if bytes.get(1) != Some(&b':') {
            return Err(invalid(s));
        }
        pos = 1;
    }

    loop {
        let ch = match bytes.get(pos) {
            Some(&c) => c,
            None => break,
        };
        pos += 1;
        match ch {
            b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                word = (word << 4) | hexval(ch);
                digits += 1;
                if digits > 4 {
                    return Err(invalid(s));
                }
            }
            b':' => {
                if digits == 0 {
                    // second colon of a '::' gap
                    if gap.is_some() {
                        return Err(invalid(s));
                    }
                    gap = Some(words);
                } else if pos == bytes.len() {
                    // trailing lone colon
                    return Err(invalid(s));
                }
                if words == 8 {
                    return Err(invalid(s));
                }
                tmp[words] = word;
                words += 1;
                if words > 7 && pos < bytes.len() {
                    return Err(invalid(s));
                }
                backtrack = pos;
                word = 0;
                digits = 0;
            }
            b'.' => {
                // dotted-quad tail, re-parsed from just after the last ':'
                if !(1..=6).contains(&words) {
                    return Err(invalid(s));
                }
                let v4 = parse_ipv4(&s[backtrack..])?.0;
                tmp[words] = (v4 >> 16) as u16;
                words += 1;
                word = (v4 & 0xffff) as u16;
                digits = 4;
                break;
            }
            _ => return Err(invalid(s)),
        }
    }

    if digits > 0 {
        if words == 8 {
            return Err(invalid(s));
        }
        tmp[words] = word;
        words += 1;
    }

    if words < 8 {
        let gap = match gap {
            Some(g) => g,
            None => return Err(invalid(s)),
        };
        // shift the groups after the gap to the tail, zero-fill the rest
        let d: usize = 8 - words;
        let mut i: usize = 7;
        while i > gap + d {
            tmp[i] = tmp[i - d];
            i -= 1;
        }
        while i > gap {
            tmp[i] = 0;
            i -= 1;
        }
    }

    let mut hi: u64 = 0;
    let mut lo: u64 = 0;
    for w in &tmp[..4] {
        hi = (hi << 16) | u64::from(*w);
    }
    for w in &tmp[4..] {
        lo = (lo << 16) | u64::from(*w);
    }

    Ok(Ip6 { hi, lo })
}

/* ---------------------------------- */

/// Format an IPv4 address as a minimal dotted quad.
pub fn format_ipv4(ip: Ip4) -> String {
    let v: u32 = ip.0;
    format!("{}.{}.{}.{}", v >> 24, (v >> 16) & 255, (v >> 8) & 255, v & 255)
}

fn v4_tail(w: &[u16; 8]) -> String {
    format_ipv4(Ip4((u32::from(w[6]) << 16) | u32::from(w[7])))
}

/**
Format an IPv6 address in RFC 5952 canonical form: lowercase hex, no
leading zeros, the leftmost longest run of two or more zero groups
compressed to `::`. Addresses whose first six groups are zero print with a
dotted-quad tail, as do the `::ffff:` v4-mapped and `::ffff:0:` translated
prefixes. A run of exactly seven zero groups takes the generic path, so
`::1` never prints as `::0.0.0.1`.
*/
pub fn format_ipv6(ip: Ip6) -> String {
    let w: [u16; 8] = ip.words();

    // leftmost longest run of at least two zero groups; 8 = no run
    let mut best: usize = 8;
    let mut best_len: usize = 1;
    let mut i: usize = 0;
    while i < 8 {
        if w[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < 8 && w[i] == 0 {
            i += 1;
        }
        if i - start > best_len {
            best = start;
            best_len = i - start;
        }
    }

    if best == 0 {
        match best_len {
            8 => return String::from("::"),
            6 => return format!("::{}", v4_tail(&w)),
            5 if w[5] == 0xffff => return format!("::ffff:{}", v4_tail(&w)),
            4 if w[4] == 0xffff && w[5] == 0 => {
                return format!("::ffff:0:{}", v4_tail(&w));
            }
            _ => {}
        }
    }

    let mut out = String::with_capacity(40);
    for (i, group) in w.iter().enumerate() {
        if best < 8 && i >= best && i < best + best_len {
            if i == best + best_len - 1 {
                out.push(':');
            }
            continue;
        }
        if i > 0 {
            out.push(':');
        }
        out.push_str(&format!("{group:x}"));
    }
    if best < 8 && best + best_len == 8 {
        out.push(':');
    }
    out
}

/* ---------------------------------- */
