// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static COLON: &str = ":";
pub(crate) static DASH: &str = "-";
pub(crate) static SLASH: &str = "/";

// lib.rs (AddressError display)
pub(crate) static ERR_INVALID: &str = "invalid IP address or range";
pub(crate) static ERR_PREFIX: &str = "invalid mask length";
pub(crate) static ERR_ALIGN: &str = "prefix has host bits set";
pub(crate) static ERR_NETMASK: &str = "invalid netmask";
pub(crate) static ERR_RNG_ORDER: &str = "lower bound is greater than upper bound";
pub(crate) static ERR_MISMATCH: &str = "cannot mix IPv4 and IPv6 operands";
pub(crate) static ERR_RANGE: &str = "ip address out of range";
pub(crate) static ERR_OFFSET: &str = "offset out of range for address family";
pub(crate) static ERR_CORRUPT: &str = "invalid encoded range length";
