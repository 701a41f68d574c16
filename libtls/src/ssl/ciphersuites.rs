/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! Cipher suites known to the engine and the OpenSSL-style cipher list
//! syntax used to select them.

use crate::error::{Error, Result};
use super::engine::KeyExchange;

bitflags! {
    /// Properties a cipher list keyword can select on.
    pub struct SuiteProps: u32 {
        // key exchange
        const KRSA      = 1 << 0;
        const ECDHE     = 1 << 1;

        // authentication
        const ARSA      = 1 << 2;
        const ECDSA     = 1 << 3;

        // encryption
        const TRIPLEDES = 1 << 4;
        const AES128    = 1 << 5;
        const AES256    = 1 << 6;
        const AESGCM    = 1 << 7;
        const AESCCM    = 1 << 8;
        const AESCCM8   = 1 << 9;
        const CHACHA20  = 1 << 10;

        // MAC
        const AEAD      = 1 << 11;
        const SHA1      = 1 << 12;
        const SHA256    = 1 << 13;
        const SHA384    = 1 << 14;

        // minimum protocol version
        const TLS10     = 1 << 15;
        const TLS12     = 1 << 16;

        // strength
        const HIGH      = 1 << 17;
        const MEDIUM    = 1 << 18;
        const LOW       = 1 << 19;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteInfo {
    pub name: &'static str,
    pub id: u16,
    pub props: SuiteProps,
    /// Symmetric cipher strength.
    pub bits: u32,
}

impl SuiteInfo {
    pub fn key_exchange(&self) -> KeyExchange {
        if self.props.contains(SuiteProps::KRSA) {
            KeyExchange::Rsa
        } else if self.props.contains(SuiteProps::ARSA) {
            KeyExchange::EcdheRsa
        } else {
            KeyExchange::EcdheEcdsa
        }
    }

    pub fn requires_tls12(&self) -> bool {
        self.props.contains(SuiteProps::TLS12)
    }
}

macro_rules! suites {
    ($($name:expr, $id:expr, $($prop:ident)|+, $bits:expr;)*) => {
        /// Supported suites, strongest first.
        pub const SUITES: &[SuiteInfo] = &[
            $(SuiteInfo {
                name: $name,
                id: $id,
                props: SuiteProps::from_bits_truncate($(SuiteProps::$prop.bits())|+),
                bits: $bits,
            },)*
        ];
    };
}

suites! {
    "ECDHE-ECDSA-CHACHA20-POLY1305", 0xCCA9, ECDHE | ECDSA | CHACHA20 | AEAD | TLS12 | HIGH, 256;
    "ECDHE-RSA-CHACHA20-POLY1305",   0xCCA8, ECDHE | ARSA | CHACHA20 | AEAD | TLS12 | HIGH, 256;
    "ECDHE-ECDSA-AES128-GCM-SHA256", 0xC02B, ECDHE | ECDSA | AES128 | AESGCM | AEAD | TLS12 | HIGH, 128;
    "ECDHE-RSA-AES128-GCM-SHA256",   0xC02F, ECDHE | ARSA | AES128 | AESGCM | AEAD | TLS12 | HIGH, 128;
    "ECDHE-ECDSA-AES256-GCM-SHA384", 0xC02C, ECDHE | ECDSA | AES256 | AESGCM | AEAD | TLS12 | HIGH, 256;
    "ECDHE-RSA-AES256-GCM-SHA384",   0xC030, ECDHE | ARSA | AES256 | AESGCM | AEAD | TLS12 | HIGH, 256;
    "ECDHE-ECDSA-AES128-CCM",        0xC0AC, ECDHE | ECDSA | AES128 | AESCCM | AEAD | TLS12 | HIGH, 128;
    "ECDHE-ECDSA-AES256-CCM",        0xC0AD, ECDHE | ECDSA | AES256 | AESCCM | AEAD | TLS12 | HIGH, 256;
    "ECDHE-ECDSA-AES128-CCM8",       0xC0AE, ECDHE | ECDSA | AES128 | AESCCM8 | AEAD | TLS12 | HIGH, 128;
    "ECDHE-ECDSA-AES256-CCM8",       0xC0AF, ECDHE | ECDSA | AES256 | AESCCM8 | AEAD | TLS12 | HIGH, 256;
    "ECDHE-ECDSA-AES128-SHA256",     0xC023, ECDHE | ECDSA | AES128 | SHA256 | TLS12 | HIGH, 128;
    "ECDHE-RSA-AES128-SHA256",       0xC027, ECDHE | ARSA | AES128 | SHA256 | TLS12 | HIGH, 128;
    "ECDHE-ECDSA-AES256-SHA384",     0xC024, ECDHE | ECDSA | AES256 | SHA384 | TLS12 | HIGH, 256;
    "ECDHE-RSA-AES256-SHA384",       0xC028, ECDHE | ARSA | AES256 | SHA384 | TLS12 | HIGH, 256;
    "ECDHE-ECDSA-AES128-SHA",        0xC009, ECDHE | ECDSA | AES128 | SHA1 | TLS10 | HIGH, 128;
    "ECDHE-RSA-AES128-SHA",          0xC013, ECDHE | ARSA | AES128 | SHA1 | TLS10 | HIGH, 128;
    "ECDHE-ECDSA-AES256-SHA",        0xC00A, ECDHE | ECDSA | AES256 | SHA1 | TLS10 | HIGH, 256;
    "ECDHE-RSA-AES256-SHA",          0xC014, ECDHE | ARSA | AES256 | SHA1 | TLS10 | HIGH, 256;
    "AES128-GCM-SHA256",             0x009C, KRSA | ARSA | AES128 | AESGCM | SHA256 | TLS12 | HIGH, 128;
    "AES256-GCM-SHA384",             0x009D, KRSA | ARSA | AES256 | AESGCM | SHA384 | TLS12 | HIGH, 256;
    "AES128-CCM",                    0xC09C, KRSA | ARSA | AES128 | AESCCM | TLS12 | HIGH, 128;
    "AES256-CCM",                    0xC09D, KRSA | ARSA | AES256 | AESCCM | TLS12 | HIGH, 256;
    "AES128-CCM8",                   0xC0A0, KRSA | ARSA | AES128 | AESCCM8 | TLS12 | HIGH, 128;
    "AES256-CCM8",                   0xC0A1, KRSA | ARSA | AES256 | AESCCM8 | TLS12 | HIGH, 256;
    "AES128-SHA256",                 0x003C, KRSA | ARSA | AES128 | SHA256 | TLS12 | HIGH, 128;
    "AES256-SHA256",                 0x003D, KRSA | ARSA | AES256 | SHA256 | TLS12 | HIGH, 256;
    "AES128-SHA",                    0x002F, KRSA | ARSA | AES128 | SHA1 | TLS10 | HIGH, 128;
    "AES256-SHA",                    0x0035, KRSA | ARSA | AES256 | SHA1 | TLS10 | HIGH, 256;
    "ECDHE-ECDSA-DES-CBC3-SHA",      0xC008, ECDHE | ECDSA | TRIPLEDES | SHA1 | TLS10 | MEDIUM, 112;
    "ECDHE-RSA-DES-CBC3-SHA",        0xC012, ECDHE | ARSA | TRIPLEDES | SHA1 | TLS10 | MEDIUM, 112;
    "DES-CBC3-SHA",                  0x000A, KRSA | ARSA | TRIPLEDES | SHA1 | TLS10 | MEDIUM, 112;
}

/// Keywords of the cipher list syntax. Keywords OpenSSL knows but which
/// select nothing here (NULL, DHE, RC4, ...) are simply absent.
const KEYWORDS: &[(&str, u32)] = &[
    ("3DES", SuiteProps::TRIPLEDES.bits()),
    ("AEAD", SuiteProps::AEAD.bits()),
    ("AES", SuiteProps::AES128.bits() | SuiteProps::AES256.bits()),
    ("AES128", SuiteProps::AES128.bits()),
    ("AES256", SuiteProps::AES256.bits()),
    ("AESCCM", SuiteProps::AESCCM.bits()),
    ("AESCCM8", SuiteProps::AESCCM8.bits()),
    ("AESGCM", SuiteProps::AESGCM.bits()),
    ("ALL", !0),
    ("CHACHA20", SuiteProps::CHACHA20.bits()),
    ("COMPLEMENTOFALL", 0),
    ("COMPLEMENTOFDEFAULT", 0),
    ("DEFAULT", !0),
    ("ECDH", SuiteProps::ECDHE.bits()),
    ("ECDHE", SuiteProps::ECDHE.bits()),
    ("ECDSA", SuiteProps::ECDSA.bits()),
    ("EECDH", SuiteProps::ECDHE.bits()),
    ("HIGH", SuiteProps::HIGH.bits()),
    ("LOW", SuiteProps::LOW.bits()),
    ("MEDIUM", SuiteProps::MEDIUM.bits()),
    ("RSA", SuiteProps::KRSA.bits() | SuiteProps::ARSA.bits()),
    ("SHA", SuiteProps::SHA1.bits()),
    ("SHA1", SuiteProps::SHA1.bits()),
    ("SHA256", SuiteProps::SHA256.bits()),
    ("SHA384", SuiteProps::SHA384.bits()),
    ("SSLv3", SuiteProps::TLS10.bits()),
    ("TLSv1", SuiteProps::TLS10.bits()),
    ("TLSv1.2", SuiteProps::TLS12.bits()),
    ("aECDSA", SuiteProps::ECDSA.bits()),
    ("aRSA", SuiteProps::ARSA.bits()),
    ("kEECDH", SuiteProps::ECDHE.bits()),
    ("kRSA", SuiteProps::KRSA.bits()),
];

pub fn lookup(id: u16) -> Option<&'static SuiteInfo> {
    SUITES.iter().find(|s| s.id == id)
}

pub fn suite_name(id: u16) -> Option<&'static str> {
    lookup(id).map(|s| s.name)
}

/// Strength of a suite in bits, 0 for unknown suites.
pub fn suite_bits(id: u16) -> u32 {
    lookup(id).map_or(0, |s| s.bits)
}

/// An ordered selection of `SUITES` indices.
#[derive(Default)]
struct SuiteList {
    order: Vec<usize>,
    mask: u32,
}

impl SuiteList {
    fn add(&mut self, i: usize) -> bool {
        if self.mask & (1 << i) != 0 {
            return false;
        }
        self.order.push(i);
        self.mask |= 1 << i;
        true
    }

    fn del(&mut self, i: usize) -> bool {
        if self.mask & (1 << i) == 0 {
            return false;
        }
        self.order.retain(|&j| j != i);
        self.mask &= !(1 << i);
        true
    }
}

/// Suites matched by one `+`-joined token.
fn token_mask(token: &str) -> u32 {
    let mut mask = !0u32;
    for word in token.split('+') {
        if let Some(i) = SUITES.iter().position(|s| s.name == word) {
            return 1 << i;
        }
        let props = match KEYWORDS.iter().find(|(name, _)| *name == word) {
            Some(&(_, props)) => props,
            None => return 0,
        };
        for (i, suite) in SUITES.iter().enumerate() {
            if suite.props.bits() & props == 0 {
                mask &= !(1 << i);
            }
        }
    }
    mask
}

/// Evaluates an OpenSSL-style cipher list into suite identifiers in
/// preference order.
///
/// Tokens are separated by `:`, `;`, `,` or space. A `!` prefix removes
/// suites for good, `-` removes them until added again and `+` moves them
/// to the end. Unknown keywords select nothing.
pub fn parse(ciphers: &str) -> Result<Vec<u16>> {
    let mut avail = SuiteList::default();
    let mut unavail = SuiteList::default();
    for i in 0..SUITES.len() {
        unavail.add(i);
    }

    for token in ciphers.split(|c| matches!(c, ':' | ' ' | ';' | ',')) {
        if token == "@STRENGTH" {
            return Err(Error::msg("@STRENGTH is not supported"));
        }
        let (prefix, token) = match token.chars().next() {
            Some(p @ ('!' | '-' | '+')) => (Some(p), &token[1..]),
            _ => (None, token),
        };
        let mask = token_mask(token);

        for i in (0..SUITES.len()).filter(|i| mask & (1 << i) != 0) {
            match prefix {
                None => {
                    if unavail.del(i) {
                        avail.add(i);
                    }
                }
                Some('+') => {
                    if avail.del(i) {
                        avail.add(i);
                    }
                }
                Some('-') => {
                    if avail.del(i) {
                        unavail.add(i);
                    }
                }
                _ => {
                    avail.del(i);
                    unavail.del(i);
                }
            }
        }
    }

    if avail.order.is_empty() {
        return Err(Error::msg("no usable cipher"));
    }
    Ok(avail.order.iter().map(|&i| SUITES[i].id).collect())
}
