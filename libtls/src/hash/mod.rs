/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use sha2::{Digest, Sha256};

define!(
    #[raw(u8)]
    /// Hash function identifiers as numbered by the engine.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum HashId {
        Md5Sha1 = 0,
        Md5 = 1,
        Sha1 = 2,
        Sha224 = 3,
        Sha256 = 4,
        Sha384 = 5,
        Sha512 = 6,
    }
);

impl HashId {
    /// Output length of the hash function in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashId::Md5Sha1 => 36,
            HashId::Md5 => 16,
            HashId::Sha1 => 20,
            HashId::Sha224 => 28,
            HashId::Sha256 => 32,
            HashId::Sha384 => 48,
            HashId::Sha512 => 64,
        }
    }

    /// The DigestInfo OID of the hash (length-prefixed, as PKCS#1 signing
    /// expects), or `None` for the hashes that have no PKCS#1 v1.5 encoding
    /// here.
    pub fn pkcs1_oid(self) -> Option<&'static [u8]> {
        match self {
            HashId::Sha1 => Some(&OID_SHA1),
            HashId::Sha224 => Some(&OID_SHA224),
            HashId::Sha256 => Some(&OID_SHA256),
            HashId::Sha384 => Some(&OID_SHA384),
            HashId::Sha512 => Some(&OID_SHA512),
            HashId::Md5Sha1 | HashId::Md5 => None,
        }
    }
}

const OID_SHA1: [u8; 6] = [0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A];
const OID_SHA224: [u8; 10] = [0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04];
const OID_SHA256: [u8; 10] = [0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];
const OID_SHA384: [u8; 10] = [0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02];
const OID_SHA512: [u8; 10] = [0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03];

/// Fingerprint of a DER certificate in the `SHA256:<hex>` form.
pub fn cert_hash(der: &[u8]) -> String {
    format!("SHA256:{}", hex::encode(Sha256::digest(der)))
}
