/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! Public and private key material.
//!
//! Keys are kept as the raw big-endian integers and curve points the engine
//! works with; no arithmetic is performed in this crate.

use std::fmt;

use yasna::models::ObjectIdentifier;
use yasna::{ASN1Error, ASN1ErrorKind, ASN1Result, BERReader, Tag};
use zeroize::Zeroize;

use crate::error::EngineError;

define!(
    #[raw(u8)]
    /// Key types as numbered by the engine.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    enum KeyType {
        Rsa = 1,
        Ec = 2,
    }
);

define!(
    #[raw(u16)]
    /// Named elliptic curves, using their TLS identifiers.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Curve {
        Secp256r1 = 23,
        Secp384r1 = 24,
        Secp521r1 = 25,
        X25519 = 29,
    }
);

pub(crate) const OID_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 1];
pub(crate) const OID_EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];
const OID_SECP256R1: &[u64] = &[1, 2, 840, 10045, 3, 1, 7];
const OID_SECP384R1: &[u64] = &[1, 3, 132, 0, 34];
const OID_SECP521R1: &[u64] = &[1, 3, 132, 0, 35];

pub(crate) fn oid_is(oid: &ObjectIdentifier, arcs: &[u64]) -> bool {
    oid.components().as_slice() == arcs
}

impl Curve {
    pub(crate) fn from_oid(oid: &ObjectIdentifier) -> Option<Curve> {
        if oid_is(oid, OID_SECP256R1) {
            Some(Curve::Secp256r1)
        } else if oid_is(oid, OID_SECP384R1) {
            Some(Curve::Secp384r1)
        } else if oid_is(oid, OID_SECP521R1) {
            Some(Curve::Secp521r1)
        } else {
            None
        }
    }

    /// Length of an uncompressed point on this curve.
    pub fn point_len(self) -> usize {
        match self {
            Curve::Secp256r1 => 65,
            Curve::Secp384r1 => 97,
            Curve::Secp521r1 => 133,
            Curve::X25519 => 32,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa { n: Vec<u8>, e: Vec<u8> },
    Ec { curve: Curve, q: Vec<u8> },
}

impl PublicKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Rsa { .. } => KeyType::Rsa,
            PublicKey::Ec { .. } => KeyType::Ec,
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PublicKey::Rsa { n, .. } => write!(f, "PublicKey::Rsa({} bits)", bit_len(n)),
            PublicKey::Ec { curve, .. } => write!(f, "PublicKey::Ec({:?})", curve),
        }
    }
}

/// An RSA private key in CRT form.
#[derive(Clone)]
pub struct RsaPrivateKey {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub dp: Vec<u8>,
    pub dq: Vec<u8>,
    pub iq: Vec<u8>,
    d: Vec<u8>,
}

impl RsaPrivateKey {
    /// Modulus size in bits.
    pub fn n_bitlen(&self) -> usize {
        bit_len(&self.n)
    }

    pub fn private_exponent(&self) -> &[u8] {
        &self.d
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.iq.zeroize();
    }
}

#[derive(Clone)]
pub struct EcPrivateKey {
    pub curve: Curve,
    /// The secret scalar.
    pub x: Vec<u8>,
    /// The public point, when the encoding carried one.
    pub public: Option<Vec<u8>>,
}

impl Drop for EcPrivateKey {
    fn drop(&mut self) {
        self.x.zeroize();
    }
}

#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Ec(EcPrivateKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrivateKey::Rsa(k) => write!(f, "PrivateKey::Rsa({} bits)", k.n_bitlen()),
            PrivateKey::Ec(k) => write!(f, "PrivateKey::Ec({:?})", k.curve),
        }
    }
}

impl PrivateKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            PrivateKey::Rsa(_) => KeyType::Rsa,
            PrivateKey::Ec(_) => KeyType::Ec,
        }
    }

    /// Decodes a PKCS#1 `RSAPrivateKey`.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<PrivateKey, EngineError> {
        Ok(PrivateKey::Rsa(yasna::parse_der(der, read_rsa_private_key)?))
    }

    /// Decodes a SEC1 `ECPrivateKey`; the curve must be named in the key.
    pub fn from_sec1_der(der: &[u8]) -> Result<PrivateKey, EngineError> {
        Ok(PrivateKey::Ec(yasna::parse_der(der, |r| read_ec_private_key(r, None))?))
    }

    /// Decodes a PKCS#8 `PrivateKeyInfo` wrapping an RSA or EC key.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<PrivateKey, EngineError> {
        let (alg, curve, inner) = yasna::parse_der(der, |r| {
            r.read_sequence(|r| {
                let version = r.next().read_u8()?;
                if version > 1 {
                    return Err(ASN1Error::new(ASN1ErrorKind::Invalid));
                }
                let (alg, param) = r.next().read_sequence(|r| {
                    let alg = r.next().read_oid()?;
                    let param = r.read_optional(|r| r.read_oid())?;
                    r.read_optional(|r| r.read_null())?;
                    Ok((alg, param))
                })?;
                let inner = r.next().read_bytes()?;
                r.read_optional(|r| r.read_tagged_implicit(Tag::context(0), |r| r.read_der()))?;
                r.read_optional(|r| r.read_tagged_implicit(Tag::context(1), |r| r.read_der()))?;
                Ok((alg, param, inner))
            })
        })?;

        if oid_is(&alg, OID_RSA_ENCRYPTION) {
            PrivateKey::from_pkcs1_der(&inner)
        } else if oid_is(&alg, OID_EC_PUBLIC_KEY) {
            let curve = match curve {
                Some(oid) => Some(Curve::from_oid(&oid).ok_or(EngineError::X509Unsupported)?),
                None => None,
            };
            Ok(PrivateKey::Ec(yasna::parse_der(&inner, |r| read_ec_private_key(r, curve))?))
        } else {
            Err(EngineError::X509Unsupported)
        }
    }
}

/// Reads a non-negative INTEGER as minimal big-endian bytes.
pub(crate) fn read_uint(r: BERReader) -> ASN1Result<Vec<u8>> {
    let (bytes, non_negative) = r.read_bigint_bytes()?;
    if !non_negative {
        return Err(ASN1Error::new(ASN1ErrorKind::Invalid));
    }
    Ok(strip_leading_zeros(&bytes).to_vec())
}

pub(crate) fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn bit_len(n: &[u8]) -> usize {
    let n = strip_leading_zeros(n);
    match n.first() {
        Some(&top) => n.len() * 8 - top.leading_zeros() as usize,
        None => 0,
    }
}

fn read_rsa_private_key(r: BERReader) -> ASN1Result<RsaPrivateKey> {
    r.read_sequence(|r| {
        let version = r.next().read_u8()?;
        if version != 0 {
            // multi-prime keys
            return Err(ASN1Error::new(ASN1ErrorKind::Invalid));
        }
        Ok(RsaPrivateKey {
            n: read_uint(r.next())?,
            e: read_uint(r.next())?,
            d: read_uint(r.next())?,
            p: read_uint(r.next())?,
            q: read_uint(r.next())?,
            dp: read_uint(r.next())?,
            dq: read_uint(r.next())?,
            iq: read_uint(r.next())?,
        })
    })
}

fn read_ec_private_key(r: BERReader, outer_curve: Option<Curve>) -> ASN1Result<EcPrivateKey> {
    r.read_sequence(|r| {
        if r.next().read_u8()? != 1 {
            return Err(ASN1Error::new(ASN1ErrorKind::Invalid));
        }
        let x = r.next().read_bytes()?;
        let named = r.read_optional(|r| r.read_tagged(Tag::context(0), |r| r.read_oid()))?;
        let public = r.read_optional(|r| r.read_tagged(Tag::context(1), |r| r.read_bitvec_bytes()))?;

        let curve = match named {
            Some(oid) => Curve::from_oid(&oid),
            None => outer_curve,
        }
        .ok_or_else(|| ASN1Error::new(ASN1ErrorKind::Invalid))?;

        Ok(EcPrivateKey { curve, x, public: public.map(|(bits, _)| bits) })
    })
}
