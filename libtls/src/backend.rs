/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! The capability interface of the cryptographic engine.
//!
//! This crate implements no cryptography. Record protection, handshake
//! cryptography, chain validation and private key arithmetic are all
//! provided by a `Backend`, installed once per process with
//! [`init`](crate::init) or attached to a single configuration with
//! [`Config::with_backend`](crate::ssl::Config::with_backend).

use std::sync::Arc;

use crate::error::Result;
use crate::pk::{Curve, EcPrivateKey, RsaPrivateKey};
use crate::ssl::engine::{Engine, EngineParams, ServerPolicy};
use crate::x509::{TrustAnchor, X509Class};

pub trait Backend: Send + Sync {
    /// Creates a client engine. `x509` receives the server's chain;
    /// `server_name` is sent as SNI and passed to `x509.start_chain`.
    fn client_engine(
        &self,
        params: EngineParams,
        x509: Box<dyn X509Class>,
        server_name: Option<&str>,
    ) -> Result<Box<dyn Engine>>;

    /// Creates a server engine. `x509` is present only when client
    /// certificates are requested.
    fn server_engine(
        &self,
        params: EngineParams,
        policy: Box<dyn ServerPolicy>,
        x509: Option<Box<dyn X509Class>>,
    ) -> Result<Box<dyn Engine>>;

    /// A verifier that checks names, validity dates and the link to one of
    /// `anchors`, reporting the first failure it meets.
    fn minimal_verifier(&self, anchors: Arc<Vec<TrustAnchor>>) -> Box<dyn X509Class>;

    /// RSA decryption of a PKCS#1 v1.5 encrypted premaster secret, in place.
    /// On success `data` is left holding the decrypted secret.
    fn rsa_ssl_decrypt(&self, key: &RsaPrivateKey, data: &mut Vec<u8>) -> bool;

    /// PKCS#1 v1.5 signature; `hash_oid` is empty for the raw MD5+SHA-1
    /// concatenation. `sig` has exactly the modulus length.
    fn rsa_pkcs1_sign(&self, hash_oid: &[u8], hash_value: &[u8], key: &RsaPrivateKey, sig: &mut [u8]) -> bool;

    /// ASN.1 (DER) ECDSA signature into `sig`, returning its length or 0.
    fn ecdsa_sign_asn1(&self, hash_value: &[u8], key: &EcPrivateKey, sig: &mut [u8]) -> usize;

    /// Multiplies the encoded point `point` by `scalar` in place.
    fn ec_mul(&self, point: &mut [u8], scalar: &[u8], curve: Curve) -> bool;

    /// Offset and length of the X coordinate within an encoded point.
    fn ec_xoff(&self, curve: Curve) -> (usize, usize);

    /// Derives the public point of an EC private key.
    fn ec_compute_pub(&self, key: &EcPrivateKey) -> Option<Vec<u8>>;
}
