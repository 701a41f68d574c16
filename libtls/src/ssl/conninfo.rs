/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use crate::error::{Error, Result};
use crate::hash::cert_hash;
use crate::pem;
use crate::x509::Certificate;
use super::ciphersuites;
use super::context::ConnShared;
use super::engine::Engine;

/// PEM label of the certificates in `peer_cert`.
pub const PEER_CERT_TAG: &str = "X509 CERTIFICATE";

/// What is known about a connection once its handshake has completed.
///
/// Taken once, right after the handshake; it does not change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub alpn: Option<String>,
    pub cipher: Option<String>,
    pub cipher_strength: u32,
    pub servername: Option<String>,
    pub version: Option<String>,
    /// `SHA256:<hex>` fingerprint of the peer's leaf certificate.
    pub hash: Option<String>,
    pub issuer: Option<String>,
    pub subject: Option<String>,
    /// The whole peer chain, PEM encoded, leaf first.
    pub peer_cert: Option<String>,
    pub notbefore: Option<i64>,
    pub notafter: Option<i64>,
}

impl ConnectionInfo {
    pub(crate) fn populate(engine: &dyn Engine, servername: Option<&str>, shared: &ConnShared) -> Result<ConnectionInfo> {
        let suite = engine.cipher_suite().unwrap_or(0);
        let cipher = ciphersuites::suite_name(suite).ok_or_else(|| Error::msg("unknown cipher suite"))?;
        let version = engine.version().ok_or_else(|| Error::msg("unknown protocol version"))?;

        let mut info = ConnectionInfo {
            alpn: engine.selected_protocol().map(str::to_owned),
            cipher: Some(cipher.to_owned()),
            cipher_strength: ciphersuites::suite_bits(suite),
            servername: servername.map(str::to_owned),
            version: Some(version.as_str().to_owned()),
            ..Default::default()
        };

        if let Some(leaf) = shared.peer_chain.first() {
            info.hash = Some(cert_hash(leaf));
            info.subject = shared.subject.as_ref().map(|subject| subject.to_dn_string());
            if let Ok(cert) = Certificate::from_der(leaf) {
                info.issuer = Some(cert.issuer().to_dn_string());
                info.notbefore = Some(cert.not_before());
                info.notafter = Some(cert.not_after());
            }
            info.peer_cert = Some(
                shared
                    .peer_chain
                    .iter()
                    .map(|der| pem::encode(PEER_CERT_TAG, der))
                    .collect(),
            );
        }
        Ok(info)
    }
}
