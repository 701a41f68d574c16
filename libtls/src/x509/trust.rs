/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use tracing::debug;

use crate::error::{Error, Result};
use crate::pem;
use crate::pk::PublicKey;
use super::Certificate;

/// Upper bound on the encoded subject name of a trust anchor.
pub const MAX_DN_LEN: usize = 1024;

/// A root of trust: the subject DN and public key of a CA certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pub dn: Vec<u8>,
    pub public_key: PublicKey,
    pub is_ca: bool,
}

impl TrustAnchor {
    fn from_certificate(cert: &Certificate) -> Result<TrustAnchor> {
        if cert.subject_der().len() > MAX_DN_LEN {
            return Err(Error::msg("X.509 DN is too long"));
        }
        let public_key = cert.public_key().ok_or_else(|| Error::msg("unknown public key type"))?;

        let mut dn = Vec::with_capacity(cert.subject_der().len());
        dn.extend_from_slice(cert.subject_der());
        let public_key = match public_key {
            PublicKey::Rsa { n, e } => PublicKey::Rsa { n: exact(n), e: exact(e) },
            PublicKey::Ec { curve, q } => PublicKey::Ec { curve: *curve, q: exact(q) },
        };
        Ok(TrustAnchor { dn, public_key, is_ca: cert.is_ca() })
    }
}

fn exact(bytes: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(bytes.len());
    v.extend_from_slice(bytes);
    v
}

/// Builds trust anchors from every certificate block of a PEM container.
///
/// Blocks with other tags are skipped. Any certificate that fails to decode
/// fails the whole load.
pub fn load_ca(pem_data: &[u8]) -> Result<Vec<TrustAnchor>> {
    let blocks = pem::decode(pem_data).map_err(|e| Error::msg(format!("certificate decoding failed: {}", e)))?;

    let mut anchors = Vec::new();
    for block in blocks.iter().filter(|b| b.is_certificate()) {
        let cert = Certificate::from_der(&block.data)
            .map_err(|e| Error::msg(format!("certificate decoding failed: {}", e.as_str())))?;
        anchors.push(TrustAnchor::from_certificate(&cert)?);
    }
    anchors.shrink_to_fit();

    debug!(anchors = anchors.len(), "loaded trust anchors");
    Ok(anchors)
}
