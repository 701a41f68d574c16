/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::path::Path;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::pem;
use crate::pk::{KeyType, PrivateKey, PublicKey};
use crate::util::load_file;
use crate::x509::Certificate;

const KEY_TAGS: [&str; 3] = ["RSA PRIVATE KEY", "EC PRIVATE KEY", "PRIVATE KEY"];

/// A certificate chain (leaf first) and the private key of its leaf.
#[derive(Debug, Clone, Default)]
pub struct Keypair {
    chain: Vec<Vec<u8>>,
    signer_key_type: Option<KeyType>,
    key: Option<PrivateKey>,
}

impl Keypair {
    pub fn new() -> Keypair {
        Keypair::default()
    }

    pub fn chain(&self) -> &[Vec<u8>] {
        &self.chain
    }

    pub fn key(&self) -> Option<&PrivateKey> {
        self.key.as_ref()
    }

    /// Type of the key that signed the leaf certificate.
    pub fn signer_key_type(&self) -> Option<KeyType> {
        self.signer_key_type
    }

    pub fn set_cert_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = load_file(path.as_ref(), "certificate")?;
        self.set_cert_mem(&data)
    }

    /// Replaces the chain with every certificate block of a PEM container;
    /// other blocks are skipped.
    pub fn set_cert_mem(&mut self, mem: &[u8]) -> Result<()> {
        let blocks = pem::decode(mem).map_err(|_| Error::msg("certificate decoding failed"))?;
        let chain: Vec<Vec<u8>> = blocks
            .into_iter()
            .filter(|block| block.is_certificate())
            .map(|block| block.data)
            .collect();
        if chain.is_empty() {
            return Err(Error::msg("empty certificate chain"));
        }

        self.signer_key_type = Certificate::from_der(&chain[0]).ok().and_then(|leaf| leaf.signer_key_type());
        self.chain = chain;
        Ok(())
    }

    pub fn set_key_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = zeroize::Zeroizing::new(load_file(path.as_ref(), "key")?);
        self.set_key_mem(&data)
    }

    /// Replaces the private key with the first key block of a PEM container.
    pub fn set_key_mem(&mut self, mem: &[u8]) -> Result<()> {
        let blocks = pem::decode(mem).map_err(|_| Error::msg("secret key decoding failed"))?;
        let block = blocks
            .iter()
            .find(|block| KEY_TAGS.contains(&block.tag.as_str()))
            .ok_or_else(|| Error::msg("unsupported or missing secret key"))?;

        let decoded = match block.tag.as_str() {
            "RSA PRIVATE KEY" => PrivateKey::from_pkcs1_der(&block.data),
            "EC PRIVATE KEY" => PrivateKey::from_sec1_der(&block.data),
            _ => PrivateKey::from_pkcs8_der(&block.data),
        };
        let key = decoded.map_err(|e| Error::msg(format!("secret key decoding failed: {}", e.as_str())))?;

        self.clear_key();
        self.key = Some(key);
        Ok(())
    }

    pub fn set_ocsp_staple_file<P: AsRef<Path>>(&mut self, _path: P) -> Result<()> {
        Err(Error::msg("OCSP stapling is not supported"))
    }

    pub fn set_ocsp_staple_mem(&mut self, _staple: &[u8]) -> Result<()> {
        Err(Error::msg("OCSP stapling is not supported"))
    }

    /// Wipes the private key; the chain is kept.
    pub fn clear_key(&mut self) {
        // key material is zeroized on drop
        self.key = None;
    }

    /// Checks that the private key belongs to the leaf certificate.
    pub fn check(&self, backend: &dyn Backend) -> Result<()> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::msg("incomplete key pair; missing private key"))?;
        let leaf = self
            .chain
            .first()
            .ok_or_else(|| Error::msg("incomplete key pair; missing certificate chain"))?;

        let cert = Certificate::from_der(leaf).map_err(|e| Error::msg(e.as_str()))?;
        let matches = match (cert.public_key(), key) {
            (Some(PublicKey::Rsa { n, .. }), PrivateKey::Rsa(rsa)) => *n == rsa.n,
            (Some(PublicKey::Ec { curve, q }), PrivateKey::Ec(ec)) => {
                let public = match &ec.public {
                    Some(public) => Some(public.clone()),
                    None => backend.ec_compute_pub(ec),
                };
                *curve == ec.curve && public.as_ref() == Some(q)
            }
            _ => false,
        };
        if !matches {
            return Err(Error::msg("private/public key mismatch"));
        }
        Ok(())
    }

    pub(crate) fn has_chain_and_key(&self) -> bool {
        !self.chain.is_empty() && self.key.is_some()
    }
}
