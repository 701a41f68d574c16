/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::net::IpAddr;
use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::hash::HashId;
use crate::pk::{KeyType, PrivateKey};
use crate::x509::check_name;
use super::config::Config;
use super::context::{lock, SharedState};
use super::engine::{ClientOffer, KeyExchange, ServerChoices, ServerPolicy, Version};
use super::keypair::Keypair;

/// Largest DER ECDSA signature the engine can produce (P-521).
const MAX_ECDSA_SIG_LEN: usize = 139;
const MAX_HASH_LEN: usize = 64;

/// Server policy selecting among the configured keypairs.
///
/// The keypair is chosen by SNI, the suite by key type and available
/// signature hashes. The selected keypair index is published in the
/// connection's shared state; failures of the private key operations are
/// recorded there too, so they outlive the engine's generic error code.
pub(crate) struct KeypairPolicy {
    config: Arc<Config>,
    shared: SharedState,
    selected: Option<usize>,
}

impl KeypairPolicy {
    pub(crate) fn new(config: Arc<Config>, shared: SharedState) -> KeypairPolicy {
        KeypairPolicy { config, shared, selected: None }
    }

    fn keypair(&self) -> Option<&Keypair> {
        self.selected.and_then(|i| self.config.keypairs().get(i))
    }

    fn fail(&self, msg: &str) {
        lock(&self.shared).error = Some(Error::msg(msg));
    }

    /// Index of the first keypair whose leaf is valid for `name`, falling
    /// back to the first keypair.
    fn select_keypair(&self, name: Option<&str>) -> Result<usize, Error> {
        for (i, keypair) in self.config.keypairs().iter().enumerate() {
            let leaf = match keypair.chain().first() {
                Some(leaf) => leaf,
                None => continue,
            };
            let matched = match name {
                Some(name) => check_name(&**self.config.backend(), leaf, name)?,
                None => true,
            };
            if matched {
                return Ok(i);
            }
        }
        Ok(0)
    }
}

/// Picks the signature hash: the strongest common one on TLS 1.2, the
/// mandated one before.
fn choose_algo(hashes: u32, version: Version, pinned: HashId) -> Option<u16> {
    let hash = if version >= Version::Tls12 {
        (HashId::Sha1.to_raw()..=HashId::Sha512.to_raw())
            .rev()
            .find(|&id| hashes & (1 << id) != 0)?
    } else if hashes & (1 << pinned.to_raw()) != 0 {
        pinned.to_raw()
    } else {
        return None;
    };
    Some(0xFF00 | u16::from(hash))
}

impl ServerPolicy for KeypairPolicy {
    fn choose(&mut self, offer: &ClientOffer<'_>) -> Option<ServerChoices> {
        // IP literals are not valid SNI, but some clients send them anyway
        let name = offer.server_name.filter(|name| name.parse::<IpAddr>().is_err());

        let index = match self.select_keypair(name) {
            Ok(index) => index,
            Err(e) => {
                lock(&self.shared).error = Some(e);
                return None;
            }
        };
        self.selected = Some(index);
        lock(&self.shared).keypair = Some(index);

        let keypair = self.config.keypairs().get(index)?;
        let key_type = keypair.key().map(PrivateKey::key_type);
        let signer = keypair.signer_key_type();

        for &(suite, keyx) in offer.suites {
            let algo_id = match keyx {
                KeyExchange::Rsa if key_type == Some(KeyType::Rsa) => 0,
                KeyExchange::EcdheRsa if key_type == Some(KeyType::Rsa) => {
                    match choose_algo(offer.hashes & 0xFF, offer.version, HashId::Md5Sha1) {
                        Some(algo_id) => algo_id,
                        None => continue,
                    }
                }
                KeyExchange::EcdheEcdsa if key_type == Some(KeyType::Ec) => {
                    match choose_algo(offer.hashes >> 8, offer.version, HashId::Sha1) {
                        Some(algo_id) => algo_id,
                        None => continue,
                    }
                }
                KeyExchange::EcdhRsa if key_type == Some(KeyType::Ec) && signer == Some(KeyType::Rsa) => 0,
                KeyExchange::EcdhEcdsa if key_type == Some(KeyType::Ec) && signer == Some(KeyType::Ec) => 0,
                _ => continue,
            };
            debug!(keypair = index, suite, algo_id, "server policy choice");
            return Some(ServerChoices { cipher_suite: suite, algo_id, chain: keypair.chain().to_vec() });
        }
        debug!(keypair = index, "no offered suite fits the selected keypair");
        None
    }

    fn do_keyx(&mut self, data: &mut Vec<u8>) -> bool {
        let backend = self.config.backend().clone();
        match self.keypair().and_then(Keypair::key) {
            Some(PrivateKey::Rsa(rsa)) => backend.rsa_ssl_decrypt(rsa, data),
            Some(PrivateKey::Ec(ec)) => {
                let ok = backend.ec_mul(data, &ec.x, ec.curve);
                let (xoff, xlen) = backend.ec_xoff(ec.curve);
                if xoff + xlen > data.len() {
                    return false;
                }
                data.drain(..xoff);
                data.truncate(xlen);
                ok
            }
            None => false,
        }
    }

    fn do_sign(&mut self, algo_id: u16, hash_value: &[u8], max_len: usize) -> Option<Vec<u8>> {
        if hash_value.len() > MAX_HASH_LEN {
            self.fail("buffer too small for hash value");
            return None;
        }
        let hash = HashId::from_raw((algo_id & 0xFF) as u8);
        let backend = self.config.backend().clone();

        match self.keypair().and_then(Keypair::key) {
            Some(PrivateKey::Rsa(rsa)) => {
                let hash_oid: &[u8] = match hash {
                    Some(HashId::Md5Sha1) => &[],
                    Some(hash) => match hash.pkcs1_oid() {
                        Some(oid) => oid,
                        None => {
                            self.fail("unknown hash function for RSA signature");
                            return None;
                        }
                    },
                    None => {
                        self.fail("unknown hash function for RSA signature");
                        return None;
                    }
                };
                let sig_len = (rsa.n_bitlen() + 7) >> 3;
                if max_len < sig_len {
                    self.fail("buffer is too small for RSA signature");
                    return None;
                }
                let mut sig = vec![0; sig_len];
                if !backend.rsa_pkcs1_sign(hash_oid, hash_value, rsa, &mut sig) {
                    self.fail("RSA sign failed");
                    return None;
                }
                Some(sig)
            }
            Some(PrivateKey::Ec(ec)) => {
                if hash.is_none() || hash == Some(HashId::Md5) {
                    self.fail("unknown hash function for ECDSA signature");
                    return None;
                }
                if max_len < MAX_ECDSA_SIG_LEN {
                    self.fail("buffer is too small for ECDSA signature");
                    return None;
                }
                let mut sig = vec![0; MAX_ECDSA_SIG_LEN];
                let len = backend.ecdsa_sign_asn1(hash_value, ec, &mut sig);
                if len == 0 {
                    self.fail("ECDSA sign failed");
                    return None;
                }
                sig.truncate(len);
                Some(sig)
            }
            None => {
                self.fail("unknown private key type");
                None
            }
        }
    }
}
