/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::sync::Arc;

use tracing::debug;

use crate::backend::Backend;
use crate::error::{EngineError, Error, Result, X509Status};
use crate::pk::PublicKey;
use crate::ssl::context::{lock, SharedState};
use super::{Certificate, X509Class};

bitflags! {
    /// Which verdicts of the engine's verifier are enforced.
    pub struct VerifyFlags: u32 {
        /// Chain must link to a trust anchor.
        const CERT = 1 << 0;
        /// Leaf must match the expected server name.
        const NAME = 1 << 1;
        /// Every certificate must be within its validity window.
        const TIME = 1 << 2;
    }
}

impl Default for VerifyFlags {
    fn default() -> VerifyFlags {
        VerifyFlags::all()
    }
}

/// Chain verifier handed to the engine for a connection.
///
/// Forwards to the engine's minimal verifier, relaxes its verdict according
/// to `VerifyFlags`, enforces the depth limit and keeps a copy of the peer
/// chain in the connection's shared state.
pub(crate) struct VerifyBridge {
    inner: Box<dyn X509Class>,
    flags: VerifyFlags,
    verify_depth: usize,
    depth: usize,
    shared: SharedState,
}

impl VerifyBridge {
    pub(crate) fn new(inner: Box<dyn X509Class>, flags: VerifyFlags, verify_depth: usize, shared: SharedState) -> VerifyBridge {
        VerifyBridge { inner, flags, verify_depth, depth: 0, shared }
    }

    fn relax(&self, status: X509Status) -> X509Status {
        match status {
            Err(EngineError::X509Expired) if !self.flags.contains(VerifyFlags::TIME) => Ok(()),
            Err(EngineError::X509BadServerName) if !self.flags.contains(VerifyFlags::NAME) => Ok(()),
            Err(EngineError::X509NotTrusted) if !self.flags.contains(VerifyFlags::CERT) => Ok(()),
            other => other,
        }
    }
}

impl X509Class for VerifyBridge {
    fn start_chain(&mut self, server_name: Option<&str>) {
        let server_name = server_name.filter(|_| self.flags.contains(VerifyFlags::NAME));
        self.depth = 0;
        lock(&self.shared).peer_chain.clear();
        self.inner.start_chain(server_name);
    }

    fn start_cert(&mut self, length: usize) {
        self.depth += 1;
        lock(&self.shared).peer_chain.push(Vec::with_capacity(length));
        self.inner.start_cert(length);
    }

    fn append(&mut self, buf: &[u8]) {
        if let Some(cert) = lock(&self.shared).peer_chain.last_mut() {
            cert.extend_from_slice(buf);
        }
        self.inner.append(buf);
    }

    fn end_cert(&mut self) {
        self.inner.end_cert();
    }

    fn end_chain(&mut self) -> X509Status {
        let reported = self.inner.end_chain();
        let status = if self.depth > self.verify_depth + 2 {
            Err(EngineError::X509LimitExceeded)
        } else {
            self.relax(reported)
        };
        if status != reported {
            debug!(?reported, ?status, depth = self.depth, "peer chain verdict overridden");
        }

        let mut shared = lock(&self.shared);
        shared.subject = shared
            .peer_chain
            .first()
            .and_then(|leaf| Certificate::from_der(leaf).ok())
            .map(|leaf| leaf.subject());
        status
    }

    fn get_pkey(&self) -> Option<PublicKey> {
        self.inner.get_pkey()
    }
}

/// Checks whether a DER certificate is valid for `name`, using the engine's
/// own name matching rules.
pub fn check_name(backend: &dyn Backend, der: &[u8], name: &str) -> Result<bool> {
    let mut verifier = backend.minimal_verifier(Arc::new(Vec::new()));
    verifier.start_chain(Some(name));
    verifier.start_cert(der.len());
    verifier.append(der);
    verifier.end_cert();
    match verifier.end_chain() {
        Ok(()) | Err(EngineError::X509NotTrusted) => Ok(true),
        Err(EngineError::X509BadServerName) => Ok(false),
        Err(e) => Err(Error::msg(format!("certificate name match: {}", e.as_str()))),
    }
}
