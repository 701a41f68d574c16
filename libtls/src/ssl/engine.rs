/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! The record/handshake engine as seen by a connection.
//!
//! An engine never touches a socket. It exposes its progress as a set of
//! state bits and four buffers: outgoing records, incoming records,
//! outgoing application data and incoming application data. The connection
//! moves bytes between those buffers and the transport.

use crate::error::EngineError;
use crate::hash::HashId;
use crate::pk::PrivateKey;

/// Size of the incoming record buffer.
pub const BUFSIZE_INPUT: usize = 16384 + 325;
/// Size of the outgoing record buffer.
pub const BUFSIZE_OUTPUT: usize = 16384 + 85;
/// Size of a buffer serving both directions.
pub const BUFSIZE_BIDI: usize = BUFSIZE_INPUT + BUFSIZE_OUTPUT;

bitflags! {
    /// Engine progress bits.
    pub struct EngineState: u32 {
        /// The engine is finished, cleanly or after an error.
        const CLOSED  = 0x0001;
        /// Record bytes are waiting to be sent.
        const SENDREC = 0x0002;
        /// The engine wants record bytes.
        const RECVREC = 0x0004;
        /// Application data may be written.
        const SENDAPP = 0x0008;
        /// Application data is available.
        const RECVAPP = 0x0010;
    }
}

bitflags! {
    /// Behaviour switches handed to the engine.
    pub struct EngineFlags: u32 {
        const ENFORCE_SERVER_PREFERENCES = 1 << 0;
        const NO_RENEGOTIATION           = 1 << 1;
        const TOLERATE_NO_CLIENT_AUTH    = 1 << 2;
        const FAIL_ON_ALPN_MISMATCH      = 1 << 3;
    }
}

define!(
    #[raw(u16)]
    /// Protocol versions the engine can negotiate.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Version {
        Tls10 = 0x0301,
        Tls11 = 0x0302,
        Tls12 = 0x0303,
    }
);

impl Version {
    pub fn as_str(self) -> &'static str {
        match self {
            Version::Tls10 => "TLSv1",
            Version::Tls11 => "TLSv1.1",
            Version::Tls12 => "TLSv1.2",
        }
    }
}

define!(
    #[raw(u8)]
    /// Key exchange classes of the cipher suites an engine may offer.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    enum KeyExchange {
        Rsa = 0,
        EcdheRsa = 1,
        EcdheEcdsa = 2,
        EcdhRsa = 3,
        EcdhEcdsa = 4,
    }
);

bitflags! {
    /// Named curves an engine may use for ECDHE.
    pub struct Curves: u32 {
        const X25519    = 1 << 0;
        const SECP256R1 = 1 << 1;
        const SECP384R1 = 1 << 2;
        const SECP521R1 = 1 << 3;
    }
}

/// A certificate chain and key a client presents when asked.
#[derive(Debug, Clone)]
pub struct ClientAuth {
    pub chain: Vec<Vec<u8>>,
    pub key: PrivateKey,
}

/// Everything an engine needs to be set up for one connection.
#[derive(Debug)]
pub struct EngineParams {
    pub version_min: Version,
    pub version_max: Version,
    /// Cipher suites, in preference order.
    pub suites: Vec<u16>,
    pub alpn: Vec<String>,
    pub curves: Curves,
    pub flags: EngineFlags,
    /// Encoded DNs of the CAs a server names when requesting a client
    /// certificate.
    pub trust_anchor_names: Vec<Vec<u8>>,
    pub client_auth: Option<ClientAuth>,
    /// I/O buffer of `BUFSIZE_BIDI` bytes, owned by the engine.
    pub buffer: Vec<u8>,
}

/// A running record/handshake engine.
pub trait Engine: Send {
    fn current_state(&self) -> EngineState;
    /// The error that closed the engine, if any.
    fn last_error(&self) -> Option<EngineError>;

    fn sendrec_buf(&self) -> &[u8];
    fn sendrec_ack(&mut self, len: usize);
    fn recvrec_buf(&mut self) -> &mut [u8];
    fn recvrec_ack(&mut self, len: usize);
    fn sendapp_buf(&mut self) -> &mut [u8];
    fn sendapp_ack(&mut self, len: usize);
    fn recvapp_buf(&self) -> &[u8];
    fn recvapp_ack(&mut self, len: usize);

    /// Pushes buffered application data into records; with `force` even a
    /// partially filled record is emitted.
    fn flush(&mut self, force: bool);
    /// Starts the closure of the connection (close_notify).
    fn close(&mut self);

    fn version(&self) -> Option<Version>;
    fn cipher_suite(&self) -> Option<u16>;
    fn selected_protocol(&self) -> Option<&str>;
    /// The name requested by the client through SNI.
    fn server_name(&self) -> Option<&str>;
}

/// What a client offered, as handed to a server policy.
#[derive(Debug, Clone)]
pub struct ClientOffer<'a> {
    pub server_name: Option<&'a str>,
    pub version: Version,
    /// Supported signature hashes: bits 0..7 for RSA, 8..15 for ECDSA,
    /// indexed by `HashId`.
    pub hashes: u32,
    /// Common cipher suites in the order the engine wants them tried.
    pub suites: &'a [(u16, KeyExchange)],
}

impl ClientOffer<'_> {
    pub fn supports(&self, hash: HashId, ecdsa: bool) -> bool {
        let shift = u8::from(hash) as u32 + if ecdsa { 8 } else { 0 };
        (self.hashes >> shift) & 1 != 0
    }
}

/// A server policy's answer to a client offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerChoices {
    pub cipher_suite: u16,
    /// Signature algorithm for ECDHE suites: `0xFF00 | hash`.
    pub algo_id: u16,
    pub chain: Vec<Vec<u8>>,
}

/// Server-side decisions and private key operations.
pub trait ServerPolicy: Send {
    fn choose(&mut self, offer: &ClientOffer<'_>) -> Option<ServerChoices>;
    /// Performs the key exchange private key operation in place.
    fn do_keyx(&mut self, data: &mut Vec<u8>) -> bool;
    /// Signs `hash_value` with the selected key, producing at most
    /// `max_len` bytes.
    fn do_sign(&mut self, algo_id: u16, hash_value: &[u8], max_len: usize) -> Option<Vec<u8>>;
}
