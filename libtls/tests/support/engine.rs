/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! Engines for tests.
//!
//! `SimEngine` runs a toy handshake with the same shape as TLS (hello,
//! certificate, optional server signature, optional client certificate, key
//! exchange, finished) over framed plaintext records:
//!
//! ```text
//! [type: u8][length: u16 BE][payload]
//! ```
//!
//! It drives the real verifier and server policy, so everything the
//! connection layer does around them can be observed end to end.

use std::cmp::min;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::libtls::hash::HashId;
use crate::libtls::ssl::ciphersuites;
use crate::libtls::ssl::engine::{
    ClientOffer, Engine, EngineFlags, EngineParams, EngineState, KeyExchange, ServerPolicy, Version, BUFSIZE_INPUT,
};
use crate::libtls::x509::X509Class;
use crate::libtls::EngineError;

const REC_CLIENT_HELLO: u8 = 1;
const REC_SERVER_HELLO: u8 = 2;
const REC_CERTIFICATE: u8 = 3;
const REC_KEY_EXCHANGE: u8 = 4;
const REC_SERVER_SIGNATURE: u8 = 5;
const REC_FINISHED: u8 = 6;
const REC_APP_DATA: u8 = 7;
const REC_ALERT: u8 = 8;

const ALERT_CLOSE_NOTIFY: u8 = 0;
const ALERT_UNEXPECTED_MESSAGE: u8 = 10;
const ALERT_HANDSHAKE_FAILURE: u8 = 40;
const ALERT_BAD_CERTIFICATE: u8 = 42;
const ALERT_PROTOCOL_VERSION: u8 = 70;

const MAX_FRAGMENT: usize = 16384;
const HEADER_LEN: usize = 3;

/// RSA hashes MD5+SHA-1 and SHA-1..SHA-512, ECDSA hashes SHA-1..SHA-512.
const CLIENT_HASHES: u32 = 0x7C7D;

type Parsed<T> = ::core::result::Result<T, EngineError>;

fn malformed<E>(_: E) -> EngineError {
    EngineError::BadHandshake
}

fn read_bytes8(rd: &mut Cursor<&[u8]>) -> Parsed<Vec<u8>> {
    let len = rd.read_u8().map_err(malformed)? as usize;
    let mut buf = vec![0; len];
    rd.read_exact(&mut buf).map_err(malformed)?;
    Ok(buf)
}

fn read_str8(rd: &mut Cursor<&[u8]>) -> Parsed<Option<String>> {
    let bytes = read_bytes8(rd)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    String::from_utf8(bytes).map(Some).map_err(malformed)
}

fn write_bytes8(out: &mut Vec<u8>, data: &[u8]) {
    out.push(data.len() as u8);
    out.extend_from_slice(data);
}

fn encode_chain(chain: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u16::<BigEndian>(chain.len() as u16).unwrap();
    for cert in chain {
        out.write_u32::<BigEndian>(cert.len() as u32).unwrap();
        out.extend_from_slice(cert);
    }
    out
}

fn decode_chain(payload: &[u8]) -> Parsed<Vec<Vec<u8>>> {
    let mut rd = Cursor::new(payload);
    let count = rd.read_u16::<BigEndian>().map_err(malformed)?;
    let mut chain = Vec::new();
    for _ in 0..count {
        let len = rd.read_u32::<BigEndian>().map_err(malformed)? as usize;
        let mut cert = vec![0; len];
        rd.read_exact(&mut cert).map_err(malformed)?;
        chain.push(cert);
    }
    Ok(chain)
}

/// Feeds a chain to a verifier the way an engine does, in several pieces.
fn feed_chain(x509: &mut dyn X509Class, server_name: Option<&str>, chain: &[Vec<u8>]) -> Parsed<()> {
    x509.start_chain(server_name);
    for cert in chain {
        x509.start_cert(cert.len());
        let (head, tail) = cert.split_at(cert.len() / 2);
        x509.append(head);
        x509.append(tail);
        x509.end_cert();
    }
    x509.end_chain()
}

fn alert_for(err: EngineError) -> u8 {
    match err {
        EngineError::UnsupportedVersion => ALERT_PROTOCOL_VERSION,
        EngineError::Unexpected => ALERT_UNEXPECTED_MESSAGE,
        e if (32..64).contains(&e.code()) => ALERT_BAD_CERTIFICATE,
        _ => ALERT_HANDSHAKE_FAILURE,
    }
}

enum Side {
    Client { x509: Box<dyn X509Class> },
    Server { policy: Box<dyn ServerPolicy>, x509: Option<Box<dyn X509Class>> },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    ServerHello,
    ServerCertificate,
    ServerSignature,
    ClientHello,
    ClientCertificate,
    KeyExchange,
    Finished,
    Established,
}

pub struct SimEngine {
    side: Side,
    params: EngineParams,
    phase: Phase,
    input: Vec<u8>,
    in_len: usize,
    output: Vec<u8>,
    app_out: Vec<u8>,
    app_out_len: usize,
    app_in: Vec<u8>,
    version: Option<Version>,
    suite: Option<u16>,
    keyx: Option<KeyExchange>,
    alpn: Option<String>,
    server_name: Option<String>,
    cert_requested: bool,
    close_sent: bool,
    closed: bool,
    error: Option<EngineError>,
}

impl SimEngine {
    fn new(side: Side, mut params: EngineParams, phase: Phase) -> SimEngine {
        let mut input = std::mem::take(&mut params.buffer);
        input.resize(BUFSIZE_INPUT, 0);
        SimEngine {
            side,
            params,
            phase,
            input,
            in_len: 0,
            output: Vec::new(),
            app_out: vec![0; MAX_FRAGMENT],
            app_out_len: 0,
            app_in: Vec::new(),
            version: None,
            suite: None,
            keyx: None,
            alpn: None,
            server_name: None,
            cert_requested: false,
            close_sent: false,
            closed: false,
            error: None,
        }
    }

    pub fn client(params: EngineParams, x509: Box<dyn X509Class>, server_name: Option<&str>) -> SimEngine {
        let mut engine = SimEngine::new(Side::Client { x509 }, params, Phase::ServerHello);
        engine.server_name = server_name.map(str::to_owned);

        let mut hello = Vec::new();
        hello.write_u16::<BigEndian>(engine.params.version_min.into()).unwrap();
        hello.write_u16::<BigEndian>(engine.params.version_max.into()).unwrap();
        hello.write_u32::<BigEndian>(CLIENT_HASHES).unwrap();
        write_bytes8(&mut hello, server_name.unwrap_or("").as_bytes());
        hello.write_u16::<BigEndian>(engine.params.suites.len() as u16).unwrap();
        for &suite in &engine.params.suites {
            hello.write_u16::<BigEndian>(suite).unwrap();
        }
        hello.push(engine.params.alpn.len() as u8);
        for proto in &engine.params.alpn {
            write_bytes8(&mut hello, proto.as_bytes());
        }
        engine.record(REC_CLIENT_HELLO, &hello);
        engine
    }

    pub fn server(params: EngineParams, policy: Box<dyn ServerPolicy>, x509: Option<Box<dyn X509Class>>) -> SimEngine {
        SimEngine::new(Side::Server { policy, x509 }, params, Phase::ClientHello)
    }

    fn record(&mut self, kind: u8, payload: &[u8]) {
        self.output.push(kind);
        self.output.write_u16::<BigEndian>(payload.len() as u16).unwrap();
        self.output.extend_from_slice(payload);
    }

    fn fail(&mut self, err: EngineError) {
        if self.closed {
            return;
        }
        if !matches!(err, EngineError::RecvFatalAlert(_)) {
            self.record(REC_ALERT, &[alert_for(err)]);
        }
        self.error = Some(err);
        self.closed = true;
    }

    fn handle(&mut self, kind: u8, payload: &[u8]) -> Parsed<()> {
        let server = matches!(self.side, Side::Server { .. });
        match (kind, self.phase, server) {
            (REC_ALERT, _, _) => match payload.first() {
                Some(&ALERT_CLOSE_NOTIFY) => {
                    if !self.close_sent {
                        self.record(REC_ALERT, &[ALERT_CLOSE_NOTIFY]);
                        self.close_sent = true;
                    }
                    self.closed = true;
                    Ok(())
                }
                Some(&code) => Err(EngineError::RecvFatalAlert(code)),
                None => Err(EngineError::BadAlert),
            },
            (REC_APP_DATA, Phase::Established, _) => {
                if !self.close_sent {
                    self.app_in.extend_from_slice(payload);
                }
                Ok(())
            }
            (REC_CLIENT_HELLO, Phase::ClientHello, true) => self.on_client_hello(payload),
            (REC_SERVER_HELLO, Phase::ServerHello, false) => self.on_server_hello(payload),
            (REC_CERTIFICATE, Phase::ServerCertificate, false) => self.on_server_certificate(payload),
            (REC_SERVER_SIGNATURE, Phase::ServerSignature, false) => {
                if payload.len() <= 2 {
                    return Err(EngineError::BadSignature);
                }
                self.client_finish();
                Ok(())
            }
            (REC_CERTIFICATE, Phase::ClientCertificate, true) => self.on_client_certificate(payload),
            (REC_KEY_EXCHANGE, Phase::KeyExchange, true) => self.on_key_exchange(payload),
            (REC_FINISHED, Phase::Finished, true) => {
                self.record(REC_FINISHED, &[]);
                self.phase = Phase::Established;
                Ok(())
            }
            (REC_FINISHED, Phase::Finished, false) => {
                self.phase = Phase::Established;
                Ok(())
            }
            _ => Err(EngineError::Unexpected),
        }
    }

    /// Handles buffered records one at a time, pausing while received
    /// application data waits to be read.
    fn process_input(&mut self) {
        let mut start = 0;
        while !self.closed && self.app_in.is_empty() && self.in_len - start >= HEADER_LEN {
            let kind = self.input[start];
            let len = BigEndian::read_u16(&self.input[start + 1..start + HEADER_LEN]) as usize;
            if HEADER_LEN + len > self.input.len() {
                self.fail(EngineError::TooLarge);
                break;
            }
            if self.in_len - start < HEADER_LEN + len {
                break;
            }
            let payload = self.input[start + HEADER_LEN..start + HEADER_LEN + len].to_vec();
            start += HEADER_LEN + len;
            if let Err(e) = self.handle(kind, &payload) {
                self.fail(e);
            }
        }
        if self.closed {
            self.in_len = 0;
        } else {
            self.input.copy_within(start..self.in_len, 0);
            self.in_len -= start;
        }
    }

    fn on_client_hello(&mut self, payload: &[u8]) -> Parsed<()> {
        let mut rd = Cursor::new(payload);
        let client_min = rd.read_u16::<BigEndian>().map_err(malformed)?;
        let client_max = rd.read_u16::<BigEndian>().map_err(malformed)?;
        let hashes = rd.read_u32::<BigEndian>().map_err(malformed)?;
        self.server_name = read_str8(&mut rd)?;
        let count = rd.read_u16::<BigEndian>().map_err(malformed)?;
        let mut client_suites = Vec::new();
        for _ in 0..count {
            client_suites.push(rd.read_u16::<BigEndian>().map_err(malformed)?);
        }
        let count = rd.read_u8().map_err(malformed)?;
        let mut client_alpn = Vec::new();
        for _ in 0..count {
            client_alpn.push(read_str8(&mut rd)?.unwrap_or_default());
        }

        let high = min(client_max, self.params.version_max.into());
        let low = client_min.max(self.params.version_min.into());
        let version = Version::from_raw(high).filter(|_| high >= low).ok_or(EngineError::UnsupportedVersion)?;

        let (preferred, other) = if self.params.flags.contains(EngineFlags::ENFORCE_SERVER_PREFERENCES) {
            (&self.params.suites, &client_suites)
        } else {
            (&client_suites, &self.params.suites)
        };
        let common: Vec<(u16, KeyExchange)> = preferred
            .iter()
            .filter(|suite| other.contains(suite))
            .filter_map(|&suite| ciphersuites::lookup(suite))
            .filter(|info| version >= Version::Tls12 || !info.requires_tls12())
            .map(|info| (info.id, info.key_exchange()))
            .collect();

        let offer = ClientOffer { server_name: self.server_name.as_deref(), version, hashes, suites: &common };
        let choices = match &mut self.side {
            Side::Server { policy, .. } => policy.choose(&offer),
            Side::Client { .. } => None,
        }
        .ok_or(EngineError::BadCipherSuite)?;
        let keyx = common
            .iter()
            .find(|&&(suite, _)| suite == choices.cipher_suite)
            .map(|&(_, keyx)| keyx)
            .ok_or(EngineError::BadCipherSuite)?;

        self.alpn = self.params.alpn.iter().find(|proto| client_alpn.contains(proto)).cloned();
        if self.alpn.is_none()
            && !client_alpn.is_empty()
            && self.params.flags.contains(EngineFlags::FAIL_ON_ALPN_MISMATCH)
        {
            return Err(EngineError::Unexpected);
        }
        self.version = Some(version);
        self.suite = Some(choices.cipher_suite);
        self.keyx = Some(keyx);
        self.cert_requested = matches!(self.side, Side::Server { x509: Some(_), .. });

        let mut hello = Vec::new();
        hello.write_u16::<BigEndian>(version.into()).unwrap();
        hello.write_u16::<BigEndian>(choices.cipher_suite).unwrap();
        write_bytes8(&mut hello, self.alpn.as_deref().unwrap_or("").as_bytes());
        hello.push(self.cert_requested as u8);
        hello.write_u16::<BigEndian>(self.params.trust_anchor_names.len() as u16).unwrap();
        self.record(REC_SERVER_HELLO, &hello);
        self.record(REC_CERTIFICATE, &encode_chain(&choices.chain));

        if matches!(keyx, KeyExchange::EcdheRsa | KeyExchange::EcdheEcdsa) {
            let hash = HashId::from_raw((choices.algo_id & 0xFF) as u8).ok_or(EngineError::InvalidAlgorithm)?;
            let hash_value = vec![0xA5; hash.output_len()];
            let sig = match &mut self.side {
                Side::Server { policy, .. } => policy.do_sign(choices.algo_id, &hash_value, 512),
                Side::Client { .. } => None,
            }
            .ok_or(EngineError::InvalidAlgorithm)?;
            let mut signed = Vec::new();
            signed.write_u16::<BigEndian>(choices.algo_id).unwrap();
            signed.extend_from_slice(&sig);
            self.record(REC_SERVER_SIGNATURE, &signed);
        }

        self.phase = if self.cert_requested { Phase::ClientCertificate } else { Phase::KeyExchange };
        Ok(())
    }

    fn on_server_hello(&mut self, payload: &[u8]) -> Parsed<()> {
        let mut rd = Cursor::new(payload);
        let version = rd.read_u16::<BigEndian>().map_err(malformed)?;
        let suite = rd.read_u16::<BigEndian>().map_err(malformed)?;
        let alpn = read_str8(&mut rd)?;
        let cert_requested = rd.read_u8().map_err(malformed)? != 0;

        let version = Version::from_raw(version)
            .filter(|v| *v >= self.params.version_min && *v <= self.params.version_max)
            .ok_or(EngineError::UnsupportedVersion)?;
        if !self.params.suites.contains(&suite) {
            return Err(EngineError::BadCipherSuite);
        }
        let info = ciphersuites::lookup(suite).ok_or(EngineError::BadCipherSuite)?;
        if let Some(proto) = &alpn {
            if !self.params.alpn.contains(proto) {
                return Err(EngineError::Unexpected);
            }
        }

        self.version = Some(version);
        self.suite = Some(suite);
        self.keyx = Some(info.key_exchange());
        self.alpn = alpn;
        self.cert_requested = cert_requested;
        self.phase = Phase::ServerCertificate;
        Ok(())
    }

    fn on_server_certificate(&mut self, payload: &[u8]) -> Parsed<()> {
        let chain = decode_chain(payload)?;
        let server_name = self.server_name.clone();
        if let Side::Client { x509 } = &mut self.side {
            feed_chain(&mut **x509, server_name.as_deref(), &chain)?;
            if x509.get_pkey().is_none() {
                return Err(EngineError::WrongKeyUsage);
            }
        }
        match self.keyx {
            Some(KeyExchange::EcdheRsa) | Some(KeyExchange::EcdheEcdsa) => self.phase = Phase::ServerSignature,
            _ => self.client_finish(),
        }
        Ok(())
    }

    fn client_finish(&mut self) {
        if self.cert_requested {
            let chain = self.params.client_auth.as_ref().map(|auth| auth.chain.clone()).unwrap_or_default();
            self.record(REC_CERTIFICATE, &encode_chain(&chain));
        }
        let exchange = match self.keyx {
            Some(KeyExchange::Rsa) => vec![0x03; 48],
            Some(KeyExchange::EcdhRsa) | Some(KeyExchange::EcdhEcdsa) => {
                let mut point = vec![0x42; 65];
                point[0] = 0x04;
                point
            }
            _ => Vec::new(),
        };
        self.record(REC_KEY_EXCHANGE, &exchange);
        self.record(REC_FINISHED, &[]);
        self.phase = Phase::Finished;
    }

    fn on_client_certificate(&mut self, payload: &[u8]) -> Parsed<()> {
        let chain = decode_chain(payload)?;
        if chain.is_empty() {
            if !self.params.flags.contains(EngineFlags::TOLERATE_NO_CLIENT_AUTH) {
                return Err(EngineError::NoClientAuth);
            }
        } else if let Side::Server { x509: Some(x509), .. } = &mut self.side {
            feed_chain(&mut **x509, None, &chain)?;
        }
        self.phase = Phase::KeyExchange;
        Ok(())
    }

    fn on_key_exchange(&mut self, payload: &[u8]) -> Parsed<()> {
        if matches!(self.keyx, Some(KeyExchange::Rsa) | Some(KeyExchange::EcdhRsa) | Some(KeyExchange::EcdhEcdsa)) {
            let mut data = payload.to_vec();
            let ok = match &mut self.side {
                Side::Server { policy, .. } => policy.do_keyx(&mut data),
                Side::Client { .. } => false,
            };
            if !ok {
                return Err(EngineError::InvalidAlgorithm);
            }
        }
        self.phase = Phase::Finished;
        Ok(())
    }
}

impl Engine for SimEngine {
    fn current_state(&self) -> EngineState {
        if self.closed && self.output.is_empty() {
            return EngineState::CLOSED;
        }
        let mut state = EngineState::empty();
        if !self.output.is_empty() {
            state |= EngineState::SENDREC;
        }
        if self.closed {
            return state;
        }
        if !self.app_in.is_empty() {
            state |= EngineState::RECVAPP;
        }
        if self.phase == Phase::Established && !self.close_sent {
            state |= EngineState::SENDAPP;
        }
        if self.output.is_empty() && self.app_in.is_empty() && self.app_out_len == 0 {
            state |= EngineState::RECVREC;
        }
        state
    }

    fn last_error(&self) -> Option<EngineError> {
        self.error
    }

    fn sendrec_buf(&self) -> &[u8] {
        &self.output
    }

    fn sendrec_ack(&mut self, len: usize) {
        self.output.drain(..len);
    }

    fn recvrec_buf(&mut self) -> &mut [u8] {
        &mut self.input[self.in_len..]
    }

    fn recvrec_ack(&mut self, len: usize) {
        self.in_len += len;
        self.process_input();
    }

    fn sendapp_buf(&mut self) -> &mut [u8] {
        if self.phase != Phase::Established || self.close_sent || self.closed {
            return &mut [];
        }
        &mut self.app_out[self.app_out_len..]
    }

    fn sendapp_ack(&mut self, len: usize) {
        self.app_out_len += len;
    }

    fn recvapp_buf(&self) -> &[u8] {
        &self.app_in
    }

    fn recvapp_ack(&mut self, len: usize) {
        self.app_in.drain(..len);
        if self.app_in.is_empty() {
            self.process_input();
        }
    }

    fn flush(&mut self, _force: bool) {
        if self.app_out_len > 0 {
            let data = self.app_out[..self.app_out_len].to_vec();
            self.app_out_len = 0;
            self.record(REC_APP_DATA, &data);
        }
    }

    fn close(&mut self) {
        if self.closed || self.close_sent {
            return;
        }
        self.flush(true);
        self.app_in.clear();
        self.record(REC_ALERT, &[ALERT_CLOSE_NOTIFY]);
        self.close_sent = true;
    }

    fn version(&self) -> Option<Version> {
        self.version
    }

    fn cipher_suite(&self) -> Option<u16> {
        self.suite
    }

    fn selected_protocol(&self) -> Option<&str> {
        self.alpn.as_deref()
    }

    fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }
}

/// Engine stepping through states set by a test, with canned output.
pub struct ScriptedEngine {
    state: EngineState,
    output: Vec<u8>,
    scratch: Vec<u8>,
    received: Vec<u8>,
    app_out: Vec<u8>,
    app_in: Vec<u8>,
    error: Option<EngineError>,
    after_flush: Option<EngineState>,
    flushes: usize,
}

impl ScriptedEngine {
    pub fn new(state: EngineState) -> ScriptedEngine {
        ScriptedEngine {
            state,
            output: Vec::new(),
            scratch: vec![0; 64],
            received: Vec::new(),
            app_out: vec![0; 64],
            app_in: Vec::new(),
            error: None,
            after_flush: None,
            flushes: 0,
        }
    }

    pub fn queue_output(&mut self, data: &[u8]) {
        self.output.extend_from_slice(data);
    }

    /// Record bytes handed to the engine so far.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    pub fn fail(&mut self, err: EngineError) {
        self.error = Some(err);
    }

    /// State to switch to on the next flush.
    pub fn on_flush(&mut self, state: EngineState) {
        self.after_flush = Some(state);
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Engine for ScriptedEngine {
    fn current_state(&self) -> EngineState {
        let mut state = if self.error.is_some() { EngineState::CLOSED } else { self.state };
        if !self.output.is_empty() {
            state |= EngineState::SENDREC;
        }
        state
    }

    fn last_error(&self) -> Option<EngineError> {
        self.error
    }

    fn sendrec_buf(&self) -> &[u8] {
        &self.output
    }

    fn sendrec_ack(&mut self, len: usize) {
        self.output.drain(..len);
    }

    fn recvrec_buf(&mut self) -> &mut [u8] {
        &mut self.scratch
    }

    fn recvrec_ack(&mut self, len: usize) {
        self.received.extend_from_slice(&self.scratch[..len]);
    }

    fn sendapp_buf(&mut self) -> &mut [u8] {
        &mut self.app_out
    }

    fn sendapp_ack(&mut self, _len: usize) {}

    fn recvapp_buf(&self) -> &[u8] {
        &self.app_in
    }

    fn recvapp_ack(&mut self, len: usize) {
        self.app_in.drain(..len);
    }

    fn flush(&mut self, _force: bool) {
        self.flushes += 1;
        if let Some(state) = self.after_flush.take() {
            self.state = state;
        }
    }

    fn close(&mut self) {}

    fn version(&self) -> Option<Version> {
        None
    }

    fn cipher_suite(&self) -> Option<u16> {
        None
    }

    fn selected_protocol(&self) -> Option<&str> {
        None
    }

    fn server_name(&self) -> Option<&str> {
        None
    }
}

/// Engine that has finished a handshake with fixed parameters.
pub struct StubEngine {
    pub version: Option<Version>,
    pub suite: Option<u16>,
    pub alpn: Option<String>,
}

impl Engine for StubEngine {
    fn current_state(&self) -> EngineState {
        EngineState::SENDAPP | EngineState::RECVREC
    }

    fn last_error(&self) -> Option<EngineError> {
        None
    }

    fn sendrec_buf(&self) -> &[u8] {
        &[]
    }

    fn sendrec_ack(&mut self, _len: usize) {}

    fn recvrec_buf(&mut self) -> &mut [u8] {
        &mut []
    }

    fn recvrec_ack(&mut self, _len: usize) {}

    fn sendapp_buf(&mut self) -> &mut [u8] {
        &mut []
    }

    fn sendapp_ack(&mut self, _len: usize) {}

    fn recvapp_buf(&self) -> &[u8] {
        &[]
    }

    fn recvapp_ack(&mut self, _len: usize) {}

    fn flush(&mut self, _force: bool) {}

    fn close(&mut self) {}

    fn version(&self) -> Option<Version> {
        self.version
    }

    fn cipher_suite(&self) -> Option<u16> {
        self.suite
    }

    fn selected_protocol(&self) -> Option<&str> {
        self.alpn.as_deref()
    }

    fn server_name(&self) -> Option<&str> {
        None
    }
}
