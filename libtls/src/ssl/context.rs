/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::cmp::min;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::error::{Error, ErrorState, Result};
use crate::util::{host_port, load_file, unbracket};
use crate::x509::verify::{VerifyBridge, VerifyFlags};
use crate::x509::{load_ca, NameElements, TrustAnchor, X509Class};
use super::config::{default_ca_cert_file, Config, VerifyClient};
use super::conninfo::ConnectionInfo;
use super::engine::{ClientAuth, Engine, EngineFlags, EngineParams, EngineState, BUFSIZE_BIDI};
use super::io::{close_transport, Callbacks, IoCallback, RecvCallback, SendCallback, Socket, Split, Stream};
use super::policy::KeypairPolicy;

/// Connection state written by the engine's callbacks (verifier and server
/// policy) and read back by the context.
#[derive(Debug, Default)]
pub(crate) struct ConnShared {
    /// The peer's chain as it was fed to the verifier, leaf first.
    pub peer_chain: Vec<Vec<u8>>,
    pub subject: Option<NameElements>,
    /// Index of the keypair the server policy selected.
    pub keypair: Option<usize>,
    /// Failure of a server policy operation.
    pub error: Option<Error>,
}

pub(crate) type SharedState = Arc<Mutex<ConnShared>>;

pub(crate) fn lock(shared: &Mutex<ConnShared>) -> MutexGuard<'_, ConnShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Client,
    /// A listening server; `accept_*` creates one `ServerConn` per client.
    Server,
    ServerConn,
}

bitflags! {
    struct ConnState: u32 {
        const EOF_NO_CLOSE_NOTIFY = 1 << 0;
        const CONNECTED           = 1 << 1;
        const HANDSHAKE_COMPLETE  = 1 << 2;
        const NEEDS_SHUTDOWN      = 1 << 3;
        const IN_SHUTDOWN         = 1 << 4;
    }
}

/// How `run_until` stopped without an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Progress {
    /// One of the target state bits is set.
    Reached,
    /// The engine closed cleanly, or the transport reached end of stream
    /// after the handshake.
    Closed,
}

fn transport_error(e: Error, op: &str) -> Error {
    match e {
        Error::Io(source) => Error::os(format!("{} failed", op), source),
        other => other,
    }
}

/// Drives `engine` until one of the `target` bits is set.
///
/// Pending record output is always written before the target check.
/// "Would block" results of the transport are returned unchanged.
fn run_until(
    engine: &mut dyn Engine,
    io: &mut dyn IoCallback,
    state: &mut ConnState,
    target: EngineState,
    op: &str,
) -> Result<Progress> {
    loop {
        let current = engine.current_state();
        if current.contains(EngineState::CLOSED) {
            return match engine.last_error() {
                Some(e) => Err(Error::Engine(e)),
                None => Ok(Progress::Closed),
            };
        }

        if current.contains(EngineState::SENDREC) {
            let buf = engine.sendrec_buf();
            let len = buf.len();
            let sent = match io.send(buf) {
                Ok(0) => return Err(Error::msg(format!("{} failed", op))),
                Ok(n) => min(n, len),
                Err(e) => return Err(transport_error(e, op)),
            };
            trace!(op, sent, "records sent");
            engine.sendrec_ack(sent);
            continue;
        }

        if current.intersects(target) {
            return Ok(Progress::Reached);
        }

        if current.contains(EngineState::RECVAPP) {
            // the buffer is shared by both directions, so application data
            // is never pending unless it was asked for
            return Err(Error::msg("unexpected I/O state"));
        }

        if current.contains(EngineState::RECVREC) {
            let buf = engine.recvrec_buf();
            let len = buf.len();
            let received = match io.recv(buf) {
                Ok(0) if state.contains(ConnState::HANDSHAKE_COMPLETE) => {
                    trace!(op, "end of stream without close_notify");
                    state.insert(ConnState::EOF_NO_CLOSE_NOTIFY);
                    return Ok(Progress::Closed);
                }
                Ok(0) => return Err(Error::msg("unexpected EOF")),
                Ok(n) => min(n, len),
                Err(e) => return Err(transport_error(e, op)),
            };
            trace!(op, received, "records received");
            engine.recvrec_ack(received);
            continue;
        }

        engine.flush(false);
    }
}

/// A TLS client, server or server connection.
///
/// Every operation clears the error record on entry; on failure the
/// returned error is also available through `error()`, except for
/// `Error::WantPollIn` and `Error::WantPollOut` which only ask the caller
/// to retry once the transport is ready.
///
/// A context is driven from one thread at a time.
pub struct Context {
    role: Role,
    state: ConnState,
    error: ErrorState,
    servername: Option<String>,
    engine: Option<Box<dyn Engine>>,
    io: Option<Box<dyn IoCallback>>,
    shared: SharedState,
    conninfo: Option<ConnectionInfo>,
    /// Bytes taken by a `write` whose records could not all be sent yet.
    write_len: usize,
    // dropped last, after the connection state referring to it
    config: Arc<Config>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("role", &self.role)
            .field("state", &self.state)
            .field("servername", &self.servername)
            .field("error", &self.error.msg())
            .finish()
    }
}

impl Context {
    fn with_config(role: Role, config: Arc<Config>) -> Context {
        Context {
            role,
            state: ConnState::empty(),
            error: ErrorState::default(),
            servername: None,
            engine: None,
            io: None,
            shared: SharedState::default(),
            conninfo: None,
            write_len: 0,
            config,
        }
    }

    /// A client context using the process-wide default configuration.
    pub fn client() -> Result<Context> {
        Ok(Context::with_config(Role::Client, crate::default_config()?))
    }

    /// A server context using the process-wide default configuration.
    pub fn server() -> Result<Context> {
        Ok(Context::with_config(Role::Server, crate::default_config()?))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn error(&self) -> Option<&str> {
        self.error.msg()
    }

    pub fn os_error(&self) -> Option<i32> {
        self.error.os_error()
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        if err.is_would_block() {
            return Err(err);
        }
        if let Some(policy_err) = lock(&self.shared).error.take() {
            self.error.record(&policy_err);
        }
        self.error.record(&err);
        Err(err)
    }

    /// Attaches `config`. Every keypair must hold a matching certificate and
    /// key; empty keypairs are skipped except on servers.
    pub fn configure(&mut self, config: Arc<Config>) -> Result<()> {
        self.error.clear();
        let required = self.role == Role::Server;
        for keypair in config.keypairs() {
            if keypair.key().is_none() && keypair.chain().is_empty() && !required {
                continue;
            }
            if let Err(e) = keypair.check(&**config.backend()) {
                return self.fail(e);
            }
        }
        self.config = config;
        Ok(())
    }

    /// Clears all connection state so the context can be used again. The
    /// configuration stays attached.
    pub fn reset(&mut self) {
        self.engine = None;
        self.io = None;
        self.shared = SharedState::default();
        self.conninfo = None;
        self.error.clear();
        self.state = ConnState::empty();
        self.servername = None;
        self.write_len = 0;
    }

    fn engine_params(&self, flags: EngineFlags, trust_anchor_names: Vec<Vec<u8>>, client_auth: Option<ClientAuth>) -> Result<EngineParams> {
        let (version_min, version_max) = self.config.protocols().version_range()?;
        Ok(EngineParams {
            version_min,
            version_max,
            suites: self.config.suites().to_vec(),
            alpn: self.config.alpn().to_vec(),
            curves: self.config.curves(),
            flags,
            trust_anchor_names,
            client_auth,
            buffer: vec![0; BUFSIZE_BIDI],
        })
    }

    /// The verifier for the peer's chain, and the anchors it trusts. Without
    /// configured anchors, certificate verification loads the system store.
    fn configure_x509(&self) -> Result<(Box<dyn X509Class>, Arc<Vec<TrustAnchor>>)> {
        let mut anchors = self.config.ca().clone();
        if self.config.verify_flags().contains(VerifyFlags::CERT) && anchors.is_empty() {
            let loaded = load_file(default_ca_cert_file(), "CA")
                .and_then(|pem| load_ca(&pem))
                .map_err(|_| Error::msg("CA load failed"))?;
            anchors = Arc::new(loaded);
        }

        let minimal = self.config.backend().minimal_verifier(anchors.clone());
        let bridge = VerifyBridge::new(
            minimal,
            self.config.verify_flags(),
            self.config.verify_depth(),
            self.shared.clone(),
        );
        Ok((Box::new(bridge), anchors))
    }

    // ==============
    //     Client
    // ==============

    /// Connects to `host`, which may carry the port as `host:port` or
    /// `[v6addr]:port` when `port` is `None`.
    pub fn connect(&mut self, host: &str, port: Option<&str>) -> Result<()> {
        let servername = match port {
            Some(_) => unbracket(host),
            None => host_port(host).map_or(host, |(h, _)| h),
        };
        self.connect_servername(host, port, servername)
    }

    /// Like `connect`, verifying the server as `servername`.
    pub fn connect_servername(&mut self, host: &str, port: Option<&str>, servername: &str) -> Result<()> {
        self.error.clear();
        let result = self.dial(host, port);
        match result {
            Ok(stream) => self.connect_io(Box::new(Socket(stream)), Some(servername)),
            Err(e) => self.fail(e),
        }
    }

    fn dial(&self, host: &str, port: Option<&str>) -> Result<TcpStream> {
        if self.role != Role::Client {
            return Err(Error::msg("not a client context"));
        }
        let (host, port) = match port {
            Some(port) => (host, port),
            None => host_port(host).ok_or_else(|| Error::msg("no port provided"))?,
        };
        let host = unbracket(host);
        let port: u16 = port.parse().map_err(|_| Error::msg(format!("invalid port '{}'", port)))?;

        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::os(format!("failed to resolve '{}'", host), e))?;
        let mut last = None;
        for addr in addrs {
            match TcpStream::connect(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => last = Some(e),
            }
        }
        Err(match last {
            Some(e) => Error::os("connect", e),
            None => Error::msg(format!("no address found for '{}'", host)),
        })
    }

    pub fn connect_socket(&mut self, socket: TcpStream, servername: Option<&str>) -> Result<()> {
        self.connect_io(Box::new(Socket(socket)), servername)
    }

    pub fn connect_stream<S: Read + Write + Send + 'static>(&mut self, stream: S, servername: Option<&str>) -> Result<()> {
        self.connect_io(Box::new(Stream(stream)), servername)
    }

    /// Connects over one stream per direction.
    pub fn connect_split<R, W>(&mut self, read: R, write: W, servername: Option<&str>) -> Result<()>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        self.connect_io(Box::new(Split { read, write }), servername)
    }

    pub fn connect_cbs(&mut self, recv: Option<RecvCallback>, send: Option<SendCallback>, servername: Option<&str>) -> Result<()> {
        self.error.clear();
        match Callbacks::from_parts(recv, send) {
            Ok(cbs) => self.connect_io(Box::new(cbs), servername),
            Err(e) => self.fail(e),
        }
    }

    /// Connects over any transport.
    pub fn connect_io(&mut self, io: Box<dyn IoCallback>, servername: Option<&str>) -> Result<()> {
        self.error.clear();
        match self.connect_common(servername) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.io = Some(io);
                self.state.insert(ConnState::CONNECTED);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    fn connect_common(&mut self, servername: Option<&str>) -> Result<Box<dyn Engine>> {
        if self.role != Role::Client {
            return Err(Error::msg("not a client context"));
        }
        self.servername = servername.map(str::to_owned);

        let client_auth = self
            .config
            .keypairs()
            .first()
            .filter(|keypair| keypair.has_chain_and_key())
            .and_then(|keypair| {
                let key = keypair.key()?.clone();
                Some(ClientAuth { chain: keypair.chain().to_vec(), key })
            });
        let params = self.engine_params(EngineFlags::empty(), Vec::new(), client_auth)?;
        let (x509, _) = self.configure_x509()?;
        self.config.backend().client_engine(params, x509, servername)
    }

    // ==============
    //     Server
    // ==============

    pub fn accept_socket(&mut self, socket: TcpStream) -> Result<Context> {
        self.accept_io(Box::new(Socket(socket)))
    }

    pub fn accept_stream<S: Read + Write + Send + 'static>(&mut self, stream: S) -> Result<Context> {
        self.accept_io(Box::new(Stream(stream)))
    }

    /// Accepts a client reachable over one stream per direction.
    pub fn accept_split<R, W>(&mut self, read: R, write: W) -> Result<Context>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        self.accept_io(Box::new(Split { read, write }))
    }

    pub fn accept_cbs(&mut self, recv: Option<RecvCallback>, send: Option<SendCallback>) -> Result<Context> {
        self.error.clear();
        match Callbacks::from_parts(recv, send) {
            Ok(cbs) => self.accept_io(Box::new(cbs)),
            Err(e) => self.fail(e),
        }
    }

    /// Creates the server connection for a client reachable over `io`.
    pub fn accept_io(&mut self, io: Box<dyn IoCallback>) -> Result<Context> {
        self.error.clear();
        match self.accept_common() {
            Ok(mut conn) => {
                conn.io = Some(io);
                Ok(conn)
            }
            Err(e) => self.fail(e),
        }
    }

    fn accept_common(&self) -> Result<Context> {
        if self.role != Role::Server {
            return Err(Error::msg("not a server context"));
        }
        let mut conn = Context::with_config(Role::ServerConn, self.config.clone());

        let mut flags = EngineFlags::NO_RENEGOTIATION;
        let mut x509 = None;
        let mut anchor_names = Vec::new();
        let verify_client = self.config.client_verification();
        if verify_client != VerifyClient::Off {
            let (bridge, anchors) = conn.configure_x509()?;
            if anchors.is_empty() {
                return Err(Error::msg("cannot verify client without trust anchors"));
            }
            anchor_names = anchors.iter().map(|anchor| anchor.dn.clone()).collect();
            if verify_client == VerifyClient::Optional {
                flags |= EngineFlags::TOLERATE_NO_CLIENT_AUTH;
            }
            x509 = Some(bridge);
        }
        if self.config.ciphers_server() {
            flags |= EngineFlags::ENFORCE_SERVER_PREFERENCES;
        }

        let params = conn.engine_params(flags, anchor_names, None)?;
        let policy = Box::new(KeypairPolicy::new(self.config.clone(), conn.shared.clone()));
        conn.engine = Some(self.config.backend().server_engine(params, policy, x509)?);
        Ok(conn)
    }

    // ==============
    //   Connection
    // ==============

    fn parts(&mut self) -> Result<(&mut dyn Engine, &mut dyn IoCallback, &mut ConnState)> {
        match (self.engine.as_deref_mut(), self.io.as_deref_mut()) {
            (Some(engine), Some(io)) => Ok((engine, io, &mut self.state)),
            _ => Err(Error::msg("context not connected")),
        }
    }

    /// Runs the handshake to completion. Called implicitly by the first
    /// `read` or `write`.
    pub fn handshake(&mut self) -> Result<()> {
        self.error.clear();
        match self.do_handshake() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    fn do_handshake(&mut self) -> Result<()> {
        match self.role {
            Role::Client if !self.state.contains(ConnState::CONNECTED) => {
                return Err(Error::msg("context not connected"))
            }
            Role::Client | Role::ServerConn => {}
            Role::Server => return Err(Error::msg("invalid operation for context")),
        }
        if self.state.contains(ConnState::HANDSHAKE_COMPLETE) {
            return Err(Error::msg("handshake already completed"));
        }

        self.state.insert(ConnState::NEEDS_SHUTDOWN);
        let (engine, io, state) = self.parts()?;
        if run_until(engine, io, state, EngineState::SENDAPP | EngineState::RECVAPP, "handshake")? == Progress::Closed {
            return Err(Error::ConnectionClosed);
        }
        self.state.insert(ConnState::HANDSHAKE_COMPLETE);

        let engine = self.engine.as_deref().ok_or_else(|| Error::msg("context not connected"))?;
        let servername = match self.role {
            Role::ServerConn => engine.server_name(),
            _ => self.servername.as_deref(),
        };
        let info = ConnectionInfo::populate(engine, servername, &lock(&self.shared))?;
        debug!(version = ?info.version, cipher = ?info.cipher, "handshake completed");
        self.conninfo = Some(info);
        Ok(())
    }

    /// Reads decrypted application data into `buf`. `Ok(0)` means the peer
    /// closed the connection.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.error.clear();
        match self.do_read(buf) {
            Ok(n) => Ok(n),
            Err(e) => self.fail(e),
        }
    }

    fn do_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.state.contains(ConnState::HANDSHAKE_COMPLETE) {
            self.do_handshake()?;
        }
        let (engine, io, state) = self.parts()?;
        if run_until(engine, io, state, EngineState::RECVAPP, "read")? == Progress::Closed {
            return Ok(0);
        }
        let app = engine.recvapp_buf();
        let len = min(app.len(), buf.len());
        buf[..len].copy_from_slice(&app[..len]);
        engine.recvapp_ack(len);
        Ok(len)
    }

    /// Writes application data, returning how much of `buf` was taken.
    ///
    /// After `Error::WantPollIn`/`Error::WantPollOut` the call must be
    /// repeated with the same data; the retry reports the length taken the
    /// first time without sending it again.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.error.clear();
        match self.do_write(buf) {
            Ok(n) => Ok(n),
            Err(e) => self.fail(e),
        }
    }

    fn do_write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.state.contains(ConnState::HANDSHAKE_COMPLETE) {
            self.do_handshake()?;
        }
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let pending = self.write_len;
            let (engine, io, state) = self.parts()?;
            if run_until(engine, io, state, EngineState::SENDAPP, "write")? == Progress::Closed {
                return Err(Error::ConnectionClosed);
            }
            if pending > 0 {
                break;
            }

            let app = engine.sendapp_buf();
            let len = min(app.len(), buf.len());
            app[..len].copy_from_slice(&buf[..len]);
            engine.sendapp_ack(len);
            engine.flush(false);
            self.write_len = len;
        }
        Ok(std::mem::replace(&mut self.write_len, 0))
    }

    /// Sends close_notify, waits for the peer's, then closes the transport.
    ///
    /// May return `Error::WantPollIn`/`Error::WantPollOut` while the closure
    /// is in progress; call again once the transport is ready. Closing an
    /// already closed context succeeds.
    pub fn close(&mut self) -> Result<()> {
        self.error.clear();
        match self.do_close() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    fn do_close(&mut self) -> Result<()> {
        if self.role == Role::Server {
            return Err(Error::msg("invalid operation for context"));
        }

        let mut result = Ok(());
        if self.state.contains(ConnState::NEEDS_SHUTDOWN) {
            if let (Some(engine), Some(io)) = (self.engine.as_deref_mut(), self.io.as_deref_mut()) {
                if !self.state.contains(ConnState::IN_SHUTDOWN) {
                    engine.close();
                    self.state.insert(ConnState::IN_SHUTDOWN);
                }
                match run_until(engine, io, &mut self.state, EngineState::empty(), "close") {
                    Err(e) if e.is_would_block() => return Err(e),
                    Err(e) => result = Err(e),
                    Ok(_) => {}
                }
            }
            self.state.remove(ConnState::NEEDS_SHUTDOWN);
        }

        if let Some(mut io) = self.io.take() {
            result = close_transport(&mut *io, result);
        }

        if self.state.contains(ConnState::EOF_NO_CLOSE_NOTIFY) {
            if let Err(ref e) = result {
                self.error.record(e);
            }
            return Err(Error::msg("EOF without close notify"));
        }
        result
    }

    // ==============
    //  Connection
    //     info
    // ==============

    /// The snapshot taken when the handshake completed.
    pub fn connection_info(&self) -> Option<&ConnectionInfo> {
        self.conninfo.as_ref()
    }

    conninfo_getter!(
        /// The protocol selected through ALPN.
        fn conn_alpn_selected() -> Option<&str> { alpn }
    );
    conninfo_getter!(fn conn_cipher() -> Option<&str> { cipher });
    conninfo_getter!(fn conn_servername() -> Option<&str> { servername });
    conninfo_getter!(
        /// `TLSv1`, `TLSv1.1` or `TLSv1.2`.
        fn conn_version() -> Option<&str> { version }
    );
    conninfo_getter!(
        /// `SHA256:<hex>` fingerprint of the peer's leaf certificate.
        fn peer_cert_hash() -> Option<&str> { hash }
    );
    conninfo_getter!(fn peer_cert_issuer() -> Option<&str> { issuer });
    conninfo_getter!(fn peer_cert_subject() -> Option<&str> { subject });
    conninfo_getter!(
        /// The peer's chain, PEM encoded.
        fn peer_cert_chain_pem() -> Option<&str> { peer_cert }
    );

    pub fn conn_cipher_strength(&self) -> Option<u32> {
        self.conninfo.as_ref().map(|info| info.cipher_strength)
    }

    /// Sessions are never resumed.
    pub fn conn_session_resumed(&self) -> bool {
        false
    }

    pub fn peer_cert_provided(&self) -> bool {
        self.conninfo.as_ref().map_or(false, |info| info.hash.is_some())
    }

    pub fn peer_cert_notbefore(&self) -> Option<i64> {
        self.conninfo.as_ref().and_then(|info| info.notbefore)
    }

    pub fn peer_cert_notafter(&self) -> Option<i64> {
        self.conninfo.as_ref().and_then(|info| info.notafter)
    }

    /// Index in `Config::keypairs` of the keypair a server connection
    /// presented.
    pub fn selected_keypair(&self) -> Option<usize> {
        lock(&self.shared).keypair
    }

    // OCSP is not supported: there is never a response to report on.

    pub fn ocsp_process_response(&mut self, _response: &[u8]) -> Result<()> {
        self.error.clear();
        self.fail(Error::msg("OCSP is not supported"))
    }

    pub fn peer_ocsp_url(&self) -> Option<&str> {
        None
    }

    pub fn peer_ocsp_response_status(&self) -> Option<i32> {
        None
    }

    pub fn peer_ocsp_cert_status(&self) -> Option<i32> {
        None
    }

    pub fn peer_ocsp_crl_reason(&self) -> Option<i32> {
        None
    }

    pub fn peer_ocsp_this_update(&self) -> Option<i64> {
        None
    }

    pub fn peer_ocsp_next_update(&self) -> Option<i64> {
        None
    }

    pub fn peer_ocsp_revocation_time(&self) -> Option<i64> {
        None
    }
}

fn to_io_error(e: Error) -> io::Error {
    match e {
        Error::WantPollIn | Error::WantPollOut => io::Error::new(io::ErrorKind::WouldBlock, e),
        Error::ConnectionClosed => io::Error::new(io::ErrorKind::ConnectionAborted, e),
        Error::Io(e) => e,
        e => io::Error::new(io::ErrorKind::Other, e),
    }
}

impl Read for Context {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Context::read(self, buf).map_err(to_io_error)
    }
}

impl Write for Context {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Context::write(self, buf).map_err(to_io_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
