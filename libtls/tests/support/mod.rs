/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

#![allow(dead_code)]

pub mod engine;
pub mod keys;
pub mod net;
pub mod pipe;

use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use crate::libtls::ssl::{Config, Context};
use crate::libtls::{Error, Result};

use self::backend::SimBackend;
use self::pipe::PipeEnd;

pub fn thread_spawn_named<F, T, S>(name: S, f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
    S: Into<String>,
{
    Builder::new().name(name.into()).spawn(f).unwrap()
}

/// Installs the simulated backend for the whole test process.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    crate::libtls::init(Arc::new(SimBackend::new())).unwrap();
}

pub fn config() -> Config {
    init();
    Config::new().unwrap()
}

/// Server configuration with a single keypair and no client verification.
pub fn server_config(cert: &str, key: &str) -> Config {
    let mut config = config();
    config.set_keypair_mem(cert.as_bytes(), key.as_bytes()).unwrap();
    config
}

/// Client configuration trusting `ca`.
pub fn client_config(ca: &str) -> Config {
    let mut config = config();
    config.set_ca_mem(ca.as_bytes()).unwrap();
    config
}

pub fn client(config: Config) -> Context {
    init();
    let mut ctx = Context::client().unwrap();
    ctx.configure(Arc::new(config)).unwrap();
    ctx
}

pub fn server(config: Config) -> Context {
    init();
    let mut ctx = Context::server().unwrap();
    ctx.configure(Arc::new(config)).unwrap();
    ctx
}

/// A client and a server connection over an in-memory pipe; the returned
/// pipe ends observe the client's and the server's side of the wire.
pub fn connected_pair(client_config: Config, server_config: Config, servername: &str) -> (Context, Context, PipeEnd, PipeEnd) {
    let (client_end, server_end) = pipe::pipe();
    let (client_view, server_view) = (client_end.handle(), server_end.handle());
    let mut c = client(client_config);
    c.connect_io(Box::new(client_end), Some(servername)).unwrap();
    let s = server(server_config).accept_io(Box::new(server_end)).unwrap();
    (c, s, client_view, server_view)
}

fn step(ctx: &mut Context, result: &mut Option<Result<()>>) {
    if result.is_none() {
        match ctx.handshake() {
            Err(ref e) if e.is_would_block() => {}
            r => *result = Some(r),
        }
    }
}

/// Alternates both handshakes until each has finished, one way or another.
pub fn handshake_pair(client: &mut Context, server: &mut Context) -> (Result<()>, Result<()>) {
    let (mut c, mut s) = (None, None);
    for _ in 0..32 {
        step(client, &mut c);
        step(server, &mut s);
        if c.is_some() && s.is_some() {
            break;
        }
    }
    (c.unwrap_or(Err(Error::WantPollIn)), s.unwrap_or(Err(Error::WantPollIn)))
}

/// Closes both ends, retrying while the other side has not answered yet.
pub fn close_pair(client: &mut Context, server: &mut Context) -> (Result<()>, Result<()>) {
    let (mut c, mut s) = (None, None);
    for _ in 0..8 {
        for (ctx, result) in [(&mut *client, &mut c), (&mut *server, &mut s)] {
            if result.is_none() {
                match ctx.close() {
                    Err(ref e) if e.is_would_block() => {}
                    r => *result = Some(r),
                }
            }
        }
        if c.is_some() && s.is_some() {
            break;
        }
    }
    (c.unwrap_or(Err(Error::WantPollIn)), s.unwrap_or(Err(Error::WantPollIn)))
}
