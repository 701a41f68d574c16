/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! This module contains everything related to TLS connections.
//!
//! Basic way to set up a TLS client:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use libtls::ssl::{Config, Context};
//!
//! fn fetch(backend: Arc<dyn libtls::Backend>) -> libtls::Result<Vec<u8>> {
//!     libtls::init(backend)?;
//!     let mut config = Config::new()?;
//!     config.set_alpn("http/1.1")?;
//!
//!     let mut ctx = Context::client()?;
//!     ctx.configure(Arc::new(config))?;
//!     ctx.connect("example.org:443", None)?;
//!     ctx.write(b"GET / HTTP/1.0\r\nHost: example.org\r\n\r\n")?;
//!
//!     let mut response = Vec::new();
//!     let mut buf = [0u8; 4096];
//!     loop {
//!         match ctx.read(&mut buf)? {
//!             0 => break,
//!             n => response.extend_from_slice(&buf[..n]),
//!         }
//!     }
//!     ctx.close()?;
//!     Ok(response)
//! }
//! ```
//!
//! A `Config` is shared, through an `Arc`, by any number of `Context`s. A
//! server `Context` never talks to a peer itself: every `accept_*` call
//! returns a new connection context.

pub mod ciphersuites;
pub mod config;
pub mod conninfo;
pub mod context;
pub mod engine;
pub mod io;
pub mod keypair;
mod policy;

#[doc(inline)]
pub use self::config::{parse_protocols, Config, DheParams, Protocols, VerifyClient};
#[doc(inline)]
pub use self::conninfo::ConnectionInfo;
#[doc(inline)]
pub use self::context::{Context, Role};
#[doc(inline)]
pub use self::io::{Callbacks, IoCallback, Socket, Split, Stream};
#[doc(inline)]
pub use self::keypair::Keypair;
