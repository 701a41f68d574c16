/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! Transports for TLS connections.
//!
//! If you are using `std::net::TcpStream`, pass it to
//! `Context::connect_socket` or `Context::accept_socket`. Any other
//! `std::io::Read + std::io::Write` type can be used through
//! `connect_stream`/`accept_stream`, one stream per direction through
//! `connect_split`/`accept_split`, and a pair of closures through
//! `connect_cbs`/`accept_cbs`. If all else fails, implement `IoCallback`.

use std::io::{ErrorKind as IoErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::warn;

use crate::error::{Error, Result};

/// The byte transport underneath a connection.
///
/// `recv` returning `Ok(0)` means end of stream; `send` returning `Ok(0)` is
/// treated as a failure. Return `Error::WantPollIn`/`Error::WantPollOut`
/// when the transport would block: the operation in progress returns the
/// same value and can be retried once the transport is ready.
pub trait IoCallback: Send {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn send(&mut self, buf: &[u8]) -> Result<usize>;

    /// Called once when the connection is closed.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

fn would_block(e: std::io::Error, want: Error) -> Error {
    if e.kind() == IoErrorKind::WouldBlock {
        want
    } else {
        Error::Io(e)
    }
}

/// Any `Read + Write` byte stream.
pub struct Stream<S>(pub S);

impl<S: Read + Write + Send> IoCallback for Stream<S> {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf).map_err(|e| would_block(e, Error::WantPollIn))
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.write(buf).map_err(|e| would_block(e, Error::WantPollOut))
    }
}

/// Separate byte streams for each direction, such as a pipe pair.
pub struct Split<R, W> {
    pub read: R,
    pub write: W,
}

impl<R: Read + Send, W: Write + Send> IoCallback for Split<R, W> {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read.read(buf).map_err(|e| would_block(e, Error::WantPollIn))
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        self.write.write(buf).map_err(|e| would_block(e, Error::WantPollOut))
    }
}

/// A TCP socket, shut down in both directions on close.
pub struct Socket(pub TcpStream);

impl IoCallback for Socket {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf).map_err(|e| would_block(e, Error::WantPollIn))
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.write(buf).map_err(|e| would_block(e, Error::WantPollOut))
    }

    fn close(&mut self) -> Result<()> {
        match self.0.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(ref e) if matches!(e.kind(), IoErrorKind::NotConnected | IoErrorKind::ConnectionReset) => Ok(()),
            Err(e) => Err(Error::os("shutdown", e)),
        }
    }
}

pub type RecvCallback = Box<dyn FnMut(&mut [u8]) -> Result<usize> + Send>;
pub type SendCallback = Box<dyn FnMut(&[u8]) -> Result<usize> + Send>;

/// A pair of closures acting as the transport.
pub struct Callbacks {
    recv: RecvCallback,
    send: SendCallback,
}

impl Callbacks {
    pub fn new<R, W>(recv: R, send: W) -> Callbacks
    where
        R: FnMut(&mut [u8]) -> Result<usize> + Send + 'static,
        W: FnMut(&[u8]) -> Result<usize> + Send + 'static,
    {
        Callbacks { recv: Box::new(recv), send: Box::new(send) }
    }

    /// Builds the transport from optional callbacks, as taken by
    /// `connect_cbs`/`accept_cbs`.
    pub(crate) fn from_parts(recv: Option<RecvCallback>, send: Option<SendCallback>) -> Result<Callbacks> {
        match (recv, send) {
            (Some(recv), Some(send)) => Ok(Callbacks { recv, send }),
            _ => Err(Error::msg("no callbacks provided")),
        }
    }
}

impl IoCallback for Callbacks {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        (self.recv)(buf)
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        (self.send)(buf)
    }
}

/// Closes `io`, keeping `first` as the reported error if there was one.
pub(crate) fn close_transport(io: &mut dyn IoCallback, first: Result<()>) -> Result<()> {
    match (first, io.close()) {
        (Err(first), Err(second)) => {
            warn!(error = %second, "transport close error discarded");
            Err(first)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
