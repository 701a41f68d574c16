/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! In-memory, non-blocking transports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::libtls::ssl::IoCallback;
use crate::libtls::{Error, Result};

#[derive(Default)]
struct Channel {
    data: VecDeque<u8>,
    closed: bool,
}

/// One end of a duplex byte pipe.
///
/// `recv` on an empty pipe returns `Error::WantPollIn`, or end of stream once
/// the other end is closed or dropped. With a capacity set, `send` accepts
/// what fits and returns `Error::WantPollOut` on a full pipe.
pub struct PipeEnd {
    rx: Arc<Mutex<Channel>>,
    tx: Arc<Mutex<Channel>>,
    capacity: Option<usize>,
}

pub fn pipe() -> (PipeEnd, PipeEnd) {
    let a = Arc::new(Mutex::new(Channel::default()));
    let b = Arc::new(Mutex::new(Channel::default()));
    (
        PipeEnd { rx: a.clone(), tx: b.clone(), capacity: None },
        PipeEnd { rx: b, tx: a, capacity: None },
    )
}

pub fn pipe_with_capacity(capacity: usize) -> (PipeEnd, PipeEnd) {
    let (mut a, mut b) = pipe();
    a.capacity = Some(capacity);
    b.capacity = Some(capacity);
    (a, b)
}

impl PipeEnd {
    /// Bytes waiting to be received by this end.
    pub fn pending(&self) -> usize {
        self.rx.lock().unwrap().data.len()
    }

    /// Ends the stream towards the other end.
    pub fn shutdown(&self) {
        self.tx.lock().unwrap().closed = true;
    }

    /// Another handle on the same end, for inspection after the original has
    /// been handed to a connection.
    pub fn handle(&self) -> PipeEnd {
        PipeEnd { rx: self.rx.clone(), tx: self.tx.clone(), capacity: self.capacity }
    }

    /// Puts raw bytes on the wire towards this end.
    pub fn inject(&self, data: &[u8]) {
        self.rx.lock().unwrap().data.extend(data);
    }
}

impl IoCallback for PipeEnd {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx.lock().unwrap();
        if rx.data.is_empty() {
            return if rx.closed { Ok(0) } else { Err(Error::WantPollIn) };
        }
        let n = buf.len().min(rx.data.len());
        for (dst, src) in buf.iter_mut().zip(rx.data.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        let mut tx = self.tx.lock().unwrap();
        if tx.closed {
            return Err(Error::Io(std::io::ErrorKind::BrokenPipe.into()));
        }
        let room = self.capacity.map_or(buf.len(), |cap| cap.saturating_sub(tx.data.len()));
        if room == 0 {
            return Err(Error::WantPollOut);
        }
        let n = buf.len().min(room);
        tx.data.extend(&buf[..n]);
        Ok(n)
    }

    fn close(&mut self) -> Result<()> {
        self.shutdown();
        Ok(())
    }
}
