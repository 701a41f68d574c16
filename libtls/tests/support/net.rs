/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::net::{TcpListener, TcpStream};
use std::thread;

pub fn create_tcp_stream_pair_loopback() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let listener_addr = listener.local_addr().unwrap();

    let server_thread = thread::spawn(move || {
        let (server_stream, _) = listener.accept().unwrap();
        server_stream
    });

    let client_stream = TcpStream::connect(listener_addr).unwrap();
    let server_stream = server_thread.join().unwrap();
    (client_stream, server_stream)
}

/// A loopback listener and the `host:port` string to reach it.
pub fn loopback_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("127.0.0.1:{}", addr.port()))
}
