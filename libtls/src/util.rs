/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Splits `host:port` or `[v6addr]:port`.
///
/// Returns `None` when there is no port separator or when an unbracketed
/// host still contains a colon.
pub(crate) fn host_port(hostport: &str) -> Option<(&str, &str)> {
    let (host, port) = if let Some(rest) = hostport.strip_prefix('[') {
        let (host, rest) = rest.split_once(']')?;
        (host, rest.strip_prefix(':')?)
    } else {
        let (host, port) = hostport.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        (host, port)
    };
    if host.is_empty() || port.is_empty() {
        return None;
    }
    Some((host, port))
}

/// Drops the brackets around an IPv6 address literal.
pub(crate) fn unbracket(host: &str) -> &str {
    host.strip_prefix('[').and_then(|h| h.strip_suffix(']')).unwrap_or(host)
}

/// Reads a whole file for a configuration setter; `what` names the file in
/// error messages (`CA`, `certificate`, `key`).
pub(crate) fn load_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    let mut file = File::open(path)
        .map_err(|e| Error::os(format!("failed to open {} file '{}'", what, path.display()), e))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| Error::os(format!("failed to read {} file '{}'", what, path.display()), e))?;
    Ok(data)
}
