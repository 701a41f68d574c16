/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

//! PEM container decoding and encoding.
//!
//! A PEM container is any byte string holding zero or more
//! `-----BEGIN <tag>-----` / `-----END <tag>-----` blocks of base64 data.
//! Bytes outside of blocks are ignored, whatever their encoding.

use ::pem::{EncodeConfig, LineEnding, Pem};
use thiserror::Error;

/// Tags under which certificates are accepted.
pub const CERTIFICATE_TAGS: [&str; 2] = ["CERTIFICATE", "X509 CERTIFICATE"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    pub tag: String,
    pub data: Vec<u8>,
}

impl PemBlock {
    pub fn is_certificate(&self) -> bool {
        CERTIFICATE_TAGS.contains(&self.tag.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PemError {
    #[error("{0}")]
    Malformed(#[from] ::pem::PemError),
    #[error("encrypted PEM block '{0}' is not supported")]
    Encrypted(String),
}

/// Decodes every block of a PEM container, in order.
///
/// Only the contents of a block can make the decoding fail.
pub fn decode(input: &[u8]) -> Result<Vec<PemBlock>, PemError> {
    ::pem::parse_many(input)?
        .into_iter()
        .map(|block| {
            if block.headers().get("Proc-Type").is_some() {
                return Err(PemError::Encrypted(block.tag().to_owned()));
            }
            Ok(PemBlock { tag: block.tag().to_owned(), data: block.into_contents() })
        })
        .collect()
}

/// Encodes `data` as a single PEM block with 64-column lines.
pub fn encode(tag: &str, data: &[u8]) -> String {
    let block = Pem::new(tag, data.to_vec());
    ::pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}
