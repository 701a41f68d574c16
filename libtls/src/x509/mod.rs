/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

pub mod certificate;
pub mod trust;
pub mod verify;

#[doc(inline)]
pub use self::certificate::Certificate;
#[doc(inline)]
pub use self::trust::{load_ca, TrustAnchor};
#[doc(inline)]
pub use self::verify::check_name;

use yasna::models::ObjectIdentifier;

use crate::error::X509Status;
use crate::pk::{oid_is, PublicKey};

/// A certificate chain verifier, fed one chain at a time by the engine.
///
/// The engine calls `start_chain`, then for every certificate (leaf first)
/// `start_cert`, any number of `append` calls and `end_cert`, and finally
/// `end_chain` which yields the verdict. After a successful verdict
/// `get_pkey` returns the leaf's public key.
pub trait X509Class: Send {
    fn start_chain(&mut self, server_name: Option<&str>);
    fn start_cert(&mut self, length: usize);
    fn append(&mut self, buf: &[u8]);
    fn end_cert(&mut self);
    fn end_chain(&mut self) -> X509Status;
    fn get_pkey(&self) -> Option<PublicKey>;
}

const OID_C: &[u64] = &[2, 5, 4, 6];
const OID_ST: &[u64] = &[2, 5, 4, 8];
const OID_L: &[u64] = &[2, 5, 4, 7];
const OID_O: &[u64] = &[2, 5, 4, 10];
const OID_OU: &[u64] = &[2, 5, 4, 11];
pub(crate) const OID_CN: &[u64] = &[2, 5, 4, 3];

/// The distinguished name elements kept for a peer certificate.
///
/// Each element is bounded; longer values are truncated to the slot size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameElements {
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub common_name: Option<String>,
}

fn bounded(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

impl NameElements {
    pub(crate) fn from_attributes(attributes: &[(ObjectIdentifier, String)]) -> NameElements {
        let first = |arcs: &[u64], max_chars: usize| {
            attributes
                .iter()
                .find(|(oid, _)| oid_is(oid, arcs))
                .map(|(_, value)| bounded(value, max_chars))
        };
        NameElements {
            country: first(OID_C, 2),
            state: first(OID_ST, 128),
            locality: first(OID_L, 128),
            organization: first(OID_O, 64),
            organizational_unit: first(OID_OU, 64),
            common_name: first(OID_CN, 64),
        }
    }

    /// Renders the elements as `C=..,ST=..,L=..,O=..,OU=..,CN=..`, omitting
    /// absent ones.
    pub fn to_dn_string(&self) -> String {
        let parts = [
            ("C", &self.country),
            ("ST", &self.state),
            ("L", &self.locality),
            ("O", &self.organization),
            ("OU", &self.organizational_unit),
            ("CN", &self.common_name),
        ];
        let mut out = String::new();
        for (key, value) in parts.iter() {
            if let Some(value) = value {
                if !out.is_empty() {
                    out.push(',');
                }
                out.push_str(key);
                out.push('=');
                escape_into(&mut out, value);
            }
        }
        out
    }
}

fn escape_into(out: &mut String, value: &str) {
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        let escape = match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ':' => true,
            '#' => i == 0,
            ' ' => i == 0 || i == last,
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
}
