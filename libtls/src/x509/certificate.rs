/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use chrono::{NaiveDateTime, TimeZone, Utc};
use yasna::models::ObjectIdentifier;
use yasna::tags::{TAG_GENERALIZEDTIME, TAG_UTCTIME};
use yasna::{ASN1Error, ASN1ErrorKind, ASN1Result, BERReader, Tag};

use crate::error::EngineError;
use crate::pk::{self, oid_is, Curve, KeyType, PublicKey};
use super::NameElements;

const OID_BASIC_CONSTRAINTS: &[u64] = &[2, 5, 29, 19];
const OID_SUBJECT_ALT_NAME: &[u64] = &[2, 5, 29, 17];

/// The fields of a DER certificate this layer looks at.
///
/// No signature is checked here; chain validation belongs to the engine's
/// verifier.
#[derive(Debug, Clone)]
pub struct Certificate {
    subject_der: Vec<u8>,
    issuer_der: Vec<u8>,
    subject: Vec<(ObjectIdentifier, String)>,
    issuer: Vec<(ObjectIdentifier, String)>,
    public_key: Option<PublicKey>,
    signer_key_type: Option<KeyType>,
    is_ca: bool,
    not_before: i64,
    not_after: i64,
    dns_names: Vec<String>,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Certificate, EngineError> {
        Ok(yasna::parse_der(der, read_certificate)?)
    }

    /// The encoded subject `Name`, as trust anchors store it.
    pub fn subject_der(&self) -> &[u8] {
        &self.subject_der
    }

    pub fn issuer_der(&self) -> &[u8] {
        &self.issuer_der
    }

    pub fn subject(&self) -> NameElements {
        NameElements::from_attributes(&self.subject)
    }

    pub fn issuer(&self) -> NameElements {
        NameElements::from_attributes(&self.issuer)
    }

    /// The certified public key; `None` for key types the engine cannot use.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    /// Type of the key that signed this certificate.
    pub fn signer_key_type(&self) -> Option<KeyType> {
        self.signer_key_type
    }

    pub fn is_ca(&self) -> bool {
        self.is_ca
    }

    /// Start of the validity window, in seconds since the Unix epoch.
    pub fn not_before(&self) -> i64 {
        self.not_before
    }

    /// End of the validity window, in seconds since the Unix epoch.
    pub fn not_after(&self) -> i64 {
        self.not_after
    }

    pub fn dns_names(&self) -> &[String] {
        &self.dns_names
    }

    /// The first common name of the subject.
    pub fn common_name(&self) -> Option<&str> {
        self.subject
            .iter()
            .find(|(oid, _)| oid_is(oid, super::OID_CN))
            .map(|(_, value)| value.as_str())
    }
}

fn invalid<T>() -> ASN1Result<T> {
    Err(ASN1Error::new(ASN1ErrorKind::Invalid))
}

fn read_certificate(r: BERReader) -> ASN1Result<Certificate> {
    r.read_sequence(|r| {
        let mut cert = r.next().read_sequence(|r| {
            r.read_optional(|r| r.read_tagged(Tag::context(0), |r| r.read_u8()))?;
            r.next().read_bigint_bytes()?;
            r.next().read_der()?;
            let (issuer, issuer_der) = r.next().read_with_buffer(read_name)?;
            let (not_before, not_after) = r.next().read_sequence(|r| {
                let not_before = read_time(r.next())?;
                let not_after = read_time(r.next())?;
                Ok((not_before, not_after))
            })?;
            let (subject, subject_der) = r.next().read_with_buffer(read_name)?;
            let public_key = read_public_key_info(r.next())?;
            r.read_optional(|r| r.read_tagged_implicit(Tag::context(1), |r| r.read_bitvec_bytes()))?;
            r.read_optional(|r| r.read_tagged_implicit(Tag::context(2), |r| r.read_bitvec_bytes()))?;

            let mut is_ca = false;
            let mut dns_names = Vec::new();
            r.read_optional(|r| {
                r.read_tagged(Tag::context(3), |r| {
                    r.read_sequence_of(|r| {
                        r.read_sequence(|r| {
                            let oid = r.next().read_oid()?;
                            r.read_optional(|r| r.read_bool())?;
                            let value = r.next().read_bytes()?;
                            if oid_is(&oid, OID_BASIC_CONSTRAINTS) {
                                is_ca = yasna::parse_der(&value, read_basic_constraints)?;
                            } else if oid_is(&oid, OID_SUBJECT_ALT_NAME) {
                                yasna::parse_der(&value, |r| read_dns_names(r, &mut dns_names))?;
                            }
                            Ok(())
                        })
                    })
                })
            })?;

            Ok(Certificate {
                subject_der: subject_der.to_vec(),
                issuer_der: issuer_der.to_vec(),
                subject,
                issuer,
                public_key,
                signer_key_type: None,
                is_ca,
                not_before,
                not_after,
                dns_names,
            })
        })?;

        cert.signer_key_type = r.next().read_sequence(|r| {
            let oid = r.next().read_oid()?;
            r.read_optional(|r| r.read_der())?;
            Ok(signature_key_type(&oid))
        })?;
        r.next().read_bitvec_bytes()?;
        Ok(cert)
    })
}

fn read_name(r: BERReader) -> ASN1Result<Vec<(ObjectIdentifier, String)>> {
    let mut attributes = Vec::new();
    r.read_sequence_of(|r| {
        r.read_set_of(|r| {
            r.read_sequence(|r| {
                let oid = r.next().read_oid()?;
                let value = r.next().read_tagged_der()?;
                attributes.push((oid, String::from_utf8_lossy(value.value()).into_owned()));
                Ok(())
            })
        })
    })?;
    Ok(attributes)
}

fn read_time(r: BERReader) -> ASN1Result<i64> {
    let value = r.read_tagged_der()?;
    let text = std::str::from_utf8(value.value()).or_else(|_| invalid())?;
    let full = if value.tag() == TAG_UTCTIME {
        let yy: u32 = match text.get(..2).and_then(|s| s.parse().ok()) {
            Some(yy) => yy,
            None => return invalid(),
        };
        let century = if yy >= 50 { "19" } else { "20" };
        format!("{}{}", century, text)
    } else if value.tag() == TAG_GENERALIZEDTIME {
        text.to_owned()
    } else {
        return invalid();
    };
    let naive = NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%M%SZ").or_else(|_| invalid())?;
    Ok(Utc.from_utc_datetime(&naive).timestamp())
}

fn read_public_key_info(r: BERReader) -> ASN1Result<Option<PublicKey>> {
    r.read_sequence(|r| {
        let (alg, param) = r.next().read_sequence(|r| {
            let alg = r.next().read_oid()?;
            let param = r.read_optional(|r| r.read_oid())?;
            r.read_optional(|r| r.read_der())?;
            Ok((alg, param))
        })?;
        let (key, _) = r.next().read_bitvec_bytes()?;

        if oid_is(&alg, pk::OID_RSA_ENCRYPTION) {
            let (n, e) = yasna::parse_der(&key, |r| {
                r.read_sequence(|r| Ok((pk::read_uint(r.next())?, pk::read_uint(r.next())?)))
            })?;
            Ok(Some(PublicKey::Rsa { n, e }))
        } else if oid_is(&alg, pk::OID_EC_PUBLIC_KEY) {
            Ok(param.as_ref().and_then(Curve::from_oid).map(|curve| PublicKey::Ec { curve, q: key }))
        } else {
            Ok(None)
        }
    })
}

fn read_basic_constraints(r: BERReader) -> ASN1Result<bool> {
    r.read_sequence(|r| {
        let ca = r.read_optional(|r| r.read_bool())?.unwrap_or(false);
        r.read_optional(|r| r.read_u64())?;
        Ok(ca)
    })
}

fn read_dns_names(r: BERReader, names: &mut Vec<String>) -> ASN1Result<()> {
    r.read_sequence_of(|r| {
        let name = r.read_tagged_der()?;
        if name.tag() == Tag::context(2) {
            names.push(String::from_utf8_lossy(name.value()).into_owned());
        }
        Ok(())
    })
}

fn signature_key_type(oid: &ObjectIdentifier) -> Option<KeyType> {
    match oid.components().as_slice() {
        [1, 2, 840, 113549, 1, 1, _] => Some(KeyType::Rsa),
        [1, 2, 840, 10045, 4, ..] => Some(KeyType::Ec),
        _ => None,
    }
}
