/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::backend::Backend;
use crate::error::{Error, ErrorState, Result};
use crate::util::load_file;
use crate::x509::verify::VerifyFlags;
use crate::x509::{load_ca, TrustAnchor};
use super::ciphersuites;
use super::engine::{Curves, Version};
use super::keypair::Keypair;

bitflags! {
    /// Protocol versions a configuration allows.
    pub struct Protocols: u32 {
        const TLSV1_0 = 1 << 1;
        const TLSV1_1 = 1 << 2;
        const TLSV1_2 = 1 << 3;
        const TLSV1_3 = 1 << 4;
        const TLSV1 = Self::TLSV1_0.bits | Self::TLSV1_1.bits | Self::TLSV1_2.bits | Self::TLSV1_3.bits;
        const DEFAULT = Self::TLSV1_2.bits | Self::TLSV1_3.bits;
    }
}

impl Protocols {
    pub const ALL: Protocols = Protocols::TLSV1;

    /// The engine's version range for this set. TLSv1.3 is accepted but the
    /// engine never negotiates it; the remaining versions must be contiguous.
    pub fn version_range(self) -> Result<(Version, Version)> {
        let p10 = Protocols::TLSV1_0;
        let p11 = Protocols::TLSV1_1;
        let p12 = Protocols::TLSV1_2;
        let range = match self - Protocols::TLSV1_3 {
            p if p == p10 => (Version::Tls10, Version::Tls10),
            p if p == p10 | p11 => (Version::Tls10, Version::Tls11),
            p if p == p10 | p11 | p12 => (Version::Tls10, Version::Tls12),
            p if p == p11 => (Version::Tls11, Version::Tls11),
            p if p == p11 | p12 => (Version::Tls11, Version::Tls12),
            p if p == p12 => (Version::Tls12, Version::Tls12),
            _ => return Err(Error::msg("unsupported set of protocol versions")),
        };
        Ok(range)
    }
}

/// Parses a protocol list such as `"tlsv1.2,tlsv1.3"` or `"all:!tlsv1.0"`.
///
/// A negation appearing before anything was selected starts from all
/// protocols.
pub fn parse_protocols(protostr: &str) -> Result<Protocols> {
    let mut protocols = Protocols::empty();
    for word in protostr.split(|c| c == ',' || c == ':') {
        let word = word.trim_start_matches(|c| c == ' ' || c == '\t');
        let (negate, word) = match word.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, word),
        };
        if negate && protocols.is_empty() {
            protocols = Protocols::ALL;
        }

        let proto = match word.to_ascii_lowercase().as_str() {
            "all" | "legacy" => Protocols::ALL,
            "default" | "secure" => Protocols::DEFAULT,
            "tlsv1" => Protocols::TLSV1,
            "tlsv1.0" => Protocols::TLSV1_0,
            "tlsv1.1" => Protocols::TLSV1_1,
            "tlsv1.2" => Protocols::TLSV1_2,
            "tlsv1.3" => Protocols::TLSV1_3,
            _ => return Err(Error::msg(format!("invalid protocol '{}'", word))),
        };
        if negate {
            protocols.remove(proto);
        } else {
            protocols.insert(proto);
        }
    }
    Ok(protocols)
}

/// Client certificate policy of a server.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerifyClient {
    Off,
    Required,
    /// Verify a certificate if the client sends one.
    Optional,
}

/// Finite-field Diffie-Hellman setting. The engine has no DHE suites, so
/// this is recorded but never used.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DheParams {
    None,
    Auto,
    Legacy,
}

const CIPHERS_DEFAULT: &str = "TLSv1.3:TLSv1.2+AEAD+ECDHE:TLSv1.2+AEAD+DHE";
const CIPHERS_COMPAT: &str = "HIGH:!aNULL";
const CIPHERS_LEGACY: &str = "HIGH:MEDIUM:!aNULL";
const CIPHERS_ALL: &str = "ALL:!aNULL:!eNULL";

const ECDHE_CURVES: &str = "X25519,P-256,P-384";

/// Curves in the only order the engine can advertise them.
const CURVE_ORDER: [(&[&str], Curves); 4] = [
    (&["X25519"], Curves::X25519),
    (&["P-256", "prime256v1"], Curves::SECP256R1),
    (&["P-384", "secp384r1"], Curves::SECP384R1),
    (&["P-521", "secp521r1"], Curves::SECP521R1),
];

/// Location of the system trust store used when certificates must be
/// verified and no CA was configured.
pub fn default_ca_cert_file() -> &'static Path {
    Path::new("/etc/ssl/cert.pem")
}

/// Settings shared by any number of contexts.
///
/// A `Config` is built and adjusted through `&mut self` setters, then
/// wrapped in an `Arc` and handed to `Context::configure`. Setters record a
/// failure in `error()` and leave the previous value in place.
#[derive(Clone)]
pub struct Config {
    backend: Arc<dyn Backend>,
    error: ErrorState,

    alpn: Vec<String>,
    ca: Arc<Vec<TrustAnchor>>,
    suites: Vec<u16>,
    ciphers_server: bool,
    dheparams: DheParams,
    curves: Curves,
    keypairs: Vec<Keypair>,
    ocsp_require_stapling: bool,
    protocols: Protocols,
    verify: VerifyFlags,
    verify_client: VerifyClient,
    verify_depth: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("alpn", &self.alpn)
            .field("ca", &self.ca.len())
            .field("suites", &self.suites)
            .field("protocols", &self.protocols)
            .field("keypairs", &self.keypairs.len())
            .field("verify", &self.verify)
            .field("verify_client", &self.verify_client)
            .field("verify_depth", &self.verify_depth)
            .finish()
    }
}

impl Config {
    /// A configuration using the backend installed with `libtls::init`.
    pub fn new() -> Result<Config> {
        Config::with_backend(crate::installed_backend()?)
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Config> {
        let mut config = Config {
            backend,
            error: ErrorState::default(),
            alpn: Vec::new(),
            ca: Arc::new(Vec::new()),
            suites: Vec::new(),
            ciphers_server: true,
            dheparams: DheParams::None,
            curves: Curves::empty(),
            keypairs: vec![Keypair::new()],
            ocsp_require_stapling: false,
            protocols: Protocols::DEFAULT,
            verify: VerifyFlags::all(),
            verify_client: VerifyClient::Off,
            verify_depth: 6,
        };
        config.set_ecdhecurves("default")?;
        config.set_ciphers("secure")?;
        Ok(config)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            self.error.record(e);
        }
        result
    }

    /// The message of the last failed setter.
    pub fn error(&self) -> Option<&str> {
        self.error.msg()
    }

    pub fn os_error(&self) -> Option<i32> {
        self.error.os_error()
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn set_alpn(&mut self, alpn: &str) -> Result<()> {
        self.error.clear();
        let parsed = alpn
            .split(',')
            .map(|proto| match proto.len() {
                0 => Err(Error::msg("alpn protocol with zero length")),
                1..=255 => Ok(proto.to_owned()),
                _ => Err(Error::msg("alpn protocol too long")),
            })
            .collect::<Result<Vec<_>>>();
        self.alpn = self.record(parsed)?;
        Ok(())
    }

    pub fn alpn(&self) -> &[String] {
        &self.alpn
    }

    pub fn set_ca_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.error.clear();
        let loaded = load_file(path.as_ref(), "CA").and_then(|data| load_ca(&data));
        self.ca = Arc::new(self.record(loaded)?);
        Ok(())
    }

    pub fn set_ca_mem(&mut self, ca: &[u8]) -> Result<()> {
        self.error.clear();
        let loaded = load_ca(ca);
        self.ca = Arc::new(self.record(loaded)?);
        Ok(())
    }

    pub fn set_ca_path<P: AsRef<Path>>(&mut self, _path: P) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("CA path is not supported")))
    }

    pub fn ca(&self) -> &Arc<Vec<TrustAnchor>> {
        &self.ca
    }

    pub fn set_crl_file<P: AsRef<Path>>(&mut self, _path: P) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("CRL is not supported")))
    }

    pub fn set_crl_mem(&mut self, _crl: &[u8]) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("CRL is not supported")))
    }

    /// Selects cipher suites with a cipher list or one of the aliases
    /// `secure`/`default`, `compat`, `legacy` and `all`/`insecure`.
    pub fn set_ciphers(&mut self, ciphers: &str) -> Result<()> {
        self.error.clear();
        let list = match ciphers.to_ascii_lowercase().as_str() {
            "secure" | "default" => CIPHERS_DEFAULT,
            "compat" => CIPHERS_COMPAT,
            "legacy" => CIPHERS_LEGACY,
            "all" | "insecure" => CIPHERS_ALL,
            _ => ciphers,
        };
        let parsed = ciphersuites::parse(list).map_err(|_| Error::msg("failed to parse cipher list"));
        self.suites = self.record(parsed)?;
        Ok(())
    }

    /// Cipher suites in preference order.
    pub fn suites(&self) -> &[u16] {
        &self.suites
    }

    pub fn set_dheparams(&mut self, params: &str) -> Result<()> {
        self.error.clear();
        let parsed = match params.to_ascii_lowercase().as_str() {
            "none" => Ok(DheParams::None),
            "auto" => Ok(DheParams::Auto),
            "legacy" => Ok(DheParams::Legacy),
            _ => Err(Error::msg(format!("invalid dhe param '{}'", params))),
        };
        self.dheparams = self.record(parsed)?;
        Ok(())
    }

    pub fn dheparams(&self) -> DheParams {
        self.dheparams
    }

    /// Sets a single ECDHE curve; `none` and `auto` select the defaults.
    pub fn set_ecdhecurve(&mut self, curve: &str) -> Result<()> {
        if curve.eq_ignore_ascii_case("none") || curve.eq_ignore_ascii_case("auto") {
            return self.set_ecdhecurves(ECDHE_CURVES);
        }
        if curve.contains(|c| c == ',' || c == ':') {
            self.error.clear();
            return self.record(Err(Error::msg(format!("invalid ecdhe curve '{}'", curve))));
        }
        self.set_ecdhecurves(curve)
    }

    /// Sets the ECDHE curves from a list such as `"X25519,P-256"`. The curves
    /// must appear in the order X25519, P-256, P-384, P-521.
    pub fn set_ecdhecurves(&mut self, curves: &str) -> Result<()> {
        self.error.clear();
        let curves = if curves.eq_ignore_ascii_case("default") { ECDHE_CURVES } else { curves };
        let parsed = parse_curves(curves);
        self.curves = self.record(parsed)?;
        Ok(())
    }

    pub fn curves(&self) -> Curves {
        self.curves
    }

    pub fn set_protocols(&mut self, protocols: Protocols) -> Result<()> {
        self.error.clear();
        self.protocols = protocols;
        Ok(())
    }

    pub fn protocols(&self) -> Protocols {
        self.protocols
    }

    pub fn set_verify_depth(&mut self, verify_depth: usize) -> Result<()> {
        self.error.clear();
        self.verify_depth = verify_depth;
        Ok(())
    }

    pub fn verify_depth(&self) -> usize {
        self.verify_depth
    }

    pub fn prefer_ciphers_client(&mut self) {
        self.ciphers_server = false;
    }

    pub fn prefer_ciphers_server(&mut self) {
        self.ciphers_server = true;
    }

    pub fn ciphers_server(&self) -> bool {
        self.ciphers_server
    }

    pub fn insecure_noverifycert(&mut self) {
        self.verify.remove(VerifyFlags::CERT);
    }

    pub fn insecure_noverifyname(&mut self) {
        self.verify.remove(VerifyFlags::NAME);
    }

    pub fn insecure_noverifytime(&mut self) {
        self.verify.remove(VerifyFlags::TIME);
    }

    /// Re-enables every verification check.
    pub fn verify(&mut self) {
        self.verify = VerifyFlags::all();
    }

    pub fn verify_flags(&self) -> VerifyFlags {
        self.verify
    }

    pub fn verify_client(&mut self) {
        self.verify_client = VerifyClient::Required;
    }

    pub fn verify_client_optional(&mut self) {
        self.verify_client = VerifyClient::Optional;
    }

    pub fn client_verification(&self) -> VerifyClient {
        self.verify_client
    }

    pub fn ocsp_require_stapling(&mut self) {
        self.ocsp_require_stapling = true;
    }

    pub fn ocsp_stapling_required(&self) -> bool {
        self.ocsp_require_stapling
    }

    pub fn keypairs(&self) -> &[Keypair] {
        &self.keypairs
    }

    fn first_keypair(&mut self) -> &mut Keypair {
        if self.keypairs.is_empty() {
            self.keypairs.push(Keypair::new());
        }
        &mut self.keypairs[0]
    }

    pub fn set_cert_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_cert_file(path);
        self.record(result)
    }

    pub fn set_cert_mem(&mut self, cert: &[u8]) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_cert_mem(cert);
        self.record(result)
    }

    pub fn set_key_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_key_file(path);
        self.record(result)
    }

    pub fn set_key_mem(&mut self, key: &[u8]) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_key_mem(key);
        self.record(result)
    }

    pub fn set_keypair_file<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, cert: P, key: Q) -> Result<()> {
        self.set_cert_file(cert)?;
        self.set_key_file(key)
    }

    pub fn set_keypair_mem(&mut self, cert: &[u8], key: &[u8]) -> Result<()> {
        self.set_cert_mem(cert)?;
        self.set_key_mem(key)
    }

    pub fn set_ocsp_staple_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_ocsp_staple_file(path);
        self.record(result)
    }

    pub fn set_ocsp_staple_mem(&mut self, staple: &[u8]) -> Result<()> {
        self.error.clear();
        let result = self.first_keypair().set_ocsp_staple_mem(staple);
        self.record(result)
    }

    pub fn set_keypair_ocsp_file<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(&mut self, cert: P, key: Q, staple: R) -> Result<()> {
        self.set_keypair_file(cert, key)?;
        self.set_ocsp_staple_file(staple)
    }

    pub fn set_keypair_ocsp_mem(&mut self, cert: &[u8], key: &[u8], staple: &[u8]) -> Result<()> {
        self.set_keypair_mem(cert, key)?;
        self.set_ocsp_staple_mem(staple)
    }

    /// Appends a further keypair, chosen by SNI on servers.
    pub fn add_keypair_file<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, cert: P, key: Q) -> Result<()> {
        self.error.clear();
        let mut keypair = Keypair::new();
        let result = keypair.set_cert_file(cert).and_then(|_| keypair.set_key_file(key));
        self.record(result)?;
        self.keypairs.push(keypair);
        debug!(keypairs = self.keypairs.len(), "keypair added");
        Ok(())
    }

    /// Appends a further keypair after checking that its key matches.
    pub fn add_keypair_mem(&mut self, cert: &[u8], key: &[u8]) -> Result<()> {
        self.error.clear();
        let mut keypair = Keypair::new();
        let result = keypair
            .set_cert_mem(cert)
            .and_then(|_| keypair.set_key_mem(key))
            .and_then(|_| keypair.check(&*self.backend));
        self.record(result)?;
        self.keypairs.push(keypair);
        debug!(keypairs = self.keypairs.len(), "keypair added");
        Ok(())
    }

    /// Like `add_keypair_file` with an OCSP staple; staples are unsupported,
    /// so no keypair is ever added.
    pub fn add_keypair_ocsp_file<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(&mut self, cert: P, key: Q, staple: R) -> Result<()> {
        self.error.clear();
        let mut keypair = Keypair::new();
        let result = keypair
            .set_cert_file(cert)
            .and_then(|_| keypair.set_key_file(key))
            .and_then(|_| keypair.set_ocsp_staple_file(staple));
        self.record(result)?;
        self.keypairs.push(keypair);
        Ok(())
    }

    pub fn add_keypair_ocsp_mem(&mut self, cert: &[u8], key: &[u8], staple: &[u8]) -> Result<()> {
        self.error.clear();
        let mut keypair = Keypair::new();
        let result = keypair
            .set_cert_mem(cert)
            .and_then(|_| keypair.set_key_mem(key))
            .and_then(|_| keypair.set_ocsp_staple_mem(staple))
            .and_then(|_| keypair.check(&*self.backend));
        self.record(result)?;
        self.keypairs.push(keypair);
        Ok(())
    }

    /// Wipes the private keys of every keypair.
    pub fn clear_keys(&mut self) {
        for keypair in self.keypairs.iter_mut() {
            keypair.clear_key();
        }
    }

    pub fn set_session_id(&mut self, _session_id: &[u8]) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("session resumption is not supported")))
    }

    pub fn set_session_lifetime(&mut self, lifetime: u32) -> Result<()> {
        self.error.clear();
        if lifetime != 0 {
            return self.record(Err(Error::msg("session resumption is not supported")));
        }
        Ok(())
    }

    pub fn add_ticket_key(&mut self, _keyrev: u32, _key: &[u8]) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("session resumption is not supported")))
    }

    pub fn set_session_fd(&mut self, _session_fd: i32) -> Result<()> {
        self.error.clear();
        self.record(Err(Error::msg("sessions are not supported")))
    }
}

fn parse_curves(names: &str) -> Result<Curves> {
    let mut curves = Curves::empty();
    let mut last = 0;
    for name in names.split(|c| c == ',' || c == ':') {
        let name = name.trim_start_matches(|c| c == ' ' || c == '\t');
        let position = CURVE_ORDER.iter().position(|(aliases, _)| aliases.contains(&name));
        match position {
            Some(i) if i < last => return Err(Error::msg("unsupported ecdhe curve order")),
            Some(i) => {
                curves.insert(CURVE_ORDER[i].1);
                last = i;
            }
            None => return Err(Error::msg(format!("invalid ecdhe curve '{}'", name))),
        }
    }
    Ok(curves)
}
