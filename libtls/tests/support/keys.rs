/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

// Every certificate is valid from 1792394602 to 4945994602 (Unix time).

/// Root of the `ROOT_CA_CERT` hierarchy: O=Example Trust, CN=Example Root CA.
pub const ROOT_CA_CERT: &str = include_str!("keys/root_ca.crt");
pub const INTERMEDIATE1_CERT: &str = include_str!("keys/intermediate1.crt");
pub const INTERMEDIATE2_CERT: &str = include_str!("keys/intermediate2.crt");

/// CN=localhost, issued by the root.
pub const LEAF_CERT: &str = include_str!("keys/leaf.crt");
pub const LEAF_KEY: &str = include_str!("keys/leaf.key");

/// CN=localhost, issued by Intermediate 2.
pub const DEEP_LEAF_CERT: &str = include_str!("keys/deep_leaf.crt");
pub const DEEP_LEAF_KEY: &str = include_str!("keys/deep_leaf.key");

/// Self-signed RSA-2048, CN=localhost with every name element set.
pub const LOCALHOST_RSA_CERT: &str = include_str!("keys/localhost_rsa.crt");
pub const LOCALHOST_RSA_KEY: &str = include_str!("keys/localhost_rsa.key");
pub const LOCALHOST_RSA_PKCS8_KEY: &str = include_str!("keys/localhost_rsa_pkcs8.key");
pub const LOCALHOST_RSA_SHA256: &str = "7c71820407647b4e6caf92a7297eb0faafa5a2f758dccea3346277891593ccc6";
pub const LOCALHOST_RSA_NOT_BEFORE: i64 = 1792394602;
pub const LOCALHOST_RSA_NOT_AFTER: i64 = 4945994602;

/// Self-signed P-256, CN=localhost.
pub const LOCALHOST_EC_CERT: &str = include_str!("keys/localhost_ec.crt");
pub const LOCALHOST_EC_KEY: &str = include_str!("keys/localhost_ec.key");
pub const LOCALHOST_EC_PKCS8_KEY: &str = include_str!("keys/localhost_ec_pkcs8.key");

/// Self-signed, valid for example.org and *.example.org.
pub const EXAMPLE_ORG_CERT: &str = include_str!("keys/example_org.crt");
pub const EXAMPLE_ORG_KEY: &str = include_str!("keys/example_org.key");

/// An RSA key no certificate belongs to.
pub const MISMATCH_RSA_KEY: &str = include_str!("keys/mismatch_rsa.key");

/// A point in time at which every certificate above is valid.
pub const VALID_TIME: i64 = 2_000_000_000;
