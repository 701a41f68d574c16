/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

#![allow(unused_doc_comments)]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod wrapper_macros;

// ==============
//      API
// ==============
pub mod backend;
pub mod error;
pub use crate::error::{EngineError, Error, Result};

pub mod hash;
pub mod pem;
pub mod pk;
pub mod ssl;
pub mod x509;

pub use crate::backend::Backend;
pub use crate::ssl::{Config, Context};

// ==============
//    Utility
// ==============
mod util;

use std::sync::{Arc, OnceLock};

static BACKEND: OnceLock<Arc<dyn Backend>> = OnceLock::new();
static DEFAULT_CONFIG: OnceLock<Arc<Config>> = OnceLock::new();

/// Installs the process-wide engine backend.
///
/// Only the first call has an effect; later calls are accepted and ignored so
/// that independent components may all call `init` during start-up.
pub fn init(backend: Arc<dyn Backend>) -> Result<()> {
    BACKEND.get_or_init(|| backend);
    Ok(())
}

pub(crate) fn installed_backend() -> Result<Arc<dyn Backend>> {
    BACKEND
        .get()
        .cloned()
        .ok_or_else(|| Error::msg("TLS backend has not been initialized"))
}

/// The shared configuration attached to freshly created contexts.
pub(crate) fn default_config() -> Result<Arc<Config>> {
    if let Some(config) = DEFAULT_CONFIG.get() {
        return Ok(config.clone());
    }
    let config = Arc::new(Config::with_backend(installed_backend()?)?);
    Ok(DEFAULT_CONFIG.get_or_init(|| config).clone())
}

#[cfg(test)]
#[path = "../tests/support/mod.rs"]
mod test_support;
