/* Copyright (c) Fortanix, Inc.
 *
 * Licensed under the GNU General Public License, version 2 <LICENSE-GPL or
 * https://www.gnu.org/licenses/gpl-2.0.html> or the Apache License, Version
 * 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>, at your
 * option. This file may not be copied, modified, or distributed except
 * according to those terms. */

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = ::core::result::Result<T, Error>;

/// Outcome of an X.509 chain evaluation as reported by a verifier.
pub type X509Status = ::core::result::Result<(), EngineError>;

/// Base of the "received fatal alert" code range.
pub const ERR_RECV_FATAL_ALERT: i32 = 256;
/// Base of the "sent fatal alert" code range.
pub const ERR_SEND_FATAL_ALERT: i32 = 512;

macro_rules! engine_errors {
    {$n:ident { $($rust:ident = $code:literal => $text:expr,)* }} => {
        /// The engine's numeric error space, with its fixed message table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $n {
            $($rust,)*
            RecvFatalAlert(u8),
            SendFatalAlert(u8),
            Other(i32),
        }

        impl $n {
            /// Translates an engine code. Both success codes (`0` for the
            /// engine and `32` for X.509 evaluation) map to `None`.
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    0 | 32 => None,
                    $($code => Some($n::$rust),)*
                    c if (ERR_RECV_FATAL_ALERT..ERR_RECV_FATAL_ALERT + 256).contains(&c) => {
                        Some($n::RecvFatalAlert((c - ERR_RECV_FATAL_ALERT) as u8))
                    }
                    c if (ERR_SEND_FATAL_ALERT..ERR_SEND_FATAL_ALERT + 256).contains(&c) => {
                        Some($n::SendFatalAlert((c - ERR_SEND_FATAL_ALERT) as u8))
                    }
                    c => Some($n::Other(c)),
                }
            }

            pub fn code(&self) -> i32 {
                match *self {
                    $($n::$rust => $code,)*
                    $n::RecvFatalAlert(alert) => ERR_RECV_FATAL_ALERT + alert as i32,
                    $n::SendFatalAlert(alert) => ERR_SEND_FATAL_ALERT + alert as i32,
                    $n::Other(code) => code,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match *self {
                    $($n::$rust => $text,)*
                    $n::RecvFatalAlert(_) => "received fatal alert from peer",
                    $n::SendFatalAlert(_) => "sent fatal alert to peer",
                    $n::Other(_) => "unknown error",
                }
            }
        }
    };
}

engine_errors!(EngineError {
    BadParam               = 1  => "caller-provided parameter is incorrect",
    BadState               = 2  => "operation requested by the caller cannot be applied with the current context state",
    UnsupportedVersion     = 3  => "incoming protocol or record version is unsupported",
    BadVersion             = 4  => "incoming record version does not match the expected version",
    BadLength              = 5  => "incoming record length is invalid",
    TooLarge               = 6  => "incoming record is too large to be processed, or buffer is too small for the handshake message to send",
    BadMac                 = 7  => "decryption found an invalid padding, or the record MAC is not correct",
    NoRandom               = 8  => "no initial entropy was provided, and none can be obtained from the OS",
    UnknownType            = 9  => "incoming record type is unknown",
    Unexpected             = 10 => "incoming record or message has wrong type with regards to the current engine state",
    BadCcs                 = 12 => "ChangeCipherSpec message from the peer has invalid contents",
    BadAlert               = 13 => "alert message from the peer has invalid contents (odd length)",
    BadHandshake           = 14 => "incoming handshake message decoding failed",
    OversizedId            = 15 => "ServerHello contains a session ID which is larger than 32 bytes",
    BadCipherSuite         = 16 => "server wants to use a cipher suite that we did not claim to support",
    BadCompression         = 17 => "server wants to use a compression that we did not claim to support",
    BadFraglen             = 18 => "server's max fragment length does not match client's",
    BadSecreneg            = 19 => "secure renegotiation failed",
    ExtraExtension         = 20 => "server sent an extension type that we did not announce, or used the same extension type several times in a single ServerHello",
    BadSni                 = 21 => "invalid Server Name Indication contents",
    BadHelloDone           = 22 => "invalid ServerHelloDone from the server (length is not 0)",
    LimitExceeded          = 23 => "internal limit exceeded",
    BadFinished            = 24 => "finished message from peer does not match the expected value",
    ResumeMismatch         = 25 => "session resumption attempt with distinct version or cipher suite",
    InvalidAlgorithm       = 26 => "unsupported or invalid algorithm",
    BadSignature           = 27 => "invalid signature",
    WrongKeyUsage          = 28 => "peer's public key does not have the proper type or is not allowed for requested operation",
    NoClientAuth           = 29 => "client did not send a certificate upon request, or the client certificate could not be validated",
    Io                     = 31 => "I/O error or premature close on underlying transport stream",
    X509InvalidValue       = 33 => "X.509: invalid value in an ASN.1 structure",
    X509Truncated          = 34 => "X.509: truncated certificate",
    X509EmptyChain         = 35 => "X.509: empty certificate chain (no certificate at all)",
    X509InnerTrunc         = 36 => "X.509: decoding error: inner element extends beyond outer element size",
    X509BadTagClass        = 37 => "X.509: decoding error: unsupported tag class (application or private)",
    X509BadTagValue        = 38 => "X.509: decoding error: unsupported tag value",
    X509IndefiniteLength   = 39 => "X.509: decoding error: indefinite length",
    X509ExtraElement       = 40 => "X.509: decoding error: extraneous element",
    X509Unexpected         = 41 => "X.509: decoding error: unexpected element",
    X509NotConstructed     = 42 => "X.509: decoding error: expected constructed element, but is primitive",
    X509NotPrimitive       = 43 => "X.509: decoding error: expected primitive element, but is constructed",
    X509PartialByte        = 44 => "X.509: decoding error: BIT STRING length is not multiple of 8",
    X509BadBoolean         = 45 => "X.509: decoding error: BOOLEAN value has invalid length",
    X509Overflow           = 46 => "X.509: decoding error: value is off-limits",
    X509BadDn              = 47 => "X.509: invalid distinguished name",
    X509BadTime            = 48 => "X.509: invalid date/time representation",
    X509Unsupported        = 49 => "X.509: certificate contains unsupported features that cannot be ignored",
    X509LimitExceeded      = 50 => "X.509: key or signature size exceeds internal limits",
    X509WrongKeyType       = 51 => "X.509: key type does not match that which was expected",
    X509BadSignature       = 52 => "X.509: signature is invalid",
    X509TimeUnknown        = 53 => "X.509: validation time is unknown",
    X509Expired            = 54 => "X.509: certificate is expired or not yet valid",
    X509DnMismatch         = 55 => "X.509: issuer/subject DN mismatch in the chain",
    X509BadServerName      = 56 => "X.509: expected server name was not found in the chain",
    X509CriticalExtension  = 57 => "X.509: unknown critical extension in certificate",
    X509NotCa              = 58 => "X.509: not a CA, or path length constraint violation",
    X509ForbiddenKeyUsage  = 59 => "X.509: Key Usage extension prohibits intended usage",
    X509WeakPublicKey      = 60 => "X.509: public key found in certificate is too small",
    X509NotTrusted         = 62 => "X.509: chain could not be linked to a trust anchor",
});

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

impl std::error::Error for EngineError {}

impl From<yasna::ASN1Error> for EngineError {
    fn from(e: yasna::ASN1Error) -> EngineError {
        use yasna::ASN1ErrorKind;
        match e.kind() {
            ASN1ErrorKind::Eof => EngineError::X509Truncated,
            ASN1ErrorKind::Extra => EngineError::X509ExtraElement,
            ASN1ErrorKind::IntegerOverflow => EngineError::X509Overflow,
            ASN1ErrorKind::StackOverflow => EngineError::X509LimitExceeded,
            ASN1ErrorKind::Invalid => EngineError::X509InvalidValue,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Msg(String),
    #[error("{msg}: {source}")]
    Os {
        msg: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Engine(EngineError),
    #[error("connection closed")]
    ConnectionClosed,
    /// The transport cannot make progress until it becomes readable.
    #[error("operation would block until the transport is readable")]
    WantPollIn,
    /// The transport cannot make progress until it becomes writable.
    #[error("operation would block until the transport is writable")]
    WantPollOut,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn msg<S: Into<String>>(msg: S) -> Error {
        Error::Msg(msg.into())
    }

    pub(crate) fn os<S: Into<String>>(msg: S, source: io::Error) -> Error {
        Error::Os { msg: msg.into(), source }
    }

    /// `true` for the two transport "would block" sentinels.
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::WantPollIn | Error::WantPollOut)
    }

    /// Errors raised by the engine itself rather than by this layer.
    pub fn is_engine(&self) -> bool {
        matches!(self, Error::Engine(_) | Error::ConnectionClosed)
    }

    /// The OS error number carried by this error, if any.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            Error::Os { source, .. } | Error::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Error {
        Error::Engine(e)
    }
}

/// The error record kept by every context and configuration.
///
/// Public operations clear it on entry and fill it in on failure; callers
/// read it back through `error()`.
#[derive(Debug, Default, Clone)]
pub struct ErrorState {
    msg: Option<String>,
    num: Option<i32>,
    tls: bool,
}

impl ErrorState {
    pub fn clear(&mut self) {
        self.msg = None;
        self.num = None;
        self.tls = false;
    }

    pub fn set(&mut self, err: &Error) {
        self.msg = Some(err.to_string());
        self.num = err.os_error();
        self.tls = true;
    }

    /// Records `err` unless something more specific is already recorded.
    pub fn set_if_unset(&mut self, err: &Error) {
        if !self.tls {
            self.set(err);
        }
    }

    /// Records a failure following the layer's precedence rules: engine
    /// errors never overwrite an earlier message.
    pub fn record(&mut self, err: &Error) {
        if err.is_would_block() {
            return;
        }
        if err.is_engine() {
            self.set_if_unset(err);
        } else {
            self.set(err);
        }
    }

    pub fn is_set(&self) -> bool {
        self.tls
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn os_error(&self) -> Option<i32> {
        self.num
    }
}
