//! Error taxonomy for key parsing (spec §7).
//!
//! Each outward-facing [`Error`] variant carries an optional boxed `cause`,
//! the inner ASN.1/PEM/PBE error that triggered it, so diagnostics keep the
//! full chain instead of the original C implementation's practice of adding
//! numeric error-code offsets together.

use std::io;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the bounded ASN.1/DER cursor (component C1).
#[derive(Debug, Snafu, PartialEq, Eq, Clone, Copy)]
pub enum Asn1Error {
    #[snafu(display("ran out of data"))]
    OutOfData,
    #[snafu(display("unexpected tag"))]
    UnexpectedTag,
    #[snafu(display("invalid length encoding"))]
    InvalidLength,
    #[snafu(display("trailing or missing bytes in expected region"))]
    LengthMismatch,
    #[snafu(display("invalid data"))]
    InvalidData,
}

/// Top-level error taxonomy (spec §7).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid key format{}", cause_suffix(cause)))]
    InvalidFormat { cause: Option<Box<Error>> },

    #[snafu(display("invalid public key structure{}", cause_suffix(cause)))]
    InvalidPubkey { cause: Option<Box<Error>> },

    #[snafu(display("invalid AlgorithmIdentifier{}", cause_suffix(cause)))]
    InvalidAlg { cause: Option<Box<Error>> },

    #[snafu(display("invalid version field"))]
    InvalidVersion,

    #[snafu(display("unrecognized public-key algorithm OID"))]
    UnknownPkAlg,

    #[snafu(display("unrecognized or unsupported named curve"))]
    UnknownNamedCurve,

    #[snafu(display("a password is required to decrypt this key"))]
    PasswordRequired,

    #[snafu(display("decryption produced implausible plaintext (wrong password?)"))]
    PasswordMismatch,

    #[snafu(display("recognized but unimplemented encryption algorithm"))]
    FeatureUnavailable,

    #[snafu(display("file I/O error: {source}"))]
    FileIoError { source: io::Error },

    #[snafu(display("allocation failed"))]
    MallocFailed,

    #[snafu(display("input data out of bounds: {reason}"))]
    BadInputData { reason: String },

    #[snafu(display("{message}"))]
    Message { message: String },
}

fn cause_suffix(cause: &Option<Box<Error>>) -> String {
    match cause {
        Some(c) => format!(": {c}"),
        None => String::new(),
    }
}

impl From<Asn1Error> for Error {
    fn from(e: Asn1Error) -> Self {
        Error::Message {
            message: e.to_string(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::FileIoError { source }
    }
}

impl Error {
    pub(crate) fn invalid_format(cause: impl Into<Error>) -> Self {
        Error::InvalidFormat {
            cause: Some(Box::new(cause.into())),
        }
    }

    pub(crate) fn invalid_pubkey(cause: impl Into<Error>) -> Self {
        Error::InvalidPubkey {
            cause: Some(Box::new(cause.into())),
        }
    }

    pub(crate) fn invalid_alg(cause: impl Into<Error>) -> Self {
        Error::InvalidAlg {
            cause: Some(Box::new(cause.into())),
        }
    }

    /// True for errors that mean "this recognizer's shape didn't match",
    /// which the format-dispatch engine (C6) is allowed to recover from by
    /// trying the next attempt. `PasswordMismatch`/`PasswordRequired` are
    /// deliberately excluded: §7 says dispatch never recovers from those.
    /// `FeatureUnavailable` is excluded too: it means a recognizer's shape
    /// *did* match (a real `AlgorithmIdentifier` OID was read) but names an
    /// algorithm this build doesn't support, which a later, differently
    /// shaped recognizer has no way to fix either.
    pub(crate) fn is_shape_mismatch(&self) -> bool {
        !matches!(
            self,
            Error::PasswordMismatch | Error::PasswordRequired | Error::FeatureUnavailable
        )
    }
}

macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::error::Error::Message { message: format!($msg) })
    };
    ($fmt:literal, $($arg:tt)*) => {
        return Err($crate::error::Error::Message { message: format!($fmt, $($arg)*) })
    };
}

macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !($cond) {
            $crate::error::bail!($msg);
        }
    };
    ($cond:expr, $fmt:literal, $($arg:tt)*) => {
        if !($cond) {
            $crate::error::bail!($fmt, $($arg)*);
        }
    };
}

macro_rules! ensure_eq {
    ($lhs:expr, $rhs:expr, $msg:literal $(,)?) => {
        $crate::error::ensure!($lhs == $rhs, $msg)
    };
}

pub(crate) use bail;
pub(crate) use ensure;
pub(crate) use ensure_eq;
