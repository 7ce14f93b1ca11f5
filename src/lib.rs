//! Parses RSA and EC public/private key material out of PEM or DER input:
//! PKCS#1 (`RSAPublicKey`/`RSAPrivateKey`), SEC1 (`ECPrivateKey`),
//! `SubjectPublicKeyInfo` (RFC 5280), and PKCS#8 (`PrivateKeyInfo` /
//! `EncryptedPrivateKeyInfo`, including legacy PKCS#12 PBE and the
//! `Proc-Type`/`DEK-Info` OpenSSL PEM convention).
//!
//! The entry points are [`parse_private_key`]/[`parse_public_key`] for
//! in-memory buffers and [`parse_keyfile`]/[`parse_public_keyfile`] for
//! files. [`parse_subpubkey`] is exposed separately for callers (e.g. an
//! X.509 certificate parser) that already hold a bare `SubjectPublicKeyInfo`
//! DER blob and don't need the PEM/PKCS#1-fallback dance the other entry
//! points do.
//!
//! Every parser call takes a [`Capabilities`] value; disabling a family
//! (`rsa`, `ec`, `pem`, `pkcs5`, `pkcs12`) makes the parser behave as if
//! that support were never compiled in, without an actual recompile.

mod capability;
mod der;
mod dispatch;
mod error;
mod file;
mod key;
mod oid;
mod pbe;
mod pem;
mod structures;

pub use capability::Capabilities;
pub use error::{Error, Result};
pub use key::{EcKeyMaterial, Key, Password, RsaKeyMaterial, SensitiveBuffer};
pub use oid::NamedCurve;

/// Parses a private key from an in-memory PEM or DER buffer.
pub fn parse_private_key(
    input: &[u8],
    password: Password<'_>,
    caps: &Capabilities,
) -> Result<Key> {
    dispatch::parse_private_key(input, password, caps)
}

/// Parses a public key from an in-memory PEM or DER buffer.
pub fn parse_public_key(input: &[u8], caps: &Capabilities) -> Result<Key> {
    dispatch::parse_public_key(input, caps)
}

/// Parses a bare `SubjectPublicKeyInfo` DER structure.
pub fn parse_subpubkey(input: &[u8], caps: &Capabilities) -> Result<Key> {
    dispatch::parse_subpubkey(input, caps)
}

/// Reads `path` and parses it as a private key.
pub fn parse_keyfile(
    path: impl AsRef<std::path::Path>,
    password: Password<'_>,
    caps: &Capabilities,
) -> Result<Key> {
    file::parse_keyfile(path, password, caps)
}

/// Reads `path` and parses it as a public key.
pub fn parse_public_keyfile(path: impl AsRef<std::path::Path>, caps: &Capabilities) -> Result<Key> {
    file::parse_public_keyfile(path, caps)
}
