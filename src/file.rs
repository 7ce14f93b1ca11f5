//! Thin file-loading wrapper over [`crate::dispatch`] (spec §5).

use std::fs;
use std::path::Path;

use crate::capability::Capabilities;
use crate::dispatch;
use crate::error::Error;
use crate::key::{Key, Password, SensitiveBuffer};

/// Reads `path` and parses it as a private key. The raw file contents are
/// held in a [`SensitiveBuffer`] for the duration of the parse so they're
/// wiped on return regardless of outcome.
pub fn parse_keyfile(
    path: impl AsRef<Path>,
    password: Password<'_>,
    caps: &Capabilities,
) -> Result<Key, Error> {
    let raw = SensitiveBuffer::new(fs::read(path)?);
    dispatch::parse_private_key(raw.as_slice(), password, caps)
}

/// Reads `path` and parses it as a public key. The raw file contents are
/// held in a [`SensitiveBuffer`] for the duration of the parse, same as
/// [`parse_keyfile`] — spec §4.4's wipe-on-release requirement makes no
/// exception for public-key files.
pub fn parse_public_keyfile(path: impl AsRef<Path>, caps: &Capabilities) -> Result<Key, Error> {
    let raw = SensitiveBuffer::new(fs::read(path)?);
    dispatch::parse_public_key(raw.as_slice(), caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_keyfile("/nonexistent/path/key.pem", Password::empty(), &Capabilities::all())
            .unwrap_err();
        assert!(matches!(err, Error::FileIoError { .. }));
    }

    #[test]
    fn garbage_file_is_rejected() -> std::io::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"not a key")?;
        let err = parse_keyfile(file.path(), Password::empty(), &Capabilities::all()).unwrap_err();
        assert!(!matches!(err, Error::FileIoError { .. }));
        Ok(())
    }
}
