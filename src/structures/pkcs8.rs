//! PKCS#8 `PrivateKeyInfo` / `EncryptedPrivateKeyInfo` (RFC 5208, spec §4.2).

use crate::der::Cursor;
use crate::error::Error;
use crate::key::{Key, Password};
use crate::oid::{resolve_pk_algorithm, PkAlgorithm};
use crate::pbe;
use crate::structures::ec::{parse_ec_parameters, parse_ec_private_key};
use crate::structures::rsa::parse_rsa_private_key;

const TAG_ATTRIBUTES: u8 = 0xA0;

/// `PrivateKeyInfo ::= SEQUENCE { version INTEGER (0), privateKeyAlgorithm
/// AlgorithmIdentifier, privateKey OCTET STRING, attributes [0] OPTIONAL }`.
///
/// For EC keys the outer `privateKeyAlgorithm.parameters` (a `namedCurve`)
/// is resolved and applied *before* the inner SEC1 `ECPrivateKey` is parsed,
/// per spec §4.2.
pub fn parse_private_key_info(mut cursor: Cursor<'_>) -> Result<Key, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_format)?;

    let version = seq.get_int().map_err(Error::invalid_format)?;
    if version != 0 {
        return Err(Error::InvalidVersion);
    }

    let (oid, params) = seq.get_alg().map_err(Error::invalid_alg)?;
    let algorithm = resolve_pk_algorithm(oid)?;
    let private_key = seq.get_octet_string().map_err(Error::invalid_format)?;

    // attributes [0] IMPLICIT SET OF Attribute OPTIONAL — not used by this
    // crate's public surface, but must be consumed so trailing-bytes
    // detection below stays meaningful.
    if seq.peek_tag() == Some(TAG_ATTRIBUTES) {
        seq.get_tag(TAG_ATTRIBUTES).map_err(Error::invalid_format)?;
    }
    if !seq.at_end() {
        return Err(Error::invalid_format(Error::Message {
            message: "trailing bytes in PrivateKeyInfo".into(),
        }));
    }

    match algorithm {
        PkAlgorithm::Rsa => {
            let key = parse_rsa_private_key(Cursor::new(private_key))?;
            Ok(Key::Rsa(key))
        }
        PkAlgorithm::EcKey => {
            let outer_curve = match params {
                Some(element) => Some(parse_ec_parameters(element)?),
                None => None,
            };
            let key = parse_ec_private_key(Cursor::new(private_key), outer_curve)?;
            Ok(Key::Ec(key))
        }
    }
}

/// `EncryptedPrivateKeyInfo ::= SEQUENCE { encryptionAlgorithm
/// AlgorithmIdentifier, encryptedData OCTET STRING }`. Decrypts then parses
/// the plaintext as `PrivateKeyInfo`.
pub fn parse_encrypted_private_key_info(
    mut cursor: Cursor<'_>,
    password: Password<'_>,
) -> Result<Key, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_format)?;

    let (oid, params) = seq.get_alg().map_err(Error::invalid_alg)?;
    let encrypted_data = seq.get_octet_string().map_err(Error::invalid_format)?;
    if !seq.at_end() {
        return Err(Error::invalid_format(Error::Message {
            message: "trailing bytes in EncryptedPrivateKeyInfo".into(),
        }));
    }

    if password.is_empty() {
        return Err(Error::PasswordRequired);
    }

    let plaintext = pbe::decrypt_pkcs8(oid, params, encrypted_data, password)?;
    parse_private_key_info(Cursor::new(plaintext.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der_len(n: usize) -> Vec<u8> {
        if n < 0x80 {
            vec![n as u8]
        } else {
            let bytes = n.to_be_bytes();
            let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
            let trimmed = &bytes[start..];
            let mut out = vec![0x80 | trimmed.len() as u8];
            out.extend_from_slice(trimmed);
            out
        }
    }

    #[test]
    fn unknown_algorithm_oid_is_unknown_pk_alg() {
        // SEQUENCE { INTEGER 0, SEQUENCE { OID 1.2.3.4 }, OCTET STRING empty }
        let oid = [0x06, 0x03, 0x2a, 0x03, 0x04];
        let mut alg = vec![crate::der::TAG_SEQUENCE];
        alg.extend(der_len(oid.len()));
        alg.extend(oid);

        let mut content = Vec::new();
        content.extend([0x02, 0x01, 0x00]); // version 0
        content.extend(alg);
        content.extend([0x04, 0x00]); // empty OCTET STRING
        let mut buf = vec![crate::der::TAG_SEQUENCE];
        buf.extend(der_len(content.len()));
        buf.extend(content);

        let cursor = Cursor::new(&buf);
        assert!(matches!(
            parse_private_key_info(cursor).unwrap_err(),
            Error::UnknownPkAlg
        ));
    }

    #[test]
    fn empty_password_on_encrypted_key_is_password_required() {
        // SEQUENCE { SEQUENCE { OID PBES2 }, OCTET STRING "x" }
        let oid = [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x05, 0x0d];
        let mut alg = vec![crate::der::TAG_SEQUENCE];
        alg.extend(der_len(oid.len()));
        alg.extend(oid);

        let mut content = Vec::new();
        content.extend(alg);
        content.extend([0x04, 0x01, 0xAB]);
        let mut buf = vec![crate::der::TAG_SEQUENCE];
        buf.extend(der_len(content.len()));
        buf.extend(content);

        let cursor = Cursor::new(&buf);
        assert!(matches!(
            parse_encrypted_private_key_info(cursor, Password::empty()).unwrap_err(),
            Error::PasswordRequired
        ));
    }
}
