//! PKCS#1 `RSAPublicKey` / `RSAPrivateKey` structural parsers (spec §4.2).

use num_bigint::BigUint;

use crate::der::Cursor;
use crate::error::{bail, ensure_eq, Error};
use crate::key::RsaKeyMaterial;

/// `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
///
/// Populates `n, e`; requires `rsa_check_pubkey` (delegated to the `rsa`
/// crate's constructor) to hold before returning.
pub fn parse_rsa_public_key(mut cursor: Cursor<'_>) -> Result<RsaKeyMaterial, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_pubkey)?;
    let n = seq.get_mpi().map_err(Error::invalid_pubkey)?;
    let e = seq.get_mpi().map_err(Error::invalid_pubkey)?;
    if !seq.at_end() {
        return Err(Error::invalid_pubkey(Error::Message {
            message: "trailing bytes in RSAPublicKey".into(),
        }));
    }

    let public = rsa::RsaPublicKey::new(n, e)
        .map_err(|e| Error::invalid_pubkey(Error::Message { message: e.to_string() }))?;

    Ok(RsaKeyMaterial { public, private: None })
}

/// `RSAPrivateKey ::= SEQUENCE { version, n, e, d, p, q, dp, dq, qp,
/// otherPrimeInfos OPTIONAL }`. `version` must be `0`; a present
/// `otherPrimeInfos` (signaled by trailing bytes) is `LengthMismatch`
/// (multi-prime RSA is an explicit Non-goal).
pub fn parse_rsa_private_key(mut cursor: Cursor<'_>) -> Result<RsaKeyMaterial, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_format)?;

    let version = seq.get_int().map_err(Error::invalid_format)?;
    if version != 0 {
        return Err(Error::InvalidVersion);
    }

    let n = seq.get_mpi().map_err(Error::invalid_format)?;
    let e = seq.get_mpi().map_err(Error::invalid_format)?;
    let d = seq.get_mpi().map_err(Error::invalid_format)?;
    let p = seq.get_mpi().map_err(Error::invalid_format)?;
    let q = seq.get_mpi().map_err(Error::invalid_format)?;
    let _dp: BigUint = seq.get_mpi().map_err(Error::invalid_format)?;
    let _dq: BigUint = seq.get_mpi().map_err(Error::invalid_format)?;
    let _qp: BigUint = seq.get_mpi().map_err(Error::invalid_format)?;

    // otherPrimeInfos is unsupported (Non-goal): any remaining bytes here
    // can only be that field, so treat it as the structural violation it
    // is rather than silently accepting multi-prime keys.
    ensure_eq!(seq.at_end(), true, "otherPrimeInfos is not supported");

    let private = rsa::RsaPrivateKey::from_components(n.clone(), e.clone(), d, vec![p, q])
        .map_err(|err| Error::invalid_format(Error::Message { message: err.to_string() }))?;
    private
        .validate()
        .map_err(|err| Error::invalid_format(Error::Message { message: err.to_string() }))?;

    let public = rsa::RsaPublicKey::new(n, e)
        .map_err(|err| Error::invalid_format(Error::Message { message: err.to_string() }))?;

    Ok(RsaKeyMaterial {
        public,
        private: Some(private),
    })
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

    fn der_int(n: &BigUint) -> Vec<u8> {
        let mut bytes = n.to_bytes_be();
        if bytes.is_empty() {
            bytes = vec![0];
        }
        if bytes[0] & 0x80 != 0 {
            bytes.insert(0, 0);
        }
        let mut out = vec![0x02u8];
        out.extend(der_len(bytes.len()));
        out.extend(bytes);
        out
    }

    fn der_seq(parts: &[Vec<u8>]) -> Vec<u8> {
        let content: Vec<u8> = parts.concat();
        let mut out = vec![0x30u8];
        out.extend(der_len(content.len()));
        out.extend(content);
        out
    }

    #[test]
    fn rejects_trailing_bytes_as_invalid_pubkey() {
        let n = BigUint::from(0xC9u32);
        let e = BigUint::from(0x10001u32);
        let mut content = Vec::new();
        content.extend(der_int(&n));
        content.extend(der_int(&e));
        content.push(0xFF); // stray trailing byte inside the SEQUENCE
        let mut outer = vec![0x30u8];
        outer.extend(der_len(content.len()));
        outer.extend(content);

        let cursor = Cursor::new(&outer);
        let err = parse_rsa_public_key(cursor).unwrap_err();
        assert!(matches!(err, Error::InvalidPubkey { .. }));
    }

    #[test]
    fn version_other_than_zero_is_invalid_version() {
        let one = BigUint::from(1u32);
        let seq = der_seq(&[
            der_int(&BigUint::from(1u32)), // version = 1 (invalid)
            der_int(&one),
            der_int(&one),
            der_int(&one),
            der_int(&one),
            der_int(&one),
            der_int(&one),
            der_int(&one),
            der_int(&one),
        ]);
        let cursor = Cursor::new(&seq);
        assert!(matches!(
            parse_rsa_private_key(cursor).unwrap_err(),
            Error::InvalidVersion
        ));
    }
}
