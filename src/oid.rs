//! OID resolver (component C2): pure functions from OID byte strings to
//! algorithm enums. A process-wide, read-only table — no parser state.

use const_oid::ObjectIdentifier;

use crate::error::{bail, Error};

pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
pub const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
pub const SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

pub const PBES2: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.5.13");
pub const PBKDF2: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.5.12");
pub const HMAC_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.2.7");
pub const HMAC_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.2.9");

pub const DES_EDE3_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.3.7");
pub const AES128_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.2");
pub const AES192_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.22");
pub const AES256_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.42");

pub const PBE_SHA1_RC4_128: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.1");
pub const PBE_SHA1_RC4_40: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.2");
pub const PBE_SHA1_DES3_CBC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.3");
pub const PBE_SHA1_DES2_CBC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.4");
pub const PBE_SHA1_RC2_128_CBC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.5");
pub const PBE_SHA1_RC2_40_CBC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.12.1.6");

/// PK algorithm tag (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkAlgorithm {
    Rsa,
    EcKey,
}

pub fn resolve_pk_algorithm(oid: &[u8]) -> Result<PkAlgorithm, Error> {
    let oid = ObjectIdentifier::from_bytes(oid).map_err(|_| Error::UnknownPkAlg)?;
    if oid == RSA_ENCRYPTION {
        Ok(PkAlgorithm::Rsa)
    } else if oid == EC_PUBLIC_KEY {
        Ok(PkAlgorithm::EcKey)
    } else {
        Err(Error::UnknownPkAlg)
    }
}

/// Named curves this crate supports point decode/validate for. Curve OIDs
/// recognized by the wider standard but not wired to a concrete curve crate
/// fall through to `UnknownNamedCurve`, matching spec §4.2's restriction
/// to `namedCurve` (no `implicitCurve`/`specifiedCurve`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCurve {
    Secp256r1,
    Secp384r1,
    Secp256k1,
}

pub fn resolve_named_curve(oid: &[u8]) -> Result<NamedCurve, Error> {
    let oid = ObjectIdentifier::from_bytes(oid).map_err(|_| Error::UnknownNamedCurve)?;
    if oid == SECP256R1 {
        Ok(NamedCurve::Secp256r1)
    } else if oid == SECP384R1 {
        Ok(NamedCurve::Secp384r1)
    } else if oid == SECP256K1 {
        Ok(NamedCurve::Secp256k1)
    } else {
        Err(Error::UnknownNamedCurve)
    }
}

/// The encryption scheme named by `EncryptedPrivateKeyInfo`'s
/// `encryptionAlgorithm` OID (spec §4.2). Anything else resolves to
/// `FeatureUnavailable` at the dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionScheme {
    Pbes2,
    Pkcs12ShaRc4_128,
    Pkcs12ShaRc4_40,
    Pkcs12ShaDes3Cbc,
    Pkcs12ShaDes2Cbc,
    Pkcs12ShaRc2_128Cbc,
    Pkcs12ShaRc2_40Cbc,
}

pub fn resolve_encryption_scheme(oid: &[u8]) -> Result<EncryptionScheme, Error> {
    let oid = ObjectIdentifier::from_bytes(oid).map_err(|_| Error::FeatureUnavailable)?;
    Ok(if oid == PBES2 {
        EncryptionScheme::Pbes2
    } else if oid == PBE_SHA1_RC4_128 {
        EncryptionScheme::Pkcs12ShaRc4_128
    } else if oid == PBE_SHA1_RC4_40 {
        EncryptionScheme::Pkcs12ShaRc4_40
    } else if oid == PBE_SHA1_DES3_CBC {
        EncryptionScheme::Pkcs12ShaDes3Cbc
    } else if oid == PBE_SHA1_DES2_CBC {
        EncryptionScheme::Pkcs12ShaDes2Cbc
    } else if oid == PBE_SHA1_RC2_128_CBC {
        EncryptionScheme::Pkcs12ShaRc2_128Cbc
    } else if oid == PBE_SHA1_RC2_40_CBC {
        EncryptionScheme::Pkcs12ShaRc2_40Cbc
    } else {
        return Err(Error::FeatureUnavailable);
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrfAlgorithm {
    HmacSha1,
    HmacSha256,
}

/// PBES2's PBKDF2 `prf` parameter; absent defaults to HMAC-SHA1 (RFC 8018).
pub fn resolve_prf(oid: Option<&[u8]>) -> Result<PrfAlgorithm, Error> {
    let Some(oid) = oid else {
        return Ok(PrfAlgorithm::HmacSha1);
    };
    let oid = ObjectIdentifier::from_bytes(oid).map_err(|_| Error::InvalidAlg { cause: None })?;
    if oid == HMAC_SHA1 {
        Ok(PrfAlgorithm::HmacSha1)
    } else if oid == HMAC_SHA256 {
        Ok(PrfAlgorithm::HmacSha256)
    } else {
        bail!("unsupported PBKDF2 PRF OID")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
    DesEde3Cbc,
}

/// PBES2's encryption-scheme sub-OID (the cipher wrapping the derived key).
pub fn resolve_cipher(oid: &[u8]) -> Result<CipherAlgorithm, Error> {
    let oid = ObjectIdentifier::from_bytes(oid).map_err(|_| Error::InvalidAlg { cause: None })?;
    if oid == AES128_CBC {
        Ok(CipherAlgorithm::Aes128Cbc)
    } else if oid == AES192_CBC {
        Ok(CipherAlgorithm::Aes192Cbc)
    } else if oid == AES256_CBC {
        Ok(CipherAlgorithm::Aes256Cbc)
    } else if oid == DES_EDE3_CBC {
        Ok(CipherAlgorithm::DesEde3Cbc)
    } else {
        bail!("unsupported PBES2 encryption scheme OID")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsa_oid_resolves() {
        let der = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
        assert_eq!(resolve_pk_algorithm(&der).unwrap(), PkAlgorithm::Rsa);
    }

    #[test]
    fn ec_oid_resolves() {
        let der = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
        assert_eq!(resolve_pk_algorithm(&der).unwrap(), PkAlgorithm::EcKey);
    }

    #[test]
    fn unknown_oid_is_unknown_pk_alg() {
        let der = [0x2a, 0x03, 0x04];
        assert!(matches!(
            resolve_pk_algorithm(&der),
            Err(Error::UnknownPkAlg)
        ));
    }

    #[test]
    fn p256_curve_resolves() {
        let der = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
        assert_eq!(resolve_named_curve(&der).unwrap(), NamedCurve::Secp256r1);
    }

    #[test]
    fn unknown_encryption_oid_is_feature_unavailable() {
        // 1.2.840.113549.1.5.42 (not a real PBES2/PKCS12 scheme)
        let der = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x05, 0x2a];
        assert!(matches!(
            resolve_encryption_scheme(&der),
            Err(Error::FeatureUnavailable)
        ));
    }
}
