//! `SubjectPublicKeyInfo` structural parser (RFC 5280 §4.1, spec §4.2).

use crate::der::Cursor;
use crate::error::{ensure_eq, Error};
use crate::key::{EcKeyMaterial, Key};
use crate::oid::{resolve_pk_algorithm, PkAlgorithm};
use crate::structures::ec::parse_ec_parameters;
use crate::structures::rsa::parse_rsa_public_key;

/// `SubjectPublicKeyInfo ::= SEQUENCE { algorithm AlgorithmIdentifier,
/// subjectPublicKey BIT STRING }`.
///
/// RSA's `AlgorithmIdentifier.parameters` must be absent or `NULL`; any
/// other value is `InvalidAlg`. EC's `parameters` must carry a recognized
/// `namedCurve`; the `subjectPublicKey` BIT STRING is the SEC1 point.
pub fn parse_subject_public_key_info(mut cursor: Cursor<'_>) -> Result<Key, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_pubkey)?;

    let (oid, params) = seq.get_alg().map_err(Error::invalid_pubkey)?;
    let algorithm = resolve_pk_algorithm(oid)?;
    let public_key_bits = seq.get_bitstring_null().map_err(Error::invalid_pubkey)?;
    ensure_eq!(seq.at_end(), true, "trailing bytes in SubjectPublicKeyInfo");

    match algorithm {
        PkAlgorithm::Rsa => {
            if let Some(params) = params {
                if params.tag != crate::der::TAG_NULL || !params.bytes.is_empty() {
                    return Err(Error::invalid_alg(Error::Message {
                        message: "RSA AlgorithmIdentifier parameters must be absent or NULL".into(),
                    }));
                }
            }
            let rsa = parse_rsa_public_key(Cursor::new(public_key_bits))?;
            Ok(Key::Rsa(rsa))
        }
        PkAlgorithm::EcKey => {
            let params = params.ok_or(Error::UnknownNamedCurve)?;
            let curve = parse_ec_parameters(params)?;
            let ec = build_ec_public_key(curve, public_key_bits)?;
            Ok(Key::Ec(ec))
        }
    }
}

fn build_ec_public_key(
    curve: crate::oid::NamedCurve,
    point: &[u8],
) -> Result<EcKeyMaterial, Error> {
    use crate::oid::NamedCurve;

    Ok(match curve {
        NamedCurve::Secp256r1 => EcKeyMaterial::P256 {
            public: p256::PublicKey::from_sec1_bytes(point)
                .map_err(|e| Error::invalid_pubkey(Error::Message { message: e.to_string() }))?,
            private: None,
        },
        NamedCurve::Secp384r1 => EcKeyMaterial::P384 {
            public: p384::PublicKey::from_sec1_bytes(point)
                .map_err(|e| Error::invalid_pubkey(Error::Message { message: e.to_string() }))?,
            private: None,
        },
        NamedCurve::Secp256k1 => EcKeyMaterial::Secp256k1 {
            public: k256::PublicKey::from_sec1_bytes(point)
                .map_err(|e| Error::invalid_pubkey(Error::Message { message: e.to_string() }))?,
            private: None,
        },
    })
}
