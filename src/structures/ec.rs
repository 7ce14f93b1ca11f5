//! `ECParameters` / SEC1 `ECPrivateKey` structural parsers (spec §4.2).

use crate::der::{Asn1Element, Cursor, TAG_OID};
use crate::error::{bail, ensure_eq, Error};
use crate::key::EcKeyMaterial;
use crate::oid::{resolve_named_curve, NamedCurve};

const TAG_PARAMETERS: u8 = 0xA0; // [0] EXPLICIT, constructed
const TAG_PUBLIC_KEY: u8 = 0xA1; // [1] EXPLICIT, constructed

/// `ECParameters ::= CHOICE { namedCurve OBJECT IDENTIFIER, ... }`. Only
/// `namedCurve` is supported; `implicitCurve`/`specifiedCurve` are a
/// Non-goal and resolve to `UnknownNamedCurve`.
pub fn parse_ec_parameters(element: Asn1Element<'_>) -> Result<NamedCurve, Error> {
    if element.tag != TAG_OID {
        return Err(Error::UnknownNamedCurve);
    }
    resolve_named_curve(element.bytes)
}

/// `ECPrivateKey ::= SEQUENCE { version(1), privateKey OCTET STRING,
/// [0] parameters OPTIONAL, [1] publicKey OPTIONAL }` (SEC1 / RFC 5915).
///
/// `outer_curve` carries a curve already resolved from an enclosing
/// PKCS#8 `AlgorithmIdentifier`; when present it takes precedence the way
/// spec §4.2 describes ("if the target group is already initialized with
/// a different curve ID, fail `InvalidFormat`").
pub fn parse_ec_private_key(
    mut cursor: Cursor<'_>,
    outer_curve: Option<NamedCurve>,
) -> Result<EcKeyMaterial, Error> {
    let mut seq = cursor
        .get_tag(crate::der::TAG_SEQUENCE)
        .map_err(Error::invalid_format)?;

    let version = seq.get_int().map_err(Error::invalid_format)?;
    if version != 1 {
        return Err(Error::InvalidVersion);
    }

    let d_bytes = seq.get_octet_string().map_err(Error::invalid_format)?;

    let mut curve = outer_curve;
    if seq.peek_tag() == Some(TAG_PARAMETERS) {
        let mut params_cursor = seq.get_tag(TAG_PARAMETERS).map_err(Error::invalid_format)?;
        let element = params_cursor.get_any().map_err(Error::invalid_format)?;
        ensure_eq!(params_cursor.at_end(), true, "trailing bytes in [0] parameters");
        let parsed_curve = parse_ec_parameters(element)?;
        match curve {
            Some(existing) if existing != parsed_curve => {
                return Err(Error::InvalidFormat { cause: None });
            }
            _ => curve = Some(parsed_curve),
        }
    }
    let Some(curve) = curve else {
        bail!("ECPrivateKey has no curve: absent [0] parameters and no outer AlgorithmIdentifier");
    };

    let public_point: Option<&[u8]> = if seq.peek_tag() == Some(TAG_PUBLIC_KEY) {
        let mut pk_cursor = seq.get_tag(TAG_PUBLIC_KEY).map_err(Error::invalid_format)?;
        let point = pk_cursor.get_bitstring_null().map_err(Error::invalid_format)?;
        ensure_eq!(pk_cursor.at_end(), true, "trailing bytes in [1] publicKey");
        Some(point)
    } else {
        None
    };

    ensure_eq!(seq.at_end(), true, "trailing bytes in ECPrivateKey");

    build_ec_key_material(curve, d_bytes, public_point)
}

fn build_ec_key_material(
    curve: NamedCurve,
    d_bytes: &[u8],
    public_point: Option<&[u8]>,
) -> Result<EcKeyMaterial, Error> {
    macro_rules! curve_arm {
        ($module:ident, $variant:ident) => {{
            let secret = $module::SecretKey::from_slice(d_bytes)
                .map_err(|e| Error::invalid_format(Error::Message { message: e.to_string() }))?;
            let public = match public_point {
                Some(bytes) => $module::PublicKey::from_sec1_bytes(bytes)
                    .map_err(|e| Error::invalid_pubkey(Error::Message { message: e.to_string() }))?,
                None => secret.public_key(),
            };
            EcKeyMaterial::$variant {
                public,
                private: Some(secret),
            }
        }};
    }

    Ok(match curve {
        NamedCurve::Secp256r1 => curve_arm!(p256, P256),
        NamedCurve::Secp384r1 => curve_arm!(p384, P384),
        NamedCurve::Secp256k1 => curve_arm!(k256, Secp256k1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_two_is_invalid_version() {
        // SEQUENCE { INTEGER 2, OCTET STRING (32 zero bytes) }
        let mut content = vec![0x02, 0x01, 0x02, 0x04, 0x20];
        content.extend([0u8; 32]);
        let mut buf = vec![0x30u8, content.len() as u8];
        buf.extend(content);

        let cursor = Cursor::new(&buf);
        assert!(matches!(
            parse_ec_private_key(cursor, None).unwrap_err(),
            Error::InvalidVersion
        ));
    }

    #[test]
    fn missing_curve_is_rejected() {
        let mut content = vec![0x02, 0x01, 0x01, 0x04, 0x20];
        content.extend([1u8; 32]);
        let mut buf = vec![0x30u8, content.len() as u8];
        buf.extend(content);

        let cursor = Cursor::new(&buf);
        assert!(parse_ec_private_key(cursor, None).is_err());
    }
}
