//! Password-based encryption (component C5): PBES2 (RFC 8018) and the
//! PKCS#12 legacy PBE schemes (RFC 7292 Appendix B) used to protect
//! `EncryptedPrivateKeyInfo.encryptedData`.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use digest::Digest;
use hmac::Hmac;
use log::debug;
use sha1::Sha1;
use sha2::Sha256;

use crate::der::{Asn1Element, Cursor, TAG_INTEGER, TAG_OCTET_STRING};
use crate::error::Error;
use crate::key::{Password, SensitiveBuffer};
use crate::oid::{
    resolve_cipher, resolve_encryption_scheme, resolve_prf, CipherAlgorithm, EncryptionScheme,
    PrfAlgorithm,
};

/// Dispatches on `EncryptedPrivateKeyInfo.encryptionAlgorithm` and returns
/// the decrypted plaintext (expected to be a DER `PrivateKeyInfo`).
pub fn decrypt_pkcs8(
    oid: &[u8],
    params: Option<Asn1Element<'_>>,
    encrypted: &[u8],
    password: Password<'_>,
) -> Result<SensitiveBuffer, Error> {
    let scheme = resolve_encryption_scheme(oid)?;
    debug!("decrypting EncryptedPrivateKeyInfo with scheme {scheme:?}");
    match scheme {
        EncryptionScheme::Pbes2 => decrypt_pbes2(params, encrypted, password),
        EncryptionScheme::Pkcs12ShaRc4_128 => decrypt_pkcs12_rc4(params, encrypted, password, 16),
        EncryptionScheme::Pkcs12ShaRc4_40 => decrypt_pkcs12_rc4(params, encrypted, password, 5),
        EncryptionScheme::Pkcs12ShaDes3Cbc => {
            decrypt_pkcs12_cbc::<des::TdesEde3>(params, encrypted, password, 24)
        }
        EncryptionScheme::Pkcs12ShaDes2Cbc => decrypt_pkcs12_des2(params, encrypted, password),
        EncryptionScheme::Pkcs12ShaRc2_128Cbc => {
            decrypt_pkcs12_cbc::<rc2::Rc2>(params, encrypted, password, 16)
        }
        EncryptionScheme::Pkcs12ShaRc2_40Cbc => {
            decrypt_pkcs12_cbc::<rc2::Rc2>(params, encrypted, password, 5)
        }
    }
}

fn require_params<'a>(params: Option<Asn1Element<'a>>) -> Result<Asn1Element<'a>, Error> {
    params.ok_or_else(|| {
        Error::invalid_alg(Error::Message {
            message: "encryptionAlgorithm is missing its parameters".into(),
        })
    })
}

fn decrypt_pbes2(
    params: Option<Asn1Element<'_>>,
    encrypted: &[u8],
    password: Password<'_>,
) -> Result<SensitiveBuffer, Error> {
    let params = require_params(params)?;
    let mut top = Cursor::new(params.bytes);

    let (kdf_oid, kdf_params) = top.get_alg().map_err(Error::invalid_alg)?;
    let kdf_oid = const_oid::ObjectIdentifier::from_bytes(kdf_oid)
        .map_err(|_| Error::invalid_alg(Error::Message { message: "malformed keyDerivationFunc OID".into() }))?;
    if kdf_oid != crate::oid::PBKDF2 {
        return Err(Error::FeatureUnavailable);
    }
    let kdf_params = require_params(kdf_params)?;
    let mut kdf_cursor = Cursor::new(kdf_params.bytes);

    let salt = kdf_cursor.get_octet_string().map_err(Error::invalid_alg)?;
    let iterations = kdf_cursor.get_int().map_err(Error::invalid_alg)? as u32;

    let mut key_length: Option<usize> = None;
    if kdf_cursor.peek_tag() == Some(TAG_INTEGER) {
        key_length = Some(kdf_cursor.get_int().map_err(Error::invalid_alg)? as usize);
    }

    let prf = if !kdf_cursor.at_end() {
        let (prf_oid, _) = kdf_cursor.get_alg().map_err(Error::invalid_alg)?;
        resolve_prf(Some(prf_oid))?
    } else {
        resolve_prf(None)?
    };
    if !kdf_cursor.at_end() {
        return Err(Error::invalid_alg(Error::Message {
            message: "trailing bytes in PBKDF2-params".into(),
        }));
    }

    let (enc_oid, enc_params) = top.get_alg().map_err(Error::invalid_alg)?;
    if !top.at_end() {
        return Err(Error::invalid_alg(Error::Message {
            message: "trailing bytes in PBES2-params".into(),
        }));
    }
    let cipher = resolve_cipher(enc_oid)?;
    let iv_element = require_params(enc_params)?;
    if iv_element.tag != TAG_OCTET_STRING {
        return Err(Error::invalid_alg(Error::Message {
            message: "PBES2 encryptionScheme parameters must be an IV OCTET STRING".into(),
        }));
    }
    let iv = iv_element.bytes;

    debug!("PBES2: prf={prf:?} cipher={cipher:?} iterations={iterations}");
    let key_len = key_length.unwrap_or_else(|| cipher_key_len(cipher));
    let mut key = vec![0u8; key_len];
    match prf {
        PrfAlgorithm::HmacSha1 => pbkdf2::pbkdf2::<Hmac<Sha1>>(password.0, salt, iterations, &mut key),
        PrfAlgorithm::HmacSha256 => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(password.0, salt, iterations, &mut key)
        }
    }

    match cipher {
        CipherAlgorithm::Aes128Cbc => cbc_decrypt::<aes::Aes128>(&key, iv, encrypted),
        CipherAlgorithm::Aes192Cbc => cbc_decrypt::<aes::Aes192>(&key, iv, encrypted),
        CipherAlgorithm::Aes256Cbc => cbc_decrypt::<aes::Aes256>(&key, iv, encrypted),
        CipherAlgorithm::DesEde3Cbc => cbc_decrypt::<des::TdesEde3>(&key, iv, encrypted),
    }
}

fn cipher_key_len(cipher: CipherAlgorithm) -> usize {
    match cipher {
        CipherAlgorithm::Aes128Cbc => 16,
        CipherAlgorithm::Aes192Cbc => 24,
        CipherAlgorithm::Aes256Cbc => 32,
        CipherAlgorithm::DesEde3Cbc => 24,
    }
}

pub(crate) fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<SensitiveBuffer, Error>
where
    C: cipher::BlockCipher + cipher::BlockDecryptMut + cipher::KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| Error::invalid_format(Error::Message { message: e.to_string() }))?;
    let mut buf = ciphertext.to_vec();
    let pt_len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map_err(|_| {
            debug!("CBC unpadding failed, treating as wrong password");
            Error::PasswordMismatch
        })?
        .len();
    buf.truncate(pt_len);
    Ok(SensitiveBuffer::new(buf))
}

/// `PBEParameter ::= SEQUENCE { salt OCTET STRING, iterations INTEGER }`
/// (RFC 7292 §B.3 / PKCS#12 legacy schemes).
fn parse_pkcs12_pbe_params(params: Option<Asn1Element<'_>>) -> Result<(&[u8], u32), Error> {
    let params = require_params(params)?;
    let mut cursor = Cursor::new(params.bytes);
    let salt = cursor.get_octet_string().map_err(Error::invalid_alg)?;
    let iterations = cursor.get_int().map_err(Error::invalid_alg)? as u32;
    if !cursor.at_end() {
        return Err(Error::invalid_alg(Error::Message {
            message: "trailing bytes in PBEParameter".into(),
        }));
    }
    Ok((salt, iterations))
}

fn decrypt_pkcs12_cbc<C>(
    params: Option<Asn1Element<'_>>,
    encrypted: &[u8],
    password: Password<'_>,
    key_len: usize,
) -> Result<SensitiveBuffer, Error>
where
    C: cipher::BlockCipher + cipher::BlockDecryptMut + cipher::KeyInit,
{
    let (salt, iterations) = parse_pkcs12_pbe_params(params)?;
    debug!("PKCS#12 PBE (CBC): iterations={iterations} key_len={key_len}");
    let key = pkcs12_kdf(password.0, salt, iterations, 1, key_len);
    let iv = pkcs12_kdf(password.0, salt, iterations, 2, 8);
    cbc_decrypt::<C>(&key, &iv, encrypted)
}

/// 2-key triple DES (`pbeWithSHAAnd2-KeyTripleDES-CBC`): the 16-byte
/// derived key material is expanded to K1||K2||K1 for 3DES, per the scheme's
/// standard definition.
fn decrypt_pkcs12_des2(
    params: Option<Asn1Element<'_>>,
    encrypted: &[u8],
    password: Password<'_>,
) -> Result<SensitiveBuffer, Error> {
    let (salt, iterations) = parse_pkcs12_pbe_params(params)?;
    debug!("PKCS#12 PBE (2-key 3DES): iterations={iterations}");
    let k = pkcs12_kdf(password.0, salt, iterations, 1, 16);
    let mut key = Vec::with_capacity(24);
    key.extend_from_slice(&k[0..8]);
    key.extend_from_slice(&k[8..16]);
    key.extend_from_slice(&k[0..8]);
    let iv = pkcs12_kdf(password.0, salt, iterations, 2, 8);
    cbc_decrypt::<des::TdesEde3>(&key, &iv, encrypted)
}

/// RC4 is an unauthenticated stream cipher: a wrong password produces
/// plaintext of the right length but garbage content. The decoded
/// `PrivateKeyInfo` always starts with a DER `SEQUENCE` tag, so a leading
/// byte other than `0x30` is treated as `PasswordMismatch` (spec §9).
fn decrypt_pkcs12_rc4(
    params: Option<Asn1Element<'_>>,
    encrypted: &[u8],
    password: Password<'_>,
    key_len: usize,
) -> Result<SensitiveBuffer, Error> {
    use rc4::StreamCipher;

    let (salt, iterations) = parse_pkcs12_pbe_params(params)?;
    debug!("PKCS#12 PBE (RC4): iterations={iterations} key_len={key_len}");
    let key = pkcs12_kdf(password.0, salt, iterations, 1, key_len);
    let mut buf = encrypted.to_vec();
    let mut rc4 = rc4::Rc4::new(&key);
    rc4.apply_keystream(&mut buf);
    if buf.first().copied() != Some(crate::der::TAG_SEQUENCE) {
        debug!("RC4 plaintext doesn't start with a SEQUENCE tag, treating as wrong password");
        return Err(Error::PasswordMismatch);
    }
    Ok(SensitiveBuffer::new(buf))
}

/// PKCS#12 Appendix B key-stretching KDF: `id` selects the purpose (1 = key
/// material, 2 = IV, 3 = MAC key — only 1 and 2 are used here).
fn pkcs12_kdf(password: &[u8], salt: &[u8], iterations: u32, id: u8, output_len: usize) -> Vec<u8> {
    const V: usize = 64; // SHA-1 input block size
    const U: usize = 20; // SHA-1 output size

    let diversifier = vec![id; V];

    let salt_block = fill_to_multiple(salt, V);
    let password_block = fill_to_multiple(&bmp_string(password), V);

    let mut i_block = salt_block;
    i_block.extend(password_block);

    let mut output = Vec::with_capacity(output_len + U);
    while output.len() < output_len {
        let mut hasher = Sha1::new();
        hasher.update(&diversifier);
        hasher.update(&i_block);
        let mut a = hasher.finalize().to_vec();
        for _ in 1..iterations {
            let mut hasher = Sha1::new();
            hasher.update(&a);
            a = hasher.finalize().to_vec();
        }
        output.extend_from_slice(&a);

        // I_j = (I_j + B + 1) mod 2^(8*V), B = A repeated to length V
        let b = a.iter().cycle().take(V).copied().collect::<Vec<u8>>();
        let blocks = i_block.len() / V;
        for block_idx in 0..blocks {
            let block = &mut i_block[block_idx * V..(block_idx + 1) * V];
            add_with_carry(block, &b);
        }
    }
    output.truncate(output_len);
    output
}

fn fill_to_multiple(data: &[u8], block_len: usize) -> Vec<u8> {
    if data.is_empty() {
        return vec![0u8; block_len];
    }
    let total = block_len * data.len().div_ceil(block_len);
    data.iter().cycle().take(total).copied().collect()
}

/// `BMPString` encoding of the password (UTF-16BE, NUL-terminated) used as
/// the `P` input to the PKCS#12 KDF.
fn bmp_string(password: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(password);
    let mut out = Vec::with_capacity(text.len() * 2 + 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out.extend_from_slice(&[0, 0]);
    out
}

fn add_with_carry(block: &mut [u8], addend: &[u8]) {
    let mut carry: u16 = 1;
    for i in (0..block.len()).rev() {
        let sum = block[i] as u16 + addend[i] as u16 + carry;
        block[i] = (sum & 0xff) as u8;
        carry = sum >> 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkcs12_kdf_produces_requested_length() {
        let key = pkcs12_kdf(b"changeit", b"saltsalt", 1000, 1, 24);
        assert_eq!(key.len(), 24);
        let iv = pkcs12_kdf(b"changeit", b"saltsalt", 1000, 2, 8);
        assert_eq!(iv.len(), 8);
        // deterministic: same inputs, same outputs
        let key2 = pkcs12_kdf(b"changeit", b"saltsalt", 1000, 1, 24);
        assert_eq!(key, key2);
    }

    #[test]
    fn bmp_string_is_utf16be_with_trailing_null() {
        let out = bmp_string(b"ab");
        assert_eq!(out, vec![0x00, 0x61, 0x00, 0x62, 0x00, 0x00]);
    }

    #[test]
    fn rc4_wrong_password_is_detected_by_leading_byte() {
        let encrypted = vec![0xAA, 0xBB, 0xCC];
        let err = decrypt_pkcs12_rc4(
            Some(Asn1Element {
                tag: crate::der::TAG_SEQUENCE,
                bytes: &build_pbe_params(b"salt", 1),
            }),
            &encrypted,
            Password(b"wrong"),
            16,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PasswordMismatch));
    }

    fn build_pbe_params(salt: &[u8], iterations: i32) -> Vec<u8> {
        let mut content = Vec::new();
        content.push(TAG_OCTET_STRING);
        content.push(salt.len() as u8);
        content.extend(salt);
        content.push(TAG_INTEGER);
        content.push(1);
        content.push(iterations as u8);
        content
    }
}
