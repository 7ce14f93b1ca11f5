//! Key-object lifecycle (component C7, spec §3/§4.4).
//!
//! The public `Key` enum is a closed sum type (Design Note §9 — "prefer a
//! closed sum type... the set of supported algorithms is fixed and known")
//! rather than the original's vtable + raw context pointer. Only
//! *populated* keys are constructible from outside the crate: every
//! `structures::*` parser returns a fully validated `Key` or an error, so
//! there is no externally-observable *bound*-but-not-*populated* state —
//! the invariant in spec §3 ("only populated key objects ever escape")
//! holds by construction, not by an explicit free-on-error call.

use log::trace;
use num_bigint::BigUint;
use rsa::traits::PublicKeyParts;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::oid::NamedCurve;

/// RSA key material (spec §3). Public keys carry only `n`, `e`; private
/// keys carry every PKCS#1 field. `len` is the byte size of the modulus.
#[derive(Clone)]
pub struct RsaKeyMaterial {
    pub public: rsa::RsaPublicKey,
    pub private: Option<rsa::RsaPrivateKey>,
}

impl RsaKeyMaterial {
    pub fn len(&self) -> usize {
        biguint_byte_len(self.public.n())
    }
}

/// EC key material (spec §3): group id, optional private scalar, public
/// point. Curve-specific key types (`p256`/`p384`/`k256`) each zeroize
/// their own scalar on drop.
#[derive(Clone)]
pub enum EcKeyMaterial {
    P256 {
        public: p256::PublicKey,
        private: Option<p256::SecretKey>,
    },
    P384 {
        public: p384::PublicKey,
        private: Option<p384::SecretKey>,
    },
    Secp256k1 {
        public: k256::PublicKey,
        private: Option<k256::SecretKey>,
    },
}

impl EcKeyMaterial {
    pub fn curve(&self) -> NamedCurve {
        match self {
            EcKeyMaterial::P256 { .. } => NamedCurve::Secp256r1,
            EcKeyMaterial::P384 { .. } => NamedCurve::Secp384r1,
            EcKeyMaterial::Secp256k1 { .. } => NamedCurve::Secp256k1,
        }
    }

    pub fn has_private(&self) -> bool {
        match self {
            EcKeyMaterial::P256 { private, .. } => private.is_some(),
            EcKeyMaterial::P384 { private, .. } => private.is_some(),
            EcKeyMaterial::Secp256k1 { private, .. } => private.is_some(),
        }
    }
}

/// A validated, in-memory key object. Only ever constructed in the
/// *populated* state (spec §3): there is no public constructor that
/// produces an uninitialized or merely-bound `Key`.
#[derive(Clone)]
pub enum Key {
    Rsa(RsaKeyMaterial),
    Ec(EcKeyMaterial),
}

impl Key {
    pub fn is_private(&self) -> bool {
        match self {
            Key::Rsa(rsa) => rsa.private.is_some(),
            Key::Ec(ec) => ec.has_private(),
        }
    }

    /// Byte size of the modulus (RSA) or base-point order (EC) — spec §3's
    /// `len` field, generalized across both key families.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Key::Rsa(rsa) => rsa.len(),
            Key::Ec(EcKeyMaterial::P256 { .. }) => 32,
            Key::Ec(EcKeyMaterial::P384 { .. }) => 48,
            Key::Ec(EcKeyMaterial::Secp256k1 { .. }) => 32,
        }
    }
}

/// A password-derived symmetric key or intermediate plaintext buffer.
/// Wipes itself on drop; used for PKCS#8 decrypted plaintext and legacy
/// PEM DEK-Info plaintext (spec §4.4, §9 — strengthened from the
/// original's manual `memset` to a type that the compiler cannot elide).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBuffer(pub Vec<u8>);

impl SensitiveBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        trace!("sensitive buffer allocated, {} bytes", data.len());
        SensitiveBuffer(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Password material (spec §3): zero length means "no password available".
#[derive(Clone)]
pub struct Password<'a>(pub &'a [u8]);

impl<'a> Password<'a> {
    pub fn empty() -> Self {
        Password(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn biguint_byte_len(n: &BigUint) -> usize {
    (n.bits() as usize + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_reports_empty() {
        assert!(Password::empty().is_empty());
        assert!(!Password(b"hunter2").is_empty());
    }
}
