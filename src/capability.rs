//! Capability set (spec §9 "conditional compilation → capability
//! detection"). The original C implementation guards RSA/EC/PEM/PKCS#5/
//! PKCS#12 support behind preprocessor flags; this crate models the same
//! idea as a plain runtime value instead, so a caller can disable a family
//! without a recompile.

/// Which key families and encryption schemes a parser instance will
/// attempt. All `true` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub rsa: bool,
    pub ec: bool,
    pub pem: bool,
    pub pkcs5: bool,
    pub pkcs12: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::all()
    }
}

impl Capabilities {
    pub const fn all() -> Self {
        Capabilities {
            rsa: true,
            ec: true,
            pem: true,
            pkcs5: true,
            pkcs12: true,
        }
    }

    pub const fn none() -> Self {
        Capabilities {
            rsa: false,
            ec: false,
            pem: false,
            pkcs5: false,
            pkcs12: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let caps = Capabilities::default();
        assert!(caps.rsa && caps.ec && caps.pem && caps.pkcs5 && caps.pkcs12);
    }
}
