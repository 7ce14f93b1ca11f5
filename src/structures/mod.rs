//! ASN.1 structural parsers (component C4): each submodule owns one
//! concrete DER structure from spec §4.2, built on the raw [`crate::der`]
//! cursor and the OID tables in [`crate::oid`].

pub mod ec;
pub mod pkcs8;
pub mod rsa;
pub mod spki;
