//! Bounded ASN.1/DER reader (component C1).
//!
//! A [`Cursor`] never allocates: every typed read returns a slice that
//! borrows from the input buffer, or fails with [`Asn1Error`] rather than
//! reading past its `end`. This is the crate's own core logic — spec.md is
//! explicit that this is hand-rolled, not delegated to a general ASN.1
//! crate (see DESIGN.md).

use num_bigint::BigUint;

use crate::error::Asn1Error;

pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_CONSTRUCTED: u8 = 0x20;
pub const TAG_CONTEXT_SPECIFIC: u8 = 0x80;

/// A view onto a sub-slice of the input, not owning its bytes (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asn1Element<'a> {
    pub tag: u8,
    pub bytes: &'a [u8],
}

/// A bounded read cursor: `position` never crosses `end`.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    position: usize,
    end: usize,
}

type Asn1Result<T> = Result<T, Asn1Error>;

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor {
            buf,
            position: 0,
            end: buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.end
    }

    pub fn remaining(&self) -> usize {
        self.end - self.position
    }

    /// True once every byte in `[position, end)` has been consumed —
    /// structural parsers (C4) must leave no trailing bytes (`LengthMismatch`).
    pub fn at_end(&self) -> bool {
        self.position == self.end
    }

    fn peek_byte(&self) -> Asn1Result<u8> {
        self.buf
            .get(self.position)
            .copied()
            .ok_or(Asn1Error::OutOfData)
    }

    fn take(&mut self, n: usize) -> Asn1Result<&'a [u8]> {
        if self.position + n > self.end {
            return Err(Asn1Error::OutOfData);
        }
        let s = &self.buf[self.position..self.position + n];
        self.position += n;
        Ok(s)
    }

    /// Reads a DER length: short-form (`<0x80`) or long-form (explicit byte
    /// count, no indefinite-length). Minimal-encoding is not enforced here
    /// (spec §4.1).
    fn get_length(&mut self) -> Asn1Result<usize> {
        let first = self.take(1)?[0];
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let n_bytes = (first & 0x7f) as usize;
        if n_bytes == 0 || n_bytes > std::mem::size_of::<usize>() {
            return Err(Asn1Error::InvalidLength);
        }
        let bytes = self.take(n_bytes)?;
        let mut len: usize = 0;
        for &b in bytes {
            len = len
                .checked_shl(8)
                .and_then(|v| v.checked_add(b as usize))
                .ok_or(Asn1Error::InvalidLength)?;
        }
        Ok(len)
    }

    /// Verifies the next byte equals `expected`, decodes the length, and
    /// returns a sub-cursor over exactly that many content bytes.
    pub fn get_tag(&mut self, expected: u8) -> Asn1Result<Cursor<'a>> {
        let tag = self.peek_byte()?;
        if tag != expected {
            return Err(Asn1Error::UnexpectedTag);
        }
        self.position += 1;
        let len = self.get_length()?;
        let bytes = self.take(len)?;
        Ok(Cursor {
            buf: bytes,
            position: 0,
            end: bytes.len(),
        })
    }

    /// Like [`Cursor::get_tag`] but does not consume on tag mismatch,
    /// letting callers treat an absent OPTIONAL element as "not present".
    pub fn peek_tag(&self) -> Option<u8> {
        self.buf.get(self.position).copied()
    }

    /// Reads any single TLV element without requiring a specific tag.
    pub fn get_any(&mut self) -> Asn1Result<Asn1Element<'a>> {
        let tag = self.take(1)?[0];
        let len = self.get_length()?;
        let bytes = self.take(len)?;
        Ok(Asn1Element { tag, bytes })
    }

    /// A small non-negative INTEGER (fits in `i32`); rejects negative
    /// values and over-long encodings.
    pub fn get_int(&mut self) -> Asn1Result<i32> {
        let mut c = self.get_tag(TAG_INTEGER)?;
        let bytes = c.take(c.remaining())?;
        if bytes.is_empty() {
            return Err(Asn1Error::InvalidData);
        }
        if bytes[0] & 0x80 != 0 {
            // negative: not a valid version/length field value here
            return Err(Asn1Error::InvalidData);
        }
        if bytes.len() > std::mem::size_of::<i32>() + 1 {
            return Err(Asn1Error::InvalidData);
        }
        let mut v: i64 = 0;
        for &b in bytes {
            v = (v << 8) | (b as i64);
        }
        i32::try_from(v).map_err(|_| Asn1Error::InvalidData)
    }

    /// Parses INTEGER content into an arbitrary-precision unsigned integer
    /// (the external MPI substrate, `num-bigint-dig`).
    pub fn get_mpi(&mut self) -> Asn1Result<BigUint> {
        let mut c = self.get_tag(TAG_INTEGER)?;
        let bytes = c.take(c.remaining())?;
        if bytes.is_empty() {
            return Err(Asn1Error::InvalidData);
        }
        if bytes[0] & 0x80 != 0 {
            // RSA MPI fields are always non-negative in this spec's scope
            return Err(Asn1Error::InvalidData);
        }
        // strip the minimal leading zero pad DER requires when the
        // high bit of the first significant byte is set
        let trimmed = {
            let mut i = 0;
            while i + 1 < bytes.len() && bytes[i] == 0 {
                i += 1;
            }
            &bytes[i..]
        };
        Ok(BigUint::from_bytes_be(trimmed))
    }

    pub fn get_octet_string(&mut self) -> Asn1Result<&'a [u8]> {
        let mut c = self.get_tag(TAG_OCTET_STRING)?;
        c.take(c.remaining())
    }

    /// A BIT STRING whose leading "unused bits" byte must be zero.
    pub fn get_bitstring_null(&mut self) -> Asn1Result<&'a [u8]> {
        let mut c = self.get_tag(TAG_BIT_STRING)?;
        let unused = c.take(1)?[0];
        if unused != 0 {
            return Err(Asn1Error::InvalidData);
        }
        c.take(c.remaining())
    }

    pub fn get_oid(&mut self) -> Asn1Result<&'a [u8]> {
        let mut c = self.get_tag(TAG_OID)?;
        c.take(c.remaining())
    }

    pub fn get_null(&mut self) -> Asn1Result<()> {
        let c = self.get_tag(TAG_NULL)?;
        if !c.is_empty() {
            return Err(Asn1Error::LengthMismatch);
        }
        Ok(())
    }

    /// Parses an AlgorithmIdentifier `SEQUENCE { OID, parameters? }`.
    /// `parameters` captures whatever bytes remain after the OID as an
    /// opaque element view; it may be absent.
    pub fn get_alg(&mut self) -> Asn1Result<(&'a [u8], Option<Asn1Element<'a>>)> {
        let mut seq = self.get_tag(TAG_SEQUENCE)?;
        let oid = seq.get_oid()?;
        let params = if seq.is_empty() {
            None
        } else {
            Some(seq.get_any()?)
        };
        if !seq.is_empty() {
            return Err(Asn1Error::LengthMismatch);
        }
        Ok((oid, params))
    }
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
    fn short_form_length() {
        let mut buf = vec![TAG_OCTET_STRING];
        buf.extend(der_len(3));
        buf.extend([1, 2, 3]);
        let mut c = Cursor::new(&buf);
        assert_eq!(c.get_octet_string().unwrap(), &[1, 2, 3]);
        assert!(c.at_end());
    }

    #[test]
    fn long_form_length() {
        let content = vec![0xABu8; 200];
        let mut buf = vec![TAG_OCTET_STRING];
        buf.extend(der_len(200));
        buf.extend(&content);
        let mut c = Cursor::new(&buf);
        assert_eq!(c.get_octet_string().unwrap(), content.as_slice());
    }

    #[test]
    fn truncated_input_fails_out_of_data() {
        let buf = [TAG_OCTET_STRING, 0x05, 1, 2];
        let mut c = Cursor::new(&buf);
        assert_eq!(c.get_octet_string().unwrap_err(), Asn1Error::OutOfData);
    }

    #[test]
    fn wrong_tag_fails() {
        let buf = [TAG_INTEGER, 0x01, 0x05];
        let mut c = Cursor::new(&buf);
        assert_eq!(
            c.get_octet_string().unwrap_err(),
            Asn1Error::UnexpectedTag
        );
    }

    #[test]
    fn mpi_strips_leading_zero_pad() {
        let buf = [TAG_INTEGER, 0x03, 0x00, 0xFF, 0x01];
        let mut c = Cursor::new(&buf);
        let v = c.get_mpi().unwrap();
        assert_eq!(v, BigUint::from(0xFF01u32));
    }

    #[test]
    fn negative_mpi_rejected() {
        let buf = [TAG_INTEGER, 0x01, 0x80u8];
        let mut c = Cursor::new(&buf);
        assert_eq!(c.get_mpi().unwrap_err(), Asn1Error::InvalidData);
    }

    #[test]
    fn bitstring_requires_zero_unused_bits() {
        let buf = [TAG_BIT_STRING, 0x02, 0x01, 0xFF];
        let mut c = Cursor::new(&buf);
        assert_eq!(
            c.get_bitstring_null().unwrap_err(),
            Asn1Error::InvalidData
        );
    }

    #[test]
    fn alg_identifier_with_null_params() {
        // SEQUENCE { OID 1.2.840.113549.1.1.1, NULL }
        let oid = [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
        let null = [0x05, 0x00];
        let mut content = Vec::new();
        content.extend(oid);
        content.extend(null);
        let mut buf = vec![TAG_SEQUENCE];
        buf.extend(der_len(content.len()));
        buf.extend(content);

        let mut c = Cursor::new(&buf);
        let (oid_bytes, params) = c.get_alg().unwrap();
        assert_eq!(oid_bytes, &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01]);
        assert!(params.is_some());
    }

    #[test]
    fn alg_identifier_without_params_is_absent() {
        let oid = [0x06, 0x03, 0x2a, 0x03, 0x04];
        let mut buf = vec![TAG_SEQUENCE];
        buf.extend(der_len(oid.len()));
        buf.extend(oid);
        let mut c = Cursor::new(&buf);
        let (_oid, params) = c.get_alg().unwrap();
        assert!(params.is_none());
    }
}
