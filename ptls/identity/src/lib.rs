#![deny(rust_2018_idioms, clippy::disallowed_methods, clippy::disallowed_types)]
#![forbid(unsafe_code)]

//! Certificate-pinned peer identities.
//!
//! An [`Id`] is the SHA-256 digest of a certificate's DER encoding. Peers are
//! trusted by comparing the `Id` of the certificate they present against a
//! fixed list of known identities; no certificate authority is consulted.

mod credentials;

pub use self::credentials::{Credential, InvalidCredential};
use ring::digest;
use std::{fmt, str::FromStr};
use subtle::ConstantTimeEq;

/// The length of an [`Id`] in bytes.
pub const ID_LEN: usize = 32;

/// A peer identity derived from a certificate's canonical DER bytes.
///
/// Equality is evaluated in constant time: comparing two identities takes the
/// same time regardless of where (or whether) they first differ.
///
/// `Id` is deliberately not `Hash`: allow-lists are scanned with
/// [`Id::ct_eq`] rather than looked up in hashed collections.
///
/// ```compile_fail
/// let mut ids = std::collections::HashSet::new();
/// ids.insert(ptls_identity::Id::from_der(b"cert"));
/// ```
#[derive(Copy, Clone, Eq)]
pub struct Id([u8; ID_LEN]);

#[derive(Debug, thiserror::Error)]
pub enum InvalidId {
    #[error("invalid identity: expected {expected} hex characters, got {0}", expected = ID_LEN * 2)]
    Length(usize),

    #[error("invalid identity: {0:?} at offset {1} is not a hex digit")]
    Character(char, usize),
}

// === impl Id ===

impl Id {
    /// Derives the identity of a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Self {
        let hash = digest::digest(&digest::SHA256, der);
        let mut id = [0u8; ID_LEN];
        id.copy_from_slice(hash.as_ref());
        Self(id)
    }

    /// Compares two identities without leaking the position of the first
    /// differing byte.
    #[inline]
    pub fn ct_eq(&self, other: &Id) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }
}

impl PartialEq for Id {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Id {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut id = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut id).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => InvalidId::Character(c, index),
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                InvalidId::Length(s.len())
            }
        })?;
        Ok(Self(id))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id")
            .field(&format_args!("{}", self))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn self_signed(name: &str) -> Vec<u8> {
        rcgen::generate_simple_self_signed(vec![name.to_string()])
            .expect("should generate cert")
            .cert
            .der()
            .to_vec()
    }

    #[test]
    fn derivation_is_deterministic() {
        let der = self_signed("foo.example.com");
        assert_eq!(Id::from_der(&der), Id::from_der(&der));
        assert_eq!(Id::from_der(&der).as_bytes(), Id::from_der(&der).as_bytes());
    }

    #[test]
    fn distinct_certificates_have_distinct_ids() {
        let foo = self_signed("foo.example.com");
        let bar = self_signed("bar.example.com");
        assert_ne!(Id::from_der(&foo), Id::from_der(&bar));

        // A single flipped bit changes the identity.
        let mut flipped = foo.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 1;
        assert_ne!(Id::from_der(&foo), Id::from_der(&flipped));
    }

    #[test]
    fn equality_is_reflexive_and_symmetric() {
        let a = Id::from_der(b"a");
        let b = Id::from_der(b"b");
        assert!(a.ct_eq(&a));
        assert!(!a.ct_eq(&b));
        assert_eq!(a.ct_eq(&b), b.ct_eq(&a));
        assert_eq!(a, Id::from(*a.as_bytes()));
    }

    #[test]
    fn known_digest() {
        let id = Id::from_der(b"");
        assert_eq!(
            id.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parses_display_form() {
        let id = Id::from_der(b"some certificate");
        let parsed = id.to_string().parse::<Id>().expect("must parse");
        assert_eq!(id, parsed);
        assert_eq!(format!("{:?}", id), format!("Id({})", id));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!("".parse::<Id>().is_err());
        assert!("abcd".parse::<Id>().is_err());
        let id = Id::from_der(b"x").to_string();
        assert!(format!("{}00", id).parse::<Id>().is_err());
        assert!(id.replacen(|c: char| c.is_ascii_hexdigit(), "z", 1).parse::<Id>().is_err());
    }

    #[test]
    fn parse_errors_describe_the_problem() {
        let id = Id::from_der(b"x").to_string();

        let error = format!("{id}00").parse::<Id>().unwrap_err();
        assert!(matches!(error, InvalidId::Length(66)), "{error:?}");
        assert_eq!(
            error.to_string(),
            "invalid identity: expected 64 hex characters, got 66"
        );

        let bad = format!("{}g", &id[..ID_LEN * 2 - 1]);
        let error = bad.parse::<Id>().unwrap_err();
        assert!(matches!(error, InvalidId::Character('g', 63)), "{error:?}");
        assert_eq!(
            error.to_string(),
            "invalid identity: 'g' at offset 63 is not a hex digit"
        );
    }

    /// Compares the time taken to reject an identity differing in its first
    /// byte against one differing only in its last byte.
    #[test]
    #[ignore = "timing measurements are sensitive to machine load"]
    fn comparison_time_is_independent_of_mismatch_position() {
        const ROUNDS: usize = 200_000;

        fn measure(a: &Id, b: &Id) -> Duration {
            let start = Instant::now();
            for _ in 0..ROUNDS {
                std::hint::black_box(std::hint::black_box(a).ct_eq(std::hint::black_box(b)));
            }
            start.elapsed()
        }

        let base = Id::from_der(b"timing");
        let mut early = *base.as_bytes();
        early[0] ^= 0xff;
        let mut late = *base.as_bytes();
        late[ID_LEN - 1] ^= 0xff;
        let (early, late) = (Id::from(early), Id::from(late));

        // Take the best of several runs to suppress scheduler noise.
        let best = |b: &Id| (0..5).map(|_| measure(&base, b)).min().unwrap();
        let (early, late) = (best(&early).as_secs_f64(), best(&late).as_secs_f64());
        let ratio = early.max(late) / early.min(late);
        assert!(ratio < 1.5, "early={early:?} late={late:?} ratio={ratio}");
    }
}
