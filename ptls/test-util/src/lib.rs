#![deny(rust_2018_idioms, clippy::disallowed_methods, clippy::disallowed_types)]
#![forbid(unsafe_code)]

use pki_types::{CertificateDer, PrivatePkcs8KeyDer};
use ptls_identity::{Credential, Id};

/// A self-signed test identity.
pub struct Entity {
    pub name: &'static str,
    pub crt: CertificateDer<'static>,
    pub key: Vec<u8>,
}

pub const FOO_NS1: &str = "foo.ns1.example.com";
pub const BAR_NS1: &str = "bar.ns1.example.com";

// === impl Entity ===

impl Entity {
    /// Generates a fresh ECDSA P-256 self-signed certificate for `name`.
    pub fn generate(name: &'static str) -> Self {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec![name.to_string()])
                .expect("should generate cert");
        Self {
            name,
            crt: cert.der().clone(),
            key: key_pair.serialize_der(),
        }
    }

    pub fn foo() -> Self {
        Self::generate(FOO_NS1)
    }

    pub fn bar() -> Self {
        Self::generate(BAR_NS1)
    }

    pub fn id(&self) -> Id {
        Id::from_der(&self.crt)
    }

    pub fn credential(&self) -> Credential {
        self.credential_with_chain(Vec::new())
    }

    /// Builds a credential that presents `extra` certificates after this
    /// entity's leaf.
    pub fn credential_with_chain(&self, extra: Vec<CertificateDer<'static>>) -> Credential {
        let mut certs = vec![self.crt.clone()];
        certs.extend(extra);
        let key = PrivatePkcs8KeyDer::from(self.key.clone());
        Credential::new(certs, key.into()).expect("credential must be valid")
    }
}
