use crate::Id;
use pki_types::{CertificateDer, PrivateKeyDer};
use std::{fmt, io};

/// A local certificate chain and its private key.
///
/// The chain is never empty; its first certificate is the one whose identity
/// peers pin.
pub struct Credential {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidCredential {
    #[error("no certificates")]
    NoCertificates,

    #[error("no private key")]
    NoPrivateKey,

    #[error("invalid PEM: {0}")]
    Pem(#[source] io::Error),
}

// === impl Credential ===

impl Credential {
    pub fn new(
        certs: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    ) -> Result<Self, InvalidCredential> {
        if certs.is_empty() {
            return Err(InvalidCredential::NoCertificates);
        }
        Ok(Self { certs, key })
    }

    /// Loads a credential from a PEM certificate chain (leaf first) and a PEM
    /// private key.
    pub fn from_pem(certs_pem: &[u8], key_pem: &[u8]) -> Result<Self, InvalidCredential> {
        let certs = rustls_pemfile::certs(&mut io::Cursor::new(certs_pem))
            .collect::<Result<Vec<_>, _>>()
            .map_err(InvalidCredential::Pem)?;
        let key = rustls_pemfile::private_key(&mut io::Cursor::new(key_pem))
            .map_err(InvalidCredential::Pem)?
            .ok_or(InvalidCredential::NoPrivateKey)?;
        Self::new(certs, key)
    }

    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certs
    }

    pub fn key(&self) -> &PrivateKeyDer<'static> {
        &self.key
    }

    /// Returns the identity of this credential's leaf certificate.
    ///
    /// # Panics
    ///
    /// If the leaf certificate cannot be decoded as an X.509 certificate. A
    /// malformed local credential is an operator error, not a runtime
    /// condition.
    pub fn id(&self) -> Id {
        let leaf = &self.certs[0];
        if let Err(error) = webpki::EndEntityCert::try_from(leaf) {
            panic!("local certificate must be a valid X.509 certificate: {error}");
        }
        Id::from_der(leaf)
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self {
            certs: self.certs.clone(),
            key: self.key.clone_key(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("certs", &self.certs.len())
            .finish_non_exhaustive()
    }
}
