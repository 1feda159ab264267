use ptls_identity::Id;
use std::io;
use tokio_rustls::rustls::pki_types::CertificateDer;

/// Why a pinned session could not be established.
///
/// Every variant is terminal: the session has already been closed and the
/// underlying stream must not be reused.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error(transparent)]
    ImproperCertificateCount(#[from] ImproperCertificateCount),

    #[error(transparent)]
    InvalidPeerCertificate(#[from] InvalidPeerCertificate),
}

/// The TLS handshake did not complete.
///
/// Covers rejected local credentials, protocol failures, and I/O errors or
/// timeouts on the underlying stream.
#[derive(Debug, thiserror::Error)]
#[error("TLS handshake failed")]
pub struct HandshakeError(#[source] io::Error);

/// The peer did not present exactly one certificate.
#[derive(Debug, thiserror::Error)]
#[error("expected 1 peer certificate, got {0}")]
pub struct ImproperCertificateCount(usize);

/// The peer's certificate is not in the allow-list.
#[derive(Debug, thiserror::Error)]
#[error("peer did not present a valid certificate")]
pub struct InvalidPeerCertificate {
    cert: CertificateDer<'static>,
    id: Id,
}

// === impl Error ===

impl Error {
    pub fn is_handshake(&self) -> bool {
        matches!(self, Self::Handshake(_))
    }

    pub fn is_improper_certificate_count(&self) -> bool {
        matches!(self, Self::ImproperCertificateCount(_))
    }

    pub fn is_invalid_peer_certificate(&self) -> bool {
        matches!(self, Self::InvalidPeerCertificate(_))
    }
}

// === impl HandshakeError ===

impl HandshakeError {
    pub(crate) fn new(error: io::Error) -> Self {
        Self(error)
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }

    pub fn get_ref(&self) -> &io::Error {
        &self.0
    }

    pub fn into_inner(self) -> io::Error {
        self.0
    }
}

// === impl ImproperCertificateCount ===

impl ImproperCertificateCount {
    pub(crate) fn new(count: usize) -> Self {
        Self(count)
    }

    /// The number of certificates the peer presented.
    pub fn count(&self) -> usize {
        self.0
    }
}

// === impl InvalidPeerCertificate ===

impl InvalidPeerCertificate {
    pub(crate) fn new(cert: CertificateDer<'static>, id: Id) -> Self {
        Self { cert, id }
    }

    /// The rejected certificate, as presented by the peer.
    pub fn certificate(&self) -> &CertificateDer<'static> {
        &self.cert
    }

    /// The identity of the rejected certificate.
    pub fn id(&self) -> Id {
        self.id
    }
}
