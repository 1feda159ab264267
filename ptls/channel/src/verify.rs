use crate::error::{Error, ImproperCertificateCount, InvalidPeerCertificate};
use ptls_identity::Id;
use std::sync::Arc;
use tokio_rustls::rustls::{
    self,
    client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    crypto::{self, WebPkiSupportedAlgorithms},
    pki_types::{CertificateDer, ServerName, UnixTime},
    server::danger::{ClientCertVerified, ClientCertVerifier},
    DigitallySignedStruct, DistinguishedName, SignatureScheme,
};
use tracing::trace;

/// Accepts whatever certificate the peer presents, in either role.
///
/// Certificate-authority validation is deliberately replaced: trust is decided
/// after the handshake by comparing the peer's identity against an
/// allow-list. Handshake signatures are still verified, so a peer must hold
/// the private key of the certificate it presents.
///
/// Client certificates are requested but not required, so that a peer
/// presenting none is rejected by the identity check rather than by the TLS
/// library.
#[derive(Debug)]
pub(crate) struct PinnedVerifier {
    algs: WebPkiSupportedAlgorithms,
}

// === impl PinnedVerifier ===

impl PinnedVerifier {
    pub(crate) fn new(provider: &crypto::CryptoProvider) -> Arc<Self> {
        Arc::new(Self {
            algs: provider.signature_verification_algorithms,
        })
    }
}

impl ServerCertVerifier for PinnedVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        trace!(intermediates = intermediates.len(), "Deferring server certificate check");
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(message, cert, dss, &self.algs)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(message, cert, dss, &self.algs)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algs.supported_schemes()
    }
}

impl ClientCertVerifier for PinnedVerifier {
    fn offer_client_auth(&self) -> bool {
        true
    }

    fn client_auth_mandatory(&self) -> bool {
        false
    }

    fn root_hint_subjects(&self) -> &[DistinguishedName] {
        &[]
    }

    fn verify_client_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _now: UnixTime,
    ) -> Result<ClientCertVerified, rustls::Error> {
        trace!(intermediates = intermediates.len(), "Deferring client certificate check");
        Ok(ClientCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(message, cert, dss, &self.algs)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(message, cert, dss, &self.algs)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algs.supported_schemes()
    }
}

/// Checks the certificates a peer presented during a completed handshake
/// against `allowed`, returning the peer's identity.
pub(crate) fn verify_peer(
    peer_certs: Option<&[CertificateDer<'_>]>,
    allowed: &[Id],
) -> Result<Id, Error> {
    let certs = peer_certs.unwrap_or_default();
    let [end_entity] = certs else {
        return Err(ImproperCertificateCount::new(certs.len()).into());
    };

    let id = Id::from_der(end_entity);
    // Stop at the first match; each comparison is itself constant-time.
    for candidate in allowed {
        if candidate.ct_eq(&id) {
            return Ok(id);
        }
    }

    Err(InvalidPeerCertificate::new(end_entity.clone().into_owned(), id).into())
}
