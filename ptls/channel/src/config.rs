use crate::{backend, verify::PinnedVerifier};
use ptls_identity::Credential;
use std::sync::Arc;
use tokio_rustls::rustls::{self, ClientConfig, ServerConfig};

pub(crate) static TLS_VERSIONS: &[&rustls::SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// Immutable TLS configuration for a local credential.
///
/// A `Config` may be shared by any number of concurrent establishments.
#[derive(Clone)]
pub struct Config {
    server: Arc<ServerConfig>,
    client: Arc<ClientConfig>,
}

/// Restricts the backend's default provider to the supported cipher suites.
pub(crate) fn provider() -> Arc<rustls::crypto::CryptoProvider> {
    Arc::new(rustls::crypto::CryptoProvider {
        cipher_suites: backend::TLS_SUPPORTED_CIPHERSUITES.to_vec(),
        ..backend::default_provider()
    })
}

pub(crate) fn client_config_builder(
) -> rustls::ConfigBuilder<ClientConfig, rustls::client::WantsClientCert> {
    let provider = provider();
    let verifier = PinnedVerifier::new(&provider);
    ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(TLS_VERSIONS)
        .expect("client config must be valid")
        // Peer certificates are checked against the allow-list once the
        // handshake completes, never against a CA.
        .dangerous()
        .with_custom_certificate_verifier(verifier)
}

fn server_config_builder() -> rustls::ConfigBuilder<ServerConfig, rustls::server::WantsServerCert>
{
    let provider = provider();
    let verifier = PinnedVerifier::new(&provider);
    ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(TLS_VERSIONS)
        .expect("server config must be valid")
        .with_client_cert_verifier(verifier)
}

// === impl Config ===

impl Config {
    /// Builds client and server configurations presenting `credential`.
    ///
    /// Fails if the TLS library rejects the credential, e.g. when the key does
    /// not match the leaf certificate or uses an unsupported algorithm.
    pub fn new(credential: &Credential) -> Result<Self, rustls::Error> {
        let mut client = client_config_builder().with_client_auth_cert(
            credential.certificates().to_vec(),
            credential.key().clone_key(),
        )?;
        // Every connection performs a full handshake so that the peer's
        // identity is always checked.
        client.resumption = rustls::client::Resumption::disabled();
        // The placeholder server name must never be sent.
        client.enable_sni = false;

        let mut server = server_config_builder().with_single_cert(
            credential.certificates().to_vec(),
            credential.key().clone_key(),
        )?;
        server.session_storage = Arc::new(rustls::server::NoServerSessionStorage {});
        server.send_tls13_tickets = 0;

        Ok(Self {
            server: server.into(),
            client: client.into(),
        })
    }

    pub(crate) fn server(&self) -> Arc<ServerConfig> {
        self.server.clone()
    }

    pub(crate) fn client(&self) -> Arc<ClientConfig> {
        self.client.clone()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config").finish_non_exhaustive()
    }
}
