pub use ring::default_provider;
use tokio_rustls::rustls::{self, crypto::ring};

/// TLS 1.3 AEAD suites. Key exchange is always ephemeral in TLS 1.3.
pub static TLS_SUPPORTED_CIPHERSUITES: &[rustls::SupportedCipherSuite] = &[
    ring::cipher_suite::TLS13_AES_128_GCM_SHA256,
    ring::cipher_suite::TLS13_AES_256_GCM_SHA384,
    ring::cipher_suite::TLS13_CHACHA20_POLY1305_SHA256,
];
