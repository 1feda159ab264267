pub use aws_lc_rs::default_provider;
use tokio_rustls::rustls::{self, crypto::aws_lc_rs};

/// TLS 1.3 AEAD suites. Key exchange is always ephemeral in TLS 1.3.
pub static TLS_SUPPORTED_CIPHERSUITES: &[rustls::SupportedCipherSuite] = &[
    aws_lc_rs::cipher_suite::TLS13_AES_128_GCM_SHA256,
    aws_lc_rs::cipher_suite::TLS13_AES_256_GCM_SHA384,
    aws_lc_rs::cipher_suite::TLS13_CHACHA20_POLY1305_SHA256,
];
