#![deny(rust_2018_idioms, clippy::disallowed_methods, clippy::disallowed_types)]
#![forbid(unsafe_code)]

//! Mutually authenticated TLS sessions pinned to known peer identities.
//!
//! Both roles present a local [`Credential`] and accept a peer only if the
//! single certificate it presents hashes to one of the caller's allowed
//! [`Id`]s. Certificate-authority validation is never performed: the
//! allow-list is the sole source of trust.
//!
//! ```no_run
//! # async fn demo(io: tokio::io::DuplexStream, cred: ptls_identity::Credential, peer: ptls_identity::Id) {
//! let io = ptls_channel::connect(io, &cred, &[peer]).await.expect("peer must be trusted");
//! assert_eq!(io.peer_id(), peer);
//! # }
//! ```

mod backend;
mod client;
mod config;
mod error;
mod server;
mod verify;

pub use self::{
    client::{connect, ClientIo},
    config::Config,
    error::{Error, HandshakeError, ImproperCertificateCount, InvalidPeerCertificate},
    server::{accept, ServerIo},
};
pub use ptls_identity::{Credential, Id};
pub use tokio_rustls::rustls;

/// The TLS library refused the local credential; reported as a handshake
/// failure since no session could be started.
fn invalid_credential(error: rustls::Error) -> Error {
    let error = std::io::Error::new(std::io::ErrorKind::InvalidInput, error);
    HandshakeError::new(error).into()
}
