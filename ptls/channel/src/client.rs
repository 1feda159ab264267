use crate::{
    error::{Error, HandshakeError},
    verify, Config,
};
use ptls_identity::{Credential, Id};
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{self, AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio_rustls::rustls::{self, pki_types::ServerName};
use tracing::{debug, trace};

/// Required by rustls but never sent nor checked: SNI is disabled and peers
/// are identified by certificate fingerprint.
const PEER_NAME: &str = "peer.ptls.invalid";

/// An initiator-side session whose peer presented an allowed identity.
#[derive(Debug)]
pub struct ClientIo<I> {
    io: tokio_rustls::client::TlsStream<I>,
    peer_id: Id,
}

/// Establishes a pinned session in the initiator (TLS client) role.
///
/// The handshake is completed before this returns. The peer must present
/// exactly one certificate whose identity is in `allowed`; otherwise the
/// session is closed and an error is returned.
pub async fn connect<I>(io: I, credential: &Credential, allowed: &[Id]) -> Result<ClientIo<I>, Error>
where
    I: AsyncRead + AsyncWrite + Unpin,
{
    let config = Config::new(credential).map_err(crate::invalid_credential)?;
    config.connect(io, allowed).await
}

// === impl Config ===

impl Config {
    /// Like [`connect`], using a pre-built configuration.
    pub async fn connect<I>(&self, io: I, allowed: &[Id]) -> Result<ClientIo<I>, Error>
    where
        I: AsyncRead + AsyncWrite + Unpin,
    {
        let server_name =
            ServerName::try_from(PEER_NAME).expect("peer name must be a valid DNS name");

        trace!(allowed = allowed.len(), "Connecting TLS session");
        let mut io = tokio_rustls::TlsConnector::from(self.client())
            .connect(server_name, io)
            .await
            .map_err(HandshakeError::new)?;

        let (_, conn) = io.get_ref();
        match verify::verify_peer(conn.peer_certificates(), allowed) {
            Ok(peer_id) => {
                debug!(peer.id = %peer_id, "Connected TLS session");
                Ok(ClientIo { io, peer_id })
            }
            Err(error) => {
                let _ = io.shutdown().await;
                Err(error)
            }
        }
    }
}

// === impl ClientIo ===

impl<I> ClientIo<I> {
    /// The verified identity of the peer.
    pub fn peer_id(&self) -> Id {
        self.peer_id
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &I {
        self.io.get_ref().0
    }

    /// Discards the TLS session and returns the underlying stream.
    ///
    /// Any buffered plaintext is lost and no close_notify is sent.
    pub fn into_inner(self) -> I {
        self.io.into_inner().0
    }

    pub fn protocol_version(&self) -> Option<rustls::ProtocolVersion> {
        self.io.get_ref().1.protocol_version()
    }

    pub fn negotiated_cipher_suite(&self) -> Option<rustls::SupportedCipherSuite> {
        self.io.get_ref().1.negotiated_cipher_suite()
    }
}

impl<I: AsyncRead + AsyncWrite + Unpin> AsyncRead for ClientIo<I> {
    #[inline]
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.io).poll_read(cx, buf)
    }
}

impl<I: AsyncRead + AsyncWrite + Unpin> AsyncWrite for ClientIo<I> {
    #[inline]
    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.io).poll_flush(cx)
    }

    #[inline]
    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.io).poll_shutdown(cx)
    }

    #[inline]
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.io).poll_write(cx, buf)
    }

    #[inline]
    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[std::io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.io).poll_write_vectored(cx, bufs)
    }

    #[inline]
    fn is_write_vectored(&self) -> bool {
        self.io.is_write_vectored()
    }
}
