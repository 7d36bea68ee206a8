//! WebSocket channel using `tokio-tungstenite`.
//!
//! The host binds a [`WebSocketListener`] and waits for a joiner whose
//! request path is `/<room code>`. The joiner dials with [`connect`].
//! Either way the result is a [`WebSocketConnection`].

use std::net::SocketAddr;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response,
};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{Connection, ConnectionId, TransportError};

// Accepted sockets are wrapped in `MaybeTlsStream::Plain` so both sides
// share one stream type.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn io_error(
    kind: std::io::ErrorKind,
    e: tokio_tungstenite::tungstenite::Error,
) -> std::io::Error {
    std::io::Error::new(kind, e)
}

// ---------------------------------------------------------------------------
// Listener (host side)
// ---------------------------------------------------------------------------

/// Listens for a joiner on behalf of one room.
pub struct WebSocketListener {
    listener: TcpListener,
}

impl WebSocketListener {
    /// Binds to the given address. Use port `0` to let the OS pick one.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// The address actually bound, which tells you the port when binding
    /// to port `0`.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener
            .local_addr()
            .map_err(TransportError::AcceptFailed)
    }

    /// Waits for a joiner presenting `room_code`.
    ///
    /// A client asking for any other path gets an HTTP 404 and is
    /// dropped; so is anything that fails the WebSocket handshake. The
    /// listener keeps waiting in both cases. Only a failure of the TCP
    /// listener itself is returned as an error.
    pub async fn accept(
        &self,
        room_code: &str,
    ) -> Result<WebSocketConnection, TransportError> {
        let expected = format!("/{room_code}");
        loop {
            let (stream, addr) = self
                .listener
                .accept()
                .await
                .map_err(TransportError::AcceptFailed)?;

            let path_check = |req: &Request, resp: Response| {
                if req.uri().path() == expected {
                    Ok(resp)
                } else {
                    let mut err =
                        ErrorResponse::new(Some("no such room".to_string()));
                    *err.status_mut() = StatusCode::NOT_FOUND;
                    Err(err)
                }
            };

            match tokio_tungstenite::accept_hdr_async(
                MaybeTlsStream::Plain(stream),
                path_check,
            )
            .await
            {
                Ok(ws) => {
                    let conn = WebSocketConnection::new(ws);
                    tracing::info!(id = %conn.id(), %addr, "joiner connected");
                    return Ok(conn);
                }
                Err(e) => {
                    tracing::warn!(%addr, error = %e, "rejected incoming connection");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dialing (joiner side)
// ---------------------------------------------------------------------------

/// Connects to a host at `url`, e.g. `ws://192.168.1.20:9000/482913`.
///
/// # Errors
/// Returns `TransportError::ConnectFailed` if the host is unreachable or
/// refuses the room code.
pub async fn connect(url: &str) -> Result<WebSocketConnection, TransportError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
    let conn = WebSocketConnection::new(ws);
    tracing::info!(id = %conn.id(), url, "connected to host");
    Ok(conn)
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// A single WebSocket connection.
///
/// The socket is split so a reader can wait in `recv` without blocking
/// `send`; each half has its own lock.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    fn new(ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        Self {
            id: ConnectionId::next(),
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

impl Connection for WebSocketConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let msg = Message::Binary(data.to_vec().into());
        self.sink.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(io_error(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(io_error(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.sink.lock().await.close().await.map_err(|e| {
            TransportError::SendFailed(io_error(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
