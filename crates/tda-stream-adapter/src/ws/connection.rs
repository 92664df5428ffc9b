/*
[INPUT]:  Streamer WebSocket URL
[OUTPUT]: One live socket with text send/receive
[POS]:    WebSocket layer - connection lifetime and raw I/O
[UPDATE]: When connection options or framing handling change
*/

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use crate::error::{Result, TdaStreamError};

/// One live streamer connection.
///
/// Owned exclusively by the client instance; `send` and `receive` are the
/// only suspend points. A closed remote end surfaces as a transport error
/// from `receive`, never swallowed here.
#[derive(Debug)]
pub struct StreamConnection {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl StreamConnection {
    /// Open a new connection to the streamer endpoint
    pub async fn open(url: &str) -> Result<Self> {
        let (socket, response) = connect_async(url).await?;
        debug!(status = %response.status(), "websocket handshake complete");
        Ok(Self { socket })
    }

    /// Send one already-serialized request envelope
    pub async fn send(&mut self, payload: String) -> Result<()> {
        debug!(bytes = payload.len(), "sending stream request");
        self.socket.send(WsMessage::Text(payload.into())).await?;
        Ok(())
    }

    /// Receive the next text payload.
    ///
    /// Control frames (ping/pong) are answered by the socket library and
    /// skipped here; a close frame or a dropped stream is a transport error.
    pub async fn receive(&mut self) -> Result<String> {
        loop {
            match self.socket.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.to_string()),
                Some(Ok(WsMessage::Binary(bytes))) => {
                    return String::from_utf8(bytes.to_vec()).map_err(|e| {
                        TdaStreamError::Decode {
                            message: format!("binary frame is not UTF-8: {e}"),
                        }
                    });
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    info!(frame = ?frame, "streamer closed the connection");
                    return Err(TdaStreamError::Transport(WsError::ConnectionClosed));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TdaStreamError::Transport(WsError::ConnectionClosed)),
            }
        }
    }

    /// Close the socket; tolerant of a connection that is already gone
    pub async fn close(&mut self) -> Result<()> {
        match self.socket.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
