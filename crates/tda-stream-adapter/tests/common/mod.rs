/*
[INPUT]:  Test scenarios needing a scripted streamer endpoint
[OUTPUT]: Shared mock-streamer helpers and session fixtures
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tda-stream-adapter tests

use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

use futures_util::{SinkExt, StreamExt};
use tda_stream_adapter::StreamerSession;

pub type ServerSocket = WebSocketStream<TcpStream>;

/// Session fixture matching the mock streamer scripts
pub fn test_session() -> StreamerSession {
    StreamerSession {
        account_id: "123".to_string(),
        streamer_host: "streamer-ws.example.com".to_string(),
        token: "T".to_string(),
        token_timestamp: "2023-11-14T20:20:00+0000".to_string(),
        app_id: "APP".to_string(),
        user_group: "ACCT".to_string(),
        access_level: "ACCT".to_string(),
        acl: "AKAMPN".to_string(),
        company: "AMER".to_string(),
        segment: "AMER".to_string(),
        cd_domain_id: "A000000012345678".to_string(),
        subscription_key: "SUB-KEY".to_string(),
    }
}

/// Bind a local mock streamer and return its client-facing URL
pub async fn bind_streamer() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    (listener, url)
}

/// Accept one client connection and complete the WebSocket handshake
pub async fn accept_client(listener: &TcpListener) -> ServerSocket {
    let (stream, _) = listener.accept().await.unwrap();
    accept_async(stream).await.unwrap()
}

/// Read the next control request the client sends
pub async fn read_request(socket: &mut ServerSocket) -> Value {
    while let Some(message) = socket.next().await {
        if let Message::Text(text) = message.unwrap() {
            let envelope: Value = serde_json::from_str(&text).unwrap();
            return envelope["requests"][0].clone();
        }
    }
    panic!("client closed the stream before sending a request");
}

/// Push one envelope to the client
pub async fn send_json(socket: &mut ServerSocket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Answer a control request, echoing its routing fields
pub async fn respond(socket: &mut ServerSocket, request: &Value, code: i64, msg: &str) {
    let response = json!({
        "response": [{
            "service": request["service"],
            "command": request["command"],
            "requestid": request["requestid"].to_string(),
            "content": {"code": code, "msg": msg},
        }]
    });
    send_json(socket, response).await;
}

/// Drain the socket until the client closes it
pub async fn drain_until_close(socket: &mut ServerSocket) {
    while let Some(message) = socket.next().await {
        if matches!(message, Ok(Message::Close(_)) | Err(_)) {
            break;
        }
    }
}
