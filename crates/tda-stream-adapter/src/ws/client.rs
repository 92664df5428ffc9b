/*
[INPUT]:  Streamer session identity and control/subscription calls
[OUTPUT]: Live session state and labeled records fanned out to handlers
[POS]:    WebSocket layer - client state machine and dispatch loop
[UPDATE]: When adding control commands or changing dispatch behavior
*/

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::codec::{self, DataFrame, Envelope, NotifyFrame};
use crate::error::{Result, TdaStreamError};
use crate::services::{self, KeySource, StreamService};
use crate::session::StreamerSession;
use crate::types::{Command, QosLevel, RequestEnvelope, SessionState};
use crate::ws::connection::StreamConnection;
use crate::ws::correlator::RequestCorrelator;
use crate::ws::handler::{HandlerFn, StreamHandler};

/// What one `handle_message` call observed.
///
/// The application loop drives on this: heartbeats are liveness signals,
/// `SessionClosed` means the server terminated the session and the loop
/// should stop or re-login.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A data (or non-admin notify) envelope; `delivered` counts handler calls
    Data { delivered: usize },
    /// The stream is alive; no records were delivered
    Heartbeat(String),
    /// The server force-closed the session (e.g. replaced elsewhere)
    SessionClosed,
    /// A response envelope arrived outside any await and was dropped
    ResponseDropped,
}

/// Streaming market-data client for the TDA streamer.
///
/// Owns the one socket, the request id counter, the per-service handler
/// registry and the subscription bookkeeping. All control operations and
/// the dispatch loop take `&mut self`: the exclusive borrow is the mutual
/// exclusion that keeps every send-then-await-response cycle serialized
/// against the dispatch loop on the shared socket.
pub struct TdaStreamClient {
    session: StreamerSession,
    ws_url: String,
    conn: Option<StreamConnection>,
    correlator: RequestCorrelator,
    handlers: HashMap<&'static str, Vec<StreamHandler>>,
    subscriptions: HashMap<&'static str, BTreeSet<String>>,
    state: SessionState,
}

impl TdaStreamClient {
    /// Create a client for the session's streamer host
    pub fn new(session: StreamerSession) -> Self {
        let ws_url = session.ws_url();
        Self::with_ws_url(session, ws_url)
    }

    /// Create a client against an explicit WebSocket URL
    pub fn with_ws_url(session: StreamerSession, ws_url: impl Into<String>) -> Self {
        Self {
            session,
            ws_url: ws_url.into(),
            conn: None,
            correlator: RequestCorrelator::new(),
            handlers: HashMap::new(),
            subscriptions: HashMap::new(),
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    /// Currently subscribed keys for one service, if any
    pub fn subscriptions(&self, service: StreamService) -> Option<&BTreeSet<String>> {
        self.subscriptions.get(service.descriptor().service)
    }

    /// Open the connection if none is live; reuses an existing one
    async fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            debug!("already connected to streamer");
        } else {
            info!(url = %self.ws_url, "connecting to streamer");
            self.conn = Some(StreamConnection::open(&self.ws_url).await?);
            info!("connected to streamer");
        }
        if self.state == SessionState::Disconnected {
            self.state = SessionState::Connected;
        }
        Ok(())
    }

    /// Close the connection if one is open; a no-op otherwise
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut conn) = self.conn.take() {
            info!("disconnecting from streamer");
            conn.close().await?;
        } else {
            debug!("not connected to streamer");
        }
        self.state = SessionState::Disconnected;
        Ok(())
    }

    /// Connect and log in to the streamer.
    ///
    /// The session reaches `LoggedIn` only when the response content is a
    /// structured object with `code == 0`; any other outcome leaves the
    /// session non-logged-in and surfaces the failure content.
    pub async fn login(&mut self) -> Result<()> {
        self.connect().await?;

        let credential = self.session.login_credential()?;
        let parameters = json!({
            "credential": credential,
            "token": self.session.token,
            "version": "1.0",
        });

        info!("sending login request");
        match self
            .control_request(services::ADMIN, Command::Login, parameters)
            .await
        {
            Ok(content) => {
                self.state = SessionState::LoggedIn;
                info!(msg = content["msg"].as_str().unwrap_or(""), "login successful");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "login failed");
                Err(err)
            }
        }
    }

    /// Log out and optionally close the connection.
    ///
    /// A no-op when not logged in; the disconnect still runs if requested.
    pub async fn logout(&mut self, disconnect: bool) -> Result<()> {
        let result = if self.state == SessionState::LoggedIn {
            info!("sending logout request");
            match self
                .control_request(services::ADMIN, Command::Logout, json!({}))
                .await
            {
                Ok(content) => {
                    self.state = SessionState::Disconnected;
                    info!(msg = content["msg"].as_str().unwrap_or(""), "logout successful");
                    Ok(())
                }
                Err(err) => {
                    error!(error = %err, "logout failed");
                    Err(err)
                }
            }
        } else {
            debug!("not logged in, no need to logout");
            Ok(())
        };

        if disconnect {
            self.disconnect().await?;
        }

        result
    }

    /// Ask the streamer for a different update cadence
    pub async fn quality_of_service(&mut self, level: QosLevel) -> Result<()> {
        let parameters = json!({"qoslevel": level.code()});

        match self
            .control_request(services::ADMIN, Command::Qos, parameters)
            .await
        {
            Ok(_) => {
                info!(level = ?level, "qos change accepted");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "qos change failed");
                Err(err)
            }
        }
    }

    /// Subscribe one service to a set of symbols.
    ///
    /// On success (code 0) the symbols are recorded in the service's
    /// subscription set; a rejection leaves the set untouched. Services
    /// keyed by the account subscription key ignore `symbols`.
    pub async fn subscribe(&mut self, service: StreamService, symbols: &[&str]) -> Result<()> {
        let descriptor = service.descriptor();
        let keys = match descriptor.key_source {
            KeySource::Symbols => symbols.join(","),
            KeySource::SubscriptionKey => self.session.subscription_key.clone(),
        };
        let parameters = json!({
            "keys": keys,
            "fields": descriptor.schema.field_range(),
        });

        match self
            .control_request(descriptor.service, Command::Subs, parameters)
            .await
        {
            Ok(content) => {
                let set = self.subscriptions.entry(descriptor.service).or_default();
                for key in keys.split(',').filter(|key| !key.is_empty()) {
                    set.insert(key.to_string());
                }
                info!(
                    service = descriptor.service,
                    keys = %keys,
                    msg = content["msg"].as_str().unwrap_or(""),
                    "subscription successful"
                );
                Ok(())
            }
            Err(err) => {
                error!(service = descriptor.service, keys = %keys, error = %err, "subscription failed");
                Err(err)
            }
        }
    }

    /// Unsubscribe one service from a set of symbols
    pub async fn unsubscribe(&mut self, service: StreamService, symbols: &[&str]) -> Result<()> {
        let descriptor = service.descriptor();
        let keys = match descriptor.key_source {
            KeySource::Symbols => symbols.join(","),
            KeySource::SubscriptionKey => self.session.subscription_key.clone(),
        };
        let parameters = json!({"keys": keys});

        match self
            .control_request(descriptor.service, Command::Unsubs, parameters)
            .await
        {
            Ok(content) => {
                if let Some(set) = self.subscriptions.get_mut(descriptor.service) {
                    for key in keys.split(',') {
                        set.remove(key);
                    }
                }
                info!(
                    service = descriptor.service,
                    keys = %keys,
                    msg = content["msg"].as_str().unwrap_or(""),
                    "unsubscription successful"
                );
                Ok(())
            }
            Err(err) => {
                error!(service = descriptor.service, keys = %keys, error = %err, "unsubscription failed");
                Err(err)
            }
        }
    }

    /// Register a handler for one service, bound to that service's schema.
    ///
    /// Handlers run in registration order; registration is independent of
    /// subscription.
    pub fn add_handler(&mut self, service: StreamService, handler: Arc<HandlerFn>) {
        let descriptor = service.descriptor();
        self.handlers
            .entry(descriptor.service)
            .or_default()
            .push(StreamHandler {
                func: handler,
                schema: descriptor.schema,
            });
        debug!(service = descriptor.service, "handler registered");
    }

    /// Remove the first registration matching this callback exactly
    pub fn remove_handler(&mut self, service: StreamService, handler: &Arc<HandlerFn>) -> bool {
        let descriptor = service.descriptor();
        let Some(registered) = self.handlers.get_mut(descriptor.service) else {
            return false;
        };
        let Some(position) = registered
            .iter()
            .position(|candidate| candidate.matches(handler, &descriptor.schema))
        else {
            return false;
        };
        registered.remove(position);
        debug!(service = descriptor.service, "handler removed");
        true
    }

    /// Receive and dispatch exactly one inbound envelope.
    ///
    /// Data records are labeled and fanned out to the service's handlers in
    /// registration order; a handler returning deferred work gets spawned
    /// so delivery never waits on it. Heartbeats and forced disconnects are
    /// surfaced as events; unsolicited responses are dropped.
    pub async fn handle_message(&mut self) -> Result<StreamEvent> {
        let raw = {
            let conn = self.conn.as_mut().ok_or(TdaStreamError::NotConnected)?;
            conn.receive().await?
        };
        let envelope = codec::decode(&raw)?;

        match envelope {
            Envelope::Data(frames) => {
                let mut delivered = 0;
                for frame in &frames {
                    delivered += self.dispatch_frame(frame);
                }
                Ok(StreamEvent::Data { delivered })
            }
            Envelope::Notify(frames) => {
                let mut delivered = 0;
                let mut heartbeat = None;
                for frame in frames {
                    match frame {
                        NotifyFrame::Heartbeat { heartbeat: stamp } => {
                            debug!(heartbeat = %stamp, "socket is alive");
                            heartbeat = Some(stamp);
                        }
                        NotifyFrame::Service { service, content }
                            if service == services::ADMIN =>
                        {
                            warn!(content = %content, "socket closed by streamer");
                            self.disconnect().await?;
                            return Ok(StreamEvent::SessionClosed);
                        }
                        NotifyFrame::Service { service, content } => {
                            let records = match content {
                                Value::Array(items) => items,
                                Value::Null => Vec::new(),
                                other => vec![other],
                            };
                            let frame = DataFrame {
                                service,
                                command: None,
                                timestamp: None,
                                content: records,
                            };
                            delivered += self.dispatch_frame(&frame);
                        }
                    }
                }
                match heartbeat {
                    Some(stamp) => Ok(StreamEvent::Heartbeat(stamp)),
                    None => Ok(StreamEvent::Data { delivered }),
                }
            }
            Envelope::Response(_) => {
                debug!("dropping response envelope received outside a request cycle");
                Ok(StreamEvent::ResponseDropped)
            }
        }
    }

    /// Label one frame per handler and invoke the service's handlers
    fn dispatch_frame(&self, frame: &DataFrame) -> usize {
        let Some(service) = StreamService::from_wire(&frame.service) else {
            debug!(service = %frame.service, "no descriptor for service, frame dropped");
            return 0;
        };
        let descriptor = service.descriptor();
        let Some(handlers) = self.handlers.get(descriptor.service) else {
            return 0;
        };

        let mut delivered = 0;
        for handler in handlers {
            let Some(labeled) = codec::label_frames(
                std::slice::from_ref(frame),
                &handler.schema,
                descriptor.decoder,
            ) else {
                continue;
            };

            if let Some(task) = (handler.func)(labeled) {
                tokio::spawn(async move {
                    if let Err(err) = task.await {
                        warn!(error = %err, "deferred stream handler failed");
                    }
                });
            }
            delivered += 1;
        }
        delivered
    }

    /// One serialized control exchange: send, await the matched response,
    /// enforce the code-0 success rule.
    async fn control_request(
        &mut self,
        service: &str,
        command: Command,
        parameters: Value,
    ) -> Result<Value> {
        let (request, pending) =
            self.correlator
                .make_request(&self.session, service, command, parameters);
        let payload = serde_json::to_string(&RequestEnvelope {
            requests: vec![request],
        })?;

        let conn = self.conn.as_mut().ok_or(TdaStreamError::NotConnected)?;
        conn.send(payload).await?;
        let content = RequestCorrelator::await_response(conn, &pending).await?;

        match content.get("code").and_then(Value::as_i64) {
            Some(0) => Ok(content),
            code => Err(TdaStreamError::Rejected {
                service: service.to_string(),
                command: command.as_str().to_string(),
                code: code.unwrap_or(-1),
                msg: content
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            }),
        }
    }
}
