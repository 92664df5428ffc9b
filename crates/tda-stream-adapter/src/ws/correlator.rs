/*
[INPUT]:  Control request parameters and inbound response envelopes
[OUTPUT]: Wire-ready requests and their matched response content
[POS]:    WebSocket layer - request id allocation and response matching
[UPDATE]: When the request/response matching rules change
*/

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{self, Envelope};
use crate::error::{Result, TdaStreamError};
use crate::session::StreamerSession;
use crate::types::{Command, StreamRequest};
use crate::ws::connection::StreamConnection;

/// One in-flight control request, alive for a single send/await cycle
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub service: String,
    pub command: Command,
}

/// Allocates request ids and matches responses back to their requests.
///
/// Ids start at 0 and increase by one per request for the lifetime of the
/// client instance; they are never reused or reset.
#[derive(Debug, Default)]
pub struct RequestCorrelator {
    next_request_id: u64,
}

impl RequestCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wire-ready request and allocate its id. Pure; never fails.
    pub fn make_request(
        &mut self,
        session: &StreamerSession,
        service: &str,
        command: Command,
        parameters: Value,
    ) -> (StreamRequest, PendingRequest) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = StreamRequest {
            service: service.to_string(),
            requestid: request_id,
            command,
            account: session.account_id.clone(),
            source: session.app_id.clone(),
            parameters,
        };
        let pending = PendingRequest {
            request_id,
            service: service.to_string(),
            command,
        };

        (request, pending)
    }

    /// Receive envelopes until the pending request's response arrives.
    ///
    /// Non-response envelopes are discarded. A response whose request id
    /// matches but whose service or command does not is a protocol
    /// inconsistency: logged and surfaced, never retried. There is no
    /// timeout; a dropped response blocks indefinitely, so callers that
    /// need liveness must wrap this in an external timeout.
    pub async fn await_response(
        conn: &mut StreamConnection,
        pending: &PendingRequest,
    ) -> Result<Value> {
        let expected_id = pending.request_id.to_string();

        loop {
            let raw = conn.receive().await?;
            let envelope = codec::decode(&raw)?;

            let Envelope::Response(frames) = envelope else {
                debug!(
                    request_id = pending.request_id,
                    "discarding non-response envelope while awaiting response"
                );
                continue;
            };

            for frame in frames {
                if frame.request_id != expected_id {
                    continue;
                }
                if frame.service == pending.service
                    && frame.command == pending.command.as_str()
                {
                    return Ok(frame.content);
                }

                warn!(
                    request_id = pending.request_id,
                    expected_service = %pending.service,
                    expected_command = pending.command.as_str(),
                    service = %frame.service,
                    command = %frame.command,
                    "received unexpected response"
                );
                return Err(TdaStreamError::ProtocolMismatch {
                    request_id: pending.request_id,
                    expected_service: pending.service.clone(),
                    expected_command: pending.command.as_str().to_string(),
                    service: frame.service,
                    command: frame.command,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn session() -> StreamerSession {
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

    #[test]
    fn test_request_ids_are_strictly_increasing() {
        let session = session();
        let mut correlator = RequestCorrelator::new();

        let (_, first) =
            correlator.make_request(&session, "ADMIN", Command::Login, json!({}));
        let (_, second) =
            correlator.make_request(&session, "QUOTE", Command::Subs, json!({}));
        let (_, third) =
            correlator.make_request(&session, "QUOTE", Command::Unsubs, json!({}));

        assert_eq!(first.request_id, 0);
        assert_eq!(second.request_id, 1);
        assert_eq!(third.request_id, 2);
    }

    #[test]
    fn test_make_request_carries_session_identity() {
        let session = session();
        let mut correlator = RequestCorrelator::new();

        let (request, pending) = correlator.make_request(
            &session,
            "QUOTE",
            Command::Subs,
            json!({"keys": "AAPL"}),
        );

        assert_eq!(request.service, "QUOTE");
        assert_eq!(request.requestid, pending.request_id);
        assert_eq!(request.command, Command::Subs);
        assert_eq!(request.account, "123");
        assert_eq!(request.source, "APP");
        assert_eq!(request.parameters["keys"], "AAPL");
    }
}
