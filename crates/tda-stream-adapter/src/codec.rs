/*
[INPUT]:  Raw wire text from the streamer socket
[OUTPUT]: Classified envelopes and schema-labeled records
[POS]:    Codec layer - wire decoding and field relabeling
[UPDATE]: When the streamer envelope format or labeling rules change
*/

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, TdaStreamError};
use crate::fields::{self, ServiceSchema};
use crate::services::DecoderKind;

/// One matched control-request response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseFrame {
    pub service: String,
    pub command: String,
    #[serde(rename = "requestid", deserialize_with = "deserialize_request_id")]
    pub request_id: String,
    #[serde(default)]
    pub content: Value,
}

/// One service's batch of streamed records
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataFrame {
    pub service: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub content: Vec<Value>,
}

/// One server-initiated notification
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NotifyFrame {
    Heartbeat {
        heartbeat: String,
    },
    Service {
        service: String,
        #[serde(default)]
        content: Value,
    },
}

/// One top-level parsed unit of wire traffic
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Response(Vec<ResponseFrame>),
    Data(Vec<DataFrame>),
    Notify(Vec<NotifyFrame>),
}

/// A data frame after schema labeling, keyed by record symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMessage {
    pub service: String,
    pub entries: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    response: Option<Vec<ResponseFrame>>,
    data: Option<Vec<DataFrame>>,
    notify: Option<Vec<NotifyFrame>>,
}

/// The streamer echoes request ids as strings but is not consistent about it
fn deserialize_request_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRequestId {
        Text(String),
        Number(u64),
    }

    Ok(match RawRequestId::deserialize(deserializer)? {
        RawRequestId::Text(text) => text,
        RawRequestId::Number(number) => number.to_string(),
    })
}

/// Decode raw wire text into a classified envelope.
///
/// Classification is by the presence of a `response`, `data` or `notify`
/// top-level key. Malformed text gets one permissive re-parse (raw control
/// characters stripped) before the decode error is surfaced.
pub fn decode(raw: &str) -> Result<Envelope> {
    let parsed: RawEnvelope = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(strict_err) => {
            debug!(error = %strict_err, "strict envelope parse failed, retrying permissively");
            let permissive: String = raw
                .chars()
                .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
                .collect();
            serde_json::from_str(&permissive).map_err(|_| TdaStreamError::Decode {
                message: strict_err.to_string(),
            })?
        }
    };

    if let Some(frames) = parsed.response {
        return Ok(Envelope::Response(frames));
    }
    if let Some(frames) = parsed.data {
        return Ok(Envelope::Data(frames));
    }
    if let Some(frames) = parsed.notify {
        return Ok(Envelope::Notify(frames));
    }

    Err(TdaStreamError::Decode {
        message: "envelope has no response, data or notify key".to_string(),
    })
}

/// Label every record of a frame batch with one service's schema.
///
/// All frames are expected to carry the same service. When they do not,
/// the first frame's service wins: mismatched frames are skipped with a
/// warning. Records without a `key` field are dropped with a debug log.
pub fn label_frames(
    frames: &[DataFrame],
    schema: &ServiceSchema,
    decoder: DecoderKind,
) -> Option<LabeledMessage> {
    let service = frames.first()?.service.clone();
    let mut entries = Map::new();

    for frame in frames {
        if frame.service != service {
            warn!(
                expected = %service,
                got = %frame.service,
                "multiple services in one label call, keeping the first"
            );
            continue;
        }

        for record in &frame.content {
            let Some(key) = record.get("key").and_then(Value::as_str) else {
                debug!(service = %service, "record without key dropped");
                continue;
            };
            let labeled = match decoder {
                DecoderKind::Flat => label_record(record, schema),
                DecoderKind::Book => label_book_record(record, schema),
            };
            entries.insert(key.to_string(), labeled);
        }
    }

    Some(LabeledMessage { service, entries })
}

/// Relabel one flat record: schema keys become names, the rest pass through
pub fn label_record(record: &Value, schema: &ServiceSchema) -> Value {
    let Some(object) = record.as_object() else {
        return record.clone();
    };

    let mut labeled = Map::new();
    for (key, value) in object {
        match schema.label(key) {
            Some(name) => labeled.insert(name.to_string(), value.clone()),
            None => labeled.insert(key.clone(), value.clone()),
        };
    }
    Value::Object(labeled)
}

/// Relabel one order-book record.
///
/// Two-level: the bid list (field 2) and ask list (field 3) are each
/// relabeled entry by entry with their side schema, and every entry's
/// nested per-exchange array (field 3) with the exchange schema, before
/// the flat top-level relabel. List order and length are preserved.
pub fn label_book_record(record: &Value, schema: &ServiceSchema) -> Value {
    let Some(object) = record.as_object() else {
        return record.clone();
    };

    let mut staged = object.clone();
    if let Some(Value::Array(bids)) = staged.get_mut("2") {
        for entry in bids.iter_mut() {
            *entry = label_book_entry(entry, &fields::BOOK_BIDS);
        }
    }
    if let Some(Value::Array(asks)) = staged.get_mut("3") {
        for entry in asks.iter_mut() {
            *entry = label_book_entry(entry, &fields::BOOK_ASKS);
        }
    }

    label_record(&Value::Object(staged), schema)
}

fn label_book_entry(entry: &Value, side_schema: &ServiceSchema) -> Value {
    let Some(object) = entry.as_object() else {
        return entry.clone();
    };

    let mut staged = object.clone();
    if let Some(Value::Array(exchanges)) = staged.get_mut("3") {
        for exchange in exchanges.iter_mut() {
            *exchange = label_record(exchange, &fields::BOOK_EXCHANGE);
        }
    }

    label_record(&Value::Object(staged), side_schema)
}
