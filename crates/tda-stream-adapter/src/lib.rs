/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public TDA streamer adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod codec;
pub mod error;
pub mod fields;
pub mod services;
pub mod session;
pub mod types;
pub mod ws;

// Re-export commonly used types from the codec
pub use codec::{
    DataFrame,
    Envelope,
    LabeledMessage,
    NotifyFrame,
    ResponseFrame,
};

// Re-export the error types
pub use error::{Result, TdaStreamError};

// Re-export the schema and service tables
pub use fields::ServiceSchema;
pub use services::{DecoderKind, KeySource, ServiceDescriptor, StreamService};

// Re-export the session input
pub use session::StreamerSession;

// Re-export all wire types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    HandlerError,
    HandlerFn,
    HandlerFuture,
    StreamConnection,
    StreamEvent,
    TdaStreamClient,
    handler_fn,
};
