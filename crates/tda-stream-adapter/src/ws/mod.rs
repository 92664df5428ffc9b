/*
[INPUT]:  Streamer session identity and application callbacks
[OUTPUT]: One multiplexed live data stream fanned out to handlers
[POS]:    WebSocket layer - connection, correlation, dispatch
[UPDATE]: When connection or dispatch behavior changes
*/

pub mod client;
pub mod connection;
pub mod correlator;
pub mod handler;

pub use client::{StreamEvent, TdaStreamClient};
pub use connection::StreamConnection;
pub use correlator::{PendingRequest, RequestCorrelator};
pub use handler::{HandlerError, HandlerFn, HandlerFuture, handler_fn};
