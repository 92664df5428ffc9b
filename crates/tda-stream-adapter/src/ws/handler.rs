/*
[INPUT]:  Application callbacks and their bound service schemas
[OUTPUT]: Registered handlers ready for dispatch
[POS]:    WebSocket layer - handler registration types
[UPDATE]: When the handler calling convention changes
*/

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::codec::LabeledMessage;
use crate::fields::ServiceSchema;

/// Error type deferred handler work may fail with
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Deferred handler work, spawned by the dispatch loop rather than awaited
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = std::result::Result<(), HandlerError>> + Send>>;

/// A stream handler callback.
///
/// Called once per labeled message, in registration order. Returning
/// `Some(future)` hands the rest of the work to an independent task so a
/// slow handler cannot delay delivery to later handlers or the next
/// inbound message.
pub type HandlerFn = dyn Fn(LabeledMessage) -> Option<HandlerFuture> + Send + Sync;

/// Wrap a closure as a shareable stream handler
pub fn handler_fn<F>(func: F) -> Arc<HandlerFn>
where
    F: Fn(LabeledMessage) -> Option<HandlerFuture> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// One registration: a callback bound to the schema it decodes with.
///
/// Removal is by exact match of callback identity and schema.
#[derive(Clone)]
pub(crate) struct StreamHandler {
    pub func: Arc<HandlerFn>,
    pub schema: ServiceSchema,
}

impl StreamHandler {
    pub(crate) fn matches(&self, func: &Arc<HandlerFn>, schema: &ServiceSchema) -> bool {
        Arc::ptr_eq(&self.func, func) && self.schema == *schema
    }
}
