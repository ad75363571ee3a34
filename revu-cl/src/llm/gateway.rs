//! Completion gateway trait and error taxonomy
//!
//! One invocation = one upstream request. The gateway does no batching, no
//! retries and no streaming; concurrency and failure isolation are the
//! batch classifier's job.

use async_trait::async_trait;
use thiserror::Error;

/// Errors completing a single classification request
///
/// Every upstream failure mode carries its own variant so callers never
/// have to inspect message text to tell them apart. The batch classifier
/// treats all of them identically; the distinction exists for logs and
/// for gateway implementations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials were rejected by the endpoint
    #[error("Authentication rejected by completion endpoint")]
    AuthRejected,

    /// Endpoint signalled request throttling
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("Completion endpoint error {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not decode
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// A well-formed response carrying no completion text
    #[error("Completion response contained no alternatives")]
    EmptyCompletion,
}

/// A text-completion backend: one system instruction and one user message
/// in, one completion string out.
///
/// Implementations may be HTTP clients, SDK wrappers or test doubles; the
/// calling contract does not change. All implementations must be shareable
/// across concurrently running classification units.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Issue one completion request for one review
    async fn complete(&self, system_prompt: &str, user_text: &str)
        -> Result<String, GatewayError>;
}
