// ============================================
// File: crates/deco-client/src/services/mod.rs
// ============================================
//! # Session Services
//!
//! ## Creation Reason
//! The stateful half of the protocol: key negotiation, per-session
//! state and the envelope send path, separated from the public facade.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`negotiator`]: the two unauthenticated key round trips
//! - [`session`]: keys, token and sequence counter of one session
//! - [`envelope`]: seal, send and open one encrypted request
//!
//! ## Service Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DecoClient                            │
//! │                           │                                 │
//! │          ┌────────────────┼──────────────────┐              │
//! │          ▼                ▼                  ▼              │
//! │   ┌─────────────┐  ┌─────────────┐   ┌──────────────┐       │
//! │   │KeyNegotiator│  │SessionState │◄──│SessionEnvelope│      │
//! │   │ keys / auth │  │ (Mutex)     │   │ seal/post/open│      │
//! │   └──────┬──────┘  └─────────────┘   └──────┬───────┘       │
//! │          └───────────────┬──────────────────┘               │
//! │                          ▼                                  │
//! │                   HttpTransport                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Last Modified
//! v0.1.0 - Initial services

pub mod envelope;
pub mod negotiator;
pub mod session;

pub use envelope::{EnvelopeCall, EnvelopeTarget, SessionEnvelope};
pub use negotiator::KeyNegotiator;
pub use session::{SessionKeys, SessionState};

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};

/// Runs `fut` to completion unless `cancel` fires first.
pub(crate) async fn cancellable<F, T>(cancel: Option<&CancellationToken>, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(ClientError::Cancelled),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_completes() {
        let token = CancellationToken::new();
        assert_eq!(cancellable(Some(&token), async { 7 }).await.unwrap(), 7);
        assert_eq!(cancellable(None, async { 8 }).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_cancellable_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let err = cancellable(Some(&token), std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
    }
}
