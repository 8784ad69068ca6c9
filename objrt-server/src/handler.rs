//! Per-connection request handling.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use objrt_core::protocol::{
    ErrorEnvelope, FrameError, Request, encode_error, encode_object,
    read_frame, write_frame,
};
use objrt_core::{ErrorKind, PathResolver, RuntimeError};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// What a request turned into, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Object,
    Error(ErrorKind),
    /// No response could be framed; the connection closes silently.
    Dropped,
}

/// Serves exactly one request on `stream`, then closes it.
pub async fn handle_connection<S>(
    mut stream: S,
    peer: &str,
    resolver: &PathResolver,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let payload = match read_frame(&mut stream).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!(peer, error = %err, "dropping connection without a response");
            return Outcome::Dropped;
        }
    };

    let answer = AssertUnwindSafe(respond(resolver, peer, &payload))
        .catch_unwind()
        .await;
    let (response, outcome) = match answer {
        Ok(answer) => answer,
        Err(_) => {
            warn!(peer, "request handler panicked");
            let err =
                RuntimeError::Internal("request handler panicked".to_string());
            envelope_for(&err)
        }
    };

    let outcome = match response {
        Some(bytes) => write_response(&mut stream, peer, &bytes, outcome).await,
        None => Outcome::Dropped,
    };

    if let Err(err) = stream.shutdown().await {
        debug!(peer, error = %err, "shutdown after response failed");
    }
    outcome
}

/// Writes `bytes` as one frame. A body over the frame limit is replaced by
/// a serialization envelope.
async fn write_response<S>(
    stream: &mut S,
    peer: &str,
    bytes: &[u8],
    outcome: Outcome,
) -> Outcome
where
    S: AsyncWrite + Unpin,
{
    match write_frame(stream, bytes).await {
        Ok(()) => outcome,
        Err(FrameError::TooLarge { declared, max }) => {
            let err = RuntimeError::Serialization(format!(
                "response of {declared} bytes exceeds the {max} byte \
                 frame limit"
            ));
            warn!(peer, error = %err, "response too large");
            let (Some(bytes), outcome) = envelope_for(&err) else {
                return Outcome::Dropped;
            };
            match write_frame(stream, &bytes).await {
                Ok(()) => outcome,
                Err(_) => Outcome::Dropped,
            }
        }
        Err(err) => {
            warn!(peer, error = %err, "failed to write response");
            Outcome::Dropped
        }
    }
}

/// Builds the response body for one request payload. `None` means not even
/// an error envelope could be encoded.
pub async fn respond(
    resolver: &PathResolver,
    peer: &str,
    payload: &[u8],
) -> (Option<Vec<u8>>, Outcome) {
    let request = match Request::parse(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(peer, error = %err, "rejected request");
            return envelope_for(&err);
        }
    };

    let result = resolver
        .resolve(request.path())
        .await
        .and_then(|node| encode_object(&node));

    match result {
        Ok(bytes) => {
            info!(
                peer,
                action = request.action(),
                path = request.path(),
                outcome = "object",
                "served request"
            );
            (Some(bytes), Outcome::Object)
        }
        Err(err) => {
            info!(
                peer,
                action = request.action(),
                path = request.path(),
                outcome = err.kind().as_str(),
                "served request"
            );
            if !matches!(err.kind(), ErrorKind::NotFound) {
                warn!(
                    peer,
                    path = request.path(),
                    error = %err,
                    "request failed"
                );
            }
            envelope_for(&err)
        }
    }
}

fn envelope_for(err: &RuntimeError) -> (Option<Vec<u8>>, Outcome) {
    match encode_error(&ErrorEnvelope::from(err)) {
        Ok(bytes) => (Some(bytes), Outcome::Error(err.kind())),
        Err(encode_err) => {
            warn!(error = %encode_err, "failed to encode error envelope");
            (None, Outcome::Dropped)
        }
    }
}
