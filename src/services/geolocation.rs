use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::models::GeoPoint;

/// Reasons a position lookup can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("geolocation not supported")]
    Unsupported,

    #[error("provider went away before answering")]
    Dropped,
}

pub type PositionOutcome = Result<GeoPoint, GeolocationError>;

/// Pending answer to a single position lookup
///
/// Resolves exactly once. Awaiting consumes it, so a lookup cannot be read
/// twice; a provider that drops its sender resolves to `Dropped`.
#[derive(Debug)]
pub struct PositionRequest {
    receiver: oneshot::Receiver<PositionOutcome>,
}

/// Provider side of a `PositionRequest`
#[derive(Debug)]
pub struct PositionSender {
    sender: oneshot::Sender<PositionOutcome>,
}

impl PositionSender {
    /// Deliver the answer. A receiver that is already gone is not an error.
    pub fn send(self, outcome: PositionOutcome) {
        if self.sender.send(outcome).is_err() {
            tracing::debug!("Position answer discarded, nobody is waiting");
        }
    }
}

impl PositionRequest {
    pub fn channel() -> (PositionSender, PositionRequest) {
        let (sender, receiver) = oneshot::channel();
        (PositionSender { sender }, PositionRequest { receiver })
    }

    /// A request whose answer is already known
    pub fn ready(outcome: PositionOutcome) -> Self {
        let (sender, request) = Self::channel();
        sender.send(outcome);
        request
    }
}

impl Future for PositionRequest {
    type Output = PositionOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(GeolocationError::Dropped)))
    }
}

/// Source of the user's current position
pub trait GeolocationProvider {
    /// Start a one-shot lookup. No polling, no retries.
    fn request_current_position(&self) -> PositionRequest;
}

/// Position supplied up front, e.g. coordinates sent by the client
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<GeoPoint>);

impl GeolocationProvider for FixedPosition {
    fn request_current_position(&self) -> PositionRequest {
        PositionRequest::ready(
            self.0
                .ok_or_else(|| GeolocationError::Unavailable("no position supplied".to_string())),
        )
    }
}

/// Platform without any geolocation support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl GeolocationProvider for NoGeolocation {
    fn request_current_position(&self) -> PositionRequest {
        PositionRequest::ready(Err(GeolocationError::Unsupported))
    }
}
