use thiserror::Error;

/// Errors surfaced by the remote track signaling primitives.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Track kind received in text form is neither `audio` nor `video`.
    #[error("unknown track kind: {0}")]
    UnknownTrackKind(String),

    /// [`Deferred`] slot was dropped while the request was still pending.
    ///
    /// [`Deferred`]: crate::Deferred
    #[error("transceiver slot was dropped before a value was bound")]
    TransceiverDropped,

    /// [`RemoteTrack`] was dropped while its state was still awaited.
    ///
    /// [`RemoteTrack`]: crate::RemoteTrack
    #[error("remote track was dropped")]
    TrackDropped,
}

pub type Result<T> = std::result::Result<T, Error>;
