//! Stand-ins for the platform objects produced by negotiation.

mod data_track_transceiver;
mod media_stream_track;
mod rtc_peer_connection;

pub use self::{
    data_track_transceiver::DataTrackTransceiver,
    media_stream_track::MediaStreamTrack,
    rtc_peer_connection::RtcPeerConnection,
};

/// Transport object carrying the payload of a remote track.
#[derive(Clone, Debug, PartialEq)]
pub enum Transceiver {
    Media(MediaStreamTrack),
    Data(DataTrackTransceiver),
}

impl Transceiver {
    /// Returns the [`MediaStreamTrack`] if this is a media transceiver.
    pub fn media_track(&self) -> Option<&MediaStreamTrack> {
        match self {
            Transceiver::Media(track) => Some(track),
            Transceiver::Data(_) => None,
        }
    }
}

impl From<MediaStreamTrack> for Transceiver {
    fn from(track: MediaStreamTrack) -> Self {
        Transceiver::Media(track)
    }
}

impl From<DataTrackTransceiver> for Transceiver {
    fn from(transceiver: DataTrackTransceiver) -> Self {
        Transceiver::Data(transceiver)
    }
}
