use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::proto::TrackKind;

use super::{MediaStreamTrack, Transceiver};

/// Simulated latency of every negotiation step.
const NEGOTIATION_STEP: Duration = Duration::from_millis(500);

/// Negotiation side producing [`Transceiver`]s for remote tracks.
#[derive(Clone, Debug, Default)]
pub struct RtcPeerConnection;

impl RtcPeerConnection {
    pub fn new() -> Self {
        RtcPeerConnection
    }

    pub async fn set_remote_offer(&self, offer: String) {
        debug!(%offer, "Set remote offer");
        sleep(NEGOTIATION_STEP).await;
    }

    /// Resolves once the remote `track_id` got its [`Transceiver`].
    pub async fn add_transceiver(
        &self,
        track_id: &str,
        kind: TrackKind,
    ) -> Transceiver {
        debug!(track_id, %kind, "Add transceiver");
        sleep(NEGOTIATION_STEP).await;

        MediaStreamTrack::new(track_id, kind).into()
    }
}
