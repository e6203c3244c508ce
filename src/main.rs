use std::{rc::Rc, time::Duration};

use remote_track_signaling::{
    proto::{TrackPatch, TrackState},
    sys::RtcPeerConnection,
    RemoteTrack,
};
use tokio::{task, task::spawn_local};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Track state as it arrives from the signaling server.
const TRACK_PUBLISHED: &str = r#"{
    "id": "T1",
    "sid": "MT1",
    "name": "microphone",
    "kind": "audio",
    "enabled": true
}"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    task::LocalSet::new()
        .run_until(async {
            let state: TrackState = match serde_json::from_str(TRACK_PUBLISHED)
            {
                Ok(state) => state,
                Err(e) => {
                    error!(%e, "Malformed track state");
                    return;
                }
            };
            let track = RemoteTrack::new(state);
            track.on_updated(|track| {
                info!(
                    sid = track.sid(),
                    enabled = track.is_enabled(),
                    "Track updated",
                );
            });
            track.spawn_tasks();

            // Consumer asks for the transceiver before negotiation is done.
            let attached = spawn_local({
                let transceiver = track.transceiver();
                async move {
                    match transceiver.await {
                        Ok(transceiver) => {
                            info!(?transceiver, "Transceiver attached")
                        }
                        Err(e) => error!(%e, "Transceiver never arrived"),
                    }
                }
            });

            spawn_local({
                let track = Rc::clone(&track);
                async move {
                    let peer = RtcPeerConnection::new();
                    peer.set_remote_offer("SDP OFFER".to_string()).await;
                    let transceiver =
                        peer.add_transceiver(track.id(), track.kind()).await;
                    track.set_transceiver(transceiver);
                }
            });

            track.update(&TrackPatch { enabled: false });
            // Same state again, nobody gets notified.
            track.update(&TrackPatch { enabled: false });

            if attached.await.is_err() {
                error!("Attach task panicked");
                return;
            }

            track.enable_default();
            tokio::time::sleep(Duration::from_millis(100)).await;

            if let Ok(transceiver) = track.transceiver().await {
                if let Some(media) = transceiver.media_track() {
                    info!(enabled = media.enabled(), "MediaStreamTrack state");
                }
            }
        })
        .await;
}
