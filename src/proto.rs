//! Track-state messages as delivered by the signaling transport.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of media carried by a remote track.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(TrackKind::Audio),
            "video" => Ok(TrackKind::Video),
            other => Err(Error::UnknownTrackKind(other.to_string())),
        }
    }
}

/// Full snapshot of a remote track's identity and enabled flag.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TrackState {
    pub id: String,
    pub sid: String,
    pub name: String,
    pub kind: TrackKind,
    pub enabled: bool,
}

/// Partial update of a remote track.
///
/// Identity fields sent along with the patch are ignored on decoding.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TrackPatch {
    pub enabled: bool,
}

/// Anything carrying the `enabled` flag of a remote track.
pub trait TrackUpdate {
    fn enabled(&self) -> bool;
}

impl TrackUpdate for TrackState {
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl TrackUpdate for TrackPatch {
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl From<&TrackState> for TrackPatch {
    fn from(state: &TrackState) -> Self {
        Self {
            enabled: state.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_track_state_from_json() {
        let state: TrackState = serde_json::from_str(
            r#"{"id":"T1","sid":"MT1","name":"n","kind":"audio","enabled":true}"#,
        )
        .unwrap();

        assert_eq!(state.id, "T1");
        assert_eq!(state.sid, "MT1");
        assert_eq!(state.name, "n");
        assert_eq!(state.kind, TrackKind::Audio);
        assert!(state.enabled);
    }

    #[test]
    fn patch_ignores_identity_fields() {
        let patch: TrackPatch = serde_json::from_str(
            r#"{"id":"other","sid":"MT9","kind":"video","enabled":false}"#,
        )
        .unwrap();

        assert_eq!(patch, TrackPatch { enabled: false });
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!("video".parse::<TrackKind>(), Ok(TrackKind::Video));
        assert_eq!(
            "data".parse::<TrackKind>(),
            Err(Error::UnknownTrackKind("data".to_string())),
        );
        assert!(serde_json::from_str::<TrackKind>(r#""data""#).is_err());
    }

    #[test]
    fn kind_displays_as_wire_name() {
        assert_eq!(TrackKind::Audio.to_string(), "audio");
        assert_eq!(TrackKind::Video.to_string(), "video");
    }
}
