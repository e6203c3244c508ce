use std::{cell::Cell, rc::Rc};

use tracing::debug;

use crate::proto::TrackKind;

/// Platform media track received from the remote side.
///
/// Clones are handles to the same underlying track.
#[derive(Clone, Debug)]
pub struct MediaStreamTrack {
    id: String,
    kind: TrackKind,
    enabled: Rc<Cell<bool>>,
}

impl MediaStreamTrack {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            enabled: Rc::new(Cell::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        debug!(id = %self.id, enabled, "MediaStreamTrack enabled changed");
        self.enabled.set(enabled);
    }
}

impl PartialEq for MediaStreamTrack {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.enabled, &other.enabled)
    }
}
