/// Platform data channel carrying a remote data track.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataTrackTransceiver {
    id: String,
}

impl DataTrackTransceiver {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
