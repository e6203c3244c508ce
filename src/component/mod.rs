mod remote_track;

pub use self::remote_track::{RemoteTrack, SubscriptionId};
