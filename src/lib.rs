//! Signaling-side state of tracks published by remote members.
//!
//! [`RemoteTrack`] mirrors the server-pushed `enabled` flag of a remote track
//! and notifies subscribers on actual transitions only. Its [`Transceiver`]
//! is bound by negotiation through a [`Deferred`] slot and may be requested
//! before or after it arrives.
//!
//! Everything here is single-threaded and meant to run on a
//! [`tokio::task::LocalSet`].
//!
//! [`Transceiver`]: sys::Transceiver

pub mod component;
pub mod deferred;
pub mod error;
pub mod proto;
pub mod sys;

pub use self::{
    component::{RemoteTrack, SubscriptionId},
    deferred::Deferred,
    error::{Error, Result},
};
