//! Signaling-side representation of a track published by a remote member.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use futures::{
    future::LocalBoxFuture, stream::LocalBoxStream, FutureExt as _,
    StreamExt as _,
};
use medea_reactive::ObservableCell;
use tokio::task::spawn_local;
use tracing::{debug, trace};

use crate::{
    deferred::Deferred,
    error::{Error, Result},
    proto::{TrackKind, TrackState, TrackUpdate},
    sys::Transceiver,
};

/// Handle of a [`RemoteTrack::on_updated`] subscription.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&RemoteTrack)>;

struct Subscriber {
    id: SubscriptionId,
    once: bool,
    handler: Handler,
}

/// Remote track as seen by signaling.
///
/// Identity is fixed at construction. The only mutable state is the
/// `enabled` flag, and every path changing it goes through
/// [`RemoteTrack::enable`], so subscribers are notified exactly once per
/// actual transition and never on no-op writes.
///
/// The [`Transceiver`] of the track arrives from negotiation on its own
/// schedule and may be requested before or after it is bound.
pub struct RemoteTrack {
    id: String,
    sid: String,
    name: String,
    kind: TrackKind,
    enabled: ObservableCell<bool>,
    subscribers: RefCell<Vec<Subscriber>>,
    last_subscription_id: Cell<u64>,
    transceiver: Deferred<Transceiver>,
}

impl RemoteTrack {
    /// Creates a new [`RemoteTrack`] from the initial [`TrackState`].
    ///
    /// No notification is fired.
    pub fn new(state: TrackState) -> Rc<Self> {
        let TrackState {
            id,
            sid,
            name,
            kind,
            enabled,
        } = state;
        trace!(%id, %sid, %kind, enabled, "RemoteTrack created");

        Rc::new(Self {
            id,
            sid,
            name,
            kind,
            enabled: ObservableCell::new(enabled),
            subscribers: RefCell::new(Vec::new()),
            last_subscription_id: Cell::new(0),
            transceiver: Deferred::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Sets the `enabled` flag, notifying subscribers if it changed.
    pub fn enable(&self, enabled: bool) -> &Self {
        if self.enabled.get() != enabled {
            self.enabled.set(enabled);
            debug!(sid = %self.sid, enabled, "RemoteTrack updated");
            self.notify_updated();
        }
        self
    }

    /// Same as `enable(true)`.
    pub fn enable_default(&self) -> &Self {
        self.enable(true)
    }

    /// Same as `enable(false)`.
    pub fn disable(&self) -> &Self {
        self.enable(false)
    }

    /// Applies a snapshot received from signaling.
    ///
    /// Only `enabled` is taken into account, identity never changes.
    pub fn update<U: TrackUpdate + ?Sized>(&self, update: &U) -> &Self {
        self.enable(update.enabled())
    }

    /// Registers a `handler` called synchronously on every transition of
    /// this [`RemoteTrack`].
    pub fn on_updated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&RemoteTrack) + 'static,
    {
        self.add_subscriber(Rc::new(handler), false)
    }

    /// Registers a `handler` called on the next transition only.
    pub fn once_updated<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&RemoteTrack) + 'static,
    {
        self.add_subscriber(Rc::new(handler), true)
    }

    /// Removes the subscription, returning `false` if it was already gone.
    pub fn off_updated(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Returns a [`LocalBoxStream`] yielding the current `enabled` value and
    /// then every change of it.
    pub fn subscribe_enabled(&self) -> LocalBoxStream<'static, bool> {
        self.enabled.subscribe().boxed_local()
    }

    /// Resolves once `enabled` equals the provided value.
    pub fn when_enabled(
        &self,
        enabled: bool,
    ) -> LocalBoxFuture<'static, Result<()>> {
        self.enabled
            .when_eq(enabled)
            .map(|res| res.map_err(|_| Error::TrackDropped))
            .boxed_local()
    }

    /// Requests the [`Transceiver`] of this [`RemoteTrack`].
    ///
    /// Resolves with the current one if already bound, otherwise with the
    /// first one bound via [`RemoteTrack::set_transceiver`].
    pub fn transceiver(
        &self,
    ) -> LocalBoxFuture<'static, Result<Transceiver>> {
        self.transceiver.get()
    }

    /// Binds the [`Transceiver`] produced by negotiation.
    pub fn set_transceiver<T>(&self, transceiver: T) -> &Self
    where
        T: Into<Transceiver>,
    {
        debug!(sid = %self.sid, "RemoteTrack transceiver bound");
        self.transceiver.set(transceiver.into());
        self
    }

    /// Spawns a task mirroring `enabled` onto the [`MediaStreamTrack`] once
    /// it is bound.
    ///
    /// Only the first bound [`Transceiver`] is tracked. Data transceivers
    /// are ignored.
    ///
    /// [`MediaStreamTrack`]: crate::sys::MediaStreamTrack
    pub fn spawn_tasks(&self) {
        let transceiver = self.transceiver();
        let mut on_enabled = self.subscribe_enabled();
        let sid = self.sid.clone();
        spawn_local(async move {
            let track = match transceiver.await {
                Ok(Transceiver::Media(track)) => track,
                Ok(Transceiver::Data(_)) | Err(_) => return,
            };
            while let Some(enabled) = on_enabled.next().await {
                trace!(%sid, enabled, "Syncing MediaStreamTrack");
                track.set_enabled(enabled);
            }
        });
    }

    fn add_subscriber(&self, handler: Handler, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.last_subscription_id.get() + 1);
        self.last_subscription_id.set(id.0);
        self.subscribers
            .borrow_mut()
            .push(Subscriber { id, once, handler });
        id
    }

    fn notify_updated(&self) {
        // Handlers may (un)subscribe or mutate this track re-entrantly.
        let handlers: Vec<Handler> = {
            let mut subscribers = self.subscribers.borrow_mut();
            let handlers =
                subscribers.iter().map(|s| Rc::clone(&s.handler)).collect();
            subscribers.retain(|s| !s.once);
            handlers
        };
        for handler in handlers {
            handler(self);
        }
    }
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("sid", &self.sid)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("enabled", &self.is_enabled())
            .field("transceiver", &self.transceiver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use tokio::task::{self, LocalSet};

    use crate::{
        proto::TrackPatch,
        sys::{DataTrackTransceiver, MediaStreamTrack},
    };

    use super::*;

    fn track(enabled: bool) -> Rc<RemoteTrack> {
        RemoteTrack::new(TrackState {
            id: "T1".to_string(),
            sid: "MT1".to_string(),
            name: "n".to_string(),
            kind: TrackKind::Audio,
            enabled,
        })
    }

    fn count_updates(track: &RemoteTrack) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        track.on_updated({
            let count = Rc::clone(&count);
            move |_| count.set(count.get() + 1)
        });
        count
    }

    async fn settle() {
        for _ in 0..5 {
            task::yield_now().await;
        }
    }

    #[test]
    fn enable_notifies_only_on_transition() {
        for &(from, to) in
            &[(true, true), (true, false), (false, true), (false, false)]
        {
            let track = track(from);
            let updates = count_updates(&track);

            let returned = track.enable(to);

            assert!(std::ptr::eq(returned, &*track));
            assert_eq!(track.is_enabled(), to);
            assert_eq!(updates.get(), u32::from(from != to));
        }
    }

    #[test]
    fn enable_default_enables() {
        let track = track(false);
        let updates = count_updates(&track);

        assert!(std::ptr::eq(track.enable_default(), &*track));
        assert!(track.is_enabled());
        track.enable_default();
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn handler_observes_new_state() {
        let track = track(true);
        let observed = Rc::new(Cell::new(None));
        track.once_updated({
            let observed = Rc::clone(&observed);
            move |t| observed.set(Some(t.is_enabled()))
        });

        track.update(&TrackPatch { enabled: false });

        assert_eq!(observed.get(), Some(false));
    }

    #[test]
    fn once_handler_fires_once() {
        let track = track(true);
        let fired = Rc::new(Cell::new(0));
        track.once_updated({
            let fired = Rc::clone(&fired);
            move |_| fired.set(fired.get() + 1)
        });

        track.disable().enable_default().disable();

        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn off_updated_removes_handler() {
        let track = track(true);
        let fired = Rc::new(Cell::new(false));
        let id = track.on_updated({
            let fired = Rc::clone(&fired);
            move |_| fired.set(true)
        });

        assert!(track.off_updated(id));
        assert!(!track.off_updated(id));
        track.disable();

        assert!(!fired.get());
    }

    #[test]
    fn handler_subscribing_reentrantly_waits_for_next_transition() {
        let track = track(true);
        let inner_fired = Rc::new(Cell::new(0));
        track.once_updated({
            let inner_fired = Rc::clone(&inner_fired);
            move |t| {
                let inner_fired = Rc::clone(&inner_fired);
                t.on_updated(move |_| {
                    inner_fired.set(inner_fired.get() + 1)
                });
            }
        });

        track.disable();
        assert_eq!(inner_fired.get(), 0);

        track.enable_default();
        assert_eq!(inner_fired.get(), 1);
    }

    #[test]
    fn update_ignores_identity() {
        let track = track(true);

        track.update(&TrackState {
            id: "T2".to_string(),
            sid: "MT2".to_string(),
            name: "other".to_string(),
            kind: TrackKind::Video,
            enabled: false,
        });

        assert_eq!(track.id(), "T1");
        assert_eq!(track.sid(), "MT1");
        assert_eq!(track.name(), "n");
        assert_eq!(track.kind(), TrackKind::Audio);
        assert!(!track.is_enabled());
    }

    #[tokio::test]
    async fn enabled_stream_yields_transitions_only() {
        let track = track(true);
        let on_enabled = track.subscribe_enabled();

        track.enable(true).disable().disable().enable_default();
        drop(track);

        let values: Vec<bool> = on_enabled.collect().await;
        assert_eq!(values, vec![true, false, true]);
    }

    #[tokio::test]
    async fn when_enabled_resolves_on_transition() {
        let track = track(false);
        let when_enabled = track.when_enabled(true);

        track.enable_default();

        assert_eq!(when_enabled.await, Ok(()));
    }

    #[tokio::test]
    async fn transceiver_resolves_in_any_order() {
        let track = track(true);
        let media: Transceiver =
            MediaStreamTrack::new("T1", TrackKind::Audio).into();

        let early = track.transceiver();
        let returned = track.set_transceiver(media.clone());
        assert!(std::ptr::eq(returned, &*track));
        let late = track.transceiver();

        assert_eq!(early.await, Ok(media.clone()));
        assert_eq!(late.await, Ok(media));
    }

    #[tokio::test]
    async fn spawned_task_mirrors_enabled_onto_media_track() {
        LocalSet::new()
            .run_until(async {
                let track = track(false);
                let media = MediaStreamTrack::new("T1", TrackKind::Audio);
                track.spawn_tasks();
                settle().await;
                assert!(media.enabled());

                track.set_transceiver(media.clone());
                settle().await;
                assert!(!media.enabled());

                track.enable_default();
                settle().await;
                assert!(media.enabled());
            })
            .await;
    }

    #[tokio::test]
    async fn spawned_task_ignores_data_transceiver() {
        LocalSet::new()
            .run_until(async {
                let track = track(true);
                track.spawn_tasks();
                track.set_transceiver(DataTrackTransceiver::new("D1"));
                track.disable();
                settle().await;

                assert_eq!(
                    track.transceiver().await,
                    Ok(DataTrackTransceiver::new("D1").into()),
                );
            })
            .await;
    }
}
