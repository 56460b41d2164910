/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use derive_new::new;
use static_assertions::assert_not_impl_any;
use tracing::{debug, instrument, trace, warn};

use crate::common::config::CONFIG;
use crate::common::{
    ComponentHandle, ComponentId, ConduitConfig, EndpointId, RegistryStats, RemovalReport,
};
use crate::endpoint::{EventSink, EventSource, SignalSink, SignalSource, ValueSink, ValueSource};
use crate::message::ChannelError;
use crate::traits::{
    ChannelPayload, Delivery, Endpoint, EventReceiver, SignalReceiver, ValueObserver,
};

/// The single authority over connection state.
///
/// The registry records which sinks are wired to which sources for all three
/// channel kinds, routes event and signal firings, and purges every record
/// touching a component when that component is torn down.
///
/// * Value channels are kept as a list of (source, sink) pairs. The pair only
///   exists so teardown can find and reset the sink; reads never go through
///   the registry.
/// * Event and signal channels are kept as maps from a source to its ordered
///   receiver list. Connecting the same sink twice adds a second entry.
///
/// `connect_*` and `disconnect_*` are generic over the payload type, so a
/// source and sink of different types cannot be wired together:
///
/// ```compile_fail
/// use conduit::prelude::*;
///
/// struct Listener {
///     input: EventSink<String>,
/// }
///
/// impl Listener {
///     fn on_text(&mut self, _text: String) -> HandlerResult {
///         Ok(())
///     }
/// }
///
/// let registry = ConnectionRegistry::new();
/// let handle = ComponentHandle::new("mismatch").unwrap();
/// let source: EventSource<i32> = EventSource::new(&handle);
/// let listener = new_component(|me| Listener {
///     input: EventSink::new(&handle, me, Listener::on_text),
/// });
/// registry.connect_event(&source, &listener.borrow().input);
/// ```
///
/// The registry is a cheap handle: clones share the same state. It is created
/// once, passed to whoever wires components, and must outlive every component
/// it serves. Sources hold only a weak reference to it. It is single-threaded
/// by construction (neither `Send` nor `Sync`).
///
/// # Teardown contract
///
/// The owner of a component must call [`remove_all`](Self::remove_all) for it
/// exactly once, before the component is dropped and while no firing that
/// involves it is in progress.
#[derive(Clone)]
pub struct ConnectionRegistry {
    core: Rc<RegistryCore>,
}

assert_not_impl_any!(ConnectionRegistry: Send, Sync);

/// Shared state behind every clone of a [`ConnectionRegistry`].
pub(crate) struct RegistryCore {
    connections: RefCell<Connections>,
    config: ConduitConfig,
    depth: Cell<usize>,
}

#[derive(Default)]
struct Connections {
    values: Vec<ValueConnection>,
    events: HashMap<EndpointId, Route<dyn EventReceiver>>,
    signals: HashMap<EndpointId, Route<dyn SignalReceiver>>,
}

#[derive(new)]
struct ValueConnection {
    source: EndpointId,
    source_owner: ComponentId,
    sink: EndpointId,
    sink_owner: ComponentId,
    observer: Weak<dyn ValueObserver>,
}

impl ValueConnection {
    fn involves(&self, component: ComponentId) -> bool {
        self.source_owner == component || self.sink_owner == component
    }
}

/// Ordered receivers of one push source.
struct Route<R: ?Sized> {
    source_owner: ComponentId,
    receivers: Vec<Rc<R>>,
}

impl<R: ?Sized + Endpoint> Route<R> {
    fn with_capacity(source_owner: ComponentId, capacity: usize) -> Self {
        Self {
            source_owner,
            receivers: Vec::with_capacity(capacity),
        }
    }

    /// Removes the first entry for `sink`.
    fn remove_first(&mut self, sink: EndpointId) -> bool {
        match self.receivers.iter().position(|r| r.endpoint_id() == sink) {
            Some(index) => {
                self.receivers.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Pushes `sink` onto the route of `source`, creating the route on first use.
fn add_receiver<R: ?Sized + Endpoint>(
    routes: &mut HashMap<EndpointId, Route<R>>,
    source: EndpointId,
    source_owner: ComponentId,
    capacity: usize,
    sink: Rc<R>,
) -> usize {
    let route = routes
        .entry(source)
        .or_insert_with(|| Route::with_capacity(source_owner, capacity));
    route.receivers.push(sink);
    route.receivers.len()
}

/// Removes the first entry for `sink` on the route of `source`, dropping the route if it empties.
fn remove_receiver<R: ?Sized + Endpoint>(
    routes: &mut HashMap<EndpointId, Route<R>>,
    source: EndpointId,
    sink: EndpointId,
) -> bool {
    let Some(route) = routes.get_mut(&source) else {
        return false;
    };
    let removed = route.remove_first(sink);
    if route.receivers.is_empty() {
        routes.remove(&source);
    }
    removed
}

/// Drops every route owned by `component` and every entry whose sink it owns.
///
/// Returns `(routes removed, receiver entries removed)`.
fn prune_routes<R: ?Sized + Endpoint>(
    routes: &mut HashMap<EndpointId, Route<R>>,
    component: ComponentId,
) -> (usize, usize) {
    let mut routes_removed = 0;
    let mut receivers_removed = 0;
    routes.retain(|_, route| {
        if route.source_owner == component {
            routes_removed += 1;
            receivers_removed += route.receivers.len();
            return false;
        }
        let before = route.receivers.len();
        route.receivers.retain(|r| r.owner() != component);
        receivers_removed += before - route.receivers.len();
        if route.receivers.is_empty() {
            routes_removed += 1;
            false
        } else {
            true
        }
    });
    (routes_removed, receivers_removed)
}

fn receiver_total<R: ?Sized>(routes: &HashMap<EndpointId, Route<R>>) -> usize {
    routes.values().map(|route| route.receivers.len()).sum()
}

/// Tracks dispatch nesting for the lifetime of one dispatch.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl RegistryCore {
    fn enter_dispatch(&self) -> Result<DepthGuard<'_>, ChannelError> {
        let depth = self.depth.get() + 1;
        if let Some(limit) = self.config.dispatch_depth_limit() {
            if depth > limit {
                return Err(ChannelError::DispatchDepthExceeded { limit });
            }
        }
        self.depth.set(depth);
        Ok(DepthGuard(&self.depth))
    }

    /// Routes one event firing from `source` to its receivers.
    ///
    /// The receiver list is copied before the first handler runs, so handlers
    /// may connect, disconnect or fire freely; such changes apply to the next
    /// firing.
    pub(crate) fn dispatch_event(
        &self,
        source: EndpointId,
        payload: Box<dyn ChannelPayload>,
    ) -> Result<(), ChannelError> {
        let receivers: Vec<Rc<dyn EventReceiver>> =
            match self.connections.borrow().events.get(&source) {
                Some(route) => route.receivers.clone(),
                None => Vec::new(),
            };
        let Some((last, rest)) = receivers.split_last() else {
            trace!(%source, "event fired with no receivers");
            return Ok(());
        };
        let _depth = self.enter_dispatch()?;
        trace!(%source, receivers = receivers.len(), payload = ?payload, "dispatching event");

        for receiver in rest {
            self.deliver_event(source, receiver, dyn_clone::clone_box(&*payload))?;
        }
        self.deliver_event(source, last, payload)
    }

    fn deliver_event(
        &self,
        source: EndpointId,
        receiver: &Rc<dyn EventReceiver>,
        payload: Box<dyn ChannelPayload>,
    ) -> Result<(), ChannelError> {
        if self.config.diagnostics.trace_dispatch {
            trace!(
                %source,
                sink = %receiver.endpoint_id(),
                receiver = %receiver.owner(),
                payload_type = receiver.payload_type(),
                "delivering event"
            );
        }
        let delivery = receiver.receive(payload)?;
        self.note_delivery(source, receiver.endpoint_id(), receiver.owner(), delivery);
        Ok(())
    }

    /// Routes one signal firing from `source` to its receivers.
    pub(crate) fn dispatch_signal(&self, source: EndpointId) -> Result<(), ChannelError> {
        let receivers: Vec<Rc<dyn SignalReceiver>> =
            match self.connections.borrow().signals.get(&source) {
                Some(route) => route.receivers.clone(),
                None => Vec::new(),
            };
        if receivers.is_empty() {
            trace!(%source, "signal fired with no receivers");
            return Ok(());
        }
        let _depth = self.enter_dispatch()?;
        trace!(%source, receivers = receivers.len(), "dispatching signal");

        for receiver in &receivers {
            if self.config.diagnostics.trace_dispatch {
                trace!(%source, sink = %receiver.endpoint_id(), receiver = %receiver.owner(), "delivering signal");
            }
            let delivery = receiver.receive()?;
            self.note_delivery(source, receiver.endpoint_id(), receiver.owner(), delivery);
        }
        Ok(())
    }

    fn note_delivery(
        &self,
        source: EndpointId,
        sink: EndpointId,
        receiver: ComponentId,
        delivery: Delivery,
    ) {
        if delivery == Delivery::TargetDropped {
            warn!(
                %source,
                %sink,
                %receiver,
                "receiver component was dropped without remove_all; delivery skipped"
            );
        }
    }
}

impl ConnectionRegistry {
    /// Creates an empty registry using the global [`CONFIG`](crate::common::config::CONFIG).
    pub fn new() -> Self {
        Self::with_config(CONFIG.clone())
    }

    /// Creates an empty registry with an explicit configuration.
    pub fn with_config(config: ConduitConfig) -> Self {
        Self {
            core: Rc::new(RegistryCore {
                connections: RefCell::new(Connections::default()),
                config,
                depth: Cell::new(0),
            }),
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &ConduitConfig {
        &self.core.config
    }

    /// Connects a value sink to a value source.
    ///
    /// On success the sink reads through to `source` until disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::RedundantConnection`] if the sink is already
    /// connected. The request is dropped, the existing connection is kept, and
    /// a warning is logged unless `diagnostics.report_redundant_connections`
    /// is off. Disconnect first to rewire a sink.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn connect_value<T: 'static>(
        &self,
        source: &ValueSource<T>,
        sink: &ValueSink<T>,
    ) -> Result<(), ChannelError> {
        if let Some(existing) = sink.source() {
            if self.core.config.diagnostics.report_redundant_connections {
                warn!(
                    value_type = std::any::type_name::<T>(),
                    %existing,
                    "value sink already has a connection; request dropped"
                );
            }
            return Err(ChannelError::RedundantConnection {
                sink: sink.endpoint_id(),
                source: source.endpoint_id(),
                existing,
            });
        }

        let mut connections = self.core.connections.borrow_mut();
        // Any pair still naming this sink points at a source that no longer exists.
        connections.values.retain(|c| c.sink != sink.endpoint_id());
        sink.attach(source);
        connections.values.push(ValueConnection::new(
            source.endpoint_id(),
            source.owner(),
            sink.endpoint_id(),
            sink.owner(),
            sink.observer(),
        ));
        trace!("value connected");
        Ok(())
    }

    /// Disconnects a value sink from a value source.
    ///
    /// The sink is reset whenever it points at `source`, so it cannot keep
    /// reading after this call even if no record matched. Returns whether a
    /// record was removed.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn disconnect_value<T: 'static>(&self, source: &ValueSource<T>, sink: &ValueSink<T>) -> bool {
        let mut connections = self.core.connections.borrow_mut();
        let before = connections.values.len();
        connections
            .values
            .retain(|c| !(c.source == source.endpoint_id() && c.sink == sink.endpoint_id()));
        let removed = connections.values.len() < before;
        sink.detach_from(source.endpoint_id());
        trace!(removed, "value disconnected");
        removed
    }

    /// Appends `sink` to the receivers of `source` and binds `source` to this registry.
    ///
    /// Connecting the same pair twice delivers each firing twice.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn connect_event<M: ChannelPayload>(&self, source: &EventSource<M>, sink: &EventSink<M>) {
        source.core().bind(&self.core);
        let receivers = add_receiver(
            &mut self.core.connections.borrow_mut().events,
            source.endpoint_id(),
            source.owner(),
            self.core.config.limits.receiver_list_capacity,
            sink.receiver(),
        );
        trace!(receivers, "event connected");
    }

    /// Removes the first entry of `sink` from the receivers of `source`.
    ///
    /// Returns whether an entry was removed.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn disconnect_event<M: ChannelPayload>(
        &self,
        source: &EventSource<M>,
        sink: &EventSink<M>,
    ) -> bool {
        let removed = remove_receiver(
            &mut self.core.connections.borrow_mut().events,
            source.endpoint_id(),
            sink.endpoint_id(),
        );
        trace!(removed, "event disconnected");
        removed
    }

    /// Appends `sink` to the receivers of `source` and binds `source` to this registry.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn connect_signal(&self, source: &SignalSource, sink: &SignalSink) {
        source.core().bind(&self.core);
        let receivers = add_receiver(
            &mut self.core.connections.borrow_mut().signals,
            source.endpoint_id(),
            source.owner(),
            self.core.config.limits.receiver_list_capacity,
            sink.receiver(),
        );
        trace!(receivers, "signal connected");
    }

    /// Removes the first entry of `sink` from the receivers of `source`.
    #[instrument(skip_all, fields(source = %source.endpoint_id(), sink = %sink.endpoint_id()))]
    pub fn disconnect_signal(&self, source: &SignalSource, sink: &SignalSink) -> bool {
        let removed = remove_receiver(
            &mut self.core.connections.borrow_mut().signals,
            source.endpoint_id(),
            sink.endpoint_id(),
        );
        trace!(removed, "signal disconnected");
        removed
    }

    /// Purges every connection `component` takes part in.
    ///
    /// * value pairs where it owns the source or the sink (the sink is reset);
    /// * event and signal routes of sources it owns;
    /// * its sinks' entries in every other source's receiver list.
    ///
    /// Call exactly once per component, before it is dropped.
    #[instrument(skip_all, fields(component = %component))]
    pub fn remove_all(&self, component: &ComponentHandle) -> RemovalReport {
        let id = component.id();
        let mut report = RemovalReport::default();

        let detached: Vec<(Weak<dyn ValueObserver>, EndpointId)> = {
            let mut connections = self.core.connections.borrow_mut();
            let mut detached = Vec::new();
            connections.values.retain(|c| {
                if c.involves(id) {
                    detached.push((c.observer.clone(), c.source));
                    false
                } else {
                    true
                }
            });
            report.value_connections = detached.len();
            (report.event_routes, report.event_receivers) = prune_routes(&mut connections.events, id);
            (report.signal_routes, report.signal_receivers) =
                prune_routes(&mut connections.signals, id);
            detached
        };

        for (observer, source) in detached {
            if let Some(sink) = observer.upgrade() {
                sink.detach_from(source);
            }
        }

        debug!(?report, "component connections removed");
        report
    }

    /// Counts the records currently held.
    pub fn stats(&self) -> RegistryStats {
        let connections = self.core.connections.borrow();
        RegistryStats::new(
            connections.values.len(),
            connections.events.len(),
            receiver_total(&connections.events),
            connections.signals.len(),
            receiver_total(&connections.signals),
        )
    }

    /// True when no connection of any kind is recorded.
    pub fn is_empty(&self) -> bool {
        self.stats().is_empty()
    }

    /// Number of receiver entries connected to `source`.
    pub fn event_receiver_count<M: ChannelPayload>(&self, source: &EventSource<M>) -> usize {
        self.core
            .connections
            .borrow()
            .events
            .get(&source.endpoint_id())
            .map_or(0, |route| route.receivers.len())
    }

    /// Number of receiver entries connected to `source`.
    pub fn signal_receiver_count(&self, source: &SignalSource) -> usize {
        self.core
            .connections
            .borrow()
            .signals
            .get(&source.endpoint_id())
            .map_or(0, |route| route.receivers.len())
    }

    /// Whether this registry records a connection between `source` and `sink`.
    pub fn is_value_connected<T: 'static>(&self, source: &ValueSource<T>, sink: &ValueSink<T>) -> bool {
        self.core
            .connections
            .borrow()
            .values
            .iter()
            .any(|c| c.source == source.endpoint_id() && c.sink == sink.endpoint_id())
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("stats", &self.stats())
            .field("config", &self.core.config)
            .finish()
    }
}
