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
use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::common::{ComponentHandle, ComponentId, EndpointId, EventHandler};
use crate::endpoint::{BindingState, SourceCore};
use crate::message::ChannelError;
use crate::traits::{ChannelPayload, Delivery, Endpoint, EventReceiver};

/// Push endpoint that emits payloads of type `M` to every connected [`EventSink<M>`].
///
/// A source learns which registry to route through the first time it is
/// connected. Until then it is [`BindingState::Unbound`] and firing does nothing.
///
/// Cloning a source is shallow: clones share the same identity and binding.
/// Hand a clone to code that needs to fire without borrowing the owning
/// component.
pub struct EventSource<M: ChannelPayload> {
    core: Rc<SourceCore>,
    _payload: PhantomData<fn(M)>,
}

impl<M: ChannelPayload> EventSource<M> {
    /// Creates an unbound source owned by `owner`.
    pub fn new(owner: &ComponentHandle) -> Self {
        Self {
            core: SourceCore::new(owner),
            _payload: PhantomData,
        }
    }

    /// Sends `payload` to every connected sink, in connection order.
    ///
    /// The call returns once every handler has run. Each sink receives its own
    /// copy; the last one receives `payload` itself. With no connected sinks
    /// this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error a delivery produced (a failing handler, or a
    /// handler chain that re-entered a component still handling a delivery).
    /// Sinks after the failing one are not invoked.
    pub fn fire(&self, payload: M) -> Result<(), ChannelError> {
        match self.core.registry() {
            Some(registry) => registry.dispatch_event(self.core.endpoint(), Box::new(payload)),
            None => Ok(()),
        }
    }

    /// Whether the source has been connected through a registry.
    pub fn binding(&self) -> BindingState {
        self.core.state()
    }

    pub(crate) fn core(&self) -> &Rc<SourceCore> {
        &self.core
    }
}

impl<M: ChannelPayload> Clone for EventSource<M> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            _payload: PhantomData,
        }
    }
}

impl<M: ChannelPayload> Endpoint for EventSource<M> {
    fn endpoint_id(&self) -> EndpointId {
        self.core.endpoint()
    }

    fn owner(&self) -> ComponentId {
        self.core.owner()
    }
}

impl<M: ChannelPayload> fmt::Debug for EventSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("endpoint", &self.core.endpoint())
            .field("owner", &self.core.owner())
            .field("payload", &type_name::<M>())
            .field("binding", &self.core.state())
            .finish()
    }
}

/// Push endpoint that delivers `M` payloads to a fixed handler on its owning component.
///
/// The handler binding (component instance plus method) is set at
/// construction and never changes; only the sink's connections do. The sink
/// refers to its component weakly, so it never keeps the component alive.
///
/// ```rust,ignore
/// struct Listener {
///     input: EventSink<i32>,
///     seen: Vec<i32>,
/// }
///
/// impl Listener {
///     fn on_int(&mut self, value: i32) -> HandlerResult {
///         self.seen.push(value);
///         Ok(())
///     }
/// }
///
/// let handle = ComponentHandle::new("listener")?;
/// let listener = new_component(|me| Listener {
///     input: EventSink::new(&handle, me, Listener::on_int),
///     seen: Vec::new(),
/// });
/// ```
pub struct EventSink<M: ChannelPayload> {
    receiver: Rc<dyn EventReceiver>,
    endpoint: EndpointId,
    owner: ComponentId,
    _payload: PhantomData<fn(M)>,
}

impl<M: ChannelPayload> EventSink<M> {
    /// Creates a sink owned by `owner` that calls `handler` on `target`.
    pub fn new<O: 'static>(
        owner: &ComponentHandle,
        target: &Weak<RefCell<O>>,
        handler: EventHandler<O, M>,
    ) -> Self {
        let endpoint = EndpointId::next();
        let receiver = Rc::new(BoundEventHandler {
            endpoint,
            owner: owner.id(),
            target: target.clone(),
            handler,
        });
        Self {
            receiver,
            endpoint,
            owner: owner.id(),
            _payload: PhantomData,
        }
    }

    pub(crate) fn receiver(&self) -> Rc<dyn EventReceiver> {
        Rc::clone(&self.receiver)
    }
}

impl<M: ChannelPayload> Endpoint for EventSink<M> {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl<M: ChannelPayload> fmt::Debug for EventSink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("endpoint", &self.endpoint)
            .field("owner", &self.owner)
            .field("payload", &type_name::<M>())
            .finish()
    }
}

/// The typed half of an event sink: restores the payload type and calls the handler.
struct BoundEventHandler<M, O> {
    endpoint: EndpointId,
    owner: ComponentId,
    target: Weak<RefCell<O>>,
    handler: EventHandler<O, M>,
}

impl<M: ChannelPayload, O: 'static> Endpoint for BoundEventHandler<M, O> {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl<M: ChannelPayload, O: 'static> EventReceiver for BoundEventHandler<M, O> {
    fn payload_type(&self) -> &'static str {
        type_name::<M>()
    }

    fn receive(&self, payload: Box<dyn ChannelPayload>) -> Result<Delivery, ChannelError> {
        let found = (*payload).type_name();
        let payload = payload
            .into_any()
            .downcast::<M>()
            .map_err(|_| ChannelError::PayloadMismatch {
                endpoint: self.endpoint,
                expected: type_name::<M>(),
                found,
            })?;

        let Some(target) = self.target.upgrade() else {
            return Ok(Delivery::TargetDropped);
        };
        let mut component = target
            .try_borrow_mut()
            .map_err(|_| ChannelError::ReentrantDispatch {
                receiver: self.owner,
                endpoint: self.endpoint,
            })?;

        (self.handler)(&mut *component, *payload).map_err(|source| ChannelError::HandlerFailed {
            receiver: self.owner,
            endpoint: self.endpoint,
            source,
        })?;
        Ok(Delivery::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{new_component, HandlerResult, Shared};

    struct Tally {
        input: EventSink<i64>,
        total: i64,
    }

    impl Tally {
        fn add(&mut self, amount: i64) -> HandlerResult {
            self.total += amount;
            Ok(())
        }
    }

    fn tally() -> anyhow::Result<Shared<Tally>> {
        let handle = ComponentHandle::new("tally")?;
        Ok(new_component(|me| Tally {
            input: EventSink::new(&handle, me, Tally::add),
            total: 0,
        }))
    }

    #[test]
    fn receiver_restores_the_payload_type() -> anyhow::Result<()> {
        let tally = tally()?;
        let receiver = tally.borrow().input.receiver();

        assert_eq!(receiver.receive(Box::new(5_i64))?, Delivery::Handled);
        assert_eq!(tally.borrow().total, 5);

        let mismatch = receiver.receive(Box::new("five"));
        assert!(matches!(mismatch, Err(ChannelError::PayloadMismatch { .. })));
        assert_eq!(tally.borrow().total, 5);
        Ok(())
    }

    #[test]
    fn dropped_target_is_reported_not_called() -> anyhow::Result<()> {
        let tally = tally()?;
        let receiver = tally.borrow().input.receiver();
        drop(tally);

        assert_eq!(receiver.receive(Box::new(1_i64))?, Delivery::TargetDropped);
        Ok(())
    }

    #[test]
    fn busy_target_is_reentrant() -> anyhow::Result<()> {
        let tally = tally()?;
        let receiver = tally.borrow().input.receiver();

        let _busy = tally.borrow_mut();
        let result = receiver.receive(Box::new(1_i64));
        assert!(matches!(result, Err(ChannelError::ReentrantDispatch { .. })));
        Ok(())
    }
}
