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
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::common::{ComponentHandle, ComponentId, EndpointId, SignalHandler};
use crate::endpoint::{BindingState, SourceCore};
use crate::message::ChannelError;
use crate::traits::{Delivery, Endpoint, SignalReceiver};

/// Push endpoint that notifies every connected [`SignalSink`] without a payload.
///
/// Same routing rules as [`EventSource`](crate::endpoint::EventSource): bound to a
/// registry on first connect, synchronous, registration order, shallow clones.
#[derive(Clone)]
pub struct SignalSource {
    core: Rc<SourceCore>,
}

impl SignalSource {
    /// Creates an unbound source owned by `owner`.
    pub fn new(owner: &ComponentHandle) -> Self {
        Self {
            core: SourceCore::new(owner),
        }
    }

    /// Invokes the handler of every connected sink, in connection order.
    ///
    /// # Errors
    ///
    /// Returns the first error a delivery produced; later sinks are not invoked.
    pub fn fire(&self) -> Result<(), ChannelError> {
        match self.core.registry() {
            Some(registry) => registry.dispatch_signal(self.core.endpoint()),
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

impl Endpoint for SignalSource {
    fn endpoint_id(&self) -> EndpointId {
        self.core.endpoint()
    }

    fn owner(&self) -> ComponentId {
        self.core.owner()
    }
}

impl fmt::Debug for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSource")
            .field("endpoint", &self.core.endpoint())
            .field("owner", &self.core.owner())
            .field("binding", &self.core.state())
            .finish()
    }
}

/// Push endpoint that calls a fixed, payload-less handler on its owning component.
pub struct SignalSink {
    receiver: Rc<dyn SignalReceiver>,
    endpoint: EndpointId,
    owner: ComponentId,
}

impl SignalSink {
    /// Creates a sink owned by `owner` that calls `handler` on `target`.
    pub fn new<O: 'static>(
        owner: &ComponentHandle,
        target: &Weak<RefCell<O>>,
        handler: SignalHandler<O>,
    ) -> Self {
        let endpoint = EndpointId::next();
        Self {
            receiver: Rc::new(BoundSignalHandler {
                endpoint,
                owner: owner.id(),
                target: target.clone(),
                handler,
            }),
            endpoint,
            owner: owner.id(),
        }
    }

    pub(crate) fn receiver(&self) -> Rc<dyn SignalReceiver> {
        Rc::clone(&self.receiver)
    }
}

impl Endpoint for SignalSink {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl fmt::Debug for SignalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSink")
            .field("endpoint", &self.endpoint)
            .field("owner", &self.owner)
            .finish()
    }
}

struct BoundSignalHandler<O> {
    endpoint: EndpointId,
    owner: ComponentId,
    target: Weak<RefCell<O>>,
    handler: SignalHandler<O>,
}

impl<O: 'static> Endpoint for BoundSignalHandler<O> {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl<O: 'static> SignalReceiver for BoundSignalHandler<O> {
    fn receive(&self) -> Result<Delivery, ChannelError> {
        let Some(target) = self.target.upgrade() else {
            return Ok(Delivery::TargetDropped);
        };
        let mut component = target
            .try_borrow_mut()
            .map_err(|_| ChannelError::ReentrantDispatch {
                receiver: self.owner,
                endpoint: self.endpoint,
            })?;
        (self.handler)(&mut *component).map_err(|source| ChannelError::HandlerFailed {
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
    use crate::common::{new_component, HandlerResult};

    struct Doorbell {
        ring: SignalSink,
        rings: u32,
        broken: bool,
    }

    impl Doorbell {
        fn on_ring(&mut self) -> HandlerResult {
            anyhow::ensure!(!self.broken, "doorbell is broken");
            self.rings += 1;
            Ok(())
        }
    }

    #[test]
    fn handler_errors_become_handler_failed() -> anyhow::Result<()> {
        let handle = ComponentHandle::new("doorbell")?;
        let bell = new_component(|me| Doorbell {
            ring: SignalSink::new(&handle, me, Doorbell::on_ring),
            rings: 0,
            broken: false,
        });
        let receiver = bell.borrow().ring.receiver();

        assert_eq!(receiver.receive()?, Delivery::Handled);
        bell.borrow_mut().broken = true;
        let failed = receiver.receive();
        assert!(matches!(
            failed,
            Err(ChannelError::HandlerFailed { receiver, .. }) if receiver == handle.id()
        ));
        assert_eq!(bell.borrow().rings, 1);
        Ok(())
    }

    #[test]
    fn fresh_source_is_unbound_and_fires_nothing() -> anyhow::Result<()> {
        let handle = ComponentHandle::new("button")?;
        let source = SignalSource::new(&handle);
        assert_eq!(source.binding(), BindingState::Unbound);
        source.fire()?;
        assert_eq!(source.owner(), handle.id());
        Ok(())
    }
}
