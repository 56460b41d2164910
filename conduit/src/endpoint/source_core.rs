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
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::common::{ComponentHandle, ComponentId, EndpointId, RegistryCore};

/// Whether a push source has been associated with a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Never connected; firing is a no-op.
    Unbound,
    /// Connected at least once; firings route through the bound registry.
    Bound,
}

/// Identity and registry association shared by event and signal sources.
///
/// Clones of a source share one core, so binding any clone binds them all.
#[derive(Debug)]
pub(crate) struct SourceCore {
    endpoint: EndpointId,
    owner: ComponentId,
    registry: RefCell<Option<Weak<RegistryCore>>>,
}

impl SourceCore {
    pub(crate) fn new(owner: &ComponentHandle) -> Rc<Self> {
        Rc::new(Self {
            endpoint: EndpointId::next(),
            owner: owner.id(),
            registry: RefCell::new(None),
        })
    }

    #[inline]
    pub(crate) fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    #[inline]
    pub(crate) fn owner(&self) -> ComponentId {
        self.owner
    }

    /// Associates the source with `registry`; later firings route through it.
    pub(crate) fn bind(&self, registry: &Rc<RegistryCore>) {
        let mut slot = self.registry.borrow_mut();
        if let Some(current) = slot.as_ref() {
            if current.ptr_eq(&Rc::downgrade(registry)) {
                return;
            }
            trace!(source = %self.endpoint, "rebinding source to a different registry");
        }
        *slot = Some(Rc::downgrade(registry));
    }

    pub(crate) fn state(&self) -> BindingState {
        if self.registry.borrow().is_some() {
            BindingState::Bound
        } else {
            BindingState::Unbound
        }
    }

    /// The registry firings should go through, if it is still alive.
    pub(crate) fn registry(&self) -> Option<Rc<RegistryCore>> {
        let slot = self.registry.borrow();
        let weak = slot.as_ref()?;
        let registry = weak.upgrade();
        if registry.is_none() {
            warn!(source = %self.endpoint, owner = %self.owner, "source fired after its registry was dropped");
        }
        registry
    }
}
