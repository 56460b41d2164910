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

use acton_ern::Ern;

use crate::common::config::CONFIG;
use crate::common::{ComponentId, Shared};

/// Identity of a component as seen by the connection layer.
///
/// A handle pairs a process-unique [`ComponentId`] with a human-readable
/// [`Ern`](acton_ern::Ern) name used in diagnostics. Endpoints record the id of
/// the handle they were built with; the registry uses it to find every
/// connection a component participates in when it is torn down.
///
/// Handles are cheap to clone and never keep the component alive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    id: ComponentId,
    name: Ern,
}

impl ComponentHandle {
    /// Creates a handle with a fresh id and the given root name.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid `Ern` root segment.
    pub fn new(name: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            id: ComponentId::next(),
            name: Ern::with_root(name.into())?,
        })
    }

    /// The component's unique id.
    #[inline]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The component's diagnostic name.
    #[inline]
    pub fn name(&self) -> &Ern {
        &self.name
    }
}

/// Creates a handle named after `defaults.component_name` from the global configuration.
impl Default for ComponentHandle {
    fn default() -> Self {
        let name = Ern::with_root(CONFIG.defaults.component_name.clone()).unwrap_or_default();
        Self {
            id: ComponentId::next(),
            name,
        }
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Builds a shared component whose constructor can see a weak reference to itself.
///
/// Event and signal sinks are bound to the instance that owns them, so the
/// constructor needs that instance's address before the instance exists:
///
/// ```rust,ignore
/// let listener = new_component(|me| Listener {
///     input: EventSink::new(&handle, me, Listener::on_value),
///     seen: Vec::new(),
/// });
/// ```
pub fn new_component<O>(build: impl FnOnce(&Weak<RefCell<O>>) -> O) -> Shared<O> {
    Rc::new_cyclic(|me| RefCell::new(build(me)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_get_distinct_ids() -> anyhow::Result<()> {
        let a = ComponentHandle::new("alpha")?;
        let b = ComponentHandle::new("alpha")?;
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn new_component_sees_itself() {
        struct Node {
            me: Weak<RefCell<Node>>,
        }
        let node = new_component(|me| Node { me: me.clone() });
        let upgraded = node.borrow().me.upgrade();
        assert!(upgraded.is_some_and(|rc| Rc::ptr_eq(&rc, &node)));
    }
}
