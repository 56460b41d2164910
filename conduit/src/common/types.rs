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

//! Identifiers and handler signatures shared by endpoints and the registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Return type of every event and signal handler.
///
/// An `Err` stops the dispatch in progress and is reported to the caller of
/// `fire` as [`ChannelError::HandlerFailed`](crate::message::ChannelError::HandlerFailed).
pub type HandlerResult = anyhow::Result<()>;

/// A component as the surrounding runtime stores it.
///
/// Sinks hold a `Weak` to this cell so that the registry never keeps a component alive.
pub type Shared<O> = Rc<RefCell<O>>;

/// A handler bound to an [`EventSink`](crate::endpoint::EventSink): a method of the
/// owning component taking the payload by value.
pub type EventHandler<O, M> = fn(&mut O, M) -> HandlerResult;

/// A handler bound to a [`SignalSink`](crate::endpoint::SignalSink).
pub type SignalHandler<O> = fn(&mut O) -> HandlerResult;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_ENDPOINT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an attached component.
///
/// Used as the ownership key for every endpoint and as the argument of
/// [`ConnectionRegistry::remove_all`](crate::common::ConnectionRegistry::remove_all).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ComponentId(u64);

impl ComponentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Stable identity of a single endpoint, used to key and match connection records.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EndpointId(u64);

impl EndpointId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ENDPOINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "endpoint#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = EndpointId::next();
        let b = EndpointId::next();
        assert_ne!(a, b);
        assert!(b > a);

        let c = ComponentId::next();
        let d = ComponentId::next();
        assert_ne!(c, d);
    }

    #[test]
    fn display_names_the_kind() {
        let id = ComponentId(7);
        assert_eq!(id.to_string(), "component#7");
        assert_eq!(EndpointId(3).to_string(), "endpoint#3");
    }
}
