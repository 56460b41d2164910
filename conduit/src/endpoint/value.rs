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

use crate::common::{ComponentHandle, ComponentId, EndpointId};
use crate::message::ChannelError;
use crate::traits::{Endpoint, ValueObserver};

/// Pull endpoint holding the current value of type `T`.
///
/// Connected [`ValueSink`]s read straight from this source whenever their
/// owner asks; there is no notification and no buffering.
pub struct ValueSource<T> {
    endpoint: EndpointId,
    owner: ComponentId,
    value: Rc<RefCell<T>>,
}

impl<T: 'static> ValueSource<T> {
    /// Creates a source owned by `owner` holding `initial`.
    pub fn new(owner: &ComponentHandle, initial: T) -> Self {
        Self {
            endpoint: EndpointId::next(),
            owner: owner.id(),
            value: Rc::new(RefCell::new(initial)),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Runs `read` against the current value.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&*self.value.borrow())
    }

    /// Stores a new value; the next read through any sink sees it.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a connected sink's `with` closure.
    pub fn set(&mut self, value: T) {
        *self.value.borrow_mut() = value;
    }

    /// Stores a new value and returns the previous one.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a connected sink's `with` closure.
    pub fn replace(&mut self, value: T) -> T {
        self.value.replace(value)
    }

    /// Modifies the value in place.
    ///
    /// Connected sinks read as [`ChannelError::ValueBusy`] while `modify` runs.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a connected sink's `with` closure.
    pub fn update(&mut self, modify: impl FnOnce(&mut T)) {
        modify(&mut *self.value.borrow_mut());
    }

    fn downgrade(&self) -> Weak<RefCell<T>> {
        Rc::downgrade(&self.value)
    }
}

impl<T> Endpoint for ValueSource<T> {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSource")
            .field("endpoint", &self.endpoint)
            .field("owner", &self.owner)
            .field("value", &self.value)
            .finish()
    }
}

/// Pull endpoint reading through to at most one [`ValueSource<T>`].
///
/// Reads are never served from a default: a sink without a live source
/// reports [`ChannelError::UnconnectedRead`].
pub struct ValueSink<T> {
    link: Rc<SinkLink<T>>,
}

struct SinkLink<T> {
    endpoint: EndpointId,
    owner: ComponentId,
    source: RefCell<Option<(EndpointId, Weak<RefCell<T>>)>>,
}

impl<T: 'static> ValueSink<T> {
    /// Creates an unconnected sink owned by `owner`.
    pub fn new(owner: &ComponentHandle) -> Self {
        Self {
            link: Rc::new(SinkLink {
                endpoint: EndpointId::next(),
                owner: owner.id(),
                source: RefCell::new(None),
            }),
        }
    }

    /// Whether the sink is connected to a source that still exists.
    pub fn is_connected(&self) -> bool {
        self.source().is_some()
    }

    /// Id of the live source the sink reads from.
    pub fn source(&self) -> Option<EndpointId> {
        self.link
            .source
            .borrow()
            .as_ref()
            .filter(|(_, value)| value.strong_count() > 0)
            .map(|(id, _)| *id)
    }

    /// Returns a copy of the source's current value.
    ///
    /// # Errors
    ///
    /// Same as [`with`](Self::with).
    pub fn get(&self) -> Result<T, ChannelError>
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Runs `read` against the source's current value.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UnconnectedRead`] if no live source is connected,
    /// or [`ChannelError::ValueBusy`] if the source is inside its own `update`.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> Result<R, ChannelError> {
        let value = self
            .link
            .source
            .borrow()
            .as_ref()
            .and_then(|(_, value)| value.upgrade())
            .ok_or(ChannelError::UnconnectedRead {
                sink: self.link.endpoint,
            })?;
        let current = value.try_borrow().map_err(|_| ChannelError::ValueBusy {
            sink: self.link.endpoint,
        })?;
        Ok(read(&*current))
    }

    /// Points the sink at `source`. Callers check for an existing connection first.
    pub(crate) fn attach(&self, source: &ValueSource<T>) {
        *self.link.source.borrow_mut() = Some((source.endpoint, source.downgrade()));
    }

    pub(crate) fn observer(&self) -> Weak<dyn ValueObserver> {
        let weak: Weak<SinkLink<T>> = Rc::downgrade(&self.link);
        weak
    }

    pub(crate) fn detach_from(&self, source: EndpointId) {
        self.link.detach_from(source);
    }
}

impl<T> Endpoint for ValueSink<T> {
    fn endpoint_id(&self) -> EndpointId {
        self.link.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.link.owner
    }
}

impl<T> fmt::Debug for ValueSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.link.source.borrow().as_ref().map(|(id, _)| *id);
        f.debug_struct("ValueSink")
            .field("endpoint", &self.link.endpoint)
            .field("owner", &self.link.owner)
            .field("source", &source)
            .finish()
    }
}

impl<T> Endpoint for SinkLink<T> {
    fn endpoint_id(&self) -> EndpointId {
        self.endpoint
    }

    fn owner(&self) -> ComponentId {
        self.owner
    }
}

impl<T> ValueObserver for SinkLink<T> {
    fn detach_from(&self, source: EndpointId) {
        let mut slot = self.source.borrow_mut();
        if slot.as_ref().is_some_and(|(id, _)| *id == source) {
            *slot = None;
        }
    }
}
