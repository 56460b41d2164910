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
use std::any::Any;
use std::fmt::Debug;

use dyn_clone::DynClone;

/// A marker trait for types that can be carried by an event channel.
///
/// The registry moves payloads around as `Box<dyn ChannelPayload>` so that one
/// routing table can serve sources of every payload type. Each
/// [`EventSink`](crate::endpoint::EventSink) knows its concrete payload type and
/// downcasts the box back with [`into_any`](ChannelPayload::into_any) right
/// before calling its handler. [`DynClone`] lets the registry hand every
/// receiver its own copy.
///
/// A blanket implementation covers every `Any + Debug + Clone` type, so payload
/// types only need `#[derive(Clone, Debug)]` (or `#[conduit_payload]`).
///
/// The blanket impl also covers `Box<dyn ChannelPayload>` itself; call these
/// methods on the dereferenced trait object (`(*boxed).as_any()`), not on the box.
pub trait ChannelPayload: DynClone + Any + Debug {
    /// Returns the payload as a dynamic [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Converts the boxed payload into a boxed [`Any`] for by-value downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// The payload's type name, for diagnostics.
    fn type_name(&self) -> &'static str;
}

dyn_clone::clone_trait_object!(ChannelPayload);

impl<T> ChannelPayload for T
where
    T: Any + Debug + Clone,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
