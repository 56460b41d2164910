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
use crate::message::ChannelError;
use crate::traits::{ChannelPayload, Endpoint};

/// Type-erased face of an [`EventSink`](crate::endpoint::EventSink) as stored by the registry.
///
/// The registry keeps receivers of every payload type in one table, so it
/// only sees this trait. The implementation behind it still knows the concrete
/// payload type and handler, and restores the payload's type before calling the
/// handler.
pub(crate) trait EventReceiver: Endpoint {
    /// Name of the payload type the sink accepts.
    fn payload_type(&self) -> &'static str;

    /// Delivers one payload to the bound handler.
    fn receive(&self, payload: Box<dyn ChannelPayload>) -> Result<Delivery, ChannelError>;
}

/// Type-erased face of a [`SignalSink`](crate::endpoint::SignalSink) as stored by the registry.
pub(crate) trait SignalReceiver: Endpoint {
    /// Invokes the bound handler.
    fn receive(&self) -> Result<Delivery, ChannelError>;
}

/// What happened to a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// The handler ran and returned `Ok`.
    Handled,
    /// The owning component no longer exists; nothing was called.
    TargetDropped,
}
