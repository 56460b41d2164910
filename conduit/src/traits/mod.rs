//! Defines the core traits of the connection layer.
//!
//! # Key Traits
//!
//! *   [`ChannelPayload`]: Marker trait for everything an event channel can carry.
//!     Blanket-implemented for `Any + Debug + Clone` types; supports dynamic cloning
//!     and by-value downcasting so the registry can route payloads of any type.
//! *   [`Endpoint`]: Identity (endpoint id and owning component) shared by all
//!     six endpoint types.
//!
//! The crate-internal receiver traits are the erasure boundary between the
//! registry's untyped tables and the typed sinks.

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

// --- Public Re-exports ---
pub use channel_payload::ChannelPayload;
pub use endpoint::Endpoint;

// --- Crate-Internal Re-exports ---
pub(crate) use receiver::{Delivery, EventReceiver, SignalReceiver};
pub(crate) use value_observer::ValueObserver;

// --- Submodules ---

/// Defines the [`ChannelPayload`] marker trait.
mod channel_payload;
/// Defines the [`Endpoint`] identity trait.
mod endpoint;
/// Erased event and signal receivers.
mod receiver;
/// Erased value sinks.
mod value_observer;
