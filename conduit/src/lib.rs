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

#![forbid(unsafe_code)]
#![forbid(missing_docs)]

//! # Conduit
//!
//! Typed connections between the components of a single-threaded runtime.
//!
//! Components own *endpoints* as fields. A [`ConnectionRegistry`](prelude::ConnectionRegistry)
//! wires a source endpoint of one component to a sink endpoint of another and
//! is the single place that knows who is connected to whom.
//!
//! ## Channel Kinds
//!
//! - **Value**: a [`ValueSink<T>`](prelude::ValueSink) reads the current value
//!   of at most one [`ValueSource<T>`](prelude::ValueSource) on demand.
//! - **Event**: an [`EventSource<M>`](prelude::EventSource) pushes a payload to
//!   every connected [`EventSink<M>`](prelude::EventSink), synchronously and in
//!   connection order.
//! - **Signal**: the same as events, without a payload.
//!
//! Payload types are checked when connecting; a source and a sink of different
//! types cannot be wired together.
//!
//! ## Teardown
//!
//! Before a component is dropped its owner calls
//! [`ConnectionRegistry::remove_all`](prelude::ConnectionRegistry::remove_all)
//! with its [`ComponentHandle`](prelude::ComponentHandle). No later firing
//! reaches the component and no sink reads through to it. A firing already in
//! progress when `remove_all` runs still completes against the receiver list
//! it started with.
//!
//! ## Quick Start
//!
//! ```rust
//! use conduit::prelude::*;
//!
//! #[conduit_component]
//! struct Listener {
//!     input: EventSink<i32>,
//!     seen: Vec<i32>,
//! }
//!
//! impl Listener {
//!     fn on_int(&mut self, value: i32) -> HandlerResult {
//!         self.seen.push(value);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = ConnectionRegistry::new();
//! let emitter = ComponentHandle::new("emitter")?;
//! let receiver = ComponentHandle::new("receiver")?;
//!
//! let output = EventSource::<i32>::new(&emitter);
//! let listener = new_component(|me| Listener {
//!     input: EventSink::new(&receiver, me, Listener::on_int),
//!     seen: Vec::new(),
//! });
//!
//! registry.connect_event(&output, &listener.borrow().input);
//! output.fire(42)?;
//! assert_eq!(listener.borrow().seen, vec![42]);
//!
//! registry.remove_all(&receiver);
//! output.fire(7)?;
//! assert_eq!(listener.borrow().seen, vec![42]);
//! # Ok(())
//! # }
//! ```

/// Identity, configuration and the connection registry.
pub(crate) mod common;

/// The six endpoint types.
pub(crate) mod endpoint;

/// Error types.
pub(crate) mod message;

/// Core traits.
pub(crate) mod traits;

/// Configuration types and the global [`CONFIG`](config::CONFIG) instance.
pub mod config {
    pub use crate::common::config::{
        ConduitConfig, DefaultsConfig, DiagnosticsConfig, LimitsConfig, CONFIG,
    };
}

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// ## Macros (from `conduit-macro`)
/// *   [`conduit_macro::conduit_payload`]: Derives what an event payload type needs.
/// *   [`conduit_macro::conduit_component`]: Derives `Debug` for a component type.
///
/// ## External Crates
/// *   [`acton_ern::Ern`](https://docs.rs/acton-ern): Component names.
///
/// ## Core Types
/// *   [`crate::common::ConnectionRegistry`]: Owns all connection state.
/// *   [`crate::common::ComponentHandle`]: Component identity used for teardown.
/// *   [`crate::endpoint::ValueSource`], [`crate::endpoint::ValueSink`]: Pull channel.
/// *   [`crate::endpoint::EventSource`], [`crate::endpoint::EventSink`]: Push channel with payload.
/// *   [`crate::endpoint::SignalSource`], [`crate::endpoint::SignalSink`]: Push channel without payload.
/// *   [`crate::message::ChannelError`]: Errors of connect, read and dispatch.
/// *   [`crate::traits::ChannelPayload`], [`crate::traits::Endpoint`]: Core traits.
pub mod prelude {
    // Macros from conduit-macro
    pub use conduit_macro::*;

    // External crate re-exports
    pub use acton_ern::Ern;

    // Core types
    pub use crate::common::{
        new_component, ComponentHandle, ComponentId, ConduitConfig, ConnectionRegistry,
        EndpointId, EventHandler, HandlerResult, RegistryStats, RemovalReport, Shared,
        SignalHandler,
    };
    pub use crate::endpoint::{
        BindingState, EventSink, EventSource, SignalSink, SignalSource, ValueSink, ValueSource,
    };
    pub use crate::message::ChannelError;
    pub use crate::traits::{ChannelPayload, Endpoint};
}
