//! The three endpoint families a component uses to talk to other components.
//!
//! | Channel | Source | Sink | Semantics |
//! |---------|--------|------|-----------|
//! | Value   | [`ValueSource<T>`] | [`ValueSink<T>`] | pull; one source per sink |
//! | Event   | [`EventSource<M>`] | [`EventSink<M>`] | push with payload; fan-out |
//! | Signal  | [`SignalSource`]   | [`SignalSink`]   | push without payload; fan-out |
//!
//! Endpoints are created as fields of their owning component and carry that
//! component's [`ComponentId`](crate::common::ComponentId). They are wired
//! together only through a [`ConnectionRegistry`](crate::common::ConnectionRegistry).

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
pub use event::{EventSink, EventSource};
pub use signal::{SignalSink, SignalSource};
pub use source_core::BindingState;
pub use value::{ValueSink, ValueSource};

// --- Crate-Internal Re-exports ---
pub(crate) use source_core::SourceCore;

// --- Submodules ---

/// Event channel endpoints.
mod event;
/// Signal channel endpoints.
mod signal;
/// Registry binding shared by push sources.
mod source_core;
/// Value channel endpoints.
mod value;
