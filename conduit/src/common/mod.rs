//! Identity, configuration and the connection registry.
//!
//! # Key Re-exported Components:
//!
//! *   [`ConnectionRegistry`]: Records every connection between endpoints and
//!     routes event and signal firings.
//! *   [`ComponentHandle`]: Identity of a component; the key for teardown.
//! *   [`ConduitConfig`]: Limits and diagnostic switches, loaded from XDG locations.
//! *   [`RegistryStats`] / [`RemovalReport`]: Counts of held and purged records.

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
pub use component_handle::{new_component, ComponentHandle};
pub use config::ConduitConfig;
pub use connection_registry::ConnectionRegistry;
pub use registry_stats::{RegistryStats, RemovalReport};
pub use types::*;

// --- Crate-Internal Re-exports ---
pub(crate) use connection_registry::RegistryCore;

// --- Submodules ---

/// Identifiers and handler signatures.
mod types;

/// Defines [`ComponentHandle`] and [`new_component`].
mod component_handle;
/// Defines the configuration system.
pub mod config;
/// Defines the [`ConnectionRegistry`].
mod connection_registry;
/// Record counts reported by the registry.
mod registry_stats;
