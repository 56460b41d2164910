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
use derive_new::new;

/// Snapshot of how many records each of the registry's collections holds.
#[derive(new, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Value channel (source, sink) pairs.
    pub value_connections: usize,
    /// Event sources with at least one receiver.
    pub event_routes: usize,
    /// Receiver entries across all event sources, duplicates included.
    pub event_receivers: usize,
    /// Signal sources with at least one receiver.
    pub signal_routes: usize,
    /// Receiver entries across all signal sources, duplicates included.
    pub signal_receivers: usize,
}

impl RegistryStats {
    /// True when the registry holds no connection of any kind.
    pub const fn is_empty(&self) -> bool {
        self.value_connections == 0 && self.event_routes == 0 && self.signal_routes == 0
    }
}

/// What [`ConnectionRegistry::remove_all`](crate::common::ConnectionRegistry::remove_all) purged.
///
/// Routes count sources whose whole receiver list was dropped, either because
/// the removed component owned the source or because its entries were the
/// last ones in the list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemovalReport {
    /// Value pairs in which the component owned the source or the sink.
    pub value_connections: usize,
    /// Event routes deleted.
    pub event_routes: usize,
    /// Event receiver entries deleted.
    pub event_receivers: usize,
    /// Signal routes deleted.
    pub signal_routes: usize,
    /// Signal receiver entries deleted.
    pub signal_receivers: usize,
}

impl RemovalReport {
    /// True when the component had no connections.
    pub const fn is_empty(&self) -> bool {
        self.value_connections == 0
            && self.event_routes == 0
            && self.event_receivers == 0
            && self.signal_routes == 0
            && self.signal_receivers == 0
    }
}
