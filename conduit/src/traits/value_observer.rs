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
use crate::common::EndpointId;
use crate::traits::Endpoint;

/// Type-erased face of a [`ValueSink`](crate::endpoint::ValueSink) as stored by the registry.
///
/// Value channels are never dispatched through the registry, so the only thing
/// it ever needs to do to a sink is detach it from its source.
pub(crate) trait ValueObserver: Endpoint {
    /// Drops the sink's reference to its source, if it still points at `source`.
    fn detach_from(&self, source: EndpointId);
}
