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
use crate::common::{ComponentId, EndpointId};

/// Identity shared by every endpoint kind.
///
/// Implemented by all six endpoint types so that generic code (and the
/// registry's bookkeeping) can ask any endpoint who owns it and how to tell it
/// apart from other endpoints.
pub trait Endpoint {
    /// The endpoint's unique id.
    fn endpoint_id(&self) -> EndpointId;

    /// Id of the component that owns the endpoint.
    fn owner(&self) -> ComponentId;
}
