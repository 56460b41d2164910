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
use std::fmt;

use crate::common::{ComponentId, EndpointId};

/// Errors reported by connection and dispatch operations.
///
/// None of these are fatal to the registry: a failed operation leaves every
/// connection record exactly as it was before the call.
#[derive(Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// A value sink was connected while it already had a source. The request
    /// was dropped and the existing connection kept.
    RedundantConnection {
        /// The sink that was already connected.
        sink: EndpointId,
        /// The source of the rejected request.
        source: EndpointId,
        /// The source the sink stays connected to.
        existing: EndpointId,
    },
    /// A value sink was read while it had no live source.
    UnconnectedRead {
        /// The sink that was read.
        sink: EndpointId,
    },
    /// A value sink was read while its source was being modified, which
    /// happens when a source's `update` closure reads a sink connected to it.
    ValueBusy {
        /// The sink that was read.
        sink: EndpointId,
    },
    /// A handler's component was already borrowed when a dispatch reached it,
    /// which happens when a chain of handlers loops back into a component that
    /// is still running one of its own handlers.
    ReentrantDispatch {
        /// Owner of the receiving sink.
        receiver: ComponentId,
        /// The receiving sink.
        endpoint: EndpointId,
    },
    /// A handler returned an error. Receivers after it were not invoked.
    HandlerFailed {
        /// Owner of the failing sink.
        receiver: ComponentId,
        /// The failing sink.
        endpoint: EndpointId,
        /// The handler's error.
        source: anyhow::Error,
    },
    /// A payload reached a sink of a different payload type.
    PayloadMismatch {
        /// The receiving sink.
        endpoint: EndpointId,
        /// The payload type the sink accepts.
        expected: &'static str,
        /// The payload type that arrived.
        found: &'static str,
    },
    /// Nested dispatches exceeded `limits.max_dispatch_depth`.
    DispatchDepthExceeded {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedundantConnection {
                sink,
                source,
                existing,
            } => write!(
                f,
                "value sink {sink} already connected to {existing}; connection from {source} dropped"
            ),
            Self::UnconnectedRead { sink } => write!(f, "value sink {sink} has no source"),
            Self::ValueBusy { sink } => {
                write!(f, "value sink {sink} was read while its source is being modified")
            }
            Self::ReentrantDispatch { receiver, endpoint } => write!(
                f,
                "dispatch re-entered {receiver} through {endpoint} while it was handling another delivery"
            ),
            Self::HandlerFailed {
                receiver,
                endpoint,
                source,
            } => write!(f, "handler of {endpoint} on {receiver} failed: {source}"),
            Self::PayloadMismatch {
                endpoint,
                expected,
                found,
            } => write!(f, "{endpoint} expects {expected} but received {found}"),
            Self::DispatchDepthExceeded { limit } => {
                write!(f, "dispatch nesting exceeded the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HandlerFailed { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn handler_failure_exposes_its_source() {
        let error = ChannelError::HandlerFailed {
            receiver: ComponentId::next(),
            endpoint: EndpointId::next(),
            source: anyhow::anyhow!("sensor offline"),
        };
        assert!(error.to_string().ends_with("failed: sensor offline"));
        assert_eq!(
            error.source().map(ToString::to_string).as_deref(),
            Some("sensor offline")
        );
    }

    #[test]
    fn read_error_names_the_sink() {
        let sink = EndpointId::next();
        let error = ChannelError::UnconnectedRead { sink };
        assert_eq!(error.to_string(), format!("value sink {sink} has no source"));
        assert!(error.source().is_none());
    }
}
