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

//! Testing utilities for Conduit components.
//!
//! The [`conduit_test`](prelude::conduit_test) attribute turns a plain function
//! into a `#[test]` that runs inside a tracing span and reports panics as a
//! single cleaned-up line.
//!
//! ```rust,ignore
//! use conduit_test::prelude::*;
//!
//! #[conduit_test]
//! fn wires_two_components() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

/// Commonly used items for tests.
pub mod prelude {
    pub use conduit_test_macro::conduit_test;
}

#[doc(hidden)]
pub mod __private {
    pub use parking_lot;
    pub use tracing;

    /// Normalizes the return value of a wrapped test body.
    pub trait TestOutcome {
        /// Converts the value into `Ok(())` or a rendered error.
        fn into_outcome(self) -> Result<(), String>;
    }

    impl TestOutcome for () {
        fn into_outcome(self) -> Result<(), String> {
            Ok(())
        }
    }

    impl<E: std::fmt::Debug> TestOutcome for Result<(), E> {
        fn into_outcome(self) -> Result<(), String> {
            self.map_err(|error| format!("{error:?}"))
        }
    }
}
