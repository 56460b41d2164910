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
use std::cell::Cell;
use std::rc::Rc;

use conduit::prelude::*;

/// A temperature reading pushed between test components.
#[conduit_payload(eq)]
pub struct Reading {
    pub sensor: String,
    pub celsius: f32,
}

impl Reading {
    pub fn new(sensor: &str, celsius: f32) -> Self {
        Self {
            sensor: sensor.to_string(),
            celsius,
        }
    }
}

/// Payload that counts its own clones, so tests can check how many copies a dispatch made.
#[derive(Debug, Default)]
pub struct Counted {
    pub clones: Rc<Cell<usize>>,
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        self.clones.set(self.clones.get() + 1);
        Self {
            clones: Rc::clone(&self.clones),
        }
    }
}
