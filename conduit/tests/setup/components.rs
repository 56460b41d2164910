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
use std::cell::RefCell;
use std::rc::Rc;

use conduit::prelude::*;

use crate::setup::{Counted, Reading};

/// Shared log of handler calls in the order they happened, as `"label:value"`.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::default()
}

/// Owns one source of every kind and nothing else.
#[conduit_component]
pub struct Emitter {
    pub handle: ComponentHandle,
    pub numbers: EventSource<i32>,
    pub readings: EventSource<Reading>,
    pub counted: EventSource<Counted>,
    pub tick: SignalSource,
    pub level: ValueSource<f32>,
}

impl Emitter {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        let handle = ComponentHandle::new(name)?;
        Ok(Self {
            numbers: EventSource::new(&handle),
            readings: EventSource::new(&handle),
            counted: EventSource::new(&handle),
            tick: SignalSource::new(&handle),
            level: ValueSource::new(&handle, 0.0),
            handle,
        })
    }
}

/// Owns one sink of every kind and records what reaches it.
#[conduit_component]
pub struct Recorder {
    pub handle: ComponentHandle,
    pub label: String,
    pub numbers: EventSink<i32>,
    pub readings: EventSink<Reading>,
    pub counted: EventSink<Counted>,
    pub tick: SignalSink,
    pub level: ValueSink<f32>,
    pub journal: Journal,
    pub seen: Vec<i32>,
    pub readings_seen: Vec<Reading>,
    pub ticks: u32,
    /// A number the `numbers` handler fails on.
    pub reject: Option<i32>,
}

impl Recorder {
    pub fn new(label: &str, journal: &Journal) -> anyhow::Result<Shared<Self>> {
        let handle = ComponentHandle::new(label)?;
        Ok(new_component(|me| Self {
            numbers: EventSink::new(&handle, me, Self::on_int),
            readings: EventSink::new(&handle, me, Self::on_reading),
            counted: EventSink::new(&handle, me, Self::on_counted),
            tick: SignalSink::new(&handle, me, Self::on_tick),
            level: ValueSink::new(&handle),
            label: label.to_string(),
            journal: Rc::clone(journal),
            seen: Vec::new(),
            readings_seen: Vec::new(),
            ticks: 0,
            reject: None,
            handle,
        }))
    }

    fn on_int(&mut self, value: i32) -> HandlerResult {
        if self.reject == Some(value) {
            anyhow::bail!("{} rejects {value}", self.label);
        }
        self.journal.borrow_mut().push(format!("{}:{value}", self.label));
        self.seen.push(value);
        Ok(())
    }

    fn on_reading(&mut self, reading: Reading) -> HandlerResult {
        self.readings_seen.push(reading);
        Ok(())
    }

    fn on_counted(&mut self, _payload: Counted) -> HandlerResult {
        Ok(())
    }

    fn on_tick(&mut self) -> HandlerResult {
        self.journal.borrow_mut().push(format!("{}:tick", self.label));
        self.ticks += 1;
        Ok(())
    }
}

/// Forwards every number it receives, plus one, to its own output.
#[conduit_component]
pub struct Relay {
    pub handle: ComponentHandle,
    pub input: EventSink<i32>,
    pub output: EventSource<i32>,
    pub forwarded: u32,
}

impl Relay {
    pub fn new(name: &str) -> anyhow::Result<Shared<Self>> {
        let handle = ComponentHandle::new(name)?;
        Ok(new_component(|me| Self {
            input: EventSink::new(&handle, me, Self::on_int),
            output: EventSource::new(&handle),
            forwarded: 0,
            handle,
        }))
    }

    fn on_int(&mut self, value: i32) -> HandlerResult {
        self.forwarded += 1;
        self.output.fire(value + 1)?;
        Ok(())
    }
}

/// Tears down another component from inside a signal handler.
#[conduit_component]
pub struct Janitor {
    pub handle: ComponentHandle,
    pub sweep: SignalSink,
    pub registry: ConnectionRegistry,
    pub victim: Option<ComponentHandle>,
    pub last_report: Option<RemovalReport>,
}

impl Janitor {
    pub fn new(registry: &ConnectionRegistry, victim: &ComponentHandle) -> anyhow::Result<Shared<Self>> {
        let handle = ComponentHandle::new("janitor")?;
        Ok(new_component(|me| Self {
            sweep: SignalSink::new(&handle, me, Self::on_sweep),
            registry: registry.clone(),
            victim: Some(victim.clone()),
            last_report: None,
            handle,
        }))
    }

    fn on_sweep(&mut self) -> HandlerResult {
        if let Some(victim) = self.victim.take() {
            self.last_report = Some(self.registry.remove_all(&victim));
        }
        Ok(())
    }
}

/// Carries one endpoint of each of the six kinds.
#[conduit_component]
pub struct DummyComponent {
    pub handle: ComponentHandle,
    pub text_in: EventSink<String>,
    pub text_out: EventSource<String>,
    pub level_in: ValueSink<f32>,
    pub level_out: ValueSource<f32>,
    pub poke_in: SignalSink,
    pub poke_out: SignalSource,
    pub heard: Vec<String>,
    pub pokes: u32,
}

impl DummyComponent {
    pub fn new(name: &str, level: f32) -> anyhow::Result<Shared<Self>> {
        let handle = ComponentHandle::new(name)?;
        Ok(new_component(|me| Self {
            text_in: EventSink::new(&handle, me, Self::on_text),
            text_out: EventSource::new(&handle),
            level_in: ValueSink::new(&handle),
            level_out: ValueSource::new(&handle, level),
            poke_in: SignalSink::new(&handle, me, Self::on_poke),
            poke_out: SignalSource::new(&handle),
            heard: Vec::new(),
            pokes: 0,
            handle,
        }))
    }

    /// Connects every output of `from` to the matching input of `to`.
    pub fn wire(
        registry: &ConnectionRegistry,
        from: &Shared<Self>,
        to: &Shared<Self>,
    ) -> Result<(), ChannelError> {
        let from = from.borrow();
        let to = to.borrow();
        registry.connect_event(&from.text_out, &to.text_in);
        registry.connect_value(&from.level_out, &to.level_in)?;
        registry.connect_signal(&from.poke_out, &to.poke_in);
        Ok(())
    }

    fn on_text(&mut self, text: String) -> HandlerResult {
        self.heard.push(text);
        Ok(())
    }

    fn on_poke(&mut self) -> HandlerResult {
        self.pokes += 1;
        Ok(())
    }
}
