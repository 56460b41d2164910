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
use conduit::prelude::*;
use conduit_test::prelude::*;

use crate::setup::*;

mod setup;

#[conduit_test]
fn test_signal_reaches_every_receiver_in_order() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = test_registry();
    let log = journal();
    let button = Emitter::new("button")?;
    let lamp = Recorder::new("lamp", &log)?;
    let fan = Recorder::new("fan", &log)?;

    registry.connect_signal(&button.tick, &lamp.borrow().tick);
    registry.connect_signal(&button.tick, &fan.borrow().tick);
    assert_eq!(registry.signal_receiver_count(&button.tick), 2);

    button.tick.fire()?;
    button.tick.fire()?;
    assert_eq!(
        *log.borrow(),
        ["lamp:tick", "fan:tick", "lamp:tick", "fan:tick"]
    );
    assert_eq!(lamp.borrow().ticks, 2);
    Ok(())
}

#[conduit_test]
fn test_disconnect_removes_one_signal_entry() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = test_registry();
    let log = journal();
    let button = Emitter::new("button")?;
    let lamp = Recorder::new("lamp", &log)?;

    registry.connect_signal(&button.tick, &lamp.borrow().tick);
    registry.connect_signal(&button.tick, &lamp.borrow().tick);
    button.tick.fire()?;
    assert_eq!(lamp.borrow().ticks, 2);

    assert!(registry.disconnect_signal(&button.tick, &lamp.borrow().tick));
    button.tick.fire()?;
    assert_eq!(lamp.borrow().ticks, 3);

    assert!(registry.disconnect_signal(&button.tick, &lamp.borrow().tick));
    assert!(!registry.disconnect_signal(&button.tick, &lamp.borrow().tick));
    button.tick.fire()?;
    assert_eq!(lamp.borrow().ticks, 3);
    assert!(registry.is_empty());
    Ok(())
}

#[conduit_test]
fn test_cloned_source_shares_identity_and_binding() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = test_registry();
    let log = journal();
    let button = Emitter::new("button")?;
    let remote = button.tick.clone();
    assert_eq!(remote.endpoint_id(), button.tick.endpoint_id());
    assert_eq!(remote.binding(), BindingState::Unbound);

    let lamp = Recorder::new("lamp", &log)?;
    registry.connect_signal(&button.tick, &lamp.borrow().tick);
    assert_eq!(remote.binding(), BindingState::Bound);

    remote.fire()?;
    assert_eq!(lamp.borrow().ticks, 1);
    Ok(())
}

#[conduit_test]
fn test_firing_after_registry_is_dropped_is_a_no_op() -> anyhow::Result<()> {
    initialize_tracing();
    let log = journal();
    let button = Emitter::new("button")?;
    let lamp = Recorder::new("lamp", &log)?;
    {
        let registry = test_registry();
        registry.connect_signal(&button.tick, &lamp.borrow().tick);
    }

    button.tick.fire()?;
    assert_eq!(lamp.borrow().ticks, 0);
    Ok(())
}

#[conduit_test]
fn test_receiver_dropped_without_teardown_is_skipped() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = test_registry();
    let log = journal();
    let button = Emitter::new("button")?;
    let gone = Recorder::new("gone", &log)?;
    let kept = Recorder::new("kept", &log)?;

    registry.connect_signal(&button.tick, &gone.borrow().tick);
    registry.connect_signal(&button.tick, &kept.borrow().tick);
    drop(gone);

    button.tick.fire()?;
    assert_eq!(*log.borrow(), ["kept:tick"]);
    Ok(())
}
