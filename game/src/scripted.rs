//! Scripted driving of the game for headless runs.
//!
//! Wraps `GameMachine` in `engine::GameLogic` so a `HeadlessRunner` can step
//! it from a list of timestamped events, record every frame, and rewind.

use engine::GameLogic;
use serde::{Deserialize, Serialize};

use crate::machine::GameMachine;
use crate::wheel::Sector;

/// One timestamped event in a script. Timestamps are the driver clock in
/// milliseconds and must be non-decreasing for faithful playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptEvent {
    Tick(u64),
    Start(u64),
    Select(Sector, u64),
}

#[derive(Debug, Clone)]
pub struct WheelLogic {
    seed: u64,
}

impl WheelLogic {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GameLogic for WheelLogic {
    type State = GameMachine;
    type Input = ScriptEvent;

    fn initial_state(&self) -> Self::State {
        GameMachine::new(self.seed)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        match input {
            ScriptEvent::Tick(now_ms) => next.tick(now_ms),
            ScriptEvent::Start(now_ms) => next.handle_start(now_ms),
            ScriptEvent::Select(sector, now_ms) => next.handle_select(sector, now_ms),
        }
        next
    }
}

/// Script fragment that plays the current sequence presentation to completion,
/// ticking every `step_ms` from `from_ms` until past `until_ms`.
pub fn tick_script(from_ms: u64, until_ms: u64, step_ms: u64) -> impl Iterator<Item = ScriptEvent> {
    let step_ms = step_ms.max(1);
    (0..)
        .map(move |i| from_ms + i * step_ms)
        .take_while(move |&t| t <= until_ms)
        .map(ScriptEvent::Tick)
}
