//! Game lifecycle and timed sequence playback.
//!
//! The machine is driven from outside: the event loop calls `tick` once per
//! frame with the current time in milliseconds, and forwards resolved input
//! events to `handle_start` / `handle_select`. All waiting is expressed as
//! elapsed-time comparisons against that passed-in clock, so nothing here ever
//! blocks and tests can feed fixed timestamps.

use serde::{Deserialize, Serialize};

use crate::sequence::{SequenceController, SubmitOutcome};
use crate::wheel::Sector;

/// Gap before each flash, and trailing gap before input is accepted.
pub const LEAD_GAP_MS: u64 = 500;
/// How long each sequence element stays lit during playback.
pub const FLASH_MS: u64 = 600;
/// Pause between completing a round and the replay of the grown sequence.
pub const ROUND_PAUSE_MS: u64 = 1000;
/// How long the echo flash of a player selection stays lit.
pub const ECHO_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Waiting,
    Showing,
    Input,
    GameOver,
}

/// Transient playback state, present only while `Showing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PlaybackCursor {
    /// Which sequence element is being flashed next (0-based).
    index: usize,
    /// When the current gap started.
    phase_start_ms: u64,
    /// Set while the post-round pause is still running; playback begins once
    /// the clock reaches it.
    start_at_ms: Option<u64>,
}

/// The presentation state machine.
///
/// Owns the phase, the sequence controller, and the lit-sector state shared by
/// playback flashes and input echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMachine {
    controller: SequenceController,
    phase: GamePhase,
    cursor: Option<PlaybackCursor>,
    active: Option<Sector>,
    flash_start_ms: u64,
    quit: bool,
}

impl GameMachine {
    pub fn new(seed: u64) -> Self {
        Self {
            controller: SequenceController::new(seed),
            phase: GamePhase::Waiting,
            cursor: None,
            active: None,
            flash_start_ms: 0,
            quit: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.controller.level()
    }

    pub fn sequence(&self) -> &[Sector] {
        self.controller.sequence()
    }

    pub fn attempt(&self) -> &[Sector] {
        self.controller.attempt()
    }

    /// The currently lit sector, if any (playback flash or input echo).
    pub fn active_sector(&self) -> Option<Sector> {
        self.active
    }

    /// Milliseconds since the lit sector came on, for highlight rendering.
    pub fn since_active_start(&self, now_ms: u64) -> Option<u64> {
        self.active
            .map(|_| now_ms.saturating_sub(self.flash_start_ms))
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Starts a new game from `Waiting` or `GameOver`; ignored elsewhere.
    pub fn handle_start(&mut self, now_ms: u64) {
        match self.phase {
            GamePhase::Waiting | GamePhase::GameOver => {
                self.controller.reset();
                self.begin_playback(now_ms, None);
            }
            GamePhase::Showing | GamePhase::Input => {}
        }
    }

    /// Routes a resolved sector selection; a silent no-op outside `Input`.
    pub fn handle_select(&mut self, sector: Sector, now_ms: u64) {
        if self.phase != GamePhase::Input {
            return;
        }

        // Echo the selection immediately; gameplay doesn't depend on it.
        self.active = Some(sector);
        self.flash_start_ms = now_ms;

        match self.controller.submit(sector) {
            SubmitOutcome::Continue => {}
            SubmitOutcome::RoundComplete => {
                // The controller has already grown the sequence; replay it in
                // full after a fixed, non-blocking pause.
                self.begin_playback(now_ms, Some(now_ms + ROUND_PAUSE_MS));
            }
            SubmitOutcome::Failed => {
                self.phase = GamePhase::GameOver;
            }
        }
    }

    pub fn handle_quit(&mut self) {
        self.quit = true;
    }

    /// Advances timers and playback. Pure function of state and `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        match self.phase {
            GamePhase::Showing => self.tick_showing(now_ms),
            GamePhase::Input | GamePhase::GameOver => self.expire_echo(now_ms),
            GamePhase::Waiting => {}
        }
    }

    fn begin_playback(&mut self, now_ms: u64, start_at_ms: Option<u64>) {
        self.phase = GamePhase::Showing;
        self.cursor = Some(PlaybackCursor {
            index: 0,
            phase_start_ms: now_ms,
            start_at_ms,
        });
        if start_at_ms.is_none() {
            self.active = None;
        }
    }

    fn tick_showing(&mut self, now_ms: u64) {
        let Some(mut cursor) = self.cursor else {
            return;
        };

        if let Some(start_at) = cursor.start_at_ms {
            if now_ms < start_at {
                // Still in the post-round pause; only the echo decays.
                self.expire_echo(now_ms);
                return;
            }
            cursor.start_at_ms = None;
            cursor.phase_start_ms = now_ms;
            self.active = None;
        }

        let sequence = self.controller.sequence();
        if cursor.index < sequence.len() {
            match self.active {
                None => {
                    if now_ms.saturating_sub(cursor.phase_start_ms) > LEAD_GAP_MS {
                        self.active = Some(sequence[cursor.index]);
                        self.flash_start_ms = now_ms;
                    }
                }
                Some(_) => {
                    if now_ms.saturating_sub(self.flash_start_ms) > FLASH_MS {
                        self.active = None;
                        cursor.index += 1;
                        cursor.phase_start_ms = now_ms;
                    }
                }
            }
            self.cursor = Some(cursor);
        } else if now_ms.saturating_sub(cursor.phase_start_ms) > LEAD_GAP_MS {
            // Trailing gap elapsed: hand control to the player.
            self.cursor = None;
            self.active = None;
            self.controller.clear_attempt();
            self.phase = GamePhase::Input;
        } else {
            self.cursor = Some(cursor);
        }
    }

    fn expire_echo(&mut self, now_ms: u64) {
        if self.active.is_some() && now_ms.saturating_sub(self.flash_start_ms) > ECHO_MS {
            self.active = None;
        }
    }
}
