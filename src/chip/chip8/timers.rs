use std::convert::TryFrom;
use std::time::Duration;

use log::debug;

use crate::chip::chip8::constants::CHIP8_TIMER_FREQUENCY;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The delay and sound timers. Both count down at `CHIP8_TIMER_FREQUENCY`
/// Hz of wall-clock time, independent of how fast instructions execute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,

    /// Elapsed time that has not yet been turned into whole timer ticks,
    /// stored as nanoseconds times `CHIP8_TIMER_FREQUENCY` so that the
    /// tick period (1/60 s) needs no rounding.
    debt: u128,
}

impl Timers {
    pub fn new() -> Self {
        Timers::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Whether a tone should currently be played.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Resets both timers and forgets any accumulated time.
    pub fn reset(&mut self) {
        *self = Timers::default();
    }

    /// Ages both timers by `elapsed`. Returns the number of whole ticks that
    /// were applied; the remainder is carried over into the next call.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.debt += elapsed.as_nanos() * CHIP8_TIMER_FREQUENCY as u128;
        let ticks = self.debt / NANOS_PER_SECOND;
        self.debt %= NANOS_PER_SECOND;

        if ticks == 0 {
            return 0;
        }

        let decrement = u8::try_from(ticks).unwrap_or(u8::MAX);
        let was_sounding = self.sound_active();
        self.delay = self.delay.saturating_sub(decrement);
        self.sound = self.sound.saturating_sub(decrement);
        if was_sounding && !self.sound_active() {
            debug!("Sound timer expired");
        }

        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}
