use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::debug;

use crate::chip::{Chip, ExecutionError};

/// Capacity of the control channel returned by `ClockDriver::channel`.
const CONTROL_CAPACITY: usize = 16;

/// Represents a control event to be processed by the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Executes more cycles per second.
    SpeedUp,

    /// Executes fewer cycles per second.
    SlowDown,

    /// Stops executing instructions. Timers keep running.
    Pause,

    /// Continues after `Pause`.
    Resume,

    /// Shut down.
    Quit,
}

/// Cadence of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Number of instructions executed per second.
    pub cycles_per_second: u32,

    /// Amount by which `SpeedUp` and `SlowDown` change `cycles_per_second`.
    pub speed_step: u32,

    pub min_cycles_per_second: u32,

    pub max_cycles_per_second: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            cycles_per_second: 500,
            speed_step: 100,
            min_cycles_per_second: 100,
            max_cycles_per_second: 5000,
        }
    }
}

/// Drives a chip in real time: runs one instruction per cycle, ages the timers by
/// the wall-clock time that actually passed and sleeps for the rest of the cycle.
pub struct ClockDriver {
    config: ClockConfig,
    paused: bool,
    cycles: u64,
}

impl ClockDriver {
    pub fn new(config: ClockConfig) -> Self {
        ClockDriver {
            config,
            paused: false,
            cycles: 0,
        }
    }

    /// Constructs the channel the driver loop receives its control events on.
    pub fn channel() -> (Sender<Control>, Receiver<Control>) {
        bounded(CONTROL_CAPACITY)
    }

    pub fn cycles_per_second(&self) -> u32 {
        self.config.cycles_per_second
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of instructions executed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn cycle_period(&self) -> Duration {
        Duration::from_secs(1) / self.config.cycles_per_second.max(1)
    }

    /// Applies a control event. Returns false if the loop should stop.
    fn handle(&mut self, control: Control) -> bool {
        match control {
            Control::SpeedUp => {
                self.config.cycles_per_second = self
                    .config
                    .cycles_per_second
                    .saturating_add(self.config.speed_step)
                    .min(self.config.max_cycles_per_second);
                debug!("Running at {} Hz", self.config.cycles_per_second);
            }
            Control::SlowDown => {
                self.config.cycles_per_second = self
                    .config
                    .cycles_per_second
                    .saturating_sub(self.config.speed_step)
                    .max(self.config.min_cycles_per_second);
                debug!("Running at {} Hz", self.config.cycles_per_second);
            }
            Control::Pause => self.paused = true,
            Control::Resume => self.paused = false,
            Control::Quit => return false,
        }
        true
    }

    /// The driver loop. Constantly loops over (1) process all pending control
    /// events, (2) execute one instruction unless paused, (3) age the timers by
    /// the time passed since the last cycle, (4) sleep for the rest of the cycle
    /// period. Returns the number of executed instructions once `Quit` arrives or
    /// all senders are gone, and the chip's error as soon as a step fails.
    pub fn run<T: Chip>(
        &mut self,
        chip: &mut T,
        controls: &Receiver<Control>,
    ) -> Result<u64, ExecutionError> {
        let mut last_tick = Instant::now();
        loop {
            loop {
                match controls.try_recv() {
                    Ok(control) => {
                        if !self.handle(control) {
                            return Ok(self.cycles);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Ok(self.cycles),
                }
            }

            let cycle_start = Instant::now();
            if !self.paused {
                chip.step()?;
                self.cycles += 1;
            }

            let now = Instant::now();
            chip.tick(now.duration_since(last_tick));
            last_tick = now;

            if let Some(rest) = self.cycle_period().checked_sub(cycle_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

impl Default for ClockDriver {
    fn default() -> Self {
        ClockDriver::new(ClockConfig::default())
    }
}
