//! The fetch-decode-execute core of a CHIP-8 emulator. The implementation follows the
//! instruction set described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table).
//!
//! The core owns memory, registers, the call stack and the two 60 Hz timers. Screen
//! output and key input are reached through the [`Display`](chip::chip8::peripherals::Display)
//! and [`Keypad`](chip::chip8::peripherals::Keypad) hooks. A host drives the core by
//! alternating [`Chip::step`](chip::Chip::step) and [`Chip::tick`](chip::Chip::tick), either
//! by hand or through the [`ClockDriver`](driver::ClockDriver).
pub mod chip;
pub mod driver;

pub use chip::{
    chip8::{opcodes::disassemble, Chip8, RunState},
    Chip, ExecutionError, LoadProgramError, StepOutcome,
};
