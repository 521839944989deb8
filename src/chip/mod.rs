pub mod chip8;

use std::time::Duration;

use thiserror::Error;
use ux::u4;

/// Common interface of an emulated chip as seen by a host. A host loads a
/// program and then alternates `step` and `tick` at whatever cadence it
/// chooses.
pub trait Chip {
    /// The type used to address the chip's memory.
    type MemoryAddress;

    /// Resets the chip, copies `program` into the program region and
    /// initializes the chip so it is ready to execute it. Returns the
    /// number of bytes loaded.
    fn load_program(&mut self, program: &[u8]) -> Result<usize, LoadProgramError>;

    /// Puts the chip into its initial execution state with the program
    /// counter at `load_address`.
    fn initialize(&mut self, load_address: Self::MemoryAddress);

    /// Executes exactly one instruction.
    fn step(&mut self) -> Result<StepOutcome, ExecutionError>;

    /// Ages the timers by `elapsed` wall-clock time.
    fn tick(&mut self, elapsed: Duration);

    /// Whether the chip currently wants a tone to be played.
    fn sound_active(&self) -> bool;
}

/// Observable result of a successful call to `Chip::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction was fetched and fully executed.
    Executed,

    /// The chip is suspended until a key is pressed. Nothing changed.
    WaitingForKey,

    /// A pending key wait was satisfied by the given key and execution
    /// resumed behind the waiting instruction.
    KeyReceived(u4),
}

/// Captures errors when loading a program into memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadProgramError {
    #[error("program of {len} bytes does not fit at {base:#05X} (memory holds {capacity} bytes)")]
    ProgramTooLarge {
        len: usize,
        base: u16,
        capacity: usize,
    },
}

/// Fatal errors raised while executing a program. The chip does not recover
/// from any of them on its own; it is up to the host to reset or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("memory access at {address:#06X} is out of bounds")]
    OutOfBounds { address: usize },

    #[error("illegal instruction {opcode:#06X} at {pc:#05X}")]
    IllegalInstruction { opcode: u16, pc: u16 },

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("chip was not initialized")]
    NotInitialized,
}
