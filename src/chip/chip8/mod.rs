/// CHIP-8 constants.
pub mod constants;
/// In-memory display.
pub mod frame_buffer;
/// Main memory.
pub mod memory;
/// Decoding of opcodes and their execution.
pub mod opcodes;
/// Display and keypad hooks.
pub mod peripherals;
/// The register file.
pub mod registers;
/// The call stack.
pub mod stack;
/// The delay and sound timers.
pub mod timers;
/// Convenience functions for modification of the CHIP-8 state.
mod util;

#[cfg(test)]
mod tests;

use core::convert::TryFrom;
use std::time::Duration;

use log::{debug, error, trace};
use rand::{rngs::StdRng, SeedableRng};
use ux::u4;

use crate::chip::{
    chip8::{
        constants::CHIP8_PROGRAM_START,
        memory::Memory,
        opcodes::{Instruction, Opcode},
        peripherals::{Display, Keypad, NoDisplay, PinKeypad},
        registers::Registers,
        stack::Stack,
        timers::Timers,
    },
    Chip, ExecutionError, LoadProgramError, StepOutcome,
};

/// Execution state of the CHIP-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No program was loaded yet, or loading the last one failed.
    Uninitialized,

    /// Instructions are fetched and executed.
    Running,

    /// A `Fx0A` instruction is waiting for a key press to store in
    /// `register`.
    WaitingForKey { register: u4 },

    /// A fatal error occurred. The chip keeps reporting it until it is
    /// initialized again.
    Halted(ExecutionError),
}

/// Represents the state of the CHIP-8 together with its display and keypad.
pub struct Chip8<D = NoDisplay, K = PinKeypad> {
    /// 4096 bytes of main memory.
    memory: Memory,

    /// V0 to VF, the index register and the program counter.
    registers: Registers,

    /// Return addresses of the active subroutine calls.
    stack: Stack,

    /// The delay and sound timers. They are aged by `tick`, never by
    /// executing instructions.
    timers: Timers,

    run_state: RunState,

    /// Receives clear and draw requests.
    display: D,

    /// Answers key queries. While waiting for a key, it is polled on every
    /// step.
    keypad: K,

    /// Source of the `Cxnn` random numbers.
    rng: StdRng,
}

impl Chip8 {
    /// Constructs a new CHIP-8 without display and with a pin keypad. The
    /// charset is loaded, but no program is; call `load_program` or
    /// `initialize` before the first step.
    pub fn new() -> Self {
        Chip8::with_peripherals(NoDisplay, PinKeypad::new())
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}

impl<D, K> Chip8<D, K> {
    /// Constructs a new CHIP-8 using the given display and keypad.
    pub fn with_peripherals(display: D, keypad: K) -> Self {
        Chip8 {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: Stack::new(),
            timers: Timers::new(),
            run_state: RunState::Uninitialized,
            display,
            keypad,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source by one seeded with `seed`, which makes
    /// `Cxnn` reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Gives direct access to memory, e.g. to patch a program in place
    /// before it runs.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.run_state, RunState::WaitingForKey { .. })
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }
}

impl<D: Display, K: Keypad> Chip8<D, K> {
    /// Fetches and decodes the instruction the program counter points to.
    fn next_instruction(&self) -> Result<Instruction, ExecutionError> {
        let program_counter = self.registers.program_counter();
        let opcode = Opcode::new(self.memory.read_word(program_counter)?);
        Instruction::try_from(opcode).map_err(|_| ExecutionError::IllegalInstruction {
            opcode: opcode.word(),
            pc: program_counter,
        })
    }

    /// Fetches, decodes and executes one instruction. Nothing is modified
    /// if any of these fail.
    fn execute_next(&mut self) -> Result<(), ExecutionError> {
        let instruction = self.next_instruction()?;
        trace!(
            "{:#05X}: {} {:02X?} I={:#05X}",
            self.registers.program_counter(),
            instruction,
            self.registers.general(),
            self.registers.index()
        );
        instruction.execute(self)
    }

    /// Delivers the oldest pending key press to the waiting instruction, if
    /// there is one.
    fn poll_key(&mut self, register: u4) -> StepOutcome {
        match self.keypad.take_key_press() {
            Some(key) => {
                debug!("Received key {:X}", u8::from(key));
                self.registers.set(register, u8::from(key));
                util::increment_program_counter(self);
                self.run_state = RunState::Running;
                StepOutcome::KeyReceived(key)
            }
            None => StepOutcome::WaitingForKey,
        }
    }
}

impl<D: Display, K: Keypad> Chip for Chip8<D, K> {
    /// A CHIP-8 memory address is in the range between 0 and 4096
    /// (exclusive). We represent it using a u16; accesses beyond the range
    /// fail at run time.
    type MemoryAddress = u16;

    fn load_program(&mut self, program: &[u8]) -> Result<usize, LoadProgramError> {
        self.run_state = RunState::Uninitialized;

        let mut memory = Memory::new();
        memory.load(program, CHIP8_PROGRAM_START)?;
        self.memory = memory;
        self.initialize(CHIP8_PROGRAM_START);

        debug!("Loaded program of {} bytes", program.len());
        Ok(program.len())
    }

    fn initialize(&mut self, load_address: u16) {
        self.registers = Registers::new();
        self.registers.set_program_counter(load_address);
        self.stack.clear();
        self.timers.reset();
        self.run_state = RunState::Running;
        debug!("Initialized at {:#05X}", load_address);
    }

    /// Executes exactly one instruction. While a `Fx0A` instruction waits for
    /// a key, a step only polls the keypad: it returns
    /// `StepOutcome::WaitingForKey` without changing anything if no key was
    /// pressed, and otherwise stores the key and moves past the waiting
    /// instruction without executing another one. The keypad is given a
    /// chance to take in pending input on every step.
    fn step(&mut self) -> Result<StepOutcome, ExecutionError> {
        self.keypad.update();
        match self.run_state.clone() {
            RunState::Uninitialized => Err(ExecutionError::NotInitialized),
            RunState::Halted(error) => Err(error),
            RunState::WaitingForKey { register } => Ok(self.poll_key(register)),
            RunState::Running => match self.execute_next() {
                Ok(()) => Ok(StepOutcome::Executed),
                Err(e) => {
                    error!(
                        "Halting at {:#05X}: {}",
                        self.registers.program_counter(),
                        e
                    );
                    self.run_state = RunState::Halted(e.clone());
                    Err(e)
                }
            },
        }
    }

    /// Ages the timers. This works in every run state, including while
    /// waiting for a key.
    fn tick(&mut self, elapsed: Duration) {
        self.timers.advance(elapsed);
    }

    fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }
}
