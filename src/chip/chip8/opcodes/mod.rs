mod arithmetic_and_logic;
mod disassembler;
mod program_flow;
mod system;

use core::convert::TryFrom;

use ux::{u12, u4};

use crate::chip::{
    chip8::{
        peripherals::{Display, Keypad},
        Chip8,
    },
    ExecutionError,
};

pub use disassembler::disassemble;

/// Represents a CHIP-8 opcode. A CHIP-8 opcode is two bytes long and is
/// stored big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    word: u16,
}

impl Opcode {
    pub fn new(word: u16) -> Opcode {
        Opcode { word }
    }

    /// Constructs a new `Opcode` given its byte representation.
    pub fn from_bytes(bytes: [u8; 2]) -> Opcode {
        Opcode::new(u16::from_be_bytes(bytes))
    }

    pub fn word(&self) -> u16 {
        self.word
    }

    /// Returns the four nibbles of the opcode, most significant first.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            (self.word >> 12) as u8,
            ((self.word >> 8) & 0xF) as u8,
            ((self.word >> 4) & 0xF) as u8,
            (self.word & 0xF) as u8,
        )
    }

    /// The instruction class is the most significant nibble.
    /// `[c___]`
    pub fn instruction_class(&self) -> u4 {
        u4::new(self.nibbles().0)
    }

    /// `[_x__]`
    pub fn x(&self) -> u4 {
        u4::new(self.nibbles().1)
    }

    /// `[__y_]`
    pub fn y(&self) -> u4 {
        u4::new(self.nibbles().2)
    }

    /// `[___n]`
    pub fn n(&self) -> u4 {
        u4::new(self.nibbles().3)
    }

    /// `[__nn]`
    pub fn nn(&self) -> u8 {
        (self.word & 0xFF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(&self) -> u12 {
        u12::new(self.word & 0xFFF)
    }
}

/// Captures errors when converting opcodes to their respective instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionParsingError {
    /// The opcode does not match any instruction of the base instruction set.
    UnknownOpcode(u16),
}

/// A decoded CHIP-8 instruction. There is one variant per instruction of the
/// base instruction set; `x` and `y` name registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1nnn`
    Jump { address: u12 },
    /// `2nnn`
    Call { address: u12 },
    /// `3xnn`
    SkipIfEqual { x: u4, value: u8 },
    /// `4xnn`
    SkipIfNotEqual { x: u4, value: u8 },
    /// `5xy0`
    SkipIfRegistersEqual { x: u4, y: u4 },
    /// `6xnn`
    Load { x: u4, value: u8 },
    /// `7xnn`
    AddValue { x: u4, value: u8 },
    /// `8xy0`
    Move { x: u4, y: u4 },
    /// `8xy1`
    Or { x: u4, y: u4 },
    /// `8xy2`
    And { x: u4, y: u4 },
    /// `8xy3`
    Xor { x: u4, y: u4 },
    /// `8xy4`
    Add { x: u4, y: u4 },
    /// `8xy5`
    Sub { x: u4, y: u4 },
    /// `8xy6`
    ShiftRight { x: u4, y: u4 },
    /// `8xy7`
    SubReversed { x: u4, y: u4 },
    /// `8xyE`
    ShiftLeft { x: u4, y: u4 },
    /// `9xy0`
    SkipIfRegistersNotEqual { x: u4, y: u4 },
    /// `Annn`
    LoadIndex { address: u12 },
    /// `Bnnn`
    JumpOffset { address: u12 },
    /// `Cxnn`
    Random { x: u4, mask: u8 },
    /// `Dxyn`
    Draw { x: u4, y: u4, rows: u4 },
    /// `Ex9E`
    SkipIfKeyDown { x: u4 },
    /// `ExA1`
    SkipIfKeyUp { x: u4 },
    /// `Fx07`
    LoadDelay { x: u4 },
    /// `Fx0A`
    WaitForKey { x: u4 },
    /// `Fx15`
    SetDelay { x: u4 },
    /// `Fx18`
    SetSound { x: u4 },
    /// `Fx1E`
    AddIndex { x: u4 },
    /// `Fx29`
    LoadGlyph { x: u4 },
    /// `Fx33`
    StoreBcd { x: u4 },
    /// `Fx55`
    StoreRegisters { x: u4 },
    /// `Fx65`
    LoadRegisters { x: u4 },
}

impl TryFrom<Opcode> for Instruction {
    type Error = InstructionParsingError;

    fn try_from(opcode: Opcode) -> Result<Self, Self::Error> {
        use Instruction::*;

        let (x, y) = (opcode.x(), opcode.y());
        let instruction = match opcode.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, _, _, _) => Jump {
                address: opcode.nnn(),
            },
            (0x2, _, _, _) => Call {
                address: opcode.nnn(),
            },
            (0x3, _, _, _) => SkipIfEqual {
                x,
                value: opcode.nn(),
            },
            (0x4, _, _, _) => SkipIfNotEqual {
                x,
                value: opcode.nn(),
            },
            (0x5, _, _, 0x0) => SkipIfRegistersEqual { x, y },
            (0x6, _, _, _) => Load {
                x,
                value: opcode.nn(),
            },
            (0x7, _, _, _) => AddValue {
                x,
                value: opcode.nn(),
            },
            (0x8, _, _, 0x0) => Move { x, y },
            (0x8, _, _, 0x1) => Or { x, y },
            (0x8, _, _, 0x2) => And { x, y },
            (0x8, _, _, 0x3) => Xor { x, y },
            (0x8, _, _, 0x4) => Add { x, y },
            (0x8, _, _, 0x5) => Sub { x, y },
            (0x8, _, _, 0x6) => ShiftRight { x, y },
            (0x8, _, _, 0x7) => SubReversed { x, y },
            (0x8, _, _, 0xE) => ShiftLeft { x, y },
            (0x9, _, _, 0x0) => SkipIfRegistersNotEqual { x, y },
            (0xA, _, _, _) => LoadIndex {
                address: opcode.nnn(),
            },
            (0xB, _, _, _) => JumpOffset {
                address: opcode.nnn(),
            },
            (0xC, _, _, _) => Random {
                x,
                mask: opcode.nn(),
            },
            (0xD, _, _, _) => Draw {
                x,
                y,
                rows: opcode.n(),
            },
            (0xE, _, 0x9, 0xE) => SkipIfKeyDown { x },
            (0xE, _, 0xA, 0x1) => SkipIfKeyUp { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitForKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => LoadGlyph { x },
            (0xF, _, 0x3, 0x3) => StoreBcd { x },
            (0xF, _, 0x5, 0x5) => StoreRegisters { x },
            (0xF, _, 0x6, 0x5) => LoadRegisters { x },
            _ => return Err(InstructionParsingError::UnknownOpcode(opcode.word())),
        };
        Ok(instruction)
    }
}

impl Instruction {
    /// Executes `self` relative to the given state. Every instruction checks
    /// everything that can fail before it modifies the state, so an error
    /// leaves the state as it was.
    pub(super) fn execute<D, K>(self, state: &mut Chip8<D, K>) -> Result<(), ExecutionError>
    where
        D: Display,
        K: Keypad,
    {
        use Instruction::*;

        match self {
            ClearScreen => system::clear_screen(state),
            Return => program_flow::ret(state)?,
            Jump { address } => program_flow::jump(state, address),
            Call { address } => program_flow::call(state, address)?,
            SkipIfEqual { x, value } => program_flow::skip_if_equal(state, x, value),
            SkipIfNotEqual { x, value } => program_flow::skip_if_not_equal(state, x, value),
            SkipIfRegistersEqual { x, y } => program_flow::skip_if_registers_equal(state, x, y),
            Load { x, value } => arithmetic_and_logic::load(state, x, value),
            AddValue { x, value } => arithmetic_and_logic::add_value(state, x, value),
            Move { x, y } => arithmetic_and_logic::move_register(state, x, y),
            Or { x, y } => arithmetic_and_logic::or(state, x, y),
            And { x, y } => arithmetic_and_logic::and(state, x, y),
            Xor { x, y } => arithmetic_and_logic::xor(state, x, y),
            Add { x, y } => arithmetic_and_logic::add(state, x, y),
            Sub { x, y } => arithmetic_and_logic::sub(state, x, y),
            ShiftRight { x, y } => arithmetic_and_logic::shift_right(state, x, y),
            SubReversed { x, y } => arithmetic_and_logic::sub_reversed(state, x, y),
            ShiftLeft { x, y } => arithmetic_and_logic::shift_left(state, x, y),
            SkipIfRegistersNotEqual { x, y } => {
                program_flow::skip_if_registers_not_equal(state, x, y)
            }
            LoadIndex { address } => arithmetic_and_logic::load_index(state, address),
            JumpOffset { address } => program_flow::jump_offset(state, address),
            Random { x, mask } => arithmetic_and_logic::random(state, x, mask),
            Draw { x, y, rows } => system::draw(state, x, y, rows)?,
            SkipIfKeyDown { x } => system::skip_if_key_down(state, x),
            SkipIfKeyUp { x } => system::skip_if_key_up(state, x),
            LoadDelay { x } => system::load_delay(state, x),
            WaitForKey { x } => system::wait_for_key(state, x),
            SetDelay { x } => system::set_delay(state, x),
            SetSound { x } => system::set_sound(state, x),
            AddIndex { x } => arithmetic_and_logic::add_index(state, x),
            LoadGlyph { x } => arithmetic_and_logic::load_glyph(state, x),
            StoreBcd { x } => arithmetic_and_logic::store_bcd(state, x)?,
            StoreRegisters { x } => arithmetic_and_logic::store_registers(state, x)?,
            LoadRegisters { x } => arithmetic_and_logic::load_registers(state, x)?,
        }
        Ok(())
    }
}
