use core::convert::TryFrom;
use std::fmt;

use ux::{u12, u4};

use crate::chip::chip8::opcodes::{Instruction, Opcode};

/// Renders `word` as assembly text, e.g. `LD V3, 0x2A`. Words that are not
/// part of the instruction set render as `??? 0xWORD`. This is purely a
/// tracing aid; it never affects the emulated state.
pub fn disassemble(word: u16) -> String {
    match Instruction::try_from(Opcode::new(word)) {
        Ok(instruction) => instruction.to_string(),
        Err(_) => format!("??? {:#06X}", word),
    }
}

struct V(u4);

impl fmt::Display for V {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "V{:X}", u8::from(self.0))
    }
}

struct Address(u12);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#05X}", u16::from(self.0))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { address } => write!(f, "JP {}", Address(address)),
            Call { address } => write!(f, "CALL {}", Address(address)),
            SkipIfEqual { x, value } => write!(f, "SE {}, {:#04X}", V(x), value),
            SkipIfNotEqual { x, value } => write!(f, "SNE {}, {:#04X}", V(x), value),
            SkipIfRegistersEqual { x, y } => write!(f, "SE {}, {}", V(x), V(y)),
            Load { x, value } => write!(f, "LD {}, {:#04X}", V(x), value),
            AddValue { x, value } => write!(f, "ADD {}, {:#04X}", V(x), value),
            Move { x, y } => write!(f, "LD {}, {}", V(x), V(y)),
            Or { x, y } => write!(f, "OR {}, {}", V(x), V(y)),
            And { x, y } => write!(f, "AND {}, {}", V(x), V(y)),
            Xor { x, y } => write!(f, "XOR {}, {}", V(x), V(y)),
            Add { x, y } => write!(f, "ADD {}, {}", V(x), V(y)),
            Sub { x, y } => write!(f, "SUB {}, {}", V(x), V(y)),
            ShiftRight { x, y } => write!(f, "SHR {}, {}", V(x), V(y)),
            SubReversed { x, y } => write!(f, "SUBN {}, {}", V(x), V(y)),
            ShiftLeft { x, y } => write!(f, "SHL {}, {}", V(x), V(y)),
            SkipIfRegistersNotEqual { x, y } => write!(f, "SNE {}, {}", V(x), V(y)),
            LoadIndex { address } => write!(f, "LD I, {}", Address(address)),
            JumpOffset { address } => write!(f, "JP V0, {}", Address(address)),
            Random { x, mask } => write!(f, "RND {}, {:#04X}", V(x), mask),
            Draw { x, y, rows } => write!(f, "DRW {}, {}, {}", V(x), V(y), u8::from(rows)),
            SkipIfKeyDown { x } => write!(f, "SKP {}", V(x)),
            SkipIfKeyUp { x } => write!(f, "SKNP {}", V(x)),
            LoadDelay { x } => write!(f, "LD {}, DT", V(x)),
            WaitForKey { x } => write!(f, "LD {}, K", V(x)),
            SetDelay { x } => write!(f, "LD DT, {}", V(x)),
            SetSound { x } => write!(f, "LD ST, {}", V(x)),
            AddIndex { x } => write!(f, "ADD I, {}", V(x)),
            LoadGlyph { x } => write!(f, "LD F, {}", V(x)),
            StoreBcd { x } => write!(f, "LD B, {}", V(x)),
            StoreRegisters { x } => write!(f, "LD [I], {}", V(x)),
            LoadRegisters { x } => write!(f, "LD {}, [I]", V(x)),
        }
    }
}
