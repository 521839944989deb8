use ux::{u12, u4};

use crate::chip::{
    chip8::{util, Chip8},
    ExecutionError,
};

/// `00EE`: returns to the address on top of the stack.
pub(super) fn ret<D, K>(state: &mut Chip8<D, K>) -> Result<(), ExecutionError> {
    let address = state.stack.pop()?;
    state.registers.set_program_counter(address);
    Ok(())
}

/// `1nnn`
pub(super) fn jump<D, K>(state: &mut Chip8<D, K>, address: u12) {
    state.registers.set_program_counter(u16::from(address));
}

/// `2nnn`: pushes the address of the next instruction and jumps.
pub(super) fn call<D, K>(state: &mut Chip8<D, K>, address: u12) -> Result<(), ExecutionError> {
    let return_address = state.registers.program_counter().wrapping_add(2);
    state.stack.push(return_address)?;
    state.registers.set_program_counter(u16::from(address));
    Ok(())
}

/// `Bnnn`
pub(super) fn jump_offset<D, K>(state: &mut Chip8<D, K>, address: u12) {
    let offset = state.registers.get(u4::new(0)) as u16;
    state
        .registers
        .set_program_counter(u16::from(address) + offset);
}

/// `3xnn`
pub(super) fn skip_if_equal<D, K>(state: &mut Chip8<D, K>, x: u4, value: u8) {
    let skip = state.registers.get(x) == value;
    util::conditional_skip(state, skip);
}

/// `4xnn`
pub(super) fn skip_if_not_equal<D, K>(state: &mut Chip8<D, K>, x: u4, value: u8) {
    let skip = state.registers.get(x) != value;
    util::conditional_skip(state, skip);
}

/// `5xy0`
pub(super) fn skip_if_registers_equal<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    let skip = state.registers.get(x) == state.registers.get(y);
    util::conditional_skip(state, skip);
}

/// `9xy0`
pub(super) fn skip_if_registers_not_equal<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    let skip = state.registers.get(x) != state.registers.get(y);
    util::conditional_skip(state, skip);
}
