use rand::Rng;
use ux::{u12, u4};

use crate::chip::{
    chip8::{
        constants::{CHIP8_CHARSET_OFFSET, CHIP8_GLYPH_LEN},
        util, Chip8,
    },
    ExecutionError,
};

/// Reads Vx and Vy, computes the new value of Vx and optionally a flag, and
/// then writes Vx followed by VF. Writing the flag last means a flag always
/// wins over a result that targets VF, and a source in VF is read before it
/// gets overwritten.
fn modify_registers<D, K>(
    state: &mut Chip8<D, K>,
    x: u4,
    y: u4,
    f: fn(u8, u8) -> (u8, Option<bool>),
) {
    let (value, flag) = f(state.registers.get(x), state.registers.get(y));
    state.registers.set(x, value);
    if let Some(flag) = flag {
        state.registers.set_flag(flag as u8);
    }
    util::increment_program_counter(state);
}

/// `6xnn`
pub(super) fn load<D, K>(state: &mut Chip8<D, K>, x: u4, value: u8) {
    state.registers.set(x, value);
    util::increment_program_counter(state);
}

/// `7xnn`: adds without touching the carry flag.
pub(super) fn add_value<D, K>(state: &mut Chip8<D, K>, x: u4, value: u8) {
    let sum = state.registers.get(x).wrapping_add(value);
    state.registers.set(x, sum);
    util::increment_program_counter(state);
}

/// `8xy0`
pub(super) fn move_register<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |_, v2| (v2, None));
}

/// `8xy1`
pub(super) fn or<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| (v1 | v2, None));
}

/// `8xy2`
pub(super) fn and<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| (v1 & v2, None));
}

/// `8xy3`
pub(super) fn xor<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| (v1 ^ v2, None));
}

/// `8xy4`: VF is the carry.
pub(super) fn add<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| {
        let (result, overflow) = v1.overflowing_add(v2);
        (result, Some(overflow))
    });
}

/// `8xy5`: VF is set if there was no borrow.
pub(super) fn sub<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| {
        let (result, overflow) = v1.overflowing_sub(v2);
        (result, Some(!overflow))
    });
}

/// `8xy6`: VF is the bit shifted out.
pub(super) fn shift_right<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, _| (v1 >> 1, Some(v1 & 1 != 0)));
}

/// `8xy7`: Vx = Vy - Vx, VF is set if there was no borrow.
pub(super) fn sub_reversed<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, v2| {
        let (result, overflow) = v2.overflowing_sub(v1);
        (result, Some(!overflow))
    });
}

/// `8xyE`: VF is the bit shifted out.
pub(super) fn shift_left<D, K>(state: &mut Chip8<D, K>, x: u4, y: u4) {
    modify_registers(state, x, y, |v1, _| (v1 << 1, Some(v1 & 0x80 != 0)));
}

/// `Annn`
pub(super) fn load_index<D, K>(state: &mut Chip8<D, K>, address: u12) {
    state.registers.set_index(u16::from(address));
    util::increment_program_counter(state);
}

/// `Cxnn`
pub(super) fn random<D, K>(state: &mut Chip8<D, K>, x: u4, mask: u8) {
    let sample: u8 = state.rng.gen();
    state.registers.set(x, sample & mask);
    util::increment_program_counter(state);
}

/// `Fx1E`: VF reports whether the sum left the 12-bit address space. The
/// check is done once, on the index before it is updated.
pub(super) fn add_index<D, K>(state: &mut Chip8<D, K>, x: u4) {
    let value = state.registers.get(x) as u16;
    let index = state.registers.index();
    let overflow = index as u32 + value as u32 > 0xFFF;
    state.registers.set_index(index.wrapping_add(value));
    state.registers.set_flag(overflow as u8);
    util::increment_program_counter(state);
}

/// `Fx29`
pub(super) fn load_glyph<D, K>(state: &mut Chip8<D, K>, x: u4) {
    let character = state.registers.get(x) as u16;
    state
        .registers
        .set_index(CHIP8_CHARSET_OFFSET + character * CHIP8_GLYPH_LEN);
    util::increment_program_counter(state);
}

/// `Fx33`
pub(super) fn store_bcd<D, K>(state: &mut Chip8<D, K>, x: u4) -> Result<(), ExecutionError> {
    let value = state.registers.get(x);
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.memory.write_slice(state.registers.index(), &digits)?;
    util::increment_program_counter(state);
    Ok(())
}

/// `Fx55`: stores V0 to Vx inclusive starting at I. I is left unmodified.
pub(super) fn store_registers<D, K>(
    state: &mut Chip8<D, K>,
    x: u4,
) -> Result<(), ExecutionError> {
    let count = u8::from(x) as usize + 1;
    let index = state.registers.index();
    state
        .memory
        .write_slice(index, &state.registers.general()[..count])?;
    util::increment_program_counter(state);
    Ok(())
}

/// `Fx65`: fills V0 to Vx inclusive starting at I. I is left unmodified.
pub(super) fn load_registers<D, K>(
    state: &mut Chip8<D, K>,
    x: u4,
) -> Result<(), ExecutionError> {
    let count = u8::from(x) as usize + 1;
    let values = state.memory.read_slice(state.registers.index(), count)?;
    for (register, value) in values.iter().enumerate() {
        state.registers.set(u4::new(register as u8), *value);
    }
    util::increment_program_counter(state);
    Ok(())
}
