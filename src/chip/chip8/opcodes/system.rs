use log::debug;
use ux::u4;

use crate::chip::{
    chip8::{
        peripherals::{Display, Keypad},
        util, Chip8, RunState,
    },
    ExecutionError,
};

/// `00E0`
pub(super) fn clear_screen<D: Display, K>(state: &mut Chip8<D, K>) {
    state.display.clear();
    util::increment_program_counter(state);
}

/// `Dxyn`: draws the `rows` bytes at I. VF is set if the display reports a
/// collision and cleared otherwise.
pub(super) fn draw<D: Display, K>(
    state: &mut Chip8<D, K>,
    x: u4,
    y: u4,
    rows: u4,
) -> Result<(), ExecutionError> {
    let (x, y) = (state.registers.get(x), state.registers.get(y));
    let sprite = state
        .memory
        .read_slice(state.registers.index(), u8::from(rows) as usize)?;
    let collided = state.display.draw(x, y, sprite);
    state.registers.set_flag(collided as u8);
    util::increment_program_counter(state);
    Ok(())
}

/// Keys are addressed by the low nibble only; a register value above 0xF
/// names no key and is never pressed.
fn is_key_down<D, K: Keypad>(state: &mut Chip8<D, K>, x: u4) -> bool {
    let key = state.registers.get(x);
    key <= 0xF && state.keypad.is_down(u4::new(key))
}

/// `Ex9E`
pub(super) fn skip_if_key_down<D, K: Keypad>(state: &mut Chip8<D, K>, x: u4) {
    let skip = is_key_down(state, x);
    util::conditional_skip(state, skip);
}

/// `ExA1`
pub(super) fn skip_if_key_up<D, K: Keypad>(state: &mut Chip8<D, K>, x: u4) {
    let skip = !is_key_down(state, x);
    util::conditional_skip(state, skip);
}

/// `Fx07`
pub(super) fn load_delay<D, K>(state: &mut Chip8<D, K>, x: u4) {
    state.registers.set(x, state.timers.delay());
    util::increment_program_counter(state);
}

/// `Fx0A`: suspends execution until a key is pressed. The program counter
/// stays on this instruction until the key arrives. Presses made before the
/// wait started do not count.
pub(super) fn wait_for_key<D, K: Keypad>(state: &mut Chip8<D, K>, x: u4) {
    debug!(
        "Waiting for key at {:#05X}",
        state.registers.program_counter()
    );
    state.keypad.clear_key_presses();
    state.run_state = RunState::WaitingForKey { register: x };
}

/// `Fx15`
pub(super) fn set_delay<D, K>(state: &mut Chip8<D, K>, x: u4) {
    state.timers.set_delay(state.registers.get(x));
    util::increment_program_counter(state);
}

/// `Fx18`
pub(super) fn set_sound<D, K>(state: &mut Chip8<D, K>, x: u4) {
    let value = state.registers.get(x);
    if value > 0 {
        debug!("Sound on for {} ticks", value);
    }
    state.timers.set_sound(value);
    util::increment_program_counter(state);
}
