use crate::chip::chip8::Chip8;

/// Skips the next instruction if `skip` holds and moves on to the following
/// one either way.
pub fn conditional_skip<D, K>(state: &mut Chip8<D, K>, skip: bool) {
    if skip {
        increment_program_counter(state);
    }
    increment_program_counter(state);
}

pub fn increment_program_counter<D, K>(state: &mut Chip8<D, K>) {
    let program_counter = state.registers.program_counter();
    state
        .registers
        .set_program_counter(program_counter.wrapping_add(2));
}
