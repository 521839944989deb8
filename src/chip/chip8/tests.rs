use std::time::Duration;

use proptest::prelude::*;
use ux::u4;

use crate::chip::chip8::{
    frame_buffer::FrameBuffer,
    peripherals::{ChannelKeypad, KeyEvent, NoDisplay, PinKeypad},
    Chip8, RunState,
};
use crate::chip::{Chip, ExecutionError, LoadProgramError, StepOutcome};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn v(register: u8) -> u4 {
    u4::new(register)
}

fn program_bytes(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn prepare_state_with_program(program: &[u16]) -> Chip8 {
    init_logger();
    let mut chip8 = Chip8::new().with_seed(8);
    chip8.load_program(&program_bytes(program)).unwrap();
    chip8
}

/// Loads `program`, lets `before_step` prepare the state, executes one step and
/// hands the result to `after_step`.
fn do_step(
    program: &[u16],
    before_step: fn(&mut Chip8),
    after_step: fn(&mut Chip8, Result<StepOutcome, ExecutionError>),
) {
    let mut chip8 = prepare_state_with_program(program);
    before_step(&mut chip8);
    let result = chip8.step();
    after_step(&mut chip8, result);
}

fn step_all(chip8: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
    }
}

#[test]
fn test_step_before_initialize() {
    let mut chip8 = Chip8::new();
    assert_eq!(chip8.run_state(), &RunState::Uninitialized);
    assert_eq!(chip8.step(), Err(ExecutionError::NotInitialized));

    chip8.initialize(0x300);
    assert_eq!(chip8.registers().program_counter(), 0x300);
    assert_eq!(chip8.run_state(), &RunState::Running);
}

#[test]
fn test_initialize_resets_state() {
    let mut chip8 = prepare_state_with_program(&[0x6A07, 0xA123, 0x2206, 0x0000]);
    chip8.registers.set_flag(1);
    chip8.timers.set_delay(20);
    step_all(&mut chip8, 3);

    chip8.initialize(0x200);
    assert_eq!(chip8.registers().program_counter(), 0x200);
    assert_eq!(chip8.registers().index(), 0);
    assert_eq!(chip8.registers().general(), &[0; 16]);
    assert_eq!(chip8.stack().depth(), 0);
    assert_eq!(chip8.timers().delay(), 0);
}

#[test]
fn test_load_program_too_large() {
    let mut chip8 = prepare_state_with_program(&[0x6A07]);
    assert_eq!(
        chip8.load_program(&vec![0xFF; 4096]),
        Err(LoadProgramError::ProgramTooLarge {
            len: 4096,
            base: 0x200,
            capacity: 4096
        })
    );
    assert_eq!(chip8.memory().read_word(0x200), Ok(0x6A07));
    assert_eq!(chip8.step(), Err(ExecutionError::NotInitialized));
}

#[test]
fn test_clear_screen() {
    let mut chip8 = Chip8::with_peripherals(FrameBuffer::new(), PinKeypad::new());
    // LD I, 0x000; DRW V0, V0, 5; CLS
    chip8
        .load_program(&program_bytes(&[0xA000, 0xD005, 0x00E0]))
        .unwrap();
    step_all_generic(&mut chip8, 2);
    assert!(chip8.display().pixel(0, 0));

    assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
    assert!(chip8.display().pixels().iter().all(|pixel| !pixel));
    assert_eq!(chip8.registers().program_counter(), 0x206);
}

#[test]
fn test_jump() {
    do_step(
        &[0x1234],
        |state| {
            assert_eq!(state.registers.program_counter(), 0x200);
        },
        |state, result| {
            assert_eq!(result, Ok(StepOutcome::Executed));
            assert_eq!(state.registers.program_counter(), 0x234);
        },
    )
}

#[test]
fn test_call() {
    do_step(
        &[0x2CAF],
        |state| {
            assert_eq!(state.registers.program_counter(), 0x200);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0xCAF);
            assert_eq!(state.stack.depth(), 1);
            assert_eq!(state.stack.pop(), Ok(0x202));
        },
    )
}

#[test]
fn test_call_and_return() {
    // CALL 0x234 ... 0x234: RET
    let mut chip8 = prepare_state_with_program(&[0x2234]);
    chip8.memory.write_slice(0x234, &[0x00, 0xEE]).unwrap();
    step_all(&mut chip8, 2);
    assert_eq!(chip8.registers().program_counter(), 0x202);
    assert_eq!(chip8.stack().depth(), 0);
}

#[test]
fn test_stack_overflow_leaves_state_unchanged() {
    // CALL 0x200 recurses forever
    let mut chip8 = prepare_state_with_program(&[0x2200]);
    step_all(&mut chip8, 16);
    assert_eq!(chip8.step(), Err(ExecutionError::StackOverflow));
    assert_eq!(chip8.registers().program_counter(), 0x200);
    assert_eq!(chip8.stack().depth(), 16);
    assert_eq!(
        chip8.run_state(),
        &RunState::Halted(ExecutionError::StackOverflow)
    );
    // a halted chip keeps reporting its error
    assert_eq!(chip8.step(), Err(ExecutionError::StackOverflow));
}

#[test]
fn test_stack_underflow() {
    do_step(
        &[0x00EE],
        |_| {},
        |state, result| {
            assert_eq!(result, Err(ExecutionError::StackUnderflow));
            assert_eq!(state.registers.program_counter(), 0x200);
        },
    )
}

#[test]
fn test_skip_if_equal() {
    do_step(
        &[0x34AF],
        |state| {
            state.registers.set(v(4), 0xAF);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );

    do_step(
        &[0x34BF],
        |state| {
            state.registers.set(v(4), 0xAF);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );
}

#[test]
fn test_skip_if_not_equal() {
    do_step(
        &[0x4411],
        |state| {
            state.registers.set(v(4), 0x10);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );

    do_step(
        &[0x4410],
        |state| {
            state.registers.set(v(4), 0x10);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );
}

#[test]
fn test_skip_if_registers_equal() {
    do_step(
        &[0x5120],
        |state| {
            state.registers.set(v(1), 7);
            state.registers.set(v(2), 7);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );

    do_step(
        &[0x9120],
        |state| {
            state.registers.set(v(1), 7);
            state.registers.set(v(2), 7);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );

    do_step(
        &[0x9120],
        |state| {
            state.registers.set(v(1), 7);
            state.registers.set(v(2), 8);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );
}

#[test]
fn test_load_and_add_value() {
    do_step(
        &[0x6A42],
        |_| {},
        |state, _| {
            assert_eq!(state.registers.get(v(0xA)), 0x42);
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );

    do_step(
        &[0x7AFF],
        |state| {
            state.registers.set(v(0xA), 0x02);
            state.registers.set_flag(0x55);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(0xA)), 0x01);
            // the carry flag is not touched
            assert_eq!(state.registers.get_flag(), 0x55);
        },
    );
}

#[test]
fn test_bitwise_operations() {
    let mut chip8 = prepare_state_with_program(&[0x8120, 0x8131, 0x8142, 0x8153]);
    chip8.registers.set(v(2), 0b1100);
    chip8.registers.set(v(3), 0b0011);
    chip8.registers.set(v(4), 0b0110);
    chip8.registers.set(v(5), 0b0101);
    chip8.registers.set_flag(9);
    step_all(&mut chip8, 4);
    // ((0b1100 | 0b0011) & 0b0110) ^ 0b0101
    assert_eq!(chip8.registers().get(v(1)), 0b0011);
    assert_eq!(chip8.registers().get_flag(), 9);
}

#[test]
fn test_add_with_carry() {
    do_step(
        &[0x8124],
        |state| {
            state.registers.set(v(1), 200);
            state.registers.set(v(2), 100);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 44);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    do_step(
        &[0x8124],
        |state| {
            state.registers.set(v(1), 10);
            state.registers.set(v(2), 20);
            state.registers.set_flag(1);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 30);
            assert_eq!(state.registers.get_flag(), 0);
        },
    );
}

#[test]
fn test_sub() {
    do_step(
        &[0x8125],
        |state| {
            state.registers.set(v(1), 10);
            state.registers.set(v(2), 20);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 246);
            assert_eq!(state.registers.get_flag(), 0);
        },
    );

    do_step(
        &[0x8125],
        |state| {
            state.registers.set(v(1), 20);
            state.registers.set(v(2), 10);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 10);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    do_step(
        &[0x8125],
        |state| {
            state.registers.set(v(1), 10);
            state.registers.set(v(2), 10);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 0);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );
}

#[test]
fn test_sub_reversed() {
    do_step(
        &[0x8127],
        |state| {
            state.registers.set(v(1), 10);
            state.registers.set(v(2), 20);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 10);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    do_step(
        &[0x8127],
        |state| {
            state.registers.set(v(1), 20);
            state.registers.set(v(2), 10);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 246);
            assert_eq!(state.registers.get_flag(), 0);
        },
    );
}

#[test]
fn test_shifts() {
    do_step(
        &[0x8126],
        |state| {
            state.registers.set(v(1), 0b1000_0101);
            state.registers.set(v(2), 0xFF);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 0b0100_0010);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    do_step(
        &[0x812E],
        |state| {
            state.registers.set(v(1), 0b1000_0101);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 0b0000_1010);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    do_step(
        &[0x812E],
        |state| {
            state.registers.set(v(1), 0b0100_0000);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 0b1000_0000);
            assert_eq!(state.registers.get_flag(), 0);
        },
    );
}

#[test]
fn test_flag_is_written_last() {
    // ADD VF, V1: the carry overwrites the sum
    do_step(
        &[0x8F14],
        |state| {
            state.registers.set_flag(200);
            state.registers.set(v(1), 100);
        },
        |state, _| {
            assert_eq!(state.registers.get_flag(), 1);
        },
    );

    // SUB V1, VF: VF is read as source before it becomes the flag
    do_step(
        &[0x81F5],
        |state| {
            state.registers.set(v(1), 5);
            state.registers.set_flag(3);
        },
        |state, _| {
            assert_eq!(state.registers.get(v(1)), 2);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );
}

#[test]
fn test_load_index_and_jump_offset() {
    do_step(
        &[0xA123],
        |_| {},
        |state, _| {
            assert_eq!(state.registers.index(), 0x123);
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );

    do_step(
        &[0xB300],
        |state| {
            state.registers.set(v(0), 0x24);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x324);
        },
    );
}

#[test]
fn test_random_is_masked() {
    let mut chip8 = prepare_state_with_program(&[0xC30F, 0xC400]);
    step_all(&mut chip8, 2);
    assert_eq!(chip8.registers().get(v(3)) & 0xF0, 0);
    assert_eq!(chip8.registers().get(v(4)), 0);
}

#[test]
fn test_random_is_reproducible_with_seed() {
    let mut first = prepare_state_with_program(&[0xC1FF, 0xC2FF, 0xC3FF]);
    let mut second = prepare_state_with_program(&[0xC1FF, 0xC2FF, 0xC3FF]);
    step_all(&mut first, 3);
    step_all(&mut second, 3);
    assert_eq!(first.registers().general(), second.registers().general());
}

fn step_all_generic<D, K>(chip8: &mut Chip8<D, K>, steps: usize)
where
    D: crate::chip::chip8::peripherals::Display,
    K: crate::chip::chip8::peripherals::Keypad,
{
    for _ in 0..steps {
        assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
    }
}

#[test]
fn test_draw_reports_collisions() {
    let mut chip8 = Chip8::with_peripherals(FrameBuffer::new(), PinKeypad::new());
    // LD V1, 0x3E; LD V2, 0x1E; LD F, V0 (V0 holds 0xE); DRW V1, V2, 5; DRW V1, V2, 5
    chip8
        .load_program(&program_bytes(&[0x613E, 0x621E, 0xF029, 0xD125, 0xD125]))
        .unwrap();
    chip8.registers.set(v(0), 0xE);
    step_all_generic(&mut chip8, 4);

    assert_eq!(chip8.registers().index(), 0xE * 5);
    assert_eq!(chip8.registers().get_flag(), 0);
    // 0xF0 at (62, 30) wraps around to the left edge
    assert!(chip8.display().pixel(62, 30));
    assert!(chip8.display().pixel(1, 30));
    assert!(!chip8.display().pixel(2, 30));

    step_all_generic(&mut chip8, 1);
    assert_eq!(chip8.registers().get_flag(), 1);
    assert!(chip8.display().pixels().iter().all(|pixel| !pixel));
}

#[test]
fn test_draw_with_sprite_beyond_memory() {
    do_step(
        &[0xD01F],
        |state| {
            state.registers.set_index(0xFFA);
            state.registers.set_flag(7);
        },
        |state, result| {
            assert_eq!(result, Err(ExecutionError::OutOfBounds { address: 0x1000 }));
            assert_eq!(state.registers.get_flag(), 7);
            assert_eq!(state.registers.program_counter(), 0x200);
        },
    );
}

#[test]
fn test_skip_if_key() {
    do_step(
        &[0xE39E],
        |state| {
            state.registers.set(v(3), 0xC);
            state.keypad.set_input_pin(v(0xC), true);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );

    do_step(
        &[0xE3A1],
        |state| {
            state.registers.set(v(3), 0xC);
            state.keypad.set_input_pin(v(0xC), true);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );

    do_step(
        &[0xE3A1],
        |state| {
            state.registers.set(v(3), 0xC);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x204);
        },
    );

    // 0x1C names no key, so it is never down
    do_step(
        &[0xE39E],
        |state| {
            state.registers.set(v(3), 0x1C);
            state.keypad.set_input_pin(v(0xC), true);
        },
        |state, _| {
            assert_eq!(state.registers.program_counter(), 0x202);
        },
    );
}

#[test]
fn test_wait_for_key() {
    let mut chip8 = prepare_state_with_program(&[0xF50A, 0x6101]);
    assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
    assert!(chip8.is_waiting_for_key());
    assert_eq!(
        chip8.run_state(),
        &RunState::WaitingForKey { register: v(5) }
    );

    // nothing happens until a key is pressed
    assert_eq!(chip8.step(), Ok(StepOutcome::WaitingForKey));
    assert_eq!(chip8.step(), Ok(StepOutcome::WaitingForKey));
    assert_eq!(chip8.registers().program_counter(), 0x200);

    chip8.keypad_mut().set_input_pin(v(0xB), true);
    assert_eq!(chip8.step(), Ok(StepOutcome::KeyReceived(v(0xB))));
    assert_eq!(chip8.registers().get(v(5)), 0xB);
    assert_eq!(chip8.registers().program_counter(), 0x202);
    assert!(!chip8.is_waiting_for_key());

    // holding the key does not count as another press
    assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
    assert_eq!(chip8.registers().get(v(1)), 1);
    assert_eq!(chip8.registers().program_counter(), 0x204);
}

#[test]
fn test_timers_run_while_waiting_for_key() {
    let mut chip8 = prepare_state_with_program(&[0xF00A]);
    chip8.timers.set_delay(10);
    step_all(&mut chip8, 1);
    chip8.tick(Duration::from_millis(100));
    assert_eq!(chip8.timers().delay(), 4);
}

#[test]
fn test_wait_for_key_through_channel() {
    let (keypad, sender) = ChannelKeypad::new();
    let mut chip8 = Chip8::with_peripherals(NoDisplay, keypad);
    chip8.load_program(&program_bytes(&[0xF70A])).unwrap();

    step_all_generic(&mut chip8, 1);
    assert_eq!(chip8.step(), Ok(StepOutcome::WaitingForKey));

    std::thread::spawn(move || {
        sender.send(KeyEvent::Down(u4::new(0x4))).unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(chip8.step(), Ok(StepOutcome::KeyReceived(u4::new(0x4))));
    assert_eq!(chip8.registers().get(v(7)), 0x4);
    assert_eq!(chip8.registers().program_counter(), 0x202);
}

#[test]
fn test_wait_for_key_ignores_earlier_presses() {
    let mut chip8 = prepare_state_with_program(&[0x6101, 0xF50A]);
    chip8.keypad_mut().set_input_pin(v(0xB), true);
    chip8.keypad_mut().set_input_pin(v(0xB), false);

    step_all(&mut chip8, 2);
    assert_eq!(chip8.step(), Ok(StepOutcome::WaitingForKey));
    assert_eq!(chip8.registers().get(v(5)), 0);
    assert_eq!(chip8.registers().program_counter(), 0x202);

    chip8.keypad_mut().set_input_pin(v(0xB), true);
    assert_eq!(chip8.step(), Ok(StepOutcome::KeyReceived(v(0xB))));
    assert_eq!(chip8.registers().program_counter(), 0x204);
}

#[test]
fn test_key_events_are_taken_in_without_key_instructions() {
    let (keypad, sender) = ChannelKeypad::new();
    let mut chip8 = Chip8::with_peripherals(NoDisplay, keypad);
    // JP 0x200
    chip8.load_program(&program_bytes(&[0x1200])).unwrap();

    for i in 0..1000u16 {
        let key = u4::new((i % 16) as u8);
        assert!(sender.try_send(KeyEvent::Down(key)).is_ok());
        assert!(sender.try_send(KeyEvent::Up(key)).is_ok());
        step_all_generic(&mut chip8, 1);
    }
    assert_eq!(chip8.registers().program_counter(), 0x200);
}

#[test]
fn test_delay_timer() {
    // LD DT, V1; LD V2, DT
    let mut chip8 = prepare_state_with_program(&[0xF115, 0xF207]);
    chip8.registers.set(v(1), 60);
    step_all(&mut chip8, 1);
    assert_eq!(chip8.timers().delay(), 60);

    chip8.tick(Duration::from_millis(500));
    step_all(&mut chip8, 1);
    assert_eq!(chip8.registers().get(v(2)), 30);

    chip8.tick(Duration::from_millis(250));
    chip8.tick(Duration::from_millis(100));
    chip8.tick(Duration::from_millis(150));
    assert_eq!(chip8.timers().delay(), 0);
}

#[test]
fn test_sound_timer() {
    let mut chip8 = prepare_state_with_program(&[0xF118]);
    chip8.registers.set(v(1), 2);
    assert!(!chip8.sound_active());
    step_all(&mut chip8, 1);
    assert!(chip8.sound_active());

    chip8.tick(Duration::from_millis(17));
    assert!(chip8.sound_active());
    chip8.tick(Duration::from_millis(17));
    assert!(!chip8.sound_active());
}

#[test]
fn test_add_index() {
    do_step(
        &[0xF31E],
        |state| {
            state.registers.set_index(0xFF0);
            state.registers.set(v(3), 0x0F);
        },
        |state, _| {
            assert_eq!(state.registers.index(), 0xFFF);
            assert_eq!(state.registers.get_flag(), 0);
        },
    );

    do_step(
        &[0xF31E],
        |state| {
            state.registers.set_index(0xFF0);
            state.registers.set(v(3), 0x10);
        },
        |state, _| {
            assert_eq!(state.registers.index(), 0x1000);
            assert_eq!(state.registers.get_flag(), 1);
        },
    );
}

#[test]
fn test_load_glyph() {
    do_step(
        &[0xF429],
        |state| {
            state.registers.set(v(4), 0x7);
        },
        |state, _| {
            assert_eq!(state.registers.index(), 35);
            assert_eq!(
                state.memory.read_slice(state.registers.index(), 5),
                Ok(&[0xF0, 0x10, 0x20, 0x40, 0x40][..])
            );
        },
    );
}

#[test]
fn test_store_bcd() {
    do_step(
        &[0xF233],
        |state| {
            state.registers.set(v(2), 234);
            state.registers.set_index(0x300);
        },
        |state, _| {
            assert_eq!(state.memory.read_slice(0x300, 3), Ok(&[2, 3, 4][..]));
            assert_eq!(state.registers.index(), 0x300);
        },
    );

    do_step(
        &[0xF233],
        |state| {
            state.registers.set(v(2), 7);
            state.registers.set_index(0x300);
        },
        |state, _| {
            assert_eq!(state.memory.read_slice(0x300, 3), Ok(&[0, 0, 7][..]));
        },
    );
}

#[test]
fn test_store_and_load_registers() {
    // LD [I], V5; LD V0, 0; ...; LD V5, [I]
    let mut chip8 = prepare_state_with_program(&[
        0xF555, 0x6000, 0x6100, 0x6200, 0x6300, 0x6400, 0x6500, 0x66AA, 0xF565,
    ]);
    let values = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC];
    for (register, value) in values.iter().enumerate() {
        chip8.registers.set(v(register as u8), *value);
    }
    chip8.registers.set(v(6), 0x66);
    chip8.registers.set_index(0x400);

    step_all(&mut chip8, 1);
    assert_eq!(
        chip8.memory().read_slice(0x400, 7),
        Ok(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0][..])
    );
    assert_eq!(chip8.registers().index(), 0x400);

    step_all(&mut chip8, 8);
    assert_eq!(&chip8.registers().general()[..6], &values[..]);
    // V6 is outside the range and keeps the value it was given
    assert_eq!(chip8.registers().get(v(6)), 0xAA);
    assert_eq!(chip8.registers().index(), 0x400);
}

#[test]
fn test_store_registers_beyond_memory() {
    do_step(
        &[0xF355],
        |state| {
            state.registers.set_index(0xFFE);
            state.registers.set(v(0), 1);
        },
        |state, result| {
            assert_eq!(result, Err(ExecutionError::OutOfBounds { address: 0x1000 }));
            assert_eq!(state.memory.read_slice(0xFFE, 2), Ok(&[0, 0][..]));
            assert_eq!(state.registers.program_counter(), 0x200);
        },
    );
}

#[test]
fn test_illegal_instruction_leaves_state_unchanged() {
    for word in &[0x9001, 0x0123, 0x800F, 0xE0FF, 0xF0FF] {
        let mut chip8 = prepare_state_with_program(&[*word]);
        chip8.registers.set(v(3), 0x33);
        let registers = chip8.registers().clone();

        assert_eq!(
            chip8.step(),
            Err(ExecutionError::IllegalInstruction {
                opcode: *word,
                pc: 0x200
            })
        );
        assert_eq!(chip8.registers(), &registers);
    }
}

#[test]
fn test_fetch_beyond_memory() {
    do_step(
        &[0x1FFF],
        |_| {},
        |state, result| {
            assert_eq!(result, Ok(StepOutcome::Executed));
            assert_eq!(
                state.step(),
                Err(ExecutionError::OutOfBounds { address: 0x1000 })
            );
            assert_eq!(state.registers.program_counter(), 0xFFF);
        },
    );
}

proptest! {
    #[test]
    fn test_add_flag_matches_wide_sum(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = prepare_state_with_program(&[0x8124]);
        chip8.registers.set(v(1), a);
        chip8.registers.set(v(2), b);
        chip8.step().unwrap();

        let sum = a as u16 + b as u16;
        prop_assert_eq!(chip8.registers().get(v(1)) as u16, sum % 256);
        prop_assert_eq!(chip8.registers().get_flag() as u16, (sum > 255) as u16);
    }

    #[test]
    fn test_sub_flag_matches_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = prepare_state_with_program(&[0x8125]);
        chip8.registers.set(v(1), a);
        chip8.registers.set(v(2), b);
        chip8.step().unwrap();

        prop_assert_eq!(chip8.registers().get(v(1)), a.wrapping_sub(b));
        prop_assert_eq!(chip8.registers().get_flag(), (b <= a) as u8);
    }
}
