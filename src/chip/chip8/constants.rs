/// Size of the main memory in bytes.
pub const CHIP8_MEMORY_SIZE: usize = 4096;

/// Address at which programs are loaded and execution starts.
pub const CHIP8_PROGRAM_START: u16 = 0x200;

/// Maximum number of nested subroutine calls.
pub const CHIP8_STACK_DEPTH: usize = 16;

/// Frequency at which the delay and sound timers are decremented.
pub const CHIP8_TIMER_FREQUENCY: u32 = 60;

/// Width of the display in pixels.
pub const CHIP8_DISPLAY_WIDTH: usize = 64;

/// Height of the display in pixels.
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

pub const CHIP8_CHARSET_OFFSET: u16 = 0x00;

/// Number of bytes occupied by a single glyph of the charset.
pub const CHIP8_GLYPH_LEN: u16 = 5;

pub const CHIP8_CHARSET_LEN: usize = 0x50; // 80

pub const CHIP8_CHARSET: [u8; CHIP8_CHARSET_LEN] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
