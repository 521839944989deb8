use crate::chip::chip8::{
    constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH},
    peripherals::Display,
};

/// An in-memory 64x32 monochrome display. Sprites are XORed onto the
/// pixels and wrap around at the screen edges.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: [bool; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],

    /// Whether the pixels changed since `take_changed` was last called.
    changed: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],
            changed: false,
        }
    }

    /// Returns the pixels row by row.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[translate(x, y)]
    }

    /// Returns whether the pixels changed since the last call and resets the
    /// change marker. Hosts use this to skip redundant redraws.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new()
    }
}

fn translate(x: usize, y: usize) -> usize {
    (x % CHIP8_DISPLAY_WIDTH) + (y % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH
}

impl Display for FrameBuffer {
    fn clear(&mut self) {
        self.pixels = [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT];
        self.changed = true;
    }

    fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collided = false;
        for (y_pos, row) in sprite.iter().enumerate() {
            let mut pixel_mask = 0x80;
            for x_pos in 0..8 {
                if row & pixel_mask != 0 {
                    let pixel_pos = translate(x as usize + x_pos, y as usize + y_pos);
                    if self.pixels[pixel_pos] {
                        collided = true;
                    }
                    self.pixels[pixel_pos] ^= true;
                    self.changed = true;
                }
                pixel_mask >>= 1;
            }
        }
        collided
    }
}
