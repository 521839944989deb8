use std::collections::VecDeque;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use ux::u4;

/// Number of key events that can be queued in a `ChannelKeypad` before
/// senders are blocked.
pub const KEY_EVENT_CAPACITY: usize = 64;

/// Number of unconsumed key presses a `PinKeypad` keeps. Older presses are
/// dropped first.
pub const KEY_PRESS_CAPACITY: usize = 16;

/// Output side of the CHIP-8. The chip only tells the display what to do;
/// how pixels end up on a screen is up to the implementation.
pub trait Display {
    /// Clears the whole screen.
    fn clear(&mut self);

    /// Draws `sprite` at the given coordinates. Every byte of `sprite` is a
    /// row of 8 pixels, most significant bit first. Returns whether a set
    /// pixel was erased by the draw.
    fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool;
}

/// Input side of the CHIP-8: 16 keys addressed 0x0 to 0xF.
pub trait Keypad {
    /// Whether `key` is currently held down.
    fn is_down(&mut self, key: u4) -> bool;

    /// Returns the oldest key press that has not been consumed yet. The chip
    /// polls this while it is waiting for a key; it never blocks.
    fn take_key_press(&mut self) -> Option<u4>;

    /// Forgets all presses that were not consumed yet. Called when the chip
    /// starts waiting for a key, so only presses made afterwards count.
    fn clear_key_presses(&mut self);

    /// Called once per step, so that keypads fed from elsewhere can take in
    /// pending input even if the program never queries a key.
    fn update(&mut self) {}
}

/// A display that discards everything and never reports a collision.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl Display for NoDisplay {
    fn clear(&mut self) {}

    fn draw(&mut self, _x: u8, _y: u8, _sprite: &[u8]) -> bool {
        false
    }
}

/// A keypad driven by setting its input pins directly. Setting a pin that
/// was released records a key press.
#[derive(Debug, Default, Clone)]
pub struct PinKeypad {
    /// The input pins. Usually those are wired up to keys, but we do not
    /// prescribe how this is handled.
    input_pins: [bool; 16],

    /// Presses that were not yet consumed by a waiting chip.
    presses: VecDeque<u4>,
}

impl PinKeypad {
    pub fn new() -> Self {
        PinKeypad::default()
    }

    pub fn set_input_pin(&mut self, pin: u4, value: bool) {
        let index = u8::from(pin) as usize;
        if value && !self.input_pins[index] {
            if self.presses.len() == KEY_PRESS_CAPACITY {
                self.presses.pop_front();
            }
            self.presses.push_back(pin);
        }
        self.input_pins[index] = value;
    }

    pub fn reset_input_pins(&mut self) {
        self.input_pins = [false; 16];
    }

    pub fn read_input_pins(&self) -> &[bool; 16] {
        &self.input_pins
    }
}

impl Keypad for PinKeypad {
    fn is_down(&mut self, key: u4) -> bool {
        self.input_pins[u8::from(key) as usize]
    }

    fn take_key_press(&mut self) -> Option<u4> {
        self.presses.pop_front()
    }

    fn clear_key_presses(&mut self) {
        self.presses.clear();
    }
}

/// A key transition reported by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(u4),
    Up(u4),
}

/// A keypad fed through a channel, so that key events can be produced on a
/// different thread than the one driving the chip. Pending events are
/// applied whenever the chip asks for the keypad state.
pub struct ChannelKeypad {
    receiver: Receiver<KeyEvent>,
    pins: PinKeypad,
}

impl ChannelKeypad {
    /// Constructs a new keypad and returns the sender to report key events
    /// to.
    pub fn new() -> (Self, Sender<KeyEvent>) {
        let (sender, receiver) = bounded(KEY_EVENT_CAPACITY);
        (
            ChannelKeypad {
                receiver,
                pins: PinKeypad::new(),
            },
            sender,
        )
    }

    fn drain_events(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(KeyEvent::Down(key)) => self.pins.set_input_pin(key, true),
                Ok(KeyEvent::Up(key)) => self.pins.set_input_pin(key, false),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }
}

impl Keypad for ChannelKeypad {
    fn is_down(&mut self, key: u4) -> bool {
        self.drain_events();
        self.pins.is_down(key)
    }

    fn take_key_press(&mut self) -> Option<u4> {
        self.drain_events();
        self.pins.take_key_press()
    }

    fn clear_key_presses(&mut self) {
        self.drain_events();
        self.pins.clear_key_presses();
    }

    fn update(&mut self) {
        self.drain_events();
    }
}
