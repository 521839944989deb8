use crate::chip::{chip8::constants::CHIP8_STACK_DEPTH, ExecutionError};

/// A stack. Note that there are no instructions allowing to modify the
/// stack directly; it only stores return addresses for calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    addresses: [u16; CHIP8_STACK_DEPTH],

    /// Number of addresses currently on the stack.
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    pub fn push(&mut self, address: u16) -> Result<(), ExecutionError> {
        if self.depth == CHIP8_STACK_DEPTH {
            return Err(ExecutionError::StackOverflow);
        }
        self.addresses[self.depth] = address;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, ExecutionError> {
        if self.depth == 0 {
            return Err(ExecutionError::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.addresses[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_full(&self) -> bool {
        self.depth == CHIP8_STACK_DEPTH
    }

    pub fn clear(&mut self) {
        self.depth = 0;
    }
}
