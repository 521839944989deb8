use crate::chip::{
    chip8::constants::{CHIP8_CHARSET, CHIP8_CHARSET_OFFSET, CHIP8_MEMORY_SIZE},
    ExecutionError, LoadProgramError,
};

/// The 4096 bytes of main memory. The charset lives at
/// `CHIP8_CHARSET_OFFSET`, programs are loaded at `CHIP8_PROGRAM_START`.
/// Every access is bounds checked; nothing wraps around.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; CHIP8_MEMORY_SIZE],
}

impl Memory {
    /// Constructs a zeroed memory with the charset in place.
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; CHIP8_MEMORY_SIZE],
        };
        memory.reset();
        memory
    }

    /// Zeroes the whole memory and restores the charset.
    pub fn reset(&mut self) {
        self.bytes = [0; CHIP8_MEMORY_SIZE];
        let offset = CHIP8_CHARSET_OFFSET as usize;
        self.bytes[offset..offset + CHIP8_CHARSET.len()].copy_from_slice(&CHIP8_CHARSET);
    }

    /// Copies `image` into memory starting at `base`.
    ///
    /// Memory is left untouched if the image does not fit.
    pub fn load(&mut self, image: &[u8], base: u16) -> Result<(), LoadProgramError> {
        let start = base as usize;
        let end = start + image.len();
        if end > CHIP8_MEMORY_SIZE {
            return Err(LoadProgramError::ProgramTooLarge {
                len: image.len(),
                base,
                capacity: CHIP8_MEMORY_SIZE,
            });
        }
        self.bytes[start..end].copy_from_slice(image);
        Ok(())
    }

    pub fn read_byte(&self, address: u16) -> Result<u8, ExecutionError> {
        self.bytes
            .get(address as usize)
            .copied()
            .ok_or(ExecutionError::OutOfBounds {
                address: address as usize,
            })
    }

    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), ExecutionError> {
        let byte = self
            .bytes
            .get_mut(address as usize)
            .ok_or(ExecutionError::OutOfBounds {
                address: address as usize,
            })?;
        *byte = value;
        Ok(())
    }

    /// Reads the big-endian word at `address` and `address + 1`.
    pub fn read_word(&self, address: u16) -> Result<u16, ExecutionError> {
        let bytes = self.read_slice(address, 2)?;
        Ok((bytes[0] as u16) << 8 | bytes[1] as u16)
    }

    /// Returns the `len` bytes starting at `address`.
    pub fn read_slice(&self, address: u16, len: usize) -> Result<&[u8], ExecutionError> {
        if len == 0 {
            return Ok(&[]);
        }
        let start = address as usize;
        self.check_range(start, len)?;
        Ok(&self.bytes[start..start + len])
    }

    /// Writes `values` starting at `address`. The whole range is checked
    /// before the first byte is written.
    pub fn write_slice(&mut self, address: u16, values: &[u8]) -> Result<(), ExecutionError> {
        if values.is_empty() {
            return Ok(());
        }
        let start = address as usize;
        self.check_range(start, values.len())?;
        self.bytes[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    fn check_range(&self, start: usize, len: usize) -> Result<(), ExecutionError> {
        if start + len > CHIP8_MEMORY_SIZE {
            // report the first address that is not backed by memory
            return Err(ExecutionError::OutOfBounds {
                address: start.max(CHIP8_MEMORY_SIZE),
            });
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
