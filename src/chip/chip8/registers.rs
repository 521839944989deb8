use ux::u4;

/// Index of the register that doubles as flag output.
const FLAG_REGISTER: usize = 0xF;

/// The register file of the CHIP-8: 16 general purpose registers, the index
/// register and the program counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    /// V0 to VF, where VF is also written as a flag by some instructions.
    v: [u8; 16],

    /// The index register, used as memory base by several instructions.
    index: u16,

    /// The program counter.
    program_counter: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers::default()
    }

    pub fn get(&self, register: u4) -> u8 {
        self.v[u8::from(register) as usize]
    }

    pub fn set(&mut self, register: u4, value: u8) {
        self.v[u8::from(register) as usize] = value;
    }

    /// Reads VF.
    pub fn get_flag(&self) -> u8 {
        self.v[FLAG_REGISTER]
    }

    /// Writes VF. Instructions call this only after all of their register
    /// reads have happened.
    pub fn set_flag(&mut self, value: u8) {
        self.v[FLAG_REGISTER] = value;
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn set_index(&mut self, index: u16) {
        self.index = index;
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn set_program_counter(&mut self, program_counter: u16) {
        self.program_counter = program_counter;
    }

    /// Returns V0 to VF.
    pub fn general(&self) -> &[u8; 16] {
        &self.v
    }
}
