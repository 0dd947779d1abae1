/// A 16-bit instruction word plus its conventional bit fields.
///
/// Pure extraction, no state and no failure modes; whether a combination of
/// fields means anything is the dispatcher's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(word: u16) -> Self {
        Opcode(word)
    }

    /// the undecoded instruction word
    pub fn raw(self) -> u16 {
        self.0
    }

    /// all four nibbles, high to low, for dispatch matching
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            (self.0 >> 12) as u8,
            (self.0 >> 8) as u8 & 0xF,
            (self.0 >> 4) as u8 & 0xF,
            self.0 as u8 & 0xF,
        )
    }

    /// second nibble, as a V-register index
    pub fn x(self) -> usize {
        (self.0 >> 8) as usize & 0xF
    }

    /// third nibble, as a V-register index
    pub fn y(self) -> usize {
        (self.0 >> 4) as usize & 0xF
    }

    /// low nibble
    pub fn n(self) -> u8 {
        self.0 as u8 & 0xF
    }

    /// low byte
    pub fn kk(self) -> u8 {
        self.0 as u8
    }

    /// low 12 bits, an address
    pub fn nnn(self) -> u16 {
        self.0 & 0xFFF
    }
}
