use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;

use crate::error::Fault;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::quirks::Quirks;

// NB. PC and I are u16 as per the chip-8; computed memory addresses are
// usize so a pointer just past 0xFFFF can't wrap back into range

/// how much RAM the machine addresses
pub const MEMORY_SIZE: usize = 4096;

/// where programs load and the PC starts
pub const PROGRAM_ADDR: u16 = 0x200;

/// framebuffer width in pixels
pub const SCREEN_WIDTH: usize = 64;

/// framebuffer height in pixels
pub const SCREEN_HEIGHT: usize = 32;

/// one frame of monochrome pixels, indexed `[row][column]`
pub type FrameBuffer = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// call depth a program can reach before faulting
const STACK_DEPTH: usize = 16;

/// the font lives below the program area
pub(crate) const FONT_ADDR: usize = 0x050;
pub(crate) const FONT_GLYPH_BYTES: usize = 5;

/// contemporary 16-glyph hex font, 5 bytes per glyph
const FONT: [u8; 80] = [
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

/// The whole interpreter state: everything a running program can observe or
/// mutate. Exclusively owned; all mutation after loading happens inside
/// [`step`](Machine::step).
pub struct Machine {
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) v: [u8; 16],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize,
    pub(crate) dt: u8,
    pub(crate) st: u8,
    pub(crate) framebuffer: FrameBuffer,
    pub(crate) quirks: Quirks,
    pub(crate) rng: StdRng,
}

impl Machine {
    /// a zeroed machine with the font baked in and default quirks
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        let mut memory = [0u8; MEMORY_SIZE];
        memory[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
        Machine {
            memory,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            dt: 0,
            st: 0,
            framebuffer: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
            quirks,
            rng: StdRng::from_entropy(),
        }
    }

    /// reseed the random source so RND becomes reproducible
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// copy a raw ROM to 0x200 and report how many bytes landed there. The
    /// bytes are not inspected; there is no container format.
    pub fn load_rom(&mut self, reader: &mut impl io::Read) -> Result<usize, io::Error> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        let start = PROGRAM_ADDR as usize;
        if len > MEMORY_SIZE - start {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "ROM is {} bytes; at most {} fit at {:#06X}",
                    len,
                    MEMORY_SIZE - start,
                    PROGRAM_ADDR
                ),
            ));
        }
        self.memory[start..start + len].copy_from_slice(&buf);
        Ok(len)
    }

    /// run one fetch-decode-execute cycle, then tick the timers.
    ///
    /// Never blocks; the key-wait instruction parks the PC instead and
    /// relies on being stepped again. A fault leaves the PC just past the
    /// instruction that raised it and the timers untouched.
    pub fn step(&mut self, keypad: &dyn Keypad) -> Result<(), Fault> {
        let op = self.fetch()?;
        self.exec(op, keypad)?;
        self.tick_timers();
        Ok(())
    }

    /// big-endian instruction word at PC; PC moves past it
    fn fetch(&mut self) -> Result<Opcode, Fault> {
        let hi = self.read_mem(self.pc as usize)?;
        let lo = self.read_mem(self.pc as usize + 1)?;
        self.pc += 2;
        Ok(Opcode::new((u16::from(hi) << 8) | u16::from(lo)))
    }

    fn tick_timers(&mut self) {
        if self.dt > 0 {
            self.dt -= 1;
        }
        if self.st > 0 {
            self.st -= 1;
        }
    }

    pub(crate) fn read_mem(&self, addr: usize) -> Result<u8, Fault> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Fault::MemoryOutOfBounds(addr))
    }

    pub(crate) fn write_mem(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        match self.memory.get_mut(addr) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Fault::MemoryOutOfBounds(addr)),
        }
    }

    pub(crate) fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp == STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    // read-only introspection, for drivers, debuggers and tests

    pub fn v_registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn i_register(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.pc
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.st
    }

    /// the live portion of the call stack, innermost frame last
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }
}
