use rand::Rng;

use crate::error::Fault;
use crate::keypad::Keypad;
use crate::machine::{Machine, FONT_ADDR, FONT_GLYPH_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::opcode::Opcode;

// instruction dispatch and the instruction bodies. Every handler is a
// whole-machine transformation: it gets `&mut self` and nothing else, so
// there is exactly one place each register array can be aliased from.

impl Machine {
    /// dispatch one decoded instruction. The primary nibble selects a
    /// family; families 0x0, 0x8, 0xE and 0xF select again on their low
    /// nibble or byte. Anything unmatched is a fault, not a no-op.
    pub(crate) fn exec(&mut self, op: Opcode, keypad: &dyn Keypad) -> Result<(), Fault> {
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => self.cls(),
            (0x0, 0x0, 0xE, 0xE) => self.ret(),
            (0x1, ..) => self.jp(op.nnn()),
            (0x2, ..) => self.call(op.nnn()),
            (0x3, ..) => self.se_byte(op.x(), op.kk()),
            (0x4, ..) => self.sne_byte(op.x(), op.kk()),
            (0x5, _, _, 0x0) => self.se_reg(op.x(), op.y()),
            (0x6, ..) => self.ld_byte(op.x(), op.kk()),
            (0x7, ..) => self.add_byte(op.x(), op.kk()),
            (0x8, _, _, 0x0) => self.ld_reg(op.x(), op.y()),
            (0x8, _, _, 0x1) => self.or_reg(op.x(), op.y()),
            (0x8, _, _, 0x2) => self.and_reg(op.x(), op.y()),
            (0x8, _, _, 0x3) => self.xor_reg(op.x(), op.y()),
            (0x8, _, _, 0x4) => self.add_reg(op.x(), op.y()),
            (0x8, _, _, 0x5) => self.sub_reg(op.x(), op.y()),
            (0x8, _, _, 0x6) => self.shr(op.x(), op.y()),
            (0x8, _, _, 0x7) => self.subn_reg(op.x(), op.y()),
            (0x8, _, _, 0xE) => self.shl(op.x(), op.y()),
            (0x9, _, _, 0x0) => self.sne_reg(op.x(), op.y()),
            (0xA, ..) => self.ld_i(op.nnn()),
            (0xB, ..) => self.jp_offset(op.x(), op.nnn()),
            (0xC, ..) => self.rnd(op.x(), op.kk()),
            (0xD, ..) => self.drw(op.x(), op.y(), op.n()),
            (0xE, _, 0x9, 0xE) => self.skp(op.x(), keypad),
            (0xE, _, 0xA, 0x1) => self.sknp(op.x(), keypad),
            (0xF, _, 0x0, 0x7) => self.ld_from_dt(op.x()),
            (0xF, _, 0x0, 0xA) => self.ld_key(op.x(), keypad),
            (0xF, _, 0x1, 0x5) => self.ld_dt(op.x()),
            (0xF, _, 0x1, 0x8) => self.ld_st(op.x()),
            (0xF, _, 0x1, 0xE) => self.add_i(op.x()),
            (0xF, _, 0x2, 0x9) => self.ld_font(op.x()),
            (0xF, _, 0x3, 0x3) => self.bcd(op.x()),
            (0xF, _, 0x5, 0x5) => self.store_regs(op.x()),
            (0xF, _, 0x6, 0x5) => self.load_regs(op.x()),
            _ => Err(Fault::UnsupportedOpcode(op.raw())),
        }
    }

    /// 00E0: blank the framebuffer
    fn cls(&mut self) -> Result<(), Fault> {
        self.framebuffer = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
        Ok(())
    }

    /// 00EE: return from subroutine
    fn ret(&mut self) -> Result<(), Fault> {
        self.pc = self.pop()?;
        Ok(())
    }

    /// 1NNN: jump
    fn jp(&mut self, nnn: u16) -> Result<(), Fault> {
        self.pc = nnn;
        Ok(())
    }

    /// 2NNN: call subroutine; the pushed PC already points past the CALL
    fn call(&mut self, nnn: u16) -> Result<(), Fault> {
        self.push(self.pc)?;
        self.pc = nnn;
        Ok(())
    }

    /// 3XKK: skip next instruction if Vx == kk
    fn se_byte(&mut self, x: usize, kk: u8) -> Result<(), Fault> {
        if self.v[x] == kk {
            self.pc += 2;
        }
        Ok(())
    }

    /// 4XKK: skip next instruction if Vx != kk
    fn sne_byte(&mut self, x: usize, kk: u8) -> Result<(), Fault> {
        if self.v[x] != kk {
            self.pc += 2;
        }
        Ok(())
    }

    /// 5XY0: skip next instruction if Vx == Vy
    fn se_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        if self.v[x] == self.v[y] {
            self.pc += 2;
        }
        Ok(())
    }

    /// 6XKK: Vx = kk
    fn ld_byte(&mut self, x: usize, kk: u8) -> Result<(), Fault> {
        self.v[x] = kk;
        Ok(())
    }

    /// 7XKK: Vx += kk, wrapping, no flag
    fn add_byte(&mut self, x: usize, kk: u8) -> Result<(), Fault> {
        self.v[x] = self.v[x].wrapping_add(kk);
        Ok(())
    }

    /// 8XY0: Vx = Vy
    fn ld_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        self.v[x] = self.v[y];
        Ok(())
    }

    /// 8XY1: Vx |= Vy
    fn or_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        self.v[x] |= self.v[y];
        Ok(())
    }

    /// 8XY2: Vx &= Vy
    fn and_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        self.v[x] &= self.v[y];
        Ok(())
    }

    /// 8XY3: Vx ^= Vy
    fn xor_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        self.v[x] ^= self.v[y];
        Ok(())
    }

    // flag-writing arithmetic computes from the original operands and writes
    // VF last, so x == 0xF leaves the flag, not the result

    /// 8XY4: Vx += Vy; VF = carry
    fn add_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        let (sum, carried) = self.v[x].overflowing_add(self.v[y]);
        self.v[x] = sum;
        self.v[0xF] = carried as u8;
        Ok(())
    }

    /// 8XY5: Vx -= Vy; VF = 1 unless it borrowed
    fn sub_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        let (diff, borrowed) = self.v[x].overflowing_sub(self.v[y]);
        self.v[x] = diff;
        self.v[0xF] = !borrowed as u8;
        Ok(())
    }

    /// 8XY6: Vx >>= 1; VF = the bit shifted out
    fn shr(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        let src = if self.quirks.shift_reads_vy {
            self.v[y]
        } else {
            self.v[x]
        };
        self.v[x] = src >> 1;
        self.v[0xF] = src & 0x1;
        Ok(())
    }

    /// 8XY7: Vx = Vy - Vx; VF = 1 unless it borrowed
    fn subn_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        let (diff, borrowed) = self.v[y].overflowing_sub(self.v[x]);
        self.v[x] = diff;
        self.v[0xF] = !borrowed as u8;
        Ok(())
    }

    /// 8XYE: Vx <<= 1; VF = the bit shifted out
    fn shl(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        let src = if self.quirks.shift_reads_vy {
            self.v[y]
        } else {
            self.v[x]
        };
        self.v[x] = src << 1;
        self.v[0xF] = src >> 7;
        Ok(())
    }

    /// 9XY0: skip next instruction if Vx != Vy
    fn sne_reg(&mut self, x: usize, y: usize) -> Result<(), Fault> {
        if self.v[x] != self.v[y] {
            self.pc += 2;
        }
        Ok(())
    }

    /// ANNN: I = nnn
    fn ld_i(&mut self, nnn: u16) -> Result<(), Fault> {
        self.i = nnn;
        Ok(())
    }

    /// BNNN: jump to nnn plus an offset register
    fn jp_offset(&mut self, x: usize, nnn: u16) -> Result<(), Fault> {
        let base = if self.quirks.jump_reads_vx {
            self.v[x]
        } else {
            self.v[0]
        };
        self.pc = nnn + u16::from(base);
        Ok(())
    }

    /// CXKK: Vx = random byte AND kk
    fn rnd(&mut self, x: usize, kk: u8) -> Result<(), Fault> {
        let byte: u8 = self.rng.gen();
        self.v[x] = byte & kk;
        Ok(())
    }

    /// DXYN: XOR an n-row sprite from memory[I] onto the framebuffer at
    /// (Vx, Vy), wrapping both axes; VF = 1 iff some pixel went on to off
    fn drw(&mut self, x: usize, y: usize, n: u8) -> Result<(), Fault> {
        if n > 15 {
            return Err(Fault::InvalidSpriteHeight(n));
        }
        let x0 = self.v[x] as usize;
        let y0 = self.v[y] as usize;
        self.v[0xF] = 0;
        for row in 0..n as usize {
            let bits = self.read_mem(self.i as usize + row)?;
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (x0 + col) % SCREEN_WIDTH;
                let py = (y0 + row) % SCREEN_HEIGHT;
                let cell = &mut self.framebuffer[py][px];
                if *cell {
                    self.v[0xF] = 1;
                }
                *cell ^= true;
            }
        }
        Ok(())
    }

    /// EX9E: skip next instruction if key Vx is down
    fn skp(&mut self, x: usize, keypad: &dyn Keypad) -> Result<(), Fault> {
        if keypad.is_key_down(self.v[x]) {
            self.pc += 2;
        }
        Ok(())
    }

    /// EXA1: skip next instruction if key Vx is up
    fn sknp(&mut self, x: usize, keypad: &dyn Keypad) -> Result<(), Fault> {
        if !keypad.is_key_down(self.v[x]) {
            self.pc += 2;
        }
        Ok(())
    }

    /// FX07: Vx = DT
    fn ld_from_dt(&mut self, x: usize) -> Result<(), Fault> {
        self.v[x] = self.dt;
        Ok(())
    }

    /// FX0A: wait for a key by parking the PC on this instruction until one
    /// is down, then latch it into Vx and move on
    fn ld_key(&mut self, x: usize, keypad: &dyn Keypad) -> Result<(), Fault> {
        match keypad.first_down() {
            Some(key) => self.v[x] = key,
            None => self.pc -= 2,
        }
        Ok(())
    }

    /// FX15: DT = Vx
    fn ld_dt(&mut self, x: usize) -> Result<(), Fault> {
        self.dt = self.v[x];
        Ok(())
    }

    /// FX18: ST = Vx
    fn ld_st(&mut self, x: usize) -> Result<(), Fault> {
        self.st = self.v[x];
        Ok(())
    }

    /// FX1E: I += Vx, no flag
    fn add_i(&mut self, x: usize) -> Result<(), Fault> {
        self.i = self.i.wrapping_add(u16::from(self.v[x]));
        Ok(())
    }

    /// FX29: point I at the font glyph for digit Vx
    fn ld_font(&mut self, x: usize) -> Result<(), Fault> {
        self.i = (FONT_ADDR + self.v[x] as usize * FONT_GLYPH_BYTES) as u16;
        Ok(())
    }

    /// FX33: decimal digits of Vx into memory[I..I+3], hundreds first
    fn bcd(&mut self, x: usize) -> Result<(), Fault> {
        let value = self.v[x];
        let at = self.i as usize;
        self.write_mem(at, value / 100)?;
        self.write_mem(at + 1, value / 10 % 10)?;
        self.write_mem(at + 2, value % 10)?;
        Ok(())
    }

    /// FX55: memory[I..=I+x] = V0..=Vx
    fn store_regs(&mut self, x: usize) -> Result<(), Fault> {
        for offset in 0..=x {
            self.write_mem(self.i as usize + offset, self.v[offset])?;
        }
        if self.quirks.load_store_bumps_i {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
        Ok(())
    }

    /// FX65: V0..=Vx = memory[I..=I+x]
    fn load_regs(&mut self, x: usize) -> Result<(), Fault> {
        for offset in 0..=x {
            self.v[offset] = self.read_mem(self.i as usize + offset)?;
        }
        if self.quirks.load_store_bumps_i {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
        Ok(())
    }
}
