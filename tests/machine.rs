// whole programs run through the public API only

use chp8::machine::PROGRAM_ADDR;
use chp8::{Fault, Keypad, Machine, NoKeys, Quirks};

/// assemble big-endian instruction words into ROM bytes
fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn machine_with(words: &[u16]) -> Machine {
    let mut m = Machine::new();
    let bytes = rom(words);
    m.load_rom(&mut bytes.as_slice()).unwrap();
    m
}

/// a pad holding at most one key
struct HoldKey(Option<u8>);

impl Keypad for HoldKey {
    fn is_key_down(&self, key: u8) -> bool {
        self.0 == Some(key)
    }
}

#[test]
fn add_loop_program_settles_at_eight() {
    // LD V0,0x05; ADD V0,0x03; JP 0x200
    let mut m = machine_with(&[0x6005, 0x7003, 0x1200]);
    for _ in 0..3 {
        m.step(&NoKeys).unwrap();
    }
    assert_eq!(m.v_registers()[0], 8);
    assert_eq!(m.program_counter(), PROGRAM_ADDR);
    // the loop re-loads 5 each lap, so a lap always ends at 8
    for _ in 0..3 {
        m.step(&NoKeys).unwrap();
    }
    assert_eq!(m.v_registers()[0], 8);
    assert_eq!(m.program_counter(), PROGRAM_ADDR);
}

#[test]
fn calls_nest_sixteen_deep_and_no_further() {
    // CALL 0x200, forever
    let mut m = machine_with(&[0x2200]);
    for _ in 0..16 {
        m.step(&NoKeys).unwrap();
    }
    assert_eq!(m.stack().len(), 16);
    assert_eq!(m.step(&NoKeys), Err(Fault::StackOverflow));
}

#[test]
fn return_without_a_call_underflows() {
    let mut m = machine_with(&[0x00EE]);
    assert_eq!(m.step(&NoKeys), Err(Fault::StackUnderflow));
}

#[test]
fn drawing_a_glyph_twice_erases_it() {
    // LD I,0x050; DRW V0,V1,5; DRW V0,V1,5
    let mut m = machine_with(&[0xA050, 0xD015, 0xD015]);
    m.step(&NoKeys).unwrap();
    m.step(&NoKeys).unwrap();
    let lit = m.framebuffer().iter().flatten().filter(|&&px| px).count();
    assert!(lit > 0);
    assert_eq!(m.v_registers()[0xF], 0);
    m.step(&NoKeys).unwrap();
    assert_eq!(m.v_registers()[0xF], 1);
    assert!(m.framebuffer().iter().flatten().all(|&px| !px));
}

#[test]
fn bcd_spells_out_255() {
    // LD V0,0xFF; LD I,0x300; LD B,V0
    let mut m = machine_with(&[0x60FF, 0xA300, 0xF033]);
    for _ in 0..3 {
        m.step(&NoKeys).unwrap();
    }
    assert_eq!(&m.memory()[0x300..0x303], &[2, 5, 5]);
}

#[test]
fn key_wait_parks_the_pc_until_a_key() {
    // LD V5,K
    let mut m = machine_with(&[0xF50A]);
    for _ in 0..3 {
        m.step(&HoldKey(None)).unwrap();
        assert_eq!(m.program_counter(), PROGRAM_ADDR);
    }
    m.step(&HoldKey(Some(0x9))).unwrap();
    assert_eq!(m.v_registers()[5], 0x9);
    assert_eq!(m.program_counter(), PROGRAM_ADDR + 2);
}

#[test]
fn identical_seeds_give_identical_runs() {
    // RND V0,0xFF
    let words = [0xC0FF];
    let mut a = machine_with(&words);
    let mut b = machine_with(&words);
    a.seed(42);
    b.seed(42);
    a.step(&NoKeys).unwrap();
    b.step(&NoKeys).unwrap();
    assert_eq!(a.v_registers()[0], b.v_registers()[0]);
}

#[test]
fn jump_offset_register_is_a_quirk() {
    // LD V1,0x04; JP V0,0x1F0
    let words = [0x6104, 0xB1F0];

    let mut plain = machine_with(&words);
    plain.step(&NoKeys).unwrap();
    plain.step(&NoKeys).unwrap();
    assert_eq!(plain.program_counter(), 0x1F0); // V0 is zero

    let mut quirked = Machine::with_quirks(Quirks {
        jump_reads_vx: true,
        ..Quirks::default()
    });
    let bytes = rom(&words);
    quirked.load_rom(&mut bytes.as_slice()).unwrap();
    quirked.step(&NoKeys).unwrap();
    quirked.step(&NoKeys).unwrap();
    assert_eq!(quirked.program_counter(), 0x1F4);
}

#[test]
fn unsupported_opcode_reports_the_raw_word() {
    let mut m = machine_with(&[0xFFFF]);
    assert_eq!(m.step(&NoKeys), Err(Fault::UnsupportedOpcode(0xFFFF)));
}

#[test]
fn a_fault_leaves_the_timers_alone() {
    // LD V0,0x05; LD DT,V0; LD ST,V0; then a word with no handler
    let mut m = machine_with(&[0x6005, 0xF015, 0xF018, 0xFFFF]);
    for _ in 0..3 {
        m.step(&NoKeys).unwrap();
    }
    assert_eq!(m.delay_timer(), 3);
    assert_eq!(m.sound_timer(), 4);
    assert_eq!(m.step(&NoKeys), Err(Fault::UnsupportedOpcode(0xFFFF)));
    // the failed step must not tick either timer
    assert_eq!(m.delay_timer(), 3);
    assert_eq!(m.sound_timer(), 4);
}

#[test]
fn oversized_roms_are_rejected() {
    let mut m = Machine::new();
    let bytes = vec![0u8; 3585];
    let err = m.load_rom(&mut bytes.as_slice()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
