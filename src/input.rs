use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::io;
use std::time::{Duration, Instant};

use crate::keypad::Keypad;

/// left-hand QWERTY block onto the 4x4 pad, the classic layout
#[rustfmt::skip]
const KEYMAP: [(char, u8); 16] = [
    ('1', 0x1), ('2', 0x2), ('3', 0x3), ('4', 0xC),
    ('q', 0x4), ('w', 0x5), ('e', 0x6), ('r', 0xD),
    ('a', 0x7), ('s', 0x8), ('d', 0x9), ('f', 0xE),
    ('z', 0xA), ('x', 0x0), ('c', 0xB), ('v', 0xF),
];

fn map_key(key: char) -> Option<u8> {
    KEYMAP.iter().find(|&&(c, _)| c == key).map(|&(_, pad)| pad)
}

/// terminals report no key releases, so a press counts as held until this
/// window expires
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Tracks recent keypresses and answers the machine's pad queries. Raw mode
/// belongs to [`TermDisplay`](crate::display::TermDisplay); this only drains
/// the event queue.
pub struct KeyState {
    pressed: [Option<Instant>; 16],
}

impl KeyState {
    pub fn new() -> Self {
        KeyState {
            pressed: [None; 16],
        }
    }

    /// drain pending terminal events; true means the user asked to quit
    pub fn pump(&mut self) -> Result<bool, io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true);
                    }
                    KeyCode::Char(key) => {
                        if let Some(pad) = map_key(key) {
                            self.pressed[pad as usize] = Some(Instant::now());
                        }
                        // unmapped keys are ignored
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }
}

impl Keypad for KeyState {
    fn is_key_down(&self, key: u8) -> bool {
        match self.pressed.get(key as usize) {
            Some(Some(at)) => at.elapsed() < KEY_HOLD,
            _ => false,
        }
    }
}
