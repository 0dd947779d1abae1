/// The 16-key pad as the machine sees it. The host's input layer owns and
/// mutates the real state; the machine only ever asks questions.
pub trait Keypad {
    /// whether pad key 0x0..=0xF is currently held. Implementations must
    /// report values above 0xF as never down.
    fn is_key_down(&self, key: u8) -> bool;

    /// lowest-numbered key currently held, if any. The key-wait instruction
    /// latches this.
    fn first_down(&self) -> Option<u8> {
        (0x0..=0xF).find(|&k| self.is_key_down(k))
    }
}

/// a pad with nothing attached, for headless runs and tests
pub struct NoKeys;

impl Keypad for NoKeys {
    fn is_key_down(&self, _key: u8) -> bool {
        false
    }
}
