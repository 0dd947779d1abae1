use thiserror::Error;

/// Fatal machine faults. Every one means the program ran off the rails or
/// the ROM asked for something the machine cannot do; there is no recovery
/// mid-instruction, only halting or resetting in the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// no handler registered for this instruction word
    #[error("unsupported opcode {0:#06X}")]
    UnsupportedOpcode(u16),

    /// more than 16 nested calls
    #[error("call stack overflow")]
    StackOverflow,

    /// a return with no call outstanding
    #[error("call stack underflow")]
    StackUnderflow,

    /// DRW asked for a sprite taller than 15 rows
    #[error("invalid sprite height {0}")]
    InvalidSpriteHeight(u8),

    /// a computed address left the 4K address space
    #[error("memory access out of bounds at {0:#06X}")]
    MemoryOutOfBounds(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages_name_the_culprit() {
        assert_eq!(
            Fault::UnsupportedOpcode(0xF0FF).to_string(),
            "unsupported opcode 0xF0FF"
        );
        assert_eq!(
            Fault::MemoryOutOfBounds(0x1000).to_string(),
            "memory access out of bounds at 0x1000"
        );
        assert_eq!(
            Fault::InvalidSpriteHeight(16).to_string(),
            "invalid sprite height 16"
        );
    }
}
