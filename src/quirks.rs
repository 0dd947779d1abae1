/// Documented behavioral variances among historical CHIP-8 interpreters.
///
/// The defaults follow the common modern convention; each flag opts into the
/// older lineage instead. Programs genuinely disagree on these, so the choice
/// belongs to whoever loads the ROM, not to the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift Vy into Vx, as on the COSMAC VIP, instead of shifting
    /// Vx in place
    pub shift_reads_vy: bool,

    /// BNNN jumps to nnn + Vx (CHIP-48/SUPER-CHIP lineage) instead of
    /// nnn + V0
    pub jump_reads_vx: bool,

    /// FX55/FX65 leave I pointing one past the last byte copied, as on the
    /// COSMAC VIP, instead of leaving I untouched
    pub load_store_bumps_i: bool,
}
