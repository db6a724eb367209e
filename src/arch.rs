//! Conte-200 architecture definition: overall widths, register and
//! alias tables, and the handful of bounds checks the assembler driver
//! relies on.

use std::collections::HashMap;

use crate::error::AsmError;

/// Display name used in every diagnostic.
pub const ARCH_NAME: &str = "Conte-200";

/// Overall instruction word width in bits.
pub const BIT_WIDTH: usize = 32;
/// Opcode field width in bits.
pub const OPCODE_WIDTH: usize = 4;
/// Register specifier field width in bits.
pub const REGISTER_WIDTH: usize = 4;

/// Width of the PC-relative value field (lea).
pub const PC_OFFSET_WIDTH: usize = BIT_WIDTH - OPCODE_WIDTH - REGISTER_WIDTH;
/// Width of the two-register immediate field (addi).
pub const IMM_OFFSET_WIDTH: usize = BIT_WIDTH - OPCODE_WIDTH - 2 * REGISTER_WIDTH;
/// Width of the memory offset field (lw/sw).
pub const MEM_OFFSET_WIDTH: usize = BIT_WIDTH - OPCODE_WIDTH - 2 * REGISTER_WIDTH;
/// Width of the unused padding inside an R-type word.
pub const R_UNUSED_WIDTH: usize = BIT_WIDTH - OPCODE_WIDTH - 3 * REGISTER_WIDTH;
/// Width of the skip-instruction mode field.
pub const SKP_MODE_WIDTH: usize = 4;
/// Width of the unused padding inside a skip word.
pub const SKP_UNUSED_WIDTH: usize = 16;

// Derived field widths must stay positive and the skip layout must
// tile the word exactly; a bad width combination is a build error,
// not a runtime one.
const _: () = assert!(PC_OFFSET_WIDTH > 0);
const _: () = assert!(IMM_OFFSET_WIDTH > 0);
const _: () = assert!(MEM_OFFSET_WIDTH > 0);
const _: () = assert!(R_UNUSED_WIDTH > 0);
const _: () =
    assert!(OPCODE_WIDTH + SKP_MODE_WIDTH + 2 * REGISTER_WIDTH + SKP_UNUSED_WIDTH == BIT_WIDTH);

/// Symbolic register name to register code, all sixteen entries.
pub const REGISTERS: &[(&str, u8)] = &[
    ("$zero", 0),
    ("$at", 1),
    ("$v0", 2),
    ("$a0", 3),
    ("$a1", 4),
    ("$a2", 5),
    ("$t0", 6),
    ("$t1", 7),
    ("$t2", 8),
    ("$s0", 9),
    ("$s1", 10),
    ("$s2", 11),
    ("$k0", 12),
    ("$sp", 13),
    ("$fp", 14),
    ("$ra", 15),
];

/// Surface spelling to canonical variant name. `None` marks a spelling
/// that exists only as the shared class of its sub-forms and must never
/// be dispatched directly (the abstract `skp`).
pub const ALIASES: &[(&str, Option<&str>)] = &[
    (".word", Some("fill")),
    (".fill", Some("fill")),
    ("skp", None),
    ("skpne", Some("skp")),
    ("skple", Some("skp")),
];

/// Look up the register code for a symbolic name.
pub fn register_code(name: &str) -> Option<u8> {
    REGISTERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Resolve a mnemonic or directive spelling to its canonical variant
/// name. Aliasing is a single-level lookup; names absent from the
/// alias table are already canonical.
pub fn instruction_class(name: &str) -> Option<&str> {
    match ALIASES.iter().find(|(alias, _)| *alias == name) {
        Some(&(_, canonical)) => canonical,
        None => Some(name),
    }
}

/// Bounds-check a program counter. PCs must stay below `2^BIT_WIDTH`.
pub fn validate_pc(pc: u64) -> Result<u64, AsmError> {
    if pc >= 1u64 << BIT_WIDTH {
        return Err(AsmError::PcOutOfRange(pc));
    }
    Ok(pc)
}

/// Customization hook. The Conte-200 supports no parameters, so any
/// non-empty table is rejected outright.
pub fn receive_params(params: &HashMap<String, String>) -> Result<(), AsmError> {
    if !params.is_empty() {
        return Err(AsmError::UnsupportedParams);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_table_round_trips_all_sixteen() {
        assert_eq!(REGISTERS.len(), 16);
        for &(name, code) in REGISTERS {
            assert_eq!(register_code(name), Some(code));
        }
        assert_eq!(register_code("$t9"), None);
    }

    #[test]
    fn alias_lookup_is_single_level() {
        assert_eq!(instruction_class(".word"), Some("fill"));
        assert_eq!(instruction_class(".fill"), Some("fill"));
        assert_eq!(instruction_class("skpne"), Some("skp"));
        assert_eq!(instruction_class("skple"), Some("skp"));
        assert_eq!(instruction_class("skp"), None);
        assert_eq!(instruction_class("add"), Some("add"));
    }

    #[test]
    fn pc_bounds() {
        assert_eq!(validate_pc(0).unwrap(), 0);
        assert_eq!(validate_pc((1 << 32) - 1).unwrap(), (1 << 32) - 1);
        assert!(matches!(
            validate_pc(1 << 32),
            Err(AsmError::PcOutOfRange(_))
        ));
    }

    #[test]
    fn custom_params_are_rejected() {
        assert!(receive_params(&HashMap::new()).is_ok());
        let mut params = HashMap::new();
        params.insert("mem_size".to_string(), "64".to_string());
        assert!(matches!(
            receive_params(&params),
            Err(AsmError::UnsupportedParams)
        ));
    }
}
