//! Instruction formats, the mnemonic-to-variant registry, and the
//! encoder that turns operand text into packed 32-bit words.
//!
//! Every format owns a fixed operand grammar (a regex with named
//! captures) and a fixed field order after the opcode. The grammars
//! for register ALU and immediate ALU operands also accept a trailing
//! `LSL|LSR|ASR <dist>` clause that the current word width has no room
//! for; it is matched and dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::arch::{
    instruction_class, BIT_WIDTH, IMM_OFFSET_WIDTH, MEM_OFFSET_WIDTH, OPCODE_WIDTH,
    PC_OFFSET_WIDTH, R_UNUSED_WIDTH, SKP_MODE_WIDTH, SKP_UNUSED_WIDTH,
};
use crate::bits::{bin_to_hex, dec_to_bin, zero_extend};
use crate::error::AsmError;
use crate::resolve::{register_bits, resolve_value, SymbolTable};

static RE_R3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<rx>\$\w+?)\s*,\s*(?P<ry>\$\w+?)\s*,\s*(?P<rz>\$\w+?)(,\s*(LSL|LSR|ASR)\s+\d+)?\s*$",
    )
    .unwrap()
});
static RE_IMM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<rx>\$\w+?)\s*,\s*(?P<ry>\$\w+?)\s*,\s*(?P<imm>\S+?)\s*(,\s*(LSL|LSR|ASR)\s+\d+)?$",
    )
    .unwrap()
});
static RE_MEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<rx>\$\w+?)\s*,\s*(?P<off>\S+?)\s*\((?P<ry>\$\w+?)\)\s*$").unwrap()
});
static RE_SKIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<rx>\$\w+?)\s*,\s*(?P<ry>\$\w+?)\s*$").unwrap());
static RE_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<target>\S+?)\s*$").unwrap());
static RE_PCREL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<rx>\$\w+?)\s*,\s*(?P<value>\S+?)\s*$").unwrap());
static RE_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?P<tr>\$\w+?)\s*$").unwrap());
static RE_EMPTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*$").unwrap());

/// Bit-layout template of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// RX, RY, padding, RZ
    Register3,
    /// RX, RY, signed immediate (labels never resolve here)
    Immediate,
    /// RX, RY, signed memory offset
    Memory,
    /// mode, RX, padding, RY
    Skip,
    /// unsigned absolute target
    Jump,
    /// RX, signed PC-relative value
    PcRelative,
    /// target register, then zero bits to the right
    CallReg,
    /// opcode only, zero bits to the right
    Bare,
    /// raw full-width value, no opcode field at all
    DataWord,
}

/// Canonical instruction variants. The mapping from mnemonic to
/// variant is closed; an unknown spelling is an error, not a missing
/// class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Add,
    Addi,
    Nand,
    Skp,
    Goto,
    Lea,
    Lw,
    Sw,
    Call,
    Ret,
    Halt,
    Noop,
    Fill,
}

impl Variant {
    /// Dispatch on a canonical name (after alias resolution).
    pub fn from_name(name: &str) -> Option<Variant> {
        match name {
            "add" => Some(Variant::Add),
            "addi" => Some(Variant::Addi),
            "nand" => Some(Variant::Nand),
            "skp" => Some(Variant::Skp),
            "goto" => Some(Variant::Goto),
            "lea" => Some(Variant::Lea),
            "lw" => Some(Variant::Lw),
            "sw" => Some(Variant::Sw),
            "call" => Some(Variant::Call),
            "ret" => Some(Variant::Ret),
            "halt" => Some(Variant::Halt),
            "noop" => Some(Variant::Noop),
            "fill" => Some(Variant::Fill),
            _ => None,
        }
    }

    /// Declared opcode. `Fill` words have no opcode field; `Noop`
    /// borrows `Add`'s because it is a pure substitution for it.
    pub fn opcode(self) -> Option<u32> {
        match self {
            Variant::Add | Variant::Noop => Some(0),
            Variant::Addi => Some(1),
            Variant::Nand => Some(2),
            Variant::Skp => Some(3),
            Variant::Goto => Some(4),
            Variant::Lea => Some(5),
            Variant::Lw => Some(8),
            Variant::Sw => Some(9),
            Variant::Call => Some(12),
            Variant::Ret => Some(13),
            Variant::Halt => Some(15),
            Variant::Fill => None,
        }
    }

    pub fn format(self) -> Format {
        match self {
            Variant::Add | Variant::Nand | Variant::Noop => Format::Register3,
            Variant::Addi => Format::Immediate,
            Variant::Lw | Variant::Sw => Format::Memory,
            Variant::Skp => Format::Skip,
            Variant::Goto => Format::Jump,
            Variant::Lea => Format::PcRelative,
            Variant::Call => Format::CallReg,
            Variant::Ret | Variant::Halt => Format::Bare,
            Variant::Fill => Format::DataWord,
        }
    }
}

/// One encoded source line. Immutable once constructed; the payload
/// holds every non-opcode field already resolved to bits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub variant: Variant,
    pub mnemonic: String,
    pub operands: String,
    /// Originating PC. Absent for the immediate format, whose encoding
    /// never depends on it.
    pub pc: Option<u64>,
    payload: String,
}

impl Instruction {
    /// Encode one source line. Returns a list to keep the contract
    /// open for multi-word expansions, but every current variant
    /// yields exactly one word; the `noop` macro substitutes its own
    /// operand text and still produces a single `add` word.
    pub fn create(
        mnemonic: &str,
        operands: &str,
        pc: u64,
        symbols: &SymbolTable,
    ) -> Result<Vec<Instruction>, AsmError> {
        let canonical = instruction_class(mnemonic)
            .ok_or_else(|| AsmError::UnknownInstruction(mnemonic.to_string()))?;
        let variant = Variant::from_name(canonical)
            .ok_or_else(|| AsmError::UnknownInstruction(mnemonic.to_string()))?;

        // The macro ignores whatever operand text the caller supplied.
        let operands = if variant == Variant::Noop {
            "$zero, $zero, $zero"
        } else {
            operands
        };

        let payload = parse_operands(variant, mnemonic, operands, symbols)?;
        let pc = if variant == Variant::Addi { None } else { Some(pc) };
        Ok(vec![Instruction {
            variant,
            mnemonic: mnemonic.to_string(),
            operands: operands.to_string(),
            pc,
            payload,
        }])
    }

    /// The full instruction word as a `BIT_WIDTH`-character bit string.
    pub fn binary(&self) -> String {
        let opcode = dec_to_bin(self.variant.opcode().unwrap_or(0) as i64, OPCODE_WIDTH);
        match self.variant.format() {
            Format::DataWord => self.payload.clone(),
            // call/ret/halt fill the rest of the word to the right
            Format::CallReg | Format::Bare => {
                zero_extend(&format!("{opcode}{}", self.payload), BIT_WIDTH, true)
            }
            _ => format!("{opcode}{}", self.payload),
        }
    }

    /// The instruction word as uppercase hex digits.
    pub fn hex(&self) -> String {
        bin_to_hex(&self.binary())
    }

    /// PC advance contributed by this instruction (one word each).
    pub fn next_pc(&self, pc: u64) -> u64 {
        pc + 1
    }
}

fn parse_operands(
    variant: Variant,
    mnemonic: &str,
    operands: &str,
    symbols: &SymbolTable,
) -> Result<String, AsmError> {
    let bad = || AsmError::BadOperands(operands.trim().to_string());

    match variant.format() {
        Format::Register3 => {
            // Fields: rx, ry, unused, rz
            let caps = RE_R3.captures(operands).ok_or_else(bad)?;
            Ok(format!(
                "{}{}{}{}",
                register_bits(&caps["rx"])?,
                register_bits(&caps["ry"])?,
                "0".repeat(R_UNUSED_WIDTH),
                register_bits(&caps["rz"])?,
            ))
        }
        Format::Immediate => {
            // Fields: rx, ry, imm -- labels are never eligible here
            let caps = RE_IMM.captures(operands).ok_or_else(bad)?;
            Ok(format!(
                "{}{}{}",
                register_bits(&caps["rx"])?,
                register_bits(&caps["ry"])?,
                resolve_value(&caps["imm"], IMM_OFFSET_WIDTH, None, false)?,
            ))
        }
        Format::Memory => {
            // Fields: rx, ry, offset
            let caps = RE_MEM.captures(operands).ok_or_else(bad)?;
            Ok(format!(
                "{}{}{}",
                register_bits(&caps["rx"])?,
                register_bits(&caps["ry"])?,
                resolve_value(&caps["off"], MEM_OFFSET_WIDTH, Some(symbols), false)?,
            ))
        }
        Format::Skip => {
            // Fields: mode, rx, unused, ry. Only the two concrete
            // spellings select a mode; the shared name cannot be
            // assembled.
            let mode = match mnemonic {
                "skpne" => 0,
                "skple" => 1,
                _ => return Err(AsmError::NotAssemblable("skp".to_string())),
            };
            let caps = RE_SKIP.captures(operands).ok_or_else(bad)?;
            Ok(format!(
                "{}{}{}{}",
                dec_to_bin(mode, SKP_MODE_WIDTH),
                register_bits(&caps["rx"])?,
                "0".repeat(SKP_UNUSED_WIDTH),
                register_bits(&caps["ry"])?,
            ))
        }
        Format::Jump => {
            // Absolute PC address; + 4 forces 4 significant unused bits
            let caps = RE_TARGET.captures(operands).ok_or_else(bad)?;
            resolve_value(&caps["target"], PC_OFFSET_WIDTH + 4, Some(symbols), true)
        }
        Format::PcRelative => {
            let caps = RE_PCREL.captures(operands).ok_or_else(bad)?;
            Ok(format!(
                "{}{}",
                register_bits(&caps["rx"])?,
                resolve_value(&caps["value"], PC_OFFSET_WIDTH, Some(symbols), false)?,
            ))
        }
        Format::CallReg => {
            let caps = RE_CALL.captures(operands).ok_or_else(bad)?;
            register_bits(&caps["tr"])
        }
        Format::Bare => {
            if !RE_EMPTY.is_match(operands) {
                return Err(AsmError::OperandsNotPermitted(operands.trim().to_string()));
            }
            Ok(String::new())
        }
        Format::DataWord => resolve_value(operands.trim(), BIT_WIDTH, None, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(mnemonic: &str, operands: &str) -> String {
        let symbols = SymbolTable::new();
        Instruction::create(mnemonic, operands, 0, &symbols).unwrap()[0].binary()
    }

    #[test]
    fn variant_registry_is_closed() {
        assert_eq!(Variant::from_name("add"), Some(Variant::Add));
        assert_eq!(Variant::from_name("blez"), None);
    }

    #[test]
    fn shift_suffix_is_accepted_but_not_encoded() {
        assert_eq!(
            word("add", "$t0, $t1, $t2, LSL 2"),
            word("add", "$t0, $t1, $t2")
        );
        assert_eq!(
            word("addi", "$t0, $t1, 4, asr 1"),
            word("addi", "$t0, $t1, 4")
        );
    }

    #[test]
    fn data_word_has_no_opcode_field() {
        assert_eq!(word(".fill", "0xFFFFFFFF"), "1".repeat(32));
        assert_eq!(word(".word", "-1"), "1".repeat(32));
        assert_eq!(word(".fill", "10"), format!("{}1010", "0".repeat(28)));
    }

    #[test]
    fn fill_rejects_labels() {
        let mut symbols = SymbolTable::new();
        symbols.insert("here".to_string(), 3);
        assert!(matches!(
            Instruction::create(".fill", "here", 0, &symbols),
            Err(AsmError::UnresolvableValue(_))
        ));
    }
}
