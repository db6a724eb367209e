//! Operand value resolution: register names to register codes, and
//! label/literal/decimal tokens to fixed-width bit strings.
//!
//! The symbol table is built by the assembler's first pass and passed
//! in read-only wherever labels are meaningful; formats whose fields
//! never hold addresses simply pass `None` and labels are rejected for
//! them.

use std::collections::HashMap;

use crate::arch::{register_code, REGISTER_WIDTH};
use crate::bits::dec_to_bin;
use crate::error::AsmError;

/// Label name to resolved address. Populated once before encoding
/// begins; the encoder only reads it.
pub type SymbolTable = HashMap<String, i64>;

/// Look up a register token and render its code in `REGISTER_WIDTH`
/// bits.
pub fn register_bits(token: &str) -> Result<String, AsmError> {
    let code = register_code(token).ok_or_else(|| AsmError::UnknownRegister(token.to_string()))?;
    Ok(dec_to_bin(code as i64, REGISTER_WIDTH))
}

/// Resolve an offset/immediate/target token to a `width`-bit string.
///
/// Resolution order: symbol table (when `labels` is supplied), then
/// `0x`/`0b` literals (zero-extended, rejected if their significant
/// bits exceed the field), then decimal with a signed two's-complement
/// or unsigned range check.
pub fn resolve_value(
    token: &str,
    width: usize,
    labels: Option<&SymbolTable>,
    unsigned: bool,
) -> Result<String, AsmError> {
    let token = token.trim();

    if let Some(table) = labels {
        if let Some(&addr) = table.get(token) {
            return encode_int(token, addr, width, unsigned, true);
        }
    }

    if let Some(digits) = token.strip_prefix("0x") {
        let value = u64::from_str_radix(digits, 16)
            .map_err(|_| AsmError::BadHexLiteral(token.to_string()))?;
        return encode_literal(token, value, width);
    }

    if let Some(digits) = token.strip_prefix("0b") {
        let value = u64::from_str_radix(digits, 2)
            .map_err(|_| AsmError::BadBinaryLiteral(token.to_string()))?;
        return encode_literal(token, value, width);
    }

    let value: i64 = token.parse().map_err(|_| {
        if labels.is_some() {
            AsmError::UnresolvableSymbol(token.to_string())
        } else {
            AsmError::UnresolvableValue(token.to_string())
        }
    })?;
    encode_int(token, value, width, unsigned, labels.is_some())
}

/// A prefixed literal carries its own bit pattern: it must fit the
/// field as-is and is zero-extended, never sign-extended.
fn encode_literal(token: &str, value: u64, width: usize) -> Result<String, AsmError> {
    let significant = (64 - value.leading_zeros() as usize).max(1);
    if significant > width {
        return Err(AsmError::ValueTooLarge(token.to_string()));
    }
    Ok(format!("{value:0width$b}"))
}

fn encode_int(
    token: &str,
    value: i64,
    width: usize,
    unsigned: bool,
    labels: bool,
) -> Result<String, AsmError> {
    let value_wide = value as i128;
    let in_range = if unsigned {
        value_wide >= 0 && value_wide < (1i128 << width)
    } else {
        let bound = 1i128 << (width - 1);
        value_wide >= -bound && value_wide < bound
    };
    if !in_range {
        return Err(if labels {
            AsmError::ValueOrLabelOutOfRange(token.to_string())
        } else {
            AsmError::ValueTooLarge(token.to_string())
        });
    }
    Ok(dec_to_bin(value, width))
}
