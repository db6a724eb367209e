//! Typed assembly failures. Every error is synchronous and aborts the
//! single encoding step that raised it; the driver decides whether to
//! keep assembling the remaining lines.

use crate::arch::{ARCH_NAME, BIT_WIDTH};

#[derive(thiserror::Error, Debug)]
pub enum AsmError {
    #[error("Instruction or directive '{0}' is not defined in {arch}.", arch = ARCH_NAME)]
    UnknownInstruction(String),
    #[error("Operands '{0}' are in an incorrect format.")]
    BadOperands(String),
    #[error("Operands '{0}' are not permitted.")]
    OperandsNotPermitted(String),
    #[error("Register identifier '{0}' is not valid in {arch}.", arch = ARCH_NAME)]
    UnknownRegister(String),
    #[error("'{0}' is not in a valid hexadecimal format.")]
    BadHexLiteral(String),
    #[error("'{0}' is not in a valid binary format.")]
    BadBinaryLiteral(String),
    #[error("'{0}' is too large for {arch}.", arch = ARCH_NAME)]
    ValueTooLarge(String),
    #[error("'{0}' is too large (values) or too far away (labels) for {arch}.", arch = ARCH_NAME)]
    ValueOrLabelOutOfRange(String),
    #[error("'{0}' cannot be resolved as a value.")]
    UnresolvableValue(String),
    #[error("'{0}' cannot be resolved as a label or a value.")]
    UnresolvableSymbol(String),
    #[error("PC value {0} is too large for {bits} bits.", bits = BIT_WIDTH)]
    PcOutOfRange(u64),
    #[error("'{0}' instruction could not be assembled.")]
    NotAssemblable(String),
    #[error("Custom parameters are not supported")]
    UnsupportedParams,
}
