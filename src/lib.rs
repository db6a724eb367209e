pub mod arch;
pub mod bits;
pub mod encode;
pub mod error;
pub mod line;
pub mod output;
pub mod resolve;

pub use arch::{instruction_class, receive_params, validate_pc};
pub use encode::{Format, Instruction, Variant};
pub use error::AsmError;
pub use line::{get_parts, is_blank, LineParts};
pub use output::{linearize, Linearizer, OutputFormat};
pub use resolve::{register_bits, resolve_value, SymbolTable};
