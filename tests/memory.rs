use conte200_rs::{AsmError, Instruction, SymbolTable};
use pretty_assertions::assert_eq;

fn encode(mnemonic: &str, operands: &str, symbols: &SymbolTable) -> Instruction {
    Instruction::create(mnemonic, operands, 0, symbols)
        .unwrap()
        .remove(0)
}

#[test]
fn load_and_store_layouts() {
    let symbols = SymbolTable::new();
    // lw $t0, 4($sp) -> opcode 8, rx=6, ry=13, offset 4
    let lw = encode("lw", "$t0, 4($sp)", &symbols).binary();
    assert_eq!(&lw[0..4], "1000");
    assert_eq!(&lw[4..8], "0110");
    assert_eq!(&lw[8..12], "1101");
    assert_eq!(lw[12..32], format!("{}100", "0".repeat(17)));
    assert_eq!(encode("lw", "$t0, 4($sp)", &symbols).hex(), "86D00004");

    // sw shares the layout under opcode 9
    let sw = encode("sw", "$t0, 4($sp)", &symbols).binary();
    assert_eq!(&sw[0..4], "1001");
    assert_eq!(sw[4..32], lw[4..32]);
}

#[test]
fn memory_offsets_resolve_labels() {
    let mut symbols = SymbolTable::new();
    symbols.insert("data".to_string(), 12);
    let word = encode("lw", "$s0, data($zero)", &symbols).binary();
    assert_eq!(word[12..32], format!("{}1100", "0".repeat(16)));
}

#[test]
fn negative_offsets_sign_extend() {
    let symbols = SymbolTable::new();
    let word = encode("sw", "$ra, -4($fp)", &symbols).binary();
    assert_eq!(word[12..32], format!("{}1100", "1".repeat(16)));
}

#[test]
fn offset_range_boundaries() {
    let symbols = SymbolTable::new();
    let max = (1i64 << 19) - 1;
    let min = -(1i64 << 19);
    assert!(Instruction::create("lw", &format!("$t0, {max}($sp)"), 0, &symbols).is_ok());
    assert!(Instruction::create("lw", &format!("$t0, {min}($sp)"), 0, &symbols).is_ok());
    assert!(matches!(
        Instruction::create("lw", &format!("$t0, {}($sp)", max + 1), 0, &symbols),
        Err(AsmError::ValueOrLabelOutOfRange(_))
    ));
    assert!(matches!(
        Instruction::create("lw", &format!("$t0, {}($sp)", min - 1), 0, &symbols),
        Err(AsmError::ValueOrLabelOutOfRange(_))
    ));
}

#[test]
fn malformed_memory_operands() {
    let symbols = SymbolTable::new();
    assert!(matches!(
        Instruction::create("lw", "$t0, $sp, 4", 0, &symbols),
        Err(AsmError::BadOperands(_))
    ));
    assert!(matches!(
        Instruction::create("lw", "4($sp)", 0, &symbols),
        Err(AsmError::BadOperands(_))
    ));
}
