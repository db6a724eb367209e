//! Linearization of a sparse `{PC -> Instruction}` program map into a
//! dense word stream.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::encode::Instruction;
use crate::error::AsmError;
use crate::resolve::SymbolTable;

/// Rendering selected for the emitted words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Binary,
    Hex,
}

/// Lazy word stream over the program map. Walks PCs from 0, emitting
/// explicit entries and synthesizing a `noop` filler word (the macro
/// instruction, not a raw zero word) for any PC without one. Stops as
/// soon as every explicit entry has been consumed, so gaps after the
/// last explicit PC are never filled.
pub struct Linearizer<'a> {
    program: &'a HashMap<u64, Instruction>,
    format: OutputFormat,
    filler: Instruction,
    pc: u64,
    consumed: usize,
}

/// Build the lazy output sequence for `program` in the given format.
pub fn linearize(
    program: &HashMap<u64, Instruction>,
    format: OutputFormat,
) -> Result<Linearizer<'_>, AsmError> {
    let filler = Instruction::create("noop", "", 0, &SymbolTable::new())?
        .into_iter()
        .next()
        .ok_or_else(|| AsmError::NotAssemblable("noop".to_string()))?;
    Ok(Linearizer {
        program,
        format,
        filler,
        pc: 0,
        consumed: 0,
    })
}

impl Linearizer<'_> {
    fn render(&self, instruction: &Instruction) -> String {
        match self.format {
            OutputFormat::Binary => instruction.binary(),
            OutputFormat::Hex => instruction.hex(),
        }
    }
}

impl Iterator for Linearizer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.consumed >= self.program.len() {
            return None;
        }
        let pc = self.pc;
        match self.program.get(&pc) {
            Some(instruction) => {
                self.pc = instruction.next_pc(pc);
                self.consumed += 1;
                Some(self.render(instruction))
            }
            None => {
                self.pc = self.filler.next_pc(pc);
                Some(self.render(&self.filler))
            }
        }
    }
}
