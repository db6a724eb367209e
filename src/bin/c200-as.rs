use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use conte200_rs::arch::{receive_params, validate_pc};
use conte200_rs::{get_parts, is_blank, linearize, Instruction, OutputFormat, SymbolTable};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Two-pass assembler for the Conte-200 teaching ISA"
)]
struct Opts {
    /// Input assembly file (one instruction or directive per line)
    #[arg(value_name = "ASMFILE")]
    input: PathBuf,
    /// Output file, one encoded word per line
    #[arg(short, long)]
    output: PathBuf,
    /// Rendering of the emitted words
    #[arg(long, value_enum, default_value_t = EmitFormat::Binary)]
    format: EmitFormat,
    /// Export the resolved symbol table as JSON
    #[arg(long, value_name = "FILE")]
    symbols_out: Option<PathBuf>,
    /// Architecture parameter as KEY=VALUE. Repeat flag to add more.
    /// The Conte-200 accepts none, so supplying any fails.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitFormat {
    Binary,
    Hex,
}

impl From<EmitFormat> for OutputFormat {
    fn from(format: EmitFormat) -> OutputFormat {
        match format {
            EmitFormat::Binary => OutputFormat::Binary,
            EmitFormat::Hex => OutputFormat::Hex,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
struct SymbolKV {
    name: String,
    addr: i64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let mut params = HashMap::new();
    for raw in &opts.params {
        let (key, value) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
        params.insert(key.to_string(), value.to_string());
    }
    receive_params(&params)?;

    let src = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    // Pass 1: collect label addresses.
    let mut symbols = SymbolTable::new();
    let mut pc = 0u64;
    for (num, raw) in src.lines().enumerate() {
        if is_blank(raw) {
            continue;
        }
        let Some(parts) = get_parts(raw) else { continue };
        if let Some(label) = parts.label {
            if symbols.insert(label.clone(), pc as i64).is_some() {
                bail!("line {}: label '{}' is defined more than once", num + 1, label);
            }
        }
        if parts.opcode.is_some() {
            pc = validate_pc(pc + 1).with_context(|| format!("line {}", num + 1))?;
        }
    }
    debug!(labels = symbols.len(), words = pc, "first pass complete");

    // Pass 2: encode every line into the sparse program map. A failing
    // line is reported and skipped so the rest of the file still gets
    // checked.
    let mut program: HashMap<u64, Instruction> = HashMap::new();
    let mut pc = 0u64;
    let mut failures = 0usize;
    for (num, raw) in src.lines().enumerate() {
        if is_blank(raw) {
            continue;
        }
        let Some(parts) = get_parts(raw) else { continue };
        let Some(opcode) = parts.opcode else { continue };
        let operands = parts.operands.unwrap_or_default();
        match Instruction::create(&opcode, &operands, pc, &symbols) {
            Ok(list) => {
                for instruction in list {
                    let next = instruction.next_pc(pc);
                    program.insert(pc, instruction);
                    pc = validate_pc(next).with_context(|| format!("line {}", num + 1))?;
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!(
                    "{}:{}: {} ({})",
                    opts.input.display(),
                    num + 1,
                    err,
                    raw.trim()
                );
                pc = validate_pc(pc + 1)?;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} line(s) failed to assemble");
    }
    debug!(entries = program.len(), "second pass complete");

    if let Some(path) = &opts.symbols_out {
        let mut table: Vec<SymbolKV> = symbols
            .iter()
            .map(|(name, &addr)| SymbolKV {
                name: name.clone(),
                addr,
            })
            .collect();
        table.sort_by_key(|kv| kv.addr);
        fs::write(path, serde_json::to_string_pretty(&table)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let words: Vec<String> = linearize(&program, opts.format.into())?.collect();
    let mut text = words.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(&opts.output, text)
        .with_context(|| format!("writing {}", opts.output.display()))?;
    debug!(words = words.len(), "output written");

    Ok(())
}
