//! gridcalc - evaluate a sheet of cells from the command line.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use engine::{print_sheet, PrintMode, Sheet};
use formula::Position;

struct Edit {
    pos: Position,
    text: String,
}

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --cell <POS>=<TEXT>   Set a cell, e.g. -c A1=5 -c B1='=A1*2'");
    eprintln!("  -p, --print <text|values> What to print after applying edits (default: values)");
    eprintln!("  -h, --help                Print help");
}

fn parse_cell_arg(arg: &str) -> Result<Edit> {
    let (pos_text, cell_text) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected <POS>=<TEXT>, got '{arg}'"))?;
    let pos = Position::parse(pos_text)
        .ok_or_else(|| anyhow!("'{pos_text}' is not a valid cell position"))?;
    Ok(Edit {
        pos,
        text: cell_text.to_string(),
    })
}

fn run(args: Vec<String>) -> Result<String> {
    let mut edits = Vec::new();
    let mut mode = PrintMode::Values;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(String::new());
            }
            "-c" | "--cell" => {
                i += 1;
                let arg = args.get(i).context("--cell requires <POS>=<TEXT>")?;
                edits.push(parse_cell_arg(arg)?);
            }
            "-p" | "--print" => {
                i += 1;
                let arg = args.get(i).context("--print requires 'text' or 'values'")?;
                mode = match arg.as_str() {
                    "text" => PrintMode::Text,
                    "values" => PrintMode::Values,
                    other => return Err(anyhow!("unknown print mode '{other}'")),
                };
            }
            other => return Err(anyhow!("unknown option: {other}")),
        }
        i += 1;
    }

    let mut sheet = Sheet::new();
    for edit in edits {
        log::info!("setting {} to {:?}", edit.pos, edit.text);
        sheet
            .set_cell(edit.pos, &edit.text)
            .with_context(|| format!("setting {}", edit.pos))?;
    }

    Ok(print_sheet(&sheet, mode))
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
