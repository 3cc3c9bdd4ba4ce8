use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use aigread::circuit::aig::{Aig, AigLit};
use aigread::circuit::aiger::decode_aag_reader;
use aigread::names::NameMap;
use aigread::reader::DecodeSummary;

#[derive(Debug, Parser)]
#[command(name = "aigread")]
#[command(about = "Decode ASCII AIGER files into an and-inverter graph")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Stats { path: String },
    Names {
        path: String,
        #[arg(long, default_value_t = false)]
        reverse: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Cmd::Stats { path } => stats_cmd(&path)?,
        Cmd::Names { path, reverse } => names_cmd(&path, reverse)?,
    }
    Ok(())
}

fn stats_cmd(path: &str) -> Result<()> {
    let mut aig = Aig::new();
    let summary = load_aig(path, &mut aig, None)?;
    println!(
        "inputs={} latches={} outputs={} ands={} max_id={}",
        summary.inputs,
        summary.latches,
        summary.outputs,
        aig.num_ands(),
        aig.max_id
    );
    if aig.num_ands() != summary.ands {
        println!("and_events={} hashed={}", summary.ands, summary.ands - aig.num_ands());
    }
    Ok(())
}

fn names_cmd(path: &str, reverse: bool) -> Result<()> {
    let mut aig = Aig::new();
    let mut names = NameMap::new();
    load_aig(path, &mut aig, Some(&mut names))?;

    if reverse {
        for (name, lit) in names.export_reverse_mapping() {
            println!("{} -> {}", name, lit.to_raw());
        }
        return Ok(());
    }

    for (idx, &id) in aig.input_ids().iter().enumerate() {
        let lit = AigLit::new(id, false);
        println!("i{} {} {}", idx, lit.to_raw(), aig.signal_name(lit).unwrap_or("-"));
    }
    for (idx, latch) in aig.latches.iter().enumerate() {
        let lit = AigLit::new(latch.id, false);
        let slot = aig.num_outputs() + idx;
        println!(
            "l{} {} {} next={}",
            idx,
            lit.to_raw(),
            aig.signal_name(lit).unwrap_or("-"),
            aig.output_name(slot).unwrap_or("-")
        );
    }
    for (idx, &lit) in aig.outputs().iter().enumerate() {
        println!("o{} {} {}", idx, lit.to_raw(), aig.output_name(idx).unwrap_or("-"));
    }
    Ok(())
}

fn load_aig(
    path: &str,
    aig: &mut Aig,
    names: Option<&mut NameMap<AigLit>>,
) -> Result<DecodeSummary> {
    let ext = Path::new(path)
        .extension()
        .and_then(|v| v.to_str())
        .unwrap_or_default();
    if ext != "aag" {
        bail!("unsupported extension: expected .aag");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    let reader = BufReader::new(file);
    decode_aag_reader(reader, aig, names).with_context(|| format!("failed to decode {}", path))
}
