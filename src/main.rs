// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use cli::CliError;
use kicad_parts_placer::board::to_mm;
use kicad_parts_placer::export::export_report_to_csv;
use kicad_parts_placer::place::NegativeCoordinates;
use kicad_parts_placer::{
    group_parts, mirror_parts, normalize_table, place, Board, KicadBoard, PlaceOptions,
    SpreadsheetReader, ValidatedTable,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Takes a PCB & configuration data in mm, sets rotation and location on a new pcb"
)]
struct Args {
    /// PCB file to edit
    #[arg(long, value_name = "FILE")]
    pcb: PathBuf,

    /// Spreadsheet configuration file
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// PCB file to write output to
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Edit pcb file in place
    #[arg(short, long)]
    inplace: bool,

    /// Use drill/file/AUX center as reference point
    #[arg(long)]
    drill_center: bool,

    /// Mirror parts, required for matching up the front and back of two boards
    #[arg(long)]
    flip: bool,

    /// Name of parts group, defaults to the config file name
    #[arg(long = "group", value_name = "NAME")]
    group_name: Option<String>,

    /// Fail instead of placing parts at negative board coordinates
    #[arg(long)]
    reject_negative: bool,

    /// Write a CSV report of every placed and skipped part
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Run the whole pipeline without writing the board
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn output_path(args: &Args) -> Result<PathBuf, CliError> {
    if args.inplace {
        Ok(args.pcb.clone())
    } else {
        args.out.clone().ok_or_else(|| {
            CliError::input("Either the inplace flag needs to be set or the --out option set")
        })
    }
}

fn default_group_name(config: &Path) -> String {
    config
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn run(args: &Args) -> Result<(), CliError> {
    let out = output_path(args)?;

    let mut board = KicadBoard::load(&args.pcb)?;

    let origin_mm = if args.drill_center {
        let aux = board.aux_origin();
        (to_mm(aux.x), to_mm(aux.y))
    } else {
        (0.0, 0.0)
    };
    log::debug!("Reference origin: {origin_mm:?} mm");

    let table = normalize_table(SpreadsheetReader::new().read(&args.config)?);
    let components = ValidatedTable::new(&table)?;

    let options = PlaceOptions {
        origin_mm,
        negative_coordinates: if args.reject_negative {
            NegativeCoordinates::Reject
        } else {
            NegativeCoordinates::Allow
        },
    };

    let report = if args.flip {
        mirror_parts(&mut board, &components, &options)?
    } else {
        place(&mut board, &components, &options)?
    };
    for (refdes, reason) in report.skipped() {
        log::warn!("{refdes} skipped: {reason}");
    }

    let group_name = args
        .group_name
        .clone()
        .unwrap_or_else(|| default_group_name(&args.config));
    group_parts(&mut board, &components, &group_name);

    if let Some(report_path) = &args.report {
        export_report_to_csv(&report, report_path)?;
        log::info!("Report written to {}", report_path.display());
    }

    if args.dry_run {
        log::info!("Dry run, {} not written", out.display());
        return Ok(());
    }

    board
        .save(&out)
        .map_err(|e| CliError::processing(format!("Failed to write {}: {e}", out.display())))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::from(error.code as u8)
        }
    }
}
