// src/bin/frp.rs
//
// ‥ … ≤ ≥ ≠ ≟ ×

//! Driver program _frp_ drives the [_frplib_].
//!
//! Processes user-passed command-line arguments.
//! Then processes paths passed; a path holding every role file is a case
//! directory, otherwise the immediate sub-directories of the path are
//! checked. Directories missing role files are omitted with a warning.
//!
//! For each case directory found, a case processing thread is created.
//! Each case processing thread uses a [`ReportAggregator`] instance to parse
//! every role file of the case, then sends the resulting [`CaseRecord`] to
//! the main processing thread over a [channel].
//!
//! The main processing thread writes each `CaseRecord` as JSON into its
//! case directory, then writes the combined JSON of all cases and the CSV
//! projection.
//!
//! Passed `--generate-cases`, _frp_ instead writes one journal file per case
//! of a case table. See [`casegenerator`].
//!
//! If passed CLI option `--summary`, the main processing thread
//! prints a [`Summary`] to stderr.
//!
//! [_frplib_]: frplib
//! [`ReportAggregator`]: frplib::readers::reportaggregator::ReportAggregator
//! [`CaseRecord`]: frplib::data::caserecord::CaseRecord
//! [channel]: self::ChanSendDatum
//! [`casegenerator`]: frplib::casegen::casegenerator
//! [`Summary`]: frplib::printer::summary::Summary

#![allow(non_camel_case_types)]

use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::frplib::casegen::casegenerator::generate;
use ::frplib::common::{FPath, FPaths, FileRole, FileRoleKind, FileRoles, FILE_ROLES_DEFAULT};
use ::frplib::data::caserecord::CaseRecord;
#[allow(unused_imports)]
use ::frplib::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use ::frplib::printer::csvwriter::{write_csv_file, ColumnSpec};
use ::frplib::printer::printers::{combine_case_records, write_json_file, CaseRecords, CaseRecordsByDir};
use ::frplib::printer::summary::{print_summary, Summary, SummaryCase};
use ::frplib::readers::filepreprocessor::{find_case_dirs, ProcessPathResult, ProcessPathResults};
use ::frplib::readers::helpers::{basename, fpath_to_path, path_to_fpath};
use ::frplib::readers::reportaggregator::ReportAggregator;
use ::frplib::readers::reverselinereader::{BufSz, BUFSZ_DEF, BUFSZ_MAX, BUFSZ_MIN};

// --------------------
// command-line parsing

/// Default combined JSON output file.
const CLI_OUTPUT_DEF: &str = "output.json";

/// Default per-case JSON output file name.
const CLI_CASE_OUTPUT_DEF: &str = "output.json";

/// Default CSV output file.
const CLI_CSV_DEF: &str = "output.csv";

/// Default zone of the CSV projection.
const CLI_CSV_ZONE_DEF: &str = "Net";

/// Default directory of generated journal files.
const CLI_OUT_DIR_DEF: &str = ".";

/// Separator of a `--role` value name and file name.
const CLI_ROLE_SEP_NAME: char = '=';

/// Separator of a `--role` value file name and kind.
const CLI_ROLE_SEP_KIND: char = ':';

const CLI_ROLE_KIND_SINGLE: &str = "single";
const CLI_ROLE_KIND_LOG: &str = "log";

#[cfg(test)]
const CLI_HELP_AFTER_NOTE_TEST: &str = "\nTEST BUILD";
#[cfg(not(test))]
const CLI_HELP_AFTER_NOTE_TEST: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Given a directory path holding every role file, the directory is one case.
Given any other directory path, each immediate sub-directory holding every
role file is one case.

The default roles are:
    Log=fluent_log.log:log
    FX=FX  FY=FY  FZ=FZ  MX=MX  MY=MY  MZ=MZ
    CoP=CoP:single

A --role value is ROLE=FILE for a multi-block force report,
ROLE=FILE:single for a single-block force report, or ROLE=FILE:log for a
solver transcript. Passing any --role replaces the default roles.

A --csv-columns file is a JSON object of column title to JSON pointer, e.g.
    {\"Fx\": \"/FX/Forces - Direction Vector (1 0 0)/Forces (n)/Total/Net\"}

Generate journal files with
    frp --generate-cases cases.json --template template.jou --out-dir DIR
",
    CLI_HELP_AFTER_NOTE_TEST,
);

/// Process exit code for user-facing errors.
const EXIT_ERR: i32 = 1;

// `CLI_Args` is the command-line interface.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "frp",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(Fluent Report Parser)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
    // override usage to more clearly show `--generate-cases` is an exclusive "mode".
    override_usage = "\n  frp [OPTIONS] <PATHS>...\n\n  frp --generate-cases <CASES_JSON> --template <TEMPLATE> [--out-dir <OUT_DIR>]",
)]
struct CLI_Args {
    /// Path(s) of case directories or of directories of case directories.
    #[clap(
        required_unless_present = "generate_cases",
        verbatim_doc_comment,
    )]
    paths: Vec<String>,

    /// Read logs backward in chunks of this size in bytes.
    /// May pass value as any radix (hexadecimal, decimal, octal, binary).
    /// Using the default value is recommended.
    /// Most useful for developers.
    #[clap(
        required = false,
        long,
        verbatim_doc_comment,
        default_value_t = BUFSZ_DEF.to_string(),
        value_parser = cli_parse_blocksz,
    )]
    blocksz: String,

    /// A file expected in every case directory, as ROLE=FILE[:single|:log].
    /// May be passed many times. Replaces the default roles.
    #[clap(
        long = "role",
        verbatim_doc_comment,
        value_parser = cli_parse_role,
    )]
    roles: Vec<FileRole>,

    /// Write the combined JSON of all cases to this file.
    #[clap(
        short = 'o',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_OUTPUT_DEF),
    )]
    output: String,

    /// Write the JSON of each case to this file name within the case
    /// directory.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_CASE_OUTPUT_DEF),
    )]
    case_output: String,

    /// Do not write the JSON of each case into the case directory.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    no_case_output: bool,

    /// Write the CSV table of all cases to this file.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_CSV_DEF),
    )]
    csv: String,

    /// Zone of the force report values in the default CSV columns.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_CSV_ZONE_DEF),
    )]
    csv_zone: String,

    /// JSON file of CSV column title to JSON pointer. Replaces the default
    /// CSV columns.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    csv_columns: Option<String>,

    /// Generate one journal file per case of this JSON case table, then exit.
    /// Requires --template.
    #[clap(
        long,
        verbatim_doc_comment,
        requires = "template",
        conflicts_with = "paths",
    )]
    generate_cases: Option<String>,

    /// Template journal file for --generate-cases.
    #[clap(
        long,
        verbatim_doc_comment,
        requires = "generate_cases",
    )]
    template: Option<String>,

    /// Directory of the generated journal files.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_OUT_DIR_DEF),
    )]
    out_dir: String,

    /// Print a summary of paths and files processed to stderr.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument processor for `--blocksz`.
/// This implementation, as opposed to clap built-in number parsing, allows more
/// flexibility for how the user may pass a number
/// e.g. "0xF00", or "0b10100", etc.
fn cli_process_blocksz(blockszs: &String) -> std::result::Result<BufSz, String> {
    let blocksz_: BufSz;
    let errs = format!("Unable to parse a number for --blocksz {:?}", blockszs);

    if blockszs.starts_with("0x") {
        blocksz_ = match BufSz::from_str_radix(blockszs.trim_start_matches("0x"), 16) {
            Ok(val) => val,
            Err(err) => return Err(format!("{} {}", errs, err)),
        };
    } else if blockszs.starts_with("0o") {
        blocksz_ = match BufSz::from_str_radix(blockszs.trim_start_matches("0o"), 8) {
            Ok(val) => val,
            Err(err) => return Err(format!("{} {}", errs, err)),
        };
    } else if blockszs.starts_with("0b") {
        blocksz_ = match BufSz::from_str_radix(blockszs.trim_start_matches("0b"), 2) {
            Ok(val) => val,
            Err(err) => return Err(format!("{} {}", errs, err)),
        };
    } else {
        blocksz_ = match blockszs.parse::<BufSz>() {
            Ok(val) => val,
            Err(err) => return Err(format!("{} {}", errs, err)),
        };
    }

    if !(BUFSZ_MIN <= blocksz_ && blocksz_ <= BUFSZ_MAX) {
        return Err(format!("--blocksz must be {} ≤ BLOCKSZ ≤ {}, it was {:?}", BUFSZ_MIN, BUFSZ_MAX, blockszs));
    }

    Ok(blocksz_)
}

/// `clap` argument parser for `--blocksz`.
fn cli_parse_blocksz(blockszs: &str) -> std::result::Result<String, String> {
    match cli_process_blocksz(&String::from(blockszs)) {
        Ok(val) => Ok(val.to_string()),
        Err(err) => Err(err),
    }
}

/// `clap` argument parser for `--role`, `ROLE=FILE[:single|:log]`.
fn cli_parse_role(role: &str) -> std::result::Result<FileRole, String> {
    let (name, rest) = match role.split_once(CLI_ROLE_SEP_NAME) {
        Some((name, rest)) if !name.trim().is_empty() => (name.trim(), rest),
        _ => return Err(format!("--role {:?} must be ROLE=FILE[:single|:log]", role)),
    };
    let (filename, kind) = match rest.rsplit_once(CLI_ROLE_SEP_KIND) {
        Some((filename, CLI_ROLE_KIND_SINGLE)) => (filename, FileRoleKind::Force { single_block: true }),
        Some((filename, CLI_ROLE_KIND_LOG)) => (filename, FileRoleKind::Log),
        _ => (rest, FileRoleKind::Force { single_block: false }),
    };
    if filename.is_empty() {
        return Err(format!("--role {:?} has no FILE", role));
    }

    Ok(FileRole::new(name, filename, kind))
}

/// Processed command-line arguments.
#[derive(Debug)]
struct CLI_Config {
    paths: FPaths,
    blocksz: BufSz,
    roles: FileRoles,
    output: FPath,
    case_output: Option<FPath>,
    csv: FPath,
    csv_zone: String,
    csv_columns: Option<FPath>,
    /// `(cases, template, out_dir)` of the journal generation mode
    generate: Option<(FPath, FPath, FPath)>,
    summary: bool,
}

/// CLI argument processing
fn cli_process_args() -> CLI_Config {
    let args = CLI_Args::parse();

    defo!("args {:?}", args);

    let blocksz: BufSz = match cli_process_blocksz(&args.blocksz) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            std::process::exit(EXIT_ERR);
        }
    };
    let roles: FileRoles = match args.roles.is_empty() {
        true => FILE_ROLES_DEFAULT.clone(),
        false => args.roles,
    };
    let case_output: Option<FPath> = match args.no_case_output {
        true => None,
        false => Some(args.case_output),
    };
    let generate: Option<(FPath, FPath, FPath)> = match (args.generate_cases, args.template) {
        (Some(cases), Some(template)) => Some((cases, template, args.out_dir)),
        _ => None,
    };

    CLI_Config {
        paths: args.paths,
        blocksz,
        roles,
        output: args.output,
        case_output,
        csv: args.csv,
        csv_zone: args.csv_zone,
        csv_columns: args.csv_columns,
        generate,
        summary: args.summary,
    }
}

// -------------------
// case processing

/// Data sent from a case processing thread to the main processing thread.
type ChanDatum = (FPath, CaseRecord, SummaryCase);

/// Sender channel of a case processing thread.
type ChanSendDatum = crossbeam_channel::Sender<ChanDatum>;

/// Receiver channel of the main processing thread.
type ChanRecvDatum = crossbeam_channel::Receiver<ChanDatum>;

/// Parse one case directory and send the result to the main thread.
fn exec_case_thread(
    chan_send: ChanSendDatum,
    dir: FPath,
    roles: FileRoles,
    blocksz: BufSz,
) {
    defn!("({:?})", dir);
    let mut aggregator = ReportAggregator::new(dir.clone(), roles, blocksz);
    let record: CaseRecord = aggregator.load();
    let summary = SummaryCase::new(
        dir.clone(),
        aggregator.count_files_parsed(),
        aggregator.errors(),
        aggregator.warnings(),
    );
    for role_error in aggregator.errors().iter() {
        e_err!("{:?}: {}", dir, role_error);
    }
    for warning in aggregator.warnings().iter() {
        e_wrn!("{:?}: {}", dir, warning);
    }
    match chan_send.send((dir, record, summary)) {
        Ok(_) => {}
        Err(_err) => {
            de_err!("chan_send.send() failed {}", _err);
        }
    }
    defx!();
}

/// Parse every case directory in its own thread. Returns the records keyed
/// by directory path, and a summary per case.
fn process_cases(
    dirs: &[FPath],
    roles: &FileRoles,
    blocksz: BufSz,
) -> (CaseRecordsByDir, Vec<SummaryCase>) {
    defn!("({} dirs)", dirs.len());
    let (chan_send, chan_recv): (ChanSendDatum, ChanRecvDatum) = crossbeam_channel::unbounded();
    let mut thread_count: usize = 0;
    for dir in dirs.iter() {
        let chan_send_ = chan_send.clone();
        let dir_: FPath = dir.clone();
        let roles_: FileRoles = roles.clone();
        let basename_: FPath = basename(dir);
        match thread::Builder::new()
            .name(basename_.clone())
            .spawn(move || exec_case_thread(chan_send_, dir_, roles_, blocksz))
        {
            Ok(_joinhandle) => {
                thread_count += 1;
            }
            Err(err) => {
                e_err!("thread.name({:?}).spawn() failed {:?}", basename_, err);
                continue;
            }
        }
    }
    // the receiver iteration ends once every thread dropped its sender
    drop(chan_send);
    defo!("{} threads", thread_count);

    let mut records = CaseRecordsByDir::new();
    let mut summaries: Vec<SummaryCase> = Vec::with_capacity(thread_count);
    for (dir, record, summary) in chan_recv.iter() {
        records.insert(dir, record);
        summaries.push(summary);
    }
    summaries.sort_by(|a, b| a.dir.cmp(&b.dir));
    defx!("{} records", records.len());

    (records, summaries)
}

/// Write every output file. Returns the paths written.
fn write_outputs(
    config: &CLI_Config,
    records_by_dir: &CaseRecordsByDir,
) -> anyhow::Result<FPaths> {
    let mut outputs: FPaths = FPaths::new();
    if let Some(case_output) = config.case_output.as_ref() {
        for (dir, record) in records_by_dir.iter() {
            let path: FPath = path_to_fpath(&fpath_to_path(dir).join(case_output));
            write_json_file(&path, record).with_context(|| format!("writing case JSON {:?}", path))?;
            outputs.push(path);
        }
    }

    let (records, dirs_full): (CaseRecords, FPaths) = combine_case_records(records_by_dir);
    for dir in dirs_full.iter() {
        e_wrn!("case directory name {:?} repeats; keyed by path {:?}", basename(dir), dir);
    }

    write_json_file(&config.output, &records).with_context(|| format!("writing JSON {:?}", config.output))?;
    outputs.push(config.output.clone());

    let spec: ColumnSpec = match config.csv_columns.as_ref() {
        Some(path) => ColumnSpec::from_json_file(path).with_context(|| format!("reading CSV columns {:?}", path))?,
        None => ColumnSpec::for_zone(&config.csv_zone, &records),
    };
    write_csv_file(&config.csv, &spec, &records).with_context(|| format!("writing CSV {:?}", config.csv))?;
    outputs.push(config.csv.clone());

    Ok(outputs)
}

/// Process the case directories of `config`. Returns `true` if every file
/// of every case parsed and every output was written.
fn processing_loop(
    config: &CLI_Config,
    start_time: Instant,
) -> bool {
    defn!();
    let results: ProcessPathResults = find_case_dirs(&config.paths, &config.roles);
    let mut dirs: FPaths = FPaths::new();
    for result in results.iter() {
        match result {
            ProcessPathResult::CaseValid(path) => {
                eprintln!("Accepting {:?}", path);
                dirs.push(path.clone());
            }
            ProcessPathResult::CaseErrMissingFiles(path, missing) => {
                e_wrn!("omitting directory {:?}; missing files {:?}", path, missing);
            }
            ProcessPathResult::PathErrNotADir(path) => {
                e_wrn!("omitting {:?}; not a directory", path);
            }
            ProcessPathResult::PathErrNotExist(path) => {
                e_wrn!("omitting {:?}; does not exist", path);
            }
        }
    }

    let (records, summaries) = process_cases(&dirs, &config.roles, config.blocksz);
    let mut ret: bool = !dirs.is_empty() && summaries.iter().all(|case| case.errors.is_empty());

    let outputs: FPaths = match write_outputs(config, &records) {
        Ok(outputs) => outputs,
        Err(err) => {
            e_err!("{:#}", err);
            ret = false;
            FPaths::new()
        }
    };

    if config.summary {
        let summary = Summary {
            paths: results,
            cases: summaries,
            outputs,
            elapsed: start_time.elapsed(),
        };
        let mut stderr = std::io::stderr();
        if let Err(_err) = print_summary(&mut stderr, &summary) {
            de_err!("print_summary failed {}", _err);
        }
    }
    defx!("return {}", ret);

    ret
}

/// Process the user-passed command-line arguments.
/// Start function `processing_loop`, or generate journal files.
/// Determine a process return code.
pub fn main() -> ExitCode {
    let start_time = Instant::now();
    defn!();

    let config: CLI_Config = cli_process_args();

    if let Some((cases, template, out_dir)) = config.generate.as_ref() {
        let exitcode: ExitCode = match generate(cases, template, out_dir) {
            Ok(paths) => {
                for path in paths.iter() {
                    eprintln!("Wrote {:?}", path);
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                e_err!("{}", err);
                ExitCode::FAILURE
            }
        };
        defx!("exitcode {:?}", exitcode);

        return exitcode;
    }

    let ret: bool = processing_loop(&config, start_time);

    let exitcode = if ret { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// -------------------------------------------------------------------------------------------------
