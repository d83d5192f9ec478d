use log::{debug, info, warn};

use irv_ranking::builder::Builder;
use irv_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RcvError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in Excel file {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Line {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error reading file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the JSON summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive integer, got {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No input provided: use --input or a configuration file with cvrFileSources"))]
    MissingInput {},
    #[snafu(display("Input type not implemented: {input_type}"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Tabulation failed"))]
    Tabulation { source: TabulationError },
    #[snafu(display("Difference detected between the ranking and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RcvResult<T> = Result<T, RcvError>;

/// A ballot, as read from a file.
/// This is before any canonicalization of the candidate names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    pub choices: Vec<String>,
}

fn result_stats_to_json(rs: &TabulationResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(count.to_string()));
        }

        let tally_results: Vec<JSValue> = match &round_stat.outcome {
            RoundOutcome::Elected(c, position) => {
                vec![json!({"elected": c.name(), "position": position})]
            }
            RoundOutcome::Eliminated(c) => vec![json!({ "eliminated": c.name() })],
        };

        let js = json!({
            "round": round_stat.round,
            "activeBallots": round_stat.active_ballots.to_string(),
            "threshold": round_stat.threshold.to_string(),
            "tally": tally,
            "tallyResults": tally_results});
        l.push(js);
    }
    l
}

fn build_summary_js(config: &OutputConfig, rv: &TabulationResult) -> JSValue {
    let ranking: Vec<JSValue> = rv
        .ranking
        .iter()
        .map(|e| json!({"position": e.position, "candidate": e.candidate.name()}))
        .collect();
    json!({
        "config": config,
        "ranking": ranking,
        "results": result_stats_to_json(rv) })
}

fn read_ranking_data(root_path: Option<&Path>, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let p: PathBuf = match root_path {
        Some(root) => root.join(&cfs.file_path),
        None => PathBuf::from(&cfs.file_path),
    };
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    let provider = match cfs.provider.as_deref() {
        Some(x) => x.to_string(),
        None => guess_provider(&p2),
    };
    match provider.as_str() {
        "csv" => io_csv::read_csv_ranking(&p2, cfs),
        "xlsx" => io_xlsx::read_excel_file(&p2, cfs),
        x => UnknownInputTypeSnafu {
            input_type: x.to_string(),
        }
        .fail(),
    }
}

fn guess_provider(path: &str) -> String {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
    {
        Some(e) if e == "xlsx" => "xlsx".to_string(),
        _ => "csv".to_string(),
    }
}

fn build_ballots(parsed_ballots: &[ParsedBallot]) -> BallotSet {
    let mut builder = Builder::new();
    for pb in parsed_ballots.iter() {
        if pb.choices.is_empty() {
            debug!("build_ballots: ballot {} is empty", pb.id);
        }
        builder.add_ballot(&pb.choices);
    }
    builder.build()
}

// Reads the configuration file if provided, and lets the command line take precedence.
fn resolve_config(args: &Args) -> RcvResult<(Option<RcvConfig>, Option<PathBuf>)> {
    match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            Ok((Some(config), Some(root)))
        }
        None => Ok((None, None)),
    }
}

pub fn run_election(args: &Args) -> RcvResult<TabulationResult> {
    let (config, root_p) = resolve_config(args)?;

    // The command line input replaces all the sources of the configuration.
    let (sources, root_p): (Vec<FileSource>, Option<PathBuf>) = match &args.input {
        Some(input) => (vec![FileSource::from_args(input, args)], None),
        None => match &config {
            Some(c) if !c.cvr_file_sources.is_empty() => (c.cvr_file_sources.clone(), root_p),
            _ => return MissingInputSnafu {}.fail(),
        },
    };

    let mut data: Vec<ParsedBallot> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_ranking_data(root_p.as_deref(), cfs)?;
        debug!("run_election: read {} ballots from {}", file_data.len(), cfs.file_path);
        data.append(&mut file_data);
    }
    let num_empty = data.iter().filter(|pb| pb.choices.is_empty()).count();
    if num_empty > 0 {
        warn!("{} ballots without any choice", num_empty);
    }

    let ballots = build_ballots(&data);
    let result = run_ranking(&ballots).context(TabulationSnafu {})?;
    info!("run_election: result {:?}", result);

    for e in result.ranking.iter() {
        println!("{}", e);
    }

    if let Some(out) = &args.out {
        let output_config = OutputConfig::new(config.as_ref(), &sources);
        let result_js = build_summary_js(&output_config, &result);
        let pretty_js_stats =
            serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
        if out == "stdout" {
            println!("{}", pretty_js_stats);
        } else {
            fs::write(out, pretty_js_stats).context(WritingOutputSnafu { path: out.clone() })?;
        }
    }

    // The reference ranking, if provided for comparison
    if let Some(reference_p) = &args.reference {
        check_reference(reference_p, &result.ranking_text())?;
    }

    Ok(result)
}

fn check_reference(reference_path: &str, ranking_text: &str) -> RcvResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingFileSnafu {
        path: reference_path.to_string(),
    })?;
    let reference = reference.trim_end();
    if reference != ranking_text {
        warn!("Found differences with the reference ranking");
        print_diff(reference, ranking_text, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path.to_string(),
        }
        .fail();
    }
    info!("The ranking matches the reference {}", reference_path);
    Ok(())
}
