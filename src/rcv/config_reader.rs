use crate::args::Args;
use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
}

impl OutputConfig {
    /// Without output settings, the contest is named after the first input file.
    pub fn new(config: Option<&RcvConfig>, sources: &[FileSource]) -> OutputConfig {
        match config.and_then(|c| c.output_settings.as_ref()) {
            Some(os) => OutputConfig {
                contest: os.contest_name.clone(),
                date: os.contest_date.clone(),
                jurisdiction: os.contest_jurisdiction.clone(),
                office: os.contest_office.clone(),
            },
            None => OutputConfig {
                contest: sources
                    .first()
                    .map(|s| io_common::simplify_file_name(&s.file_path))
                    .unwrap_or_default(),
                date: None,
                jurisdiction: None,
                office: None,
            },
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    pub fn from_args(input: &str, args: &Args) -> FileSource {
        FileSource {
            provider: args.input_type.clone(),
            file_path: input.to_string(),
            _first_vote_column_index: args.first_vote_column.map(|x| JSValue::from(x as u64)),
            _first_vote_row_index: args.first_vote_row.map(|x| JSValue::from(x as u64)),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }
    }

    /// The column of the first choice, starting at 0.
    pub fn first_vote_column_index(&self) -> RcvResult<usize> {
        let x = read_js_int(&self._first_vote_column_index)?.unwrap_or(1);
        ensure_positive(x)?;
        Ok(x - 1)
    }

    /// The row of the first ballot, starting at 0.
    pub fn first_vote_row_index(&self) -> RcvResult<usize> {
        let x = read_js_int(&self._first_vote_row_index)?.unwrap_or(1);
        ensure_positive(x)?;
        Ok(x - 1)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "cvrFileSources", default)]
    pub cvr_file_sources: Vec<FileSource>,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let config_str = fs::read_to_string(path).context(ReadingFileSnafu {
        path: path.to_string(),
    })?;
    parse_config(&config_str)
}

pub fn parse_config(contents: &str) -> RcvResult<RcvConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

fn ensure_positive(x: usize) -> RcvResult<()> {
    if x == 0 {
        whatever!("Row and column indexes start at 1, got 0");
    }
    Ok(())
}

// Indexes start at 1. Columns may also be given as Excel-style letters (A, B, ..., AA).
fn read_js_int(x: &Option<JSValue>) -> RcvResult<Option<usize>> {
    match x {
        None => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| Some(x as usize))
            .context(ParsingJsonNumberSnafu {
                content: n.to_string(),
            }),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase()
                .bytes()
                .try_fold(0usize, |acc, b| {
                    acc.checked_mul(26)?.checked_add((b - b'a') as usize + 1)
                })
                .map(Some)
                .context(ParsingJsonNumberSnafu { content: s.clone() })
        }
        Some(JSValue::String(s)) => s
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        Some(js) => ParsingJsonNumberSnafu {
            content: js.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_with_sources() {
        let config = parse_config(
            r#"{
              "outputSettings": {"contestName": "Board", "contestDate": "2022-10-01"},
              "cvrFileSources": [
                {"provider": "csv", "filePath": "ballots.csv", "firstVoteColumnIndex": 2, "firstVoteRowIndex": "3"},
                {"filePath": "more.xlsx", "firstVoteColumnIndex": "B", "excelWorksheetName": "Form1"}
              ]
            }"#,
        )
        .unwrap();
        let sources = &config.cvr_file_sources;
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].provider.as_deref(), Some("csv"));
        assert_eq!(sources[0].first_vote_column_index().unwrap(), 1);
        assert_eq!(sources[0].first_vote_row_index().unwrap(), 2);
        assert_eq!(sources[1].provider, None);
        assert_eq!(sources[1].first_vote_column_index().unwrap(), 1);
        assert_eq!(sources[1].first_vote_row_index().unwrap(), 0);

        let oc = OutputConfig::new(Some(&config), sources);
        assert_eq!(oc.contest, "Board");
        assert_eq!(oc.date.as_deref(), Some("2022-10-01"));
    }

    #[test]
    fn excel_columns() {
        assert_eq!(read_js_int(&Some(JSValue::from("a"))).unwrap(), Some(1));
        assert_eq!(read_js_int(&Some(JSValue::from("AA"))).unwrap(), Some(27));
        assert!(read_js_int(&Some(JSValue::from("1x"))).is_err());
        assert!(read_js_int(&Some(JSValue::from(true))).is_err());
        // Too many letters for a column index.
        assert!(matches!(
            read_js_int(&Some(JSValue::from("ZZZZZZZZZZZZZZZZ"))),
            Err(RcvError::ParsingJsonNumber { .. })
        ));
    }

    #[test]
    fn zero_index_is_rejected() {
        let args = Args {
            first_vote_column: Some(0),
            ..Args::default()
        };
        let cfs = FileSource::from_args("votes.csv", &args);
        assert!(cfs.first_vote_column_index().is_err());
        assert_eq!(cfs.first_vote_row_index().unwrap(), 0);
    }

    #[test]
    fn contest_named_after_input() {
        let cfs = FileSource::from_args("data/votes.csv", &Args::default());
        let oc = OutputConfig::new(None, &[cfs]);
        assert_eq!(oc.contest, "votes.csv");
    }
}
