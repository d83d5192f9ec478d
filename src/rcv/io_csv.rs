// Primitives for reading CSV files.

use std::io;

use crate::rcv::{
    io_common::{clean_choices, make_default_id},
    *,
};

pub fn read_csv_ranking(path: &str, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let rdr = csv_builder()
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_csv_records(rdr, path, cfs)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Ballots do not all rank the same number of candidates.
    builder.has_headers(false).flexible(true);
    builder
}

fn read_csv_records<R: io::Read>(
    rdr: csv::Reader<R>,
    path: &str,
    cfs: &FileSource,
) -> RcvResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // Blank lines are not records: rows are counted as non-blank records.
        // The row numbers start at 1 to respect most conventions in the spreadsheet world
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        if idx < first_row {
            debug!("read_csv_ranking: skipping row {:?}", lineno);
            continue;
        }
        let cells: Vec<&str> = line.iter().skip(choices_start_col).collect();
        let choices = clean_choices(&cells);
        debug!(
            "read_csv_ranking: lineno: {:?} row: {:?}",
            lineno, &choices
        );
        res.push(ParsedBallot {
            id: default_id(lineno),
            choices,
        });
    }
    Ok(res)
}
