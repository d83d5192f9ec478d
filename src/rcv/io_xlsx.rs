// Primitives for reading Excel spreadsheets.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::rcv::{
    io_common::{clean_choices, make_default_id},
    *,
};

pub fn read_excel_file(path: &str, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let wrange = get_range(path, cfs)?;
    read_range(&wrange, path, cfs)
}

fn read_range(
    wrange: &calamine::Range<DataType>,
    path: &str,
    cfs: &FileSource,
) -> RcvResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);
    let start_range = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;
    debug!(
        "read_excel_file: start column: {:?} start row: {:?}",
        start_range, first_row
    );

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        let mut cells: Vec<String> = Vec::new();
        for elt in row.iter().skip(start_range) {
            cells.push(read_choice_calamine(elt, lineno)?);
        }
        let choices = clean_choices(&cells);
        debug!("read_excel_file: lineno: {:?} row: {:?}", lineno, &choices);
        res.push(ParsedBallot {
            id: default_id(lineno),
            choices,
        });
    }
    Ok(res)
}

fn read_choice_calamine(cell: &DataType, lineno: usize) -> RcvResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        // Some candidates are numbered.
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> RcvResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it. Otherwise, use the first one.
    let wrange_o = match worksheet_name_o {
        Some(worksheet_name) => workbook.worksheet_range(&worksheet_name),
        None => workbook.worksheet_range_at(0),
    };
    let wrange = wrange_o
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}
