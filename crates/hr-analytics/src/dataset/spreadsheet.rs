use super::parser::RawTable;
use super::period::excel_serial_to_date;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx, XlsxError};
use std::io::Cursor;

#[derive(Debug)]
pub(crate) enum SheetError {
    Workbook(XlsxError),
    NoWorksheet,
}

/// Reads the first worksheet; the first row is the header.
pub(crate) fn parse_xlsx(bytes: Vec<u8>) -> Result<RawTable, SheetError> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(SheetError::Workbook)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(SheetError::Workbook)?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            text.trim().to_string()
        }
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_float(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => excel_serial_to_date(value.as_f64())
            .map(|date| date.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Integral floats print without a fraction so `3.0` days reads as `3`.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
