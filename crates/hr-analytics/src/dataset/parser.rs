use csv::ByteRecord;

/// Header row plus data rows, every cell as text.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_csv(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let delimiter = sniff_delimiter(bytes);
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = decode_record(csv_reader.byte_headers()?);
    let mut rows = Vec::new();
    let mut record = ByteRecord::new();

    while csv_reader.read_byte_record(&mut record)? {
        // A whitespace-only line is not a row; `,,,` is a row of empty cells.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(decode_record(&record));
    }

    Ok(RawTable { headers, rows })
}

/// Picks `;`, tab or `,` by counting them on the header line. Spreadsheet
/// exports in Spanish locales default to semicolons.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header_line = bytes
        .split(|byte| *byte == b'\n')
        .next()
        .unwrap_or_default();

    [b',', b';', b'\t']
        .into_iter()
        .map(|candidate| {
            let hits = header_line.iter().filter(|byte| **byte == candidate).count();
            (candidate, hits)
        })
        .max_by_key(|(candidate, hits)| (*hits, *candidate == b','))
        .filter(|(_, hits)| *hits > 0)
        .map(|(candidate, _)| candidate)
        .unwrap_or(b',')
}

fn decode_record(record: &ByteRecord) -> Vec<String> {
    record.iter().map(decode_field).collect()
}

/// UTF-8 when valid, Latin-1 otherwise. Legacy payroll exports are Latin-1.
fn decode_field(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|byte| char::from(*byte)).collect(),
    };
    text.trim_start_matches('\u{feff}').to_string()
}

/// Reads a numeric cell the way payroll exports write them: currency
/// symbols, spaces and thousands groups allowed, comma or dot decimals.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ' ' | '\u{a0}' | '%'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    let normalized = match (last_dot, last_comma) {
        (None, None) => cleaned,
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(dot), None)
            if cleaned.matches('.').count() == 1 && !is_thousands_group(&cleaned, dot) =>
        {
            cleaned
        }
        (Some(_), None) => cleaned.replace('.', ""),
        (None, Some(_)) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (None, Some(_)) => cleaned.replace(',', ""),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// `850.000` is a Chilean-formatted amount, `0.125` is not.
fn is_thousands_group(value: &str, separator: usize) -> bool {
    let integer = value[..separator].trim_start_matches('-');
    let fraction = &value[separator + 1..];
    fraction.len() == 3
        && fraction.bytes().all(|byte| byte.is_ascii_digit())
        && !integer.is_empty()
        && integer != "0"
}
