//! Generic CSV to [`Table`] parser with encoding and delimiter auto-detection.
//!
//! Header rows become column labels: one header row gives flat labels, several
//! header rows (as written for pivoted tables) give hierarchical labels.
//! Cell types are inferred per column.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{Cell, Column, ColumnLabel, Table};

/// Spellings read as a missing value (case-insensitive).
static MISSING_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(|na|n/a|nan|-nan|null|none|<na>)$").expect("missing-value pattern is valid")
});

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<ColumnLabel>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => {
                log::warn!("Invalid UTF-8 ({}), decoding lossily", e);
                Ok(String::from_utf8_lossy(bytes).to_string())
            }
        },
        // Latin-1 labels map to windows-1252, a superset on printable bytes
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string())
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => {
                let (decoded, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    return Err(CsvError::Encoding(format!("malformed {} input", other)));
                }
                Ok(decoded.to_string())
            }
            // Fallback: try UTF-8 with lossy conversion
            None => Ok(String::from_utf8_lossy(bytes).to_string()),
        },
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into a table with explicit delimiter.
///
/// # Example
/// ```
/// use dashtable::{csv_to_table, Cell};
///
/// let csv = "name;age\nAlice;30\nBob;25";
/// let table = csv_to_table(csv, ';', 1).unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.columns()[1].cells[0], Cell::Int(30));
/// ```
pub fn csv_to_table(csv: &str, delimiter: char, header_rows: usize) -> CsvResult<Table> {
    parse_csv(csv.as_bytes(), delimiter, header_rows)
}

/// Parse CSV from a reader into a table.
///
/// The first `header_rows` records are headers (at least one). Missing
/// trailing values are read as missing; extra values are ignored.
pub fn parse_csv<R: Read>(reader: R, delimiter: char, header_rows: usize) -> CsvResult<Table> {
    let header_rows = header_rows.max(1);
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    if records.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    if records.len() < header_rows {
        return Err(CsvError::NoHeaders {
            expected: header_rows,
            found: records.len(),
        });
    }

    let data = records.split_off(header_rows);
    let headers = build_labels(&records);
    log::debug!(
        "Parsed {} columns x {} rows ({} header rows)",
        headers.len(),
        data.len(),
        header_rows
    );

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(j, label)| {
            let raw: Vec<&str> = data
                .iter()
                .map(|row| row.get(j).map(String::as_str).unwrap_or(""))
                .collect();
            Column::new(label, infer_cells(&raw))
        })
        .collect();

    Ok(Table::new(columns)?)
}

/// Parse CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("/path/to/gapminder.csv", 1)?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.table.n_rows());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P, header_rows: usize) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, header_rows)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8], header_rows: usize) -> CsvResult<ParseResult> {
    // Detect encoding
    let encoding = detect_encoding(bytes);

    // Decode content
    let content = decode_content(bytes, &encoding)?;

    // Detect delimiter
    let delimiter = detect_delimiter(&content);
    log::debug!("Detected encoding {} and delimiter {:?}", encoding, delimiter);

    // Parse with detected settings
    parse_string_with_metadata(&content, delimiter, encoding, header_rows)
}

/// Parse CSV string with explicit delimiter and return metadata.
pub fn parse_string_with_metadata(
    content: &str,
    delimiter: char,
    encoding: String,
    header_rows: usize,
) -> CsvResult<ParseResult> {
    let table = csv_to_table(content, delimiter, header_rows)?;
    let headers = table.columns().iter().map(|c| c.label.clone()).collect();

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse CSV file with explicit delimiter.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, delimiter: char, header_rows: usize) -> CsvResult<Table> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_csv(file, delimiter, header_rows)
}

fn delimiter_byte(delimiter: char) -> CsvResult<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CsvError::Encoding(format!("delimiter {:?} is not ASCII", delimiter)))
}

/// One label per column of the first header row. Several header rows give
/// hierarchical labels, one segment per header row.
fn build_labels(header_records: &[Vec<String>]) -> Vec<ColumnLabel> {
    let width = header_records.first().map(Vec::len).unwrap_or(0);

    (0..width)
        .map(|j| {
            let mut parts = header_records
                .iter()
                .map(|row| row.get(j).cloned().unwrap_or_default());
            if header_records.len() == 1 {
                ColumnLabel::Flat(parts.next().unwrap_or_default())
            } else {
                ColumnLabel::Hierarchical(parts.collect())
            }
        })
        .collect()
}

/// Infer one type for a whole column: integers, else floats, else text.
fn infer_cells(raw: &[&str]) -> Vec<Cell> {
    let present: Vec<&str> = raw.iter().copied().filter(|s| !is_missing(s)).collect();

    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        raw.iter()
            .map(|s| s.parse::<i64>().map(Cell::Int).unwrap_or(Cell::Null))
            .collect()
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        raw.iter()
            .map(|s| s.parse::<f64>().map(Cell::Float).unwrap_or(Cell::Null))
            .collect()
    } else {
        raw.iter()
            .map(|s| {
                if is_missing(s) {
                    Cell::Null
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect()
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_VALUE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let csv = "name;age\nAlice;30\nBob;25";
        let table = csv_to_table(csv, ';', 1).unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns()[0].label, ColumnLabel::from("name"));
        assert_eq!(table.columns()[0].cells[0], Cell::from("Alice"));
        assert_eq!(table.columns()[1].cells, vec![Cell::Int(30), Cell::Int(25)]);
    }

    #[test]
    fn test_type_inference() {
        let csv = "a,b,c,d\n1,1.5,x,\n2,NA,3,\n";
        let table = csv_to_table(csv, ',', 1).unwrap();
        let cols = table.columns();

        assert_eq!(cols[0].cells, vec![Cell::Int(1), Cell::Int(2)]);
        assert_eq!(cols[1].cells, vec![Cell::Float(1.5), Cell::Null]);
        assert_eq!(cols[2].cells, vec![Cell::from("x"), Cell::from("3")]);
        assert_eq!(cols[3].cells, vec![Cell::Null, Cell::Null]);
        assert!(cols[3].is_numeric());
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name;value\n\"Alice\";\"Hello; World\"";
        let table = csv_to_table(csv, ';', 1).unwrap();

        assert_eq!(table.columns()[0].cells[0], Cell::from("Alice"));
        assert_eq!(table.columns()[1].cells[0], Cell::from("Hello; World"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "a;b\n1;2\n\n3;4\n";
        let table = csv_to_table(csv, ';', 1).unwrap();

        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_missing_and_extra_values() {
        let csv = "a;b;c\n1;;3\n4;5;6;7";
        let table = csv_to_table(csv, ';', 1).unwrap();

        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.columns()[1].cells, vec![Cell::Null, Cell::Int(5)]);
        assert_eq!(table.columns()[2].cells, vec![Cell::Int(3), Cell::Int(6)]);
    }

    #[test]
    fn test_multi_row_header() {
        let csv = "continent,country,gdpPercap,gdpPercap\n,,1952,2007\nAsia,China,400.4,4959.1\n";
        let table = csv_to_table(csv, ',', 2).unwrap();

        assert_eq!(
            table.columns()[0].label,
            ColumnLabel::hierarchical(["continent", ""])
        );
        assert_eq!(
            table.columns()[3].label,
            ColumnLabel::hierarchical(["gdpPercap", "2007"])
        );
        assert_eq!(table.columns()[3].label.to_id("_"), "gdpPercap_2007");
        assert_eq!(table.n_rows(), 1);
    }

    #[test]
    fn test_empty_csv_error() {
        let result = csv_to_table("", ';', 1);
        assert!(matches!(result, Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_not_enough_header_rows() {
        let result = csv_to_table("a,b\n", ',', 2);
        assert!(matches!(result, Err(CsvError::NoHeaders { expected: 2, found: 1 })));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = csv_to_table("a,b\n", ',', 1).unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        let content = "a;b;c\n1;2;3";
        assert_eq!(detect_delimiter(content), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        let content = "a,b,c\n1,2,3";
        assert_eq!(detect_delimiter(content), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        let content = "a\tb\tc\n1\t2\t3";
        assert_eq!(detect_delimiter(content), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        let content = "a|b|c\n1|2|3";
        assert_eq!(detect_delimiter(content), '|');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "name;age\nAlice;30\nBob;25";
        let result = parse_bytes_auto(csv.as_bytes(), 1).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.table.n_rows(), 2);
        assert_eq!(
            result.headers,
            vec![ColumnLabel::from("name"), ColumnLabel::from("age")]
        );
    }

    #[test]
    fn test_auto_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "country,pop\nChad,10.2\nPeru,28.7\n").unwrap();

        let result = parse_csv_file_auto(file.path(), 1).unwrap();
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.table.columns()[1].cells[1], Cell::Float(28.7));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is the generic currency sign in Latin-1, not the euro sign
        let decoded = decode_content(&[0x31, 0xA4], "iso-8859-1").unwrap();
        assert_eq!(decoded, "1\u{a4}");
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let result = csv_to_table("a§b", '§', 1);
        assert!(matches!(result, Err(CsvError::Encoding(_))));
    }
}
