//! CSV reader with encoding and delimiter auto-detection.
//!
//! Turns CSV rows into [`Record`]s keyed by the lower-cased header names.
//! Nothing NUDS-specific happens here.

use std::borrow::Cow;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{CsvError, CsvResult};
use crate::models::Record;

/// Delimiters tried by [`detect_delimiter`], in order of preference.
pub const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows, header excluded
    pub records: Vec<Record>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers as written in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_some() => other.to_string(),
        other => {
            debug!(charset = other, "no decoder for detected charset, using UTF-8");
            "utf-8".to_string()
        }
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Fails with [`CsvError::EncodingError`] on a label with no decoder.
/// Undecodable sequences become U+FFFD with a warning rather than failing
/// the whole file.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let codec = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| CsvError::EncodingError(encoding.to_string()))?;

    let (content, used, had_errors) = codec.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "input contains undecodable bytes");
    }
    Ok(strip_bom(content).into_owned())
}

fn strip_bom(content: Cow<'_, str>) -> Cow<'_, str> {
    match content.strip_prefix('\u{feff}') {
        Some(rest) => Cow::Owned(rest.to_string()),
        None => content,
    }
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Ties go to the earlier entry of [`DELIMITERS`]; a line with none of
/// them is read as a single comma-separated column.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// # Example
/// ```
/// use csv_nuds::parser::parse_str;
///
/// let result = parse_str("ID;Metal\n264199;AR\n", ';').unwrap();
/// assert_eq!(result.records.len(), 1);
/// assert_eq!(result.records[0].get("metal"), Some("AR"));
/// ```
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<ParseResult> {
    parse_with_metadata(content, delimiter, "utf-8".to_string())
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    parse_csv_file(path, None)
}

/// Parse a CSV file, auto-detecting the delimiter unless one is given.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, delimiter)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    parse_bytes(bytes, None)
}

fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    debug!(%encoding, ?delimiter, "parsing CSV");
    parse_with_metadata(&content, delimiter, encoding)
}

fn parse_with_metadata(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let separator = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CsvError::ParseError {
            line: 0,
            message: format!("delimiter {delimiter:?} is not a single ASCII character"),
        })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        // Short rows leave trailing columns absent; extra cells are dropped.
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter(|(name, _)| !name.is_empty())
            .collect();

        // A row of separators only
        if record.is_empty() {
            continue;
        }
        records.push(record);
    }

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Read the shared defaults row: the first data row of a CSV file.
pub fn read_defaults<P: AsRef<Path>>(path: P) -> CsvResult<Record> {
    parse_csv_file_auto(path)?
        .records
        .into_iter()
        .next()
        .ok_or(CsvError::NoDefaultsRow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_simple_csv() {
        let result = parse_str("name;age\nAlice;30\nBob;25", ';').unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].get("name"), Some("Alice"));
        assert_eq!(result.records[0].get("age"), Some("30"));
        assert_eq!(result.records[1].get("name"), Some("Bob"));
        assert_eq!(result.records[1].get("age"), Some("25"));
    }

    #[test]
    fn test_headers_are_case_folded() {
        let result = parse_str("ID,Title\n1,Drachm", ',').unwrap();

        assert_eq!(result.headers, vec!["ID", "Title"]);
        let names: Vec<_> = result.records[0].iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["id", "title"]);
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "title,details\n\"Kaykhusru II, dirham\",\"Line one\nline two\"\n";
        let result = parse_str(csv, ',').unwrap();

        assert_eq!(result.records[0].get("title"), Some("Kaykhusru II, dirham"));
        assert_eq!(result.records[0].get("details"), Some("Line one\nline two"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let result = parse_str("a;b\n1;2\n\n3;4\n", ';').unwrap();
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_missing_values_are_absent() {
        let result = parse_str("a;b;c\n1;;3", ';').unwrap();
        let record = &result.records[0];

        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), None);
        assert_eq!(record.get("c"), Some("3"));
    }

    #[test]
    fn test_short_and_long_rows() {
        let result = parse_str("a;b;c\n1;2\n1;2;3;4", ';').unwrap();

        assert_eq!(result.records[0].len(), 2);
        assert_eq!(result.records[1].len(), 3);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let result = parse_str("a,b\n x ,y", ',').unwrap();
        assert_eq!(result.records[0].get("a"), Some(" x "));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ';'), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_str("\n \n", ';'), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_blank_headers_error() {
        assert!(matches!(parse_str(";;\n1;2;3", ';'), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let err = parse_str("a§b\n1§2", '§').unwrap_err();
        assert!(err.to_string().contains("ASCII"));
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_detect_delimiter_single_column() {
        assert_eq!(detect_delimiter("id\n1"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name;age\nAlice;30\nBob;25").unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["name", "age"]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let result = parse_bytes_auto(b"\xEF\xBB\xBFID,Metal\n1,AR").unwrap();

        assert_eq!(result.headers[0], "ID");
        assert_eq!(result.records[0].get("id"), Some("1"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = decode_content(b"id\n1\n", "x-bogus").unwrap_err();
        assert!(matches!(err, CsvError::EncodingError(ref label) if label == "x-bogus"));
        assert_eq!(err.to_string(), "Failed to decode content as x-bogus");
    }

    #[test]
    fn test_detected_encoding_is_decodable() {
        let encoding = detect_encoding("ID,Title\n1,Société\n".as_bytes());
        assert!(decode_content(b"", &encoding).is_ok());
    }

    #[test]
    fn test_read_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Source,RightsURL").unwrap();
        writeln!(file, "Zeno.ru,https://rightsstatements.org/page/CNE/1.0/").unwrap();
        writeln!(file, "ignored,ignored").unwrap();

        let defaults = read_defaults(file.path()).unwrap();
        assert_eq!(defaults.get("source"), Some("Zeno.ru"));
        assert_eq!(defaults.len(), 2);
    }

    #[test]
    fn test_read_defaults_without_row() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Source,RightsURL").unwrap();

        assert!(matches!(
            read_defaults(file.path()),
            Err(CsvError::NoDefaultsRow)
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_csv_file_auto("/nonexistent/input.csv"),
            Err(CsvError::IoError(_))
        ));
    }
}
