//! Reference Dataset - CSV loading
//!
//! The reference file is only used to derive normalization bounds. It is
//! read from disk on every request; nothing here is cached.
//!
//! Fields may be double-quoted, and a quoted field may contain commas or
//! `""` escapes. Records must not span lines.

use std::fs;
use std::path::Path;

use ndarray::Array2;

use super::PipelineError;

/// Cell contents read as a missing value
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Historical feature rows, restricted to the selected leading columns.
/// Missing cells are stored as NaN.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    pub rows: Array2<f64>,
}

impl ReferenceDataset {
    /// Read `path` and keep the first `columns` columns of every row
    pub fn load(path: &Path, columns: usize) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::DataAccess(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let dataset = Self::parse(&content, columns)?;
        tracing::debug!(
            "Loaded reference data from {} ({} rows x {} columns)",
            path.display(),
            dataset.rows.nrows(),
            dataset.rows.ncols()
        );
        Ok(dataset)
    }

    /// Parse CSV text: a header line followed by numeric rows.
    /// Rows shorter than the header are padded with missing values.
    pub fn parse(content: &str, columns: usize) -> Result<Self, PipelineError> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| PipelineError::DataAccess("Reference data is empty".to_string()))?;

        let available = split_record(header).len();
        if available < columns {
            return Err(PipelineError::DataAccess(format!(
                "Reference data has {} columns, expected at least {}",
                available, columns
            )));
        }

        let mut values = Vec::new();
        let mut row_count = 0;

        for (idx, line) in lines {
            let line_no = idx + 1;
            let fields = split_record(line);

            for col in 0..columns {
                let value = match fields.get(col) {
                    Some(field) => parse_field(field, line_no, col + 1)?,
                    None => f64::NAN,
                };
                values.push(value);
            }
            row_count += 1;
        }

        if row_count == 0 {
            return Err(PipelineError::DataAccess(
                "Reference data has no rows".to_string(),
            ));
        }

        let rows = Array2::from_shape_vec((row_count, columns), values)
            .map_err(|e| PipelineError::DataAccess(format!("Array error: {}", e)))?;

        Ok(Self { rows })
    }
}

/// Split one line on commas outside double quotes, unquoting as it goes
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_field(raw: &str, line: usize, column: usize) -> Result<f64, PipelineError> {
    let field = raw.trim();
    if MISSING_TOKENS.contains(&field) {
        return Ok(f64::NAN);
    }

    field.parse::<f64>().map_err(|_| {
        PipelineError::DataAccess(format!(
            "Could not convert '{}' to float (line {}, column {})",
            field, line, column
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selects_leading_columns() {
        let csv = "a,b,c\n1,2,3\n4,5,6\n";
        let data = ReferenceDataset::parse(csv, 2).unwrap();
        assert_eq!(data.rows.dim(), (2, 2));
        assert_eq!(data.rows[[1, 1]], 5.0);
    }

    #[test]
    fn test_parse_trims_quotes_and_whitespace() {
        let csv = "\"a\",\"b\"\n\" 1.5\", 2e1 \n";
        let data = ReferenceDataset::parse(csv, 2).unwrap();
        assert_eq!(data.rows[[0, 0]], 1.5);
        assert_eq!(data.rows[[0, 1]], 20.0);
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let data = ReferenceDataset::parse("a,b\n1,\n", 2).unwrap();
        assert!(data.rows[[0, 1]].is_nan());
    }

    #[test]
    fn test_skips_blank_lines() {
        let data = ReferenceDataset::parse("a\n\n1\n\n2\n", 1).unwrap();
        assert_eq!(data.rows.nrows(), 2);
    }

    #[test]
    fn test_reject_too_few_columns() {
        let err = ReferenceDataset::parse("a,b\n1,2\n", 3).unwrap_err();
        assert!(matches!(err, PipelineError::DataAccess(_)));
        assert!(err.to_string().contains("expected at least 3"));
    }

    #[test]
    fn test_short_row_is_padded_with_missing() {
        let data = ReferenceDataset::parse("a,b,c\n1,2,3\n4,5\n", 3).unwrap();
        assert_eq!(data.rows.dim(), (2, 3));
        assert_eq!(data.rows[[1, 1]], 5.0);
        assert!(data.rows[[1, 2]].is_nan());
    }

    #[test]
    fn test_missing_tokens_are_nan() {
        let csv = "a,b,c,d\n1,NA,null,N/A\n2,<NA>,#N/A,\"NULL\"\n";
        let data = ReferenceDataset::parse(csv, 4).unwrap();
        assert_eq!(data.rows[[0, 0]], 1.0);
        assert!(data.rows.row(0).iter().skip(1).all(|v| v.is_nan()));
        assert!(data.rows.row(1).iter().skip(1).all(|v| v.is_nan()));
    }

    #[test]
    fn test_quoted_comma_stays_in_one_field() {
        let csv = "\"x, first\",y\n\"1\",2\n";
        let data = ReferenceDataset::parse(csv, 2).unwrap();
        assert_eq!(data.rows[[0, 0]], 1.0);
        assert_eq!(data.rows[[0, 1]], 2.0);

        let err = ReferenceDataset::parse("\"a,b\"\n1\n", 2).unwrap_err();
        assert!(err.to_string().contains("has 1 columns"));
    }

    #[test]
    fn test_split_record_unescapes_quotes() {
        assert_eq!(split_record(r#"a,"b ""c"", d",e"#), vec!["a", "b \"c\", d", "e"]);
        assert_eq!(split_record("1,,3"), vec!["1", "", "3"]);
    }

    #[test]
    fn test_reject_non_numeric() {
        let err = ReferenceDataset::parse("a,b\n1,abc\n", 2).unwrap_err();
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_reject_header_only() {
        let err = ReferenceDataset::parse("a,b\n", 2).unwrap_err();
        assert!(matches!(err, PipelineError::DataAccess(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceDataset::load(&dir.path().join("nope.csv"), 2).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "x,y\n0,10\n1,20\n").unwrap();

        let data = ReferenceDataset::load(&path, 2).unwrap();
        assert_eq!(data.rows.dim(), (2, 2));
    }
}
