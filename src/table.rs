//! Polars helpers shared by the CSV readers and table formatters.

use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;

/// Read CSV bytes with a header row, keeping every column as a string
///
/// Type inference is disabled so values such as counts of "X" or blank
/// species codes survive untouched.
pub fn read_string_csv(bytes: &[u8]) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Names of all columns in a frame
pub fn column_names(df: &DataFrame) -> HashSet<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Values of a string column, with blank cells read as `None`
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let values = df
        .column(name)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(values)
}

/// Values of an optional string column; `None` for every row when absent
pub fn optional_string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    if df.get_column_index(name).is_some() {
        string_values(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_csv_keeps_strings() {
        let df = read_string_csv(b"a,b\n1,X\n2,\n").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::String);

        let b = string_values(&df, "b").unwrap();
        assert_eq!(b, vec![Some("X".to_string()), None]);
    }

    #[test]
    fn test_optional_column_absent() {
        let df = read_string_csv(b"a\n1\n2\n").unwrap();
        let missing = optional_string_values(&df, "zzz").unwrap();
        assert_eq!(missing, vec![None, None]);
        assert!(column_names(&df).contains("a"));
    }
}
