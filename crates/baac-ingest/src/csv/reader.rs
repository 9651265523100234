//! Delimited-file reading into polars frames.

use std::path::Path;

use baac_common::{parse_f64, parse_i64};
use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::options::ReadOptions;

/// Check that the path names a readable, non-empty file.
fn check_source_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if !metadata.is_file() {
        return Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads one delimited file into a DataFrame.
///
/// Column dtypes come from polars inference, followed by a pass that turns
/// text columns holding only numbers into numeric columns. The published
/// files quote every field, and quoted fields are otherwise inferred as text.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    options.validate()?;
    check_source_file(path)?;

    let separator = options.separator;
    let decimal_comma = options.decimal_comma;
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .with_low_memory(options.low_memory)
        .map_parse_options(|parse| {
            parse
                .with_separator(separator)
                .with_decimal_comma(decimal_comma)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let retyped = retype_numeric_text(&mut df, decimal_comma)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        retyped,
        "read source file"
    );
    Ok(df)
}

/// Replace text columns whose values all parse as numbers.
///
/// Integer parsing is tried first, then decimals. Blank text becomes null.
/// Returns how many columns changed dtype.
fn retype_numeric_text(df: &mut DataFrame, decimal_comma: bool) -> Result<usize> {
    let mut replacements = Vec::new();
    for column in df.get_columns() {
        let Ok(values) = column.str() else {
            continue;
        };
        if values.null_count() == values.len() {
            continue;
        }

        let ints: Option<Vec<Option<i64>>> = values
            .into_iter()
            .map(|value| match value {
                None => Some(None),
                Some(text) if text.trim().is_empty() => Some(None),
                Some(text) => parse_i64(text).map(Some),
            })
            .collect();
        if let Some(ints) = ints {
            replacements.push(Column::new(column.name().clone(), ints));
            continue;
        }

        let floats: Option<Vec<Option<f64>>> = values
            .into_iter()
            .map(|value| match value {
                None => Some(None),
                Some(text) if text.trim().is_empty() => Some(None),
                Some(text) => parse_decimal(text, decimal_comma).map(Some),
            })
            .collect();
        if let Some(floats) = floats {
            replacements.push(Column::new(column.name().clone(), floats));
        }
    }

    let count = replacements.len();
    for column in replacements {
        df.with_column(column)?;
    }
    Ok(count)
}

fn parse_decimal(text: &str, decimal_comma: bool) -> Option<f64> {
    if decimal_comma {
        parse_f64(&text.replace(',', "."))
    } else {
        parse_f64(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_semicolon_file_with_decimal_comma() {
        let file = create_temp_csv("Num_Acc;lat;long\n100;48,5;2,25\n101;43,75;-1,5\n");
        let df = read_table(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("Num_Acc").unwrap().dtype(), &DataType::Int64);
        let lat = df.column("lat").unwrap().f64().unwrap();
        assert_eq!(lat.get(0), Some(48.5));
        assert_eq!(lat.get(1), Some(43.75));
    }

    #[test]
    fn test_quoted_numbers_become_numeric() {
        let file = create_temp_csv(
            "\"Num_Acc\";\"id_vehicule\";\"nbv\"\n\"100\";\"154 999\";\" -1\"\n\"101\";\"155 000\";\"2\"\n",
        );
        let df = read_table(file.path(), &ReadOptions::default()).unwrap();

        let num_acc = df.column("Num_Acc").unwrap().i64().unwrap();
        assert_eq!(num_acc.get(0), Some(100));
        let nbv = df.column("nbv").unwrap().i64().unwrap();
        assert_eq!(nbv.get(0), Some(-1));
        let vehicle = df.column("id_vehicule").unwrap().str().unwrap();
        assert_eq!(vehicle.get(0), Some("154 999"));
    }

    #[test]
    fn test_blank_quoted_cells_become_null() {
        let file = create_temp_csv("\"an_nais\";\"grav\"\n\"1990\";\"1\"\n\"\";\"4\"\n");
        let df = read_table(file.path(), &ReadOptions::default()).unwrap();

        let an_nais = df.column("an_nais").unwrap().i64().unwrap();
        assert_eq!(an_nais.get(0), Some(1990));
        assert_eq!(an_nais.get(1), None);
    }

    #[test]
    fn test_mixed_codes_stay_text() {
        let file = create_temp_csv("actp\n1\n3\nA\n -1\n");
        let df = read_table(file.path(), &ReadOptions::default()).unwrap();

        let actp = df.column("actp").unwrap().str().unwrap();
        assert_eq!(actp.get(2), Some("A"));
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_comma_separated_without_decimal_comma() {
        let file = create_temp_csv("place,grav\n1,2\n2,4\n");
        let options = ReadOptions::default()
            .with_separator(b',')
            .with_decimal_comma(false);
        let df = read_table(file.path(), &options).unwrap();

        assert_eq!(df.width(), 2);
        assert_eq!(df.column("grav").unwrap().i64().unwrap().get(1), Some(4));
    }

    #[test]
    fn test_missing_file() {
        let result = read_table(
            Path::new("/nonexistent/usagers-2022.csv"),
            &ReadOptions::default(),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_empty_file() {
        let file = create_temp_csv("");
        let result = read_table(file.path(), &ReadOptions::default());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(dir.path(), &ReadOptions::default());
        assert!(matches!(result, Err(IngestError::FileRead { .. })));
    }

    #[test]
    fn test_invalid_options_fail_before_reading() {
        let options = ReadOptions::default().with_separator(b',');
        let result = read_table(Path::new("/nonexistent.csv"), &options);
        assert!(matches!(result, Err(IngestError::InvalidOptions { .. })));
    }
}
