use std::path::Path;

use log::debug;

use super::model::{Series, SeriesKind, TrendData};
use crate::error::TrendsError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load all five series from `data_dir`, in drawing order.
///
/// The first unreadable or malformed file aborts the whole load.
pub fn load_all(data_dir: &Path) -> Result<TrendData, TrendsError> {
    let mut data = TrendData::default();
    for kind in SeriesKind::ALL {
        let series = load_series(&data_dir.join(kind.file_name()))?;
        debug!("loaded {kind}: {} points", series.len());
        *data.series_mut(kind) = series;
    }
    Ok(data)
}

/// Read one `"<year> <value>"` file.
pub fn load_series(path: &Path) -> Result<Series, TrendsError> {
    let bytes = std::fs::read(path).map_err(|source| TrendsError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = String::from_utf8(bytes).map_err(|e| encoding_error(&name, e))?;
    parse_series(&name, &text)
}

/// Report the line holding the first byte that is not UTF-8.
fn encoding_error(name: &str, e: std::string::FromUtf8Error) -> TrendsError {
    let lossy = normalize_newlines(&String::from_utf8_lossy(e.as_bytes()));
    let valid = String::from_utf8_lossy(&e.as_bytes()[..e.utf8_error().valid_up_to()]);
    let line = normalize_newlines(&valid).matches('\n').count() + 1;
    TrendsError::DataFormat {
        file: name.to_string(),
        line,
        content: lossy.lines().nth(line - 1).unwrap_or_default().to_string(),
        reason: format!("not valid UTF-8: {}", e.utf8_error()),
    }
}

// ---------------------------------------------------------------------------
// Line parser
// ---------------------------------------------------------------------------

/// Parse whitespace-separated `year value` lines.
///
/// Every line must hold exactly two floating-point tokens; a blank line has
/// zero tokens and is rejected like any other malformed line. Lines may end
/// in `\n`, `\r\n` or a lone `\r`, and a trailing line break does not
/// produce an extra line.
pub fn parse_series(name: &str, text: &str) -> Result<Series, TrendsError> {
    let mut series = Series::new();
    let text = normalize_newlines(text);

    for (idx, line) in text.lines().enumerate() {
        let format_error = |reason: String| TrendsError::DataFormat {
            file: name.to_string(),
            line: idx + 1,
            content: line.to_string(),
            reason,
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [year, value] = tokens.as_slice() else {
            return Err(format_error(format!(
                "expected 2 whitespace-separated values, found {}",
                tokens.len()
            )));
        };

        let year = parse_number(year).map_err(&format_error)?;
        let value = parse_number(value).map_err(&format_error)?;
        series.insert(year, value);
    }

    Ok(series)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn parse_number(token: &str) -> Result<f64, String> {
    token
        .parse::<f64>()
        .map_err(|e| format!("'{token}' is not a number: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_pairs_in_file_order() {
        let series = parse_series("cores.dat", "1971 1\n1978 2\n2006 2\n2020 64\n").unwrap();

        assert_eq!(
            series.points().collect::<Vec<_>>(),
            vec![(1971.0, 1.0), (1978.0, 2.0), (2006.0, 2.0), (2020.0, 64.0)]
        );
    }

    #[test]
    fn accepts_mixed_whitespace_and_scientific_notation() {
        let series = parse_series("transistors.dat", "1971.5\t2.3\n  2019   3.95e7  \r\n").unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(1971.5), Some(2.3));
        assert_eq!(series.get(2019.0), Some(3.95e7));
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let series = parse_series("cores.dat", "1971 1\r1978 2\r").unwrap();
        assert_eq!(
            series.points().collect::<Vec<_>>(),
            vec![(1971.0, 1.0), (1978.0, 2.0)]
        );

        let err = parse_series("cores.dat", "1971 1\r\r1978 2\r").unwrap_err();
        assert!(matches!(err, TrendsError::DataFormat { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn pair_count_matches_line_count() {
        let text: String = (0..50).map(|i| format!("{} {}\n", 1970 + i, i * 3)).collect();
        let series = parse_series("watts.dat", &text).unwrap();
        assert_eq!(series.len(), text.lines().count());
    }

    #[test]
    fn empty_file_gives_empty_series() {
        let series = parse_series("watts.dat", "").unwrap();
        assert!(series.is_empty());
    }

    #[rstest]
    #[case::blank("1971 1\n\n1978 2\n", 2)]
    #[case::single_token("1971\n", 1)]
    #[case::three_tokens("1971 1\n1978 2 3\n", 2)]
    #[case::non_numeric_year("nineteen 1\n", 1)]
    #[case::non_numeric_value("1971 1\n1978 two\n", 2)]
    fn rejects_malformed_lines(#[case] text: &str, #[case] bad_line: usize) {
        let err = parse_series("specint.dat", text).unwrap_err();
        match err {
            TrendsError::DataFormat { file, line, .. } => {
                assert_eq!(file, "specint.dat");
                assert_eq!(line, bad_line);
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specint.dat");

        match load_series(&path).unwrap_err() {
            TrendsError::MissingFile { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_bytes_are_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watts.dat");
        std::fs::write(&path, b"1971 0.8\n1978 \xff2\n").unwrap();

        match load_series(&path).unwrap_err() {
            TrendsError::DataFormat {
                file,
                line,
                content,
                reason,
            } => {
                assert_eq!(file, "watts.dat");
                assert_eq!(line, 2);
                assert!(content.starts_with("1978 "), "{content:?}");
                assert!(reason.contains("UTF-8"), "{reason}");
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn load_all_reads_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        for (i, kind) in SeriesKind::ALL.iter().enumerate() {
            let body = "2000 1\n".repeat(i) + "2001 5\n";
            std::fs::write(dir.path().join(kind.file_name()), body).unwrap();
        }

        let data = load_all(dir.path()).unwrap();
        assert_eq!(data.transistors.len(), 1);
        assert_eq!(data.cores.len(), 2);
        assert_eq!(data.cores.get(2001.0), Some(5.0));
    }
}
