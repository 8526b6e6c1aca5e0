//! Delimited-text tables read as strings
//!
//! Reads column subsets of comma, semicolon or whitespace separated files,
//! with leading header lines, comment lines and short rows handled by
//! [`SreadOptions`]. Fields stay strings; [`Table::to_array`] converts to
//! numbers when needed.

use crate::errors::{HydroError, Result};
use ndarray::Array2;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Which columns to read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Columns {
    /// Every column after the skipped ones
    #[default]
    All,
    /// This many columns after the skipped ones; `Count(0)` reads all
    Count(usize),
    /// Exactly these column indices, in this order
    Indices(Vec<usize>),
}

/// Options for [`read_table`] and [`read_header`]
#[derive(Debug, Clone, Default)]
pub struct SreadOptions {
    pub columns: Columns,
    /// Lines at the top of the file treated as header
    pub skip: usize,
    /// Leading columns ignored with [`Columns::All`] and [`Columns::Count`]
    pub cskip: usize,
    /// Field separator; detected from the first data line if `None`
    pub separator: Option<String>,
    /// Skip blank lines instead of stopping at the first one
    pub skip_blank: bool,
    /// Lines starting with any of these characters are ignored
    pub comment: Option<String>,
    /// Value for columns missing from short rows
    pub fill: Option<String>,
    /// Characters trimmed from both ends of every field
    pub strip: Option<String>,
    /// Return header lines unsplit
    pub full_header: bool,
    /// Do not log recoverable problems
    pub quiet: bool,
}

/// Rows of string fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns of the first row
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Column `index` across all rows, `None` if any row is too short.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<Vec<String>> {
        self.rows.iter().map(|row| row.get(index).cloned()).collect()
    }

    /// Rows become columns.
    #[must_use]
    pub fn transpose(&self) -> Table {
        let rows = (0..self.ncols())
            .map(|c| {
                self.rows
                    .iter()
                    .map(|row| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Table { rows }
    }

    /// Flattens a single-row or single-column table.
    #[must_use]
    pub fn squeeze(&self) -> Option<Vec<String>> {
        match (self.len(), self.ncols()) {
            (1, _) => self.rows.first().cloned(),
            (_, 1) => self.column(0),
            _ => None,
        }
    }

    /// Parses every field as `f64`; empty fields become `undef`.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::ValueParse`] for non-numeric fields and
    /// [`HydroError::ArrayError`] for ragged rows.
    pub fn to_array(&self, undef: f64) -> Result<Array2<f64>> {
        let ncols = self.ncols();
        let mut values = Vec::with_capacity(self.len() * ncols);
        for (row, fields) in self.rows.iter().enumerate() {
            for (column, field) in fields.iter().enumerate() {
                let field = field.trim();
                let value = if field.is_empty() {
                    undef
                } else {
                    field.parse::<f64>().map_err(|_| HydroError::ValueParse {
                        row,
                        column,
                        value: field.to_string(),
                    })?
                };
                values.push(value);
            }
        }
        Ok(Array2::from_shape_vec((self.len(), ncols), values)?)
    }
}

/// Field separator in effect for one file
#[derive(Debug, Clone, PartialEq, Eq)]
enum Separator {
    Literal(String),
    Whitespace,
}

impl Separator {
    fn detect(line: &str) -> Self {
        [",", ";"]
            .into_iter()
            .find(|sep| line.contains(sep))
            .map_or(Self::Whitespace, |sep| Self::Literal(sep.to_string()))
    }

    fn split<'l>(&self, line: &'l str) -> Vec<&'l str> {
        match self {
            Self::Literal(sep) => line.split(sep.as_str()).collect(),
            Self::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// Line number (1-based) and content
type Line<'c> = (usize, &'c str);

struct Layout<'c> {
    header: Vec<Line<'c>>,
    data: Vec<Line<'c>>,
    separator: Separator,
    indices: Vec<usize>,
}

fn is_comment(line: &str, comment: Option<&str>) -> bool {
    match (line.chars().next(), comment) {
        (Some(first), Some(chars)) => chars.contains(first),
        _ => false,
    }
}

fn layout<'c>(content: &'c str, path: &Path, options: &SreadOptions) -> Result<Layout<'c>> {
    let mut lines = content.lines().map(str::trim_end).enumerate().map(|(i, l)| (i + 1, l));

    let header: Vec<Line<'c>> = lines.by_ref().take(options.skip).collect();

    let mut data = Vec::new();
    for (number, line) in lines {
        if line.is_empty() {
            if options.skip_blank {
                continue;
            }
            break;
        }
        if is_comment(line, options.comment.as_deref()) {
            continue;
        }
        data.push((number, line));
    }

    let Some(&(_, first)) = data.first() else {
        if !options.quiet {
            warn!("Empty file {}", path.display());
        }
        return Err(HydroError::EmptyFile {
            path: path.to_path_buf(),
        });
    };

    let separator = options
        .separator
        .clone()
        .map_or_else(|| Separator::detect(first), Separator::Literal);
    let first_width = separator.split(first).len();

    let indices = match &options.columns {
        Columns::All | Columns::Count(0) => (options.cskip..first_width.max(options.cskip)).collect(),
        Columns::Count(n) => (options.cskip..options.cskip + n).collect(),
        Columns::Indices(indices) => indices.clone(),
    };
    debug!(
        "Reading {} data lines from {} with separator {separator:?}, columns {indices:?}",
        data.len(),
        path.display()
    );

    Ok(Layout {
        header,
        data,
        separator,
        indices,
    })
}

fn select_fields(
    (number, line): Line<'_>,
    layout: &Layout<'_>,
    options: &SreadOptions,
) -> Result<Vec<String>> {
    let fields = layout.separator.split(line);
    let strip = |field: &str| match &options.strip {
        Some(chars) => field.trim_matches(|c: char| chars.contains(c)).to_string(),
        None => field.to_string(),
    };

    let needed = layout.indices.iter().max().map_or(0, |&m| m + 1);
    if needed > fields.len() {
        let Some(fill) = &options.fill else {
            if !options.quiet {
                warn!("Line {number} has not enough columns to be indexed: {line}");
            }
            return Err(HydroError::ShortRow {
                line: number,
                needed,
                found: fields.len(),
            });
        };
        if !options.quiet {
            warn!("Filling short line {number} with '{fill}'");
        }
        return Ok(layout
            .indices
            .iter()
            .map(|&i| fields.get(i).map_or_else(|| fill.clone(), |f| strip(f)))
            .collect());
    }

    Ok(layout.indices.iter().map(|&i| strip(fields[i])).collect())
}

/// Reads the data lines of a delimited text file.
///
/// # Errors
///
/// Returns [`HydroError::IoError`] if the file cannot be read,
/// [`HydroError::EmptyFile`] if there are no data lines, and
/// [`HydroError::ShortRow`] for a short row when no fill value is set.
pub fn read_table<P: AsRef<Path>>(path: P, options: &SreadOptions) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let layout = layout(&content, path, options)?;

    let rows = layout
        .data
        .iter()
        .map(|&line| select_fields(line, &layout, options))
        .collect::<Result<Vec<_>>>()?;
    Ok(Table { rows })
}

/// Reads the `skip` header lines of a delimited text file.
///
/// Header lines are split and column-selected like data lines, unless
/// [`SreadOptions::full_header`] is set, in which case each raw line is
/// one single-field row.
///
/// # Errors
///
/// Same conditions as [`read_table`], applied to the header lines.
pub fn read_header<P: AsRef<Path>>(path: P, options: &SreadOptions) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let layout = layout(&content, path, options)?;

    let rows = if options.full_header {
        layout
            .header
            .iter()
            .map(|&(_, line)| vec![line.to_string()])
            .collect()
    } else {
        layout
            .header
            .iter()
            .map(|&line| select_fields(line, &layout, options))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_separators() {
        assert_eq!(Separator::detect("a,b;c"), Separator::Literal(",".into()));
        assert_eq!(Separator::detect("a;b"), Separator::Literal(";".into()));
        assert_eq!(Separator::detect("a  b\tc"), Separator::Whitespace);
        assert_eq!(Separator::Whitespace.split(" a  b "), vec!["a", "b"]);
    }

    #[test]
    fn comment_detection_uses_first_character() {
        assert!(is_comment("# note", Some("#!")));
        assert!(is_comment("!x", Some("#!")));
        assert!(!is_comment(" # note", Some("#")));
        assert!(!is_comment("# note", None));
    }

    #[test]
    fn table_shapes() {
        let table = Table {
            rows: vec![
                vec!["1".into(), "2".into()],
                vec!["3".into(), "4".into()],
            ],
        };
        assert_eq!(table.transpose().rows, vec![vec!["1", "3"], vec!["2", "4"]]);
        assert_eq!(table.column(1), Some(vec!["2".to_string(), "4".to_string()]));
        assert_eq!(table.squeeze(), None);

        let single = Table {
            rows: vec![vec!["1".into()], vec!["3".into()]],
        };
        assert_eq!(single.squeeze(), Some(vec!["1".to_string(), "3".to_string()]));
    }

    #[test]
    fn to_array_uses_undef_for_empty_fields() {
        let table = Table {
            rows: vec![vec!["1.5".into(), "".into()], vec![" 2 ".into(), "-9999".into()]],
        };
        let values = table.to_array(-9999.0).unwrap();
        assert_eq!(values, ndarray::arr2(&[[1.5, -9999.0], [2.0, -9999.0]]));

        let bad = Table {
            rows: vec![vec!["x".into()]],
        };
        assert!(matches!(
            bad.to_array(0.0),
            Err(HydroError::ValueParse { row: 0, column: 0, .. })
        ));
    }
}
