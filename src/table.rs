use std::fmt::Display;
use std::io;
use std::num::ParseIntError;

use csv::StringRecord;
use thiserror::Error;

use super::read_to_string;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to read table: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to parse table: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {column} referenced, but the row only has {width} fields")]
    MissingField {
        line: u64,
        column: Column,
        width: usize,
    },
    #[error("line {line}: sequence number {value:?} is not an integer: {source}")]
    InvalidSequence {
        line: u64,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// Position of a field within a row.
///
/// NASR rows are addressed positionally. Most offsets count from the start of
/// the row, but some layouts refer to the trailing fields regardless of how wide
/// the row is, so `FromEnd(1)` is the last field, `FromEnd(3)` the third from
/// last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    At(usize),
    FromEnd(usize),
}

impl Column {
    fn resolve(self, width: usize) -> Option<usize> {
        match self {
            Column::At(index) => (index < width).then_some(index),
            Column::FromEnd(0) => None,
            Column::FromEnd(offset) => width.checked_sub(offset),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::At(index) => write!(f, "column {}", index + 1),
            Column::FromEnd(1) => write!(f, "last column"),
            Column::FromEnd(offset) => write!(f, "column {offset} from the end"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Row {
    pub line: u64,
    record: StringRecord,
}

impl Row {
    pub fn new(line: u64, record: StringRecord) -> Self {
        Self { line, record }
    }

    pub fn width(&self) -> usize {
        self.record.len()
    }

    pub fn field(&self, column: Column) -> TableResult<&str> {
        column
            .resolve(self.record.len())
            .and_then(|index| self.record.get(index))
            .ok_or(TableError::MissingField {
                line: self.line,
                column,
                width: self.record.len(),
            })
    }

    pub fn sequence(&self, column: Column) -> TableResult<i64> {
        let value = self.field(column)?;
        value
            .trim()
            .parse()
            .map_err(|source| TableError::InvalidSequence {
                line: self.line,
                value: value.to_string(),
                source,
            })
    }
}

/// Reads a comma separated NASR table. The first line is the header and is
/// skipped, rows are allowed to differ in width.
pub fn read_rows(content: &[u8]) -> TableResult<Vec<Row>> {
    let unparsed_file = read_to_string(content)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(unparsed_file.as_bytes());

    reader
        .records()
        .map(|record| -> TableResult<Row> {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            Ok(Row::new(line, record))
        })
        .collect()
}
