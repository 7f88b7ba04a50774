//! Utilities for working with CSV files.

use std::fs::File;
use std::io;
use std::io::Read;
use std::ops::Index;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

/// Reads rows from a header-named CSV source. Rows may be shorter than the header; the missing trailing
/// cells read as empty.
pub struct CsvReader<R = File> {
    reader: csv::Reader<R>,
}
impl CsvReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);
        Self { reader }
    }

    /// Position of the column named `header`, if present. The header row is read on first use.
    pub fn position(&mut self, header: &str) -> Result<Option<usize>, csv::Error> {
        Ok(self
            .reader
            .headers()?
            .iter()
            .position(|candidate| candidate == header))
    }

    pub fn read(&mut self) -> Option<Result<StringRecord, csv::Error>> {
        let mut row = StringRecord::new();
        match self.reader.read_record(&mut row) {
            Ok(true) => Some(Ok(row)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<StringRecord, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// A row narrowed down to a fixed set of columns, addressable by any type that converts into the
/// column's ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    items: Vec<String>,
}
impl Record {
    /// Picks the cells at `positions` out of `row`, in the order given.
    pub fn project(row: &StringRecord, positions: &[usize]) -> Self {
        let items = positions
            .iter()
            .map(|&position| row.get(position).unwrap_or_default().to_string())
            .collect();
        Self { items }
    }
}

impl<I: Into<usize>> Index<I> for Record {
    type Output = str;

    fn index(&self, index: I) -> &Self::Output {
        &self.items[index.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "a, b ,c\n1,\"x, y\",3\n4,5\n";

    #[test]
    fn headers_trimmed_and_located() {
        let mut reader = CsvReader::from_reader(SAMPLE.as_bytes());
        assert_eq!(Some(1), reader.position("b").unwrap());
        assert_eq!(Some(2), reader.position("c").unwrap());
        assert_eq!(None, reader.position("d").unwrap());
    }

    #[test]
    fn project_reorders_and_pads_short_rows() {
        let mut reader = CsvReader::from_reader(SAMPLE.as_bytes());
        reader.position("a").unwrap();
        let rows: Vec<_> = reader.map(Result::unwrap).collect();
        assert_eq!(2, rows.len());

        let first = Record::project(&rows[0], &[2, 1]);
        assert_eq!("3", &first[0usize]);
        assert_eq!("x, y", &first[1usize]);

        let second = Record::project(&rows[1], &[0, 2]);
        assert_eq!("4", &second[0usize]);
        assert_eq!("", &second[1usize]);
    }

    #[test]
    fn rows_skip_header_without_lookup() {
        let reader = CsvReader::from_reader(SAMPLE.as_bytes());
        let rows: Vec<_> = reader.map(Result::unwrap).collect();
        assert_eq!(2, rows.len());
        assert_eq!(Some("1"), rows[0].get(0));
    }

    #[test]
    fn undecodable_header() {
        let mut reader = CsvReader::from_reader(&b"a,\xff\n1,2\n"[..]);
        assert!(reader.position("a").is_err());
    }
}
