//! Visitor record loading from delimited text.
//!
//! Rows map to [`Visitor`]s by fixed positional index; there is no
//! schema, no field validation, and no header detection. Inputs that
//! do carry a header row surface it as the first visitor unless
//! [`VisitorLoader::with_skip_header_row`] is set.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::error::Result;
use crate::types::Visitor;

/// Loader for delimited visitor records.
#[derive(Debug, Clone)]
pub struct VisitorLoader {
    /// Single-byte field delimiter.
    delimiter: u8,

    /// Treat row 0 as a header and skip it.
    skip_header_row: bool,
}

impl Default for VisitorLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_header_row: false,
        }
    }
}

impl VisitorLoader {
    /// Create a loader with the default comma delimiter and no header
    /// skipping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different single-byte field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat the first row as a header and skip it.
    ///
    /// Off by default: the expected inputs carry no header row, and a
    /// header row in such a file is data like any other.
    pub fn with_skip_header_row(mut self, skip: bool) -> Self {
        self.skip_header_row = skip;
        self
    }

    /// Load all visitor records from a reader, in input order.
    ///
    /// Rows may be ragged; missing trailing fields become absent
    /// values on the visitor. Any CSV error aborts the whole load.
    pub fn load<R: Read>(&self, reader: R) -> Result<Vec<Visitor>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(self.skip_header_row)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut visitors = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            visitors.push(visitor_from_record(&record));
        }

        log::debug!("loaded {} visitor records", visitors.len());

        Ok(visitors)
    }
}

/// Map one row to a visitor by fixed positional index.
///
/// An explicitly empty optional column (e.g. `name,title,,`) still
/// counts as present; only a row too short to reach the column yields
/// an absent value.
fn visitor_from_record(record: &StringRecord) -> Visitor {
    Visitor {
        name: record.get(0).unwrap_or_default().to_string(),
        title: record.get(1).unwrap_or_default().to_string(),
        graduate: record.get(2).map(str::to_string),
        hometown: record.get(3).map(str::to_string),
    }
}
