//! Vehicle inventory loaded from a tabular source.
//!
//! The inventory is a CSV file with a header row. Columns are whatever the
//! file defines; nothing here knows about makes, models or prices. Rows are
//! kept as opaque named fields and rendered back to an aligned text table
//! for the persona prompt.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, ErrorKind};

/// The text used in place of the inventory table when no data could be
/// loaded.
pub const NO_INVENTORY: &str = "No car data available";

const INVENTORY_HEADING: &str = "Available car data:";
const COLUMN_GAP: &str = "  ";

/// One row of the inventory, as named fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryRecord {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl InventoryRecord {
    /// Returns the value of `column` in this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Iterates `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Table {
    columns: Arc<[String]>,
    records: Vec<InventoryRecord>,
}

impl Table {
    fn render(&self) -> String {
        let mut widths: Vec<usize> =
            self.columns.iter().map(|c| c.chars().count()).collect();
        for record in &self.records {
            for (width, value) in widths.iter_mut().zip(&record.values) {
                *width = (*width).max(value.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(render_row(&self.columns, &widths));
        for record in &self.records {
            lines.push(render_row(&record.values, &widths));
        }
        lines.join("\n")
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

/// The vehicles the agent is allowed to talk about.
///
/// An inventory is either loaded from a table, or unavailable. The
/// unavailable state still renders, as [`NO_INVENTORY`], so callers never
/// need to special-case it when building prompts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    table: Option<Table>,
}

impl Inventory {
    /// Creates an inventory that has no data.
    #[inline]
    pub fn unavailable() -> Self {
        Self { table: None }
    }

    /// Loads the inventory from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path.as_ref()).map_err(|err| {
            Error::new(ErrorKind::InventoryUnreadable)
                .with_reason(format!("{}: {err}", path.as_ref().display()))
        })?;
        Self::from_reader(file)
    }

    /// Loads the inventory, falling back to an unavailable inventory if the
    /// source cannot be read or parsed.
    pub fn load_or_unavailable<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(inventory) => {
                info!(
                    "loaded {} inventory rows from {}",
                    inventory.len(),
                    path.as_ref().display()
                );
                inventory
            }
            Err(err) => {
                warn!("continuing without inventory: {err}");
                Self::unavailable()
            }
        }
    }

    /// Reads the inventory from CSV data with a header row.
    ///
    /// Rows shorter than the header are padded with empty cells. Rows longer
    /// than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns: Arc<[String]> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_owned)
            .collect();
        if columns.is_empty() {
            return Err(Error::new(ErrorKind::InventoryMalformed)
                .with_reason("missing header row"));
        }

        let mut records = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            if record.len() > columns.len() {
                return Err(Error::new(ErrorKind::InventoryMalformed)
                    .with_reason(format!(
                        "row {} has {} fields, but the header has {}",
                        idx + 1,
                        record.len(),
                        columns.len()
                    )));
            }

            let mut values: Vec<String> =
                record.iter().map(str::to_owned).collect();
            values.resize(columns.len(), String::new());
            records.push(InventoryRecord {
                columns: Arc::clone(&columns),
                values,
            });
        }

        Ok(Self {
            table: Some(Table { columns, records }),
        })
    }

    /// Returns `true` if the inventory was loaded from a source.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.table.is_some()
    }

    /// Returns the column names, empty if unavailable.
    #[inline]
    pub fn columns(&self) -> &[String] {
        match &self.table {
            Some(table) => &table.columns[..],
            None => &[],
        }
    }

    /// Returns the rows, empty if unavailable.
    #[inline]
    pub fn records(&self) -> &[InventoryRecord] {
        match &self.table {
            Some(table) => &table.records[..],
            None => &[],
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Returns `true` if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Renders the inventory as a plain-text block for prompts.
    pub fn render(&self) -> String {
        let Some(table) = &self.table else {
            return NO_INVENTORY.to_owned();
        };
        format!("{INVENTORY_HEADING}\n{}", table.render())
    }
}

fn csv_error(err: csv::Error) -> Error {
    let kind = if err.is_io_error() {
        ErrorKind::InventoryUnreadable
    } else {
        ErrorKind::InventoryMalformed
    };
    Error::new(kind).with_reason(err.to_string())
}
