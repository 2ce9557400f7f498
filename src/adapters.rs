//! Format adapters turning raw exports into canonical transactions.
//!
//! Each supported source implements [`FormatAdapter`]. A malformed row is
//! reported in [`Adapted::rejected`] and skipped; only structural problems,
//! such as a missing column, fail the whole export.

mod ica;
mod swedbank;
mod ynab_tsv;

use csv::StringRecord;
use log::warn;
use std::fmt;

use crate::errors::*;
use crate::transaction::*;
use crate::types::*;

pub use ica::IcaAdapter;
pub use swedbank::SwedbankAdapter;
pub use ynab_tsv::YnabTsvAdapter;

pub trait FormatAdapter {
    /// Human readable name of the source, used in logs and reports.
    fn name(&self) -> &str;

    fn adapt(&self, text: &str) -> Result<Adapted>;
}

#[derive(Debug, Default)]
pub struct Adapted {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRow>,
    /// Account balance reported by the export, if it has one.
    pub balance: Option<Cents>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BankFormat {
    Swedbank,
    Ica,
}

impl BankFormat {
    pub fn from_name(name: &str) -> Result<BankFormat> {
        match name.trim().to_lowercase().as_str() {
            "swedbank" => Ok(BankFormat::Swedbank),
            "ica" | "ica banken" | "ica-banken" => Ok(BankFormat::Ica),
            _ => bail!("Unsupported bank format: {}", name),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BankFormat::Swedbank => "Swedbank",
            BankFormat::Ica => "ICA Banken",
        }
    }

    pub fn adapter(self) -> Box<dyn FormatAdapter> {
        match self {
            BankFormat::Swedbank => Box::new(SwedbankAdapter),
            BankFormat::Ica => Box::new(IcaAdapter),
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Adapted {
    pub(crate) fn reject(&mut self, source: &str, line: u64, err: &Error) {
        warn!("{}: skipping line {}: {}", source, line, err);
        self.rejected.push(RejectedRow {
            line,
            reason: err.to_string(),
        });
    }
}

fn csv_reader(text: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn headers(reader: &mut csv::Reader<&[u8]>, source: &str) -> Result<StringRecord> {
    reader
        .headers()
        .map(|headers| headers.clone())
        .chain_err(|| format!("Failed to read {} header row", source))
}

fn required_column(headers: &StringRecord, name: &str, source: &str) -> Result<usize> {
    optional_column(headers, name)
        .chain_err(|| format!("{} export is missing the {:?} column", source, name))
}

fn optional_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}
