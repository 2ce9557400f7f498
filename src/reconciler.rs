use chrono::NaiveDate;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::*;
use crate::errors::*;
use crate::ledger::*;
use crate::matcher;
use crate::report::*;
use crate::transaction::*;
use crate::types::*;
use crate::utilities::*;

/// One YNAB account compared against one bank export.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comparison {
    pub format: BankFormat,
    pub account: String,
    pub path: PathBuf,
}

pub struct Reconciler<'a> {
    ledger: &'a Ledger,
    formatter: &'a ReportFormatter,
    filter_date: NaiveDate,
}

impl Comparison {
    /// Parses `FORMAT:ACCOUNT:PATH`, e.g. `swedbank:Checking:data/swedbank.csv`.
    pub fn parse(value: &str) -> Result<Comparison> {
        let mut parts = value.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(format), Some(account), Some(path))
                if !account.trim().is_empty() && !path.trim().is_empty() =>
            {
                Ok(Comparison {
                    format: BankFormat::from_name(format)?,
                    account: account.trim().to_string(),
                    path: PathBuf::from(path.trim()),
                })
            }
            _ => bail!(
                "Invalid comparison (expected FORMAT:ACCOUNT:PATH): {}",
                value
            ),
        }
    }

    pub fn new<S: Into<String>>(format: BankFormat, account: S, path: &Path) -> Comparison {
        Comparison {
            format,
            account: account.into(),
            path: path.to_path_buf(),
        }
    }
}

impl<'a> Reconciler<'a> {
    pub fn run(
        ledger: &'a Ledger,
        formatter: &'a ReportFormatter,
        filter_date: NaiveDate,
        comparisons: &[Comparison],
    ) -> Result<()> {
        let reconciler = Reconciler {
            ledger,
            formatter,
            filter_date,
        };
        for comparison in comparisons {
            println!(
                "\n{} {} {}",
                ">".repeat(20),
                comparison.format.name().to_uppercase(),
                "<".repeat(20)
            );
            let (result, ledger_label) = reconciler.compare(comparison)?;
            print!(
                "{}",
                reconciler
                    .formatter
                    .render(&result, &ledger_label, comparison.format.name())
            );
        }
        Ok(())
    }

    fn compare(&self, comparison: &Comparison) -> Result<(MatchResult, String)> {
        let bank_name = comparison.format.name();
        info!(
            "Comparing YNAB account {} to data from {}",
            comparison.account, bank_name
        );
        let ledger_label = format!("YNAB ({})", comparison.account);

        let ledger = self
            .ledger
            .account_transactions(&comparison.account)
            .chain_err(|| format!("Failed to read YNAB account: {}", comparison.account))?;
        log_adapted(&ledger_label, &ledger);

        let bank = read_bank_export(comparison)?;
        log_adapted(bank_name, &bank);

        let result = reconcile_adapted(
            ledger,
            &ledger_label,
            bank,
            bank_name,
            self.filter_date,
        );
        if result.unmatched_b.is_empty() {
            info!(
                "There are no transactions in {} that are not also in YNAB.",
                bank_name
            );
        } else {
            warn!(
                "There are {} transactions found in the {} export, but not in YNAB.",
                result.unmatched_b.len(),
                bank_name
            );
        }
        if result.unmatched_a.is_empty() {
            info!(
                "There are no transactions in YNAB that are not also in {}.",
                bank_name
            );
        } else {
            warn!(
                "There are {} transactions found in YNAB, but not in the {} export.",
                result.unmatched_a.len(),
                bank_name
            );
        }
        Ok((result, ledger_label))
    }
}

fn read_bank_export(comparison: &Comparison) -> Result<Adapted> {
    let bytes = fs::read(&comparison.path).chain_err(|| {
        format!(
            "Failed to read {} export: {}",
            comparison.format,
            comparison.path.display()
        )
    })?;
    comparison
        .format
        .adapter()
        .adapt(&decode_text(&bytes))
        .chain_err(|| format!("Failed to parse {}", comparison.path.display()))
}

/// Ledger side is A, bank side is B.
fn reconcile_adapted(
    ledger: Adapted,
    ledger_label: &str,
    bank: Adapted,
    bank_label: &str,
    filter_date: NaiveDate,
) -> MatchResult {
    let a = TransactionSet::new(Origin::A, ledger_label, ledger.transactions, filter_date);
    let b = TransactionSet::new(Origin::B, bank_label, bank.transactions, filter_date);
    matcher::reconcile(&a, &b)
}

fn log_adapted(source: &str, adapted: &Adapted) {
    info!(
        "Extracted {} entries from {}",
        adapted.transactions.len(),
        source
    );
    if !adapted.rejected.is_empty() {
        warn!(
            "{} rows from {} could not be parsed and were skipped",
            adapted.rejected.len(),
            source
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YNAB_EXPORT: &str = concat!(
        "Account\tFlag\tDate\tPayee\tCategory Group/Category\tCategory Group\tCategory\t",
        "Memo\tOutflow\tInflow\tCleared\n",
        "Checking\t\t2020-05-31\tOld\t\t\t\t\t10,00kr\t0,00kr\tCleared\n",
        "Checking\t\t2020-06-01\tICA Nara\t\t\t\t\t123,45kr\t0,00kr\tCleared\n",
        "Checking\t\t2020-06-01\tICA Nara\t\t\t\t\t123,45kr\t0,00kr\tCleared\n",
        "Checking\t\t2020-06-05\tRent\t\t\t\t\t1 200,00kr\t0,00kr\tCleared\n",
    );

    const SWEDBANK_EXPORT: &str = "\
Bokföringsdag,Referens,Beskrivning,Belopp,Bokfört saldo
2020-06-01,,ICA NARA,-123.45,10000.00
2020-06-06,,HYRA,-1200.00,10123.45
2020-06-07,,SWISH,-50.00,11323.45
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_comparison() {
        assert_eq!(
            Comparison::parse("ica:ICA Banken:data/ica.csv").unwrap(),
            Comparison::new(BankFormat::Ica, "ICA Banken", Path::new("data/ica.csv"))
        );
        assert_eq!(
            Comparison::parse("swedbank:Checking:C:\\exports\\swedbank.csv")
                .unwrap()
                .path,
            PathBuf::from("C:\\exports\\swedbank.csv")
        );
    }

    #[test]
    fn test_parse_comparison_rejects_incomplete_values() {
        assert!(Comparison::parse("swedbank:Checking").is_err());
        assert!(Comparison::parse("swedbank::data/swedbank.csv").is_err());
        assert!(Comparison::parse("nordea:Checking:data/nordea.csv").is_err());
    }

    #[test]
    fn test_reconcile_ledger_against_bank_export() {
        let ledger = Ledger::Export {
            text: YNAB_EXPORT.to_string(),
        };
        let ynab = ledger.account_transactions("Checking").unwrap();
        let bank = SwedbankAdapter.adapt(SWEDBANK_EXPORT).unwrap();
        let result = reconcile_adapted(ynab, "YNAB (Checking)", bank, "Swedbank", date(2020, 6, 1));

        let unmatched_a: Vec<(NaiveDate, i64)> = result
            .unmatched_a
            .iter()
            .map(|t| (t.date, t.amount.to_i64()))
            .collect();
        let unmatched_b: Vec<(NaiveDate, i64)> = result
            .unmatched_b
            .iter()
            .map(|t| (t.date, t.amount.to_i64()))
            .collect();
        assert_eq!(
            unmatched_a,
            vec![(date(2020, 6, 1), -12_345), (date(2020, 6, 5), -120_000)]
        );
        assert_eq!(
            unmatched_b,
            vec![(date(2020, 6, 6), -120_000), (date(2020, 6, 7), -5_000)]
        );
    }

    #[test]
    fn test_unknown_ledger_file_is_fatal() {
        assert!(Ledger::from_file(Path::new("does/not/exist/ynab.tsv")).is_err());
    }

    #[test]
    fn test_missing_bank_export_is_fatal() {
        let comparison = Comparison::new(
            BankFormat::Swedbank,
            "Checking",
            Path::new("does/not/exist/swedbank.csv"),
        );
        let err = read_bank_export(&comparison).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to read Swedbank export: does/not/exist/swedbank.csv"
        );
    }
}
