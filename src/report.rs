use chrono::NaiveDate;
use rust_decimal::RoundingStrategy;
use std::fmt::Write;

use crate::transaction::*;
use crate::types::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurrencyFormat {
    pub decimal_digits: u32,
    pub decimal_separator: String,
    pub group_separator: String,
    pub currency_symbol: String,
    pub symbol_first: bool,
    pub display_symbol: bool,
}

/// Renders match results, using the budget's number and date conventions when known.
#[derive(Debug)]
pub struct ReportFormatter {
    currency_format: CurrencyFormat,
    date_format: String,
}

impl Default for CurrencyFormat {
    fn default() -> CurrencyFormat {
        CurrencyFormat {
            decimal_digits: 2,
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            currency_symbol: String::new(),
            symbol_first: false,
            display_symbol: false,
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> ReportFormatter {
        ReportFormatter::new(CurrencyFormat::default(), "%Y-%m-%d")
    }
}

impl ReportFormatter {
    pub fn new<S: Into<String>>(currency_format: CurrencyFormat, date_format: S) -> ReportFormatter {
        ReportFormatter {
            currency_format,
            date_format: date_format.into(),
        }
    }

    pub fn from_budget_settings(settings: &ynab_api::models::BudgetSettings) -> ReportFormatter {
        let currency_format = &settings.currency_format;
        ReportFormatter::new(
            CurrencyFormat {
                decimal_digits: currency_format.decimal_digits as u32,
                decimal_separator: currency_format.decimal_separator.clone(),
                group_separator: currency_format.group_separator.clone(),
                currency_symbol: currency_format.currency_symbol.clone(),
                symbol_first: currency_format.symbol_first,
                display_symbol: currency_format.display_symbol,
            },
            settings
                .date_format
                .format
                .replace("YYYY", "%Y")
                .replace("MM", "%m")
                .replace("DD", "%d"),
        )
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    pub fn format_amount(&self, amount: Cents) -> String {
        let currency_format = &self.currency_format;
        let raw_formatted = format!(
            "{:.*}",
            currency_format.decimal_digits as usize,
            amount
                .to_decimal()
                .abs()
                .round_dp_with_strategy(
                    currency_format.decimal_digits,
                    RoundingStrategy::MidpointAwayFromZero,
                )
        );
        let mut split_around_decimal = raw_formatted.splitn(2, '.');
        let before_decimal = self.add_group_separators(split_around_decimal.next().unwrap_or("0"));
        let group_separated = match split_around_decimal.next() {
            Some(after_decimal) => format!(
                "{}{}{}",
                before_decimal, currency_format.decimal_separator, after_decimal
            ),
            None => before_decimal,
        };
        let with_symbol = if currency_format.display_symbol {
            if currency_format.symbol_first {
                format!("{}{}", currency_format.currency_symbol, group_separated)
            } else {
                format!("{}{}", group_separated, currency_format.currency_symbol)
            }
        } else {
            group_separated
        };
        if amount.is_negative() {
            format!("-{}", with_symbol)
        } else {
            with_symbol
        }
    }

    /// Text report of one comparison; `label_a` and `label_b` name the two sides.
    pub fn render(&self, result: &MatchResult, label_a: &str, label_b: &str) -> String {
        if result.is_reconciled() {
            return format!("{} has no deviating transactions!\n", label_b);
        }
        let mut report = String::new();
        self.render_section(&mut report, result.unmatched(Origin::B), label_b, label_a);
        self.render_section(&mut report, result.unmatched(Origin::A), label_a, label_b);
        report
    }

    fn render_section(
        &self,
        report: &mut String,
        unmatched: &[Transaction],
        found_in: &str,
        missing_from: &str,
    ) {
        if unmatched.is_empty() {
            let _ = writeln!(
                report,
                "There are no transactions in {} that are not also in {}.",
                found_in, missing_from
            );
            return;
        }
        let _ = writeln!(
            report,
            "The following {} transaction(s) were found in {} but not in {}:",
            unmatched.len(),
            found_in,
            missing_from
        );
        for transaction in unmatched {
            let _ = writeln!(report, "  {}", self.format_row(transaction));
        }
    }

    fn format_row(&self, transaction: &Transaction) -> String {
        let mut row = format!(
            "{}  {:>14}  {}",
            self.format_date(transaction.date),
            self.format_amount(transaction.amount),
            transaction.payee.as_deref().unwrap_or("-")
        );
        if let Some(note) = transaction.memo.as_ref().or_else(|| transaction.reference.as_ref()) {
            let _ = write!(row, " ({})", note);
        }
        row
    }

    fn add_group_separators(&self, before_decimal: &str) -> String {
        before_decimal
            .chars()
            .rev()
            .collect::<Vec<char>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect())
            .collect::<Vec<String>>()
            .join(&self.currency_format.group_separator)
            .chars()
            .rev()
            .collect()
    }
}
