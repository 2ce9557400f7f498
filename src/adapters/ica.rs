use log::{debug, info};

use super::*;
use crate::utilities::*;

const NAME: &str = "ICA Banken";

/// ICA Banken export. Pending transactions come first and have an empty `Saldo`.
#[derive(Debug)]
pub struct IcaAdapter;

impl FormatAdapter for IcaAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn adapt(&self, text: &str) -> Result<Adapted> {
        let mut reader = csv_reader(text, b';');
        let headers = headers(&mut reader, NAME)?;
        let date_column = required_column(&headers, "Datum", NAME)?;
        let text_column = required_column(&headers, "Text", NAME)?;
        let amount_column = required_column(&headers, "Belopp", NAME)?;
        let balance_column = optional_column(&headers, "Saldo");

        let mut adapted = Adapted::default();
        for result in reader.records() {
            let record = result.chain_err(|| format!("Failed to read {} export", NAME))?;
            if let (None, Some(column)) = (adapted.balance, balance_column) {
                let balance = field(&record, column);
                if !balance.is_empty() {
                    adapted.balance = parse_amount(balance).ok();
                }
            }
            let parsed = parse_export_date(field(&record, date_column)).and_then(|date| {
                Ok(Transaction::new(date, parse_amount(field(&record, amount_column))?))
            });
            match parsed {
                Ok(transaction) => adapted
                    .transactions
                    .push(transaction.with_payee(field(&record, text_column))),
                Err(err) => adapted.reject(NAME, record_line(&record), &err),
            }
        }

        if let Some(balance) = adapted.balance {
            info!("{} balance: {}", NAME, balance);
        }
        debug!(
            "Extracted {} entries from {} ({} rejected)",
            adapted.transactions.len(),
            NAME,
            adapted.rejected.len()
        );
        Ok(adapted)
    }
}
