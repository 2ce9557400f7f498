use log::{debug, info};

use super::*;
use crate::constants::*;
use crate::utilities::*;

const NAME: &str = "Swedbank";

/// Swedbank account export. Legacy files start with a `* Transaktioner` line
/// above the header and are Windows-1252 encoded, see [`decode_text`].
#[derive(Debug)]
pub struct SwedbankAdapter;

impl FormatAdapter for SwedbankAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn adapt(&self, text: &str) -> Result<Adapted> {
        let (body, line_offset) = strip_preamble(text);
        let mut reader = csv_reader(body, b',');
        let headers = headers(&mut reader, NAME)?;
        let date_column = required_column(&headers, "Bokföringsdag", NAME)?;
        let description_column = required_column(&headers, "Beskrivning", NAME)?;
        let amount_column = required_column(&headers, "Belopp", NAME)?;
        let reference_column = optional_column(&headers, "Referens");
        let balance_column = optional_column(&headers, "Bokfört saldo");

        let mut adapted = Adapted::default();
        for result in reader.records() {
            let record = result.chain_err(|| format!("Failed to read {} export", NAME))?;
            let line = record_line(&record) + line_offset;
            if adapted.balance.is_none() {
                if let Some(column) = balance_column {
                    adapted.balance = parse_amount(field(&record, column)).ok();
                }
            }
            let parsed = parse_export_date(field(&record, date_column)).and_then(|date| {
                Ok(Transaction::new(date, parse_amount(field(&record, amount_column))?))
            });
            match parsed {
                Ok(transaction) => {
                    let transaction = transaction.with_payee(field(&record, description_column));
                    adapted.transactions.push(match reference_column {
                        Some(column) => transaction.with_reference(field(&record, column)),
                        None => transaction,
                    });
                }
                Err(err) => adapted.reject(NAME, line, &err),
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

fn strip_preamble(text: &str) -> (&str, u64) {
    if !text.starts_with(SWEDBANK_PREAMBLE) {
        return (text, 0);
    }
    match text.find('\n') {
        Some(end) => (&text[end + 1..], 1),
        None => ("", 1),
    }
}
