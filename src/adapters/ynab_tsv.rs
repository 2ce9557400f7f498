use log::debug;

use super::*;
use crate::utilities::*;

const NAME: &str = "YNAB";

/// Tab separated register export from the YNAB web app, restricted to one account.
#[derive(Debug)]
pub struct YnabTsvAdapter {
    account: String,
}

impl YnabTsvAdapter {
    pub fn new<S: Into<String>>(account: S) -> YnabTsvAdapter {
        YnabTsvAdapter {
            account: account.into(),
        }
    }
}

impl FormatAdapter for YnabTsvAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn adapt(&self, text: &str) -> Result<Adapted> {
        let mut reader = csv_reader(text, b'\t');
        let headers = headers(&mut reader, NAME)?;
        let account_column = required_column(&headers, "Account", NAME)?;
        let date_column = required_column(&headers, "Date", NAME)?;
        let payee_column = required_column(&headers, "Payee", NAME)?;
        let memo_column = required_column(&headers, "Memo", NAME)?;
        let outflow_column = required_column(&headers, "Outflow", NAME)?;
        let inflow_column = required_column(&headers, "Inflow", NAME)?;

        let mut adapted = Adapted::default();
        let mut other_accounts = 0;
        for result in reader.records() {
            let record = result.chain_err(|| format!("Failed to read {} export", NAME))?;
            if field(&record, account_column) != self.account {
                other_accounts += 1;
                continue;
            }
            let parsed = parse_export_date(field(&record, date_column)).and_then(|date| {
                let inflow = parse_amount(field(&record, inflow_column))?;
                let outflow = parse_amount(field(&record, outflow_column))?;
                Ok(Transaction::new(date, inflow.checked_sub(outflow)?))
            });
            match parsed {
                Ok(transaction) => adapted.transactions.push(
                    transaction
                        .with_payee(field(&record, payee_column))
                        .with_memo(field(&record, memo_column)),
                ),
                Err(err) => adapted.reject(NAME, record_line(&record), &err),
            }
        }

        debug!(
            "Extracted {} entries from {} for account {} ({} rejected, {} in other accounts)",
            adapted.transactions.len(),
            NAME,
            self.account,
            adapted.rejected.len(),
            other_accounts
        );
        Ok(adapted)
    }
}
