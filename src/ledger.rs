//! The YNAB side of a reconciliation, read either from a TSV export or from the API.

use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::adapters::*;
use crate::errors::*;
use crate::transaction::*;
use crate::types::*;
use crate::utilities::*;
use crate::ynab_client::*;

pub enum Ledger {
    Export {
        text: String,
    },
    Api {
        account_ids: HashMap<String, YnabAccountId>,
        transactions: Vec<ApiTransaction>,
    },
}

/// The parts of a YNAB account the ledger needs.
#[derive(Clone, Debug)]
pub struct ApiAccount {
    pub id: String,
    pub name: String,
    pub deleted: bool,
}

/// The parts of a YNAB transaction the ledger needs. `amount` is in milliunits.
#[derive(Clone, Debug)]
pub struct ApiTransaction {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_name: Option<String>,
    pub memo: Option<String>,
    pub deleted: bool,
}

impl From<ynab_api::models::Account> for ApiAccount {
    fn from(account: ynab_api::models::Account) -> ApiAccount {
        ApiAccount {
            id: account.id,
            name: account.name,
            deleted: account.deleted,
        }
    }
}

impl From<ynab_api::models::TransactionDetail> for ApiTransaction {
    fn from(detail: ynab_api::models::TransactionDetail) -> ApiTransaction {
        ApiTransaction {
            id: detail.id,
            account_id: detail.account_id,
            date: detail.date,
            amount: detail.amount,
            payee_name: detail.payee_name,
            memo: detail.memo,
            deleted: detail.deleted,
        }
    }
}

impl Ledger {
    pub fn from_file(path: &Path) -> Result<Ledger> {
        info!("Reading YNAB export: {}", path.display());
        let bytes = fs::read(path)
            .chain_err(|| format!("Failed to read YNAB export: {}", path.display()))?;
        Ok(Ledger::Export {
            text: decode_text(&bytes),
        })
    }

    pub fn from_api(ynab_client: &YnabBudgetClient, since_date: NaiveDate) -> Result<Ledger> {
        info!("Downloading YNAB accounts for budget {}", ynab_client.budget_id);
        let accounts = ynab_client.get_accounts()?;
        debug!("Accounts received from YNAB: {:#?}", &accounts);
        info!("Downloading YNAB transactions since {}", since_date);
        let transactions = ynab_client.get_transactions(since_date)?;
        info!("Fetched {} transactions", transactions.len());
        debug!("Transactions received from YNAB: {:#?}", &transactions);
        Ok(Ledger::from_api_records(
            accounts.into_iter().map(ApiAccount::from).collect(),
            transactions.into_iter().map(ApiTransaction::from).collect(),
        ))
    }

    /// Deleted accounts are left out, so a deleted account never shadows a live one
    /// with the same name.
    pub fn from_api_records(
        accounts: Vec<ApiAccount>,
        transactions: Vec<ApiTransaction>,
    ) -> Ledger {
        let mut account_ids = HashMap::new();
        for account in accounts.into_iter().filter(|account| !account.deleted) {
            let account_id = account.id;
            account_ids
                .entry(account.name)
                .or_insert_with(|| YnabAccountId(account_id));
        }
        Ledger::Api {
            account_ids,
            transactions,
        }
    }

    /// Canonical transactions of one YNAB account, in ledger order.
    pub fn account_transactions(&self, account: &str) -> Result<Adapted> {
        match self {
            Ledger::Export { text } => YnabTsvAdapter::new(account).adapt(text),
            Ledger::Api {
                account_ids,
                transactions,
            } => {
                let account_id = account_ids
                    .get(account)
                    .chain_err(|| format!("Unable to find YNAB account: {}", account))?;
                let mut adapted = Adapted::default();
                for (index, api_transaction) in transactions.iter().enumerate().filter(
                    |(_, api_transaction)| {
                        !api_transaction.deleted && api_transaction.account_id == account_id.0
                    },
                ) {
                    match transaction_from_api(api_transaction) {
                        Ok(transaction) => adapted.transactions.push(transaction),
                        Err(err) => adapted.reject("YNAB API", index as u64 + 1, &err),
                    }
                }
                Ok(adapted)
            }
        }
    }
}

fn transaction_from_api(api_transaction: &ApiTransaction) -> Result<Transaction> {
    let transaction = Transaction::new(
        parse_iso_date(&api_transaction.date)?,
        Cents::from_milliunits(api_transaction.amount)?,
    )
    .with_id(TransactionId(api_transaction.id.clone()));
    let transaction = match &api_transaction.payee_name {
        Some(payee_name) => transaction.with_payee(payee_name.as_str()),
        None => transaction,
    };
    Ok(match &api_transaction.memo {
        Some(memo) => transaction.with_memo(memo.as_str()),
        None => transaction,
    })
}
