use chrono::NaiveDate;
use log::debug;
use serde_json::Value;
use std::fmt;
use ynab_api::apis::client::APIClient;
use ynab_api::apis::configuration::{ApiKey, Configuration};
use ynab_api::models;

use crate::constants::*;
use crate::errors::*;
use crate::utilities::*;

pub struct YnabBudgetClient<'a> {
    client: APIClient,
    pub budget_id: &'a str,
}

// 'ynab_api::apis::Error' doesn't implement fmt::Display which makes it
// incompatible with error_chain, so we wrap it.
#[derive(Debug)]
struct YnabApiError(ynab_api::apis::Error);

impl<'a> YnabBudgetClient<'a> {
    pub fn new(api_key: String, budget_id: &'a str) -> YnabBudgetClient {
        let mut configuration = Configuration::new();
        configuration.api_key = Some(ApiKey {
            prefix: Some("Bearer".to_string()),
            key: api_key,
        });
        YnabBudgetClient {
            client: APIClient::new(configuration),
            budget_id,
        }
    }

    pub fn get_budget_settings(&self) -> Result<models::BudgetSettings> {
        Ok(self
            .client
            .budgets_api()
            .get_budget_settings_by_id(self.budget_id)
            .map_err(YnabApiError)
            .chain_err(|| "Failed to load budget settings from YNAB")?
            .data
            .settings)
    }

    pub fn get_accounts(&self) -> Result<Vec<models::Account>> {
        self.client
            .accounts_api()
            .get_accounts(self.budget_id, None)
            .map_err(YnabApiError)
            .chain_err(|| "Failed to load accounts from YNAB")
            .map(|result| result.data.accounts)
    }

    pub fn get_transactions(&self, since_date: NaiveDate) -> Result<Vec<models::TransactionDetail>> {
        Ok(self
            .client
            .transactions_api()
            .get_transactions(self.budget_id, Some(format_iso_date(since_date)), None, None)
            .map_err(YnabApiError)
            .chain_err(|| "Failed to load transactions from YNAB")?
            .data
            .transactions)
    }
}

/// Looks up a budget id by its display name.
pub fn get_budget_id_by_name(api_key: &str, budget_name: &str) -> Result<String> {
    let budgets_url = format!("{}/budgets", YNAB_API_URL);
    debug!("YNAB budgets URL: {}", budgets_url);
    let budgets = reqwest::Client::new()
        .get(&budgets_url)
        .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", api_key))
        .send()
        .chain_err(|| "Failed to get budgets from YNAB")?
        .error_for_status()
        .chain_err(|| "Error response while getting budgets from YNAB")?
        .json::<Value>()
        .chain_err(|| "Failed to parse budgets response from YNAB")?;
    find_budget_id(&budgets, budget_name)
}

fn find_budget_id(budgets_response: &Value, budget_name: &str) -> Result<String> {
    budgets_response
        .pointer("/data/budgets")
        .and_then(Value::as_array)
        .chain_err(|| "YNAB budgets response is missing data.budgets")?
        .iter()
        .find(|budget| budget.get("name").and_then(Value::as_str) == Some(budget_name))
        .and_then(|budget| budget.get("id"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .chain_err(|| format!("Unable to find budget: {}", budget_name))
}

impl fmt::Display for YnabApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ynab_api::apis::Error::Io(_) => write!(f, "YNAB API I/O error"),
            ynab_api::apis::Error::Reqwest(_) => write!(f, "YNAB API request error"),
            ynab_api::apis::Error::Serde(_) => write!(f, "YNAB API parse error"),
        }
    }
}

impl std::error::Error for YnabApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            ynab_api::apis::Error::Io(err) => Some(err),
            ynab_api::apis::Error::Reqwest(err) => Some(err),
            ynab_api::apis::Error::Serde(err) => Some(err),
        }
    }
}
