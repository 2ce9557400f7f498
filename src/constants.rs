use lazy_static::lazy_static;
use regex::Regex;

pub const YNAB_API_URL: &str = "https://api.youneedabudget.com/v1";
pub const TOKEN_FILENAME: &str = "token.api";
pub const YNAB_TSV_FILENAME: &str = "ynab.tsv";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_COMPARISONS: [(&str, &str, &str); 2] = [
    ("swedbank", "Checking", "swedbank.csv"),
    ("ica", "ICA Banken", "ica.csv"),
];
pub const SWEDBANK_PREAMBLE: &str = "* Transaktioner";

pub const FILTER_DATE_ARG: &str = "filter-date";
pub const FILTER_DATE_ENV: &str = "YNAB_RECONCILE_FILTER_DATE";
pub const YNAB_BUDGET_ID_ARG: &str = "budget-id";
pub const YNAB_BUDGET_ID_ENV: &str = "YNAB_BUDGET_ID";
pub const YNAB_BUDGET_NAME_ARG: &str = "budget-name";
pub const YNAB_BUDGET_NAME_ENV: &str = "YNAB_BUDGET_NAME";
pub const YNAB_ACCESS_TOKEN_ARG: &str = "ynab-access-token";
pub const YNAB_ACCESS_TOKEN_ENV: &str = "YNAB_ACCESS_TOKEN";
pub const TOKEN_FILE_ARG: &str = "token-file";
pub const TOKEN_FILE_ENV: &str = "YNAB_RECONCILE_TOKEN_FILE";
pub const YNAB_FILE_ARG: &str = "ynab-file";
pub const YNAB_FILE_ENV: &str = "YNAB_RECONCILE_YNAB_FILE";
pub const DATA_DIR_ARG: &str = "data-dir";
pub const DATA_DIR_ENV: &str = "YNAB_RECONCILE_DATA_DIR";
pub const COMPARE_ARG: &str = "compare";
pub const VERBOSE_ARG: &str = "verbose";

lazy_static! {
    /// Optional sign and currency around a number whose groups may be separated by
    /// `.`, `,` or whitespace, e.g. `-1 234,50 kr`, `$-5.00` or `(12.00)`.
    pub static ref AMOUNT_REGEX: Regex = Regex::new(
        r"(?i)^(?P<open>\()?\s*(?P<sign>[+\-])?\s*(?:kr\.?|sek|eur|usd|[$€£])?\s*(?P<inner_sign>[+\-])?\s*(?P<number>[0-9](?:[0-9.,]|\s+[0-9])*)\s*(?:kr\.?|sek|eur|usd|[$€£])?\s*(?P<close>\))?$"
    )
    .expect("AMOUNT_REGEX should be valid");
    pub static ref COMMA_GROUPED_REGEX: Regex =
        Regex::new(r"^[0-9]{1,3}(,[0-9]{3})+$").expect("COMMA_GROUPED_REGEX should be valid");
    pub static ref DOT_GROUPED_REGEX: Regex =
        Regex::new(r"^[0-9]{1,3}(\.[0-9]{3})+$").expect("DOT_GROUPED_REGEX should be valid");
}
