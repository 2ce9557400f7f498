use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::*;
use crate::constants::*;
use crate::errors::*;
use crate::ledger::*;
use crate::reconciler::*;
use crate::report::*;
use crate::utilities::*;
use crate::ynab_client::*;

pub fn run() -> Result<()> {
    initialize();
    let matches = build_app().get_matches();
    init_logger(matches.is_present(VERBOSE_ARG));
    run_clap_matches(&matches)
}

fn initialize() {
    openssl_probe::init_ssl_cert_env_vars();
    dotenv::dotenv().ok();
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn build_app() -> clap::App<'static, 'static> {
    clap::App::new(clap::crate_name!())
        .version(option_env!("CI_BUILD_VERSION").unwrap_or(clap::crate_version!()))
        .about(clap::crate_description!())
        .arg(
            clap::Arg::with_name(FILTER_DATE_ARG)
                .env(FILTER_DATE_ENV)
                .long(FILTER_DATE_ARG)
                .value_name("YYYY-MM-DD")
                .help("Only transactions on or after this date are compared")
                .takes_value(true)
                .required(true)
                .validator(|value| {
                    parse_iso_date(&value)
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            clap::Arg::with_name(YNAB_BUDGET_ID_ARG)
                .env(YNAB_BUDGET_ID_ENV)
                .long(YNAB_BUDGET_ID_ARG)
                .value_name("ID")
                .help("YNAB budget identifier")
                .takes_value(true)
                .conflicts_with(YNAB_BUDGET_NAME_ARG),
        )
        .arg(
            clap::Arg::with_name(YNAB_BUDGET_NAME_ARG)
                .env(YNAB_BUDGET_NAME_ENV)
                .long(YNAB_BUDGET_NAME_ARG)
                .value_name("NAME")
                .help("YNAB budget name, looked up when no budget ID is given")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(YNAB_ACCESS_TOKEN_ARG)
                .env(YNAB_ACCESS_TOKEN_ENV)
                .long(YNAB_ACCESS_TOKEN_ARG)
                .value_name("KEY")
                .help("YNAB personal access token (without one, the YNAB TSV export is used)")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(TOKEN_FILE_ARG)
                .env(TOKEN_FILE_ENV)
                .long(TOKEN_FILE_ARG)
                .value_name("PATH")
                .help("File containing the YNAB personal access token")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(YNAB_FILE_ARG)
                .env(YNAB_FILE_ENV)
                .long(YNAB_FILE_ARG)
                .value_name("PATH")
                .help("YNAB TSV export to use when no access token is available")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(DATA_DIR_ARG)
                .env(DATA_DIR_ENV)
                .long(DATA_DIR_ARG)
                .value_name("PATH")
                .help("Directory holding the exports and token file")
                .takes_value(true)
                .default_value(DEFAULT_DATA_DIR),
        )
        .arg(
            clap::Arg::with_name(COMPARE_ARG)
                .long(COMPARE_ARG)
                .value_name("FORMAT:ACCOUNT:PATH")
                .help("Compare a YNAB account to a bank export (swedbank or ica); may be repeated")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            clap::Arg::with_name(VERBOSE_ARG)
                .long(VERBOSE_ARG)
                .short("v")
                .help("Log matcher decisions and raw YNAB responses"),
        )
}

fn run_clap_matches(matches: &clap::ArgMatches) -> Result<()> {
    let filter_date = parse_iso_date(
        matches
            .value_of(FILTER_DATE_ARG)
            .expect("CLAP matches should have FILTER_DATE_ARG"),
    )?;
    let data_dir = Path::new(
        matches
            .value_of(DATA_DIR_ARG)
            .expect("CLAP matches should have DATA_DIR_ARG"),
    );
    let comparisons = comparisons(matches, data_dir)?;

    let (ledger, formatter) = match resolve_token(matches, data_dir)? {
        Some(token) => {
            let budget_id = match (
                matches.value_of(YNAB_BUDGET_ID_ARG),
                matches.value_of(YNAB_BUDGET_NAME_ARG),
            ) {
                (Some(budget_id), _) => budget_id.to_string(),
                (None, Some(budget_name)) => {
                    info!("Looking up YNAB budget: {}", budget_name);
                    get_budget_id_by_name(&token, budget_name)?
                }
                (None, None) => bail!(
                    "A YNAB budget ID (--{}) or name (--{}) is required with an access token",
                    YNAB_BUDGET_ID_ARG,
                    YNAB_BUDGET_NAME_ARG
                ),
            };
            let ynab_client = YnabBudgetClient::new(token, &budget_id);
            let formatter = ReportFormatter::from_budget_settings(&ynab_client.get_budget_settings()?);
            (Ledger::from_api(&ynab_client, filter_date)?, formatter)
        }
        None => {
            warn!("No YNAB access token found, using the YNAB TSV export instead");
            let ynab_file = matches
                .value_of(YNAB_FILE_ARG)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(YNAB_TSV_FILENAME));
            (Ledger::from_file(&ynab_file)?, ReportFormatter::default())
        }
    };

    Reconciler::run(&ledger, &formatter, filter_date, &comparisons)
}

fn comparisons(matches: &clap::ArgMatches, data_dir: &Path) -> Result<Vec<Comparison>> {
    match matches.values_of(COMPARE_ARG) {
        Some(values) => values.map(Comparison::parse).collect(),
        None => default_comparisons(data_dir),
    }
}

fn default_comparisons(data_dir: &Path) -> Result<Vec<Comparison>> {
    DEFAULT_COMPARISONS
        .iter()
        .map(|(format, account, filename)| -> Result<Comparison> {
            Ok(Comparison::new(
                BankFormat::from_name(format)?,
                *account,
                &data_dir.join(filename),
            ))
        })
        .collect()
}

/// Access token from the command line, an explicit token file, the data
/// directory or the per-user config directory, in that order.
fn resolve_token(matches: &clap::ArgMatches, data_dir: &Path) -> Result<Option<String>> {
    if let Some(token) = matches.value_of(YNAB_ACCESS_TOKEN_ARG) {
        return Ok(Some(token.trim().to_string()).filter(|token| !token.is_empty()));
    }
    if let Some(token_file) = matches.value_of(TOKEN_FILE_ARG) {
        return read_token_file(Path::new(token_file));
    }
    let mut candidates = vec![data_dir.join(TOKEN_FILENAME)];
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", clap::crate_name!()) {
        candidates.push(proj_dirs.config_dir().join(TOKEN_FILENAME));
    }
    for candidate in candidates {
        if candidate.is_file() {
            info!("Using YNAB access token from {}", candidate.display());
            return read_token_file(&candidate);
        }
    }
    Ok(None)
}

fn read_token_file(path: &Path) -> Result<Option<String>> {
    let contents = fs::read_to_string(path)
        .chain_err(|| format!("Failed to read token file: {}", path.display()))?;
    let token = contents.trim();
    Ok(if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    })
}
