#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

pub mod adapters;
mod cli;
mod constants;
mod ledger;
pub mod matcher;
mod reconciler;
mod report;
pub mod transaction;
pub mod types;
mod utilities;
mod ynab_client;

pub mod errors {
    error_chain! {}
}

pub use cli::run;
