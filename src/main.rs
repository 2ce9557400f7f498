use error_chain::quick_main;

quick_main!(ynab_reconcile::run);
