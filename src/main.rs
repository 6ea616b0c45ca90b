//! Binary entry point that glues the SQLite-backed collection to the TUI.
//! Startup runs in a fixed order: resolve paths, start logging, open the
//! database, seed it from the reference sets if it is empty, then hand the
//! sorted snapshot to the Ratatui event loop.
use coin_mark::db::collection_summary;
use coin_mark::importer::ResourceSource;
use coin_mark::logging::{flush_logging, init_logging};
use coin_mark::{
    ensure_schema, fetch_coins, run_app, seed_if_empty, App, BundledResources, Config,
    DirectoryResources,
};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("coin-mark: logging disabled: {err:#}");
    }

    let result = run(&config);
    if let Err(err) = &result {
        log::error!("event=app_exit status=error error={err:#}");
    }
    flush_logging();
    result
}

fn run(config: &Config) -> anyhow::Result<()> {
    let conn = ensure_schema(&config.db_path)?;

    // Seeding happens exactly once per process, before any UI event exists.
    let source: Box<dyn ResourceSource> = match config.resource_override() {
        Some(dir) => Box::new(DirectoryResources::new(dir)),
        None => Box::new(BundledResources),
    };
    let outcome = seed_if_empty(&conn, source.as_ref());

    match collection_summary(&conn) {
        Ok(summary) => log::info!(
            "event=collection_loaded status=ok total={} collected={} missing={}",
            summary.total,
            summary.collected,
            summary.missing()
        ),
        Err(err) => log::warn!("event=collection_loaded status=error error={err:#}"),
    }

    let coins = fetch_coins(&conn)?;
    let mut app = App::new(conn, coins);
    app.report_seed(&outcome);
    run_app(&mut app)
}
