use anyhow::{Context, Result};
use macroboard::{
    build_daily, build_monthly, export,
    indicators::{Assembled, IndicatorTable},
    Settings, SourceLoader,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn write_table(table: &IndicatorTable, out_dir: &Path) -> Result<()> {
    export::write_csv(table, out_dir.join(format!("{}.csv", table.name())))?;
    export::write_parquet(table, out_dir.join(format!("{}.parquet", table.name())))?;
    Ok(())
}

fn summarize(assembled: &Assembled) {
    let table = &assembled.table;
    info!(
        table = table.name(),
        rows = table.len(),
        first = ?table.first_date(),
        last = ?table.last_date(),
        "summary"
    );
    for (source, stats) in &assembled.stats {
        info!(%source, ?stats, "load stats");
    }
    if table.is_empty() {
        warn!(table = table.name(), "no dates shared by every indicator");
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();
    info!("startup");

    // ─── 2) settings ─────────────────────────────────────────────────
    let config_path = env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    info!(
        data_dir = %settings.data_dir.display(),
        output_dir = %settings.output_dir.display(),
        parallel = settings.parallel_loads,
        "settings resolved"
    );
    fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating output directory {:?}", settings.output_dir))?;
    let out_dir = settings.output_dir.clone();
    let loader = SourceLoader::new(settings);

    // ─── 3) assemble both tables ─────────────────────────────────────
    let start = Instant::now();
    let monthly = build_monthly(&loader).context("building monthly indicators")?;
    let daily = build_daily(&loader).context("building daily indicators")?;
    info!(elapsed = ?start.elapsed(), "assembled both tables");

    // ─── 4) export ───────────────────────────────────────────────────
    for assembled in [&monthly, &daily] {
        summarize(assembled);
        write_table(&assembled.table, &out_dir)?;
    }

    let warnings: Vec<_> = monthly
        .warnings
        .iter()
        .chain(&daily.warnings)
        .cloned()
        .collect();
    export::write_warnings_json(&warnings, out_dir.join("warnings.json"))?;
    info!(warnings = warnings.len(), out = %out_dir.display(), "done");

    Ok(())
}
