use anyhow::{anyhow, Result};
use macroboard::{
    process::LoadedTable,
    schema::{self, SourceId},
    Settings, SourceLoader,
};
use std::{env, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Expect one source name, optionally followed by a settings file.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        let names: Vec<&str> = SourceId::ALL.iter().map(|id| id.as_str()).collect();
        eprintln!("Usage: {} <SOURCE> [SETTINGS_YAML]", args[0]);
        eprintln!("Sources: {}", names.join(", "));
        exit(1);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = inspect(&args[1], args.get(2).map(String::as_str)) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn inspect(source: &str, settings_path: Option<&str>) -> Result<()> {
    let id = SourceId::from_str(source).ok_or_else(|| anyhow!("unknown source `{}`", source))?;
    let settings = Settings::load(settings_path.map(std::path::Path::new))?;
    let loader = SourceLoader::new(settings);
    let schema = schema::schema_for(id);

    let loaded = loader.load(schema)?;
    print_report(&loader.path_for(schema).display().to_string(), &loaded);
    Ok(())
}

fn print_report(path: &str, loaded: &LoadedTable) {
    let table = &loaded.table;
    let fmt_date = |d: Option<chrono::NaiveDate>| {
        d.map_or("<none>".to_string(), |d| d.format("%Y-%m-%d").to_string())
    };

    println!("=== Source: {} ({}) ===", table.source(), path);
    println!("Encoding:             {}", loaded.encoding.label());
    println!("Rows kept:            {}", table.len());
    println!("First date:           {}", fmt_date(table.first_date()));
    println!("Last date:            {}", fmt_date(table.last_date()));
    println!();

    println!("=== Columns ===");
    for name in table.columns() {
        let values = table.values_of(name).unwrap_or_default();
        let last = values.iter().rev().find_map(|v| *v);
        println!(
            "- {:<25} | last: {}",
            name,
            last.map_or("<none>".to_string(), |v| v.to_string())
        );
    }
    println!();

    let stats = &loaded.stats;
    println!("=== Load stats ===");
    println!("Records read:         {}", stats.rows_read);
    println!("Undated dropped:      {}", stats.dropped_undated);
    println!("Duplicates dropped:   {}", stats.dropped_duplicates);
    println!("Leading rows trimmed: {}", stats.trimmed_leading);
    println!("Cells forward-filled: {}", stats.filled_cells);
    println!();

    println!("=== Warnings ({}) ===", loaded.warnings.len());
    for w in &loaded.warnings {
        println!("- {}", w);
    }
}
