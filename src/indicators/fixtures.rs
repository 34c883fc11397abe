//! CSV fixtures for assembler tests.

use chrono::{Datelike, Duration, Months, NaiveDate};
use std::{fmt::Write as _, fs, path::Path};

use crate::config::Settings;

pub const MONTHS: u32 = 36;
pub const DAILY_START: (i32, u32, u32) = (2011, 1, 1);
pub const DAYS: i64 = 400;

pub fn month(i: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap() + Months::new(i)
}

pub fn day(i: i64) -> NaiveDate {
    let (y, m, d) = DAILY_START;
    NaiveDate::from_ymd_opt(y, m, d).unwrap() + Duration::days(i)
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

fn write_csv(dir: &Path, file: &str, header: &str, rows: impl Iterator<Item = String>) {
    let mut text = format!("{header}\n");
    for row in rows {
        writeln!(text, "{row}").unwrap();
    }
    fs::write(dir.join(file), text).unwrap();
}

/// Write a full set of source files into `dir` and return matching settings.
///
/// - inflation: general annual 4 + 0.01·i, core 3.5, monthly 0.3 with a
///   two-month hole at months 20–21
/// - activity: both variants 100·1.01^i
/// - industrial production: 100 + i
/// - unemployment: 4.0, starting at month 17
/// - wages: commerce 100·1.05^(i/12), manufacturing 200
/// - target rate 7.0 and domestic bond 8.0 every day
/// - reference bond 4.0 on weekdays only
/// - FX 20 + 0.01·i every day
pub fn write_sources(dir: &Path) -> Settings {
    write_csv(
        dir,
        "inflacion.csv",
        "Fecha,General anual,Subyacente anual,General mensual",
        (0..MONTHS).map(|i| {
            let monthly = if (20..=21).contains(&i) { String::new() } else { "0.3".into() };
            format!("{},{},3.5,{}", fmt_date(month(i)), 4.0 + 0.01 * i as f64, monthly)
        }),
    );
    write_csv(
        dir,
        "igae.csv",
        "Periodo,IGAE Mensual,IGAE des",
        (0..MONTHS).map(|i| {
            let v = 100.0 * 1.01f64.powi(i as i32);
            format!("{},{v},{v}", fmt_date(month(i)))
        }),
    );
    write_csv(
        dir,
        "produccion.csv",
        "Periodo,Produccion industrial",
        (0..MONTHS).map(|i| format!("{},{}", fmt_date(month(i)), 100 + i)),
    );
    write_csv(
        dir,
        "desocupado.csv",
        "Periodo,Tasa",
        (17..MONTHS).map(|i| format!("{},4.0", fmt_date(month(i)))),
    );
    write_csv(
        dir,
        "remuneraciones.csv",
        "Periodo,Comercio,Manufactura",
        (0..MONTHS).map(|i| {
            format!(
                "{},{},200",
                fmt_date(month(i)),
                100.0 * 1.05f64.powf(i as f64 / 12.0)
            )
        }),
    );
    write_csv(
        dir,
        "objetivo.csv",
        "Fecha,Tasa objetivo",
        (0..DAYS).map(|i| format!("{},7.0", fmt_date(day(i)))),
    );
    write_csv(
        dir,
        "bono_m.csv",
        "Fecha,Bono M 10",
        (0..DAYS).map(|i| format!("{},8.0", fmt_date(day(i)))),
    );
    write_csv(
        dir,
        "DGS10.csv",
        "observation_date,DGS10",
        (0..DAYS)
            .filter(|i| day(*i).weekday().number_from_monday() <= 5)
            .map(|i| format!("{},4.0", fmt_date(day(i)))),
    );
    write_csv(
        dir,
        "tipo.csv",
        "Fecha,Tipo de cambio",
        (0..DAYS).map(|i| format!("{},{}", fmt_date(day(i)), 20.0 + 0.01 * i as f64)),
    );

    Settings {
        data_dir: dir.to_path_buf(),
        ..Settings::default()
    }
}
