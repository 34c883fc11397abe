use chrono::NaiveDate;

use crate::process::utils::clean_str;

/// Parse a date cell using the day-before-month convention.
///
/// Accepts `dd/mm/yyyy` (also `-` or `.` separated, and two-digit years),
/// ISO `yyyy-mm-dd`, month-only `yyyy-mm` / `mm/yyyy` (first of the month)
/// and compact `yyyymmdd`. Anything after the first space or `T` is ignored.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean_str(raw);
    let token = cleaned
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    if token.is_empty() {
        return None;
    }

    let sep = token.chars().find(|c| matches!(c, '/' | '-' | '.'));
    let parts: Vec<&str> = match sep {
        Some(sep) => token.split(sep).collect(),
        None => vec![token],
    };
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let num = |s: &str| s.parse::<u32>().ok();
    let (year, month, day) = match parts.as_slice() {
        [single] if single.len() == 8 => (
            single[0..4].parse::<i32>().ok()?,
            num(&single[4..6])?,
            num(&single[6..8])?,
        ),
        [y, m, d] if y.len() == 4 => (y.parse().ok()?, num(m)?, num(d)?),
        [d, m, y] if y.len() == 4 => (y.parse().ok()?, num(m)?, num(d)?),
        [d, m, y] if y.len() == 2 => (expand_two_digit_year(num(y)?), num(m)?, num(d)?),
        [y, m] if y.len() == 4 => (y.parse().ok()?, num(m)?, 1),
        [m, y] if y.len() == 4 => (y.parse().ok()?, num(m)?, 1),
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// `00..=68` → 2000s, `69..=99` → 1900s.
fn expand_two_digit_year(yy: u32) -> i32 {
    if yy < 69 {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    }
}
