use crate::models::measurement::TemperatureStats;

const AVERAGE_SIGNIFICANT_DIGITS: usize = 4;

/// Render a temperature as a float, always with a fractional part
/// (`60` becomes `60.0`).
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() && value.fract() == 0.0 => format!("{value:.1}"),
        Some(value) => format!("{value}"),
        None => "None".to_string(),
    }
}

/// Render a value rounded to `digits` significant digits, keeping trailing
/// zeros.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", digits - 1, value);
    }
    // Let the formatter do the rounding so that e.g. 99.996 lands on 100.0.
    let scientific = format!("{:.*e}", digits - 1, value);
    let exponent = scientific
        .rsplit('e')
        .next()
        .and_then(|e| e.parse::<i32>().ok())
        .unwrap_or(0);
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    format!("{value:.decimals$}")
}

pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(value) => format_significant(value, AVERAGE_SIGNIFICANT_DIGITS),
        None => "None".to_string(),
    }
}

fn temperature_lines(stats: &TemperatureStats) -> [String; 3] {
    [
        format!(
            "The lowest Temperature was: {} F",
            format_temperature(stats.min)
        ),
        format!(
            "The average Temperature was: {} F",
            format_average(stats.avg)
        ),
        format!(
            "The highest Temperature was: {} F",
            format_temperature(stats.max)
        ),
    ]
}

/// Sentences answering an open-ended range: the start date, then min, avg
/// and max. Query code only hands over [`TemperatureStats`].
pub fn start_report(start: &str, stats: &TemperatureStats) -> Vec<String> {
    let mut lines = vec![format!("Entered Start Date: {start}")];
    lines.extend(temperature_lines(stats));
    lines
}

/// Summary for a closed range: both dates, then min, avg and max.
pub fn range_report(start: &str, end: &str, stats: &TemperatureStats) -> Vec<String> {
    let mut lines = vec![
        format!("Entered Start Date: {start}"),
        format!("Entered End Date: {end}"),
    ];
    lines.extend(temperature_lines(stats));
    lines
}
