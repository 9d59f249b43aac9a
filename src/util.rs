pub fn format_usd(value: f64) -> String {
    const UNITS: [&str; 5] = ["", "K", "M", "B", "T"];

    if !value.is_finite() {
        return "n/a".to_owned();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let mut scaled = value.abs();
    let mut unit = 0usize;
    while scaled >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{sign}${scaled:.2}")
    } else {
        format!("{sign}${scaled:.2}{}", UNITS[unit])
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_owned();
    }
    format!("{value:+.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_uses_thousand_suffixes() {
        assert_eq!(format_usd(0.15), "$0.15");
        assert_eq!(format_usd(47_012.3), "$47.01K");
        assert_eq!(format_usd(8.0e11), "$800.00B");
        assert_eq!(format_usd(2.4e15), "$2400.00T");
        assert_eq!(format_usd(-1.5e6), "-$1.50M");
        assert_eq!(format_usd(f64::NAN), "n/a");
    }

    #[test]
    fn percent_is_signed() {
        assert_eq!(format_percent(2.5), "+2.50%");
        assert_eq!(format_percent(-1.0), "-1.00%");
        assert_eq!(format_percent(0.0), "+0.00%");
        assert_eq!(format_percent(f64::INFINITY), "n/a");
    }
}
