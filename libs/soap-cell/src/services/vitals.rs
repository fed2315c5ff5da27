use std::sync::LazyLock;

use regex::Regex;

use crate::models::ReportedVitals;

const LINK: &str = r"(?:\s+(?:is|was|of|at|around))?\s*";

static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:temperature|temp){LINK}(\d{{2,3}}(?:\.\d+)?)\s*(?:°|degrees)?\s*([cf])?\b"))
        .expect("valid regex")
});
static HEART_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:heart rate|pulse|hr){LINK}(\d{{2,3}})\b")).expect("valid regex")
});
static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:blood pressure|bp){LINK}(\d{{2,3}})\s*/\s*(\d{{2,3}})\b")).expect("valid regex")
});
static RESPIRATORY_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:respiratory rate|breathing rate){LINK}(\d{{1,2}})\b")).expect("valid regex")
});
static OXYGEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:oxygen saturation|oxygen level|oxygen|spo2|o2 sat|o2){LINK}(\d{{2,3}})\s*%")).expect("valid regex")
});

/// Picks self-reported vitals out of patient messages ("my temp is 38.5",
/// "bp 150/95"). Implausible values are dropped.
pub fn scrape_vitals(text: &str) -> ReportedVitals {
    let text = text.to_lowercase();
    let number = |re: &Regex| -> Option<f64> { re.captures(&text).and_then(|c| c[1].parse().ok()) };

    let temperature_c = TEMPERATURE.captures(&text).and_then(|caps| {
        let value: f64 = caps[1].parse().ok()?;
        let fahrenheit = caps.get(2).map_or(value > 50.0, |unit| unit.as_str() == "f");
        let celsius = if fahrenheit { (value - 32.0) * 5.0 / 9.0 } else { value };
        (30.0..=45.0).contains(&celsius).then(|| (celsius * 10.0).round() / 10.0)
    });

    let blood_pressure = BLOOD_PRESSURE.captures(&text).and_then(|caps| {
        let systolic: u32 = caps[1].parse().ok()?;
        let diastolic: u32 = caps[2].parse().ok()?;
        (systolic > diastolic && (60..=260).contains(&systolic)).then(|| format!("{systolic}/{diastolic}"))
    });

    ReportedVitals {
        temperature_c,
        heart_rate_bpm: number(&HEART_RATE).filter(|v| (25.0..=250.0).contains(v)).map(|v| v as u32),
        blood_pressure,
        respiratory_rate: number(&RESPIRATORY_RATE).filter(|v| (4.0..=60.0).contains(v)).map(|v| v as u32),
        oxygen_saturation: number(&OXYGEN).filter(|v| (50.0..=100.0).contains(v)).map(|v| v as u32),
    }
}
