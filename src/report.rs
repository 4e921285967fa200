use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::numeric_vector::NumericVector;
use crate::sum_config::{OutputFormat, OutputSettings};

/// Outcome of summing one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumReport {
    pub source: String,
    pub length: usize,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<Vec<f64>>
}

impl SumReport {
    pub fn new(source: impl Into<String>, vector: &NumericVector, with_running: bool) -> Self {
        Self {
            source: source.into(),
            length: vector.len(),
            total: vector.sum(),
            running: with_running.then(|| vector.running_sums().collect())
        }
    }
    pub fn render(&self, output: &OutputSettings) -> String {
        match output.format {
            OutputFormat::Plain => self.display_with(output.digits).to_string(),
            // Serializing plain numbers and strings cannot fail
            OutputFormat::Json => serde_json::to_string(self).unwrap_or_default()
        }
    }
    pub fn display_with(&self, digits: usize) -> ReportDisplay<'_> {
        ReportDisplay { report: self, digits }
    }
}

pub struct ReportDisplay<'a> {
    report: &'a SumReport,
    digits: usize
}
impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.report.source, format_significant(self.report.total, self.digits))?;
        if let Some(running) = &self.report.running {
            let partials = running.iter().map(|x| format_significant(*x, self.digits)).join(" ");
            write!(f, " [{}]", partials)?;
        }
        Ok(())
    }
}

/// Formats a double in the manner of R's `print`: `digits` significant digits,
/// fixed notation unless the exponent falls outside `[-5, digits)`.
pub fn format_significant(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Inf" } else { "-Inf" }.to_owned();
    }
    if x == 0.0 {
        return "0".to_owned();
    }
    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, x);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0)
    };
    if exponent < -5 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_owned()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn significant_digits() {
        assert_eq!(format_significant(6.0, 7), "6");
        assert_eq!(format_significant(-2.5, 7), "-2.5");
        assert_eq!(format_significant(0.1 + 0.2, 7), "0.3");
        assert_eq!(format_significant(0.1 + 0.2, 17), "0.30000000000000004");
        assert_eq!(format_significant(123456.0, 7), "123456");
        assert_eq!(format_significant(9.9999999, 7), "10");
        assert_eq!(format_significant(1e15, 7), "1e+15");
        assert_eq!(format_significant(1234567.0, 7), "1234567");
        assert_eq!(format_significant(12345678.0, 7), "1.234568e+07");
        assert_eq!(format_significant(1e-5, 7), "0.00001");
        assert_eq!(format_significant(1.5e-7, 7), "1.5e-07");
    }

    #[test]
    fn special_values() {
        assert_eq!(format_significant(f64::NAN, 7), "NaN");
        assert_eq!(format_significant(f64::INFINITY, 7), "Inf");
        assert_eq!(format_significant(f64::NEG_INFINITY, 7), "-Inf");
        assert_eq!(format_significant(-0.0, 7), "0");
    }

    #[test]
    fn plain_rendering() {
        let vector = NumericVector::from(vec![1.0, 2.0, 3.0]);
        let report = SumReport::new("numbers.txt", &vector, false);
        assert_eq!(report.length, 3);
        assert_eq!(report.total, 6.0);
        assert_eq!(report.render(&OutputSettings::default()), "numbers.txt: 6");

        let with_running = SumReport::new("-", &vector, true);
        assert_eq!(with_running.render(&OutputSettings::default()), "-: 6 [1 3 6]");
    }

    #[test]
    fn json_rendering() {
        let vector = NumericVector::from(vec![0.5, 0.25]);
        let output = OutputSettings { format: OutputFormat::Json, ..OutputSettings::default() };

        let report = SumReport::new("a", &vector, false);
        assert_eq!(report.render(&output), r#"{"source":"a","length":2,"total":0.75}"#);

        let with_running = SumReport::new("a", &vector, true);
        assert_eq!(
            with_running.render(&output),
            r#"{"source":"a","length":2,"total":0.75,"running":[0.5,0.75]}"#
        );

        let nan_report = SumReport::new("b", &NumericVector::from(vec![f64::NAN]), false);
        assert_eq!(nan_report.render(&output), r#"{"source":"b","length":1,"total":null}"#);
    }
}
