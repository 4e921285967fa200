use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::arithmetic_utils;
use crate::sum_config::InputSettings;

/* Accepted text, R style:
 * `1 2 3`
 * `1.5, -2e3, .5, 7.`
 * `c(1, NA, Inf, -Inf, NaN)`
 * Lines may carry `#` comments.
 */
lazy_static! {
    static ref SEPARATOR: Regex = Regex::new("[,[:space:]]+").unwrap();
    /* Capturing groups:
     * 0: The entire thing
     * 1: Mantissa
     * 2: Exponent, if present
     */
    static ref DECIMAL_TOKEN: Regex = Regex::new(concat!("^",
        "[+-]?",
        r"([[:digit:]]+\.?[[:digit:]]*|\.[[:digit:]]+)",
        "([eE][+-]?[[:digit:]]+)?",
        "$")
    ).unwrap();
}

const NA_TOKEN: &str = "NA";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericParseErr {
    #[error("Invalid numeric token {token:?} at position {position}")]
    InvalidToken { position: usize, token: String },
    #[error("Missing value at position {position}")]
    MissingValue { position: usize },
    #[error("Unbalanced c( ... ) wrapper")]
    UnbalancedWrapper,
}

/// An owned, ordered vector of doubles, the host-side collection that gets
/// handed to [`arithmetic_utils::sum`].
#[derive(Default, Debug, Clone, PartialEq)]
pub struct NumericVector(Vec<f64>);

impl NumericVector {
    pub fn parse_with(s: &str, settings: &InputSettings) -> Result<Self, NumericParseErr> {
        let uncommented = s.lines()
            .map(|line| line.find('#').map_or(line, |idx| &line[..idx]))
            .join("\n");
        let body = strip_wrapper(uncommented.trim())?;

        let mut values = Vec::new();
        let tokens = SEPARATOR.split(body).filter(|token| !token.is_empty());
        for (position, token) in tokens.enumerate() {
            values.push(parse_token(token, position, settings)?);
        }
        Ok(Self(values))
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
    pub fn sum(&self) -> f64 {
        arithmetic_utils::sum(self.0.iter().copied())
    }
    pub fn running_sums(&self) -> impl Iterator<Item = f64> + '_ {
        arithmetic_utils::running_sums(self.0.iter().copied())
    }
}

fn strip_wrapper(body: &str) -> Result<&str, NumericParseErr> {
    let wrapped = body.strip_prefix('c').and_then(|rest| rest.trim_start().strip_prefix('('));
    match (wrapped, body.ends_with(')')) {
        (Some(inner), true) => Ok(&inner[..inner.len() - 1]),
        (None, false) => Ok(body),
        _ => Err(NumericParseErr::UnbalancedWrapper)
    }
}

fn parse_token(token: &str, position: usize, settings: &InputSettings) -> Result<f64, NumericParseErr> {
    if token == NA_TOKEN {
        return if settings.allow_na {
            Ok(f64::NAN)
        } else {
            Err(NumericParseErr::MissingValue { position })
        };
    }
    let (sign, magnitude) = match token.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, token.strip_prefix('+').unwrap_or(token))
    };
    if magnitude.eq_ignore_ascii_case("inf") || magnitude.eq_ignore_ascii_case("infinity") {
        return Ok(sign * f64::INFINITY);
    }
    if magnitude.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    let invalid = || NumericParseErr::InvalidToken { position, token: token.to_owned() };
    if !DECIMAL_TOKEN.is_match(token) {
        return Err(invalid());
    }
    // The regex only admits what f64::from_str accepts
    token.parse::<f64>().map_err(|_| invalid())
}

impl FromStr for NumericVector {
    type Err = NumericParseErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &InputSettings::default())
    }
}
impl From<Vec<f64>> for NumericVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}
impl FromIterator<f64> for NumericVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl fmt::Display for NumericVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = self.0.iter().format_with(", ", |value, g| {
            if value.is_nan() {
                g(&"NaN")
            } else if value.is_infinite() {
                g(&if *value > 0.0 { "Inf" } else { "-Inf" })
            } else {
                g(value)
            }
        });
        write!(f, "c({})", elements)
    }
}
