//! Runtime values flowing through the rules evaluator and the coercion
//! table applied by arithmetic and lookup operators.
//!
//! Coercion is total: every conversion here produces a value and never
//! fails. Callers that need the original variant must match on
//! [`RulesValue`] before coercing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Input record handed to the evaluator: a flat map from key to value.
pub type RulesInputs = BTreeMap<String, RulesValue>;

/// Largest integer that survives a round trip through `f64` exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ──────────────────────────────────────────────
// Runtime values
// ──────────────────────────────────────────────

/// The only runtime value type produced by the evaluator.
///
/// Serialized as a bare JSON scalar (`12`, `"+D4"`, `true`, `null`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum RulesValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RulesValue {
    /// Human-readable type name, as shown next to CLI text output.
    pub fn type_name(&self) -> &'static str {
        match self {
            RulesValue::Null => "null",
            RulesValue::Bool(_) => "boolean",
            RulesValue::Number(_) => "number",
            RulesValue::Text(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RulesValue::Null)
    }

    /// Numeric coercion used by every arithmetic operator.
    ///
    /// | variant | result |
    /// |---|---|
    /// | number | itself (non-finite becomes 0) |
    /// | null | 0 |
    /// | boolean | 1 / 0 |
    /// | string | parsed number, 0 if unparsable |
    pub fn as_number(&self) -> f64 {
        match self {
            RulesValue::Number(n) => finite_or_zero(*n),
            RulesValue::Null => 0.0,
            RulesValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            RulesValue::Text(s) => parse_number(s),
        }
    }

    /// Key coercion used by `mapLookup`: null becomes the empty string,
    /// everything else its display form.
    pub fn as_lookup_key(&self) -> String {
        match self {
            RulesValue::Null => String::new(),
            RulesValue::Bool(b) => b.to_string(),
            RulesValue::Number(n) => format_number(*n),
            RulesValue::Text(s) => s.clone(),
        }
    }

    /// Returns the string payload, or `None` for every other variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RulesValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RulesValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesValue::Null => write!(f, "null"),
            RulesValue::Bool(b) => write!(f, "{}", b),
            RulesValue::Number(n) => write!(f, "{}", format_number(*n)),
            RulesValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for RulesValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RulesValue::Null => serializer.serialize_unit(),
            RulesValue::Bool(b) => serializer.serialize_bool(*b),
            RulesValue::Number(n) => {
                if is_whole(*n) {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            RulesValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for RulesValue {
    fn from(n: f64) -> Self {
        RulesValue::Number(n)
    }
}

impl From<i32> for RulesValue {
    fn from(n: i32) -> Self {
        RulesValue::Number(f64::from(n))
    }
}

impl From<i64> for RulesValue {
    fn from(n: i64) -> Self {
        RulesValue::Number(n as f64)
    }
}

impl From<bool> for RulesValue {
    fn from(b: bool) -> Self {
        RulesValue::Bool(b)
    }
}

impl From<&str> for RulesValue {
    fn from(s: &str) -> Self {
        RulesValue::Text(s.to_string())
    }
}

impl From<String> for RulesValue {
    fn from(s: String) -> Self {
        RulesValue::Text(s)
    }
}

impl<T: Into<RulesValue>> From<Option<T>> for RulesValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RulesValue::Null, Into::into)
    }
}

// ──────────────────────────────────────────────
// Coercion helpers
// ──────────────────────────────────────────────

/// Collapses NaN and the infinities to 0.
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parses a string the way a loosely typed numeric conversion would:
/// surrounding whitespace is ignored, the empty string is 0, `0x`/`0o`/`0b`
/// prefixes select a radix, and anything unparsable or non-finite is 0.
pub fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&trimmed[2..], radix);
    }

    // `f64::from_str` also accepts "inf" and "NaN"; both end up as 0.
    trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Unsigned digits after a radix prefix. No sign, no separators, at least
/// one digit; values beyond `u64` keep growing as floats.
fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * f64::from(radix) + f64::from(d),
            None => return 0.0,
        }
    }
    finite_or_zero(acc)
}

fn is_whole(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

/// Formats a number without a trailing `.0` on whole values; negative zero
/// prints as `0`. Magnitudes from `1e21` up and below `1e-6` use exponent
/// notation with an explicit sign (`1e+21`, `1.5e-7`), matching how
/// lookup keys are written in content packs.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if n.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    if is_whole(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_number_coercion_table() {
        assert_eq!(RulesValue::Number(4.5).as_number(), 4.5);
        assert_eq!(RulesValue::Null.as_number(), 0.0);
        assert_eq!(RulesValue::Bool(true).as_number(), 1.0);
        assert_eq!(RulesValue::Bool(false).as_number(), 0.0);
        assert_eq!(RulesValue::from("12").as_number(), 12.0);
        assert_eq!(RulesValue::from(" 7.5 ").as_number(), 7.5);
        assert_eq!(RulesValue::from("").as_number(), 0.0);
        assert_eq!(RulesValue::from("abc").as_number(), 0.0);
    }

    #[test]
    fn as_number_never_yields_non_finite() {
        assert_eq!(RulesValue::Number(f64::NAN).as_number(), 0.0);
        assert_eq!(RulesValue::Number(f64::INFINITY).as_number(), 0.0);
        assert_eq!(RulesValue::from("Infinity").as_number(), 0.0);
        assert_eq!(RulesValue::from("NaN").as_number(), 0.0);
        assert_eq!(RulesValue::from("1e400").as_number(), 0.0);
    }

    #[test]
    fn parse_number_radix_prefixes() {
        assert_eq!(parse_number("0x1F"), 31.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("0xZZ"), 0.0);
        assert_eq!(parse_number("0x"), 0.0);
    }

    #[test]
    fn radix_prefix_rejects_signs_and_keeps_large_values() {
        assert_eq!(parse_number("0x+1F"), 0.0);
        assert_eq!(parse_number("0x-1F"), 0.0);
        assert_eq!(parse_number("0b+1"), 0.0);
        assert_eq!(parse_number("0x10000000000000000"), 18446744073709551616.0);
    }

    #[test]
    fn format_number_uses_exponent_at_the_extremes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(RulesValue::Number(1e21).as_lookup_key(), "1e+21");
    }

    #[test]
    fn lookup_key_coercion() {
        assert_eq!(RulesValue::Null.as_lookup_key(), "");
        assert_eq!(RulesValue::Bool(true).as_lookup_key(), "true");
        assert_eq!(RulesValue::Number(8.0).as_lookup_key(), "8");
        assert_eq!(RulesValue::Number(2.5).as_lookup_key(), "2.5");
        assert_eq!(RulesValue::from("human").as_lookup_key(), "human");
    }

    #[test]
    fn serializes_as_bare_scalars() {
        let values = vec![
            RulesValue::Null,
            RulesValue::Bool(false),
            RulesValue::Number(8.0),
            RulesValue::Number(0.5),
            RulesValue::from("+D4"),
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, serde_json::json!([null, false, 8, 0.5, "+D4"]));
    }

    #[test]
    fn deserializes_from_bare_scalars() {
        let values: Vec<RulesValue> =
            serde_json::from_value(serde_json::json!([null, true, 3, 1.5, "dwarf"])).unwrap();
        assert_eq!(
            values,
            vec![
                RulesValue::Null,
                RulesValue::Bool(true),
                RulesValue::Number(3.0),
                RulesValue::Number(1.5),
                RulesValue::from("dwarf"),
            ]
        );
    }

    #[test]
    fn option_conversion() {
        assert_eq!(RulesValue::from(None::<&str>), RulesValue::Null);
        assert_eq!(RulesValue::from(Some("+D6")), RulesValue::from("+D6"));
    }
}
