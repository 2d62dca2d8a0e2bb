use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ ToPrimitive, Zero };
use serde::{ Deserialize, Deserializer, Serialize, Serializer };

use crate::errors::{ VerifloatError, VerifloatResult };

/// Build an exact rational `numerator / denominator`
pub fn rational(numerator: i64, denominator: i64) -> BigRational {
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}

/// Build an exact integer-valued rational
pub fn integer(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

/// Parse a rational literal.
///
/// Accepts integers (`3`), decimals (`-0.001`, `.5`) and fractions
/// (`1023/1024`, `-1/2`). Decimals are read exactly, so `0.1` is `1/10`.
pub fn parse_rational(text: &str) -> VerifloatResult<BigRational> {
    let trimmed = text.trim();

    if let Some((numerator, denominator)) = trimmed.split_once('/') {
        let numerator = parse_rational(numerator)?;
        let denominator = parse_rational(denominator)?;
        if denominator.is_zero() {
            return Err(VerifloatError::InvalidLiteral(format!("zero denominator in {}", text)));
        }
        return Ok(numerator / denominator);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !is_digits(int_part) || !is_digits(frac_part) {
        return Err(VerifloatError::InvalidLiteral(text.to_string()));
    }

    let digits = format!("{}{}", int_part, frac_part);
    let numerator: BigInt = digits
        .parse()
        .map_err(|_| VerifloatError::InvalidLiteral(text.to_string()))?;
    let denominator = num_traits::pow(BigInt::from(10u32), frac_part.len());
    let value = BigRational::new(numerator, denominator);

    Ok(if negative { -value } else { value })
}

/// Render a rational as `n` or `n/d`
pub fn format_rational(value: &BigRational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

/// Nearest `f64`, for display only
pub fn approximate(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// A rational read from configuration.
///
/// Deserializes from strings (`"-0.001"`, `"1/1000"`) or plain YAML numbers
/// and always serializes back to its exact string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalLiteral(pub BigRational);

impl RationalLiteral {
    pub fn value(&self) -> &BigRational {
        &self.0
    }
}

impl From<BigRational> for RationalLiteral {
    fn from(value: BigRational) -> Self {
        RationalLiteral(value)
    }
}

impl fmt::Display for RationalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_rational(&self.0))
    }
}

impl Serialize for RationalLiteral {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_rational(&self.0))
    }
}

impl<'de> Deserialize<'de> for RationalLiteral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Integer(value) => Ok(integer(value)),
            Raw::Float(value) => parse_rational(&value.to_string()),
            Raw::Text(text) => parse_rational(&text),
        };

        parsed.map(RationalLiteral).map_err(serde::de::Error::custom)
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(text: &str) -> VerifloatResult<Self> {
        match text.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(VerifloatError::InvalidInput(format!("Unsupported output format: {}", other))),
        }
    }
}
