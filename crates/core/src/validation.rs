//! Item payload validation and normalization.
//!
//! Payloads arrive as loosely typed JSON objects. A field counts as missing
//! when it is absent or "empty" in the loose sense: `null`, `""`, `"0"`, any
//! numeric zero, `false`, or an empty array/object. Zero quantities are
//! therefore rejected.
//!
//! Accepted payloads are normalized into [`ItemFields`]: quantity coerced to
//! an integer, price to two-decimal text, description defaulted to `""`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::DbId;

/// Required item fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "category", "quantity", "price"];

/// Largest absolute price that fits the `NUMERIC(10,2)` column, in cents.
const MAX_PRICE_CENTS: u64 = 9_999_999_999;

/// A rejected item payload. The display text is returned verbatim to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Item ID is required")]
    MissingId,

    #[error("Field '{0}' must be text")]
    NotText(&'static str),

    #[error("Field '{0}' must be a number")]
    NotNumeric(&'static str),

    #[error("Field '{0}' is out of range")]
    OutOfRange(&'static str),
}

/// Raw, unvalidated item fields as received in a request body.
#[derive(Debug, Clone, Default)]
pub struct ItemPayload(Map<String, Value>);

impl ItemPayload {
    /// Decode a request body. Malformed JSON and non-object documents yield an
    /// empty payload, so they fail validation like a body with no fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from(value),
            Err(_) => Self::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for ItemPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Normalized mutable fields of an item, ready to be written by a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFields {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    /// Two-decimal fixed-point text, e.g. `"2.99"`.
    pub price: String,
    pub description: String,
}

/// Outcome of reading an item id from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemIdParam {
    Id(DbId),
    /// Present but not an integer; it can never match a stored item.
    Unmatchable,
}

/// Loose emptiness check applied to required fields and ids.
pub fn is_loosely_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
    }
}

/// Read the item id, either from an update body or from the `id` query
/// parameter (wrapped as a JSON string).
pub fn parse_item_id(raw: Option<&Value>) -> Result<ItemIdParam, ValidationError> {
    if is_loosely_empty(raw) {
        return Err(ValidationError::MissingId);
    }
    let id = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<DbId>().ok(),
        _ => None,
    };
    Ok(id.map_or(ItemIdParam::Unmatchable, ItemIdParam::Id))
}

/// Check the required fields in order and normalize the payload.
pub fn normalize_fields(payload: &ItemPayload) -> Result<ItemFields, ValidationError> {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| is_loosely_empty(payload.get(field)))
    {
        return Err(ValidationError::MissingField(missing));
    }

    Ok(ItemFields {
        name: coerce_text("name", payload.get("name"))?,
        category: coerce_text("category", payload.get("category"))?,
        quantity: coerce_quantity(payload.get("quantity"))?,
        price: coerce_price(payload.get("price"))?,
        description: coerce_text("description", payload.get("description"))?,
    })
}

/// Format a price with two decimals, halves rounded away from zero.
///
/// Rounding works on the shortest decimal text of `value`, so `1.005`
/// becomes `"1.01"` even though its binary form is slightly below it.
pub fn format_price(value: f64) -> Result<String, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::OutOfRange("price"));
    }
    let text = value.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let whole: u64 = match whole.parse() {
        Ok(whole) if whole <= MAX_PRICE_CENTS / 100 => whole,
        _ => return Err(ValidationError::OutOfRange("price")),
    };

    let mut digits = fraction.bytes().map(|b| u64::from(b - b'0')).chain(std::iter::repeat(0));
    let (tenths, hundredths, rest) = (
        digits.next().unwrap_or(0),
        digits.next().unwrap_or(0),
        digits.next().unwrap_or(0),
    );
    let cents = whole * 100 + tenths * 10 + hundredths + u64::from(rest >= 5);
    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange("price"));
    }

    // No "-0.00".
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    Ok(format!("{sign}{}.{:02}", cents / 100, cents % 100))
}

fn coerce_text(field: &'static str, value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(true)) => Ok("1".to_string()),
        Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::Array(_) | Value::Object(_)) => Err(ValidationError::NotText(field)),
    }
}

fn coerce_quantity(value: Option<&Value>) -> Result<i32, ValidationError> {
    let quantity = match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => saturate_i32(i),
            None => n.as_f64().unwrap_or(0.0) as i32,
        },
        Some(Value::String(s)) => parse_leading_int(s),
        Some(Value::Bool(b)) => i32::from(*b),
        Some(Value::Array(_) | Value::Object(_)) => {
            return Err(ValidationError::NotNumeric("quantity"))
        }
        None | Some(Value::Null) => 0,
    };
    Ok(quantity)
}

fn coerce_price(value: Option<&Value>) -> Result<String, ValidationError> {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_leading_float(s),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Array(_) | Value::Object(_)) => {
            return Err(ValidationError::NotNumeric("price"))
        }
        None | Some(Value::Null) => 0.0,
    };
    format_price(price)
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Integer value of a string: a full numeric string (including exponent
/// forms such as `"1e3"`) is truncated, otherwise the leading integer prefix
/// is used and anything unparsable becomes 0.
fn parse_leading_int(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return value as i32;
        }
    }
    let prefix = numeric_prefix(trimmed, false);
    match prefix.parse::<i64>() {
        Ok(value) => saturate_i32(value),
        Err(_) if prefix.len() > 1 => {
            if prefix.starts_with('-') {
                i32::MIN
            } else {
                i32::MAX
            }
        }
        Err(_) => 0,
    }
}

/// Float value of the leading decimal prefix of a string, or 0.
fn parse_leading_float(raw: &str) -> f64 {
    numeric_prefix(raw.trim_start(), true)
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Longest prefix of `s` that forms a number: sign, digits and, when
/// `decimal` is set, a fraction and an exponent.
fn numeric_prefix(s: &str, decimal: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if decimal {
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac_end = end + 1;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            if frac_end > end + 1 || has_digits {
                has_digits = has_digits || frac_end > end + 1;
                end = frac_end;
            }
        }
        if has_digits && end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp_end = end + 1;
            if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
                exp_end += 1;
            }
            let exp_digits = exp_end;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            if exp_end > exp_digits {
                end = exp_end;
            }
        }
    }

    if has_digits {
        &s[..end]
    } else {
        ""
    }
}
