use serde::Deserialize;

/// A raw form field: browsers post text, JSON clients may post numbers.
/// Anything that does not start with a number reads as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    pub(crate) fn as_decimal(&self) -> f64 {
        match self {
            FormValue::Number(v) if v.is_nan() => 0.0,
            FormValue::Number(v) => *v,
            FormValue::Text(text) => leading_decimal(text),
        }
    }

    pub(crate) fn as_integer(&self) -> i64 {
        match self {
            FormValue::Number(v) => v.trunc() as i64,
            FormValue::Text(text) => leading_integer(text),
        }
    }
}

pub(crate) fn decimal_or_zero(value: Option<&FormValue>) -> f64 {
    value.map(FormValue::as_decimal).unwrap_or(0.0)
}

pub(crate) fn integer_or_zero(value: Option<&FormValue>) -> i64 {
    value.map(FormValue::as_integer).unwrap_or(0)
}

fn scan_digits(bytes: &[u8], mut idx: usize) -> usize {
    while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
        idx += 1;
    }
    idx
}

fn scan_sign(bytes: &[u8], idx: usize) -> usize {
    if matches!(bytes.get(idx), Some(b'+' | b'-')) {
        idx + 1
    } else {
        idx
    }
}

/// Longest numeric prefix of `text`, e.g. `"12.5 per month"` reads as 12.5.
fn leading_decimal(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let int_start = scan_sign(bytes, 0);
    let mut end = scan_digits(bytes, int_start);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = scan_digits(bytes, end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = scan_sign(bytes, end + 1);
        let exp_end = scan_digits(bytes, exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v == 0.0 => 0.0,
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Leading integer digits of `text`, e.g. `"5.7"` reads as 5.
fn leading_integer(text: &str) -> i64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let digits_start = scan_sign(bytes, 0);
    let end = scan_digits(bytes, digits_start);
    if end == digits_start {
        return 0;
    }

    match s[..end].parse::<i64>() {
        Ok(v) => v,
        Err(_) if bytes[0] == b'-' => i64::MIN,
        Err(_) => i64::MAX,
    }
}
