use polars::prelude::*;

/// Round a monetary value down to two decimal places.
///
/// Truncation toward negative infinity at the cent boundary: 19.999 becomes
/// 19.99 and -0.001 becomes -0.01. Applied per row before any aggregation,
/// so summed totals equal the sum of the displayed cent values.
pub fn floor_currency(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Element-wise `floor_currency` as a polars expression.
pub fn floor_currency_expr(expr: Expr) -> Expr {
    (expr * lit(100.0)).floor() / lit(100.0)
}

/// Format a currency amount as `$1,234.56`.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("$-{grouped}.{frac:02}")
    } else {
        format!("${grouped}.{frac:02}")
    }
}
