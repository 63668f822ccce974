//! Display formatting for report fields
//!
//! Currency labels and call duration labels shown to subscribers. These are
//! presentation concerns only; stored prices keep their decimal value.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency display settings (defaults to Brazilian real)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Currency symbol placed before the amount
    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,
}

fn default_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_separator() -> char {
    ','
}

fn default_thousands_separator() -> char {
    '.'
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl CurrencyFormat {
    /// Render an amount rounded to cents, e.g. `R$ 1.234,56`
    pub fn format(&self, amount: Decimal) -> String {
        let mut cents = amount.round_dp(2);
        cents.rescale(2);

        let sign = if cents.is_sign_negative() && !cents.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = cents.abs().to_string();
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        format!(
            "{}{} {}{}{}",
            sign,
            self.symbol,
            self.group_thousands(int_part),
            self.decimal_separator,
            frac_part
        )
    }

    fn group_thousands(&self, int_part: &str) -> String {
        let len = int_part.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// Render a call duration as `{hours}h{minutes}m{seconds}s`
pub fn duration_label(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}h{}m{}s", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_format_default() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(dec!(4.86)), "R$ 4,86");
        assert_eq!(fmt.format(dec!(0.36)), "R$ 0,36");
        assert_eq!(fmt.format(dec!(86.85)), "R$ 86,85");
        assert_eq!(fmt.format(dec!(11.16)), "R$ 11,16");
    }

    #[test]
    fn test_currency_format_pads_and_groups() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(fmt.format(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(fmt.format(dec!(0)), "R$ 0,00");
        assert_eq!(fmt.format(dec!(100)), "R$ 100,00");
    }

    #[test]
    fn test_currency_format_custom() {
        let fmt = CurrencyFormat {
            symbol: "US$".to_string(),
            decimal_separator: '.',
            thousands_separator: ',',
        };
        assert_eq!(fmt.format(dec!(1234.5)), "US$ 1,234.50");
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(duration_label(Duration::seconds(50 * 60 + 36)), "0h50m36s");
        assert_eq!(
            duration_label(Duration::seconds(7 * 3600 + 59 * 60 + 59)),
            "7h59m59s"
        );
        assert_eq!(duration_label(Duration::hours(2)), "2h0m0s");
        assert_eq!(duration_label(Duration::zero()), "0h0m0s");
    }
}
