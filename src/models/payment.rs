//! Completed payment records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable record of a completed transaction.
///
/// `amount` is carried as stored text: the Supabase bot keeps amounts with
/// currency decoration ("199 RUB"), so numeric parsing happens only where
/// aggregation needs it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub telegram_user_id: i64,
    pub payment_date: DateTime<Utc>,
    /// Gross amount as stored
    pub amount: Option<String>,
    /// Net amount after provider fees
    #[serde(default)]
    pub amount_net: Option<String>,
    /// Subscription days granted
    #[serde(default)]
    pub duration: Option<i32>,
    /// Subscription expiry this payment resulted in
    #[serde(default)]
    pub pro_before: Option<NaiveDate>,
    #[serde(default)]
    pub pro_label: Option<String>,
    /// Payment source (provider / promo / manual)
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Numeric value of a stored amount, ignoring currency decoration.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_strips_currency() {
        assert_eq!(parse_amount(Some("199 RUB")), 199.0);
        assert_eq!(parse_amount(Some("1499.50")), 1499.5);
        assert_eq!(parse_amount(Some("free")), 0.0);
        assert_eq!(parse_amount(None), 0.0);
    }
}
