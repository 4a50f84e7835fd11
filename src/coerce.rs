use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::StoreError;

#[cfg(feature = "postgres")]
use tokio_postgres::types::{FromSql, Type};

/// Milliseconds since the Unix epoch for a timestamp read as UTC. No local
/// time-zone shifting happens anywhere in the engine.
#[must_use]
pub fn epoch_millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

/// Inverse of [`epoch_millis`]. Out-of-range inputs clamp to the epoch.
#[must_use]
pub fn from_epoch_millis(ms: i64) -> NaiveDateTime {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

lazy_static! {
    static ref CURRENCY_NOISE: Regex = Regex::new(r"[^0-9.\-]").unwrap();
}

/// Parse a currency rendition such as `"$1,234.56"` by stripping the symbol
/// and group separators.
///
/// # Errors
/// Returns `StoreError::ParameterError` if nothing numeric remains.
pub fn parse_currency(raw: &str) -> Result<f64, StoreError> {
    let cleaned = CURRENCY_NOISE.replace_all(raw, "");
    cleaned
        .parse::<f64>()
        .map_err(|_| StoreError::ParameterError(format!("unparseable currency value: {raw}")))
}

/// Postgres `money` arrives on the binary protocol as an int64 count of
/// cents; the driver has no stock mapping for it, so this wrapper decodes it.
#[cfg(feature = "postgres")]
pub struct MoneyCents(pub i64);

#[cfg(feature = "postgres")]
impl MoneyCents {
    /// Whole currency units.
    #[must_use]
    pub fn to_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for MoneyCents {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let cents = i64::from_sql(&Type::INT8, raw)?;
        Ok(MoneyCents(cents))
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::MONEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_millis_is_utc() {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(epoch_millis(ts), 1_704_067_200_000);
    }

    #[test]
    fn epoch_millis_round_trips() {
        let ms = 1_704_067_200_123;
        assert_eq!(epoch_millis(from_epoch_millis(ms)), ms);
    }

    #[test]
    fn currency_strips_symbol_and_separators() {
        assert_eq!(parse_currency("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_currency("$0.99").unwrap(), 0.99);
        assert_eq!(parse_currency("-$12.00").unwrap(), -12.0);
    }

    #[test]
    fn currency_rejects_non_numeric() {
        assert!(parse_currency("$").is_err());
        assert!(parse_currency("free").is_err());
    }
}
