use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::db::NewPayer;
use crate::error::PaygateError;

const MAX_TRANSACTION_ID_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Payment-intake submission. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerForm {
    pub name: Option<String>,
    pub vin: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub amount: Option<f64>,
}

impl From<PayerForm> for NewPayer {
    fn from(f: PayerForm) -> Self {
        Self {
            name: f.name,
            vin: f.vin,
            email: f.email,
            contact: f.contact,
            payment_method: f.payment_method,
            amount: f.amount,
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let amount: f64 = s.parse().map_err(serde::de::Error::custom)?;
            if !amount.is_finite() {
                return Err(serde::de::Error::custom("amount must be a finite number"));
            }
            Ok(Some(amount))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentForm {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub user_id: String,
}

/// A transaction id that is safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn parse(raw: &str) -> Result<Self, PaygateError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(PaygateError::BadRequest("missing transaction id".into()));
        }
        let valid = id.len() <= MAX_TRANSACTION_ID_LEN
            && !id.starts_with('.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PaygateError::BadRequest("invalid transaction id".into()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) or a bare `YYYY-MM-DD`.
pub fn parse_payment_date(raw: &str) -> Result<DateTime<Utc>, PaygateError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| PaygateError::BadRequest("invalid payment date".into()))
}

pub fn parse_payer_id(raw: &str) -> Result<i64, PaygateError> {
    raw.trim()
        .parse()
        .map_err(|_| PaygateError::BadRequest("invalid user id".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Form;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use chrono::TimeZone;

    #[test]
    fn transaction_ids_must_be_file_safe() {
        assert_eq!(TransactionId::parse(" TX-2024_01.a ").unwrap().as_str(), "TX-2024_01.a");

        let too_long = "x".repeat(129);
        for bad in ["", "   ", "../etc/passwd", "a/b", ".hidden", "tx id", too_long.as_str()] {
            assert!(
                matches!(TransactionId::parse(bad), Err(PaygateError::BadRequest(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn payment_dates_accept_form_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_payment_date("2024-05-01").unwrap(), midnight);

        let local = Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap();
        assert_eq!(parse_payment_date("2024-05-01T09:15").unwrap(), local);
        assert_eq!(parse_payment_date("2024-05-01T11:15:00+02:00").unwrap(), local);

        assert!(parse_payment_date("yesterday").is_err());
        assert!(parse_payment_date("").is_err());
    }

    #[test]
    fn payer_id_must_be_numeric() {
        assert_eq!(parse_payer_id("17").unwrap(), 17);
        assert!(parse_payer_id("665f1c2e9b1e8a3d4c5b6a79").is_err());
    }

    #[tokio::test]
    async fn unknown_intake_fields_are_ignored_and_blank_amount_is_absent() {
        let form = decode_form("name=Ada&amount=&favouriteColour=green&paymentMethod=card").await;
        assert_eq!(form.name.as_deref(), Some("Ada"));
        assert_eq!(form.payment_method.as_deref(), Some("card"));
        assert_eq!(form.amount, None);

        let form = decode_form("amount=100").await;
        assert_eq!(form.amount, Some(100.0));
    }

    async fn decode_form(body: &str) -> PayerForm {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let Form(form) = Form::<PayerForm>::from_request(req, &()).await.unwrap();
        form
    }
}
