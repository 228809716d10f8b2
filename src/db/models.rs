use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbCredential {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbPayer {
    pub id: i64,
    pub name: Option<String>,
    pub vin: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
}

/// Payer fields as submitted, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPayer {
    pub name: Option<String>,
    pub vin: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbPayment {
    pub id: i64,
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    pub payer_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    pub payer_id: i64,
}

impl NewPayment {
    pub(crate) fn into_stored(self, id: i64) -> DbPayment {
        DbPayment {
            id,
            transaction_id: self.transaction_id,
            date: self.date,
            payer_id: self.payer_id,
        }
    }
}
