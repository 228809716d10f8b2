use serde::Serialize;

use crate::db::{DbPayer, DbPayment};

#[derive(Debug, Default, Serialize)]
pub struct PayPage {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadPage {
    pub receipt_path: String,
}

/// Receipt template context. A missing payer renders as blank fields.
#[derive(Debug, Serialize)]
pub struct ReceiptView {
    pub user: PayerView,
    pub payment: PaymentView,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PayerView {
    pub id: String,
    pub name: String,
    pub vin: String,
    pub email: String,
    pub contact: String,
    pub payment_method: String,
    pub amount: String,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct PaymentView {
    pub transaction_id: String,
    pub date: String,
}

impl ReceiptView {
    pub fn new(payer: Option<&DbPayer>, payment: &DbPayment) -> Self {
        Self {
            user: payer.map(PayerView::from).unwrap_or_default(),
            payment: PaymentView::from(payment),
        }
    }
}

impl From<&DbPayer> for PayerView {
    fn from(p: &DbPayer) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id: p.id.to_string(),
            name: text(&p.name),
            vin: text(&p.vin),
            email: text(&p.email),
            contact: text(&p.contact),
            payment_method: text(&p.payment_method),
            amount: p.amount.map(|a| a.to_string()).unwrap_or_default(),
        }
    }
}

impl From<&DbPayment> for PaymentView {
    fn from(p: &DbPayment) -> Self {
        Self {
            transaction_id: p.transaction_id.clone(),
            date: p.date.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn payment() -> DbPayment {
        DbPayment {
            id: 1,
            transaction_id: "TX-9".into(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap(),
            payer_id: 7,
        }
    }

    #[test]
    fn missing_payer_renders_blank() {
        let view = ReceiptView::new(None, &payment());
        assert_eq!(view.user, PayerView::default());
        assert_eq!(view.payment.date, "2024-05-01 09:15 UTC");
    }

    #[test]
    fn whole_amounts_print_without_fraction() {
        let payer = DbPayer {
            id: 7,
            name: Some("Ada".into()),
            vin: None,
            email: None,
            contact: None,
            payment_method: Some("card".into()),
            amount: Some(100.0),
        };
        let view = ReceiptView::new(Some(&payer), &payment());
        assert_eq!(view.user.amount, "100");
        assert_eq!(view.user.vin, "");
        assert_eq!(view.user.id, "7");
    }
}
