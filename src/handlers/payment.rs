use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use tracing::{info, warn};

use crate::db::NewPayment;
use crate::templates::DOWNLOAD;
use crate::types::forms::{
    CompletePaymentForm, PayerForm, TransactionId, parse_payer_id, parse_payment_date,
};
use crate::types::views::DownloadPage;
use crate::{PaygateError, router::PaygateState};

/// POST /payment -> stores the intake form as a payer and moves on to completion.
pub async fn submit_payer(
    State(state): State<PaygateState>,
    Form(form): Form<PayerForm>,
) -> Result<Redirect, PaygateError> {
    let id = state.storage.insert_payer(form.into()).await?;
    info!(payer_id = id, "payer saved");
    Ok(Redirect::to(&format!("/payment/{id}")))
}

/// POST /complete-payment -> stores the payment, then renders and writes the receipt.
///
/// The payment row is kept even if receipt generation fails afterwards.
pub async fn complete_payment(
    State(state): State<PaygateState>,
    Form(form): Form<CompletePaymentForm>,
) -> Result<Html<String>, PaygateError> {
    let transaction_id = TransactionId::parse(&form.transaction_id)?;
    let date = parse_payment_date(&form.date)?;
    let payer_id = parse_payer_id(&form.user_id)?;

    let earlier = state.storage.list_payments(transaction_id.as_str()).await?;
    if !earlier.is_empty() {
        warn!(
            transaction_id = transaction_id.as_str(),
            earlier = earlier.len(),
            "transaction id already recorded; its receipt will be overwritten"
        );
    }

    let payment = state
        .storage
        .insert_payment(NewPayment {
            transaction_id: transaction_id.into_inner(),
            date,
            payer_id,
        })
        .await?;
    info!(
        payment_id = payment.id,
        transaction_id = %payment.transaction_id,
        payer_id,
        "payment saved"
    );

    let payer = state.storage.find_payer(payer_id).await?;
    if payer.is_none() {
        warn!(payer_id, transaction_id = %payment.transaction_id, "payer not found; receipt fields left blank");
    }

    let receipt_path = state.receipts.issue(payer.as_ref(), &payment).await?;
    let html = state
        .templates
        .render(DOWNLOAD, DownloadPage { receipt_path })
        .map_err(PaygateError::Render)?;
    Ok(Html(html))
}
