use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::db::{DbPayer, DbPayment};
use crate::error::PaygateError;
use crate::service::font::ReceiptFont;
use crate::service::pdf::html_to_pdf;
use crate::templates::{RECEIPT, Templates};
use crate::types::views::ReceiptView;

/// URL prefix under which the receipts directory is served.
pub const RECEIPTS_ROUTE: &str = "/receipts";

/// Renders receipts to PDF files named `<transaction_id>.pdf` under one directory.
#[derive(Clone)]
pub struct ReceiptService {
    templates: Arc<Templates>,
    font: ReceiptFont,
    dir: PathBuf,
}

impl ReceiptService {
    pub fn new(templates: Arc<Templates>, font: ReceiptFont, dir: impl Into<PathBuf>) -> Self {
        Self {
            templates,
            font,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, transaction_id: &str) -> PathBuf {
        self.dir.join(format!("{transaction_id}.pdf"))
    }

    /// Render, convert and write the receipt. Returns the URL it is served at.
    ///
    /// `payment.transaction_id` must already be a validated file-safe id.
    pub async fn issue(
        &self,
        payer: Option<&DbPayer>,
        payment: &DbPayment,
    ) -> Result<String, PaygateError> {
        let html = self
            .templates
            .render(RECEIPT, ReceiptView::new(payer, payment))
            .map_err(PaygateError::ReceiptRender)?;
        let font = self.font.clone();
        let pdf = tokio::task::spawn_blocking(move || html_to_pdf(&html, &font)).await??;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(PaygateError::ReceiptWrite)?;
        let path = self.file_path(&payment.transaction_id);
        tokio::fs::write(&path, &pdf)
            .await
            .map_err(PaygateError::ReceiptWrite)?;

        info!(
            transaction_id = %payment.transaction_id,
            path = %path.display(),
            bytes = pdf.len(),
            "receipt written"
        );
        Ok(receipt_url(&payment.transaction_id))
    }
}

pub fn receipt_url(transaction_id: &str) -> String {
    format!("{RECEIPTS_ROUTE}/{transaction_id}.pdf")
}
