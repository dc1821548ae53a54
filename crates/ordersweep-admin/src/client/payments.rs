use reqwest::Method;
use serde_json::json;

use crate::error::AdminError;
use crate::types::{Refund, RefundRequest, RefundResponse, Transaction, TransactionsResponse};

use super::AdminClient;

impl AdminClient {
    /// Lists the order's payment transactions in creation order.
    ///
    /// # Errors
    ///
    /// Any non-2xx response or transport failure.
    pub async fn list_transactions(&self, order_id: i64) -> Result<Vec<Transaction>, AdminError> {
        let url = self.endpoint(&format!("orders/{order_id}/transactions.json"))?;
        let (response, _): (TransactionsResponse, _) = self
            .get_json(url, &format!("transactions of order {order_id}"))
            .await?;
        Ok(response.transactions)
    }

    /// # Errors
    ///
    /// Any non-2xx response, e.g. 422 when the amount exceeds what is
    /// refundable.
    pub async fn create_refund(
        &self,
        order_id: i64,
        refund: &RefundRequest,
    ) -> Result<Refund, AdminError> {
        let url = self.endpoint(&format!("orders/{order_id}/refunds.json"))?;
        let body = json!({ "refund": refund });
        let response: RefundResponse = self
            .send_json(Method::POST, url, &body, &format!("refund of order {order_id}"))
            .await?;
        Ok(response.refund)
    }
}
