use reqwest::Method;
use serde_json::json;

use crate::error::AdminError;
use crate::types::{DraftOrder, DraftOrderInput, DraftOrderResponse};

use super::AdminClient;

impl AdminClient {
    /// # Errors
    ///
    /// Any non-2xx response or transport failure.
    pub async fn create_draft_order(
        &self,
        draft: &DraftOrderInput,
    ) -> Result<DraftOrder, AdminError> {
        let url = self.endpoint("draft_orders.json")?;
        let body = json!({ "draft_order": draft });
        let response: DraftOrderResponse = self
            .send_json(Method::POST, url, &body, "created draft order")
            .await?;
        Ok(response.draft_order)
    }

    /// Converts a draft into a real order. The returned draft carries the new
    /// `order_id`.
    ///
    /// # Errors
    ///
    /// Any non-2xx response or transport failure.
    pub async fn complete_draft_order(&self, draft_id: i64) -> Result<DraftOrder, AdminError> {
        let url = self.endpoint(&format!("draft_orders/{draft_id}/complete.json"))?;
        let response: DraftOrderResponse = self
            .send_json(
                Method::PUT,
                url,
                &json!({}),
                &format!("completed draft order {draft_id}"),
            )
            .await?;
        Ok(response.draft_order)
    }
}
