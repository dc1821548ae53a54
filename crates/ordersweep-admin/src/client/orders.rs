//! Order listing, lookup, and mutation endpoints.

use std::time::Duration;

use reqwest::Method;
use serde_json::json;

use crate::error::AdminError;
use crate::pagination::{extract_next_link, PageCursor};
use crate::query::OrderQuery;
use crate::types::{NewOrder, Order, OrderResponse, OrdersResponse};

use super::{AdminClient, MAX_PAGES};

/// One page of an order listing plus the cursor for the page after it.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// `None` on the last page.
    pub next: Option<PageCursor>,
}

impl AdminClient {
    /// Fetches one page of orders.
    ///
    /// With `cursor = None` the first page is requested using `query`. With a
    /// cursor, its URL is requested verbatim: it already encodes the filter,
    /// and the platform rejects filter parameters alongside `page_info`.
    ///
    /// # Errors
    ///
    /// - [`AdminError::InvalidUrl`] if the cursor points at another origin.
    /// - [`AdminError::RateLimited`], [`AdminError::NotFound`],
    ///   [`AdminError::Api`] for non-2xx responses (after retries).
    /// - [`AdminError::Deserialize`] if the body is not an orders envelope.
    pub async fn fetch_orders_page(
        &self,
        query: &OrderQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<OrderPage, AdminError> {
        let url = match cursor {
            Some(cursor) => self.same_origin_url(cursor.url())?,
            None => {
                let mut url = self.endpoint("orders.json")?;
                query.apply(&mut url);
                url
            }
        };

        let (response, link_header): (OrdersResponse, _) =
            self.get_json(url, "orders page").await?;

        Ok(OrderPage {
            orders: response.orders,
            next: extract_next_link(link_header.as_deref()),
        })
    }

    /// Fetches every order matching `query`, following cursors until the last
    /// page.
    ///
    /// `inter_request_delay_ms` is slept before every page except the first.
    ///
    /// **All-or-nothing**: a failure on any page discards what was collected
    /// and returns the error. Callers that need partial progress use
    /// [`crate::Sweep`] instead.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_orders_page`].
    /// Returns [`AdminError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn fetch_all_orders(
        &self,
        query: &OrderQuery,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<Order>, AdminError> {
        let mut all_orders: Vec<Order> = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(AdminError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            if page_count > 1 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let page = self.fetch_orders_page(query, cursor.as_ref()).await?;
            tracing::debug!(page = page_count, orders = page.orders.len(), "fetched orders page");
            all_orders.extend(page.orders);

            cursor = page.next;
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_orders)
    }

    /// # Errors
    ///
    /// [`AdminError::NotFound`] for an unknown id, or any transport/API error.
    pub async fn get_order(&self, order_id: i64) -> Result<Order, AdminError> {
        let url = self.endpoint(&format!("orders/{order_id}.json"))?;
        let (response, _): (OrderResponse, _) =
            self.get_json(url, &format!("order {order_id}")).await?;
        Ok(response.order)
    }

    /// Replaces the order's full tag string. The response body is not
    /// inspected; a 2xx status is success.
    ///
    /// # Errors
    ///
    /// Any non-2xx response or transport failure.
    pub async fn update_order_tags(&self, order_id: i64, tags: &str) -> Result<(), AdminError> {
        let url = self.endpoint(&format!("orders/{order_id}.json"))?;
        let body = json!({ "order": { "id": order_id, "tags": tags } });
        self.send_discard(Method::PUT, url, &body).await
    }

    /// Cancels the order, optionally recording a cancellation reason
    /// (`customer`, `fraud`, `inventory`, `declined`, `other`).
    ///
    /// # Errors
    ///
    /// Any non-2xx response (e.g. 422 for an already-cancelled order).
    pub async fn cancel_order(
        &self,
        order_id: i64,
        reason: Option<&str>,
    ) -> Result<Order, AdminError> {
        let url = self.endpoint(&format!("orders/{order_id}/cancel.json"))?;
        let body = match reason {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        };
        let response: OrderResponse = self
            .send_json(Method::POST, url, &body, &format!("cancelled order {order_id}"))
            .await?;
        Ok(response.order)
    }

    /// # Errors
    ///
    /// Any non-2xx response, including 422 validation failures whose detail
    /// carries the platform's `errors` object.
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, AdminError> {
        let url = self.endpoint("orders.json")?;
        let body = json!({ "order": order });
        let response: OrderResponse = self
            .send_json(Method::POST, url, &body, "created order")
            .await?;
        Ok(response.order)
    }
}
