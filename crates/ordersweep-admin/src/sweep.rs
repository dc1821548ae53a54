//! Bulk paginated mutation over a filtered order listing.
//!
//! A [`Sweep`] walks the listing page by page, asks the [`OrderMutation`]
//! whether each order still needs the change, applies it one call at a time,
//! and records an [`OutcomeRecord`] per attempt. Per-order failures are
//! recorded and the walk continues; a failed page fetch ends the walk with
//! [`SweepStop::FetchFailed`] while keeping every outcome produced so far.

use std::time::Duration;

use futures::future::BoxFuture;
use ordersweep_core::OutcomeRecord;

use crate::client::{AdminClient, MAX_PAGES};
use crate::error::AdminError;
use crate::pagination::PageCursor;
use crate::query::OrderQuery;
use crate::tags::with_tag;
use crate::types::Order;

/// A per-order change applied by a [`Sweep`].
pub trait OrderMutation: Send + Sync {
    /// Pre-check. Orders for which this returns `false` are skipped without
    /// any network call.
    fn needs_update(&self, order: &Order) -> bool;

    /// Performs the change with exactly one request.
    fn apply<'a>(
        &'a self,
        client: &'a AdminClient,
        order: &'a Order,
    ) -> BoxFuture<'a, Result<(), AdminError>>;

    /// Text recorded as the reason of a successful outcome.
    fn describe(&self) -> String;
}

/// Appends one tag to the order's tag string.
#[derive(Debug, Clone)]
pub struct AddTag {
    pub tag: String,
}

impl AddTag {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl OrderMutation for AddTag {
    fn needs_update(&self, order: &Order) -> bool {
        with_tag(&order.tags, &self.tag).is_some()
    }

    fn apply<'a>(
        &'a self,
        client: &'a AdminClient,
        order: &'a Order,
    ) -> BoxFuture<'a, Result<(), AdminError>> {
        Box::pin(async move {
            match with_tag(&order.tags, &self.tag) {
                Some(tags) => client.update_order_tags(order.id, &tags).await,
                None => Ok(()),
            }
        })
    }

    fn describe(&self) -> String {
        format!("added tag {}", self.tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    /// Upper bound on update attempts per run. Skipped orders do not count.
    pub max_updates: Option<usize>,
    /// Pause before every page fetch after the first.
    pub inter_request_delay_ms: u64,
    pub max_pages: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            max_updates: None,
            inter_request_delay_ms: 0,
            max_pages: MAX_PAGES,
        }
    }
}

/// Why a sweep stopped.
#[derive(Debug)]
pub enum SweepStop {
    /// The listing ran out: an empty page or no next cursor.
    Exhausted,
    /// `max_updates` attempts were made.
    CapReached { cap: usize },
    PageLimit { max_pages: usize },
    /// Fetching page number `page` (1-based) failed.
    FetchFailed { page: usize, error: AdminError },
}

impl SweepStop {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, SweepStop::FetchFailed { .. } | SweepStop::PageLimit { .. })
    }
}

impl std::fmt::Display for SweepStop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepStop::Exhausted => write!(f, "no more orders"),
            SweepStop::CapReached { cap } => write!(f, "update cap of {cap} reached"),
            SweepStop::PageLimit { max_pages } => write!(f, "stopped after {max_pages} pages"),
            SweepStop::FetchFailed { page, error } => {
                write!(f, "fetching page {page} failed: {error}")
            }
        }
    }
}

#[derive(Debug)]
pub struct SweepReport {
    /// One record per attempted update, in attempt order.
    pub outcomes: Vec<OutcomeRecord>,
    /// Pages fetched successfully.
    pub pages: usize,
    pub seen: usize,
    pub skipped: usize,
    pub stop: SweepStop,
}

impl SweepReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

pub struct Sweep<'c> {
    client: &'c AdminClient,
    query: OrderQuery,
    options: SweepOptions,
}

impl<'c> Sweep<'c> {
    #[must_use]
    pub fn new(client: &'c AdminClient, query: OrderQuery, options: SweepOptions) -> Self {
        Self {
            client,
            query,
            options,
        }
    }

    /// Runs the sweep to completion. Never returns an error: fetch failures
    /// end up in [`SweepReport::stop`].
    pub async fn run<M: OrderMutation + ?Sized>(&self, mutation: &M) -> SweepReport {
        let mut outcomes: Vec<OutcomeRecord> = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut pages = 0usize;
        let mut seen = 0usize;
        let mut skipped = 0usize;

        let stop = 'pages: loop {
            if pages >= self.options.max_pages {
                break SweepStop::PageLimit {
                    max_pages: self.options.max_pages,
                };
            }

            if pages > 0 && self.options.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.options.inter_request_delay_ms))
                    .await;
            }

            let page = match self.client.fetch_orders_page(&self.query, cursor.as_ref()).await {
                Ok(page) => page,
                Err(error) => {
                    tracing::error!(page = pages + 1, error = %error, "failed to fetch orders page");
                    break SweepStop::FetchFailed {
                        page: pages + 1,
                        error,
                    };
                }
            };
            pages += 1;
            tracing::info!(page = pages, orders = page.orders.len(), "fetched orders page");

            if page.orders.is_empty() {
                break SweepStop::Exhausted;
            }

            for order in &page.orders {
                seen += 1;

                if !mutation.needs_update(order) {
                    tracing::debug!(order_id = order.id, "already up to date, skipping");
                    skipped += 1;
                    continue;
                }

                // Only reachable before any attempt, with `max_updates = Some(0)`.
                if let Some(cap) = self.cap_reached(outcomes.len()) {
                    break 'pages SweepStop::CapReached { cap };
                }

                let outcome = match mutation.apply(self.client, order).await {
                    Ok(()) => {
                        tracing::info!(order_id = order.id, "order updated");
                        OutcomeRecord::updated(order.id, mutation.describe())
                    }
                    Err(error) => {
                        tracing::warn!(
                            order_id = order.id,
                            status = ?error.status(),
                            error = %error,
                            "order update failed"
                        );
                        OutcomeRecord::failed(order.id, error.to_string())
                    }
                };
                outcomes.push(outcome);

                // Stop here rather than at the next eligible order, so a met cap
                // never costs another page fetch.
                if let Some(cap) = self.cap_reached(outcomes.len()) {
                    break 'pages SweepStop::CapReached { cap };
                }
            }

            tracing::debug!(
                next_page_info = ?page.next.as_ref().and_then(PageCursor::page_info),
                "page done"
            );
            cursor = page.next;
            if cursor.is_none() {
                break SweepStop::Exhausted;
            }
        };

        SweepReport {
            outcomes,
            pages,
            seen,
            skipped,
            stop,
        }
    }

    fn cap_reached(&self, attempted: usize) -> Option<usize> {
        let cap = self.options.max_updates?;
        if attempted >= cap {
            tracing::info!(cap, "update cap reached");
            Some(cap)
        } else {
            None
        }
    }
}
