//! Filter parameters for `GET orders.json`.

use std::str::FromStr;

use ordersweep_core::MAX_PAGE_SIZE;
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Any,
    Open,
    Closed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Any => "any",
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(OrderStatus::Any),
            "open" => Ok(OrderStatus::Open),
            "closed" => Ok(OrderStatus::Closed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!(
                "unknown order status '{other}'; expected any, open, closed, or cancelled"
            )),
        }
    }
}

/// Remote-side filter for an order listing: status, tag, field projection,
/// and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: OrderStatus,
    pub tag: Option<String>,
    pub fields: Vec<String>,
    pub limit: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: OrderStatus::Any,
            tag: None,
            fields: Vec::new(),
            limit: MAX_PAGE_SIZE,
        }
    }
}

impl OrderQuery {
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Page size actually sent, clamped to `1..=250`.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Appends this filter to `url`'s query string.
    pub fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("status", self.status.as_str());
        pairs.append_pair("limit", &self.effective_limit().to_string());
        if !self.fields.is_empty() {
            pairs.append_pair("fields", &self.fields.join(","));
        }
        if let Some(tag) = &self.tag {
            pairs.append_pair("tag", tag);
        }
    }
}
