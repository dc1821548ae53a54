//! Integration tests for `Sweep` against a mocked Admin API.
//!
//! Covers termination, the idempotent pre-check, per-order failure
//! containment, the update cap, and fetch-failure reporting.

use ordersweep_admin::{
    extract_next_link, AddTag, AdminClient, AdminError, OrderQuery, Sweep, SweepOptions,
    SweepStop,
};
use ordersweep_core::{AdminEndpoint, OutcomeStatus};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/admin/api/2023-01";
const FROM_TAG: &str = "silicone_fix";
const NEW_TAG: &str = "antislip_1000_Oct_2024";

fn test_client(server: &MockServer) -> AdminClient {
    let endpoint = AdminEndpoint {
        base_url: format!("{}{API}", server.uri()),
        access_token: "shpat_test".to_owned(),
    };
    AdminClient::new(&endpoint, 5, 0, 0).expect("failed to build test AdminClient")
}

fn query() -> OrderQuery {
    OrderQuery::default()
        .with_tag(FROM_TAG)
        .with_fields(&["id", "tags"])
}

fn orders_body(orders: &[(i64, &str)]) -> Value {
    let orders: Vec<Value> = orders
        .iter()
        .map(|(id, tags)| json!({ "id": id, "tags": tags }))
        .collect();
    json!({ "orders": orders })
}

fn next_link(server: &MockServer, page_info: &str) -> String {
    format!(
        "<{}{API}/orders.json?limit=250&page_info={page_info}>; rel=\"next\"",
        server.uri()
    )
}

/// Serves the unfiltered first page. Mount after cursor pages so the
/// `page_info` mocks take precedence.
async fn mount_first_page(server: &MockServer, orders: &[(i64, &str)], next: Option<&str>) {
    let mut response = ResponseTemplate::new(200).set_body_json(orders_body(orders));
    if let Some(page_info) = next {
        response = response.insert_header("Link", next_link(server, page_info).as_str());
    }
    Mock::given(method("GET"))
        .and(path(format!("{API}/orders.json")))
        .and(query_param("tag", FROM_TAG))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_cursor_page(
    server: &MockServer,
    page_info: &str,
    orders: &[(i64, &str)],
    next: Option<&str>,
) {
    let mut response = ResponseTemplate::new(200).set_body_json(orders_body(orders));
    if let Some(page_info) = next {
        response = response.insert_header("Link", next_link(server, page_info).as_str());
    }
    Mock::given(method("GET"))
        .and(path(format!("{API}/orders.json")))
        .and(query_param("page_info", page_info))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_update(server: &MockServer, order_id: i64, status: u16, times: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("{API}/orders/{order_id}.json")))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn stops_at_first_empty_page() {
    let server = MockServer::start().await;

    mount_cursor_page(&server, "p3", &[], Some("p4")).await;
    mount_cursor_page(&server, "p2", &[(3, FROM_TAG), (4, FROM_TAG)], Some("p3")).await;
    mount_first_page(&server, &[(1, FROM_TAG), (2, FROM_TAG)], Some("p2")).await;
    for id in 1..=4 {
        mount_update(&server, id, 200, 1).await;
    }

    let client = test_client(&server);
    let report = Sweep::new(&client, query(), SweepOptions::default())
        .run(&AddTag::new(NEW_TAG))
        .await;

    let ids: Vec<i64> = report.outcomes.iter().map(|o| o.order_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(report.pages, 3, "p4 must never be requested");
    assert!(matches!(report.stop, SweepStop::Exhausted));
}

#[tokio::test]
async fn stops_when_no_next_cursor() {
    let server = MockServer::start().await;

    mount_first_page(&server, &[(1, FROM_TAG)], None).await;
    mount_update(&server, 1, 200, 1).await;

    let client = test_client(&server);
    let report = Sweep::new(&client, query(), SweepOptions::default())
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.pages, 1);
    assert_eq!(report.updated_count(), 1);
    assert!(matches!(report.stop, SweepStop::Exhausted));
}

#[tokio::test]
async fn orders_already_tagged_get_no_update_call() {
    let server = MockServer::start().await;

    mount_first_page(
        &server,
        &[(1, FROM_TAG), (2, "silicone_fix, antislip_1000_Oct_2024")],
        None,
    )
    .await;
    mount_update(&server, 1, 200, 1).await;
    mount_update(&server, 2, 200, 0).await;

    let client = test_client(&server);
    let report = Sweep::new(&client, query(), SweepOptions::default())
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.seen, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.attempted(), 1);
    assert_eq!(report.outcomes[0].order_id, 1);
}

#[tokio::test]
async fn one_failed_update_does_not_stop_the_rest() {
    let server = MockServer::start().await;

    mount_first_page(&server, &[(1, FROM_TAG), (2, FROM_TAG), (3, FROM_TAG)], None).await;
    mount_update(&server, 1, 200, 1).await;
    mount_update(&server, 2, 422, 1).await;
    mount_update(&server, 3, 200, 1).await;

    let client = test_client(&server);
    let report = Sweep::new(&client, query(), SweepOptions::default())
        .run(&AddTag::new(NEW_TAG))
        .await;

    let statuses: Vec<(i64, OutcomeStatus)> = report
        .outcomes
        .iter()
        .map(|o| (o.order_id, o.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (1, OutcomeStatus::Updated),
            (2, OutcomeStatus::Failed),
            (3, OutcomeStatus::Updated),
        ]
    );
    assert!(report.outcomes[1].reason.contains("422"));
    assert!(matches!(report.stop, SweepStop::Exhausted));
}

#[tokio::test]
async fn cap_limits_update_calls_across_pages() {
    let server = MockServer::start().await;

    mount_cursor_page(&server, "p2", &[(4, FROM_TAG), (5, FROM_TAG)], None).await;
    mount_first_page(&server, &[(1, FROM_TAG), (2, FROM_TAG), (3, FROM_TAG)], Some("p2")).await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/admin/api/2023-01/orders/\d+\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let options = SweepOptions {
        max_updates: Some(2),
        ..SweepOptions::default()
    };
    let report = Sweep::new(&client, query(), options)
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.attempted(), 2);
    assert!(matches!(report.stop, SweepStop::CapReached { cap: 2 }));
}

#[tokio::test]
async fn skipped_orders_do_not_count_toward_cap() {
    let server = MockServer::start().await;

    mount_first_page(
        &server,
        &[(1, "silicone_fix, antislip_1000_Oct_2024"), (2, FROM_TAG)],
        None,
    )
    .await;
    mount_update(&server, 2, 200, 1).await;

    let client = test_client(&server);
    let options = SweepOptions {
        max_updates: Some(1),
        ..SweepOptions::default()
    };
    let report = Sweep::new(&client, query(), options)
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.attempted(), 1);
    assert_eq!(report.outcomes[0].order_id, 2);
    assert_eq!(report.skipped, 1);
    assert!(matches!(report.stop, SweepStop::CapReached { cap: 1 }));
}

#[tokio::test]
async fn cap_met_on_last_order_of_page_does_not_fetch_next_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/orders.json")))
        .and(query_param("page_info", "p2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(0)
        .mount(&server)
        .await;
    mount_first_page(&server, &[(1, FROM_TAG), (2, FROM_TAG)], Some("p2")).await;
    mount_update(&server, 1, 200, 1).await;
    mount_update(&server, 2, 200, 1).await;

    let client = test_client(&server);
    let options = SweepOptions {
        max_updates: Some(2),
        ..SweepOptions::default()
    };
    let report = Sweep::new(&client, query(), options)
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.attempted(), 2);
    assert_eq!(report.pages, 1);
    assert!(matches!(report.stop, SweepStop::CapReached { cap: 2 }));
    assert!(!report.stop.is_failure());
}

#[tokio::test]
async fn fetch_failure_is_reported_and_keeps_earlier_outcomes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/orders.json")))
        .and(query_param("page_info", "p2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;
    mount_first_page(&server, &[(1, FROM_TAG)], Some("p2")).await;
    mount_update(&server, 1, 200, 1).await;

    let client = test_client(&server);
    let report = Sweep::new(&client, query(), SweepOptions::default())
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.updated_count(), 1);
    assert_eq!(report.pages, 1);
    match report.stop {
        SweepStop::FetchFailed { page, error } => {
            assert_eq!(page, 2);
            assert!(matches!(error, AdminError::Api { status: 503, .. }));
        }
        other => panic!("expected FetchFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn page_limit_stops_a_cycling_cursor() {
    let server = MockServer::start().await;

    mount_cursor_page(&server, "loop", &[(2, NEW_TAG)], Some("loop")).await;
    mount_first_page(&server, &[(1, NEW_TAG)], Some("loop")).await;

    let client = test_client(&server);
    let options = SweepOptions {
        max_pages: 3,
        ..SweepOptions::default()
    };
    let report = Sweep::new(&client, query(), options)
        .run(&AddTag::new(NEW_TAG))
        .await;

    assert_eq!(report.pages, 3);
    assert_eq!(report.skipped, 3);
    assert!(matches!(report.stop, SweepStop::PageLimit { max_pages: 3 }));
}

#[test]
fn link_header_yields_only_the_next_entry() {
    let header = "<https://shop.myshopify.com/admin/api/2023-01/orders.json?page_info=PREV>; rel=\"previous\", \
                  <https://shop.myshopify.com/admin/api/2023-01/orders.json?page_info=NEXT>; rel=\"next\"";
    let cursor = extract_next_link(Some(header)).expect("next entry present");
    assert_eq!(cursor.page_info().as_deref(), Some("NEXT"));

    let only_prev =
        "<https://shop.myshopify.com/admin/api/2023-01/orders.json?page_info=PREV>; rel=\"previous\"";
    assert!(extract_next_link(Some(only_prev)).is_none());
}
