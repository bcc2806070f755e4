//! Integration tests for the bounded scan history.

use pocketshop_client_state::{DEFAULT_SCAN_HISTORY_LIMIT, NewScan};
use pocketshop_core::OrderData;
use pocketshop_integration_tests::memory_state;

#[tokio::test]
async fn test_never_exceeds_limit_and_evicts_oldest() {
    let state = memory_state();
    let scans = state.scans();

    for n in 0..=DEFAULT_SCAN_HISTORY_LIMIT {
        let items = scans.add(NewScan::new(format!("TRK{n:03}"))).await.expect("add");
        assert!(items.len() <= DEFAULT_SCAN_HISTORY_LIMIT);
    }

    let items = scans.list().await;
    assert_eq!(items.len(), DEFAULT_SCAN_HISTORY_LIMIT);
    assert_eq!(
        items.first().map(|i| i.tracking_code.as_str()),
        Some("TRK050")
    );
    assert_eq!(
        items.last().map(|i| i.tracking_code.as_str()),
        Some("TRK001")
    );
    assert!(scans.get("TRK000").await.is_none());
}

#[tokio::test]
async fn test_rescan_keeps_length_and_refreshes_time() {
    let state = memory_state();
    let scans = state.scans();
    scans.add(NewScan::new("TRK1")).await.expect("add");
    scans.add(NewScan::new("TRK2")).await.expect("add");
    let before = scans.get("TRK1").await.expect("present");

    let items = scans.add(NewScan::new("TRK1")).await.expect("add");
    assert_eq!(items.len(), 2);

    let after = scans.get("TRK1").await.expect("present");
    assert!(after.scanned_at > before.scanned_at);
}

#[tokio::test]
async fn test_enrich_then_lookup() {
    let state = memory_state();
    let scans = state.scans();
    scans.add(NewScan::new("TRK9")).await.expect("add");

    let order: OrderData = serde_json::from_str(
        r#"{
            "orderNumber": 1009,
            "fulfillmentStatus": "out_for_delivery",
            "shippingAddress": {"name": "Grace Hopper", "city": "Arlington"}
        }"#,
    )
    .expect("order json");
    scans.enrich_with_order_data("TRK9", order).await;

    let item = scans.get("TRK9").await.expect("present");
    assert_eq!(item.order_id.as_deref(), Some("1009"));
    assert_eq!(item.customer_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(item.status.as_deref(), Some("out_for_delivery"));

    let unknown = scans
        .enrich_with_order_data("NOPE", OrderData::default())
        .await;
    assert_eq!(unknown.len(), 1);
}
