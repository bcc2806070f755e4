//! Integration tests for the checkout draft.

use std::sync::Arc;

use pocketshop_client_state::{CheckoutForm, KeyValueStore, MemoryStore, keys};
use pocketshop_integration_tests::state_over;

#[tokio::test]
async fn test_empty_fields_absent_from_persisted_draft() {
    let kv = Arc::new(MemoryStore::new());
    let state = state_over(kv.clone());

    let form = CheckoutForm {
        full_name: "A".to_string(),
        email: String::new(),
        phone: "123".to_string(),
        landmark: "Clock tower".to_string(),
        notes: "Gift, no invoice".to_string(),
        ..CheckoutForm::default()
    };
    state.checkout().save(&form).await;

    let raw = kv
        .get(keys::CHECKOUT_DRAFT)
        .await
        .expect("read")
        .expect("draft persisted");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let object = value.as_object().expect("object");

    assert_eq!(object.get("fullName"), Some(&serde_json::json!("A")));
    assert_eq!(object.get("phone"), Some(&serde_json::json!("123")));
    assert!(!object.contains_key("email"));
    assert!(!object.contains_key("notes"));
    assert_eq!(object.len(), 3);
}

#[tokio::test]
async fn test_draft_prefills_next_checkout() {
    let state = state_over(Arc::new(MemoryStore::new()));
    assert!(state.checkout().get().await.is_empty());

    let form = CheckoutForm {
        full_name: "Ada".to_string(),
        address: "12 Analytical Row".to_string(),
        ..CheckoutForm::default()
    };
    state.checkout().save(&form).await;

    let prefilled = state.checkout().get().await.to_form();
    assert_eq!(prefilled, form);

    state.checkout().clear().await;
    assert!(state.checkout().get().await.is_empty());
}
