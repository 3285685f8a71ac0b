mod common;

use common::{
    Method, MockHttp, SIGNATURE_URL, StubUploader, USER_ID, backend_with_wallet, design_json,
    product_json, service_order_json, sketch_json,
};
use greenspace_client::fetcher::FetchedResource;
use greenspace_client::{
    ClientError, DispatchAction, DispatchStep, OrderAction, OrderFetcher, PaymentPolicy,
    ServiceOrderActions, ServiceOrderStatus, ServiceOrderView, WalletContext,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const ORDER_PATH: &str = "ServiceOrder/so-1";
const STATUS_PATH: &str = "ServiceOrder/status/so-1";

fn actions(mock: &MockHttp) -> ServiceOrderActions<MockHttp> {
    let http = Arc::new(mock.clone());
    let wallet = WalletContext::new(Arc::clone(&http), USER_ID, Duration::from_secs(30));
    ServiceOrderActions::new(http, wallet, PaymentPolicy::default())
        .with_uploader(Arc::new(StubUploader))
}

async fn load(mock: &MockHttp) -> ServiceOrderView {
    let view = OrderFetcher::new(Arc::new(mock.clone()))
        .service_order("so-1")
        .await
        .unwrap();
    mock.clear_requests();
    view
}

// ============================================================================
// Fetcher
// ============================================================================

#[tokio::test]
async fn test_fetch_collects_partial_failures() {
    let mock = MockHttp::new();
    let mut order = service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0);
    order["serviceOrderDetails"] = json!([
        { "productId": "p-1", "quantity": 2, "price": 150000, "totalPrice": 300000 },
        { "productId": "p-2", "quantity": 1, "price": 90000, "totalPrice": 90000 },
        { "productId": "p-1", "quantity": 1, "price": 150000, "totalPrice": 150000 }
    ]);
    mock.on(Method::Get, ORDER_PATH, order)
        .on(
            Method::Get,
            "RecordSketch/serviceorder/so-1",
            json!([sketch_json("sk-1", 1, false), sketch_json("sk-2", 1, false)]),
        )
        .on(Method::Get, "Product/p-1", product_json("p-1", 150_000.0))
        .fail(Method::Get, "Product/p-2");

    let view = OrderFetcher::new(Arc::new(mock.clone()))
        .service_order("so-1")
        .await
        .unwrap();

    assert_eq!(view.status(), ServiceOrderStatus::DoneDeterminingDesignPrice);
    assert_eq!(view.sketches.len(), 2);
    assert!(view.designs.is_empty());
    assert!(view.product("p-1").is_some());
    assert!(view.product("p-2").is_none());
    assert_eq!(view.failures.len(), 1);
    assert_eq!(view.failures[0].resource, FetchedResource::Product);
    assert_eq!(view.failures[0].id, "p-2");

    // Designs are not shown before material pricing; p-1 is fetched once.
    assert_eq!(mock.count(Method::Get, "RecordDesign/serviceorder/so-1"), 0);
    assert_eq!(mock.count(Method::Get, "Product/p-1"), 1);
}

#[tokio::test]
async fn test_fetch_fails_when_order_fails() {
    let mock = MockHttp::new();
    mock.fail(Method::Get, ORDER_PATH);
    let err = OrderFetcher::new(Arc::new(mock.clone()))
        .service_order("so-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_view_actions_follow_records() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingMaterialPrice", 2_000_000.0, 3_000_000.0),
    )
    .on(
        Method::Get,
        "RecordDesign/serviceorder/so-1",
        json!([
            design_json("d-1", 1, false),
            design_json("d-2", 2, false),
            design_json("d-3", 3, false)
        ]),
    );
    let view = load(&mock).await;

    assert_eq!(view.design_phase(), 3);
    assert_eq!(view.latest_designs().len(), 1);
    assert!(!view.can_request_redraft());
    assert_eq!(
        view.available_actions(),
        vec![OrderAction::ConfirmDesign, OrderAction::CancelWithRefund]
    );
}

// ============================================================================
// Sketches and designs
// ============================================================================

#[tokio::test]
async fn test_confirm_sketch_selects_then_moves_status() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0),
    )
    .on(
        Method::Get,
        "RecordSketch/serviceorder/so-1",
        json!([sketch_json("sk-1", 1, false), sketch_json("sk-2", 1, false)]),
    );
    let view = load(&mock).await;

    let report = actions(&mock).confirm_sketch(&view, "sk-2").await.unwrap();

    assert_eq!(report.new_status, ServiceOrderStatus::WaitDeposit);
    assert_eq!(
        report.steps,
        vec![DispatchStep::SelectRecord, DispatchStep::UpdateOrderStatus]
    );
    assert_eq!(
        mock.calls(),
        vec![
            (Method::Put, "RecordSketch/sk-2".to_string()),
            (Method::Put, STATUS_PATH.to_string()),
        ]
    );
    assert_eq!(
        mock.last_body(Method::Put, "RecordSketch/sk-2").unwrap(),
        json!({ "isSelected": true })
    );
    assert_eq!(
        mock.last_body(Method::Put, STATUS_PATH).unwrap(),
        json!({ "status": "WaitDeposit" })
    );
}

#[tokio::test]
async fn test_confirm_sketch_refuses_second_selection() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0),
    )
    .on(
        Method::Get,
        "RecordSketch/serviceorder/so-1",
        json!([sketch_json("sk-1", 1, true), sketch_json("sk-2", 1, false)]),
    );
    let view = load(&mock).await;

    let err = actions(&mock).confirm_sketch(&view, "sk-2").await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadySelected(ref id) if id == "sk-1"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_reject_sketch_stops_at_phase_limit() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0),
    )
    .on(
        Method::Get,
        "RecordSketch/serviceorder/so-1",
        json!([sketch_json("sk-1", 1, false), sketch_json("sk-3", 3, false)]),
    );
    let view = load(&mock).await;

    let err = actions(&mock).reject_sketch(&view).await.unwrap_err();
    assert!(matches!(err, ClientError::PhaseLimitReached(3)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_sketch_actions_refused_when_sketches_did_not_load() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0),
    )
    .fail(Method::Get, "RecordSketch/serviceorder/so-1");
    let view = load(&mock).await;

    assert_eq!(view.failures.len(), 1);
    assert!(!view.records_loaded(FetchedResource::Sketches));
    assert!(!view.can_request_redraft());
    assert_eq!(view.available_actions(), vec![OrderAction::Cancel]);

    let err = actions(&mock).reject_sketch(&view).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    let err = actions(&mock).confirm_sketch(&view, "sk-1").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert!(mock.requests().is_empty());
}

fn design_review_backend(designs: serde_json::Value) -> MockHttp {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingMaterialPrice", 2_000_000.0, 3_000_000.0),
    )
    .on(Method::Get, "RecordDesign/serviceorder/so-1", designs);
    mock
}

#[tokio::test]
async fn test_confirm_design_selects_then_moves_status() {
    let mock = design_review_backend(json!([
        design_json("d-1", 1, false),
        design_json("d-2", 1, false)
    ]));
    let view = load(&mock).await;

    let report = actions(&mock).confirm_design(&view, "d-2").await.unwrap();

    assert_eq!(report.new_status, ServiceOrderStatus::DoneDesign);
    assert_eq!(
        mock.calls(),
        vec![
            (Method::Put, "RecordDesign/d-2".to_string()),
            (Method::Put, STATUS_PATH.to_string()),
        ]
    );
    assert_eq!(
        mock.last_body(Method::Put, STATUS_PATH).unwrap(),
        json!({ "status": "DoneDesign" })
    );
}

#[tokio::test]
async fn test_reject_design_requests_another_phase() {
    let mock = design_review_backend(json!([
        design_json("d-1", 1, false),
        design_json("d-2", 2, false)
    ]));
    let view = load(&mock).await;
    assert!(view.can_request_redraft());

    let report = actions(&mock).reject_design(&view).await.unwrap();

    assert_eq!(report.new_status, ServiceOrderStatus::ReDesign);
    assert_eq!(report.steps, vec![DispatchStep::UpdateOrderStatus]);
    assert_eq!(
        mock.last_body(Method::Put, STATUS_PATH).unwrap(),
        json!({ "status": "ReDesign" })
    );
}

#[tokio::test]
async fn test_reject_design_stops_at_phase_limit() {
    let mock = design_review_backend(json!([design_json("d-3", 3, false)]));
    let view = load(&mock).await;

    let err = actions(&mock).reject_design(&view).await.unwrap_err();
    assert!(matches!(err, ClientError::PhaseLimitReached(3)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_design_actions_refused_when_designs_did_not_load() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingMaterialPrice", 2_000_000.0, 3_000_000.0),
    )
    .fail(Method::Get, "RecordDesign/serviceorder/so-1");
    let view = load(&mock).await;

    assert_eq!(view.available_actions(), vec![OrderAction::CancelWithRefund]);
    let err = actions(&mock).reject_design(&view).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_transition_makes_no_calls() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDeterminingDesignPrice", 2_000_000.0, 0.0),
    );
    let view = load(&mock).await;

    let err = actions(&mock).confirm_design(&view, "d-1").await.unwrap_err();
    match err {
        ClientError::InvalidTransition { from, to } => {
            assert_eq!(from, ServiceOrderStatus::DoneDeterminingDesignPrice);
            assert_eq!(to, ServiceOrderStatus::DoneDesign);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(mock.requests().is_empty());
}

// ============================================================================
// Contract
// ============================================================================

fn sign_contract_backend(balance: f64) -> MockHttp {
    let mock = backend_with_wallet(balance);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "WaitDeposit", 2_000_000.0, 0.0),
    )
    .on(
        Method::Get,
        "Contract/serviceorder/so-1",
        json!({ "id": "c-1", "serviceOrderId": "so-1", "signatureUrl": null }),
    )
    .on(
        Method::Get,
        "Percentage",
        json!({ "depositPercentage": 50, "refundPercentage": 50 }),
    );
    mock
}

#[tokio::test]
async fn test_sign_contract_runs_every_step() {
    let mock = sign_contract_backend(5_000_000.0);
    let view = load(&mock).await;

    let report = actions(&mock)
        .sign_contract(&view, vec![0x89, b'P', b'N', b'G'])
        .await
        .unwrap();

    assert_eq!(report.new_status, ServiceOrderStatus::DepositSuccessful);
    assert_eq!(
        report.steps,
        vec![
            DispatchStep::FetchPercentage,
            DispatchStep::CheckBalance,
            DispatchStep::UploadSignature,
            DispatchStep::SignContract,
            DispatchStep::CreateBill,
            DispatchStep::UpdateOrderStatus,
            DispatchStep::UpdateWorkTask,
        ]
    );

    assert_eq!(
        mock.last_body(Method::Put, "Contract/c-1").unwrap(),
        json!({ "signatureUrl": SIGNATURE_URL })
    );
    let bill = mock.last_body(Method::Post, "Bill").unwrap();
    assert_eq!(bill["serviceOrderId"], "so-1");
    assert_eq!(bill["walletId"], "w-1");
    assert_eq!(bill["amount"], 1_000_000.0);
    assert_eq!(
        mock.last_body(Method::Put, STATUS_PATH).unwrap(),
        json!({ "status": "DepositSuccessful" })
    );
    assert_eq!(
        mock.last_body(Method::Put, "WorkTask/wt-2").unwrap(),
        json!({ "status": "Design" })
    );

    report.wallet_refresh.unwrap().await.unwrap();
}

#[tokio::test]
async fn test_sign_contract_reports_partial_dispatch() {
    let mock = sign_contract_backend(5_000_000.0);
    mock.fail(Method::Put, STATUS_PATH);
    let view = load(&mock).await;

    let err = actions(&mock)
        .sign_contract(&view, vec![1, 2, 3])
        .await
        .unwrap_err();

    assert!(err.is_partial());
    match err {
        ClientError::PartialDispatch {
            action,
            failed_step,
            completed,
            source,
        } => {
            assert_eq!(action, DispatchAction::Service(OrderAction::SignContract));
            assert_eq!(failed_step, DispatchStep::UpdateOrderStatus);
            assert!(completed.contains(&DispatchStep::CreateBill));
            assert!(!completed.contains(&DispatchStep::UpdateWorkTask));
            assert!(matches!(*source, ClientError::Api { status: 500, .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    // No rollback: the bill stays posted.
    assert_eq!(mock.count(Method::Post, "Bill"), 1);
    assert_eq!(mock.count(Method::Put, "WorkTask/wt-2"), 0);
}

#[tokio::test]
async fn test_sign_contract_needs_balance_before_signing() {
    let mock = sign_contract_backend(400_000.0);
    let view = load(&mock).await;

    let err = actions(&mock)
        .sign_contract(&view, vec![1])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InsufficientBalance { .. }));
    assert_eq!(mock.count(Method::Put, "Contract/c-1"), 0);
    assert_eq!(mock.count(Method::Post, "Bill"), 0);
}

#[tokio::test]
async fn test_signed_contract_cannot_be_resigned() {
    let mock = sign_contract_backend(5_000_000.0);
    mock.on(
        Method::Get,
        "Contract/serviceorder/so-1",
        json!({ "id": "c-1", "serviceOrderId": "so-1", "signatureUrl": SIGNATURE_URL }),
    );
    let view = load(&mock).await;

    let err = actions(&mock)
        .sign_contract(&view, vec![1])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AlreadySigned(ref id) if id == "c-1"));
}

#[tokio::test]
async fn test_contract_is_created_lazily() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "WaitDeposit", 2_000_000.0, 0.0),
    )
    .not_found(Method::Get, "Contract/serviceorder/so-1")
    .on(
        Method::Post,
        "Contract",
        json!({ "id": "c-9", "serviceOrderId": "so-1" }),
    );
    let view = load(&mock).await;

    let contract = actions(&mock).contract(&view.order).await.unwrap();
    assert_eq!(contract.id, "c-9");
    assert!(!contract.is_signed());
    let body = mock.last_body(Method::Post, "Contract").unwrap();
    assert_eq!(body["serviceOrderId"], "so-1");
    assert_eq!(body["phone"], "0901234567");
}

// ============================================================================
// Payment and cancellation
// ============================================================================

#[tokio::test]
async fn test_pay_remainder_checks_balance_first() {
    let mock = backend_with_wallet(1_000_000.0);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDesign", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    let err = actions(&mock).pay_remainder(&view).await.unwrap_err();
    match err {
        ClientError::InsufficientBalance { required, .. } => assert_eq!(required, 4_000_000.0),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(mock.count(Method::Post, "Bill"), 0);
}

#[tokio::test]
async fn test_pay_remainder_bills_design_rest_and_materials() {
    let mock = backend_with_wallet(10_000_000.0);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDesign", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    let report = actions(&mock).pay_remainder(&view).await.unwrap();
    assert_eq!(report.new_status, ServiceOrderStatus::PaymentSuccess);
    let bill = mock.last_body(Method::Post, "Bill").unwrap();
    assert_eq!(bill["amount"], 4_000_000.0);
}

#[tokio::test]
async fn test_cancel_with_refund_uses_tier() {
    // No percentage configured on the backend: defaults apply.
    let mock = backend_with_wallet(0.0);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "AssignToDesigner", 2_000_000.0, 0.0),
    );
    let view = load(&mock).await;

    let report = actions(&mock).cancel_with_refund(&view).await.unwrap();
    assert_eq!(report.new_status, ServiceOrderStatus::OrderCancelled);
    let refund = mock.last_body(Method::Post, "Wallets/refund").unwrap();
    // 30 % of the 1 000 000 deposit
    assert_eq!(refund["amount"], 300_000.0);
    assert_eq!(
        mock.last_body(Method::Put, STATUS_PATH).unwrap(),
        json!({ "status": "OrderCancelled" })
    );
}

#[tokio::test]
async fn test_cancel_with_refund_before_design_uses_backend_percentage() {
    let mock = backend_with_wallet(0.0);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DepositSuccessful", 2_000_000.0, 0.0),
    )
    .on(
        Method::Get,
        "Percentage",
        json!({ "depositPercentage": 50, "refundPercentage": 80 }),
    );
    let view = load(&mock).await;

    actions(&mock).cancel_with_refund(&view).await.unwrap();
    let refund = mock.last_body(Method::Post, "Wallets/refund").unwrap();
    assert_eq!(refund["amount"], 800_000.0);
}

#[tokio::test]
async fn test_plain_cancel_is_refused_after_deposit() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DepositSuccessful", 2_000_000.0, 0.0),
    );
    let view = load(&mock).await;

    let err = actions(&mock).cancel(&view).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_cancel_with_payment_bills_unpaid_design_fee() {
    let mock = backend_with_wallet(5_000_000.0);
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneDesign", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    let report = actions(&mock).cancel_with_payment(&view).await.unwrap();
    assert_eq!(report.new_status, ServiceOrderStatus::OrderCancelled);
    let bill = mock.last_body(Method::Post, "Bill").unwrap();
    assert_eq!(bill["amount"], 1_000_000.0);
}

// ============================================================================
// Installation
// ============================================================================

#[tokio::test]
async fn test_schedule_installation() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DeliveredSuccessfully", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    let date = chrono::NaiveDate::from_ymd_opt(2099, 5, 20).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(8, 30, 0).unwrap();
    let report = actions(&mock)
        .schedule_installation(&view, date, time)
        .await
        .unwrap();

    assert_eq!(report.new_status, ServiceOrderStatus::WaitForScheduling);
    assert_eq!(
        mock.last_body(Method::Put, "ServiceOrder/so-1/construction").unwrap(),
        json!({ "contructionDate": "2099-05-20", "contructionTime": "08:30" })
    );

    let past = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let err = actions(&mock)
        .schedule_installation(&view, past, time)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_confirm_installation_completes_work_task() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneInstalling", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    let report = actions(&mock).confirm_installation(&view).await.unwrap();
    assert_eq!(report.new_status, ServiceOrderStatus::Successfully);
    assert_eq!(
        mock.calls(),
        vec![
            (Method::Put, "WorkTask/wt-2".to_string()),
            (Method::Put, STATUS_PATH.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_request_reinstall_records_reason() {
    let mock = MockHttp::new();
    mock.on(
        Method::Get,
        ORDER_PATH,
        service_order_json("so-1", "DoneInstalling", 2_000_000.0, 3_000_000.0),
    );
    let view = load(&mock).await;

    actions(&mock)
        .request_reinstall(&view, Some("Cây bị héo"))
        .await
        .unwrap();
    assert_eq!(
        mock.last_body(Method::Put, "WorkTask/wt-2").unwrap(),
        json!({ "status": "ReInstall", "reason": "Cây bị héo" })
    );
}
