mod common;

use common::{Method, USER_ID, backend_with_wallet, wallet_json};
use greenspace_client::{ClientError, WalletContext};
use std::sync::Arc;
use std::time::Duration;

const WALLET_PATH: &str = "Wallets/user/u-1";
const TX_PATH: &str = "Transaction/user/u-1";
const TTL: Duration = Duration::from_secs(30);

fn context(mock: &common::MockHttp) -> WalletContext<common::MockHttp> {
    WalletContext::new(Arc::new(mock.clone()), USER_ID, TTL)
}

#[tokio::test]
async fn test_second_fetch_within_ttl_is_served_from_cache() {
    let mock = backend_with_wallet(2_000_000.0);
    let wallet = context(&mock);

    let first = wallet.fetch_wallet_data(false).await.unwrap();
    let second = wallet.fetch_wallet_data(false).await.unwrap();

    assert_eq!(first.balance, 2_000_000.0);
    assert_eq!(second.balance, 2_000_000.0);
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 1);
    assert_eq!(mock.count(Method::Get, TX_PATH), 1);
}

#[tokio::test]
async fn test_force_refresh_bypasses_cache() {
    let mock = backend_with_wallet(2_000_000.0);
    let wallet = context(&mock);

    wallet.fetch_wallet_data(false).await.unwrap();
    mock.on(Method::Get, WALLET_PATH, wallet_json(1_500_000.0));
    let refreshed = wallet.fetch_wallet_data(true).await.unwrap();

    assert_eq!(refreshed.balance, 1_500_000.0);
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cache_expires_after_ttl() {
    let mock = backend_with_wallet(2_000_000.0);
    let wallet = context(&mock);

    wallet.fetch_wallet_data(false).await.unwrap();
    tokio::time::advance(Duration::from_secs(29)).await;
    wallet.fetch_wallet_data(false).await.unwrap();
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    wallet.fetch_wallet_data(false).await.unwrap();
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_fetches_share_one_refresh() {
    let mock = backend_with_wallet(2_000_000.0);
    let wallet = context(&mock);

    let first = tokio::spawn({
        let wallet = wallet.clone();
        async move { wallet.fetch_wallet_data(false).await }
    });
    let second = tokio::spawn({
        let wallet = wallet.clone();
        async move { wallet.fetch_wallet_data(false).await }
    });
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().unwrap().balance, 2_000_000.0);
    assert_eq!(second.unwrap().unwrap().balance, 2_000_000.0);
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 1);
    assert_eq!(mock.count(Method::Get, TX_PATH), 1);
}

#[tokio::test]
async fn test_transactions_are_partitioned() {
    let mock = backend_with_wallet(0.0);
    let wallet = context(&mock);

    let snapshot = wallet.fetch_wallet_data(false).await.unwrap();
    assert_eq!(snapshot.wallet_id.as_deref(), Some("w-1"));
    assert_eq!(snapshot.deposits.len(), 1);
    assert_eq!(snapshot.purchases.len(), 1);
    assert_eq!(snapshot.refunds.len(), 1);
    assert_eq!(snapshot.purchases[0].order_id.as_deref(), Some("o-1"));
}

#[tokio::test]
async fn test_update_balance_is_optimistic_then_reconciled() {
    let mock = backend_with_wallet(1_000_000.0);
    let wallet = context(&mock);
    wallet.fetch_wallet_data(false).await.unwrap();

    // The server applied a fee the client does not know about.
    mock.on(Method::Get, WALLET_PATH, wallet_json(750_000.0));
    let refresh = wallet.update_balance(-200_000.0).await;
    assert_eq!(wallet.snapshot().await.balance, 800_000.0);

    refresh.await.unwrap();
    assert_eq!(wallet.snapshot().await.balance, 750_000.0);
    assert_eq!(mock.count(Method::Get, WALLET_PATH), 2);
}

#[tokio::test]
async fn test_failed_background_refresh_keeps_optimistic_balance() {
    let mock = backend_with_wallet(1_000_000.0);
    let wallet = context(&mock);
    wallet.fetch_wallet_data(false).await.unwrap();

    mock.fail(Method::Get, WALLET_PATH);
    wallet.update_balance(500_000.0).await.await.unwrap();
    assert_eq!(wallet.snapshot().await.balance, 1_500_000.0);
}

#[tokio::test]
async fn test_ensure_sufficient() {
    let mock = backend_with_wallet(300_000.0);
    let wallet = context(&mock);

    wallet.ensure_sufficient(300_000.0).await.unwrap();
    let err = wallet.ensure_sufficient(300_001.0).await.unwrap_err();
    match err {
        ClientError::InsufficientBalance {
            required,
            available,
        } => {
            assert_eq!(required, 300_001.0);
            assert_eq!(available, 300_000.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_restored_snapshot_is_stale() {
    let mock = backend_with_wallet(900_000.0);
    let wallet = context(&mock);

    let mut cached = wallet.snapshot().await;
    cached.balance = 123_000.0;
    wallet.restore(cached).await;
    assert_eq!(wallet.snapshot().await.balance, 123_000.0);

    let fresh = wallet.fetch_wallet_data(false).await.unwrap();
    assert_eq!(fresh.balance, 900_000.0);
}

#[tokio::test]
async fn test_top_up_round_trip() {
    let mock = backend_with_wallet(100_000.0);
    mock.on(
        Method::Post,
        "Wallets/vnpay-payment",
        serde_json::json!({ "paymentUrl": "https://sandbox.vnpayment.vn/pay?token=abc" }),
    );
    let wallet = context(&mock);

    let url = wallet.top_up(500_000.0).await.unwrap();
    assert!(url.starts_with("https://sandbox.vnpayment.vn"));
    let body = mock.last_body(Method::Post, "Wallets/vnpay-payment").unwrap();
    assert_eq!(body["walletId"], "w-1");
    assert_eq!(body["amount"], 500_000.0);

    assert!(wallet.top_up(0.0).await.is_err());

    mock.on(Method::Get, WALLET_PATH, wallet_json(600_000.0));
    let result = wallet
        .complete_top_up(
            "greenspace://wallet?vnp_Amount=50000000&vnp_ResponseCode=00&vnp_TransactionStatus=00",
        )
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(wallet.snapshot().await.balance, 600_000.0);
}
