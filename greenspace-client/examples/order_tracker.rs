// greenspace-client/examples/order_tracker.rs
// Logs in, prints the wallet and the state of one service order.

use greenspace_client::logger::init_logger;
use greenspace_client::{ClientConfig, GreenSpaceClient};
use shared::money::format_currency;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("info", false)?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        println!("Usage: {} <email> <password> <service_order_id>", args[0]);
        println!("  Reads GREENSPACE_API_URL from the environment or .env");
        return Ok(());
    }
    let (email, password, order_id) = (&args[1], &args[2], &args[3]);

    let config = ClientConfig::from_env()?;
    let guest = GreenSpaceClient::new(config)?;
    let client = match guest.restore_saved().await {
        Ok(client) => client,
        Err(guest) => guest.login(email, password).await?,
    };
    let user = client.user()?;
    tracing::info!("Logged in as: {} <{}>", user.name, user.email);

    let wallet = client.wallet()?.fetch_wallet_data(false).await?;
    println!("Wallet balance: {}", format_currency(wallet.balance));
    println!(
        "  {} deposits, {} purchases, {} refunds",
        wallet.deposits.len(),
        wallet.purchases.len(),
        wallet.refunds.len()
    );

    let view = client.fetcher().service_order(order_id).await?;
    let status = view.status();
    println!("Order {}: {} ({})", view.order.id, status.label(), status.color());
    println!("  Design fee:   {}", format_currency(view.order.design_price));
    println!("  Catalog cost: {}", format_currency(view.catalog_total()));
    println!("  Sketch phase {} / design phase {}", view.sketch_phase(), view.design_phase());
    for action in view.available_actions() {
        println!("  - can {action:?}");
    }
    for failure in &view.failures {
        tracing::warn!("Partial load: {:?} {} ({})", failure.resource, failure.id, failure.error);
    }

    client.save_session().await?;
    Ok(())
}
