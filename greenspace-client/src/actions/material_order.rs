//! Material order actions

use serde_json::Value;
use shared::models::{BillCreate, MaterialOrder, MaterialOrderCreate, RefundCreate, StatusUpdate};
use shared::status::{MaterialAction, MaterialOrderStatus};
use std::sync::Arc;

use super::{Cart, Dispatch, DispatchReport};
use crate::endpoints;
use crate::error::{ClientError, ClientResult, DispatchStep};
use crate::http::HttpClient;
use crate::wallet::WalletContext;

type Report = DispatchReport<MaterialOrderStatus>;

/// Dispatcher for shop orders
pub struct MaterialOrderActions<C: HttpClient> {
    http: Arc<C>,
    wallet: WalletContext<C>,
}

impl<C: HttpClient> Clone for MaterialOrderActions<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            wallet: self.wallet.clone(),
        }
    }
}

impl<C: HttpClient + 'static> MaterialOrderActions<C> {
    pub fn new(http: Arc<C>, wallet: WalletContext<C>) -> Self {
        Self { http, wallet }
    }

    /// Place an order for the cart and pay it from the wallet.
    ///
    /// Returns the created order with the report.
    pub async fn checkout(
        &self,
        cart: &Cart,
        address: &str,
        phone: &str,
    ) -> ClientResult<(MaterialOrder, Report)> {
        let action = MaterialAction::Checkout;
        if cart.is_empty() {
            return Err(ClientError::Validation("cart is empty".into()));
        }
        if address.trim().is_empty() || phone.trim().is_empty() {
            return Err(ClientError::Validation(
                "delivery address and phone are required".into(),
            ));
        }
        let wallet_id = self.wallet.wallet_id().await?;

        let mut dispatch = Dispatch::new(action);
        dispatch
            .step(DispatchStep::CheckBalance, self.wallet.ensure_sufficient(cart.total()))
            .await?;
        let body = MaterialOrderCreate {
            user_id: self.wallet.user_id().to_string(),
            address: address.trim().to_string(),
            phone: phone.trim().to_string(),
            delivery_fee: cart.delivery_fee(),
            products: cart.order_items(),
        };
        let mut order: MaterialOrder = dispatch
            .step(
                DispatchStep::CreateOrder,
                self.http.post(endpoints::MATERIAL_ORDER, &body),
            )
            .await?;

        // The backend total wins when it priced the order itself.
        let amount = if order.total_amount > 0.0 {
            order.total_amount
        } else {
            cart.total()
        };
        if amount != cart.total() {
            tracing::debug!(order_id = %order.id, amount, cart_total = cart.total(), "Backend repriced the order");
            dispatch
                .step(DispatchStep::CheckBalance, self.wallet.ensure_sufficient(amount))
                .await?;
        }
        let bill = BillCreate {
            service_order_id: None,
            order_id: Some(order.id.clone()),
            wallet_id,
            amount,
            description: format!("Thanh toán đơn hàng {}", order.id),
        };
        dispatch
            .step(
                DispatchStep::CreateBill,
                self.http.post::<Value, _>(endpoints::BILL, &bill),
            )
            .await?;
        self.move_status(&mut dispatch, &order.id, action.target())
            .await?;
        order.status = action.target();

        let refresh = self.wallet.update_balance(-amount).await;
        Ok((order, dispatch.finish(action.target(), Some(refresh))))
    }

    /// Cancel before shipping. A paid order is refunded in full.
    pub async fn cancel(&self, order: &MaterialOrder) -> ClientResult<Report> {
        let action = MaterialAction::Cancel;
        ensure_allowed(order, action)?;

        let mut dispatch = Dispatch::new(action);
        let refund = if order.is_paid() && order.total_amount > 0.0 {
            let refund = RefundCreate {
                service_order_id: None,
                order_id: Some(order.id.clone()),
                wallet_id: self.wallet.wallet_id().await?,
                amount: order.total_amount,
                description: format!("Hoàn tiền đơn hàng {}", order.id),
            };
            dispatch
                .step(
                    DispatchStep::CreateRefund,
                    self.http.post::<Value, _>(endpoints::REFUND, &refund),
                )
                .await?;
            Some(order.total_amount)
        } else {
            None
        };
        self.move_status(&mut dispatch, &order.id, action.target())
            .await?;

        let refresh = match refund {
            Some(amount) => Some(self.wallet.update_balance(amount).await),
            None => None,
        };
        Ok(dispatch.finish(action.target(), refresh))
    }

    pub async fn confirm_received(&self, order: &MaterialOrder) -> ClientResult<Report> {
        self.simple_move(order, MaterialAction::ConfirmReceived).await
    }

    /// Ask for a refund; the backend settles it later (`DoneRefund`).
    pub async fn request_refund(&self, order: &MaterialOrder) -> ClientResult<Report> {
        self.simple_move(order, MaterialAction::RequestRefund).await
    }

    async fn simple_move(
        &self,
        order: &MaterialOrder,
        action: MaterialAction,
    ) -> ClientResult<Report> {
        ensure_allowed(order, action)?;
        let mut dispatch = Dispatch::new(action);
        self.move_status(&mut dispatch, &order.id, action.target())
            .await?;
        Ok(dispatch.finish(action.target(), None))
    }

    async fn move_status(
        &self,
        dispatch: &mut Dispatch,
        order_id: &str,
        target: MaterialOrderStatus,
    ) -> ClientResult<()> {
        let body = StatusUpdate { status: target };
        dispatch
            .step(
                DispatchStep::UpdateOrderStatus,
                self.http
                    .put::<Value, _>(&endpoints::material_order_status(order_id), &body),
            )
            .await?;
        tracing::info!(order_id, to = %target, "Material order status updated");
        Ok(())
    }
}

fn ensure_allowed(order: &MaterialOrder, action: MaterialAction) -> ClientResult<()> {
    let to = action.target();
    if order.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(ClientError::InvalidMaterialTransition {
            from: order.status,
            to,
        })
    }
}
