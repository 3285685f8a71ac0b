//! Service order actions

use chrono::{Local, NaiveDate, NaiveTime};
use serde_json::Value;
use shared::models::{
    BillCreate, Contract, ContractCreate, ContractSign, MAX_PHASE, PaymentPercentage,
    RecordSelect, RefundCreate, ScheduleUpdate, ServiceOrder, StatusUpdate, WorkTaskStatus,
    WorkTaskUpdate,
};
use shared::money;
use shared::status::{OrderAction, RefundTier, ServiceOrderStatus};
use std::sync::Arc;

use super::{Dispatch, DispatchReport};
use crate::config::PaymentPolicy;
use crate::endpoints;
use crate::error::{ClientError, ClientResult, DispatchStep};
use crate::fetcher::{FetchedResource, ServiceOrderView};
use crate::http::HttpClient;
use crate::upload::ImageUploader;
use crate::wallet::WalletContext;

type Report = DispatchReport<ServiceOrderStatus>;

/// Dispatcher for customer actions on service orders
pub struct ServiceOrderActions<C: HttpClient> {
    http: Arc<C>,
    wallet: WalletContext<C>,
    uploader: Option<Arc<dyn ImageUploader>>,
    policy: PaymentPolicy,
}

impl<C: HttpClient> Clone for ServiceOrderActions<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            wallet: self.wallet.clone(),
            uploader: self.uploader.clone(),
            policy: self.policy,
        }
    }
}

impl<C: HttpClient + 'static> ServiceOrderActions<C> {
    pub fn new(http: Arc<C>, wallet: WalletContext<C>, policy: PaymentPolicy) -> Self {
        Self {
            http,
            wallet,
            uploader: None,
            policy,
        }
    }

    /// Set the uploader used for contract signatures.
    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    // ========================================================================
    // Sketches and designs
    // ========================================================================

    /// Select a sketch and move the order to `WaitDeposit`.
    pub async fn confirm_sketch(
        &self,
        view: &ServiceOrderView,
        sketch_id: &str,
    ) -> ClientResult<Report> {
        let action = OrderAction::ConfirmSketch;
        ensure_allowed(view, action)?;
        view.ensure_records_loaded(FetchedResource::Sketches)?;
        if let Some(selected) = view.selected_sketch() {
            return Err(ClientError::AlreadySelected(selected.id.clone()));
        }
        if !view.sketches.iter().any(|s| s.id == sketch_id) {
            return Err(ClientError::NotFound(format!("sketch {sketch_id}")));
        }

        let mut dispatch = Dispatch::new(action);
        dispatch
            .step(DispatchStep::SelectRecord, self.select(&endpoints::sketch(sketch_id)))
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    /// Ask for another sketch phase.
    pub async fn reject_sketch(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::RejectSketch;
        ensure_allowed(view, action)?;
        view.ensure_records_loaded(FetchedResource::Sketches)?;
        if let Some(selected) = view.selected_sketch() {
            return Err(ClientError::AlreadySelected(selected.id.clone()));
        }
        if view.sketch_phase() >= MAX_PHASE {
            return Err(ClientError::PhaseLimitReached(MAX_PHASE));
        }

        let mut dispatch = Dispatch::new(action);
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    /// Select a design and move the order to `DoneDesign`.
    pub async fn confirm_design(
        &self,
        view: &ServiceOrderView,
        design_id: &str,
    ) -> ClientResult<Report> {
        let action = OrderAction::ConfirmDesign;
        ensure_allowed(view, action)?;
        view.ensure_records_loaded(FetchedResource::Designs)?;
        if let Some(selected) = view.selected_design() {
            return Err(ClientError::AlreadySelected(selected.id.clone()));
        }
        if !view.designs.iter().any(|d| d.id == design_id) {
            return Err(ClientError::NotFound(format!("design {design_id}")));
        }

        let mut dispatch = Dispatch::new(action);
        dispatch
            .step(DispatchStep::SelectRecord, self.select(&endpoints::design(design_id)))
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    /// Ask for another design phase.
    pub async fn reject_design(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::RejectDesign;
        ensure_allowed(view, action)?;
        view.ensure_records_loaded(FetchedResource::Designs)?;
        if let Some(selected) = view.selected_design() {
            return Err(ClientError::AlreadySelected(selected.id.clone()));
        }
        if view.design_phase() >= MAX_PHASE {
            return Err(ClientError::PhaseLimitReached(MAX_PHASE));
        }

        let mut dispatch = Dispatch::new(action);
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    // ========================================================================
    // Contract
    // ========================================================================

    /// The order's contract, created on first access.
    pub async fn contract(&self, order: &ServiceOrder) -> ClientResult<Contract> {
        match self.http.get(&endpoints::contract_for_order(&order.id)).await {
            Ok(contract) => Ok(contract),
            Err(ClientError::NotFound(_)) => {
                tracing::info!(order_id = %order.id, "Creating contract");
                let body = ContractCreate {
                    service_order_id: order.id.clone(),
                    user_id: order.user_id.clone(),
                    name: order.user_name.clone(),
                    phone: order.cus_phone.clone(),
                    address: order.address.clone(),
                };
                self.http.post(endpoints::CONTRACT, &body).await
            }
            Err(e) => Err(e),
        }
    }

    /// Sign the contract and pay the design deposit from the wallet.
    pub async fn sign_contract(
        &self,
        view: &ServiceOrderView,
        signature_png: Vec<u8>,
    ) -> ClientResult<Report> {
        let action = OrderAction::SignContract;
        ensure_allowed(view, action)?;
        let uploader = self
            .uploader
            .as_ref()
            .ok_or_else(|| ClientError::Config("no image uploader configured".into()))?;
        let order = &view.order;
        let contract = self.contract(order).await?;
        if contract.is_signed() {
            return Err(ClientError::AlreadySigned(contract.id));
        }
        let wallet_id = self.wallet.wallet_id().await?;

        let mut dispatch = Dispatch::new(action);
        let policy = dispatch
            .step(DispatchStep::FetchPercentage, self.percentages())
            .await?;
        let deposit = deposit_of(order, &policy);
        dispatch
            .step(DispatchStep::CheckBalance, self.wallet.ensure_sufficient(deposit))
            .await?;

        let file_name = format!("signature-{}.png", contract.id);
        let signature_url = dispatch
            .step(DispatchStep::UploadSignature, uploader.upload(&file_name, signature_png))
            .await?;
        let sign = ContractSign { signature_url };
        dispatch
            .step(
                DispatchStep::SignContract,
                self.http.put::<Value, _>(&endpoints::contract(&contract.id), &sign),
            )
            .await?;
        let description = format!("Đặt cọc thiết kế đơn {}", order.id);
        self.pay_bill(&mut dispatch, order, wallet_id, deposit, description)
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;
        self.update_work_task(&mut dispatch, order, WorkTaskStatus::Design, None)
            .await?;

        let refresh = self.wallet.update_balance(-deposit).await;
        Ok(dispatch.finish(action.target(), Some(refresh)))
    }

    // ========================================================================
    // Payment and cancellation
    // ========================================================================

    /// Pay the rest of the design fee plus the material price.
    pub async fn pay_remainder(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::PayRemainder;
        ensure_allowed(view, action)?;
        let order = &view.order;
        let wallet_id = self.wallet.wallet_id().await?;

        let mut dispatch = Dispatch::new(action);
        let policy = dispatch
            .step(DispatchStep::FetchPercentage, self.percentages())
            .await?;
        let amount = remainder_due(order, &policy);
        dispatch
            .step(DispatchStep::CheckBalance, self.wallet.ensure_sufficient(amount))
            .await?;
        let description = format!("Thanh toán đơn {}", order.id);
        self.pay_bill(&mut dispatch, order, wallet_id, amount, description)
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;

        let refresh = self.wallet.update_balance(-amount).await;
        Ok(dispatch.finish(action.target(), Some(refresh)))
    }

    /// Cancel an order that has no deposit yet.
    pub async fn cancel(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::Cancel;
        ensure_allowed(view, action)?;

        let mut dispatch = Dispatch::new(action);
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    /// Cancel after the deposit, refunding the share its tier allows.
    pub async fn cancel_with_refund(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::CancelWithRefund;
        ensure_allowed(view, action)?;
        let order = &view.order;
        let tier = view.status().refund_tier().ok_or(ClientError::InvalidTransition {
            from: view.status(),
            to: action.target(),
        })?;
        let wallet_id = self.wallet.wallet_id().await?;

        let mut dispatch = Dispatch::new(action);
        let policy = dispatch
            .step(DispatchStep::FetchPercentage, self.percentages())
            .await?;
        let amount = refund_due(order, &policy, tier);
        let refund = RefundCreate {
            service_order_id: Some(order.id.clone()),
            order_id: None,
            wallet_id,
            amount,
            description: format!("Hoàn tiền đặt cọc đơn {}", order.id),
        };
        dispatch
            .step(
                DispatchStep::CreateRefund,
                self.http.post::<Value, _>(endpoints::REFUND, &refund),
            )
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;

        let refresh = self.wallet.update_balance(amount).await;
        Ok(dispatch.finish(action.target(), Some(refresh)))
    }

    /// Cancel after the design was delivered, paying the unpaid design fee.
    pub async fn cancel_with_payment(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::CancelWithPayment;
        ensure_allowed(view, action)?;
        let order = &view.order;
        let wallet_id = self.wallet.wallet_id().await?;

        let mut dispatch = Dispatch::new(action);
        let policy = dispatch
            .step(DispatchStep::FetchPercentage, self.percentages())
            .await?;
        let amount = design_fee_due(order, &policy);
        dispatch
            .step(DispatchStep::CheckBalance, self.wallet.ensure_sufficient(amount))
            .await?;
        let description = format!("Phí thiết kế khi hủy đơn {}", order.id);
        self.pay_bill(&mut dispatch, order, wallet_id, amount, description)
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;

        let refresh = self.wallet.update_balance(-amount).await;
        Ok(dispatch.finish(action.target(), Some(refresh)))
    }

    // ========================================================================
    // Installation
    // ========================================================================

    pub async fn schedule_installation(
        &self,
        view: &ServiceOrderView,
        date: NaiveDate,
        time: NaiveTime,
    ) -> ClientResult<Report> {
        let action = OrderAction::ScheduleInstallation;
        ensure_allowed(view, action)?;
        let today = Local::now().date_naive();
        if date < today {
            return Err(ClientError::Validation(format!(
                "installation date {date} is in the past"
            )));
        }

        let mut dispatch = Dispatch::new(action);
        let schedule = ScheduleUpdate {
            construction_date: date.format("%Y-%m-%d").to_string(),
            construction_time: time.format("%H:%M").to_string(),
        };
        dispatch
            .step(
                DispatchStep::UpdateSchedule,
                self.http
                    .put::<Value, _>(&endpoints::service_order_schedule(&view.order.id), &schedule),
            )
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    pub async fn confirm_installation(&self, view: &ServiceOrderView) -> ClientResult<Report> {
        let action = OrderAction::ConfirmInstallation;
        ensure_allowed(view, action)?;

        let mut dispatch = Dispatch::new(action);
        self.update_work_task(&mut dispatch, &view.order, WorkTaskStatus::Completed, None)
            .await?;
        self.move_status(&mut dispatch, view, action.target()).await?;
        Ok(dispatch.finish(action.target(), None))
    }

    /// Send the crew back; `reason` is attached to the latest work task.
    pub async fn request_reinstall(
        &self,
        view: &ServiceOrderView,
        reason: Option<&str>,
    ) -> ClientResult<Report> {
        let action = OrderAction::RequestReinstall;
        ensure_allowed(view, action)?;

        let mut dispatch = Dispatch::new(action);
        self.move_status(&mut dispatch, view, action.target()).await?;
        self.update_work_task(
            &mut dispatch,
            &view.order,
            WorkTaskStatus::ReInstall,
            reason.map(str::to_string),
        )
        .await?;
        Ok(dispatch.finish(action.target(), None))
    }

    // ========================================================================
    // Steps
    // ========================================================================

    async fn select(&self, path: &str) -> ClientResult<()> {
        let _: Value = self
            .http
            .put(path, &RecordSelect { is_selected: true })
            .await?;
        Ok(())
    }

    /// Percentages from the backend over the configured defaults.
    async fn percentages(&self) -> ClientResult<PaymentPolicy> {
        let mut policy = self.policy;
        match self.http.get::<PaymentPercentage>(endpoints::PERCENTAGE).await {
            Ok(remote) => {
                policy.deposit_percentage = remote.deposit_percentage;
                policy.refund_before_design = remote.refund_percentage;
            }
            Err(ClientError::NotFound(_)) => {
                tracing::warn!("No percentage configured on the backend, using defaults");
            }
            Err(e) => return Err(e),
        }
        Ok(policy)
    }

    async fn pay_bill(
        &self,
        dispatch: &mut Dispatch,
        order: &ServiceOrder,
        wallet_id: String,
        amount: f64,
        description: String,
    ) -> ClientResult<()> {
        let bill = BillCreate {
            service_order_id: Some(order.id.clone()),
            order_id: None,
            wallet_id,
            amount,
            description,
        };
        dispatch
            .step(
                DispatchStep::CreateBill,
                self.http.post::<Value, _>(endpoints::BILL, &bill),
            )
            .await?;
        Ok(())
    }

    async fn move_status(
        &self,
        dispatch: &mut Dispatch,
        view: &ServiceOrderView,
        target: ServiceOrderStatus,
    ) -> ClientResult<()> {
        let body = StatusUpdate { status: target };
        dispatch
            .step(
                DispatchStep::UpdateOrderStatus,
                self.http
                    .put::<Value, _>(&endpoints::service_order_status(&view.order.id), &body),
            )
            .await?;
        tracing::info!(order_id = %view.order.id, from = %view.status(), to = %target, "Order status updated");
        Ok(())
    }

    async fn update_work_task(
        &self,
        dispatch: &mut Dispatch,
        order: &ServiceOrder,
        status: WorkTaskStatus,
        reason: Option<String>,
    ) -> ClientResult<()> {
        let Some(task) = order.latest_work_task() else {
            tracing::debug!(order_id = %order.id, "Order has no work task to update");
            return Ok(());
        };
        let body = WorkTaskUpdate {
            status: status.as_str().to_string(),
            reason,
        };
        dispatch
            .step(
                DispatchStep::UpdateWorkTask,
                self.http.put::<Value, _>(&endpoints::work_task(&task.id), &body),
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Rules
// ============================================================================

fn ensure_allowed(view: &ServiceOrderView, action: OrderAction) -> ClientResult<()> {
    let from = view.status();
    let to = action.target();
    if from.allows(action) && from.can_transition_to(to) {
        Ok(())
    } else {
        tracing::warn!(order_id = %view.order.id, %from, %to, ?action, "Rejected action");
        Err(ClientError::InvalidTransition { from, to })
    }
}

fn deposit_of(order: &ServiceOrder, policy: &PaymentPolicy) -> f64 {
    money::percent_of(order.design_price, policy.deposit_percentage)
}

/// Design fee not covered by the deposit, plus materials.
pub(crate) fn remainder_due(order: &ServiceOrder, policy: &PaymentPolicy) -> f64 {
    money::sum([design_fee_due(order, policy), order.material_price])
}

pub(crate) fn design_fee_due(order: &ServiceOrder, policy: &PaymentPolicy) -> f64 {
    money::sum([order.design_price, -deposit_of(order, policy)])
}

pub(crate) fn refund_due(order: &ServiceOrder, policy: &PaymentPolicy, tier: RefundTier) -> f64 {
    let percent = match tier {
        RefundTier::BeforeDesign => policy.refund_before_design,
        RefundTier::DuringDesign => policy.refund_during_design,
    };
    money::percent_of(deposit_of(order, policy), percent)
}
