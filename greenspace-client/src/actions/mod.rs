//! Action dispatcher
//!
//! Every customer action is a short sequence of dependent REST calls.
//! Steps run one after another with no rollback. When a step fails after
//! an earlier step already changed backend state, the caller gets
//! [`ClientError::PartialDispatch`] naming what was applied, so support
//! can finish the job by hand.

mod cart;
mod material_order;
mod service_order;

pub use cart::{Cart, CartLine};
pub use material_order::MaterialOrderActions;
pub use service_order::ServiceOrderActions;

use std::future::Future;
use tokio::task::JoinHandle;

use crate::error::{ClientError, ClientResult, DispatchAction, DispatchStep};

/// Outcome of a completed action
#[derive(Debug)]
pub struct DispatchReport<S> {
    pub action: DispatchAction,
    /// Steps in the order they ran
    pub steps: Vec<DispatchStep>,
    pub new_status: S,
    /// Background wallet refetch started by money-moving actions
    pub wallet_refresh: Option<JoinHandle<()>>,
}

/// Step log of one running action.
pub(crate) struct Dispatch {
    action: DispatchAction,
    completed: Vec<DispatchStep>,
}

impl Dispatch {
    pub(crate) fn new(action: impl Into<DispatchAction>) -> Self {
        let action = action.into();
        tracing::debug!(?action, "Dispatch started");
        Self {
            action,
            completed: Vec::new(),
        }
    }

    /// Run one step, recording it on success.
    pub(crate) async fn step<T>(
        &mut self,
        step: DispatchStep,
        call: impl Future<Output = ClientResult<T>>,
    ) -> ClientResult<T> {
        match call.await {
            Ok(value) => {
                tracing::debug!(action = ?self.action, ?step, "Dispatch step done");
                self.completed.push(step);
                Ok(value)
            }
            Err(e) => {
                tracing::error!(action = ?self.action, ?step, completed = ?self.completed, error = %e, "Dispatch step failed");
                Err(self.fail(step, e))
            }
        }
    }

    fn fail(&self, failed_step: DispatchStep, source: ClientError) -> ClientError {
        if self.completed.iter().any(DispatchStep::is_mutation) {
            ClientError::PartialDispatch {
                action: self.action,
                failed_step,
                completed: self.completed.clone(),
                source: Box::new(source),
            }
        } else {
            source
        }
    }

    pub(crate) fn finish<S>(
        self,
        new_status: S,
        wallet_refresh: Option<JoinHandle<()>>,
    ) -> DispatchReport<S> {
        tracing::info!(action = ?self.action, steps = self.completed.len(), "Dispatch completed");
        DispatchReport {
            action: self.action,
            steps: self.completed,
            new_status,
            wallet_refresh,
        }
    }
}
