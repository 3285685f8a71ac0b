//! Type markers for GreenSpaceClient's typestate pattern.
//!
//! Order, wallet and notification APIs exist only on an authenticated
//! client, so calling them before login does not compile.

// ============================================================================
// State Markers
// ============================================================================

/// Guest state - client is created but nobody is signed in.
///
/// Available transitions:
/// - `login()` -> Authenticated
/// - `restore_session()` / `restore_saved()` -> Authenticated
#[derive(Debug, Clone, Copy, Default)]
pub struct Guest;

/// Authenticated state - a customer is signed in.
///
/// Available operations: orders, actions, wallet, notifications,
/// `save_session()`, `logout()`.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

/// Sealed trait for client states.
pub trait ClientState: private::Sealed + Send + Sync + 'static {}
impl ClientState for Guest {}
impl ClientState for Authenticated {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Guest {}
    impl Sealed for super::Authenticated {}
}
