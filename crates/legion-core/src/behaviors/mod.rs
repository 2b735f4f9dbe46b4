//! Built-in behaviors.
//!
//! - [`ChargeStance`]: holds the charge buff while a charger waits or runs
//! - [`Regen`]: regenerates hit points under a regen buff
//! - [`ChargeRun`]: the WAITING → CHARGING → NORMAL state machine
//! - [`Engage`]: targeting, attack resolution and movement
//!
//! Use [`BehaviorRegistry::default_bundles()`](crate::behavior::BehaviorRegistry::default_bundles)
//! to get them registered per behavior class.

mod charge;
mod engage;
mod regen;

pub use charge::{ChargeRun, ChargeStance};
pub use engage::Engage;
pub use regen::Regen;
