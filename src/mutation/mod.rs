pub mod change;
pub mod controller;

pub use change::{Change, PendingMutation};
pub use controller::MutationController;
