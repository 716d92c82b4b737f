//! CLI command implementations.

pub mod agent_id;
pub mod completions;
pub mod confirm_worker;
pub mod ifil_approve;
pub mod ifil_balance_of;
pub mod label_account;
pub mod wallet_list;
pub mod wallet_migrate;

// Re-export command handlers
pub use agent_id::agent_id;
pub use completions::completions;
pub use confirm_worker::confirm_worker;
pub use ifil_approve::ifil_approve;
pub use ifil_balance_of::ifil_balance_of;
pub use label_account::label_account;
pub use wallet_list::wallet_list;
pub use wallet_migrate::wallet_migrate;
