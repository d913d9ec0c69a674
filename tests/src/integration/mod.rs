//! # Integration Flows
//!
//! - `contract_flows`: multi-organization custody scenarios on the mock ledger
//! - `relay_flows`: relay + hub + subscriber endpoint without a ledger
//! - `end_to_end`: contract commits relayed to a live WebSocket subscriber

pub mod contract_flows;
pub mod end_to_end;
pub mod relay_flows;
