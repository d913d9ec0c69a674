//! # Inbound Ports (Driving Ports)
//!
//! The transaction functions exported by the shipment contract.

use crate::domain::Shipment;
use crate::errors::ContractError;
use crate::ports::outbound::TransactionContext;

/// Shipment contract API.
///
/// Every call is one atomic ledger invocation. An `Err` aborts the
/// invocation and the platform discards all writes staged through `ctx`.
pub trait ShipmentContractApi {
    /// Register a new shipment. Only the manufacturer identity may call this.
    fn create_shipment(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        origin: &str,
        destination: &str,
    ) -> Result<(), ContractError>;

    /// Record a status change. The caller becomes the custodian.
    fn update_status(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        new_status: &str,
    ) -> Result<(), ContractError>;

    /// Hand custody to another organization. Only the current owner may call this.
    fn transfer_ownership(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        new_owner_msp: &str,
    ) -> Result<(), ContractError>;

    /// Load one shipment.
    fn query_shipment(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
    ) -> Result<Shipment, ContractError>;

    /// Load every shipment on the ledger, in key order.
    fn get_all_shipments(
        &self,
        ctx: &mut dyn TransactionContext,
    ) -> Result<Vec<Shipment>, ContractError>;
}
