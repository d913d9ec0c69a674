//! # Shipment Contract Service
//!
//! Implements [`ShipmentContractApi`] over any [`TransactionContext`], plus the
//! string-routed transaction surface the ledger platform calls into.
//!
//! ## Access rules
//!
//! | Function            | Who may call               |
//! |---------------------|----------------------------|
//! | `CreateShipment`    | manufacturer MSP only      |
//! | `UpdateStatus`      | anyone; caller takes custody |
//! | `TransferOwnership` | current owner only         |
//! | `QueryShipment`     | anyone                     |
//! | `GetAllShipments`   | anyone                     |

use tracing::{debug, info, instrument, warn};

use crate::domain::{ContractInfo, Shipment};
use crate::errors::ContractError;
use crate::ports::inbound::ShipmentContractApi;
use crate::ports::outbound::TransactionContext;

/// Default MSP allowed to create shipments.
pub const DEFAULT_MANUFACTURER_MSP: &str = "ManufacturerMSP";

/// Exported transaction function names.
pub mod functions {
    /// `CreateShipment(id, origin, destination)`
    pub const CREATE_SHIPMENT: &str = "CreateShipment";
    /// `UpdateStatus(id, newStatus)`
    pub const UPDATE_STATUS: &str = "UpdateStatus";
    /// `TransferOwnership(id, newOwnerMSP)`
    pub const TRANSFER_OWNERSHIP: &str = "TransferOwnership";
    /// `QueryShipment(id)`
    pub const QUERY_SHIPMENT: &str = "QueryShipment";
    /// `GetAllShipments()`
    pub const GET_ALL_SHIPMENTS: &str = "GetAllShipments";
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Contract deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// The only MSP permitted to create shipments.
    pub manufacturer_msp: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            manufacturer_msp: DEFAULT_MANUFACTURER_MSP.to_string(),
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// The shipment contract.
///
/// Holds no state between invocations. Everything it knows about the world
/// comes through the [`TransactionContext`] passed to each call.
#[derive(Debug, Clone, Default)]
pub struct ShipmentContract {
    config: ContractConfig,
    info: ContractInfo,
}

impl ShipmentContract {
    /// Create a contract with the given configuration.
    #[must_use]
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            info: ContractInfo::default(),
        }
    }

    /// Deployment configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Published contract metadata.
    #[must_use]
    pub fn info(&self) -> &ContractInfo {
        &self.info
    }

    /// Route a named transaction function to its operation.
    ///
    /// Write functions return an empty payload. Queries return JSON: a
    /// single shipment object, or an array (never `null`) for
    /// `GetAllShipments`.
    pub fn invoke(
        &self,
        ctx: &mut dyn TransactionContext,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, ContractError> {
        debug!(function, tx_id = %ctx.tx_id(), argc = args.len(), "Routing transaction");

        match function {
            functions::CREATE_SHIPMENT => {
                let [id, origin, destination] = expect_args::<3>(function, args)?;
                self.create_shipment(ctx, id, origin, destination)?;
                Ok(Vec::new())
            }
            functions::UPDATE_STATUS => {
                let [id, new_status] = expect_args::<2>(function, args)?;
                self.update_status(ctx, id, new_status)?;
                Ok(Vec::new())
            }
            functions::TRANSFER_OWNERSHIP => {
                let [id, new_owner] = expect_args::<2>(function, args)?;
                self.transfer_ownership(ctx, id, new_owner)?;
                Ok(Vec::new())
            }
            functions::QUERY_SHIPMENT => {
                let [id] = expect_args::<1>(function, args)?;
                let shipment = self.query_shipment(ctx, id)?;
                encode(id, &shipment)
            }
            functions::GET_ALL_SHIPMENTS => {
                let [] = expect_args::<0>(function, args)?;
                let shipments = self.get_all_shipments(ctx)?;
                encode("*", &shipments)
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }

    /// Load and decode the shipment stored under `id`.
    fn load(
        &self,
        ctx: &dyn TransactionContext,
        id: &str,
    ) -> Result<Shipment, ContractError> {
        let bytes = ctx
            .get_state(id)?
            .ok_or_else(|| ContractError::NotFound(id.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ContractError::corrupt(id, &e))
    }

    fn store(
        &self,
        ctx: &mut dyn TransactionContext,
        shipment: &Shipment,
    ) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec(shipment)
            .map_err(|e| ContractError::corrupt(&shipment.id, &e))?;
        ctx.put_state(&shipment.id, bytes)?;
        Ok(())
    }
}

impl ShipmentContractApi for ShipmentContract {
    #[instrument(skip(self, ctx))]
    fn create_shipment(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        origin: &str,
        destination: &str,
    ) -> Result<(), ContractError> {
        let caller = ctx.caller_msp()?;

        if caller != self.config.manufacturer_msp {
            warn!(shipment_id = %id, caller = %caller, "Create rejected: caller is not the manufacturer");
            return Err(ContractError::permission_denied(
                &caller,
                format!("only {} may create shipments", self.config.manufacturer_msp),
            ));
        }

        if id.is_empty() {
            return Err(ContractError::InvalidArgument("empty shipment id".into()));
        }

        if ctx.get_state(id)?.is_some() {
            warn!(shipment_id = %id, caller = %caller, "Create rejected: shipment already exists");
            return Err(ContractError::AlreadyExists(id.to_string()));
        }

        let shipment = Shipment::new(id, caller.as_str(), origin, destination, ctx.tx_timestamp());
        self.store(ctx, &shipment)?;

        info!(shipment_id = %id, caller = %caller, "Shipment created");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    fn update_status(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        new_status: &str,
    ) -> Result<(), ContractError> {
        let mut shipment = self.load(ctx, id).inspect_err(|e| {
            warn!(shipment_id = %id, error = %e, "Status update rejected");
        })?;

        if new_status.is_empty() {
            warn!(shipment_id = %id, "Status update rejected: empty status");
            return Err(ContractError::InvalidArgument("empty status".into()));
        }

        // Any status update hands custody to the caller.
        let caller = ctx.caller_msp()?;
        shipment.record_status(new_status, &caller, ctx.tx_timestamp());
        self.store(ctx, &shipment)?;

        info!(shipment_id = %id, caller = %caller, status = %new_status, "Shipment status updated");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    fn transfer_ownership(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
        new_owner_msp: &str,
    ) -> Result<(), ContractError> {
        let mut shipment = self.load(ctx, id).inspect_err(|e| {
            warn!(shipment_id = %id, error = %e, "Transfer rejected");
        })?;

        if new_owner_msp.is_empty() {
            warn!(shipment_id = %id, "Transfer rejected: empty owner MSP");
            return Err(ContractError::InvalidArgument("empty owner MSP".into()));
        }

        let caller = ctx.caller_msp()?;
        if !shipment.is_owned_by(&caller) {
            warn!(
                shipment_id = %id,
                caller = %caller,
                owner = %shipment.owner_msp,
                "Transfer rejected: caller is not the current owner"
            );
            return Err(ContractError::permission_denied(&caller, "not the current owner"));
        }

        shipment.transfer_to(new_owner_msp, ctx.tx_timestamp());
        self.store(ctx, &shipment)?;

        info!(shipment_id = %id, caller = %caller, new_owner = %new_owner_msp, "Ownership transferred");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    fn query_shipment(
        &self,
        ctx: &mut dyn TransactionContext,
        id: &str,
    ) -> Result<Shipment, ContractError> {
        match self.load(ctx, id) {
            Ok(shipment) => {
                debug!(shipment_id = %id, "Shipment queried");
                Ok(shipment)
            }
            Err(e) => {
                warn!(shipment_id = %id, error = %e, "Query failed");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, ctx))]
    fn get_all_shipments(
        &self,
        ctx: &mut dyn TransactionContext,
    ) -> Result<Vec<Shipment>, ContractError> {
        // Full namespace scan. Cost grows with the number of shipments.
        let entries = ctx.get_state_by_range("", "")?;

        let shipments = entries
            .iter()
            .map(|(key, bytes)| {
                serde_json::from_slice::<Shipment>(bytes).map_err(|e| {
                    warn!(key = %key, error = %e, "Undecodable shipment in range scan");
                    ContractError::corrupt(key, &e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = shipments.len(), "Returning all shipments");
        Ok(shipments)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn expect_args<'a, const N: usize>(
    function: &str,
    args: &[&'a str],
) -> Result<[&'a str; N], ContractError> {
    <[&str; N]>::try_from(args).map_err(|_| {
        ContractError::InvalidArgument(format!(
            "{function} expects {N} argument(s), got {}",
            args.len()
        ))
    })
}

fn encode<T: serde::Serialize>(key: &str, value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::corrupt(key, &e))
}

// =============================================================================
// TESTS
// =============================================================================
