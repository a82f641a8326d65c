use instrument_common::{ContractStandard, DeliveryMode};
use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FutureClass {
    Financial = 0,
    Commodity = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FutureTerms {
    pub class: FutureClass,
    /// Ticker of the underlying, e.g. `WHEAT` or `EURUSD`
    pub underlying: Symbol,
    pub delivery_mode: DeliveryMode,
    pub standard: ContractStandard,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    Terms,
    Economics,
    Expiration,
    Signer,
    SpotFrozen,
    /// (deliverer, receiver)
    Delivered(Address, Address),
    Receipt(Address),
}
