use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RedemptionState {
    Redeemable = 0,
    Extendible = 1,
    Exchangeable = 2,
    Callable = 3,
    Puttable = 4,
    Fixed = 5,
    ExtendibleExchangeable = 6,
}

impl RedemptionState {
    pub fn is_redeemable(&self) -> bool {
        *self == RedemptionState::Redeemable
    }

    pub fn is_extendible(&self) -> bool {
        matches!(
            self,
            RedemptionState::Extendible | RedemptionState::ExtendibleExchangeable
        )
    }

    pub fn is_exchangeable(&self) -> bool {
        matches!(
            self,
            RedemptionState::Exchangeable | RedemptionState::ExtendibleExchangeable
        )
    }
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    State,
    BuybackDate,
    /// Instrument units to `token` units
    ExchangeRate(Address),
    Redeemed(Address),
    Exchanged(Address),
}
