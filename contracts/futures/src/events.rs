use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct FutureDeliveredEvent {
    pub receiver: Address,
    /// Underlying units delivered
    pub units: i128,
    /// Payment collected at the strike
    pub payment: i128,
    /// Receipt number when attested off-chain
    pub receipt_number: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CashSettledEvent {
    pub payer: Address,
    pub payee: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct StrikeModifiedEvent {
    pub old_strike: i128,
    pub new_strike: i128,
}
