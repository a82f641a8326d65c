use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct OptionExercisedEvent {
    pub holder: Address,
    pub balance: i128,
    pub exercised_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct OptionDeliveredEvent {
    pub deliverer: Address,
    pub receiver: Address,
    pub units: i128,
    /// Strike payment collected from the receiver
    pub payment: i128,
    pub receipt_number: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct OptionCashSettledEvent {
    pub holder: Address,
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
