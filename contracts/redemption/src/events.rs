use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct BuybackExtendedEvent {
    pub old_date: u64,
    pub new_date: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ExchangeTokenAddedEvent {
    pub token: Address,
    pub rate: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ExchangedEvent {
    pub holder: Address,
    pub token: Address,
    /// Units of the instrument burned
    pub burned: i128,
    /// Units of `token` paid out
    pub received: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RedeemedEvent {
    pub holder: Address,
    pub units: i128,
    pub payout: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IssuedEvent {
    pub receiver: Address,
    pub amount: i128,
}
