use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct InterestPaidEvent {
    pub investor: Address,
    pub period: u64,
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct InterestBatchPaidEvent {
    pub period: u64,
    pub holders_paid: u32,
    pub token: Address,
    pub total: i128,
    pub next_payable_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CashInterestRecordedEvent {
    pub investor: Address,
    pub period: u64,
    pub receipt_number: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RateUpdatedEvent {
    pub old_rate: i128,
    pub new_rate: i128,
}
