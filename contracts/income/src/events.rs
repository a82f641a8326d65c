use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct IncomePaidEvent {
    pub investor: Address,
    pub period: u64,
    pub income: i128,
    pub dividend: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IncomeBatchPaidEvent {
    pub period: u64,
    pub holders_paid: u32,
    pub total: i128,
    pub next_payable_at: u64,
}
