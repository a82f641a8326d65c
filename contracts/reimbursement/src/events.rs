use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ScheduleSetEvent {
    pub interest_rate: i128,
    pub periodic_rate: i128,
    pub numerator: i128,
    pub denominator: i128,
    pub periodic_payment: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AmortizedPaidEvent {
    pub investor: Address,
    pub period: u64,
    pub amount: i128,
    pub final_payment: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AmortizedBatchPaidEvent {
    pub period: u64,
    pub holders_paid: u32,
    pub total: i128,
    pub next_payable_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MaturityPaidEvent {
    pub investor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PutPeriodSetEvent {
    pub start: u64,
    pub end: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenPutEvent {
    pub holder: Address,
    pub units: i128,
    pub payout: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenCalledEvent {
    pub investor: Address,
    pub units: i128,
    pub payout: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IssuedEvent {
    pub receiver: Address,
    pub amount: i128,
}
