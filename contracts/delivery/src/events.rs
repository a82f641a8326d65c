use instrument_common::DeliveryMode;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct DeliveredEvent {
    pub deliverer: Address,
    pub receiver: Address,
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReceiptDeliveredEvent {
    pub receipt_number: u64,
    pub deliverer: Address,
    pub receiver: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DeliveryElectedEvent {
    pub elected_by: Address,
    pub mode: DeliveryMode,
}
