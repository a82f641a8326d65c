use instrument_common::PaymentFrequency;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum InterestType {
    Fixed = 0,
    Variable = 1,
    /// Paid off-chain, recorded against a signed receipt
    Cash = 2,
    /// Paid in a registered alternate token
    PaymentInKind = 3,
    /// No periodic interest
    ZeroCoupon = 4,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestTerms {
    pub frequency: PaymentFrequency,
    pub interest_type: InterestType,
    /// Zero for a perpetual instrument
    pub maturity: u64,
    pub face_value: i128,
    pub interest_rate: i128,
    /// Start of period 0
    pub issued_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    Terms,
    NextPayableAt,
    Signer,
    InKindToken(Address),
    Paid(Address, u64),
    CashReceipt(Address, u64),
}
