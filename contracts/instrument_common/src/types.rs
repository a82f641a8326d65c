use soroban_sdk::{contracttype, Address, BytesN};

/// Shared configuration of an instrument, published by the parameters contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameters {
    /// Unit settlement price in payment-token units
    pub price: i128,
    /// Fixed-point divisor applied to rate calculations
    pub precision: i128,
    /// Security token whose balances drive entitlement
    pub asset: Address,
    /// Token every monetary movement settles in
    pub payment_token: Address,
    /// Oracle answering `is_verified`
    pub identity_registry: Address,
}

/// How often a periodic payment falls due
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PaymentFrequency {
    NotPayable = 0,
    Daily = 1,
    Weekly = 2,
    Fortnightly = 3,
    Monthly = 4,
    Quarterly = 5,
    SemiAnnually = 6,
    Annually = 7,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ExerciseStyle {
    /// Any time up to expiration
    American = 0,
    /// Only in the last day before expiration
    European = 1,
    /// Only in windows around `start + k * periodicity`
    Bermudan = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExerciseTerms {
    pub style: ExerciseStyle,
    pub expiration: u64,
    /// First exercise date (European and Bermudan)
    pub start: u64,
    /// Seconds between Bermudan windows
    pub periodicity: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DeliveryMode {
    PhysicalOnly = 0,
    CashOnly = 1,
    /// Owner or a holder picks one of the other two, once
    Electable = 2,
}

impl DeliveryMode {
    pub fn allows_physical(&self) -> bool {
        matches!(self, DeliveryMode::PhysicalOnly)
    }

    pub fn allows_cash(&self) -> bool {
        matches!(self, DeliveryMode::CashOnly)
    }
}

/// Whether the contract terms may be renegotiated
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractStandard {
    Standardized = 0,
    Customized = 1,
}

/// Strike, contract size and spot of a derivative
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Economics {
    pub strike_price: i128,
    pub contract_size: i128,
    pub spot_price: i128,
}

/// Off-chain delivery attestation, stored once per settled receiver
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryReceipt {
    pub receipt_number: u64,
    pub date: u64,
    pub receiver: Address,
    pub deliverer: Address,
    pub amount: i128,
    pub signature: BytesN<65>,
}

/// Off-chain cash-interest attestation, stored per (investor, period)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CashReceipt {
    pub receipt_number: u64,
    pub date: u64,
    pub investor: Address,
    pub amount: i128,
    pub signature: BytesN<65>,
}
