use instrument_common::PaymentFrequency;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ReimbursementMode {
    FixedMaturity = 0,
    FixedMaturityWithPut = 1,
    FixedMaturityWithCall = 2,
    FixedMaturityWithPutAndCall = 3,
    /// Principal repaid in periodic installments
    Amortizable = 4,
    /// Never matures
    Perpetual = 5,
}

impl ReimbursementMode {
    pub fn pays_at_maturity(&self) -> bool {
        matches!(
            self,
            ReimbursementMode::FixedMaturity
                | ReimbursementMode::FixedMaturityWithPut
                | ReimbursementMode::FixedMaturityWithCall
                | ReimbursementMode::FixedMaturityWithPutAndCall
        )
    }

    pub fn has_put(&self) -> bool {
        matches!(
            self,
            ReimbursementMode::FixedMaturityWithPut | ReimbursementMode::FixedMaturityWithPutAndCall
        )
    }

    /// Early recall before maturity
    pub fn has_call_option(&self) -> bool {
        matches!(
            self,
            ReimbursementMode::FixedMaturityWithCall
                | ReimbursementMode::FixedMaturityWithPutAndCall
        )
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RateType {
    Fixed = 0,
    Variable = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReimbursementTerms {
    pub mode: ReimbursementMode,
    pub rate_type: RateType,
    pub frequency: PaymentFrequency,
    /// Zero for a perpetual instrument
    pub maturity: u64,
    pub face_value: i128,
    /// Annual rate in percent
    pub interest_rate: i128,
    pub deployed_at: u64,
}

/// Every field scaled by `AMORTIZATION_SCALE`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmortizationSchedule {
    pub periodic_rate: i128,
    /// Number of periods until maturity, zero when there is none
    pub loan_term: i128,
    /// `r(1+r)^n`
    pub numerator: i128,
    /// `(1+r)^n - 1`
    pub denominator: i128,
    /// Installment per unit held, zero until the schedule is set
    pub periodic_payment: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PutPeriod {
    pub start: u64,
    pub end: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    Terms,
    Schedule,
    NextPayableAt,
    PutPeriod,
    Paid(Address, u64),
    MaturityPaid(Address),
}
