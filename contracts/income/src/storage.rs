use instrument_common::PaymentFrequency;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum IncomeType {
    Normal = 0,
    /// Missed periods may be paid later
    Cumulative = 1,
    /// Every payment carries a dividend on top of the rate
    Participating = 2,
    CumulativeParticipating = 3,
}

impl IncomeType {
    pub fn is_cumulative(&self) -> bool {
        matches!(self, IncomeType::Cumulative | IncomeType::CumulativeParticipating)
    }

    pub fn is_participating(&self) -> bool {
        matches!(
            self,
            IncomeType::Participating | IncomeType::CumulativeParticipating
        )
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncomeTerms {
    pub income_type: IncomeType,
    pub frequency: PaymentFrequency,
    /// Payment-token units per unit held, per period
    pub income_rate: i128,
    /// Zero for a perpetual instrument
    pub maturity: u64,
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
    Paid(Address, u64),
}
