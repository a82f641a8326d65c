use instrument_common::{ContractStandard, DeliveryMode, Economics, ExerciseTerms};
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OptionKind {
    /// Holder may buy the underlying at the strike
    Call = 0,
    /// Holder may sell the underlying at the strike
    Put = 1,
}

impl OptionKind {
    /// Per-unit payoff to the holder, negative out of the money
    pub fn payoff(&self, economics: &Economics) -> i128 {
        let spread = economics.spread();
        match self {
            OptionKind::Call => spread,
            OptionKind::Put => -spread,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionTerms {
    pub kind: OptionKind,
    pub exercise: ExerciseTerms,
    pub delivery_mode: DeliveryMode,
    pub standard: ContractStandard,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    Terms,
    Economics,
    Signer,
    SpotFrozen,
    Exercised(Address),
    /// (deliverer, receiver)
    Delivered(Address, Address),
    /// Keyed by holder
    Receipt(Address),
}
