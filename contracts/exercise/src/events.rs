use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ExercisedEvent {
    pub holder: Address,
    pub balance: i128,
    pub exercised_at: u64,
}
