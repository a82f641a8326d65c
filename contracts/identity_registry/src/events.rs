use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct IdentityRegisteredEvent {
    pub investor: Address,
    pub country: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IdentityRemovedEvent {
    pub investor: Address,
}
