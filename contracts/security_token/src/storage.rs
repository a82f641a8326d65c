use soroban_sdk::{contracttype, Address, Env};

/// Neighbours of a holder in the insertion-ordered holder list
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HolderLink {
    pub prev: Option<Address>,
    pub next: Option<Address>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    IdentityRegistry,
    Operators(Address),
    Balance(Address),
    TotalSupply,
    HolderHead,
    HolderTail,
    HolderCount,
    HolderLink(Address),
}

pub fn read_balance(env: &Env, id: &Address) -> i128 {
    env.storage()
        .persistent()
        .get::<DataKey, i128>(&DataKey::Balance(id.clone()))
        .unwrap_or(0)
}

pub fn write_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
    }
}

pub fn read_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get::<DataKey, i128>(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn write_total_supply(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &amount);
}
