use soroban_sdk::{contractclient, Address, Env, Vec};

use crate::types::Parameters;

#[contractclient(name = "IdentityRegistryClient")]
pub trait IdentityRegistryInterface {
    fn is_verified(env: Env, address: Address) -> bool;
}

/// The holder ledger of the underlying security. Lifecycle contracts that
/// burn or mint must be registered as operators.
#[contractclient(name = "SecurityTokenClient")]
pub trait SecurityTokenInterface {
    fn balance(env: Env, id: Address) -> i128;
    fn total_supply(env: Env) -> i128;
    fn holders(env: Env) -> Vec<Address>;
    fn mint(env: Env, operator: Address, to: Address, amount: i128);
    fn burn(env: Env, operator: Address, from: Address, amount: i128);
}

#[contractclient(name = "ParametersClient")]
pub trait ParametersInterface {
    fn get_parameters(env: Env) -> Parameters;
}
