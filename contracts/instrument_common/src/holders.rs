use soroban_sdk::{Address, Env, Vec};

use crate::clients::{IdentityRegistryClient, ParametersClient, SecurityTokenClient};
use crate::types::Parameters;

pub fn load_parameters(env: &Env, parameters: &Address) -> Parameters {
    ParametersClient::new(env, parameters).get_parameters()
}

/// Balance of `investor` in the underlying asset, or zero when the identity
/// registry does not verify them. A positive result means "holder".
pub fn holder_balance(env: &Env, params: &Parameters, investor: &Address) -> i128 {
    if !is_verified(env, params, investor) {
        return 0;
    }
    SecurityTokenClient::new(env, &params.asset).balance(investor)
}

pub fn is_verified(env: &Env, params: &Parameters, investor: &Address) -> bool {
    IdentityRegistryClient::new(env, &params.identity_registry).is_verified(investor)
}

/// Every verified holder with its balance, in the asset's holder order
pub fn verified_holders(env: &Env, params: &Parameters) -> Vec<(Address, i128)> {
    let asset = SecurityTokenClient::new(env, &params.asset);
    let registry = IdentityRegistryClient::new(env, &params.identity_registry);

    let mut out = Vec::new(env);
    for holder in asset.holders().iter() {
        if !registry.is_verified(&holder) {
            continue;
        }
        let balance = asset.balance(&holder);
        if balance > 0 {
            out.push_back((holder, balance));
        }
    }
    out
}

pub fn mint(env: &Env, params: &Parameters, to: &Address, amount: i128) {
    SecurityTokenClient::new(env, &params.asset).mint(&env.current_contract_address(), to, &amount);
}

pub fn burn(env: &Env, params: &Parameters, from: &Address, amount: i128) {
    SecurityTokenClient::new(env, &params.asset).burn(
        &env.current_contract_address(),
        from,
        &amount,
    );
}
