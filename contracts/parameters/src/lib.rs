#![no_std]

use instrument_common::Parameters;
use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Price must be positive
    InvalidPrice = 20,
    /// Precision must be positive
    InvalidPrecision = 21,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Parameters,
}

/// Immutable configuration shared by every lifecycle contract of one instrument
#[contract]
pub struct InstrumentParameters;

#[contractimpl]
impl InstrumentParameters {
    /// Publish the instrument parameters
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Parameters already published
    /// - `InvalidPrice`: Price <= 0
    /// - `InvalidPrecision`: Precision <= 0
    pub fn initialize(
        env: Env,
        owner: Address,
        price: i128,
        precision: i128,
        asset: Address,
        payment_token: Address,
        identity_registry: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Parameters) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if price <= 0 {
            return Err(Error::InvalidPrice);
        }
        if precision <= 0 {
            return Err(Error::InvalidPrecision);
        }

        let parameters = Parameters {
            price,
            precision,
            asset,
            payment_token,
            identity_registry,
        };

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage()
            .instance()
            .set(&DataKey::Parameters, &parameters);

        env.events()
            .publish((Symbol::new(&env, "parameters_set"), owner), parameters);

        Ok(())
    }

    pub fn get_parameters(env: Env) -> Result<Parameters, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Parameters)
            .ok_or(Error::NotInitialized)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }
}
