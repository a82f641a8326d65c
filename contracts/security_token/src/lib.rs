#![no_std]

mod error;
mod events;
mod holders;
mod storage;

pub use error::Error;
use events::{BurnEvent, MintEvent, TransferEvent};
use storage::{read_balance, read_total_supply, write_balance, write_total_supply, DataKey};

use instrument_common::clients::IdentityRegistryClient;
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

/// Holder ledger of a regulated security: balances, total supply and the
/// ordered set of current holders. Only verified identities may receive.
#[contract]
pub struct SecurityToken;

#[contractimpl]
impl SecurityToken {
    /// Initialize the token contract
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, identity_registry: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);

        Ok(())
    }

    /// Add an operator (a lifecycle contract allowed to issue and burn)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    /// Issue new units to a verified receiver
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Operator is neither admin nor registered
    /// - `InvalidAmount`: Amount <= 0
    /// - `ReceiverNotVerified`: Receiver has no verified identity
    pub fn mint(env: Env, operator: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        Self::require_verified(&env, &to)?;

        Self::credit(&env, &to, amount)?;
        let total_supply = read_total_supply(&env)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        write_total_supply(&env, total_supply);

        env.events().publish(
            (Symbol::new(&env, "mint"), to.clone()),
            MintEvent {
                to,
                amount,
                total_supply,
            },
        );

        Ok(())
    }

    /// Destroy units held by `from`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Operator is neither admin nor registered
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, operator: Address, from: Address, amount: i128) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        Self::debit(&env, &from, amount)?;
        let total_supply = read_total_supply(&env) - amount;
        write_total_supply(&env, total_supply);

        env.events().publish(
            (Symbol::new(&env, "burn"), from.clone()),
            BurnEvent {
                from,
                amount,
                total_supply,
            },
        );

        Ok(())
    }

    /// Transfer units between holders
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `ReceiverNotVerified`: Receiver has no verified identity
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        Self::require_verified(&env, &to)?;

        if read_balance(&env, &from) < amount {
            return Err(Error::InsufficientBalance);
        }

        if from != to {
            Self::debit(&env, &from, amount)?;
            Self::credit(&env, &to, amount)?;
        }

        env.events().publish(
            (Symbol::new(&env, "transfer"), from.clone(), to.clone()),
            TransferEvent { from, to, amount },
        );

        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        read_total_supply(&env)
    }

    /// Current holders in the order they first received units
    pub fn holders(env: Env) -> Vec<Address> {
        holders::list(&env)
    }

    pub fn holder_count(env: Env) -> u32 {
        holders::count(&env)
    }

    pub fn is_holder(env: Env, address: Address) -> bool {
        holders::contains(&env, &address)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn require_operator(env: &Env, operator: &Address) -> Result<(), Error> {
        let admin = Self::admin(env)?;
        operator.require_auth();

        if *operator != admin && !Self::is_operator(env.clone(), operator.clone()) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn require_verified(env: &Env, address: &Address) -> Result<(), Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::IdentityRegistry)
            .ok_or(Error::NotInitialized)?;

        if !IdentityRegistryClient::new(env, &registry).is_verified(address) {
            return Err(Error::ReceiverNotVerified);
        }
        Ok(())
    }

    fn credit(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
        let balance = read_balance(env, to)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        write_balance(env, to, balance);
        holders::insert(env, to);
        Ok(())
    }

    fn debit(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
        let balance = read_balance(env, from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        let remaining = balance - amount;
        write_balance(env, from, remaining);
        if remaining == 0 {
            holders::remove(env, from);
        }
        Ok(())
    }
}
