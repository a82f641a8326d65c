#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{
    BuybackExtendedEvent, ExchangeTokenAddedEvent, ExchangedEvent, IssuedEvent, RedeemedEvent,
};
use storage::DataKey;
pub use storage::RedemptionState;

use instrument_common::{holders, math, Parameters};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

/// Buyback, redemption and cross-token exchange of an instrument. Payouts
/// come out of this contract's own balances, which the owner funds.
#[contract]
pub struct Redemption;

#[contractimpl]
impl Redemption {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the redemption state and buyback date
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidDate`: Buyback date not in the future
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        state: RedemptionState,
        buyback_date: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if buyback_date <= env.ledger().timestamp() {
            return Err(Error::InvalidDate);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::State, &state);
        env.storage().instance().set(&DataKey::BuybackDate, &buyback_date);

        Ok(())
    }

    /// Mint `amount` units to a verified receiver
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `InvalidAmount`: Amount <= 0
    /// - `InvestorNotVerified`: Receiver has no verified identity
    pub fn issue_token(env: Env, caller: Address, amount: i128, receiver: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let params = Self::params(&env)?;
        if !holders::is_verified(&env, &params, &receiver) {
            return Err(Error::InvestorNotVerified);
        }

        holders::mint(&env, &params, &receiver, amount);

        env.events().publish(
            (Symbol::new(&env, "issued"), receiver.clone()),
            IssuedEvent { receiver, amount },
        );

        Ok(())
    }

    /// Push the buyback date later
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotExtendible`: State does not allow extension
    /// - `InvalidDate`: New date not after the current one
    pub fn extend_buyback_date(env: Env, caller: Address, new_date: u64) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        if !Self::state(env.clone())?.is_extendible() {
            return Err(Error::NotExtendible);
        }
        let old_date = Self::buyback_date(env.clone())?;
        if new_date <= old_date {
            return Err(Error::InvalidDate);
        }

        env.storage().instance().set(&DataKey::BuybackDate, &new_date);

        env.events().publish(
            (Symbol::new(&env, "buyback_extended"),),
            BuybackExtendedEvent { old_date, new_date },
        );

        Ok(())
    }

    /// Register `token` as an exchange target at `rate` units per instrument unit
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotExchangeable`: State does not allow exchange
    /// - `InvalidRate`: Rate <= 0
    /// - `InvalidAddress`: Token is this contract, the asset or the payment token
    /// - `TokenAlreadyRegistered`: Token already registered
    pub fn add_exchangeable_token(
        env: Env,
        caller: Address,
        token: Address,
        rate: i128,
    ) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        if !Self::state(env.clone())?.is_exchangeable() {
            return Err(Error::NotExchangeable);
        }
        if rate <= 0 {
            return Err(Error::InvalidRate);
        }
        let params = Self::params(&env)?;
        if token == env.current_contract_address()
            || token == params.asset
            || token == params.payment_token
        {
            return Err(Error::InvalidAddress);
        }
        let key = DataKey::ExchangeRate(token.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::TokenAlreadyRegistered);
        }

        env.storage().persistent().set(&key, &rate);

        env.events().publish(
            (Symbol::new(&env, "exchange_token_added"), token.clone()),
            ExchangeTokenAddedEvent { token, rate },
        );

        Ok(())
    }

    // ============================================
    // HOLDER OPERATIONS
    // ============================================

    /// Burn `amount` units and receive `amount * rate` of `token`. Once per holder.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotExchangeable`: State does not allow exchange
    /// - `TokenNotRegistered`: Token not registered
    /// - `AlreadyExchanged`: Holder already exchanged
    /// - `InvalidAmount`: Amount <= 0
    /// - `NotAHolder` / `InsufficientHolderBalance`: Holder owns too little
    /// - `InsufficientBalance`: Contract holds too little of `token`
    pub fn exchange_token(env: Env, holder: Address, token: Address, amount: i128) -> Result<(), Error> {
        holder.require_auth();

        if !Self::state(env.clone())?.is_exchangeable() {
            return Err(Error::NotExchangeable);
        }
        let rate = Self::exchange_rate(env.clone(), token.clone()).ok_or(Error::TokenNotRegistered)?;
        let key = DataKey::Exchanged(holder.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyExchanged);
        }

        let params = Self::params(&env)?;
        Self::check_units(&env, &params, &holder, amount)?;

        let received = math::mul(amount, rate).ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &token);
        let this = env.current_contract_address();
        if client.balance(&this) < received {
            return Err(Error::InsufficientBalance);
        }

        env.storage().persistent().set(&key, &true);
        holders::burn(&env, &params, &holder, amount);
        client.transfer(&this, &holder, &received);

        env.events().publish(
            (Symbol::new(&env, "exchanged"), holder.clone()),
            ExchangedEvent {
                holder,
                token,
                burned: amount,
                received,
            },
        );

        Ok(())
    }

    /// Sell `amount` units back at the unit price once the buyback date
    /// is reached. Once per holder.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotRedeemable`: State does not allow redemption
    /// - `BuybackNotReached`: Buyback date not reached
    /// - `AlreadyRedeemed`: Holder already redeemed
    /// - `InvalidAmount`: Amount <= 0
    /// - `NotAHolder` / `InsufficientHolderBalance`: Holder owns too little
    /// - `InsufficientBalance`: Contract cannot cover the payout
    pub fn redeem_token(env: Env, holder: Address, amount: i128) -> Result<(), Error> {
        holder.require_auth();

        if !Self::state(env.clone())?.is_redeemable() {
            return Err(Error::NotRedeemable);
        }
        if env.ledger().timestamp() < Self::buyback_date(env.clone())? {
            return Err(Error::BuybackNotReached);
        }
        let key = DataKey::Redeemed(holder.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyRedeemed);
        }

        let params = Self::params(&env)?;
        Self::check_units(&env, &params, &holder, amount)?;

        let payout = math::mul(amount, params.price).ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < payout {
            return Err(Error::InsufficientBalance);
        }

        env.storage().persistent().set(&key, &true);
        holders::burn(&env, &params, &holder, amount);
        log!(&env, "redeeming {} units for {}", amount, payout);
        client.transfer(&this, &holder, &payout);

        env.events().publish(
            (Symbol::new(&env, "redeemed"), holder.clone()),
            RedeemedEvent {
                holder,
                units: amount,
                payout,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn state(env: Env) -> Result<RedemptionState, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }

    pub fn buyback_date(env: Env) -> Result<u64, Error> {
        env.storage()
            .instance()
            .get(&DataKey::BuybackDate)
            .ok_or(Error::NotInitialized)
    }

    pub fn exchange_rate(env: Env, token: Address) -> Option<i128> {
        env.storage().persistent().get(&DataKey::ExchangeRate(token))
    }

    pub fn is_redeemed(env: Env, holder: Address) -> bool {
        env.storage().persistent().has(&DataKey::Redeemed(holder))
    }

    pub fn is_exchanged(env: Env, holder: Address) -> bool {
        env.storage().persistent().has(&DataKey::Exchanged(holder))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn params(env: &Env) -> Result<Parameters, Error> {
        let parameters: Address = env
            .storage()
            .instance()
            .get(&DataKey::Parameters)
            .ok_or(Error::NotInitialized)?;
        Ok(holders::load_parameters(env, &parameters))
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if *caller != Self::owner(env.clone())? {
            return Err(Error::NotOwner);
        }
        Ok(())
    }

    fn check_units(env: &Env, params: &Parameters, holder: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let balance = holders::holder_balance(env, params, holder);
        if balance <= 0 {
            return Err(Error::NotAHolder);
        }
        if balance < amount {
            return Err(Error::InsufficientHolderBalance);
        }
        Ok(())
    }
}
