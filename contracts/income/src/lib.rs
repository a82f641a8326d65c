#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{IncomeBatchPaidEvent, IncomePaidEvent};
use storage::DataKey;
pub use storage::{IncomeTerms, IncomeType};

use instrument_common::{holders, math, schedule, Parameters, PaymentFrequency};
use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

/// Periodic income on an equity: `income_rate` per unit held, plus a
/// dividend for participating types. Cumulative types can settle missed
/// periods later.
#[contract]
pub struct Income;

#[contractimpl]
impl Income {
    /// Initialize the income terms. Period 0 is payable immediately.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidRate`: Income rate <= 0
    /// - `InvalidMaturity`: Maturity set but not in the future
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        income_type: IncomeType,
        frequency: PaymentFrequency,
        income_rate: i128,
        maturity: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        let now = env.ledger().timestamp();
        if income_rate <= 0 {
            return Err(Error::InvalidRate);
        }
        if maturity != 0 && maturity <= now {
            return Err(Error::InvalidMaturity);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(
            &DataKey::Terms,
            &IncomeTerms {
                income_type,
                frequency,
                income_rate,
                maturity,
                issued_at: now,
            },
        );
        env.storage().instance().set(&DataKey::NextPayableAt, &now);

        Ok(())
    }

    /// Pay one investor the income of the current period
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPayableYet`: Next payable date not reached
    /// - `AlreadyMatured`: Maturity passed
    /// - `MissingDividend`: Participating income with a zero dividend
    /// - `InvalidAmount`: Negative dividend
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already paid this period
    /// - `InsufficientBalance`: Contract cannot cover the payment
    pub fn pay_income(
        env: Env,
        caller: Address,
        investor: Address,
        dividend: i128,
    ) -> Result<(), Error> {
        let (terms, params, period) = Self::open_period(&env, &caller)?;
        Self::require_payable_now(&env)?;
        let dividend = Self::effective_dividend(&terms, dividend)?;

        Self::pay_period(&env, &terms, &params, &investor, period, dividend)
    }

    /// Pay every current holder the income of the current period and move
    /// the next payable date to the following period. All or nothing.
    ///
    /// # Errors
    /// Same gates as `pay_income`, plus `NoHolders` and
    /// `InsufficientAggregateBalance`.
    pub fn pay_income_to_all(env: Env, caller: Address, dividend: i128) -> Result<(), Error> {
        let (terms, params, period) = Self::open_period(&env, &caller)?;
        Self::require_payable_now(&env)?;
        let dividend = Self::effective_dividend(&terms, dividend)?;

        let all = holders::verified_holders(&env, &params);
        if all.is_empty() {
            return Err(Error::NoHolders);
        }

        let mut due: Vec<(Address, i128)> = Vec::new(&env);
        for (investor, balance) in all.iter() {
            if !Self::is_paid(env.clone(), investor.clone(), period) {
                due.push_back((investor, Self::income_for(&terms, balance, dividend)?));
            }
        }

        let total = math::checked_sum(due.iter().map(|(_, amount)| amount))
            .ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < total {
            return Err(Error::InsufficientAggregateBalance);
        }

        for (investor, _) in due.iter() {
            env.storage()
                .persistent()
                .set(&DataKey::Paid(investor, period), &true);
        }
        let next_payable_at = schedule::period_start(terms.issued_at, period + 1, terms.frequency)
            .ok_or(Error::NotPayable)?;
        env.storage()
            .instance()
            .set(&DataKey::NextPayableAt, &next_payable_at);

        for (investor, amount) in due.iter() {
            client.transfer(&this, &investor, &amount);
        }

        env.events().publish(
            (Symbol::new(&env, "income_batch_paid"), period),
            IncomeBatchPaidEvent {
                period,
                holders_paid: due.len(),
                total,
                next_payable_at,
            },
        );

        Ok(())
    }

    /// Settle a past or current period of a cumulative instrument
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `NotOwner`: Caller is not the owner
    /// - `AlreadyMatured`: Maturity passed
    /// - `NotCumulative`: Income type is not cumulative
    /// - `PeriodNotReached`: Period lies in the future
    /// - `MissingDividend`: Participating income with a zero dividend
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already paid for that period
    /// - `InsufficientBalance`: Contract cannot cover the payment
    pub fn pay_cumulative_income(
        env: Env,
        caller: Address,
        investor: Address,
        period: u64,
        dividend: i128,
    ) -> Result<(), Error> {
        let (terms, params, current) = Self::open_period(&env, &caller)?;

        if !terms.income_type.is_cumulative() {
            return Err(Error::NotCumulative);
        }
        if period > current {
            return Err(Error::PeriodNotReached);
        }
        let dividend = Self::effective_dividend(&terms, dividend)?;

        Self::pay_period(&env, &terms, &params, &investor, period, dividend)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_terms(env: Env) -> Result<IncomeTerms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    pub fn current_period(env: Env) -> Result<u64, Error> {
        let terms = Self::get_terms(env.clone())?;
        schedule::period_index(terms.issued_at, env.ledger().timestamp(), terms.frequency)
            .ok_or(Error::NotPayable)
    }

    pub fn next_payable_at(env: Env) -> Result<u64, Error> {
        env.storage()
            .instance()
            .get(&DataKey::NextPayableAt)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_paid(env: Env, investor: Address, period: u64) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Paid(investor, period))
    }

    /// Income owed to `investor` for one period, before any dividend
    pub fn income_due(env: Env, investor: Address) -> Result<i128, Error> {
        let terms = Self::get_terms(env.clone())?;
        let params = Self::params(&env)?;
        let balance = holders::holder_balance(&env, &params, &investor);
        Self::income_for(&terms, balance, 0)
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

    /// Frequency, owner and maturity gates; returns the current period
    fn open_period(env: &Env, caller: &Address) -> Result<(IncomeTerms, Parameters, u64), Error> {
        let terms = Self::get_terms(env.clone())?;
        let now = env.ledger().timestamp();

        let period = schedule::period_index(terms.issued_at, now, terms.frequency)
            .ok_or(Error::NotPayable)?;

        caller.require_auth();
        if *caller != Self::owner(env.clone())? {
            return Err(Error::NotOwner);
        }

        if terms.maturity != 0 && now >= terms.maturity {
            return Err(Error::AlreadyMatured);
        }

        Ok((terms, Self::params(env)?, period))
    }

    fn require_payable_now(env: &Env) -> Result<(), Error> {
        let next_payable_at = Self::next_payable_at(env.clone())?;
        if env.ledger().timestamp() < next_payable_at {
            return Err(Error::NotPayableYet);
        }
        Ok(())
    }

    /// Dividend actually paid: required for participating types, dropped otherwise
    fn effective_dividend(terms: &IncomeTerms, dividend: i128) -> Result<i128, Error> {
        if !terms.income_type.is_participating() {
            return Ok(0);
        }
        if dividend < 0 {
            return Err(Error::InvalidAmount);
        }
        if dividend == 0 {
            return Err(Error::MissingDividend);
        }
        Ok(dividend)
    }

    fn income_for(terms: &IncomeTerms, balance: i128, dividend: i128) -> Result<i128, Error> {
        math::mul(terms.income_rate, balance)
            .and_then(|v| v.checked_add(dividend))
            .ok_or(Error::InvalidAmount)
    }

    fn pay_period(
        env: &Env,
        terms: &IncomeTerms,
        params: &Parameters,
        investor: &Address,
        period: u64,
        dividend: i128,
    ) -> Result<(), Error> {
        let balance = holders::holder_balance(env, params, investor);
        if balance <= 0 {
            return Err(Error::InvestorNotFound);
        }

        let paid_key = DataKey::Paid(investor.clone(), period);
        if env.storage().persistent().has(&paid_key) {
            return Err(Error::AlreadyPaid);
        }

        let amount = Self::income_for(terms, balance, dividend)?;
        let client = token::Client::new(env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < amount {
            return Err(Error::InsufficientBalance);
        }

        env.storage().persistent().set(&paid_key, &true);
        client.transfer(&this, investor, &amount);

        env.events().publish(
            (Symbol::new(env, "income_paid"), investor.clone()),
            IncomePaidEvent {
                investor: investor.clone(),
                period,
                income: amount - dividend,
                dividend,
            },
        );

        Ok(())
    }
}
