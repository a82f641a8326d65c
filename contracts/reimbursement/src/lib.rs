#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::*;
use storage::DataKey;
pub use storage::{AmortizationSchedule, PutPeriod, RateType, ReimbursementMode, ReimbursementTerms};

use instrument_common::schedule::{self, AMORTIZATION_SCALE};
use instrument_common::{holders, math, Parameters, PaymentFrequency};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, Vec};

/// Repayment of a debt's principal: a single payout at maturity, an amortized
/// installment every period, or early exits through a holder put or an
/// issuer call.
#[contract]
pub struct Reimbursement;

/// State an installment needs once the common gates have passed
struct Installment {
    terms: ReimbursementTerms,
    schedule: AmortizationSchedule,
    params: Parameters,
    period: u64,
    final_payment: bool,
}

#[contractimpl]
impl Reimbursement {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the reimbursement terms. The periodic rate and the loan
    /// term are derived here so the owner can compute the amortization
    /// factors off-chain.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAmount`: Face value <= 0
    /// - `InvalidRate`: Negative rate, or zero on an amortizable instrument
    /// - `InvalidMaturity`: Perpetual with a maturity, or any other mode without a future one
    /// - `InvalidFrequency`: Amortizable with a NotPayable frequency
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        mode: ReimbursementMode,
        rate_type: RateType,
        frequency: PaymentFrequency,
        maturity: u64,
        face_value: i128,
        interest_rate: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        let now = env.ledger().timestamp();

        if face_value <= 0 {
            return Err(Error::InvalidAmount);
        }
        if interest_rate < 0 || (interest_rate == 0 && mode == ReimbursementMode::Amortizable) {
            return Err(Error::InvalidRate);
        }
        match mode {
            ReimbursementMode::Perpetual if maturity != 0 => return Err(Error::InvalidMaturity),
            ReimbursementMode::Perpetual => {}
            _ if maturity <= now => return Err(Error::InvalidMaturity),
            _ => {}
        }
        if mode == ReimbursementMode::Amortizable && !frequency.is_payable() {
            return Err(Error::InvalidFrequency);
        }

        let periodic_rate = schedule::periodic_interest_rate(interest_rate, frequency).unwrap_or(0);
        let loan_term = if maturity == 0 {
            0
        } else {
            schedule::loan_term(now, maturity, frequency).unwrap_or(0)
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(
            &DataKey::Terms,
            &ReimbursementTerms {
                mode,
                rate_type,
                frequency,
                maturity,
                face_value,
                interest_rate,
                deployed_at: now,
            },
        );
        env.storage().instance().set(
            &DataKey::Schedule,
            &AmortizationSchedule {
                periodic_rate,
                loan_term,
                numerator: 0,
                denominator: 0,
                periodic_payment: 0,
            },
        );
        if let Some(first_due) = schedule::period_start(now, 1, frequency) {
            env.storage()
                .instance()
                .set(&DataKey::NextPayableAt, &first_due);
        }

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

    // ============================================
    // AMORTIZATION
    // ============================================

    /// Install the off-chain computed factors `r(1+r)^n` and `(1+r)^n - 1`,
    /// both scaled by `AMORTIZATION_SCALE`, and derive the periodic payment.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotAmortizable`: Instrument is not Amortizable
    /// - `InvalidSchedule`: A factor is zero or the pair does not fit the periodic rate
    pub fn set_amortization_schedule(
        env: Env,
        caller: Address,
        numerator: i128,
        denominator: i128,
    ) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let terms = Self::get_terms(env.clone())?;
        if terms.mode != ReimbursementMode::Amortizable {
            return Err(Error::NotAmortizable);
        }

        let current = Self::get_schedule(env.clone())?;
        let updated = Self::derive_schedule(
            &terms,
            current.periodic_rate,
            current.loan_term,
            numerator,
            denominator,
        )?;
        env.storage().instance().set(&DataKey::Schedule, &updated);

        Self::publish_schedule(&env, &terms, &updated);

        Ok(())
    }

    /// Re-price a variable-rate amortizable instrument: new annual rate plus
    /// the factors recomputed for it.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotAmortizable`: Instrument is not Amortizable
    /// - `NotVariableRate`: Rate type is Fixed
    /// - `InvalidRate`: New rate <= 0
    /// - `InvalidSchedule`: A factor is zero or the pair does not fit the new rate
    pub fn modify_interest_rate(
        env: Env,
        caller: Address,
        new_rate: i128,
        numerator: i128,
        denominator: i128,
    ) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let mut terms = Self::get_terms(env.clone())?;
        if terms.mode != ReimbursementMode::Amortizable {
            return Err(Error::NotAmortizable);
        }
        if terms.rate_type != RateType::Variable {
            return Err(Error::NotVariableRate);
        }
        if new_rate <= 0 {
            return Err(Error::InvalidRate);
        }

        let periodic_rate = schedule::periodic_interest_rate(new_rate, terms.frequency)
            .ok_or(Error::InvalidRate)?;
        let current = Self::get_schedule(env.clone())?;
        let updated =
            Self::derive_schedule(&terms, periodic_rate, current.loan_term, numerator, denominator)?;

        terms.interest_rate = new_rate;
        env.storage().instance().set(&DataKey::Terms, &terms);
        env.storage().instance().set(&DataKey::Schedule, &updated);

        Self::publish_schedule(&env, &terms, &updated);

        Ok(())
    }

    /// Pay one investor the installment of the current period. The first
    /// payment made at or after maturity is the last one.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotAmortizable`: Instrument is not Amortizable
    /// - `ScheduleNotSet`: Periodic payment still zero
    /// - `NotPayableYet`: Next payable date not reached
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyMatured`: Final installment already paid
    /// - `AlreadyPaid`: Investor already paid this period
    /// - `InsufficientBalance`: Contract cannot cover the payment
    pub fn pay_amortized_payment(env: Env, caller: Address, investor: Address) -> Result<(), Error> {
        let due = Self::open_installment(&env, &caller)?;

        let balance = Self::holder_units(&env, &due.params, &investor)?;
        if Self::is_maturity_paid(env.clone(), investor.clone()) {
            return Err(Error::AlreadyMatured);
        }
        if Self::is_paid(env.clone(), investor.clone(), due.period) {
            return Err(Error::AlreadyPaid);
        }

        let amount = Self::installment_for(&due.schedule, balance)?;
        let client = token::Client::new(&env, &due.params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < amount {
            return Err(Error::InsufficientBalance);
        }

        Self::mark_installment(&env, &due, &investor);
        client.transfer(&this, &investor, &amount);

        env.events().publish(
            (Symbol::new(&env, "amortized_paid"), investor.clone()),
            AmortizedPaidEvent {
                investor,
                period: due.period,
                amount,
                final_payment: due.final_payment,
            },
        );

        Ok(())
    }

    /// Pay every holder not yet paid this period and move the next payable
    /// date to the following period. All or nothing.
    ///
    /// # Errors
    /// Same gates as `pay_amortized_payment`, plus `NoHolders`,
    /// `InsufficientAggregateBalance`, and `AlreadyMatured` or `AlreadyPaid`
    /// when nobody is left to pay.
    pub fn pay_amortized_payment_to_all(env: Env, caller: Address) -> Result<(), Error> {
        let due = Self::open_installment(&env, &caller)?;

        let all = holders::verified_holders(&env, &due.params);
        if all.is_empty() {
            return Err(Error::NoHolders);
        }

        let mut payouts: Vec<(Address, i128)> = Vec::new(&env);
        let mut matured = 0u32;
        for (investor, balance) in all.iter() {
            if Self::is_maturity_paid(env.clone(), investor.clone()) {
                matured += 1;
                continue;
            }
            if Self::is_paid(env.clone(), investor.clone(), due.period) {
                continue;
            }
            payouts.push_back((investor, Self::installment_for(&due.schedule, balance)?));
        }
        if payouts.is_empty() {
            return Err(if matured == all.len() {
                Error::AlreadyMatured
            } else {
                Error::AlreadyPaid
            });
        }

        let total = math::checked_sum(payouts.iter().map(|(_, amount)| amount))
            .ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &due.params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < total {
            return Err(Error::InsufficientAggregateBalance);
        }

        for (investor, _) in payouts.iter() {
            Self::mark_installment(&env, &due, &investor);
        }
        let next_payable_at =
            schedule::period_start(due.terms.deployed_at, due.period + 1, due.terms.frequency)
                .ok_or(Error::InvalidFrequency)?;
        env.storage()
            .instance()
            .set(&DataKey::NextPayableAt, &next_payable_at);

        for (investor, amount) in payouts.iter() {
            client.transfer(&this, &investor, &amount);
        }

        env.events().publish(
            (Symbol::new(&env, "amortized_batch_paid"), due.period),
            AmortizedBatchPaidEvent {
                period: due.period,
                holders_paid: payouts.len(),
                total,
                next_payable_at,
            },
        );

        Ok(())
    }

    // ============================================
    // PAYMENT AT MATURITY
    // ============================================

    /// Repay `face_value` per unit held, once per investor
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NoMaturityPayment`: Mode has no payout at maturity
    /// - `NotMatured`: Maturity not reached
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already repaid
    /// - `InsufficientBalance`: Contract cannot cover the payment
    pub fn pay_at_maturity(env: Env, caller: Address, investor: Address) -> Result<(), Error> {
        let (terms, params) = Self::open_maturity(&env, &caller)?;

        let balance = Self::holder_units(&env, &params, &investor)?;
        if Self::is_maturity_paid(env.clone(), investor.clone()) {
            return Err(Error::AlreadyPaid);
        }

        let amount = Self::principal_for(&terms, balance)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < amount {
            return Err(Error::InsufficientBalance);
        }

        env.storage()
            .persistent()
            .set(&DataKey::MaturityPaid(investor.clone()), &true);
        client.transfer(&this, &investor, &amount);

        env.events().publish(
            (Symbol::new(&env, "matured_paid"), investor.clone()),
            MaturityPaidEvent { investor, amount },
        );

        Ok(())
    }

    /// Repay every holder not yet repaid. All or nothing.
    ///
    /// # Errors
    /// Same gates as `pay_at_maturity`, plus `NoHolders`,
    /// `InsufficientAggregateBalance`, and `AlreadyPaid` when every holder
    /// was repaid already.
    pub fn pay_at_maturity_to_all(env: Env, caller: Address) -> Result<(), Error> {
        let (terms, params) = Self::open_maturity(&env, &caller)?;

        let all = holders::verified_holders(&env, &params);
        if all.is_empty() {
            return Err(Error::NoHolders);
        }

        let mut payouts: Vec<(Address, i128)> = Vec::new(&env);
        for (investor, balance) in all.iter() {
            if !Self::is_maturity_paid(env.clone(), investor.clone()) {
                payouts.push_back((investor, Self::principal_for(&terms, balance)?));
            }
        }
        if payouts.is_empty() {
            return Err(Error::AlreadyPaid);
        }

        let total = math::checked_sum(payouts.iter().map(|(_, amount)| amount))
            .ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < total {
            return Err(Error::InsufficientAggregateBalance);
        }

        for (investor, _) in payouts.iter() {
            env.storage()
                .persistent()
                .set(&DataKey::MaturityPaid(investor), &true);
        }
        for (investor, amount) in payouts.iter() {
            client.transfer(&this, &investor, &amount);
            env.events().publish(
                (Symbol::new(&env, "matured_paid"), investor.clone()),
                MaturityPaidEvent { investor, amount },
            );
        }

        Ok(())
    }

    // ============================================
    // PUT / CALL
    // ============================================

    /// Open a window in which holders may sell units back at face value
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPuttable`: Mode has no put option
    /// - `InvalidPutPeriod`: Zero bound, start >= end, end past maturity or start before deployment
    /// - `PutPeriodStarted`: Start is not in the future
    pub fn set_put_period(env: Env, caller: Address, start: u64, end: u64) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let terms = Self::get_terms(env.clone())?;
        if !terms.mode.has_put() {
            return Err(Error::NotPuttable);
        }
        if start == 0 || end == 0 || start >= end || end > terms.maturity || start < terms.deployed_at {
            return Err(Error::InvalidPutPeriod);
        }
        if env.ledger().timestamp() >= start {
            return Err(Error::PutPeriodStarted);
        }

        env.storage()
            .instance()
            .set(&DataKey::PutPeriod, &PutPeriod { start, end });

        env.events().publish(
            (Symbol::new(&env, "put_period_set"),),
            PutPeriodSetEvent { start, end },
        );

        Ok(())
    }

    /// Sell `amount` units back to the issuer at face value. The units are burned.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPuttable`: Mode has no put option
    /// - `PutPeriodNotSet`: No put window
    /// - `PutWindowClosed`: Now outside [start, end]
    /// - `InvalidAmount`: Amount <= 0
    /// - `InvestorNotFound`: Holder is unverified or holds nothing
    /// - `InsufficientHolderBalance`: Holder owns fewer than `amount` units
    /// - `InsufficientBalance`: Contract cannot cover the payout
    pub fn put_token(env: Env, holder: Address, amount: i128) -> Result<(), Error> {
        holder.require_auth();

        let terms = Self::get_terms(env.clone())?;
        if !terms.mode.has_put() {
            return Err(Error::NotPuttable);
        }
        let window = Self::put_period(env.clone()).ok_or(Error::PutPeriodNotSet)?;
        let now = env.ledger().timestamp();
        if now < window.start || now > window.end {
            return Err(Error::PutWindowClosed);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let params = Self::params(&env)?;
        let balance = Self::holder_units(&env, &params, &holder)?;
        if balance < amount {
            return Err(Error::InsufficientHolderBalance);
        }

        let payout = Self::principal_for(&terms, amount)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < payout {
            return Err(Error::InsufficientBalance);
        }

        holders::burn(&env, &params, &holder, amount);
        client.transfer(&this, &holder, &payout);

        env.events().publish(
            (Symbol::new(&env, "token_put"), holder.clone()),
            TokenPutEvent {
                holder,
                units: amount,
                payout,
            },
        );

        Ok(())
    }

    /// Recall every unit an investor holds for `face_value` each plus `dividend`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `NotCallable`: Mode cannot be called
    /// - `NotMatured`: FixedMaturity called before maturity
    /// - `CallWindowClosed`: Call option used at or after maturity
    /// - `InvalidAmount`: Negative dividend
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already repaid at maturity
    /// - `InsufficientBalance`: Contract cannot cover the payout
    pub fn call_token(env: Env, caller: Address, investor: Address, dividend: i128) -> Result<(), Error> {
        let (terms, params) = Self::open_call(&env, &caller, dividend)?;

        let balance = Self::holder_units(&env, &params, &investor)?;
        if Self::is_maturity_paid(env.clone(), investor.clone()) {
            return Err(Error::AlreadyPaid);
        }
        let payout = Self::call_payout(&terms, balance, dividend)?;

        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < payout {
            return Err(Error::InsufficientBalance);
        }

        Self::settle_call(&env, &params, &client, &investor, balance, payout);

        Ok(())
    }

    /// Recall the units of every holder not yet repaid at maturity. All or
    /// nothing.
    ///
    /// # Errors
    /// Same gates as `call_token`, plus `NoHolders`,
    /// `InsufficientAggregateBalance`, and `AlreadyPaid` when every holder
    /// was repaid already.
    pub fn call_token_from_all(env: Env, caller: Address, dividend: i128) -> Result<(), Error> {
        let (terms, params) = Self::open_call(&env, &caller, dividend)?;

        let all = holders::verified_holders(&env, &params);
        if all.is_empty() {
            return Err(Error::NoHolders);
        }

        let mut payouts: Vec<(Address, i128, i128)> = Vec::new(&env);
        for (investor, balance) in all.iter() {
            if !Self::is_maturity_paid(env.clone(), investor.clone()) {
                payouts.push_back((investor, balance, Self::call_payout(&terms, balance, dividend)?));
            }
        }
        if payouts.is_empty() {
            return Err(Error::AlreadyPaid);
        }

        let total = math::checked_sum(payouts.iter().map(|(_, _, payout)| payout))
            .ok_or(Error::InvalidAmount)?;
        let client = token::Client::new(&env, &params.payment_token);
        let this = env.current_contract_address();
        if client.balance(&this) < total {
            return Err(Error::InsufficientAggregateBalance);
        }

        log!(&env, "calling {} holders for {}", payouts.len(), total);
        for (investor, balance, payout) in payouts.iter() {
            Self::settle_call(&env, &params, &client, &investor, balance, payout);
        }

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_terms(env: Env) -> Result<ReimbursementTerms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_schedule(env: Env) -> Result<AmortizationSchedule, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Schedule)
            .ok_or(Error::NotInitialized)
    }

    /// Periodic rate of the current annual rate, scaled by `AMORTIZATION_SCALE`
    pub fn periodic_interest_rate(env: Env) -> Result<i128, Error> {
        Ok(Self::get_schedule(env)?.periodic_rate)
    }

    /// Periods from deployment to maturity, scaled by `AMORTIZATION_SCALE`
    pub fn loan_term(env: Env) -> Result<i128, Error> {
        Ok(Self::get_schedule(env)?.loan_term)
    }

    /// Installment per unit held, scaled by `AMORTIZATION_SCALE`
    pub fn periodic_payment(env: Env) -> Result<i128, Error> {
        Ok(Self::get_schedule(env)?.periodic_payment)
    }

    /// Periodic rate an annual `rate` would have at this instrument's
    /// frequency. Lets the owner prepare `modify_interest_rate` off-chain.
    pub fn quote_periodic_rate(env: Env, rate: i128) -> Result<i128, Error> {
        let terms = Self::get_terms(env)?;
        if rate <= 0 {
            return Err(Error::InvalidRate);
        }
        schedule::periodic_interest_rate(rate, terms.frequency).ok_or(Error::InvalidFrequency)
    }

    pub fn put_period(env: Env) -> Option<PutPeriod> {
        env.storage().instance().get(&DataKey::PutPeriod)
    }

    pub fn current_period(env: Env) -> Result<u64, Error> {
        let terms = Self::get_terms(env.clone())?;
        schedule::period_index(terms.deployed_at, env.ledger().timestamp(), terms.frequency)
            .ok_or(Error::InvalidFrequency)
    }

    pub fn next_payable_at(env: Env) -> Option<u64> {
        env.storage().instance().get(&DataKey::NextPayableAt)
    }

    pub fn is_paid(env: Env, investor: Address, period: u64) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Paid(investor, period))
    }

    /// Final installment or maturity payout received
    pub fn is_maturity_paid(env: Env, investor: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::MaturityPaid(investor))
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
        let owner = Self::owner(env.clone())?;
        if *caller != owner {
            return Err(Error::NotOwner);
        }
        Ok(())
    }

    fn holder_units(env: &Env, params: &Parameters, investor: &Address) -> Result<i128, Error> {
        let balance = holders::holder_balance(env, params, investor);
        if balance <= 0 {
            return Err(Error::InvestorNotFound);
        }
        Ok(balance)
    }

    fn derive_schedule(
        terms: &ReimbursementTerms,
        periodic_rate: i128,
        loan_term: i128,
        numerator: i128,
        denominator: i128,
    ) -> Result<AmortizationSchedule, Error> {
        if numerator <= 0 || denominator <= 0 {
            return Err(Error::InvalidSchedule);
        }
        if !schedule::schedule_is_consistent(periodic_rate, numerator, denominator) {
            return Err(Error::InvalidSchedule);
        }
        let periodic_payment = schedule::periodic_payment(terms.face_value, numerator, denominator)
            .ok_or(Error::InvalidSchedule)?;

        Ok(AmortizationSchedule {
            periodic_rate,
            loan_term,
            numerator,
            denominator,
            periodic_payment,
        })
    }

    fn publish_schedule(env: &Env, terms: &ReimbursementTerms, schedule: &AmortizationSchedule) {
        env.events().publish(
            (Symbol::new(env, "schedule_set"),),
            ScheduleSetEvent {
                interest_rate: terms.interest_rate,
                periodic_rate: schedule.periodic_rate,
                numerator: schedule.numerator,
                denominator: schedule.denominator,
                periodic_payment: schedule.periodic_payment,
            },
        );
    }

    /// Owner, mode, schedule and payable-date gates of an installment
    fn open_installment(env: &Env, caller: &Address) -> Result<Installment, Error> {
        Self::require_owner(env, caller)?;

        let terms = Self::get_terms(env.clone())?;
        if terms.mode != ReimbursementMode::Amortizable {
            return Err(Error::NotAmortizable);
        }
        let amortization = Self::get_schedule(env.clone())?;
        if amortization.periodic_payment == 0 {
            return Err(Error::ScheduleNotSet);
        }

        let now = env.ledger().timestamp();
        let next_payable_at = Self::next_payable_at(env.clone()).ok_or(Error::NotInitialized)?;
        if now < next_payable_at {
            return Err(Error::NotPayableYet);
        }

        let period = schedule::period_index(terms.deployed_at, now, terms.frequency)
            .ok_or(Error::InvalidFrequency)?;
        let final_payment = now >= terms.maturity;

        Ok(Installment {
            terms,
            schedule: amortization,
            params: Self::params(env)?,
            period,
            final_payment,
        })
    }

    /// `periodic_payment * balance`, unscaled
    fn installment_for(schedule: &AmortizationSchedule, balance: i128) -> Result<i128, Error> {
        math::mul_div(schedule.periodic_payment, balance, AMORTIZATION_SCALE)
            .ok_or(Error::InvalidAmount)
    }

    fn mark_installment(env: &Env, due: &Installment, investor: &Address) {
        env.storage()
            .persistent()
            .set(&DataKey::Paid(investor.clone(), due.period), &true);
        if due.final_payment {
            env.storage()
                .persistent()
                .set(&DataKey::MaturityPaid(investor.clone()), &true);
        }
    }

    fn open_maturity(env: &Env, caller: &Address) -> Result<(ReimbursementTerms, Parameters), Error> {
        Self::require_owner(env, caller)?;

        let terms = Self::get_terms(env.clone())?;
        if !terms.mode.pays_at_maturity() {
            return Err(Error::NoMaturityPayment);
        }
        if env.ledger().timestamp() < terms.maturity {
            return Err(Error::NotMatured);
        }

        Ok((terms, Self::params(env)?))
    }

    fn principal_for(terms: &ReimbursementTerms, units: i128) -> Result<i128, Error> {
        math::mul(terms.face_value, units).ok_or(Error::InvalidAmount)
    }

    /// A plain fixed-maturity debt is called at maturity; a call option
    /// only before it.
    fn open_call(
        env: &Env,
        caller: &Address,
        dividend: i128,
    ) -> Result<(ReimbursementTerms, Parameters), Error> {
        Self::require_owner(env, caller)?;

        let terms = Self::get_terms(env.clone())?;
        let now = env.ledger().timestamp();
        if terms.mode == ReimbursementMode::FixedMaturity {
            if now < terms.maturity {
                return Err(Error::NotMatured);
            }
        } else if terms.mode.has_call_option() {
            if now >= terms.maturity {
                return Err(Error::CallWindowClosed);
            }
        } else {
            return Err(Error::NotCallable);
        }

        if dividend < 0 {
            return Err(Error::InvalidAmount);
        }

        Ok((terms, Self::params(env)?))
    }

    fn call_payout(terms: &ReimbursementTerms, balance: i128, dividend: i128) -> Result<i128, Error> {
        Self::principal_for(terms, balance)?
            .checked_add(dividend)
            .ok_or(Error::InvalidAmount)
    }

    fn settle_call(
        env: &Env,
        params: &Parameters,
        client: &token::Client,
        investor: &Address,
        units: i128,
        payout: i128,
    ) {
        holders::burn(env, params, investor, units);
        client.transfer(&env.current_contract_address(), investor, &payout);

        env.events().publish(
            (Symbol::new(env, "token_called"), investor.clone()),
            TokenCalledEvent {
                investor: investor.clone(),
                units,
                payout,
            },
        );
    }
}
