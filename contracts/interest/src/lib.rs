#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::*;
pub use storage::{InterestTerms, InterestType};
use storage::DataKey;

use instrument_common::{
    holders, math, receipt, schedule, CashReceipt, Parameters, PaymentFrequency,
};
use soroban_sdk::{contract, contractimpl, token, Address, BytesN, Env, Symbol, Vec};

/// Periodic interest on a debt-like instrument: fixed or variable rate paid
/// in the payment token, payment in kind in a registered alternate token,
/// or cash paid off-chain and recorded against a signed receipt.
#[contract]
pub struct Interest;

/// Everything a payment needs once the common gates have passed
struct OpenPeriod {
    terms: InterestTerms,
    params: Parameters,
    period: u64,
}

#[contractimpl]
impl Interest {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the interest terms. Period 0 starts now; the first
    /// payment falls due one period later.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAmount`: Face value <= 0
    /// - `InvalidRate`: Rate <= 0 on an interest-bearing type, or < 0
    /// - `InvalidMaturity`: Maturity set but not in the future
    /// - `MissingSigner`: Cash interest without a receipt signer
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        frequency: PaymentFrequency,
        interest_type: InterestType,
        maturity: u64,
        face_value: i128,
        interest_rate: i128,
        signer: Option<BytesN<65>>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        let now = env.ledger().timestamp();

        if face_value <= 0 {
            return Err(Error::InvalidAmount);
        }
        if interest_rate < 0 || (interest_rate == 0 && interest_type != InterestType::ZeroCoupon) {
            return Err(Error::InvalidRate);
        }
        if maturity != 0 && maturity <= now {
            return Err(Error::InvalidMaturity);
        }
        if interest_type == InterestType::Cash && signer.is_none() {
            return Err(Error::MissingSigner);
        }

        let terms = InterestTerms {
            frequency,
            interest_type,
            maturity,
            face_value,
            interest_rate,
            issued_at: now,
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::Terms, &terms);
        if let Some(first_due) = schedule::period_start(now, 1, frequency) {
            env.storage()
                .instance()
                .set(&DataKey::NextPayableAt, &first_due);
        }
        if let Some(signer) = signer {
            env.storage().instance().set(&DataKey::Signer, &signer);
        }

        Ok(())
    }

    /// Change the rate of a variable-rate instrument
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `WrongInterestType`: Instrument is not Variable
    /// - `InvalidRate`: New rate <= 0
    pub fn update_variable_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let mut terms = Self::get_terms(env.clone())?;
        if terms.interest_type != InterestType::Variable {
            return Err(Error::WrongInterestType);
        }
        if new_rate <= 0 {
            return Err(Error::InvalidRate);
        }

        let old_rate = terms.interest_rate;
        terms.interest_rate = new_rate;
        env.storage().instance().set(&DataKey::Terms, &terms);

        env.events().publish(
            (Symbol::new(&env, "rate_updated"),),
            RateUpdatedEvent { old_rate, new_rate },
        );

        Ok(())
    }

    /// Allow `token` as a payment-in-kind currency
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `WrongInterestType`: Instrument is not PaymentInKind
    /// - `InvalidAddress`: Token is this contract, the asset or the payment token
    /// - `TokenAlreadyRegistered`: Token already allowed
    pub fn register_in_kind_token(env: Env, caller: Address, token: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let terms = Self::get_terms(env.clone())?;
        if terms.interest_type != InterestType::PaymentInKind {
            return Err(Error::WrongInterestType);
        }

        let params = Self::params(&env)?;
        if token == env.current_contract_address()
            || token == params.asset
            || token == params.payment_token
        {
            return Err(Error::InvalidAddress);
        }

        let key = DataKey::InKindToken(token.clone());
        if env.storage().instance().has(&key) {
            return Err(Error::TokenAlreadyRegistered);
        }
        env.storage().instance().set(&key, &true);

        env.events()
            .publish((Symbol::new(&env, "in_kind_token_registered"),), token);

        Ok(())
    }

    // ============================================
    // PAYMENT-TOKEN INTEREST (FIXED / VARIABLE)
    // ============================================

    /// Pay one investor the interest for the current period
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `WrongInterestType`: Instrument is not Fixed or Variable
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPayableYet`: Next payable date not reached
    /// - `AlreadyMatured`: Maturity passed
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already paid this period
    /// - `InsufficientBalance`: Contract cannot cover the payment
    pub fn pay_interest(env: Env, caller: Address, investor: Address) -> Result<(), Error> {
        let open = Self::open_period(
            &env,
            &caller,
            &[InterestType::Fixed, InterestType::Variable],
            Error::WrongInterestType,
        )?;

        let balance = Self::unpaid_balance(&env, &open, &investor)?;
        let amount = Self::interest_for(&open.terms, &open.params, balance)?;

        Self::pay_one(&env, &open, &open.params.payment_token, &investor, amount)
    }

    /// Pay every current holder the interest for the current period and
    /// move the next payable date to the following period. All or nothing.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `WrongInterestType`: Instrument is not Fixed or Variable
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPayableYet`: Next payable date not reached
    /// - `AlreadyMatured`: Maturity passed
    /// - `NoHolders`: Nobody to pay
    /// - `InsufficientAggregateBalance`: Contract cannot cover every holder
    pub fn pay_interest_to_all(env: Env, caller: Address) -> Result<(), Error> {
        let open = Self::open_period(
            &env,
            &caller,
            &[InterestType::Fixed, InterestType::Variable],
            Error::WrongInterestType,
        )?;

        let mut due: Vec<(Address, i128)> = Vec::new(&env);
        for (investor, balance) in Self::unpaid_holders(&env, &open)?.iter() {
            due.push_back((investor, Self::interest_for(&open.terms, &open.params, balance)?));
        }

        Self::pay_batch(&env, &open, &open.params.payment_token, &due)
    }

    // ============================================
    // PAYMENT IN KIND
    // ============================================

    /// Pay one investor `amount` of a registered alternate token
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `WrongInterestType`: Instrument is not PaymentInKind
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPayableYet`: Next payable date not reached
    /// - `AlreadyMatured`: Maturity passed
    /// - `NotAllowedExchangeToken`: Token not registered
    /// - `InvalidAmount`: Amount <= 0
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already paid this period
    /// - `InsufficientBalance`: Contract holds too little of the token
    pub fn pay_interest_in_kind(
        env: Env,
        caller: Address,
        investor: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let open = Self::open_period(
            &env,
            &caller,
            &[InterestType::PaymentInKind],
            Error::WrongInterestType,
        )?;
        Self::require_in_kind(&env, &token, amount)?;

        Self::unpaid_balance(&env, &open, &investor)?;

        Self::pay_one(&env, &open, &token, &investor, amount)
    }

    /// Pay every current holder `amount` of a registered alternate token
    ///
    /// # Errors
    /// Same as `pay_interest_in_kind`, plus `NoHolders` and
    /// `InsufficientAggregateBalance` in place of `InsufficientBalance`.
    pub fn pay_interest_in_kind_to_all(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let open = Self::open_period(
            &env,
            &caller,
            &[InterestType::PaymentInKind],
            Error::WrongInterestType,
        )?;
        Self::require_in_kind(&env, &token, amount)?;

        let mut due: Vec<(Address, i128)> = Vec::new(&env);
        for (investor, _) in Self::unpaid_holders(&env, &open)?.iter() {
            due.push_back((investor, amount));
        }

        Self::pay_batch(&env, &open, &token, &due)
    }

    // ============================================
    // CASH INTEREST (OFF-CHAIN, SIGNED RECEIPT)
    // ============================================

    /// Record an off-chain cash payment against a receipt signed over
    /// `(receipt_number, date, investor, amount)`. No tokens move.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotPayable`: Frequency is NotPayable
    /// - `InterestTypeNotCash`: Instrument is not Cash
    /// - `NotOwner`: Caller is not the owner
    /// - `NotPayableYet`: Next payable date not reached
    /// - `AlreadyMatured`: Maturity passed
    /// - `InvestorNotFound`: Investor is unverified or holds nothing
    /// - `AlreadyPaid`: Investor already paid this period
    /// - `InvalidAmount`: Amount <= 0
    /// - `BadSignature`: Signature does not match the receipt
    pub fn pay_interest_in_cash(
        env: Env,
        caller: Address,
        receipt_number: u64,
        date: u64,
        investor: Address,
        amount: i128,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        let open = Self::open_period(
            &env,
            &caller,
            &[InterestType::Cash],
            Error::InterestTypeNotCash,
        )?;

        Self::unpaid_balance(&env, &open, &investor)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let signer: BytesN<65> = env
            .storage()
            .instance()
            .get(&DataKey::Signer)
            .ok_or(Error::MissingSigner)?;
        let digest = receipt::cash_digest(&env, receipt_number, date, &investor, amount);
        if !receipt::is_signed_by(&env, &digest, &signature, &signer) {
            return Err(Error::BadSignature);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Paid(investor.clone(), open.period), &true);
        env.storage().persistent().set(
            &DataKey::CashReceipt(investor.clone(), open.period),
            &CashReceipt {
                receipt_number,
                date,
                investor: investor.clone(),
                amount,
                signature,
            },
        );

        env.events().publish(
            (Symbol::new(&env, "cash_interest_recorded"), investor.clone()),
            CashInterestRecordedEvent {
                investor,
                period: open.period,
                receipt_number,
                amount,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_terms(env: Env) -> Result<InterestTerms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    /// Index of the period containing the current ledger time
    pub fn current_period(env: Env) -> Result<u64, Error> {
        let terms = Self::get_terms(env.clone())?;
        schedule::period_index(terms.issued_at, env.ledger().timestamp(), terms.frequency)
            .ok_or(Error::NotPayable)
    }

    pub fn next_payable_at(env: Env) -> Result<u64, Error> {
        let terms = Self::get_terms(env.clone())?;
        if !terms.frequency.is_payable() {
            return Err(Error::NotPayable);
        }
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

    pub fn get_cash_receipt(env: Env, investor: Address, period: u64) -> Option<CashReceipt> {
        env.storage()
            .persistent()
            .get(&DataKey::CashReceipt(investor, period))
    }

    pub fn is_in_kind_token(env: Env, token: Address) -> bool {
        env.storage().instance().has(&DataKey::InKindToken(token))
    }

    /// Payment-token interest owed to `investor` for one period at the current rate
    pub fn interest_due(env: Env, investor: Address) -> Result<i128, Error> {
        let terms = Self::get_terms(env.clone())?;
        let params = Self::params(&env)?;
        let balance = holders::holder_balance(&env, &params, &investor);
        Self::interest_for(&terms, &params, balance)
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

    /// Gates shared by every payment path, in order: frequency, interest
    /// type, owner, payable date, maturity.
    fn open_period(
        env: &Env,
        caller: &Address,
        accepted: &[InterestType],
        type_error: Error,
    ) -> Result<OpenPeriod, Error> {
        let terms = Self::get_terms(env.clone())?;
        let now = env.ledger().timestamp();

        let period = schedule::period_index(terms.issued_at, now, terms.frequency)
            .ok_or(Error::NotPayable)?;
        if !accepted.contains(&terms.interest_type) {
            return Err(type_error);
        }

        Self::require_owner(env, caller)?;

        let next_payable_at: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextPayableAt)
            .ok_or(Error::NotInitialized)?;
        if now < next_payable_at {
            return Err(Error::NotPayableYet);
        }
        if terms.maturity != 0 && now >= terms.maturity {
            return Err(Error::AlreadyMatured);
        }

        Ok(OpenPeriod {
            terms,
            params: Self::params(env)?,
            period,
        })
    }

    /// `face_value * interest_rate * balance / precision`
    fn interest_for(terms: &InterestTerms, params: &Parameters, balance: i128) -> Result<i128, Error> {
        math::mul3(terms.face_value, terms.interest_rate, balance)
            .and_then(|v| v.checked_div(params.precision))
            .ok_or(Error::InvalidAmount)
    }

    fn require_in_kind(env: &Env, token: &Address, amount: i128) -> Result<(), Error> {
        if !env
            .storage()
            .instance()
            .has(&DataKey::InKindToken(token.clone()))
        {
            return Err(Error::NotAllowedExchangeToken);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }

    /// Holder balance of an investor not yet paid this period
    fn unpaid_balance(env: &Env, open: &OpenPeriod, investor: &Address) -> Result<i128, Error> {
        let balance = holders::holder_balance(env, &open.params, investor);
        if balance <= 0 {
            return Err(Error::InvestorNotFound);
        }
        if Self::is_paid(env.clone(), investor.clone(), open.period) {
            return Err(Error::AlreadyPaid);
        }
        Ok(balance)
    }

    fn unpaid_holders(env: &Env, open: &OpenPeriod) -> Result<Vec<(Address, i128)>, Error> {
        let all = holders::verified_holders(env, &open.params);
        if all.is_empty() {
            return Err(Error::NoHolders);
        }

        let mut unpaid = Vec::new(env);
        for (investor, balance) in all.iter() {
            if !Self::is_paid(env.clone(), investor.clone(), open.period) {
                unpaid.push_back((investor, balance));
            }
        }
        Ok(unpaid)
    }

    fn pay_one(
        env: &Env,
        open: &OpenPeriod,
        token: &Address,
        investor: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        let client = token::Client::new(env, token);
        let this = env.current_contract_address();
        if client.balance(&this) < amount {
            return Err(Error::InsufficientBalance);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Paid(investor.clone(), open.period), &true);

        client.transfer(&this, investor, &amount);

        env.events().publish(
            (Symbol::new(env, "interest_paid"), investor.clone()),
            InterestPaidEvent {
                investor: investor.clone(),
                period: open.period,
                token: token.clone(),
                amount,
            },
        );

        Ok(())
    }

    /// Checks the aggregate, marks everyone paid and advances the payable
    /// date before the first transfer.
    fn pay_batch(
        env: &Env,
        open: &OpenPeriod,
        token: &Address,
        due: &Vec<(Address, i128)>,
    ) -> Result<(), Error> {
        let total = math::checked_sum(due.iter().map(|(_, amount)| amount))
            .ok_or(Error::InvalidAmount)?;

        let client = token::Client::new(env, token);
        let this = env.current_contract_address();
        if client.balance(&this) < total {
            return Err(Error::InsufficientAggregateBalance);
        }

        for (investor, _) in due.iter() {
            env.storage()
                .persistent()
                .set(&DataKey::Paid(investor, open.period), &true);
        }

        let next_payable_at =
            schedule::period_start(open.terms.issued_at, open.period + 1, open.terms.frequency)
                .ok_or(Error::NotPayable)?;
        env.storage()
            .instance()
            .set(&DataKey::NextPayableAt, &next_payable_at);

        for (investor, amount) in due.iter() {
            client.transfer(&this, &investor, &amount);
        }

        env.events().publish(
            (Symbol::new(env, "interest_batch_paid"), open.period),
            InterestBatchPaidEvent {
                period: open.period,
                holders_paid: due.len(),
                token: token.clone(),
                total,
                next_payable_at,
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod test;
