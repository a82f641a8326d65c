use soroban_sdk::{token, Address, Env};

use crate::types::{ContractStandard, DeliveryMode, Economics};

/// Why a counterparty cannot fund a pull
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shortfall {
    Balance,
    Allowance,
}

/// Whether this contract can `transfer_from` `amount` of `token` out of `from`
pub fn can_pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Shortfall> {
    let client = token::Client::new(env, token);
    if client.balance(from) < amount {
        return Err(Shortfall::Balance);
    }
    if client.allowance(from, &env.current_contract_address()) < amount {
        return Err(Shortfall::Allowance);
    }
    Ok(())
}

/// Move `amount` of `token` from `from` to `to` under this contract's allowance
pub fn pull(env: &Env, token: &Address, from: &Address, to: &Address, amount: i128) {
    if amount == 0 {
        return;
    }
    token::Client::new(env, token).transfer_from(&env.current_contract_address(), from, to, &amount);
}

/// Why a change to the economics was refused
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Repricing {
    Standardized,
    Expired,
    InvalidPrice,
    SpotFrozen,
}

/// Why a delivery election was refused
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Election {
    NotElectable,
    InvalidMode,
    NotAParty,
}

/// Direction of a cash settlement
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CashFlow {
    OwnerPays(i128),
    HolderPays(i128),
    Flat,
}

impl CashFlow {
    /// (payer, payee, amount) between `owner` and `holder`
    pub fn legs(self, owner: &Address, holder: &Address) -> (Address, Address, i128) {
        match self {
            CashFlow::OwnerPays(amount) => (owner.clone(), holder.clone(), amount),
            CashFlow::HolderPays(amount) => (holder.clone(), owner.clone(), amount),
            CashFlow::Flat => (owner.clone(), holder.clone(), 0),
        }
    }
}

/// Cash owed on `balance` contracts when the holder earns `payoff` per
/// contract. `None` on overflow.
pub fn cash_flow(balance: i128, payoff: i128) -> Option<CashFlow> {
    let amount = balance.checked_mul(payoff.checked_abs()?)?;
    Some(match payoff {
        p if p > 0 => CashFlow::OwnerPays(amount),
        p if p < 0 => CashFlow::HolderPays(amount),
        _ => CashFlow::Flat,
    })
}

/// Replace the strike of customized terms strictly before `expiration`.
/// Returns the previous strike.
pub fn reprice_strike(
    economics: &mut Economics,
    standard: ContractStandard,
    now: u64,
    expiration: u64,
    new_strike: i128,
) -> Result<i128, Repricing> {
    if standard == ContractStandard::Standardized {
        return Err(Repricing::Standardized);
    }
    if now >= expiration {
        return Err(Repricing::Expired);
    }
    if new_strike <= 0 {
        return Err(Repricing::InvalidPrice);
    }
    Ok(core::mem::replace(&mut economics.strike_price, new_strike))
}

/// Publish a new spot unless a cash settlement already priced off the current one
pub fn reprice_spot(economics: &mut Economics, frozen: bool, spot: i128) -> Result<(), Repricing> {
    if frozen {
        return Err(Repricing::SpotFrozen);
    }
    if spot < 0 {
        return Err(Repricing::InvalidPrice);
    }
    economics.spot_price = spot;
    Ok(())
}

/// Fix an electable mode to `new_mode`. `is_party` is only consulted once
/// the mode checks pass.
pub fn elect(
    current: DeliveryMode,
    new_mode: DeliveryMode,
    is_party: impl FnOnce() -> bool,
) -> Result<DeliveryMode, Election> {
    if current != DeliveryMode::Electable {
        return Err(Election::NotElectable);
    }
    if new_mode == DeliveryMode::Electable {
        return Err(Election::InvalidMode);
    }
    if !is_party() {
        return Err(Election::NotAParty);
    }
    Ok(new_mode)
}

impl Economics {
    pub fn is_valid(&self) -> bool {
        self.strike_price > 0 && self.contract_size > 0 && self.spot_price >= 0
    }

    /// Underlying units owed against `balance` contracts
    pub fn deliverable(&self, balance: i128) -> Option<i128> {
        balance.checked_mul(self.contract_size)
    }

    /// Payment due at the strike for `units` of the underlying
    pub fn strike_value(&self, units: i128) -> Option<i128> {
        units.checked_mul(self.strike_price)
    }

    /// `spot - strike`, positive when the long side is in the money
    pub fn spread(&self) -> i128 {
        self.spot_price - self.strike_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics(strike_price: i128, spot_price: i128) -> Economics {
        Economics {
            strike_price,
            contract_size: 100,
            spot_price,
        }
    }

    #[test]
    fn test_economics_amounts() {
        let e = economics(75, 100);
        assert!(e.is_valid());
        assert_eq!(e.deliverable(3), Some(300));
        assert_eq!(e.strike_value(300), Some(22_500));
        assert_eq!(e.spread(), 25);
        assert_eq!(economics(120, 100).spread(), -20);
        assert_eq!(e.deliverable(i128::MAX), None);
    }

    #[test]
    fn test_cash_flow_follows_the_payoff_sign() {
        // 100 contracts, strike 75, spot 100
        assert_eq!(cash_flow(100, economics(75, 100).spread()), Some(CashFlow::OwnerPays(2_500)));
        assert_eq!(cash_flow(100, economics(120, 100).spread()), Some(CashFlow::HolderPays(2_000)));
        assert_eq!(cash_flow(100, 0), Some(CashFlow::Flat));
        assert_eq!(cash_flow(i128::MAX, 2), None);
        assert_eq!(cash_flow(1, i128::MIN), None);
    }

    #[test]
    fn test_reprice_strike_gates() {
        let mut e = economics(75, 100);
        assert_eq!(
            reprice_strike(&mut e, ContractStandard::Standardized, 0, 10, 80),
            Err(Repricing::Standardized)
        );
        assert_eq!(
            reprice_strike(&mut e, ContractStandard::Customized, 10, 10, 80),
            Err(Repricing::Expired)
        );
        assert_eq!(
            reprice_strike(&mut e, ContractStandard::Customized, 9, 10, 0),
            Err(Repricing::InvalidPrice)
        );
        assert_eq!(e.strike_price, 75);

        assert_eq!(reprice_strike(&mut e, ContractStandard::Customized, 9, 10, 120), Ok(75));
        assert_eq!(e.strike_price, 120);
    }

    #[test]
    fn test_reprice_spot_freezes() {
        let mut e = economics(75, 100);
        assert_eq!(reprice_spot(&mut e, false, -1), Err(Repricing::InvalidPrice));
        assert_eq!(reprice_spot(&mut e, true, 90), Err(Repricing::SpotFrozen));
        assert_eq!(e.spot_price, 100);
        assert_eq!(reprice_spot(&mut e, false, 90), Ok(()));
        assert_eq!(e.spot_price, 90);
    }

    #[test]
    fn test_elect_is_one_shot() {
        assert_eq!(
            elect(DeliveryMode::CashOnly, DeliveryMode::PhysicalOnly, || true),
            Err(Election::NotElectable)
        );
        assert_eq!(
            elect(DeliveryMode::Electable, DeliveryMode::Electable, || true),
            Err(Election::InvalidMode)
        );
        assert_eq!(
            elect(DeliveryMode::Electable, DeliveryMode::CashOnly, || false),
            Err(Election::NotAParty)
        );
        assert_eq!(
            elect(DeliveryMode::Electable, DeliveryMode::CashOnly, || true),
            Ok(DeliveryMode::CashOnly)
        );
    }

    #[test]
    fn test_economics_validation() {
        assert!(!economics(0, 100).is_valid());
        assert!(!economics(75, -1).is_valid());
        assert!(economics(75, 0).is_valid());
    }
}
