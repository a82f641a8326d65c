#![cfg(test)]

use futures_settlement::{FutureClass, FutureTerms, Futures, FuturesClient};
use instrument_common::{
    schedule::DAY, ContractStandard, DeliveryMode, Economics, ExerciseStyle, ExerciseTerms,
    PaymentFrequency,
};
use interest::{Interest, InterestClient, InterestType};
use options_settlement::{OptionKind, OptionTerms, Options, OptionsClient};
use redemption::{Redemption, RedemptionClient, RedemptionState};
use reimbursement::{RateType, Reimbursement, ReimbursementClient, ReimbursementMode};
use soroban_sdk::{Env, Symbol};
use testkit::{Platform, GENESIS};

const MATURITY: u64 = GENESIS + 3 * DAY;

fn bond<'a>(p: &Platform, mode: ReimbursementMode) -> ReimbursementClient<'a> {
    let contract_id = p.env.register(Reimbursement, ());
    let client = ReimbursementClient::new(&p.env, &contract_id);
    client.initialize(
        &p.owner,
        &p.parameters,
        &mode,
        &RateType::Fixed,
        &PaymentFrequency::Daily,
        &MATURITY,
        &100,
        &10,
    );
    p.add_operator(&contract_id);
    client
}

fn coupons<'a>(p: &Platform) -> InterestClient<'a> {
    let contract_id = p.env.register(Interest, ());
    let client = InterestClient::new(&p.env, &contract_id);
    client.initialize(
        &p.owner,
        &p.parameters,
        &PaymentFrequency::Daily,
        &InterestType::Fixed,
        &MATURITY,
        &100,
        &10,
        &None,
    );
    client
}

fn supply(p: &Platform) -> i128 {
    p.asset().total_supply()
}

#[test]
fn test_bond_pays_coupons_then_principal() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let coupon = coupons(&p);
    let principal = bond(&p, ReimbursementMode::FixedMaturity);

    let alice = p.holder(100);
    let bob = p.holder(50);
    p.fund(&coupon.address, 10_000);
    p.fund(&principal.address, 15_000);

    // 100 * 10 * balance / 100 per period
    for period in 1..=2u64 {
        p.advance(if period == 1 { DAY + 1 } else { DAY });
        let before = p.payment_balance(&coupon.address);
        coupon.pay_interest_to_all(&p.owner);
        let paid = before - p.payment_balance(&coupon.address);

        assert_eq!(paid, 1_500);
        assert!(coupon.is_paid(&alice, &period));
        assert!(coupon.is_paid(&bob, &period));
    }
    assert_eq!(p.payment_balance(&alice), 2_000);
    assert_eq!(p.payment_balance(&bob), 1_000);

    let result = principal.try_pay_at_maturity_to_all(&p.owner);
    assert_eq!(result, Err(Ok(reimbursement::Error::NotMatured)));

    p.advance(DAY);

    let result = coupon.try_pay_interest_to_all(&p.owner);
    assert_eq!(result, Err(Ok(interest::Error::AlreadyMatured)));

    principal.pay_at_maturity_to_all(&p.owner);
    assert_eq!(p.payment_balance(&alice), 12_000);
    assert_eq!(p.payment_balance(&bob), 6_000);
    assert_eq!(p.payment_balance(&principal.address), 0);

    let result = principal.try_pay_at_maturity_to_all(&p.owner);
    assert_eq!(result, Err(Ok(reimbursement::Error::AlreadyPaid)));
}

#[test]
fn test_put_and_call_burn_what_they_pay_for() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = bond(&p, ReimbursementMode::FixedMaturityWithPutAndCall);

    let alice = p.holder(40);
    let bob = p.holder(60);
    p.fund(&client.address, 10_000);
    client.set_put_period(&p.owner, &(GENESIS + DAY), &(GENESIS + 2 * DAY));

    p.advance(DAY);
    client.put_token(&alice, &15);
    assert_eq!(supply(&p), 85);
    assert_eq!(p.payment_balance(&alice), 1_500);

    let before = p.payment_balance(&client.address);
    client.call_token_from_all(&p.owner, &0);
    let paid = before - p.payment_balance(&client.address);

    // 25 + 60 units at face 100
    assert_eq!(paid, 8_500);
    assert_eq!(supply(&p), 0);
    assert_eq!(p.payment_balance(&alice) + p.payment_balance(&bob), 10_000);
    assert!(!p.asset().is_holder(&bob));
}

#[test]
fn test_derivatives_settle_independently_on_one_asset() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let holder = p.holder(2);
    let expiration = GENESIS + 10 * DAY;

    let economics = Economics {
        strike_price: 50,
        contract_size: 10,
        spot_price: 70,
    };

    let future = FuturesClient::new(&env, &env.register(Futures, ()));
    future.initialize(
        &p.owner,
        &p.parameters,
        &FutureTerms {
            class: FutureClass::Financial,
            underlying: Symbol::new(&env, "EURUSD"),
            delivery_mode: DeliveryMode::CashOnly,
            standard: ContractStandard::Standardized,
        },
        &economics,
        &expiration,
        &None,
    );

    let option = OptionsClient::new(&env, &env.register(Options, ()));
    option.initialize(
        &p.owner,
        &p.parameters,
        &OptionTerms {
            kind: OptionKind::Call,
            exercise: ExerciseTerms {
                style: ExerciseStyle::American,
                expiration,
                start: GENESIS,
                periodicity: 0,
            },
            delivery_mode: DeliveryMode::CashOnly,
            standard: ContractStandard::Standardized,
        },
        &economics,
        &None,
    );

    // 2 contracts * (70 - 50) each
    p.fund(&p.owner, 80);
    p.approve(&p.payment_token, &p.owner, &future.address, 40);
    p.approve(&p.payment_token, &p.owner, &option.address, 40);

    option.exercise(&holder);
    option.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 40);

    let result = future.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(futures_settlement::Error::FutureNotExpired)));

    p.advance(10 * DAY);
    future.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 80);
    assert_eq!(p.payment_balance(&p.owner), 0);

    // neither settlement touches the asset
    assert_eq!(supply(&p), 2);
}

#[test]
fn test_redemption_shrinks_the_coupon_base() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let coupon = coupons(&p);

    let buyback = RedemptionClient::new(&env, &env.register(Redemption, ()));
    buyback.initialize(&p.owner, &p.parameters, &RedemptionState::Redeemable, &(GENESIS + DAY));
    p.add_operator(&buyback.address);

    let holder = p.holder(100);
    let other = p.holder(100);
    p.fund(&coupon.address, 10_000);
    p.fund(&buyback.address, 6_000);

    p.advance(DAY + 1);
    buyback.redeem_token(&holder, &60);
    assert_eq!(p.payment_balance(&holder), 6_000);
    assert_eq!(supply(&p), 140);

    coupon.pay_interest_to_all(&p.owner);
    assert_eq!(p.payment_balance(&holder), 6_400);
    assert_eq!(p.payment_balance(&other), 1_000);
}
