use super::*;
use instrument_common::schedule::DAY;
use soroban_sdk::{testutils::Address as _, Address, Env};
use testkit::{Platform, ReceiptSigner, GENESIS};

fn deploy<'a>(
    p: &Platform,
    frequency: PaymentFrequency,
    interest_type: InterestType,
    maturity: u64,
    signer: Option<BytesN<65>>,
) -> InterestClient<'a> {
    let contract_id = p.env.register(Interest, ());
    let client = InterestClient::new(&p.env, &contract_id);
    client.initialize(
        &p.owner,
        &p.parameters,
        &frequency,
        &interest_type,
        &maturity,
        &100,
        &10,
        &signer,
    );
    client
}

fn fixed_daily<'a>(p: &Platform) -> InterestClient<'a> {
    deploy(p, PaymentFrequency::Daily, InterestType::Fixed, 0, None)
}

#[test]
fn test_fixed_interest_pays_once_per_period() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = fixed_daily(&p);
    let holder = p.holder(100);
    p.fund(&client.address, 5_000);

    let result = client.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::NotPayableYet)));

    p.advance(DAY + 1);
    client.pay_interest(&p.owner, &holder);

    assert_eq!(p.payment_balance(&holder), 1_000);
    assert!(client.is_paid(&holder, &1));

    let result = client.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::AlreadyPaid)));
    assert_eq!(p.payment_balance(&holder), 1_000);

    p.advance(DAY);
    client.pay_interest(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 2_000);
}

#[test]
fn test_pay_interest_gates() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = fixed_daily(&p);
    let holder = p.holder(100);
    let stranger = Address::generate(&env);
    p.advance(DAY);

    let result = client.try_pay_interest(&holder, &holder);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    let result = client.try_pay_interest(&p.owner, &stranger);
    assert_eq!(result, Err(Ok(Error::InvestorNotFound)));

    let result = client.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::InsufficientBalance)));
    assert!(!client.is_paid(&holder, &1));

    let not_payable = deploy(&p, PaymentFrequency::NotPayable, InterestType::Fixed, 0, None);
    let result = not_payable.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::NotPayable)));
    assert_eq!(not_payable.try_current_period(), Err(Ok(Error::NotPayable)));

    let zero_coupon = deploy(&p, PaymentFrequency::Daily, InterestType::ZeroCoupon, 0, None);
    p.advance(DAY);
    let result = zero_coupon.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::WrongInterestType)));
}

#[test]
fn test_interest_stops_at_maturity() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = deploy(
        &p,
        PaymentFrequency::Daily,
        InterestType::Fixed,
        GENESIS + 3 * DAY,
        None,
    );
    let holder = p.holder(100);
    p.fund(&client.address, 10_000);

    p.advance(2 * DAY);
    client.pay_interest(&p.owner, &holder);

    p.advance(DAY);
    let result = client.try_pay_interest(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::AlreadyMatured)));
}

#[test]
fn test_pay_to_all_is_all_or_nothing() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = fixed_daily(&p);
    let first = p.holder(100);
    let second = p.holder(50);
    p.advance(DAY);

    // covers the first holder but not both
    p.fund(&client.address, 1_200);
    let result = client.try_pay_interest_to_all(&p.owner);
    assert_eq!(result, Err(Ok(Error::InsufficientAggregateBalance)));
    assert_eq!(p.payment_balance(&first), 0);
    assert_eq!(p.payment_balance(&second), 0);
    assert!(!client.is_paid(&first, &1));
    assert_eq!(client.next_payable_at(), GENESIS + DAY);

    p.fund(&client.address, 300);
    client.pay_interest_to_all(&p.owner);

    assert_eq!(p.payment_balance(&first), 1_000);
    assert_eq!(p.payment_balance(&second), 500);
    assert_eq!(p.payment_balance(&client.address), 0);
    assert_eq!(client.next_payable_at(), GENESIS + 2 * DAY);

    let result = client.try_pay_interest_to_all(&p.owner);
    assert_eq!(result, Err(Ok(Error::NotPayableYet)));
}

#[test]
fn test_pay_to_all_skips_holders_paid_individually() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = fixed_daily(&p);
    let first = p.holder(100);
    let second = p.holder(50);
    p.fund(&client.address, 1_500);
    p.advance(DAY);

    client.pay_interest(&p.owner, &first);
    client.pay_interest_to_all(&p.owner);

    assert_eq!(p.payment_balance(&first), 1_000);
    assert_eq!(p.payment_balance(&second), 500);
}

#[test]
fn test_pay_to_all_without_holders() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = fixed_daily(&p);
    p.advance(DAY);

    let result = client.try_pay_interest_to_all(&p.owner);
    assert_eq!(result, Err(Ok(Error::NoHolders)));
}

#[test]
fn test_variable_rate_update() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = deploy(&p, PaymentFrequency::Monthly, InterestType::Variable, 0, None);
    let holder = p.holder(10);
    p.fund(&client.address, 10_000);

    assert_eq!(client.interest_due(&holder), 100);
    client.update_variable_rate(&p.owner, &25);
    assert_eq!(client.get_terms().interest_rate, 25);
    assert_eq!(client.interest_due(&holder), 250);

    p.advance(PaymentFrequency::Monthly.period_length().unwrap());
    client.pay_interest(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 250);

    let result = client.try_update_variable_rate(&p.owner, &0);
    assert_eq!(result, Err(Ok(Error::InvalidRate)));

    let fixed = fixed_daily(&p);
    let result = fixed.try_update_variable_rate(&p.owner, &20);
    assert_eq!(result, Err(Ok(Error::WrongInterestType)));
}

#[test]
fn test_payment_in_kind() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let client = deploy(&p, PaymentFrequency::Daily, InterestType::PaymentInKind, 0, None);
    let first = p.holder(100);
    let second = p.holder(100);
    let alt = p.new_token();
    let unregistered = p.new_token();
    p.mint_token(&alt, &client.address, 300);
    p.advance(DAY);

    let result = client.try_pay_interest_in_kind(&p.owner, &first, &unregistered, &50);
    assert_eq!(result, Err(Ok(Error::NotAllowedExchangeToken)));

    let result = client.try_register_in_kind_token(&p.owner, &p.payment_token);
    assert_eq!(result, Err(Ok(Error::InvalidAddress)));

    client.register_in_kind_token(&p.owner, &alt);
    assert!(client.is_in_kind_token(&alt));
    let result = client.try_register_in_kind_token(&p.owner, &alt);
    assert_eq!(result, Err(Ok(Error::TokenAlreadyRegistered)));

    let result = client.try_pay_interest(&p.owner, &first);
    assert_eq!(result, Err(Ok(Error::WrongInterestType)));

    client.pay_interest_in_kind(&p.owner, &first, &alt, &50);
    assert_eq!(p.token_balance(&alt, &first), 50);

    let result = client.try_pay_interest_in_kind(&p.owner, &first, &alt, &50);
    assert_eq!(result, Err(Ok(Error::AlreadyPaid)));

    client.pay_interest_in_kind_to_all(&p.owner, &alt, &50);
    assert_eq!(p.token_balance(&alt, &first), 50);
    assert_eq!(p.token_balance(&alt, &second), 50);

    p.advance(DAY);
    let result = client.try_pay_interest_in_kind_to_all(&p.owner, &alt, &150);
    assert_eq!(result, Err(Ok(Error::InsufficientAggregateBalance)));
}

#[test]
fn test_cash_interest_records_signed_receipt() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let signer = ReceiptSigner::new(3);
    let client = deploy(
        &p,
        PaymentFrequency::Daily,
        InterestType::Cash,
        0,
        Some(signer.public_key(&env)),
    );
    let holder = p.holder(100);
    p.advance(DAY);

    let digest = receipt::cash_digest(&env, 42, GENESIS + DAY, &holder, 1_000);
    let signature = signer.sign(&env, &digest);

    let result =
        client.try_pay_interest_in_cash(&p.owner, &42, &(GENESIS + DAY), &holder, &999, &signature);
    assert_eq!(result, Err(Ok(Error::BadSignature)));

    let result =
        client.try_pay_interest_in_cash(&p.owner, &43, &(GENESIS + DAY), &holder, &1_000, &signature);
    assert_eq!(result, Err(Ok(Error::BadSignature)));

    client.pay_interest_in_cash(&p.owner, &42, &(GENESIS + DAY), &holder, &1_000, &signature);

    assert!(client.is_paid(&holder, &1));
    let stored = client.get_cash_receipt(&holder, &1).unwrap();
    assert_eq!(stored.receipt_number, 42);
    assert_eq!(stored.amount, 1_000);
    assert_eq!(p.payment_balance(&holder), 0);

    let result =
        client.try_pay_interest_in_cash(&p.owner, &42, &(GENESIS + DAY), &holder, &1_000, &signature);
    assert_eq!(result, Err(Ok(Error::AlreadyPaid)));

    let fixed = fixed_daily(&p);
    p.advance(DAY);
    let result =
        fixed.try_pay_interest_in_cash(&p.owner, &42, &(GENESIS + DAY), &holder, &1_000, &signature);
    assert_eq!(result, Err(Ok(Error::InterestTypeNotCash)));
}

#[test]
fn test_initialize_validation() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 100);
    let contract_id = env.register(Interest, ());
    let client = InterestClient::new(&env, &contract_id);

    let result = client.try_initialize(
        &p.owner,
        &p.parameters,
        &PaymentFrequency::Daily,
        &InterestType::Cash,
        &0,
        &100,
        &10,
        &None,
    );
    assert_eq!(result, Err(Ok(Error::MissingSigner)));

    let result = client.try_initialize(
        &p.owner,
        &p.parameters,
        &PaymentFrequency::Daily,
        &InterestType::Fixed,
        &GENESIS,
        &100,
        &10,
        &None,
    );
    assert_eq!(result, Err(Ok(Error::InvalidMaturity)));

    let result = client.try_initialize(
        &p.owner,
        &p.parameters,
        &PaymentFrequency::Daily,
        &InterestType::Fixed,
        &0,
        &100,
        &0,
        &None,
    );
    assert_eq!(result, Err(Ok(Error::InvalidRate)));
}
