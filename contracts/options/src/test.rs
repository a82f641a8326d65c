use super::*;
use instrument_common::{ContractStandard, ExerciseStyle, ExerciseTerms};
use soroban_sdk::{testutils::Address as _, Address, Env};
use testkit::{Platform, ReceiptSigner, GENESIS};

const DAY: u64 = 86_400;
const EXPIRATION: u64 = GENESIS + 30 * DAY;

fn american() -> ExerciseTerms {
    ExerciseTerms {
        style: ExerciseStyle::American,
        expiration: EXPIRATION,
        start: GENESIS,
        periodicity: 0,
    }
}

fn terms(kind: OptionKind, delivery_mode: DeliveryMode) -> OptionTerms {
    OptionTerms {
        kind,
        exercise: american(),
        delivery_mode,
        standard: ContractStandard::Customized,
    }
}

fn deploy<'a>(
    p: &Platform,
    terms: OptionTerms,
    spot_price: i128,
    signer: Option<BytesN<65>>,
) -> OptionsClient<'a> {
    let economics = Economics {
        strike_price: 50,
        contract_size: 10,
        spot_price,
    };
    deploy_priced(p, terms, &economics, signer)
}

fn deploy_priced<'a>(
    p: &Platform,
    terms: OptionTerms,
    economics: &Economics,
    signer: Option<BytesN<65>>,
) -> OptionsClient<'a> {
    let contract_id = p.env.register(Options, ());
    let client = OptionsClient::new(&p.env, &contract_id);
    client.initialize(&p.owner, &p.parameters, &terms, economics, &signer);
    client
}

fn sized(strike_price: i128, spot_price: i128) -> Economics {
    Economics {
        strike_price,
        contract_size: 100,
        spot_price,
    }
}

#[test]
fn test_exercise_gates() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let european = OptionTerms {
        exercise: ExerciseTerms {
            style: ExerciseStyle::European,
            ..american()
        },
        ..terms(OptionKind::Call, DeliveryMode::CashOnly)
    };
    let client = deploy(&p, european, 0, None);

    let holder = p.holder(5);
    let outsider = p.investor();

    let result = client.try_exercise(&outsider);
    assert_eq!(result, Err(Ok(Error::NotAHolder)));

    let result = client.try_exercise(&holder);
    assert_eq!(result, Err(Ok(Error::WindowClosed)));

    p.advance(29 * DAY);
    client.exercise(&holder);
    assert!(client.is_exercised(&holder));

    let result = client.try_exercise(&holder);
    assert_eq!(result, Err(Ok(Error::AlreadyExercised)));

    let late = p.holder(1);
    p.advance(DAY + 1);
    let result = client.try_exercise(&late);
    assert_eq!(result, Err(Ok(Error::WindowClosed)));
}

#[test]
fn test_initialize_validation() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let client = OptionsClient::new(&env, &env.register(Options, ()));

    let expired = OptionTerms {
        exercise: ExerciseTerms {
            expiration: GENESIS,
            ..american()
        },
        ..terms(OptionKind::Call, DeliveryMode::CashOnly)
    };
    let economics = Economics {
        strike_price: 50,
        contract_size: 10,
        spot_price: 0,
    };
    let result = client.try_initialize(&p.owner, &p.parameters, &expired, &economics, &None);
    assert_eq!(result, Err(Ok(Error::InvalidSchedule)));

    let worthless = Economics {
        contract_size: 0,
        ..economics.clone()
    };
    let call = terms(OptionKind::Call, DeliveryMode::CashOnly);
    let result = client.try_initialize(&p.owner, &p.parameters, &call, &worthless, &None);
    assert_eq!(result, Err(Ok(Error::InvalidEconomics)));

    client.initialize(&p.owner, &p.parameters, &call, &economics, &None);
    let result = client.try_initialize(&p.owner, &p.parameters, &call, &economics, &None);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_call_delivered_by_owner_with_receipt() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let signer = ReceiptSigner::new(5);
    let client = deploy(
        &p,
        terms(OptionKind::Call, DeliveryMode::PhysicalOnly),
        0,
        Some(signer.public_key(&env)),
    );

    let holder = p.holder(2);
    p.fund(&holder, 1_000);
    p.approve(&p.payment_token, &holder, &client.address, 1_000);

    // owner delivers 20 units to the holder
    let digest = receipt::delivery_digest(&env, 4, GENESIS, &holder, &p.owner, 20);
    let signature = signer.sign(&env, &digest);

    let result = client.try_deliver_with_receipt(&p.owner, &4, &GENESIS, &holder, &signature);
    assert_eq!(result, Err(Ok(Error::NotExercised)));

    client.exercise(&holder);

    let result = client.try_deliver_with_receipt(&holder, &4, &GENESIS, &holder, &signature);
    assert_eq!(result, Err(Ok(Error::CallerNotOwner)));

    let result = client.try_deliver_with_receipt(&p.owner, &5, &GENESIS, &holder, &signature);
    assert_eq!(result, Err(Ok(Error::BadSignature)));

    client.deliver_with_receipt(&p.owner, &4, &GENESIS, &holder, &signature);

    assert!(client.is_delivered(&holder));
    let stored = client.get_receipt(&holder).unwrap();
    assert_eq!(stored.deliverer, p.owner);
    assert_eq!(stored.receiver, holder);
    assert_eq!(p.payment_balance(&p.owner), 1_000);

    let result = client.try_deliver_with_receipt(&p.owner, &4, &GENESIS, &holder, &signature);
    assert_eq!(result, Err(Ok(Error::AlreadyDelivered)));
}

#[test]
fn test_put_delivered_by_holder() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let client = deploy(&p, terms(OptionKind::Put, DeliveryMode::PhysicalOnly), 0, None);

    let holder = p.holder(3);
    let wheat = p.new_token();
    p.mint_token(&wheat, &holder, 30);
    p.approve(&wheat, &holder, &client.address, 30);
    client.exercise(&holder);

    let result = client.try_deliver_tokens(&p.owner, &wheat, &holder);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    let result = client.try_deliver_tokens(&holder, &client.address, &holder);
    assert_eq!(result, Err(Ok(Error::InvalidAddress)));

    // owner has not funded the 30 * 50 strike
    let result = client.try_deliver_tokens(&holder, &wheat, &holder);
    assert_eq!(result, Err(Ok(Error::InsufficientBalance)));

    p.fund(&p.owner, 1_500);
    p.approve(&p.payment_token, &p.owner, &client.address, 1_500);
    client.deliver_tokens(&holder, &wheat, &holder);

    assert_eq!(p.token_balance(&wheat, &p.owner), 30);
    assert_eq!(p.payment_balance(&holder), 1_500);
    assert!(client.is_delivered(&holder));

    let result = client.try_deliver_tokens(&holder, &wheat, &holder);
    assert_eq!(result, Err(Ok(Error::AlreadyDelivered)));
}

#[test]
fn test_cash_settlement_pays_the_payoff() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let call = deploy_priced(
        &p,
        terms(OptionKind::Call, DeliveryMode::CashOnly),
        &sized(75, 100),
        None,
    );

    let holder = p.holder(100);
    let result = call.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::NotExercised)));

    call.exercise(&holder);
    assert_eq!(call.intrinsic_value(), 25);

    let result = call.try_cash_settle(&holder, &holder);
    assert_eq!(result, Err(Ok(Error::CallerNotOwner)));

    let result = call.try_deliver_tokens(&p.owner, &p.new_token(), &holder);
    assert_eq!(result, Err(Ok(Error::WrongMode)));

    // 100 options * (100 - 75), whatever the contract size
    p.fund(&p.owner, 2_500);
    p.approve(&p.payment_token, &p.owner, &call.address, 2_500);
    call.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 2_500);
    assert_eq!(p.payment_balance(&p.owner), 0);

    let result = call.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::AlreadyDelivered)));

    let result = call.try_set_spot_price(&p.owner, &60);
    assert_eq!(result, Err(Ok(Error::SpotFrozen)));
    assert_eq!(call.get_economics().spot_price, 100);
}

#[test]
fn test_out_of_the_money_option_settles_in_reverse() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let call = deploy_priced(
        &p,
        terms(OptionKind::Call, DeliveryMode::CashOnly),
        &sized(75, 100),
        None,
    );
    let put = deploy(&p, terms(OptionKind::Put, DeliveryMode::CashOnly), 65, None);

    let holder = p.holder(100);
    call.exercise(&holder);
    put.exercise(&holder);

    call.modify_strike_price(&p.owner, &120);
    assert_eq!(call.intrinsic_value(), 0);
    assert_eq!(put.intrinsic_value(), 0);

    // 100 options * (120 - 100), holder to owner
    let result = call.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::InsufficientBalance)));

    p.fund(&holder, 3_500);
    p.approve(&p.payment_token, &holder, &call.address, 2_000);
    call.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&p.owner), 2_000);
    assert!(call.is_delivered(&holder));

    // a put with spot above strike: 100 * (65 - 50), holder to owner
    let result = put.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::InsufficientAllowance)));

    p.approve(&p.payment_token, &holder, &put.address, 1_500);
    put.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&p.owner), 3_500);
    assert_eq!(p.payment_balance(&holder), 0);
}

#[test]
fn test_put_in_the_money_is_paid_by_the_owner() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let put = deploy(&p, terms(OptionKind::Put, DeliveryMode::CashOnly), 65, None);
    let holder = p.holder(2);
    put.exercise(&holder);

    put.set_spot_price(&p.owner, &40);
    assert_eq!(put.intrinsic_value(), 10);

    // 2 options * (50 - 40)
    p.fund(&p.owner, 20);
    p.approve(&p.payment_token, &p.owner, &put.address, 20);
    put.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 20);
}

#[test]
fn test_modify_strike_price() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let client = deploy(&p, terms(OptionKind::Call, DeliveryMode::CashOnly), 0, None);
    let standardized = deploy(
        &p,
        OptionTerms {
            standard: ContractStandard::Standardized,
            ..terms(OptionKind::Call, DeliveryMode::CashOnly)
        },
        0,
        None,
    );
    let stranger = Address::generate(&env);

    let result = standardized.try_modify_strike_price(&p.owner, &60);
    assert_eq!(result, Err(Ok(Error::StandardizedTerms)));

    let result = client.try_modify_strike_price(&stranger, &60);
    assert_eq!(result, Err(Ok(Error::CallerNotOwner)));

    client.modify_strike_price(&p.owner, &60);
    assert_eq!(client.get_economics().strike_price, 60);

    p.advance(30 * DAY);
    let result = client.try_modify_strike_price(&p.owner, &70);
    assert_eq!(result, Err(Ok(Error::OptionExpired)));
}

#[test]
fn test_electable_option_needs_election() {
    let env = Env::default();
    let p = Platform::new(&env, 100, 1_000);
    let client = deploy(&p, terms(OptionKind::Call, DeliveryMode::Electable), 80, None);

    let holder = p.holder(1);
    client.exercise(&holder);

    let result = client.try_cash_settle(&p.owner, &holder);
    assert_eq!(result, Err(Ok(Error::WrongMode)));

    client.elect_delivery_method(&holder, &DeliveryMode::CashOnly);
    let result = client.try_elect_delivery_method(&holder, &DeliveryMode::PhysicalOnly);
    assert_eq!(result, Err(Ok(Error::NotElectable)));

    // 1 option * (80 - 50)
    p.fund(&p.owner, 30);
    p.approve(&p.payment_token, &p.owner, &client.address, 30);
    client.cash_settle(&p.owner, &holder);
    assert_eq!(p.payment_balance(&holder), 30);
}
