//! Integration test: ledger reconciliation.
//!
//! For any sequence of registration, publish, purchase, and top-up
//! operations, every user's balance must equal the net total of their
//! transaction log. All mutations flow through vault-ledger, so the two
//! can never drift.

use vault_auth::flow::{self, AuthConfig, RegistrationRequest};
use vault_auth::pairing::PairingRegistry;
use vault_market::{catalog, purchase};
use vault_pay::Credited;
use vault_store::Store;
use vault_types::product::ProductDraft;

/// Base timestamp for test scenarios.
const BASE_TIME: u64 = 1_700_000_000;

fn register(
    store: &mut Store,
    registry: &mut PairingRegistry,
    username: &str,
    chat_id: i64,
) -> String {
    let config = AuthConfig::default();
    let started = flow::start_registration(
        store,
        registry,
        &config,
        &RegistrationRequest {
            username: username.to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        },
        BASE_TIME,
    )
    .expect("start");
    let issued = flow::issue_confirmation_code(
        store,
        registry,
        &started.reg_id,
        chat_id,
        username,
        BASE_TIME,
    )
    .expect("issue");
    flow::confirm_registration(store, registry, &config, &issued.code, BASE_TIME)
        .expect("confirm")
        .user
        .id
}

fn assert_reconciles(store: &Store, user_id: &str) {
    let balance = store.user(user_id).map(|u| u.balance).expect("user exists");
    let total = vault_ledger::log_total(store, user_id);
    assert_eq!(
        i64::try_from(balance).expect("balance fits"),
        total,
        "balance must equal the net transaction log for {user_id}"
    );
}

#[test]
fn balances_reconcile_across_a_full_session() {
    let mut store = Store::new();
    let mut registry = PairingRegistry::new();

    // Two registered users, each holding the welcome bonus.
    let alice = register(&mut store, &mut registry, "alice", 1);
    let bob = register(&mut store, &mut registry, "bob", 2);
    assert_reconciles(&store, &alice);
    assert_reconciles(&store, &bob);

    // Alice publishes two products.
    let cheap = catalog::publish(
        &mut store,
        &alice,
        &ProductDraft {
            title: "Cheap script".to_string(),
            description: String::new(),
            price: 300,
            category: "SCRIPT".to_string(),
            file: None,
        },
        BASE_TIME + 10,
    )
    .expect("publish cheap")
    .id;
    let pricey = catalog::publish(
        &mut store,
        &alice,
        &ProductDraft {
            title: "Pricey bot".to_string(),
            description: String::new(),
            price: 2_000,
            category: "BOT".to_string(),
            file: None,
        },
        BASE_TIME + 11,
    )
    .expect("publish pricey")
    .id;

    // Bob buys both; a top-up lands in between.
    purchase::purchase(&mut store, &bob, &cheap, BASE_TIME + 20).expect("buy cheap");
    assert_reconciles(&store, &alice);
    assert_reconciles(&store, &bob);

    let payment = vault_pay::create_payment(&mut store, &bob, 1_500, BASE_TIME + 30)
        .expect("create payment");
    let credited = vault_pay::payment_completed(&mut store, &payment.id, 1_500, BASE_TIME + 31)
        .expect("complete payment");
    assert!(matches!(credited, Credited::Applied { .. }));
    assert_reconciles(&store, &bob);

    purchase::purchase(&mut store, &bob, &pricey, BASE_TIME + 40).expect("buy pricey");
    assert_reconciles(&store, &alice);
    assert_reconciles(&store, &bob);

    // Cross-check the concrete numbers: bonus 5000 - 300 + 1500 - 2000.
    assert_eq!(store.user(&bob).map(|u| u.balance), Some(4_200));
    // Alice: bonus 5000 + 300 + 2000 in sales.
    assert_eq!(store.user(&alice).map(|u| u.balance), Some(7_300));
    assert_eq!(store.user(&alice).map(|u| u.earned), Some(2_300));
}

#[test]
fn failed_operations_leave_the_log_untouched() {
    let mut store = Store::new();
    let mut registry = PairingRegistry::new();
    let alice = register(&mut store, &mut registry, "alice", 1);
    let bob = register(&mut store, &mut registry, "bob", 2);

    let product = catalog::publish(
        &mut store,
        &alice,
        &ProductDraft {
            title: "Beyond means".to_string(),
            description: String::new(),
            price: 50_000,
            category: "WEB".to_string(),
            file: None,
        },
        BASE_TIME + 10,
    )
    .expect("publish")
    .id;

    let before = store.transactions().len();
    assert!(purchase::purchase(&mut store, &bob, &product, BASE_TIME + 20).is_err());
    assert_eq!(store.transactions().len(), before);
    assert_reconciles(&store, &bob);
    assert_reconciles(&store, &alice);
}
