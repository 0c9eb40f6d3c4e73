//! Demo seed data
//!
//! Installs one demo customer with an account, saved contacts, and a
//! transfer history the assistant can talk about. Idempotent: a bank that
//! already has customers is left alone.

use voicebank_types::{Account, AccountId, Amount, Contact, Currency, User, UserId};

use crate::Bank;

/// Opening balance before the seeded history is applied
const OPENING_BALANCE: i64 = 4000;

/// Seed the demo customer, contacts and history
pub async fn seed_demo_data(bank: &Bank) {
    if !bank.is_empty().await {
        return;
    }

    let user_id = UserId::new("user-1");

    bank.add_user(User {
        id: user_id.clone(),
        name: "John Smith".to_string(),
        national_id: "12345678901".to_string(),
        pin: "4321".to_string(),
        phone: "+48123123123".to_string(),
    })
    .await;

    bank.add_account(Account {
        id: AccountId::new("acc-1"),
        user_id: user_id.clone(),
        iban: "PL61109010140000071219812874".to_string(),
        balance: Amount::from_major(OPENING_BALANCE, Currency::PLN),
    })
    .await;

    let contacts = [
        ("mom", "Barbara Smith", "PL27114020040000300201355387", "Transfer for mom"),
        ("dad", "Andrew Smith", "PL02105000997603123456789123", "Transfer for dad"),
        ("grandson", "Michael Nowak", "PL12116022020000000012345678", "Gift for grandson"),
        ("neighbor", "Adam Green", "PL88114020040000300201399999", "Loan for neighbor"),
        (
            "child_support_fund",
            "Child Support Fund",
            "PL12109010140000071219800000",
            "Payment to child support fund",
        ),
        ("rent", "Green Housing Cooperative", "PL34175000120000000012345678", "Apartment rent"),
    ];

    for (nickname, full_name, iban, default_title) in contacts {
        bank.add_contact(Contact {
            user_id: user_id.clone(),
            nickname: nickname.to_string(),
            full_name: full_name.to_string(),
            iban: iban.to_string(),
            default_title: default_title.to_string(),
        })
        .await;
    }

    // Historical transfers; each one reduces the opening balance, so the
    // demo account ends up at 3000.00 PLN.
    let history = [
        ("Green Housing Cooperative", "PL34175000120000000012345678", "Apartment rent", 700),
        ("PGE Energy", "PL64102055581111123456789012", "Electricity bill", 100),
        ("Orange Telecom", "PL27114020040000300201311111", "Phone subscription", 60),
        ("UPC Internet", "PL30102055581111123456789099", "Home internet", 40),
        ("Michael Nowak", "PL12116022020000000012345678", "Gift for grandson", 50),
        ("Helios Cinema", "PL12105000997603123456789111", "Cinema night", 30),
        ("Charity WOSP", "PL30114020040000300201322222", "Charity donation", 10),
        ("Adam Green", "PL88114020040000300201399999", "Shopping refund", 5),
        ("MPK Lodz", "PL27114020040000300201344444", "Monthly ticket", 3),
        ("Child Support Fund", "PL12109010140000071219800000", "Payment to child support fund", 2),
    ];

    for (name, iban, title, major) in history {
        let amount = Amount::from_major(major, Currency::PLN);
        if let Err(e) = bank.transfer(&user_id, amount, name, iban, title).await {
            tracing::warn!("seed transfer to {} skipped: {}", name, e);
        }
    }

    tracing::info!("seeded demo customer user-1 with {} historical transfers", history.len());
}
