use chrono::NaiveDate;
use kb_accounts_api::{Account, Balance, BalanceType, CreditDebit, TransactionPage};

#[test]
fn decodes_account_list() {
    let body = r#"[
        {"accountId": "acc-1", "iban": "CZ6501000000001234567899", "currency": "CZK"},
        {"accountId": "acc-2", "iban": "CZ0801000000009876543210"}
    ]"#;

    let accounts: Vec<Account> = serde_json::from_str(body).unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].account_id, "acc-1");
    assert_eq!(accounts[0].currency.as_deref(), Some("CZK"));
    assert_eq!(accounts[1].currency, None);
}

#[test]
fn decodes_balances_with_unknown_types() {
    let body = r#"[
        {"type": "OPENING", "amount": {"value": 100.5, "currency": "CZK"}, "creditDebitIndicator": "CREDIT"},
        {"type": "XYZ", "amount": {"value": 3, "currency": "EUR"}, "creditDebitIndicator": "DEBIT"}
    ]"#;

    let balances: Vec<Balance> = serde_json::from_str(body).unwrap();
    assert_eq!(balances[0].balance_type, BalanceType::Opening);
    assert_eq!(balances[0].amount.value, 100.5);
    assert_eq!(balances[1].balance_type, BalanceType::Other("XYZ".into()));
    assert_eq!(balances[1].credit_debit_indicator, CreditDebit::Debit);
}

#[test]
fn decodes_transaction_page() {
    let body = r#"{
        "content": [
            {
                "amount": {"value": -250.0, "currency": "CZK"},
                "creditDebitIndicator": "DEBIT",
                "valueDate": "2024-05-01",
                "bookingDate": "2024-05-02",
                "lastUpdated": "2024-05-02T08:00:00",
                "entryReference": "E-1"
            },
            {
                "amount": {"value": 1000, "currency": "CZK"},
                "creditDebitIndicator": "CREDIT",
                "valueDate": null,
                "lastUpdated": "2024-05-03T12:30:15.250"
            }
        ],
        "last": false,
        "number": 0,
        "totalPages": 3
    }"#;

    let page: TransactionPage = serde_json::from_str(body).unwrap();
    assert!(!page.last);
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.content.len(), 2);

    let first = &page.content[0];
    assert_eq!(
        first.effective_time(),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(first.entry_reference.as_deref(), Some("E-1"));

    let second = &page.content[1];
    assert_eq!(second.value_date, None);
    assert_eq!(second.booking_date, None);
    assert_eq!(
        second.effective_time(),
        NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_milli_opt(12, 30, 15, 250)
            .unwrap()
    );
}

#[test]
fn empty_last_page_decodes() {
    let page: TransactionPage = serde_json::from_str(r#"{"last": true}"#).unwrap();
    assert!(page.last);
    assert!(page.content.is_empty());
}

#[test]
fn rejects_invalid_timestamps() {
    let body = r#"{
        "content": [{
            "amount": {"value": 1, "currency": "CZK"},
            "creditDebitIndicator": "CREDIT",
            "lastUpdated": "not a date"
        }],
        "last": true
    }"#;

    let err = serde_json::from_str::<TransactionPage>(body).unwrap_err();
    assert!(err.to_string().contains("invalid timestamp"));
}

#[test]
fn offset_timestamps_keep_reported_wall_time() {
    let body = r#"{
        "content": [{
            "amount": {"value": 10, "currency": "CZK"},
            "creditDebitIndicator": "CREDIT",
            "valueDate": "2024-05-01T23:30:00Z",
            "lastUpdated": "2024-05-02T01:30:00+02:00"
        }],
        "last": true
    }"#;

    let page: TransactionPage = serde_json::from_str(body).unwrap();
    let tx = &page.content[0];
    assert_eq!(
        tx.effective_time().format("%Y-%m-%dT%H:%M:%S").to_string(),
        "2024-05-01T23:30:00"
    );
    assert_eq!(
        tx.last_updated,
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(1, 30, 0).unwrap()
    );
}
