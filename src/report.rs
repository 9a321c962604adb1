use std::collections::BTreeMap;

use kb_accounts_api::{CreditDebit, Transaction};
use serde::Serialize;
use tracing::warn;

use crate::scope::DateRange;

/// Key format of the `in`/`out` mappings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl From<CreditDebit> for Direction {
    fn from(indicator: CreditDebit) -> Self {
        match indicator {
            CreditDebit::Credit => Direction::In,
            CreditDebit::Debit => Direction::Out,
        }
    }
}

/// Transaction summary of one account over a [`DateRange`], filled page by
/// page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReport {
    pub source: String,
    pub iban: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "in")]
    pub inbound: BTreeMap<String, f64>,
    #[serde(rename = "out")]
    pub outbound: BTreeMap<String, f64>,
    pub in_total: u64,
    pub out_total: u64,
    pub in_sum_total: f64,
    pub out_sum_total: f64,
}

impl TransactionReport {
    pub fn new(source: impl Into<String>, iban: impl Into<String>, range: &DateRange) -> Self {
        Self {
            source: source.into(),
            iban: iban.into(),
            from: range.from.format("%Y-%m-%d").to_string(),
            to: range.to.format("%Y-%m-%d").to_string(),
            inbound: BTreeMap::new(),
            outbound: BTreeMap::new(),
            in_total: 0,
            out_total: 0,
            in_sum_total: 0.0,
            out_sum_total: 0.0,
        }
    }

    /// Adds a transaction to its direction.
    ///
    /// Entries are keyed by effective time at second precision, so a later
    /// transaction with the same key replaces the earlier one in the mapping.
    /// Counts and sums still include both.
    pub fn record(&mut self, tx: &Transaction) {
        let direction = Direction::from(tx.credit_debit_indicator);
        let key = tx.effective_time().format(TIMESTAMP_FORMAT).to_string();
        let amount = tx.credit_debit_indicator.normalize(tx.amount.value);

        let (entries, total, sum) = match direction {
            Direction::In => (&mut self.inbound, &mut self.in_total, &mut self.in_sum_total),
            Direction::Out => (&mut self.outbound, &mut self.out_total, &mut self.out_sum_total),
        };

        if let Some(replaced) = entries.insert(key.clone(), amount) {
            warn!(
                timestamp = %key,
                replaced,
                amount,
                "Transaction replaces an earlier one with the same timestamp"
            );
        }
        *total += 1;
        *sum += amount;
    }

    pub fn extend<'a, I>(&mut self, txs: I)
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        for tx in txs {
            self.record(tx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveDateTime};
    use kb_accounts_api::Amount;
    use proptest::prelude::*;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn tx(indicator: CreditDebit, value: f64, when: NaiveDateTime) -> Transaction {
        Transaction {
            amount: Amount {
                value,
                currency: "CZK".into(),
            },
            credit_debit_indicator: indicator,
            value_date: Some(when),
            booking_date: None,
            last_updated: when,
            entry_reference: None,
        }
    }

    fn empty_report() -> TransactionReport {
        let range = DateRange {
            from: at(1, 0, 0, 0),
            to: at(3, 23, 59, 59),
        };
        TransactionReport::new("test", "CZ6501000000001234567899", &range)
    }

    #[test]
    fn splits_by_indicator_and_normalizes_sign() {
        let mut report = empty_report();
        report.extend(&[
            tx(CreditDebit::Credit, -100.0, at(1, 9, 0, 0)),
            tx(CreditDebit::Debit, 40.0, at(1, 10, 0, 0)),
            tx(CreditDebit::Credit, 25.5, at(2, 11, 0, 0)),
        ]);

        assert_eq!(report.in_total, 2);
        assert_eq!(report.out_total, 1);
        assert_eq!(report.in_sum_total, 125.5);
        assert_eq!(report.out_sum_total, -40.0);
        assert_eq!(report.inbound["2024-05-01T09:00:00"], 100.0);
        assert_eq!(report.outbound["2024-05-01T10:00:00"], -40.0);
    }

    #[test]
    fn same_timestamp_overwrites_entry_but_counts_both() {
        let mut report = empty_report();
        report.extend(&[
            tx(CreditDebit::Debit, 10.0, at(2, 12, 0, 0)),
            tx(CreditDebit::Debit, 15.0, at(2, 12, 0, 0)),
        ]);

        assert_eq!(report.outbound.len(), 1);
        assert_eq!(report.outbound["2024-05-02T12:00:00"], -15.0);
        assert_eq!(report.out_total, 2);
        assert_eq!(report.out_sum_total, -25.0);
    }

    #[test]
    fn falls_back_to_booking_date_and_last_update() {
        let mut report = empty_report();

        let mut booked = tx(CreditDebit::Credit, 1.0, at(1, 0, 0, 0));
        booked.value_date = None;
        booked.booking_date = Some(at(2, 0, 0, 0));

        let mut updated = tx(CreditDebit::Credit, 2.0, at(1, 0, 0, 0));
        updated.value_date = None;
        updated.last_updated = at(3, 7, 45, 12);

        report.extend(&[booked, updated]);
        assert!(report.inbound.contains_key("2024-05-02T00:00:00"));
        assert!(report.inbound.contains_key("2024-05-03T07:45:12"));
    }

    #[test]
    fn keys_use_the_offset_sent_by_the_bank() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "amount": {"value": 7.0, "currency": "CZK"},
            "creditDebitIndicator": "DEBIT",
            "valueDate": "2024-05-01T23:30:00Z",
            "lastUpdated": "2024-05-01T23:30:00Z"
        }))
        .unwrap();

        let mut report = empty_report();
        report.record(&tx);
        assert_eq!(report.outbound["2024-05-01T23:30:00"], -7.0);
    }

    #[test]
    fn serializes_with_output_field_names() {
        let mut report = empty_report();
        report.record(&tx(CreditDebit::Credit, 5.0, at(1, 8, 0, 0)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "test");
        assert_eq!(json["from"], "2024-05-01");
        assert_eq!(json["to"], "2024-05-03");
        assert_eq!(json["in"]["2024-05-01T08:00:00"], 5.0);
        assert_eq!(json["out"], serde_json::json!({}));
        assert_eq!(json["in_total"], 1);
        assert_eq!(json["out_total"], 0);
        assert_eq!(json["in_sum_total"], 5.0);
        assert_eq!(json["out_sum_total"], 0.0);
    }

    proptest! {
        #[test]
        fn totals_match_processed_transactions(
            entries in prop::collection::vec((any::<bool>(), -1.0e6f64..1.0e6, 0u32..86_400), 0..64)
        ) {
            let mut report = empty_report();
            let txs: Vec<Transaction> = entries
                .iter()
                .map(|(credit, value, secs)| {
                    let indicator = if *credit { CreditDebit::Credit } else { CreditDebit::Debit };
                    tx(indicator, *value, at(1, 0, 0, 0) + chrono::Duration::seconds(*secs as i64))
                })
                .collect();
            report.extend(&txs);

            let credits: Vec<f64> = entries.iter().filter(|e| e.0).map(|e| e.1.abs()).collect();
            let debits: Vec<f64> = entries.iter().filter(|e| !e.0).map(|e| -e.1.abs()).collect();

            prop_assert_eq!(report.in_total, credits.len() as u64);
            prop_assert_eq!(report.out_total, debits.len() as u64);
            prop_assert!((report.in_sum_total - credits.iter().sum::<f64>()).abs() < 1e-6);
            prop_assert!((report.out_sum_total - debits.iter().sum::<f64>()).abs() < 1e-6);
            prop_assert!(report.inbound.values().all(|v| *v >= 0.0));
            prop_assert!(report.outbound.values().all(|v| *v <= 0.0));
        }
    }
}
