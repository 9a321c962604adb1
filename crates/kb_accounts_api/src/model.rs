use std::fmt;

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// A bank account the access token grants access to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub iban: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditDebit {
    Credit,
    Debit,
}

impl CreditDebit {
    /// Drops whatever sign the API reported and applies the one implied by
    /// the indicator: debits are negative, credits positive.
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            CreditDebit::Credit => value.abs(),
            CreditDebit::Debit => -value.abs(),
        }
    }
}

/// Balance kind tag. Tags this crate does not know are kept verbatim so
/// callers can decide how to fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BalanceType {
    Opening,
    Available,
    Booked,
    Other(String),
}

impl From<String> for BalanceType {
    fn from(value: String) -> BalanceType {
        match value.to_ascii_uppercase().as_str() {
            "OPENING" => BalanceType::Opening,
            "AVAILABLE" => BalanceType::Available,
            "BOOKED" => BalanceType::Booked,
            _ => BalanceType::Other(value),
        }
    }
}

impl From<BalanceType> for String {
    fn from(value: BalanceType) -> String {
        value.to_string()
    }
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceType::Opening => f.write_str("OPENING"),
            BalanceType::Available => f.write_str("AVAILABLE"),
            BalanceType::Booked => f.write_str("BOOKED"),
            BalanceType::Other(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(rename = "type")]
    pub balance_type: BalanceType,
    pub amount: Amount,
    pub credit_debit_indicator: CreditDebit,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub amount: Amount,
    pub credit_debit_indicator: CreditDebit,
    #[serde(default, deserialize_with = "crate::datetime::deserialize_option")]
    pub value_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "crate::datetime::deserialize_option")]
    pub booking_date: Option<NaiveDateTime>,
    #[serde(deserialize_with = "crate::datetime::deserialize")]
    pub last_updated: NaiveDateTime,
    #[serde(default)]
    pub entry_reference: Option<String>,
}

impl Transaction {
    /// The value date, falling back to the booking date and then to the
    /// time of the last update.
    pub fn effective_time(&self) -> NaiveDateTime {
        self.value_date
            .or(self.booking_date)
            .unwrap_or(self.last_updated)
    }
}

/// One page of a transaction listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    #[serde(default)]
    pub content: Vec<Transaction>,
    pub last: bool,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Query parameters for a single transaction page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSelection {
    pub account_id: String,
    pub page: u32,
    pub size: u32,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl TransactionSelection {
    pub fn new(account_id: impl Into<String>, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            account_id: account_id.into(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            from,
            to,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Encodes the selection as a query string. Bounds are sent with the
    /// local offset and millisecond precision.
    pub fn query(&self) -> Result<String, ClientError> {
        Ok(url::form_urlencoded::Serializer::new(String::new())
            .append_pair("fromDate", &local_rfc3339(self.from)?)
            .append_pair("toDate", &local_rfc3339(self.to)?)
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .finish())
    }
}

fn local_rfc3339(dt: NaiveDateTime) -> Result<String, ClientError> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string())
        .ok_or_else(|| ClientError::InvalidArgument(format!("{} does not exist in local time", dt)))
}
