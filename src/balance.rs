use kb_accounts_api::{Account, Balance, BalanceType};
use serde::Serialize;

use crate::error::{Error, Result};

/// Statement code of a balance type.
pub fn balance_code(balance_type: &BalanceType) -> Result<&'static str> {
    match balance_type {
        BalanceType::Opening => Ok("CLBD"),
        BalanceType::Available => Ok("CLAV"),
        BalanceType::Booked => Ok("BLCK"),
        BalanceType::Other(tag) => Err(Error::UnknownBalanceType(tag.clone())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub iban: String,
    pub currency_folders: Vec<CurrencyFolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyFolder {
    pub currency: String,
    pub balances: Vec<BalanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub balance_type: &'static str,
    pub currency: String,
    pub value: f64,
}

impl TryFrom<&Balance> for BalanceEntry {
    type Error = Error;

    fn try_from(balance: &Balance) -> Result<Self> {
        Ok(Self {
            balance_type: balance_code(&balance.balance_type)?,
            currency: balance.amount.currency.clone(),
            value: balance
                .credit_debit_indicator
                .normalize(balance.amount.value),
        })
    }
}

impl BalanceReport {
    /// Groups balances into one folder per currency, in the order the
    /// currencies first appear.
    pub fn build(account: &Account, balances: &[Balance]) -> Result<Self> {
        let mut currency_folders: Vec<CurrencyFolder> = vec![];

        for balance in balances {
            let entry = BalanceEntry::try_from(balance)?;

            match currency_folders
                .iter_mut()
                .find(|folder| folder.currency == entry.currency)
            {
                Some(folder) => folder.balances.push(entry),
                None => currency_folders.push(CurrencyFolder {
                    currency: entry.currency.clone(),
                    balances: vec![entry],
                }),
            }
        }

        Ok(Self {
            iban: account.iban.clone(),
            currency_folders,
        })
    }
}
