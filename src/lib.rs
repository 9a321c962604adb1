//! Balance and transaction reports for accounts at Komerční banka.
//!
//! Both reports follow the same pass: find the configured account, pull
//! its data from the Accounts API, summarize it and write the summary as
//! JSON. The `kb-balance` and `kb-transaction` binaries are thin wrappers
//! around [`app`].

pub mod app;
pub mod balance;
pub mod cli;
pub mod error;
pub mod output;
pub mod report;
pub mod scope;
pub mod settings;
pub mod upstream;

pub use error::{Error, Result};
