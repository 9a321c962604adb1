use std::fmt::Debug;

use chrono::Local;
use futures_util::{pin_mut, TryStreamExt};
use kb_accounts_api::{Account, Builder, Environment, Identity, KbClient};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::balance::BalanceReport;
use crate::error::{Error, Result, NOTHING_WRITTEN};
use crate::output::{to_json, Destination};
use crate::report::TransactionReport;
use crate::scope::{DateRange, Scope};
use crate::settings::Settings;
use crate::upstream::{kb::Source, transaction_pages, AccountsSource};

/// Logs to standard error; standard output may carry the report.
pub fn init_tracing(settings: &Settings) {
    let level = if settings.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn banner(app_name: &str, settings: &Settings) {
    if settings.app_debug {
        info!(
            account = %settings.account_number,
            sandbox = settings.kb_accountsapi_sandbox,
            "{} {}",
            app_name,
            env!("CARGO_PKG_VERSION")
        );
    }
}

pub fn client(settings: &Settings) -> Result<KbClient> {
    let mut builder = Builder::new()
        .with_env(Environment::from_sandbox_flag(settings.kb_accountsapi_sandbox))
        .with_identity(Identity::from_pkcs12_file(
            &settings.cert_file,
            &settings.cert_pass,
        )?);

    if let Some(url) = &settings.kb_accountsapi_url {
        builder = builder.with_base_url(url.as_str());
    }
    if let Some(key) = &settings.kb_api_key {
        builder = builder.with_api_key(key.as_str());
    }

    Ok(builder.build()?)
}

pub async fn find_account<S>(source: &S, account_id: &str) -> Result<Account>
where
    S: AccountsSource + Sync + ?Sized,
{
    info!("Find a matching bank account");
    source
        .accounts()
        .await?
        .into_iter()
        .filter(|a| a.account_id == account_id)
        .last()
        .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))
}

#[tracing::instrument(skip_all, fields(account = %settings.account_number))]
pub async fn balances<S>(source: &S, settings: &Settings, destination: &Destination) -> Result<usize>
where
    S: AccountsSource + Sync + ?Sized,
{
    let account = find_account(source, &settings.account_id).await?;

    info!("Get balances and split");
    let balances = source.balances(&settings.account_id).await?;

    debug!("Build output");
    let report = BalanceReport::build(&account, &balances)?;

    save(&report, destination, settings.debug)
}

#[tracing::instrument(skip_all, fields(account = %settings.account_number))]
pub async fn transactions<S>(
    source: &S,
    settings: &Settings,
    range: DateRange,
    destination: &Destination,
) -> Result<usize>
where
    S: AccountsSource + Sync + ?Sized,
{
    let account = find_account(source, &settings.account_id).await?;

    info!("Fetch transactions and fill payments");
    debug!("Scope range: {}", range);
    let mut report = TransactionReport::new(source.name(), &account.iban, &range);

    let pages = transaction_pages(source, &settings.account_id, range);
    pin_mut!(pages);
    while let Some(page) = pages.try_next().await? {
        debug!(page = page.number, count = page.content.len(), last = page.last, "Page fetched");
        report.extend(&page.content);
    }

    save(&report, destination, settings.debug)
}

/// Balance report of the configured account against the live API.
pub async fn run_balances(settings: &Settings, destination: &Destination) -> Result<usize> {
    let client = client(settings)?;
    let source = Source::new(&client, settings.kb_access_token.clone());

    balances(&source, settings, destination).await
}

/// Transaction report of the configured account against the live API.
///
/// The scope is resolved before anything touches the network.
pub async fn run_transactions(settings: &Settings, destination: &Destination) -> Result<usize> {
    let range = settings
        .report_scope
        .parse::<Scope>()?
        .resolve(Local::now().naive_local())?;

    let client = client(settings)?;
    let source = Source::new(&client, settings.kb_access_token.clone());

    transactions(&source, settings, range, destination).await
}

pub fn save<T>(report: &T, destination: &Destination, pretty: bool) -> Result<usize>
where
    T: Serialize + Debug,
{
    debug!(?report);
    debug!("Save output");

    Ok(destination.write(&to_json(report, pretty)?)?)
}

/// Logs the outcome of a run and turns it into a process exit code.
pub fn finish(result: Result<usize>, destination: &Destination) -> i32 {
    let code = match &result {
        Ok(0) => NOTHING_WRITTEN,
        Ok(_) => 0,
        Err(err) => {
            error!(error = ?err, "{}", err);
            err.exit_code()
        }
    };

    if code == 0 {
        info!("Saving result to {}", destination);
    } else {
        error!("Saving result to {}", destination);
    }

    code
}
