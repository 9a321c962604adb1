pub mod kb;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use tracing::debug;

use kb_accounts_api::{Account, Balance, ClientError, TransactionPage, TransactionSelection};

use crate::scope::DateRange;

/// Read access to the accounts behind one access token.
#[async_trait]
pub trait AccountsSource {
    /// Name reported as the `source` of generated reports.
    fn name(&self) -> &str;

    async fn accounts(&self) -> Result<Vec<Account>, ClientError>;

    async fn balances(&self, account_id: &str) -> Result<Vec<Balance>, ClientError>;

    async fn transactions(
        &self,
        selection: &TransactionSelection,
    ) -> Result<TransactionPage, ClientError>;
}

/// Pages of the account's transactions within `range`, fetched one at a
/// time starting at page 0.
///
/// The stream ends right after the first page flagged as last, or after the
/// first error. Each page is requested exactly once.
pub fn transaction_pages<'a, S>(
    source: &'a S,
    account_id: &'a str,
    range: DateRange,
) -> impl Stream<Item = Result<TransactionPage, ClientError>> + 'a
where
    S: AccountsSource + Sync + ?Sized,
{
    stream::try_unfold(Some(0u32), move |next| async move {
        let page = match next {
            Some(page) => page,
            None => return Ok::<_, ClientError>(None),
        };

        debug!("Fetch page {}", page + 1);
        let selection = TransactionSelection::new(account_id, range.from, range.to).with_page(page);
        let res = source.transactions(&selection).await?;
        let next = if res.last { None } else { Some(page + 1) };

        Ok::<_, ClientError>(Some((res, next)))
    })
}
