use async_trait::async_trait;

use kb_accounts_api::{
    Account, Balance, ClientError, KbClient, TransactionPage, TransactionSelection,
};

use crate::upstream::AccountsSource;

/// [`KbClient`] bound to one access token.
pub struct Source<'a> {
    pub(crate) client: &'a KbClient,
    pub(crate) token: String,
}

impl<'a> Source<'a> {
    pub fn new(client: &'a KbClient, token: String) -> Self {
        Self { client, token }
    }
}

#[async_trait]
impl<'a> AccountsSource for Source<'a> {
    fn name(&self) -> &str {
        kb_accounts_api::SOURCE
    }

    async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        self.client.accounts(&self.token).await
    }

    async fn balances(&self, account_id: &str) -> Result<Vec<Balance>, ClientError> {
        self.client.balances(&self.token, account_id).await
    }

    async fn transactions(
        &self,
        selection: &TransactionSelection,
    ) -> Result<TransactionPage, ClientError> {
        self.client.transactions(&self.token, selection).await
    }
}
