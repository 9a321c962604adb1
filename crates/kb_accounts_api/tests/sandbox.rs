use std::env::var;

use chrono::{Duration, Local};
use kb_accounts_api::{Builder, Environment, Identity, TransactionSelection};

#[ignore]
#[tokio::test]
async fn can_list_sandbox_data() -> Result<(), Box<dyn std::error::Error>> {
    let identity = Identity::from_pkcs12_file(var("CERT_FILE")?, &var("CERT_PASS")?)?;
    let client = Builder::new()
        .with_env(Environment::Sandbox)
        .with_identity(identity)
        .build()?;
    let token = &var("KB_ACCESS_TOKEN")?;

    let accounts = client.accounts(token).await?;
    assert!(!accounts.is_empty());

    let account = &accounts[0];
    client.balances(token, &account.account_id).await?;

    let now = Local::now().naive_local();
    let page = client
        .transactions(
            token,
            &TransactionSelection::new(&account.account_id, now - Duration::days(7), now)
                .with_size(10),
        )
        .await?;
    assert_eq!(page.number, 0);
    assert!(page.content.len() <= 10);

    Ok(())
}
