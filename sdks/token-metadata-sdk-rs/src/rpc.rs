//! [`AccountFetcher`] over a Solana JSON-RPC node.

use {
    crate::reader::AccountFetcher,
    anyhow::Context,
    async_trait::async_trait,
    solana_client::nonblocking::rpc_client::RpcClient,
    solana_program::pubkey::Pubkey,
    tracing::debug,
};

#[async_trait]
impl AccountFetcher for RpcClient {
    async fn fetch_account_data(&self, address: &Pubkey) -> anyhow::Result<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await
            .with_context(|| format!("get account {address}"))?;
        debug!(
            %address,
            slot = response.context.slot,
            found = response.value.is_some(),
            "fetched account"
        );
        Ok(response.value.map(|account| account.data))
    }
}
