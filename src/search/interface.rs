use {
    crate::{
        client::{EtherscanClient, interface::TxListTransport},
        models::{Address, Transfer},
    },
    std::{future::Future, sync::Arc},
};

/// Fetch seam for the search: anything that can list an account's outgoing
/// transfers. Infallible by contract; fetch problems surface as shorter lists.
pub trait TransferSource: Send + Sync {
    fn outgoing_transfers(
        &self,
        account: &Address,
    ) -> impl Future<Output = Arc<Vec<Transfer>>> + Send;
}

impl<T: TxListTransport> TransferSource for EtherscanClient<T> {
    async fn outgoing_transfers(&self, account: &Address) -> Arc<Vec<Transfer>> {
        self.fetch_outgoing_transfers(account).await
    }
}
