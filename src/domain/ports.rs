use crate::domain::model::{CreatedKeyTransaction, EntityGuid, KeyTransactionRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// `Ok(None)` means the search ran and matched nothing.
    async fn find_entity_guid(&self, name: &str, account_id: &str) -> Result<Option<EntityGuid>>;

    async fn create_key_transaction(
        &self,
        request: &KeyTransactionRequest,
    ) -> Result<CreatedKeyTransaction>;
}
