use crate::domain::model::{CreatedKeyTransaction, EntityGuid, KeyTransactionRequest};
use crate::domain::ports::MonitoringApi;
use crate::utils::error::{OpsError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// NerdGraph (New Relic GraphQL) client over reqwest.
pub struct NerdGraphClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl NerdGraphClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, query: String) -> Result<T> {
        tracing::debug!("POST {} ({} byte query)", self.endpoint, query.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header("API-Key", &self.api_key)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("NerdGraph response status: {}", status);
        if status != StatusCode::OK {
            return Err(OpsError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(OpsError::GraphQlError { message });
        }

        body.data.ok_or_else(|| OpsError::MalformedResponse {
            message: "response has no data field".to_string(),
        })
    }
}

#[async_trait]
impl MonitoringApi for NerdGraphClient {
    async fn find_entity_guid(&self, name: &str, account_id: &str) -> Result<Option<EntityGuid>> {
        let data: SearchData = self.execute(entity_search_query(name, account_id)).await?;

        let entities = data
            .actor
            .and_then(|actor| actor.entity_search)
            .and_then(|search| search.results)
            .and_then(|results| results.entities)
            .ok_or_else(|| OpsError::MalformedResponse {
                message: format!("entity search for '{}' returned no results list", name),
            })?;

        Ok(entities.into_iter().next().map(|entity| entity.guid))
    }

    async fn create_key_transaction(
        &self,
        request: &KeyTransactionRequest,
    ) -> Result<CreatedKeyTransaction> {
        let data: CreateData = self.execute(key_transaction_create_mutation(request)).await?;

        data.key_transaction_create
            .ok_or_else(|| OpsError::MalformedResponse {
                message: "keyTransactionCreate returned null".to_string(),
            })
    }
}

/// Quotes a value as a GraphQL string literal.
fn graphql_string(value: &str) -> String {
    // JSON string escapes are a subset of GraphQL's.
    serde_json::Value::String(value.to_string()).to_string()
}

pub fn entity_search_query(name: &str, account_id: &str) -> String {
    format!(
        r#"{{
  actor {{
    entitySearch(queryBuilder: {{name: {name}, tags: {{key: "accountId", value: {account}}}}}) {{
      count
      query
      results {{
        entities {{
          guid
        }}
      }}
    }}
  }}
}}"#,
        name = graphql_string(name),
        account = graphql_string(account_id),
    )
}

pub fn key_transaction_create_mutation(request: &KeyTransactionRequest) -> String {
    format!(
        r#"mutation {{
  keyTransactionCreate(apdexTarget: {apdex},
                       applicationGuid: {guid},
                       browserApdexTarget: {browser_apdex},
                       metricName: {name},
                       name: {name}) {{
    apdexTarget
    browserApdexTarget
    guid
    metricName
    name
  }}
}}"#,
        apdex = request.apdex.target,
        guid = graphql_string(request.application_guid.as_str()),
        browser_apdex = request.apdex.browser_target,
        name = graphql_string(&request.metric_name),
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Actor {
    entity_search: Option<EntitySearch>,
}

#[derive(Debug, Deserialize)]
struct EntitySearch {
    results: Option<EntityResults>,
}

#[derive(Debug, Deserialize)]
struct EntityResults {
    entities: Option<Vec<Entity>>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    guid: EntityGuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    key_transaction_create: Option<CreatedKeyTransaction>,
}
