use crate::config::key_transactions::RetryConfig;
use crate::domain::model::{ApdexTargets, KeyTransaction, KeyTransactionRequest, SetupReport};
use crate::domain::ports::MonitoringApi;
use crate::utils::error::{OpsError, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    AlreadyPresent,
    Created,
}

/// Creates one key transaction per configured service, retrying whole rounds.
///
/// A round walks the pending services in table order and stops at the first
/// failure; the next round starts after `retry.delay`. Services finished in an
/// earlier round are never queried again.
pub struct KeyTransactionSetup<A: MonitoringApi> {
    api: A,
    account_id: String,
    transactions: Vec<KeyTransaction>,
    apdex: ApdexTargets,
    retry: RetryConfig,
}

impl<A: MonitoringApi> KeyTransactionSetup<A> {
    pub fn new(api: A, account_id: impl Into<String>, transactions: Vec<KeyTransaction>) -> Self {
        Self {
            api,
            account_id: account_id.into(),
            transactions,
            apdex: ApdexTargets::default(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_apdex(mut self, apdex: ApdexTargets) -> Self {
        self.apdex = apdex;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Work list for a dry run: service and transaction name, in order.
    pub fn plan(&self) -> Vec<(&str, &str)> {
        self.transactions
            .iter()
            .map(|t| (t.service.as_str(), t.name.as_str()))
            .collect()
    }

    pub async fn run(&self) -> SetupReport {
        let total = self.transactions.len();
        let mut done: HashSet<&str> = HashSet::with_capacity(total);
        let mut report = SetupReport {
            total,
            ..SetupReport::default()
        };

        tracing::debug!(
            "Starting setup of {} key transactions, at most {} rounds",
            total,
            self.retry.max_attempts
        );

        while done.len() < total && report.rounds < self.retry.max_attempts {
            report.rounds += 1;
            tracing::debug!("Round {} of {}", report.rounds, self.retry.max_attempts);

            if let Err(e) = self.run_round(&mut done, &mut report).await {
                tracing::error!("Failed with error: {}", e);
                report.last_error = Some(e.to_string());

                if report.rounds < self.retry.max_attempts {
                    tracing::warn!("Retrying..");
                    tokio::time::sleep(self.retry.delay()).await;
                }
            }
        }

        report.completed = done.len();
        if report.is_complete() {
            tracing::info!("All {} key transactions created successfully.", total);
        } else {
            tracing::warn!(
                "Stopped after {} rounds with {} of {} key transactions done",
                report.rounds,
                report.completed,
                total
            );
        }
        report
    }

    async fn run_round<'a>(
        &'a self,
        done: &mut HashSet<&'a str>,
        report: &mut SetupReport,
    ) -> Result<()> {
        for txn in &self.transactions {
            if done.contains(txn.service.as_str()) {
                continue;
            }

            match self.configure(txn).await? {
                Outcome::AlreadyPresent => report.already_present.push(txn.service.clone()),
                Outcome::Created => report.created.push(txn.service.clone()),
            }
            done.insert(txn.service.as_str());
        }
        Ok(())
    }

    async fn configure(&self, txn: &KeyTransaction) -> Result<Outcome> {
        tracing::info!("Configuring key transaction for {}.", txn.service);

        if self
            .api
            .find_entity_guid(&txn.name, &self.account_id)
            .await?
            .is_some()
        {
            tracing::info!("Key transaction already exists for {}.. skipping.", txn.service);
            return Ok(Outcome::AlreadyPresent);
        }

        let application_guid = self
            .api
            .find_entity_guid(&txn.service, &self.account_id)
            .await?
            .ok_or_else(|| OpsError::EntityNotFound {
                name: txn.service.clone(),
            })?;

        let created = self
            .api
            .create_key_transaction(&KeyTransactionRequest {
                application_guid,
                metric_name: txn.name.clone(),
                apdex: self.apdex,
            })
            .await?;

        match created.guid {
            Some(guid) => tracing::info!("Key transaction created for {} ({}).", txn.service, guid),
            None => tracing::info!("Key transaction created for {}.", txn.service),
        }
        Ok(Outcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::key_transactions::default_key_transactions;
    use crate::domain::model::{CreatedKeyTransaction, EntityGuid};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Search(String),
        Create(String, String),
    }

    /// In-memory API whose answers come from a closure over the searched name
    /// and the running call count.
    struct ScriptedApi<F> {
        search: F,
        create_fails: bool,
        calls: Mutex<Vec<Call>>,
        counter: AtomicUsize,
    }

    impl<F> ScriptedApi<F>
    where
        F: Fn(&str, usize) -> Result<Option<EntityGuid>> + Send + Sync,
    {
        fn new(search: F) -> Self {
            Self {
                search,
                create_fails: false,
                calls: Mutex::new(Vec::new()),
                counter: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn searches_for(&self, name: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Search(n) if n == name))
                .count()
        }

        fn creates(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Create(..)))
                .count()
        }
    }

    #[async_trait]
    impl<F> MonitoringApi for ScriptedApi<F>
    where
        F: Fn(&str, usize) -> Result<Option<EntityGuid>> + Send + Sync,
    {
        async fn find_entity_guid(
            &self,
            name: &str,
            account_id: &str,
        ) -> Result<Option<EntityGuid>> {
            assert_eq!(account_id, "42");
            self.calls.lock().unwrap().push(Call::Search(name.to_string()));
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            (self.search)(name, n)
        }

        async fn create_key_transaction(
            &self,
            request: &KeyTransactionRequest,
        ) -> Result<CreatedKeyTransaction> {
            self.calls.lock().unwrap().push(Call::Create(
                request.application_guid.to_string(),
                request.metric_name.clone(),
            ));
            if self.create_fails {
                return Err(OpsError::UnexpectedStatus { status: 500 });
            }
            Ok(CreatedKeyTransaction {
                guid: Some(EntityGuid(format!("KT-{}", request.metric_name))),
                name: Some(request.metric_name.clone()),
                metric_name: Some(request.metric_name.clone()),
                apdex_target: Some(request.apdex.target),
                browser_apdex_target: Some(request.apdex.browser_target),
            })
        }
    }

    fn no_delay() -> RetryConfig {
        RetryConfig {
            max_attempts: 20,
            delay_ms: 0,
        }
    }

    fn guid(value: &str) -> Option<EntityGuid> {
        Some(EntityGuid(value.to_string()))
    }

    #[tokio::test]
    async fn test_existing_transactions_finish_in_one_round() {
        let api = ScriptedApi::new(|_, _| Ok(guid("EXISTING")));
        let setup = KeyTransactionSetup::new(api, "42", default_key_transactions())
            .with_retry(no_delay());

        let report = setup.run().await;

        assert!(report.is_complete());
        assert_eq!(report.rounds, 1);
        assert_eq!(report.completed, 6);
        assert_eq!(report.already_present.len(), 6);
        assert!(report.created.is_empty());
        assert_eq!(setup.api.calls().len(), 6);
        assert_eq!(setup.api.creates(), 0);
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_permanent_failure_exhausts_twenty_rounds() {
        let api = ScriptedApi::new(|_, _| Err(OpsError::UnexpectedStatus { status: 500 }));
        let setup = KeyTransactionSetup::new(api, "42", default_key_transactions())
            .with_retry(no_delay());

        let report = setup.run().await;

        assert_eq!(report.rounds, 20);
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 6);
        // Each round stops at its first failure.
        assert_eq!(setup.api.calls().len(), 20);
        assert_eq!(
            report.last_error.as_deref(),
            Some("NerdGraph query failed with a 500.")
        );

        let err = report.into_result().unwrap_err();
        assert!(matches!(
            err,
            OpsError::RetryBudgetExhausted {
                completed: 0,
                total: 6,
                rounds: 20
            }
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_missing_transaction_is_created_within_the_round() {
        // Transaction-name searches find nothing; application searches find the app.
        let api = ScriptedApi::new(|name, _| {
            if name.starts_with("WebTransaction") {
                Ok(None)
            } else {
                Ok(guid(&format!("APP-{}", name)))
            }
        });
        let setup = KeyTransactionSetup::new(api, "42", default_key_transactions())
            .with_retry(no_delay());

        let report = setup.run().await;

        assert!(report.is_complete());
        assert_eq!(report.rounds, 1);
        assert_eq!(report.created.len(), 6);
        assert_eq!(setup.api.creates(), 6);
        assert_eq!(
            setup.api.calls()[..3],
            [
                Call::Search(
                    "WebTransaction/SpringController/AuthController/verifyToken".to_string()
                ),
                Call::Search("store-ts-auth-service".to_string()),
                Call::Create(
                    "APP-store-ts-auth-service".to_string(),
                    "WebTransaction/SpringController/AuthController/verifyToken".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_done_services_are_never_requeried() {
        // The second call (second service's transaction search) fails once.
        let api = ScriptedApi::new(|_, n| {
            if n == 1 {
                Err(OpsError::UnexpectedStatus { status: 502 })
            } else {
                Ok(guid("EXISTING"))
            }
        });
        let transactions = default_key_transactions();
        let first_name = transactions[0].name.clone();
        let second_name = transactions[1].name.clone();
        let setup =
            KeyTransactionSetup::new(api, "42", transactions).with_retry(no_delay());

        let report = setup.run().await;

        assert!(report.is_complete());
        assert_eq!(report.rounds, 2);
        assert_eq!(setup.api.searches_for(&first_name), 1);
        assert_eq!(setup.api.searches_for(&second_name), 2);
        assert_eq!(setup.api.calls().len(), 7);
    }

    #[tokio::test]
    async fn test_unknown_application_retries_until_budget() {
        let api = ScriptedApi::new(|_, _| Ok(None));
        let setup = KeyTransactionSetup::new(api, "42", default_key_transactions()).with_retry(
            RetryConfig {
                max_attempts: 3,
                delay_ms: 0,
            },
        );

        let report = setup.run().await;

        assert_eq!(report.rounds, 3);
        assert_eq!(report.completed, 0);
        assert_eq!(setup.api.creates(), 0);
        assert_eq!(
            report.last_error.as_deref(),
            Some("No monitored entity named 'store-ts-auth-service' was found")
        );
    }

    #[tokio::test]
    async fn test_create_failure_leaves_service_pending() {
        let mut api = ScriptedApi::new(|name, _| {
            if name.starts_with("WebTransaction") {
                Ok(None)
            } else {
                Ok(guid("APP"))
            }
        });
        api.create_fails = true;
        let setup = KeyTransactionSetup::new(api, "42", default_key_transactions()).with_retry(
            RetryConfig {
                max_attempts: 2,
                delay_ms: 0,
            },
        );

        let report = setup.run().await;

        assert_eq!(report.completed, 0);
        assert_eq!(setup.api.creates(), 2);
    }

    #[tokio::test]
    async fn test_single_service_plan_and_create() {
        let api = ScriptedApi::new(|name, _| {
            if name.starts_with("WebTransaction") {
                Ok(None)
            } else {
                Ok(guid("APP"))
            }
        });
        let setup = KeyTransactionSetup::new(
            api,
            "42",
            vec![KeyTransaction::new("store-ts-ui-dashboard", "WebTransaction/Uri/index.html")],
        )
        .with_apdex(ApdexTargets {
            target: 0.8,
            browser_target: 3.0,
        })
        .with_retry(no_delay());

        assert_eq!(
            setup.plan(),
            vec![("store-ts-ui-dashboard", "WebTransaction/Uri/index.html")]
        );

        let report = setup.run().await;
        assert!(report.is_complete());
        assert_eq!(report.created, vec!["store-ts-ui-dashboard".to_string()]);
    }
}
