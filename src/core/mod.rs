pub mod key_transactions;

pub use crate::domain::model::{KeyTransaction, SetupReport};
pub use crate::domain::ports::MonitoringApi;
pub use key_transactions::KeyTransactionSetup;
