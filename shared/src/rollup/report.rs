//! Result assembly.
//!
//! Wraps the single account aggregate produced for a request into the
//! payload handed to the notification sink.

use serde::{Deserialize, Serialize};

use crate::models::{AccountAggregate, AccountDescriptor};

/// The rollup result for one requested account.
///
/// Serializes as the wrapped [`AccountAggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightReport {
    account: AccountAggregate,
}

impl InsightReport {
    /// Wraps an account aggregate.
    #[must_use]
    pub fn new(account: AccountAggregate) -> Self {
        Self { account }
    }

    /// Selects the requested account from the rollup output.
    ///
    /// When the rollup produced nothing for the account, the report holds an
    /// empty aggregate named after the descriptor. Aggregates for any other
    /// account are dropped.
    #[must_use]
    pub fn assemble(
        requested: &AccountDescriptor,
        accounts: Vec<AccountAggregate>,
        platform: &str,
    ) -> Self {
        let mut selected = None;

        for account in accounts {
            if selected.is_none() && account.account_id == requested.id {
                selected = Some(account);
            } else {
                tracing::warn!(
                    requested = %requested.id,
                    account_id = %account.account_id,
                    "Discarding rollup for unrequested account"
                );
            }
        }

        let account = selected.unwrap_or_else(|| {
            AccountAggregate::empty(requested.id.clone(), requested.name.clone(), platform)
        });

        Self { account }
    }

    /// Returns the wrapped account aggregate.
    #[must_use]
    pub fn account(&self) -> &AccountAggregate {
        &self.account
    }

    /// Consumes the report, returning the account aggregate.
    #[must_use]
    pub fn into_account(self) -> AccountAggregate {
        self.account
    }
}
