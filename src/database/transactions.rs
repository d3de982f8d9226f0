// ABOUTME: RAII transaction guard that rolls back unless explicitly committed
// ABOUTME: Used for multi-statement writes such as account creation and ingredient lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Transaction management with an RAII guard
//!
//! ```text
//! let mut guard = TransactionGuard::new(pool.begin().await?);
//! sqlx::query("INSERT INTO users ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO profiles ...").execute(guard.executor()?).await?;
//! guard.commit().await?;
//! ```
//!
//! Dropping the guard before `commit()` rolls the transaction back. Failed
//! transactions are never retried; constraint failures are reported to the
//! caller as domain errors.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for `SQLite` transactions
pub struct TransactionGuard<'c> {
    transaction: Option<Transaction<'c, Sqlite>>,
    committed: bool,
}

impl<'c> TransactionGuard<'c> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, Sqlite>) -> Self {
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Begin a transaction on the pool and wrap it
    ///
    /// # Errors
    ///
    /// Returns an error if no connection could be acquired
    pub async fn begin(pool: &sqlx::SqlitePool) -> AppResult<TransactionGuard<'static>> {
        let transaction = pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(TransactionGuard::new(transaction))
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("Transaction committed");
        Ok(())
    }

    /// Connection to run statements on
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("Transaction dropped without commit - rolling back");
        }
    }
}
