//! Where repository statements run.
//!
//! In production every repository call opens and commits its own
//! transaction on the pool. Tests hand the repositories one shared
//! transaction instead, which is rolled back when the last handle is dropped.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

#[derive(Clone)]
pub enum Executor {
    Pool(PgPool),
    Shared(SharedTransaction),
}

impl Executor {
    pub fn from_transaction(tx: Transaction<'static, Postgres>) -> Self {
        Executor::Shared(Arc::new(Mutex::new(Some(tx))))
    }

    /// Starts a unit of work. Nothing is visible to others until
    /// [`Session::commit`] is called.
    pub async fn session(&self) -> Result<Session<'_>, sqlx::Error> {
        let inner = match self {
            Executor::Pool(pool) => SessionInner::Owned(pool.begin().await?),
            Executor::Shared(shared) => SessionInner::Shared(shared.lock().await),
        };
        Ok(Session { inner })
    }
}

enum SessionInner<'a> {
    Owned(Transaction<'static, Postgres>),
    Shared(MutexGuard<'a, Option<Transaction<'static, Postgres>>>),
}

pub struct Session<'a> {
    inner: SessionInner<'a>,
}

impl Session<'_> {
    pub fn conn(&mut self) -> Result<&mut PgConnection, Box<dyn Error + Send + Sync>> {
        match &mut self.inner {
            SessionInner::Owned(tx) => Ok(&mut **tx),
            SessionInner::Shared(guard) => match &mut **guard {
                Some(tx) => Ok(&mut **tx),
                None => Err("Transaction has been consumed".into()),
            },
        }
    }

    /// Commits an owned transaction. A shared transaction stays open and is
    /// settled by its owner.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        match self.inner {
            SessionInner::Owned(tx) => tx.commit().await,
            SessionInner::Shared(_) => Ok(()),
        }
    }
}
