pub mod db_todo_driven_ports;
pub mod db_user_driven_ports;

use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use anyhow::Context;
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, PgConnection, PgPool, Postgres};

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: PgPool,
}

impl ExternalConnectivity {
    /// Wraps an already constructed connection pool
    pub fn new(db: PgPool) -> Self {
        ExternalConnectivity { db }
    }
}

/// A handle from ExternalConnectivity which holds one pooled database connection
pub struct PoolConnectionHandle {
    active_connection: PoolConnection<Postgres>,
}

impl ConnectionHandle for PoolConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut self.active_connection
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle<'cxn_borrow> = PoolConnectionHandle;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error> {
        let active_connection = self
            .db
            .acquire()
            .await
            .context("acquiring a connection from the database pool")?;

        Ok(PoolConnectionHandle { active_connection })
    }
}

/// Utility DTO for retrieving the ID of a newly inserted record from PostgreSQL
#[derive(FromRow)]
struct NewId {
    id: i32,
}
