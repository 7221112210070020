use sqlx::PgConnection;

/// A live handle to a database connection which driven adapters can run statements against
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Gives driven adapters access to the systems outside the service. Business logic only ever
/// sees this trait, so adapters can be swapped for in-memory versions during tests.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Acquires a database connection. The connection goes back to its pool when the
    /// handle is dropped.
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
