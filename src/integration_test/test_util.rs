use crate::app_env::test::TEST_DB_URL;
use crate::db;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::{env, future::Future, panic};
use tokio::runtime::Runtime;

const SCHEMA: &str = include_str!("../../db/schema.sql");

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let db_name = format!("test_db_{}", thread_rng().gen_range(10_000..99_999u32));
        let mut conn = PgConnection::connect(base_url).await?;

        let result = sqlx::query(format!("CREATE DATABASE {db_name}").as_str())
            .execute(&mut conn)
            .await;
        let _ = conn.close().await;
        result?;

        Ok(Self {
            base_url: base_url.to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn destroy(self) {
        let mut conn = match PgConnection::connect(&self.base_url).await {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {}",
                    self.db_name, conn_err
                );
                return;
            }
        };

        let drop_result = sqlx::query(format!("DROP DATABASE {} WITH (FORCE)", self.db_name).as_str())
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {}",
                self.db_name, db_err
            );
        }
        let _ = conn.close().await;
    }
}

/// Creates a throwaway database with the service schema applied, hands a pool for it to the test,
/// and drops the database afterwards even if the test panics.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    F: FnOnce(PgPool) -> R,
    R: Future<Output = ()> + Send + 'static,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(TEST_DB_URL).expect(
            "You must provide the TEST_DB_URL environment variable as the base postgres connection string",
        );
        let test_db = TestDatabase::create(&base_url)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to start test database: {db_err}"));

        let pool = db::connect_sqlx(&test_db.url(), 5)
            .await
            .expect("Could not connect to the test database");
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .expect("Could not apply the schema to the test database");

        let outcome = tokio::spawn(test_fn(pool.clone())).await;

        pool.close().await;
        test_db.destroy().await;

        if let Err(join_err) = outcome {
            if join_err.is_panic() {
                panic::resume_unwind(join_err.into_panic());
            }
        }
    });
}
