use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::user::{CreateUser, TodoUser};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{FromRow, query, query_as};

/// User gateway backed by the `users` table
pub struct DbUserGateway;

#[derive(FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
}

impl From<UserRow> for TodoUser {
    fn from(value: UserRow) -> Self {
        TodoUser {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

impl domain::user::driven_ports::UserGateway for DbUserGateway {
    async fn create(
        &self,
        user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoUser, DrivenPortError> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .fetch_one(cxn_handle.borrow_connection())
        .await
        .context("trying to insert a new user into the database")?;

        Ok(TodoUser {
            id: new_id.id,
            name: user.name.clone(),
            email: user.email.clone(),
        })
    }

    async fn get_by_id(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoUser, DrivenPortError> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(cxn_handle.borrow_connection())
            .await
            .context("trying to fetch a user by ID")?;

        user.map(TodoUser::from).ok_or(DrivenPortError::DoesNotExist)
    }

    async fn delete(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        // Unlike tasks, a delete that matched nothing still counts as success
        query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(cxn_handle.borrow_connection())
            .await
            .context("trying to remove a user from the database")?;

        Ok(())
    }

    async fn list_all(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoUser>, DrivenPortError> {
        let mut connection = ext_cxn.database_cxn().await?;

        let users = query_as::<_, UserRow>("SELECT id, name, email FROM users")
            .fetch_all(connection.borrow_connection())
            .await
            .context("trying to fetch all users")?
            .into_iter()
            .map(TodoUser::from)
            .collect();

        Ok(users)
    }
}
