use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::todo::{NewTask, TodoTask};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{FromRow, query, query_as};

/// Task gateway backed by the `tasks` table
pub struct DbTaskGateway;

#[derive(FromRow)]
struct TaskRow {
    id: i32,
    description: String,
    status: bool,
    userid: i32,
}

impl From<TaskRow> for TodoTask {
    fn from(value: TaskRow) -> Self {
        TodoTask {
            id: value.id,
            owner_user_id: value.userid,
            description: value.description,
            completed: value.status,
        }
    }
}

impl domain::todo::driven_ports::TaskGateway for DbTaskGateway {
    async fn create(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoTask, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO tasks (description, status, userid) VALUES ($1, FALSE, $2) RETURNING id",
        )
        .bind(new_task.description.as_str())
        .bind(new_task.owner_user_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(TodoTask {
            id: new_id.id,
            owner_user_id: new_task.owner_user_id,
            description: new_task.description.clone(),
            completed: false,
        })
    }

    async fn get_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoTask, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let task = query_as::<_, TaskRow>(
            "SELECT id, description, status, userid FROM tasks WHERE id = $1",
        )
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a task by ID")?;

        task.map(TodoTask::from).ok_or(DrivenPortError::DoesNotExist)
    }

    async fn list_all(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoTask>, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks = query_as::<_, TaskRow>("SELECT id, description, status, userid FROM tasks")
            .fetch_all(cxn.borrow_connection())
            .await
            .context("trying to fetch all tasks")?
            .into_iter()
            .map(TodoTask::from)
            .collect();

        Ok(tasks)
    }

    async fn list_by_owner(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoTask>, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks = query_as::<_, TaskRow>(
            "SELECT id, description, status, userid FROM tasks WHERE userid = $1",
        )
        .bind(user_id)
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch tasks for a user")?
        .into_iter()
        .map(TodoTask::from)
        .collect();

        Ok(tasks)
    }

    async fn mark_complete(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query("UPDATE tasks SET status = TRUE WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to mark a task complete")?;

        if outcome.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }
        Ok(())
    }

    async fn delete(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        if outcome.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }
        Ok(())
    }
}
