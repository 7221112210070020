use crate::domain::Error;
use crate::domain::todo::driven_ports::TaskGateway;
use crate::domain::user::driven_ports::UserGateway;
use crate::domain::user::driving_ports::UserPort;
use crate::external_connections::ExternalConnectivity;
use tracing::{error, info};
use validator::Validate;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoTask {
    pub id: i32,
    pub owner_user_id: i32,
    pub description: String,
    pub completed: bool,
}

/// Data needed to create a task. New tasks always start out incomplete.
#[derive(Validate)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq, Eq))]
pub struct NewTask {
    pub owner_user_id: i32,
    #[validate(length(min = 1))]
    pub description: String,
}

pub mod driven_ports {
    use super::*;
    use crate::domain::DrivenPortError;

    /// Storage operations for tasks. Mutations report [DrivenPortError::DoesNotExist] when no
    /// row matched the ID.
    pub trait TaskGateway {
        async fn create(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoTask, DrivenPortError>;
        async fn get_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoTask, DrivenPortError>;
        async fn list_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, DrivenPortError>;
        async fn list_by_owner(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, DrivenPortError>;
        async fn mark_complete(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
        async fn delete(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TaskPort {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
            u_service: &impl UserPort,
            u_gateway: &impl UserGateway,
            task_gateway: &impl TaskGateway,
        ) -> Result<TodoTask, Error>;
        async fn get_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_gateway: &impl TaskGateway,
        ) -> Result<TodoTask, Error>;
        async fn tasks_for_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_service: &impl UserPort,
            u_gateway: &impl UserGateway,
            task_gateway: &impl TaskGateway,
        ) -> Result<Vec<TodoTask>, Error>;
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_gateway: &impl TaskGateway,
        ) -> Result<Vec<TodoTask>, Error>;
        async fn complete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_gateway: &impl TaskGateway,
        ) -> Result<(), Error>;
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_gateway: &impl TaskGateway,
        ) -> Result<(), Error>;
    }
}

pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
        u_service: &impl UserPort,
        u_gateway: &impl UserGateway,
        task_gateway: &impl TaskGateway,
    ) -> Result<TodoTask, Error> {
        new_task.validate()?;

        let owner_id = new_task.owner_user_id;
        if let Err(lookup_err) = u_service.get_user(owner_id, &mut *ext_cxn, u_gateway).await {
            info!("Refusing to create a task, could not confirm user {owner_id}: {lookup_err}");
            return Err(Error::MissingReference {
                entity: "user",
                id: owner_id,
                cause: Box::new(lookup_err),
            });
        }

        task_gateway
            .create(new_task, &mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("Task create failure for user {owner_id}: {port_err}");
                port_err.into_error_trying_to("create a task")
            })
    }

    async fn get_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_gateway: &impl TaskGateway,
    ) -> Result<TodoTask, Error> {
        task_gateway
            .get_by_id(task_id, &mut *ext_cxn)
            .await
            .map_err(|port_err| port_err.into_error_trying_to("look up a task"))
    }

    async fn tasks_for_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_service: &impl UserPort,
        u_gateway: &impl UserGateway,
        task_gateway: &impl TaskGateway,
    ) -> Result<Vec<TodoTask>, Error> {
        u_service.get_user(user_id, &mut *ext_cxn, u_gateway).await?;

        task_gateway
            .list_by_owner(user_id, &mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("Failed to fetch tasks for user {user_id}: {port_err}");
                port_err.into_error_trying_to("fetch a user's tasks")
            })
    }

    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_gateway: &impl TaskGateway,
    ) -> Result<Vec<TodoTask>, Error> {
        task_gateway
            .list_all(&mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("Task fetch failure: {port_err}");
                port_err.into_error_trying_to("fetch all tasks")
            })
    }

    async fn complete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_gateway: &impl TaskGateway,
    ) -> Result<(), Error> {
        task_gateway
            .mark_complete(task_id, &mut *ext_cxn)
            .await
            .map_err(|port_err| port_err.into_error_trying_to("complete a task"))
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_gateway: &impl TaskGateway,
    ) -> Result<(), Error> {
        task_gateway
            .delete(task_id, &mut *ext_cxn)
            .await
            .map_err(|port_err| port_err.into_error_trying_to("delete a task"))
    }
}
