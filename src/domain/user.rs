use crate::domain::Error;
use crate::domain::user::driven_ports::UserGateway;
use crate::external_connections::ExternalConnectivity;
use tracing::error;
use validator::Validate;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Data needed to register a user. Both fields must be non-empty.
#[derive(Validate)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq, Eq))]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
}

pub mod driven_ports {
    use super::*;
    use crate::domain::DrivenPortError;

    /// Storage operations for users
    pub trait UserGateway {
        async fn create(
            &self,
            user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoUser, DrivenPortError>;
        async fn get_by_id(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoUser, DrivenPortError>;
        /// Removes a user. Succeeds whether or not a user with the ID existed.
        async fn delete(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
        async fn list_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoUser>, DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait UserPort {
        async fn create_user(
            &self,
            new_user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
            u_gateway: &impl UserGateway,
        ) -> Result<TodoUser, Error>;
        async fn get_user(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_gateway: &impl UserGateway,
        ) -> Result<TodoUser, Error>;
        async fn delete_user(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_gateway: &impl UserGateway,
        ) -> Result<(), Error>;
        async fn list_users(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            u_gateway: &impl UserGateway,
        ) -> Result<Vec<TodoUser>, Error>;
    }
}

pub struct UserService {}

impl driving_ports::UserPort for UserService {
    async fn create_user(
        &self,
        new_user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
        u_gateway: &impl UserGateway,
    ) -> Result<TodoUser, Error> {
        new_user.validate()?;

        u_gateway
            .create(new_user, &mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("User create failure: {port_err}");
                port_err.into_error_trying_to("create a user")
            })
    }

    async fn get_user(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_gateway: &impl UserGateway,
    ) -> Result<TodoUser, Error> {
        u_gateway
            .get_by_id(id, &mut *ext_cxn)
            .await
            .map_err(|port_err| port_err.into_error_trying_to("look up a user"))
    }

    async fn delete_user(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_gateway: &impl UserGateway,
    ) -> Result<(), Error> {
        u_gateway
            .delete(id, &mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("User {id} delete failure: {port_err}");
                port_err.into_error_trying_to("delete a user")
            })
    }

    async fn list_users(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        u_gateway: &impl UserGateway,
    ) -> Result<Vec<TodoUser>, Error> {
        u_gateway
            .list_all(&mut *ext_cxn)
            .await
            .map_err(|port_err| {
                error!("User fetch failure: {port_err}");
                port_err.into_error_trying_to("fetch all users")
            })
    }
}
