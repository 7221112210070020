use super::test_util;
use crate::domain::DrivenPortError;
use crate::domain::todo::NewTask;
use crate::domain::todo::driven_ports::TaskGateway;
use crate::domain::user::CreateUser;
use crate::domain::user::driven_ports::UserGateway;
use crate::persistence::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::DbTaskGateway;
use crate::persistence::db_user_driven_ports::DbUserGateway;
use speculoos::prelude::*;

fn alice() -> CreateUser {
    CreateUser {
        name: "Alice".to_owned(),
        email: "a@b.com".to_owned(),
    }
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn created_tasks_start_incomplete_and_belong_to_owner() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        let owner = DbUserGateway
            .create(&alice(), &mut ext_cxn)
            .await
            .expect("user insert failed");

        let created = DbTaskGateway
            .create(
                &NewTask {
                    owner_user_id: owner.id,
                    description: "Buy milk".to_owned(),
                },
                &mut ext_cxn,
            )
            .await
            .expect("task insert failed");
        assert_that!(created.completed).is_false();

        let fetched = DbTaskGateway
            .get_by_id(created.id, &mut ext_cxn)
            .await
            .expect("task lookup failed");
        assert_eq!(created, fetched);

        let owned = DbTaskGateway
            .list_by_owner(owner.id, &mut ext_cxn)
            .await
            .expect("listing by owner failed");
        assert_eq!(vec![created], owned);

        let someone_elses = DbTaskGateway
            .list_by_owner(owner.id + 1, &mut ext_cxn)
            .await
            .expect("listing by owner failed");
        assert_that!(someone_elses).is_empty();
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn completing_twice_still_succeeds() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        let task = DbTaskGateway
            .create(
                &NewTask {
                    owner_user_id: 1,
                    description: "Water plants".to_owned(),
                },
                &mut ext_cxn,
            )
            .await
            .expect("task insert failed");

        let first = DbTaskGateway.mark_complete(task.id, &mut ext_cxn).await;
        let second = DbTaskGateway.mark_complete(task.id, &mut ext_cxn).await;
        assert!(first.is_ok());
        assert!(second.is_ok());

        let fetched = DbTaskGateway
            .get_by_id(task.id, &mut ext_cxn)
            .await
            .expect("task lookup failed");
        assert_that!(fetched.completed).is_true();
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn task_changes_report_missing_rows() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);

        let complete_result = DbTaskGateway.mark_complete(404, &mut ext_cxn).await;
        assert!(matches!(complete_result, Err(DrivenPortError::DoesNotExist)));

        let delete_result = DbTaskGateway.delete(404, &mut ext_cxn).await;
        assert!(matches!(delete_result, Err(DrivenPortError::DoesNotExist)));

        let get_result = DbTaskGateway.get_by_id(404, &mut ext_cxn).await;
        assert!(matches!(get_result, Err(DrivenPortError::DoesNotExist)));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn deleting_a_missing_user_succeeds() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);

        let delete_result = DbUserGateway.delete(404, &mut ext_cxn).await;
        assert!(delete_result.is_ok());

        let get_result = DbUserGateway.get_by_id(404, &mut ext_cxn).await;
        assert!(matches!(get_result, Err(DrivenPortError::DoesNotExist)));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn users_are_listed_after_creation() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        let created = DbUserGateway
            .create(&alice(), &mut ext_cxn)
            .await
            .expect("user insert failed");

        let users = DbUserGateway
            .list_all(&mut ext_cxn)
            .await
            .expect("listing users failed");
        assert_eq!(vec![created], users);
    });
}
