//! Closed set of operations the delegate service exposes over HTTP.
//!
//! Every variant maps to exactly one `POST` endpoint under the backend base
//! URL. The set is fixed at compile time and is independent of what the
//! backend advertises through its listing endpoint.

use std::fmt;
use std::str::FromStr;

use crate::BackendError;

/// One invocable unit of backend functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    TestConnection,
    CreateUser,
    FindUserById,
    UpdateUser,
    DeleteUser,
    FindAllUsers,
    FindUsersByDepartment,
    SearchUsers,
    FindUsersWithPagination,
    TransferData,
    BatchInsertUsers,
    GetConnectionInfo,
    GetDatabaseInfo,
    GetTableColumns,
    ExecuteCountByDepartment,
}

impl Operation {
    /// Every operation, in the order the backend registers them.
    pub const ALL: [Operation; 15] = [
        Operation::TestConnection,
        Operation::CreateUser,
        Operation::FindUserById,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::FindAllUsers,
        Operation::FindUsersByDepartment,
        Operation::SearchUsers,
        Operation::FindUsersWithPagination,
        Operation::TransferData,
        Operation::BatchInsertUsers,
        Operation::GetConnectionInfo,
        Operation::GetDatabaseInfo,
        Operation::GetTableColumns,
        Operation::ExecuteCountByDepartment,
    ];

    /// Wire name used by callers and by the backend listing.
    pub fn name(self) -> &'static str {
        match self {
            Operation::TestConnection => "test_connection",
            Operation::CreateUser => "create_user",
            Operation::FindUserById => "find_user_by_id",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::FindAllUsers => "find_all_users",
            Operation::FindUsersByDepartment => "find_users_by_department",
            Operation::SearchUsers => "search_users",
            Operation::FindUsersWithPagination => "find_users_with_pagination",
            Operation::TransferData => "transfer_data",
            Operation::BatchInsertUsers => "batch_insert_users",
            Operation::GetConnectionInfo => "get_connection_info",
            Operation::GetDatabaseInfo => "get_database_info",
            Operation::GetTableColumns => "get_table_columns",
            Operation::ExecuteCountByDepartment => "execute_count_by_department",
        }
    }

    /// Backend-relative path of the endpoint fulfilling this operation.
    pub fn endpoint(self) -> String {
        format!("/{}", self.name())
    }

    /// Look up an operation by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = BackendError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| BackendError::UnknownOperation(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves_back_to_its_operation() {
        for operation in Operation::ALL {
            assert_eq!(Operation::from_name(operation.name()), Some(operation));
        }
    }

    #[test]
    fn endpoint_is_rooted_at_the_operation_name() {
        assert_eq!(Operation::FindUserById.endpoint(), "/find_user_by_id");
        assert_eq!(Operation::ExecuteCountByDepartment.endpoint(), "/execute_count_by_department");
    }

    #[test]
    fn lookup_is_exact() {
        assert!(Operation::from_name("Create_User").is_none());
        assert!(Operation::from_name(" create_user").is_none());
        let error = "drop_database".parse::<Operation>().unwrap_err();
        assert!(matches!(error, BackendError::UnknownOperation(name) if name == "drop_database"));
    }
}
