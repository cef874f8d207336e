//! Parameter schemas for the backend operations.
//!
//! The backend listing only carries names and descriptions, so argument
//! shapes are kept here, keyed by the closed [`Operation`] set.

use crate::types::{ParameterSpec, ParameterType};
use jdbc_bridge_api::Operation;

use ParameterType::{Array, Boolean, Number, String as Text};

const CREATE_USER: [ParameterSpec; 4] = [
    ParameterSpec::required("name", Text, "User name"),
    ParameterSpec::required("email", Text, "User email"),
    ParameterSpec::required("department", Text, "Department"),
    ParameterSpec::required("role", Text, "User role"),
];

const USER_ID: [ParameterSpec; 1] = [ParameterSpec::required("userId", Number, "User id")];

const UPDATE_USER: [ParameterSpec; 5] = [
    ParameterSpec::required("userId", Number, "User id"),
    ParameterSpec::required("name", Text, "User name"),
    ParameterSpec::required("email", Text, "User email"),
    ParameterSpec::required("department", Text, "Department"),
    ParameterSpec::required("role", Text, "User role"),
];

const DEPARTMENT: [ParameterSpec; 1] = [ParameterSpec::required("department", Text, "Department to search")];

const SEARCH_USERS: [ParameterSpec; 5] = [
    ParameterSpec::optional("department", Text, "Filter by department"),
    ParameterSpec::optional("role", Text, "Filter by role"),
    ParameterSpec::optional("active", Boolean, "Filter by active flag"),
    ParameterSpec::optional("limit", Number, "Maximum number of rows"),
    ParameterSpec::optional("offset", Number, "Rows to skip"),
];

const USER_BATCH: [ParameterSpec; 1] = [ParameterSpec::required(
    "users",
    Array,
    "Users to insert, each with name, email, department and role",
)];

const TABLE_NAME: [ParameterSpec; 1] = [ParameterSpec::required("tableName", Text, "Table to inspect")];

const COUNT_BY_DEPARTMENT: [ParameterSpec; 1] = [ParameterSpec::required("department", Text, "Department to count")];

/// Known parameters for an operation.
pub fn operation_parameters(operation: Operation) -> &'static [ParameterSpec] {
    match operation {
        Operation::TestConnection
        | Operation::FindAllUsers
        | Operation::GetConnectionInfo
        | Operation::GetDatabaseInfo
        | Operation::FindUsersWithPagination => &[],
        Operation::CreateUser => &CREATE_USER,
        Operation::FindUserById | Operation::DeleteUser => &USER_ID,
        Operation::UpdateUser => &UPDATE_USER,
        Operation::FindUsersByDepartment => &DEPARTMENT,
        Operation::SearchUsers => &SEARCH_USERS,
        Operation::TransferData | Operation::BatchInsertUsers => &USER_BATCH,
        Operation::GetTableColumns => &TABLE_NAME,
        Operation::ExecuteCountByDepartment => &COUNT_BY_DEPARTMENT,
    }
}

/// Known parameters for a backend-reported name; unknown names have none.
pub fn parameters_for_name(name: &str) -> &'static [ParameterSpec] {
    Operation::from_name(name).map(operation_parameters).unwrap_or(&[])
}
