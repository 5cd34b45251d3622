//! Role-based permission checks and the typed permission extractor.
//!
//! Permissions are pairs of [`Resource`] and [`Operation`], derived
//! entirely from the user's role. Doctors hold All-scoped operations on
//! every resource; mothers hold Own-scoped operations on their own
//! records. An All-scoped grant implies the matching Own-scoped one, so
//! handlers can require the weakest operation that lets a mother in and
//! then narrow the query by ownership.

use crate::{
    api::models::users::{CurrentUser, Role},
    errors::{Error, Result},
    types::{Operation, Resource},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use std::ops::Deref;

/// Marker types for resources, used as type parameters to
/// [`RequiresPermission`].
pub mod resource {
    pub struct Users;
    pub struct Children;
    pub struct HealthRecords;
    pub struct MotherHealthRecords;
    pub struct Immunizations;
    pub struct Alerts;
    pub struct Reports;
}

/// Marker types for operations, used as type parameters to
/// [`RequiresPermission`].
pub mod operation {
    pub struct CreateAll;
    pub struct CreateOwn;
    pub struct ReadAll;
    pub struct ReadOwn;
    pub struct UpdateAll;
    pub struct UpdateOwn;
    pub struct DeleteAll;
    pub struct DeleteOwn;
}

/// Maps a resource marker type to its [`Resource`] value.
pub trait ResourceMarker {
    const RESOURCE: Resource;
}

/// Maps an operation marker type to its [`Operation`] value.
pub trait OperationMarker {
    const OPERATION: Operation;
}

macro_rules! resource_marker {
    ($($ty:ident),+ $(,)?) => {
        $(impl ResourceMarker for resource::$ty {
            const RESOURCE: Resource = Resource::$ty;
        })+
    };
}

macro_rules! operation_marker {
    ($($ty:ident),+ $(,)?) => {
        $(impl OperationMarker for operation::$ty {
            const OPERATION: Operation = Operation::$ty;
        })+
    };
}

resource_marker!(
    Users,
    Children,
    HealthRecords,
    MotherHealthRecords,
    Immunizations,
    Alerts,
    Reports,
);

operation_marker!(
    CreateAll, CreateOwn, ReadAll, ReadOwn, UpdateAll, UpdateOwn, DeleteAll, DeleteOwn,
);

/// The All-scoped operation that implies an Own-scoped one, if any.
fn implied_by(op: Operation) -> Option<Operation> {
    match op {
        Operation::CreateOwn => Some(Operation::CreateAll),
        Operation::ReadOwn => Some(Operation::ReadAll),
        Operation::UpdateOwn => Some(Operation::UpdateAll),
        Operation::DeleteOwn => Some(Operation::DeleteAll),
        _ => None,
    }
}

/// Whether a role holds a permission directly, before All-implies-Own
/// widening.
fn role_grants(role: Role, resource: Resource, op: Operation) -> bool {
    use Operation::*;
    match role {
        // Doctors hold every All-scoped operation on every resource.
        Role::Doctor => matches!(op, CreateAll | ReadAll | UpdateAll | DeleteAll),
        Role::Mother => match resource {
            Resource::Users => matches!(op, ReadOwn | UpdateOwn),
            Resource::Children => matches!(op, CreateOwn | ReadOwn | UpdateOwn | DeleteOwn),
            Resource::HealthRecords => matches!(op, ReadOwn),
            Resource::MotherHealthRecords => matches!(op, ReadOwn),
            Resource::Immunizations => matches!(op, ReadOwn),
            Resource::Alerts => matches!(op, ReadOwn | UpdateOwn),
            Resource::Reports => false,
        },
    }
}

/// Check a user's permission for an operation on a resource.
pub fn has_permission(user: &CurrentUser, resource: Resource, op: Operation) -> bool {
    if role_grants(user.role, resource, op) {
        return true;
    }
    implied_by(op).is_some_and(|wider| role_grants(user.role, resource, wider))
}

/// True if the user may act on any instance of the resource rather than
/// just their own. Handlers use this to decide whether to scope queries
/// by ownership.
pub fn can_read_all_resources(user: &CurrentUser, resource: Resource) -> bool {
    has_permission(user, resource, Operation::ReadAll)
}

/// Extractor that authenticates the request and checks a single
/// permission before the handler body runs. Dereferences to the
/// authenticated [`CurrentUser`].
pub struct RequiresPermission<R, O> {
    pub user: CurrentUser,
    _marker: PhantomData<(R, O)>,
}

impl<R, O> Deref for RequiresPermission<R, O> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<R, O> FromRequestParts<AppState> for RequiresPermission<R, O>
where
    R: ResourceMarker + Send,
    O: OperationMarker + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !has_permission(&user, R::RESOURCE, O::OPERATION) {
            return Err(Error::InsufficientPermissions {
                required: crate::types::Permission::Allow(R::RESOURCE, O::OPERATION),
                action: O::OPERATION,
                resource: R::RESOURCE.to_string(),
            });
        }

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_doctor_holds_all_scoped_operations() {
        let doctor = user_with_role(Role::Doctor);
        assert!(has_permission(&doctor, Resource::Children, Operation::ReadAll));
        assert!(has_permission(&doctor, Resource::HealthRecords, Operation::CreateAll));
        assert!(has_permission(&doctor, Resource::Reports, Operation::ReadAll));
        assert!(has_permission(&doctor, Resource::Alerts, Operation::DeleteAll));
    }

    #[test]
    fn test_all_implies_own() {
        let doctor = user_with_role(Role::Doctor);
        assert!(has_permission(&doctor, Resource::Children, Operation::ReadOwn));
        assert!(has_permission(&doctor, Resource::Alerts, Operation::UpdateOwn));
    }

    #[test]
    fn test_mother_is_own_scoped() {
        let mother = user_with_role(Role::Mother);
        assert!(has_permission(&mother, Resource::Children, Operation::ReadOwn));
        assert!(has_permission(&mother, Resource::Children, Operation::CreateOwn));
        assert!(!has_permission(&mother, Resource::Children, Operation::ReadAll));
        assert!(!has_permission(&mother, Resource::HealthRecords, Operation::CreateAll));
        assert!(!has_permission(&mother, Resource::HealthRecords, Operation::CreateOwn));
        assert!(!has_permission(&mother, Resource::Reports, Operation::ReadAll));
    }

    #[test]
    fn test_mother_can_resolve_own_alerts() {
        let mother = user_with_role(Role::Mother);
        assert!(has_permission(&mother, Resource::Alerts, Operation::UpdateOwn));
        assert!(!has_permission(&mother, Resource::Alerts, Operation::CreateOwn));
    }

    #[test]
    fn test_scope_widening_helper() {
        assert!(can_read_all_resources(&user_with_role(Role::Doctor), Resource::Children));
        assert!(!can_read_all_resources(&user_with_role(Role::Mother), Resource::Children));
    }
}
