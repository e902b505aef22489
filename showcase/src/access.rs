//! Role gate for protected areas.

use crate::error::AccessError;
use crate::session::SessionState;
use crate::types::User;

/// What an area requires of the current session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Anyone, signed in or not
    Public,
    /// Any signed-in user
    Authenticated,
    /// Signed-in administrators only
    Admin,
}

/// Checks `session` against `access`
///
/// Returns the signed-in user when there is one.
///
/// # Errors
///
/// Returns [`AccessError::NotAuthenticated`] when a sign-in is required and
/// missing, and [`AccessError::AdminRequired`] when a regular user asks for
/// an admin area.
pub fn authorize(session: &SessionState, access: Access) -> Result<Option<&User>, AccessError> {
    let user = session.user.as_ref().filter(|_| session.is_authenticated());
    match (access, user) {
        (Access::Public, user) => Ok(user),
        (Access::Authenticated | Access::Admin, None) => Err(AccessError::NotAuthenticated),
        (Access::Authenticated, Some(user)) => Ok(Some(user)),
        (Access::Admin, Some(user)) if user.is_admin() => Ok(Some(user)),
        (Access::Admin, Some(_)) => Err(AccessError::AdminRequired),
    }
}
