use crate::domain_model::AccessClaims;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
}

/// Requirement placed on the verified access claims of a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessGuard {
    Authenticated,
    Role(String),
    AnyRole(Vec<String>),
    Permission(String),
    AllPermissions(Vec<String>),
}

impl AccessGuard {
    /// No principal is `Unauthorized`; a principal lacking the requirement is `Forbidden`.
    pub fn check(&self, principal: Option<&AccessClaims>) -> Result<(), GuardError> {
        let claims = principal.ok_or(GuardError::Unauthorized)?;
        let ok = match self {
            AccessGuard::Authenticated => true,
            AccessGuard::Role(role) => claims.has_role(role),
            AccessGuard::AnyRole(roles) => roles.iter().any(|r| claims.has_role(r)),
            AccessGuard::Permission(p) => claims.has_permission(p),
            AccessGuard::AllPermissions(ps) => ps.iter().all(|p| claims.has_permission(p)),
        };
        if ok { Ok(()) } else { Err(GuardError::Forbidden) }
    }
}

/// Pulls the credential out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split(' ');
    let (scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::UserId;

    fn admin() -> AccessClaims {
        AccessClaims {
            user_id: UserId::from("u1"),
            role: Some("admin".to_string()),
            permissions: Some(vec!["read".into(), "write".into(), "delete".into()]),
        }
    }

    fn viewer() -> AccessClaims {
        AccessClaims {
            user_id: UserId::from("u2"),
            role: Some("viewer".to_string()),
            permissions: Some(vec!["read".into()]),
        }
    }

    #[test]
    fn missing_principal_is_unauthorized() {
        for guard in [
            AccessGuard::Authenticated,
            AccessGuard::Role("admin".into()),
            AccessGuard::Permission("read".into()),
        ] {
            assert_eq!(guard.check(None), Err(GuardError::Unauthorized));
        }
    }

    #[test]
    fn role_checks() {
        let guard = AccessGuard::Role("admin".into());
        assert_eq!(guard.check(Some(&admin())), Ok(()));
        assert_eq!(guard.check(Some(&viewer())), Err(GuardError::Forbidden));

        let any = AccessGuard::AnyRole(vec!["admin".into(), "editor".into()]);
        assert_eq!(any.check(Some(&admin())), Ok(()));
        let none = AccessGuard::AnyRole(vec!["editor".into(), "moderator".into()]);
        assert_eq!(none.check(Some(&viewer())), Err(GuardError::Forbidden));
    }

    #[test]
    fn permission_checks() {
        assert_eq!(
            AccessGuard::Permission("read".into()).check(Some(&viewer())),
            Ok(())
        );
        assert_eq!(
            AccessGuard::Permission("delete".into()).check(Some(&viewer())),
            Err(GuardError::Forbidden)
        );
        let both = AccessGuard::AllPermissions(vec!["read".into(), "write".into()]);
        assert_eq!(both.check(Some(&admin())), Ok(()));
        assert_eq!(both.check(Some(&viewer())), Err(GuardError::Forbidden));
    }

    #[test]
    fn principal_without_role_is_forbidden() {
        let bare = AccessClaims {
            user_id: UserId::from("u3"),
            role: None,
            permissions: None,
        };
        assert_eq!(AccessGuard::Authenticated.check(Some(&bare)), Ok(()));
        assert_eq!(
            AccessGuard::AnyRole(vec!["admin".into()]).check(Some(&bare)),
            Err(GuardError::Forbidden)
        );
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(Some("Basic abc123")), None);
        assert_eq!(extract_bearer_token(Some("Bearer ")), None);
        assert_eq!(extract_bearer_token(Some("Bearer a b")), None);
        assert_eq!(extract_bearer_token(None), None);
    }
}
