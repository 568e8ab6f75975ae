/*!
 * # Request identity
 *
 * Authentication happens upstream of this service. The gateway forwards the
 * authenticated principal in two headers which every mutating handler
 * extracts as an [`Actor`]:
 *
 * - `x-actor-id`: opaque identifier stored in `created_by`
 * - `x-actor-role`: one of `admin`, `owner`, `employee`, `team`
 */

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Role of the caller on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    /// Business owner
    Owner,
    Employee,
    Team,
}

impl std::str::FromStr for ActorRole {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(ActorRole::Admin),
            "owner" | "business" => Ok(ActorRole::Owner),
            "employee" => Ok(ActorRole::Employee),
            "team" => Ok(ActorRole::Team),
            other => Err(ServiceError::Unauthorized(format!(
                "Unknown actor role: {other}"
            ))),
        }
    }
}

/// Identity of the caller, passed explicitly to every operation that records
/// who performed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }

    /// Fails with `Forbidden` unless the actor holds the admin role.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "Actor {} is not allowed to perform this action",
                self.id
            )))
        }
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, ACTOR_ID_HEADER)
            .ok_or_else(|| ServiceError::Unauthorized("Missing actor identity".to_string()))?;
        let role = header_value(parts, ACTOR_ROLE_HEADER)
            .ok_or_else(|| ServiceError::Unauthorized("Missing actor role".to_string()))?
            .parse::<ActorRole>()?;

        Ok(Actor::new(id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Actor, ServiceError> {
        let (mut parts, _) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_actor_from_headers() {
        let request = Request::builder()
            .header(ACTOR_ID_HEADER, "emp-7")
            .header(ACTOR_ROLE_HEADER, "Employee")
            .body(())
            .unwrap();

        let actor = extract(request).await.unwrap();
        assert_eq!(actor, Actor::new("emp-7", ActorRole::Employee));
        assert!(!actor.is_admin());
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let request = Request::builder()
            .header(ACTOR_ROLE_HEADER, "admin")
            .body(())
            .unwrap();
        assert_matches!(extract(request).await, Err(ServiceError::Unauthorized(_)));

        let request = Request::builder()
            .header(ACTOR_ID_HEADER, "x")
            .header(ACTOR_ROLE_HEADER, "root")
            .body(())
            .unwrap();
        assert_matches!(extract(request).await, Err(ServiceError::Unauthorized(_)));
    }

    #[test]
    fn only_admins_pass_admin_check() {
        assert!(Actor::new("a", ActorRole::Admin).require_admin().is_ok());
        assert_matches!(
            Actor::new("o", ActorRole::Owner).require_admin(),
            Err(ServiceError::Forbidden(_))
        );
    }
}
