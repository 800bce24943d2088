//! Protected user endpoint.

use axum::Json;
use serde::Serialize;
use wicket_core::UserId;

use crate::auth::RequireUser;

/// View of the authenticated user returned by `GET /user`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    user_id: UserId,
    email: String,
    user_name: String,
    picture: String,
}

/// Returns the authenticated user's record from the session snapshot.
pub async fn current_user(RequireUser(user): RequireUser) -> Json<UserInfo> {
    Json(UserInfo {
        user_id: user.id(),
        email: user.email().to_string(),
        user_name: user.name().to_string(),
        picture: user.picture().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_identity::User;

    #[tokio::test]
    async fn response_shape_matches_wire_format() {
        let user = User::new(
            UserId::from_i64(1),
            "ext-1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            String::new(),
        );

        let Json(info) = current_user(RequireUser(user)).await;
        let json = serde_json::to_value(&info).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "user_id": 1,
                "email": "ada@example.com",
                "user_name": "Ada",
                "picture": "",
            })
        );
    }
}
