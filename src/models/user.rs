use serde::Serialize;

use crate::entity::user;

/// Public projection of an identity: `id`, `username`, and the ids of the
/// snippets it owns. The back-reference is a lookup convenience; the snippet
/// remains the owning side of the relationship. Credentials are never
/// serialized.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    /// User ID.
    #[schema(example = 42)]
    pub id: i32,
    /// Username.
    #[schema(example = "alice")]
    pub username: String,
    /// IDs of snippets owned by this user, in creation order.
    #[schema(example = json!([1, 5, 9]))]
    pub snippets: Vec<i32>,
}

impl UserResponse {
    pub fn from_model(u: user::Model, snippets: Vec<i32>) -> Self {
        Self {
            id: u.id,
            username: u.username,
            snippets,
        }
    }
}
