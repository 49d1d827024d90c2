use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
}
