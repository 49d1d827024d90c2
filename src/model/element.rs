use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named business resource that access rules attach to ("users",
/// "products", ...). Rules match on the element's exact name.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct BusinessElement {
    pub id: i64,
    pub name: String,
    pub description: String,
}
