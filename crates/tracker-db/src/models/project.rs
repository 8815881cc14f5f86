use sqlx::FromRow;
use uuid::Uuid;

/// Database model for projects table
#[derive(Debug, Clone, FromRow)]
pub struct ProjectModel {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub status: String,
}
