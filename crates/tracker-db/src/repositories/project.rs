//! PostgreSQL implementation of ProjectDirectory

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tracker_core::{Project, ProjectDirectory, ProjectId, RepoResult};

use crate::models::ProjectModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgProjectDirectory {
    pool: PgPool,
}

impl PgProjectDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a project. Projects are owned elsewhere; this exists for seeding.
    #[instrument(skip(self, project), fields(project_id = %project.id))]
    pub async fn create(&self, project: &Project) -> RepoResult<()> {
        sqlx::query("INSERT INTO projects (id, name, owner_id, status) VALUES ($1, $2, $3, $4)")
            .bind(project.id.into_inner())
            .bind(&project.name)
            .bind(project.owner_id.into_inner())
            .bind(project.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl ProjectDirectory for PgProjectDirectory {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let result = sqlx::query_as::<_, ProjectModel>(
            "SELECT id, name, owner_id, status FROM projects WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Project::try_from).transpose()
    }
}
