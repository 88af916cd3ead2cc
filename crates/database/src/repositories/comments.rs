use crate::error::{DatabaseError, Result};
use sqlx::PgPool;
use tigger_models::{Comment, CreateComment};
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author: &str, request: &CreateComment) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, content, author, created_by)
            VALUES ($1, $2, $3, $3)
            RETURNING *
            "#,
        )
        .bind(request.task_id)
        .bind(&request.content)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments of a task, oldest first
    pub async fn list_for_task(&self, task_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE task_id = $1 ORDER BY created_at ASC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Get a comment whose task belongs to a project of the organization
    pub async fn get_in_org(&self, org_id: &str, comment_id: Uuid) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.*
            FROM comments c
            JOIN tasks t ON t.id = c.task_id
            JOIN projects p ON p.project_id = t.project_id
            WHERE c.id = $1 AND p.org_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Comment", &comment_id.to_string()))
    }

    pub async fn update_content(&self, comment_id: Uuid, content: &str) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(comment_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Comment", &comment_id.to_string()))
    }

    pub async fn delete(&self, comment_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Comment", &comment_id.to_string()));
        }
        Ok(())
    }
}
