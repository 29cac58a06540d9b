use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{
    ConnectionRequestFilter, ConnectionRequestStore, HangoutFilter, HangoutStore, Result,
    UserStore,
};
use crate::models::{ConnectionRequest, Hangout, HangoutStatus, RequestStatus, User};

const USER_COLUMNS: &str = "id, name, bio, profile_image_url, first_degree_friend_ids, \
    approved_second_degree_connections, created_at, updated_at";

const HANGOUT_COLUMNS: &str = "id, host_id, participants, accepted_by, rejected_by, \
    unreachable_participant_ids, activity_description, details, scheduled_at, status, \
    created_at, updated_at";

const REQUEST_COLUMNS: &str = "id, requester_id, requested_id, approver_id, hangout_id, status, \
    created_at, updated_at";

/// PostgreSQL-backed store. Friend lists and member sets are `UUID[]` columns.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove every row from the application tables.
    pub async fn wipe(&self) -> Result<()> {
        sqlx::query("TRUNCATE connection_requests, hangouts, users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

async fn insert_request_rows(conn: &mut PgConnection, requests: &[ConnectionRequest]) -> Result<()> {
    for request in requests {
        sqlx::query(
            r#"
            INSERT INTO connection_requests
                (id, requester_id, requested_id, approver_id, hangout_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id)
        .bind(request.requester_id)
        .bind(request.requested_id)
        .bind(request.approver_id)
        .bind(request.hangout_id)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, bio, profile_image_url, first_degree_friend_ids,
                 approved_second_degree_connections, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                bio = EXCLUDED.bio,
                profile_image_url = EXCLUDED.profile_image_url,
                first_degree_friend_ids = EXCLUDED.first_degree_friend_ids,
                updated_at = NOW()
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.profile_image_url)
        .bind(&user.first_degree_friend_ids)
        .bind(&user.approved_second_degree_connections)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_approved_connection(&self, requester_id: Uuid, requested_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET approved_second_degree_connections = array_append(approved_second_degree_connections, $2),
                updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(approved_second_degree_connections))
            "#,
        )
        .bind(requester_id)
        .bind(requested_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl HangoutStore for PgStore {
    async fn find_hangout(&self, id: Uuid) -> Result<Option<Hangout>> {
        let hangout = sqlx::query_as::<_, Hangout>(&format!("SELECT {HANGOUT_COLUMNS} FROM hangouts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hangout)
    }

    async fn find_hangouts(&self, filter: &HangoutFilter) -> Result<Vec<Hangout>> {
        let hangouts = sqlx::query_as::<_, Hangout>(&format!(
            r#"
            SELECT {HANGOUT_COLUMNS}
            FROM hangouts
            WHERE ($1::uuid IS NULL OR host_id = $1 OR $1 = ANY(participants))
            AND (NOT $2 OR status <> 'cancelled')
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.member_id)
        .bind(filter.exclude_cancelled)
        .fetch_all(&self.pool)
        .await?;

        Ok(hangouts)
    }

    async fn create_hangout(&self, hangout: &Hangout, requests: &[ConnectionRequest]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO hangouts
                (id, host_id, participants, accepted_by, rejected_by, unreachable_participant_ids,
                 activity_description, details, scheduled_at, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(hangout.id)
        .bind(hangout.host_id)
        .bind(&hangout.participants)
        .bind(&hangout.accepted_by)
        .bind(&hangout.rejected_by)
        .bind(&hangout.unreachable_participant_ids)
        .bind(&hangout.activity_description)
        .bind(&hangout.details)
        .bind(hangout.scheduled_at)
        .bind(hangout.status.as_str())
        .bind(hangout.created_at)
        .bind(hangout.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_request_rows(&mut *tx, requests).await?;

        // Dropping the transaction on any error above rolls both writes back.
        tx.commit().await?;

        Ok(())
    }

    async fn save_responses(&self, hangout: &Hangout) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE hangouts
            SET accepted_by = $2, rejected_by = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(hangout.id)
        .bind(&hangout.accepted_by)
        .bind(&hangout.rejected_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn confirm_hangout(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE hangouts
            SET status = 'confirmed', updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'pending_approval')
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn cancel_hangout(&self, id: Uuid, from: HangoutStatus) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query(
            r#"
            UPDATE hangouts
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .execute(&mut *tx)
        .await?;

        if cancelled.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let rejected = sqlx::query(
            r#"
            UPDATE connection_requests
            SET status = 'rejected', updated_at = NOW()
            WHERE hangout_id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(rejected.rows_affected()))
    }

    async fn transition_hangout(&self, id: Uuid, from: HangoutStatus, to: HangoutStatus) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE hangouts
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl ConnectionRequestStore for PgStore {
    async fn find_request(&self, id: Uuid) -> Result<Option<ConnectionRequest>> {
        let request = sqlx::query_as::<_, ConnectionRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_requests(&self, filter: &ConnectionRequestFilter) -> Result<Vec<ConnectionRequest>> {
        let requests = sqlx::query_as::<_, ConnectionRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM connection_requests
            WHERE ($1::uuid IS NULL OR id = $1)
            AND ($2::uuid IS NULL OR hangout_id = $2)
            AND ($3::uuid IS NULL OR approver_id = $3)
            AND ($4::text IS NULL OR status = $4)
            ORDER BY created_at ASC
            "#
        ))
        .bind(filter.id)
        .bind(filter.hangout_id)
        .bind(filter.approver_id)
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn count_pending(&self, hangout_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM connection_requests WHERE hangout_id = $1 AND status = 'pending'",
        )
        .bind(hangout_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_requests(&self, requests: &[ConnectionRequest]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_request_rows(&mut *tx, requests).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_request_status(&self, filter: &ConnectionRequestFilter, status: RequestStatus) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE connection_requests
            SET status = $5, updated_at = NOW()
            WHERE ($1::uuid IS NULL OR id = $1)
            AND ($2::uuid IS NULL OR hangout_id = $2)
            AND ($3::uuid IS NULL OR approver_id = $3)
            AND ($4::text IS NULL OR status = $4)
            "#,
        )
        .bind(filter.id)
        .bind(filter.hangout_id)
        .bind(filter.approver_id)
        .bind(filter.status.map(|status| status.as_str()))
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
