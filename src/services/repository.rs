use sqlx::PgPool;
use uuid::Uuid;

use crate::schema::EventMessage;

#[async_trait::async_trait]
pub trait EventMessageRepository: Send + Sync {
    /// Insert the row, or overwrite every column of an existing row with the same id.
    async fn save(&self, message: &EventMessage) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<EventMessage>>;
    async fn count(&self) -> anyhow::Result<i64>;
}

pub struct PgEventMessageRepository {
    pool: PgPool,
}

impl PgEventMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EventMessageRepository for PgEventMessageRepository {
    async fn save(&self, message: &EventMessage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO event_messages (id, event_type, event_data, message_id, created, modified)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                event_type = EXCLUDED.event_type,
                event_data = EXCLUDED.event_data,
                message_id = EXCLUDED.message_id,
                created = EXCLUDED.created,
                modified = EXCLUDED.modified
            "#,
        )
        .bind(message.id)
        .bind(&message.event_type)
        .bind(&message.event_data)
        .bind(&message.message_id)
        .bind(message.created)
        .bind(message.modified)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<EventMessage>> {
        let row = sqlx::query_as::<_, EventMessage>(
            r#"
            SELECT id, event_type, event_data, message_id, created, modified
            FROM event_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
