use async_trait::async_trait;
use shared::platform::Platform;
use sqlx::SqlitePool;
use trackbridge::{BridgeError, PlatformUser, UserDirectory};

/// A user who linked a streaming account. Rows are written by the account
/// linking flow; this service only reads them.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub platform: String,
    pub platform_id: String,
    pub token: String,
    pub username: String,
    pub created_at: String,
}

impl User {
    #[cfg(test)]
    pub(crate) async fn create(
        pool: &SqlitePool,
        platform: Platform,
        platform_id: &str,
        token: &str,
        username: &str,
    ) -> Result<User, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, platform, platform_id, token, username) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&id)
        .bind(platform.as_str())
        .bind(platform_id)
        .bind(token)
        .bind(username)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_platform_id(
        pool: &SqlitePool,
        platform_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE platform_id = ?")
            .bind(platform_id)
            .fetch_optional(pool)
            .await
    }
}

impl TryFrom<User> for PlatformUser {
    type Error = BridgeError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let platform = user
            .platform
            .parse::<Platform>()
            .map_err(|e| BridgeError::Storage(format!("user {}: {}", user.id, e)))?;

        Ok(PlatformUser {
            platform_id: user.platform_id,
            platform,
            token: user.token,
            username: user.username,
        })
    }
}

/// `UserDirectory` backed by the `users` table.
#[derive(Clone)]
pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn find_user_by_platform_id(
        &self,
        platform_id: &str,
    ) -> Result<Option<PlatformUser>, BridgeError> {
        User::find_by_platform_id(&self.pool, platform_id)
            .await
            .map_err(|e| BridgeError::Storage(e.to_string()))?
            .map(PlatformUser::try_from)
            .transpose()
    }
}
