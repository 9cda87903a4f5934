use crate::redis::RedisClient;
use async_trait::async_trait;
use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use std::{str::FromStr, sync::Arc};
use uuid::Uuid;

/// 外部の ID プロバイダが払い出したセッションを Redis で解決する。
/// キーは `session:<token>`、値はユーザー ID の UUID 文字列。
pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
    ttl: u64,
}

impl AuthRepositoryImpl {
    pub fn new(kv: Arc<RedisClient>, ttl: u64) -> Self {
        Self { kv, ttl }
    }

    fn session_key(token: &AccessToken) -> String {
        format!("session:{}", token.0)
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key = Self::session_key(access_token);
        let Some(value) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        // 参照のたびに TTL を延長するスライディングセッション
        self.kv.set_ex(&key, &value, self.ttl).await?;

        let user_id = Uuid::from_str(&value)
            .map(UserId::from)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Some(user_id))
    }
}
