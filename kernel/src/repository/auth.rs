use crate::model::{auth::AccessToken, id::UserId};
use async_trait::async_trait;
use shared::error::AppResult;

/// 認証は外部の ID プロバイダが担う。ここではプロバイダが払い出した
/// アクセストークンをユーザー ID に解決するだけ。
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>>;
}
