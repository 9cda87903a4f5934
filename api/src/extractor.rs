use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kernel::model::{auth::AccessToken, id::UserId, user::User};
use registry::AppRegistry;
use shared::error::AppError;

/// Bearer トークンを外部 ID プロバイダのセッションとして解決した
/// リクエスト主体。コア操作には必ずこの明示的な呼び出し元 ID を渡す。
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::UnauthenticatedError)?;
        let access_token = AccessToken(token.to_string());

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_current_user(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { access_token, user })
    }
}
