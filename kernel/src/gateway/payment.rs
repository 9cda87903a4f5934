use crate::model::id::BookingId;
use async_trait::async_trait;
use shared::error::AppResult;

#[derive(Debug)]
pub struct PaymentIntent {
    pub intent_id: String,
    pub client_secret: String,
}

/// 外部決済ゲートウェイ。金額は最小通貨単位で渡す。
/// 呼び出しは失敗しうるので、失敗時は予約の状態を一切変更しないこと。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(
        &self,
        booking_id: BookingId,
        amount_minor: i64,
    ) -> AppResult<PaymentIntent>;
}
