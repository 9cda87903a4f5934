use crate::model::{
    availability::SlotOccupancy,
    booking::{
        event::{ConfirmPayment, CreateBooking, DeleteBooking, UpdateBookingStatus},
        settlement::SettlementUpdate,
        Booking, BookingStatus,
    },
    id::{BookingId, FieldId, UserId},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[derive(Debug, Default)]
pub struct BookingListOptions {
    pub status: Option<BookingStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 予約を作成する。フィールドの存在・active 確認と時間帯の重複確認を
    /// 同一トランザクション内で行い、さらにストレージ層の部分一意制約で
    /// 競合書き込みを排除する。
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // ユーザー自身の予約一覧（新しい順）
    async fn find_by_user(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<Vec<Booking>>;
    // フィールド + 日付の枠を占有している予約（rejected / cancelled 以外）
    async fn find_occupied_slots(
        &self,
        field_id: FieldId,
        date: NaiveDate,
    ) -> AppResult<Vec<SlotOccupancy>>;
    /// 現在の状態が `expected_current` のときだけ状態を更新する。
    async fn update_status(
        &self,
        event: UpdateBookingStatus,
        expected_current: BookingStatus,
    ) -> AppResult<()>;
    /// 決済確認の結果を pending ガード付きで適用する。
    async fn apply_settlement(
        &self,
        event: &ConfirmPayment,
        update: SettlementUpdate,
    ) -> AppResult<()>;
    // ゲートウェイの intent 作成後に取引参照を記録する
    async fn record_gateway_reference(
        &self,
        booking_id: BookingId,
        reference: String,
    ) -> AppResult<()>;
    // pending の予約のみ物理削除できる
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
    /// 保持時間を超えた未入金の pending 予約をキャンセルし、件数を返す。
    async fn expire_stale_pending(&self, older_than_minutes: i64) -> AppResult<u64>;
}
