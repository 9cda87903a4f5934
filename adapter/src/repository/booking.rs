use crate::database::{
    model::{
        booking::{BookingRow, OccupiedSlotRow},
        field::FieldGuardRow,
    },
    ConnectionPool,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::model::{
    availability::SlotOccupancy,
    booking::{
        event::{ConfirmPayment, CreateBooking, DeleteBooking, UpdateBookingStatus},
        settlement::SettlementUpdate,
        Booking, BookingAmount, BookingStatus, PaymentStatus,
    },
    id::{BookingId, FieldId, UserId},
};
use kernel::repository::booking::{BookingListOptions, BookingRepository};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

// SERIALIZABLE トランザクションの敗者が受け取る SQLSTATE
const SERIALIZATION_FAILURE: &str = "40001";

/// 並行予約に負けたことを示すエラーを SlotConflict に寄せる。
/// 部分一意インデックス違反と直列化失敗（40001）はどちらも
/// 同じ時間帯を狙う別リクエストが先に確定したことを意味し、
/// 呼び出し側はリトライ可能な 409 を受け取るべき。
fn map_contention_error(e: sqlx::Error, fallback: fn(sqlx::Error) -> AppError) -> AppError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.code().as_deref() == Some(SERIALIZATION_FAILURE) =>
        {
            AppError::SlotConflict("指定時間帯にはすでに予約が存在します。".into())
        }
        _ => fallback(e),
    }
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のフィールド ID をもつフィールドが存在し、active であるか
        // - 希望の時間帯が既存予約と重なっていないか
        //
        // このチェックは read-then-write であり、同一区間を狙う並行
        // リクエスト同士の競合はここでは検出しきれない。最終的な安全網は
        // bookings の部分一意インデックスで、敗者には SlotConflict を返す。
        let price_per_hour = {
            //
            // ① フィールドの存在確認 ＋ status チェック
            //
            let field_row: Option<FieldGuardRow> = sqlx::query_as(
                r#"
                SELECT field_id, status, price_per_hour
                FROM fields
                WHERE field_id = $1
                "#,
            )
            .bind(event.field_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_contention_error(e, AppError::SpecificOperationError))?;

            let field = match field_row {
                None => {
                    return Err(AppError::EntityNotFound(format!(
                        "フィールド（{}）が見つかりませんでした。",
                        event.field_id
                    )))
                }
                Some(f) => f,
            };

            if !field.status.is_bookable() {
                return Err(AppError::UnprocessableEntity(format!(
                    "フィールド（{}）は現在予約を受け付けていません（status = {}）",
                    event.field_id, field.status
                )));
            }

            //
            // ② 希望予約時間帯が既存予約と重なっていないか確認
            //    重複条件（半開区間）：
            //        existing.start < new.end AND new.start < existing.end
            //    rejected / cancelled は枠を解放しているので除外する
            //
            let overlap: Option<(BookingId,)> = sqlx::query_as(
                r#"
                SELECT booking_id
                FROM bookings
                WHERE field_id = $1
                  AND slot_date = $2
                  AND start_time < $4
                  AND $3 < end_time
                  AND status NOT IN ('rejected', 'cancelled')
                LIMIT 1
                "#,
            )
            .bind(event.field_id)
            .bind(event.slot.date)
            .bind(event.slot.start_time)
            .bind(event.slot.end_time)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_contention_error(e, AppError::SpecificOperationError))?;

            if overlap.is_some() {
                return Err(AppError::SlotConflict(format!(
                    "フィールド（{}）は指定時間帯にすでに予約が存在します。",
                    event.field_id
                )));
            }

            field.price_per_hour
        };

        // 金額はフィールドの時間単価から導出し、リクエスト値は信用しない
        let amount = BookingAmount::calculate(price_per_hour, &event.slot, event.payment_method);

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO bookings
            (booking_id, field_id, user_id, slot_date, start_time, end_time,
             status, payment_method, payment_status,
             amount_total, amount_deposit, amount_remaining, notes)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, 'pending', $8, $9, $10, $11)
            "#,
        )
        .bind(booking_id)
        .bind(event.field_id)
        .bind(event.booked_by)
        .bind(event.slot.date)
        .bind(event.slot.start_time)
        .bind(event.slot.end_time)
        .bind(event.payment_method)
        .bind(amount.total)
        .bind(amount.deposit)
        .bind(amount.remaining)
        .bind(event.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_contention_error(e, AppError::SpecificOperationError))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        // SSI の競合検出はコミット時まで遅延しうる
        tx.commit()
            .await
            .map_err(|e| map_contention_error(e, AppError::TransactionError))?;

        Ok(booking_id)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT
                booking_id, field_id, user_id,
                slot_date, start_time, end_time,
                status, payment_method, payment_status,
                amount_total, amount_deposit, amount_remaining,
                payment_proof, gateway_reference, notes,
                created_at, updated_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Booking::from))
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT
                booking_id, field_id, user_id,
                slot_date, start_time, end_time,
                status, payment_method, payment_status,
                amount_total, amount_deposit, amount_remaining,
                payment_proof, gateway_reference, notes,
                created_at, updated_at
            FROM bookings
            WHERE user_id = $1
              AND ($2::booking_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(options.status)
        .bind(options.limit)
        .bind(options.offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_occupied_slots(
        &self,
        field_id: FieldId,
        date: NaiveDate,
    ) -> AppResult<Vec<SlotOccupancy>> {
        let rows: Vec<OccupiedSlotRow> = sqlx::query_as(
            r#"
            SELECT slot_date, start_time, end_time, status
            FROM bookings
            WHERE field_id = $1
              AND slot_date = $2
              AND status NOT IN ('rejected', 'cancelled')
            ORDER BY start_time ASC
            "#,
        )
        .bind(field_id)
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(SlotOccupancy::from).collect())
    }

    async fn update_status(
        &self,
        event: UpdateBookingStatus,
        expected_current: BookingStatus,
    ) -> AppResult<()> {
        // 呼び出し側が検証した時点の状態をガードに含め、
        // 並行更新が挟まった場合は適用しない
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $3,
                notes = notes || COALESCE($4, ''),
                updated_at = now()
            WHERE booking_id = $1 AND status = $2
            "#,
        )
        .bind(event.booking_id)
        .bind(expected_current)
        .bind(event.new_status)
        .bind(event.note)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::InvalidTransition(
                "予約の状態が変更されていたため、更新を適用できませんでした。".into(),
            ));
        }

        Ok(())
    }

    async fn apply_settlement(
        &self,
        event: &ConfirmPayment,
        update: SettlementUpdate,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET payment_status = $2,
                status = $3,
                payment_proof = COALESCE($4, payment_proof),
                gateway_reference = COALESCE($5, gateway_reference),
                notes = notes || $6,
                settled_at = now(),
                updated_at = now()
            WHERE booking_id = $1 AND status = 'pending'
            "#,
        )
        .bind(event.booking_id)
        .bind(update.payment_status)
        .bind(update.status)
        .bind(update.payment_proof)
        .bind(update.gateway_reference)
        .bind(update.note)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::InvalidTransition(
                "booking must be pending to process payment".into(),
            ));
        }

        Ok(())
    }

    async fn record_gateway_reference(
        &self,
        booking_id: BookingId,
        reference: String,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET gateway_reference = $2, updated_at = now()
            WHERE booking_id = $1
              AND status = 'pending'
              AND payment_status = 'pending'
            "#,
        )
        .bind(booking_id)
        .bind(reference)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::InvalidTransition(
                "booking is not available for payment".into(),
            ));
        }

        Ok(())
    }

    // 予約の物理削除。pending の間だけ許される
    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row: Option<(UserId, BookingStatus)> = sqlx::query_as(
            r#"
            SELECT user_id, status
            FROM bookings
            WHERE booking_id = $1
            FOR UPDATE
            "#,
        )
        .bind(event.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some((owner, status)) = row else {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.booking_id
            )));
        };

        if owner != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "他のユーザーの予約は削除できません。".into(),
            ));
        }

        if status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(
                "pending の予約のみ削除できます。".into(),
            ));
        }

        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(event.booking_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // 保持時間を過ぎても未入金の pending 予約を解放する。
    // 現金や銀行振込の確認が一度でも適用された予約（settled_at 記録済み）は
    // payment_status が pending のままでも管理側の検証待ちなので対象外。
    async fn expire_stale_pending(&self, older_than_minutes: i64) -> AppResult<u64> {
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                notes = notes || E'\nAutomatically released: payment hold expired.',
                updated_at = now()
            WHERE status = 'pending'
              AND payment_status = $1
              AND payment_proof IS NULL
              AND settled_at IS NULL
              AND created_at < now() - ($2 * interval '1 minute')
            "#,
        )
        .bind(PaymentStatus::Pending)
        .bind(older_than_minutes)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected())
    }
}

impl BookingRepositoryImpl {
    // create でのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "SQLSTATE {}", self.code)
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code }))
    }

    #[test]
    fn serialization_failure_becomes_slot_conflict() {
        // SSI で負けた側は INSERT・COMMIT いずれで abort しても 409 相当になる
        let at_insert =
            map_contention_error(db_error("40001"), AppError::SpecificOperationError);
        assert!(matches!(at_insert, AppError::SlotConflict(_)));

        let at_commit = map_contention_error(db_error("40001"), AppError::TransactionError);
        assert!(matches!(at_commit, AppError::SlotConflict(_)));
    }

    #[test]
    fn unique_violation_becomes_slot_conflict() {
        let err = map_contention_error(db_error("23505"), AppError::SpecificOperationError);
        assert!(matches!(err, AppError::SlotConflict(_)));
    }

    #[test]
    fn unrelated_database_errors_keep_the_fallback() {
        let err = map_contention_error(db_error("23503"), AppError::SpecificOperationError);
        assert!(matches!(err, AppError::SpecificOperationError(_)));

        let err = map_contention_error(sqlx::Error::RowNotFound, AppError::TransactionError);
        assert!(matches!(err, AppError::TransactionError(_)));
    }
}
