use crate::model::{
    booking::{event::ConfirmPayment, Booking, BookingStatus, PaymentMethod, PaymentStatus},
    document::{Document, DocumentKind},
    id::DocumentId,
};
use shared::error::{AppError, AppResult};

/// 決済確認を適用した結果として予約に書き込む内容。
#[derive(Debug, PartialEq, Eq)]
pub struct SettlementUpdate {
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub payment_proof: Option<DocumentId>,
    pub gateway_reference: Option<String>,
    pub note: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Settlement {
    Applied(SettlementUpdate),
    /// 同じゲートウェイ取引参照による再送。状態遷移は発生させない。
    AlreadyProcessed,
}

/// 決済確認の判定本体。純粋関数であり、書き込みは adapter 側が
/// pending ガード付きの単一 UPDATE で適用する。
///
/// カード決済のみがゲートウェイを信頼の基点として status を
/// approved まで自動で進められる。現金・銀行振込は管理側の確認を
/// 待つため pending のまま。
pub fn settle(
    booking: &Booking,
    confirmation: &ConfirmPayment,
    proof: Option<&Document>,
) -> AppResult<Settlement> {
    if confirmation.payment_method != booking.payment_method {
        return Err(AppError::UnprocessableEntity(
            "payment method does not match the booking".into(),
        ));
    }

    // 冪等性: 記録済みの取引参照と同じカード確認は再処理しない
    if confirmation.payment_method == PaymentMethod::Card
        && booking.payment_status == PaymentStatus::Paid
        && booking.gateway_reference.as_deref() == confirmation.gateway_reference.as_deref()
        && booking.gateway_reference.is_some()
    {
        return Ok(Settlement::AlreadyProcessed);
    }

    if booking.status != BookingStatus::Pending {
        return Err(AppError::InvalidTransition(
            "booking must be pending to process payment".into(),
        ));
    }

    if confirmation.amount != booking.amount.total {
        return Err(AppError::InvalidTransition(
            "payment amount does not match booking total".into(),
        ));
    }

    let mut update = match confirmation.payment_method {
        PaymentMethod::Cash => SettlementUpdate {
            payment_status: PaymentStatus::Pending,
            status: BookingStatus::Pending,
            payment_proof: None,
            gateway_reference: None,
            note: "\nCash payment selected. Payment will be collected at venue.".into(),
        },
        PaymentMethod::BankTransfer => {
            let Some(proof_id) = confirmation.payment_proof else {
                return Err(AppError::UnprocessableEntity(
                    "payment proof is required for bank transfer".into(),
                ));
            };
            let valid = proof.is_some_and(|doc| {
                doc.document_id == proof_id
                    && doc.kind == DocumentKind::PaymentProof
                    && doc.owned_by == booking.booked_by
                    && doc.booking_id == Some(booking.booking_id)
            });
            if !valid {
                return Err(AppError::UnprocessableEntity(
                    "invalid payment proof document".into(),
                ));
            }
            SettlementUpdate {
                payment_status: PaymentStatus::Pending,
                status: BookingStatus::Pending,
                payment_proof: Some(proof_id),
                gateway_reference: None,
                note: format!(
                    "\nBank transfer proof uploaded: {}",
                    proof.map(|d| d.file_name.as_str()).unwrap_or_default()
                ),
            }
        }
        PaymentMethod::Card => {
            let Some(reference) = confirmation.gateway_reference.clone() else {
                return Err(AppError::UnprocessableEntity(
                    "transaction reference is required for card payments".into(),
                ));
            };
            SettlementUpdate {
                payment_status: PaymentStatus::Paid,
                status: BookingStatus::Approved,
                payment_proof: None,
                gateway_reference: Some(reference.clone()),
                note: format!("\nCard payment captured. Transaction ID: {reference}"),
            }
        }
    };

    if let Some(notes) = &confirmation.notes {
        update.note.push_str(&format!("\nCustomer notes: {notes}"));
    }

    Ok(Settlement::Applied(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        booking::BookingAmount,
        id::{BookingId, FieldId, UserId},
        slot::TimeSlot,
    };
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal_macros::dec;

    fn booking(method: PaymentMethod) -> Booking {
        let slot = TimeSlot::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        );
        Booking {
            booking_id: BookingId::new(),
            field_id: FieldId::new(),
            booked_by: UserId::new(),
            slot,
            status: BookingStatus::Pending,
            payment_method: method,
            payment_status: PaymentStatus::Pending,
            amount: BookingAmount::calculate(dec!(50), &slot, method),
            payment_proof: None,
            gateway_reference: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn confirmation(booking: &Booking) -> ConfirmPayment {
        ConfirmPayment::new(
            booking.booking_id,
            booking.booked_by,
            booking.payment_method,
            booking.amount.total,
            None,
            None,
            None,
        )
    }

    fn proof_for(booking: &Booking) -> Document {
        Document {
            document_id: DocumentId::new(),
            owned_by: booking.booked_by,
            booking_id: Some(booking.booking_id),
            kind: DocumentKind::PaymentProof,
            file_name: "transfer.pdf".into(),
        }
    }

    #[test]
    fn cash_confirmation_keeps_booking_pending() {
        let booking = booking(PaymentMethod::Cash);
        let result = settle(&booking, &confirmation(&booking), None).unwrap();
        let Settlement::Applied(update) = result else {
            panic!("expected applied settlement");
        };
        assert_eq!(update.status, BookingStatus::Pending);
        assert_eq!(update.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn bank_transfer_requires_valid_proof() {
        let booking = booking(PaymentMethod::BankTransfer);
        let mut conf = confirmation(&booking);

        // 証明書なし
        assert!(matches!(
            settle(&booking, &conf, None),
            Err(AppError::UnprocessableEntity(_))
        ));

        // 他人の証明書
        let mut foreign = proof_for(&booking);
        foreign.owned_by = UserId::new();
        conf.payment_proof = Some(foreign.document_id);
        assert!(matches!(
            settle(&booking, &conf, Some(&foreign)),
            Err(AppError::UnprocessableEntity(_))
        ));

        // 正しい証明書なら pending のまま受理し proof を記録
        let proof = proof_for(&booking);
        conf.payment_proof = Some(proof.document_id);
        let Settlement::Applied(update) = settle(&booking, &conf, Some(&proof)).unwrap() else {
            panic!("expected applied settlement");
        };
        assert_eq!(update.status, BookingStatus::Pending);
        assert_eq!(update.payment_status, PaymentStatus::Pending);
        assert_eq!(update.payment_proof, Some(proof.document_id));
    }

    #[test]
    fn proof_scoped_to_another_booking_is_rejected() {
        let booking = booking(PaymentMethod::BankTransfer);
        let mut proof = proof_for(&booking);
        proof.booking_id = Some(BookingId::new());
        let mut conf = confirmation(&booking);
        conf.payment_proof = Some(proof.document_id);
        assert!(settle(&booking, &conf, Some(&proof)).is_err());
    }

    #[test]
    fn card_capture_approves_and_marks_paid() {
        let booking = booking(PaymentMethod::Card);
        let mut conf = confirmation(&booking);
        conf.gateway_reference = Some("pi_123".into());
        let Settlement::Applied(update) = settle(&booking, &conf, None).unwrap() else {
            panic!("expected applied settlement");
        };
        assert_eq!(update.status, BookingStatus::Approved);
        assert_eq!(update.payment_status, PaymentStatus::Paid);
        assert_eq!(update.gateway_reference.as_deref(), Some("pi_123"));
    }

    #[test]
    fn repeated_card_capture_with_same_reference_is_noop() {
        let mut booking = booking(PaymentMethod::Card);
        booking.status = BookingStatus::Approved;
        booking.payment_status = PaymentStatus::Paid;
        booking.gateway_reference = Some("pi_123".into());

        let mut conf = confirmation(&booking);
        conf.gateway_reference = Some("pi_123".into());
        assert_eq!(
            settle(&booking, &conf, None).unwrap(),
            Settlement::AlreadyProcessed
        );

        // 別の取引参照での再確認は遷移エラー
        conf.gateway_reference = Some("pi_456".into());
        assert!(matches!(
            settle(&booking, &conf, None),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn manual_confirmations_are_recorded_settlements() {
        // 現金・振込の確認は payment_status が pending のままでも
        // Applied として記録され、保持期限切れの自動解放から外れる
        let cash = booking(PaymentMethod::Cash);
        assert!(matches!(
            settle(&cash, &confirmation(&cash), None).unwrap(),
            Settlement::Applied(_)
        ));

        let transfer = booking(PaymentMethod::BankTransfer);
        let proof = proof_for(&transfer);
        let mut conf = confirmation(&transfer);
        conf.payment_proof = Some(proof.document_id);
        let Settlement::Applied(update) = settle(&transfer, &conf, Some(&proof)).unwrap() else {
            panic!("expected applied settlement");
        };
        assert_eq!(update.payment_status, PaymentStatus::Pending);
        assert_eq!(update.payment_proof, Some(proof.document_id));
    }

    #[test]
    fn amount_mismatch_is_rejected() {
        let booking = booking(PaymentMethod::Cash);
        let mut conf = confirmation(&booking);
        conf.amount = dec!(49);
        assert!(matches!(
            settle(&booking, &conf, None),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn non_pending_booking_rejects_confirmation() {
        let mut booking = booking(PaymentMethod::Cash);
        booking.status = BookingStatus::Cancelled;
        assert!(matches!(
            settle(&booking, &confirmation(&booking), None),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn method_mismatch_is_rejected() {
        let booking = booking(PaymentMethod::Cash);
        let mut conf = confirmation(&booking);
        conf.payment_method = PaymentMethod::Card;
        conf.gateway_reference = Some("pi_123".into());
        assert!(matches!(
            settle(&booking, &conf, None),
            Err(AppError::UnprocessableEntity(_))
        ));
    }
}
