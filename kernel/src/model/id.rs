use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($id_type:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id_type(Uuid);

        impl $id_type {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn raw(self) -> Uuid {
                self.0
            }
        }

        impl Default for $id_type {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $id_type {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $id_type {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| AppError::ConversionEntityError(e.to_string()))
            }
        }

        impl std::fmt::Display for $id_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(FieldId);
define_id!(BookingId);
define_id!(UserId);
define_id!(DocumentId);
define_id!(ReviewId);
