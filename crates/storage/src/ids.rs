use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::ensure;
use uuid::Uuid;

use super::error::{InvalidIdSnafu, StorageError, StorageResult};

// Macro keeps all ID wrappers structurally identical, so the fixture ids and minted ids stay interchangeable.
macro_rules! define_storage_id {
    ($name:ident, $id_type:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn parse(raw: &str) -> StorageResult<Self> {
                let trimmed = raw.trim();
                ensure!(
                    !trimmed.is_empty(),
                    InvalidIdSnafu {
                        stage: "parse-storage-id",
                        id_type: $id_type,
                        raw: raw.to_string(),
                    }
                );
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = StorageError;

            fn from_str(raw: &str) -> StorageResult<Self> {
                Self::parse(raw)
            }
        }
    };
}

define_storage_id!(ChatId, "chat-id");
define_storage_id!(MessageId, "message-id");

impl MessageId {
    /// Mints a time-ordered identifier for a locally composed message.
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}
