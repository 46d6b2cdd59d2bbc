// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(AsnId);
entity_id!(LpnId);
entity_id!(InventoryId);
entity_id!(SkuId);
entity_id!(BrandId);
entity_id!(WarehouseId);
entity_id!(ZoneId);
entity_id!(LocationId);

/// Stable string identity of a table row within one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Primary key when present, natural key otherwise.
    pub fn derive(primary: Option<i64>, natural: &str) -> Self {
        match primary {
            Some(id) => Self(id.to_string()),
            None => Self(natural.to_owned()),
        }
    }

    /// Composite of two foreign keys, for line items without their own id.
    pub fn composite(left: Option<i64>, right: Option<i64>, natural: &str) -> Self {
        match (left, right) {
            (Some(left), Some(right)) => Self(format!("{left}-{right}")),
            _ => Self(natural.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
