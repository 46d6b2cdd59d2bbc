// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Choice(String),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice(value.into())
    }

    /// Typed input as trimmed text, digits and signs kept as entered.
    /// Blank input is unset.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::Text(trimmed.to_owned()))
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Text(value) | Self::Choice(value) => value.trim().parse::<i64>().is_ok(),
        }
    }

    /// Empty strings mean "unset".
    pub fn normalized(self) -> Option<Self> {
        match self {
            Self::Text(value) | Self::Choice(value) if value.trim().is_empty() => None,
            Self::Text(value) => Some(Self::Text(value.trim().to_owned())),
            Self::Choice(value) => Some(Self::Choice(value.trim().to_owned())),
            Self::Int(value) => Some(Self::Int(value)),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) | Self::Choice(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

/// Set filters only; unset values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: Option<FilterValue>) {
        match value.and_then(FilterValue::normalized) {
            Some(value) => {
                self.values.insert(name.to_owned(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
