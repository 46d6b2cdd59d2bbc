// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Map, Value};

use crate::error::{ApiError, UNKNOWN_ERROR};

/// Fields that may hold the row array, in priority order.
pub const ITEM_FIELDS: &[&str] = &["items", "data", "result", "value", "content"];
/// Fields that may hold the unpaged row count, in priority order.
pub const TOTAL_FIELDS: &[&str] = &["total", "totalCount", "totalRecords"];

#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub items: Vec<Value>,
    pub total: Option<usize>,
}

/// Finds the rows and total in a list response of any supported shape.
pub fn unwrap_page(body: Value) -> Result<RawPage, ApiError> {
    reject_if_unsuccessful(&body)?;
    find_rows(body, 0).ok_or_else(|| ApiError::Decode {
        what: "list response".to_owned(),
        message: format!("no row array under any of: {}", ITEM_FIELDS.join(", ")),
    })
}

fn find_rows(body: Value, depth: usize) -> Option<RawPage> {
    match body {
        Value::Array(items) => Some(RawPage { items, total: None }),
        Value::Object(mut fields) => {
            let outer_total = total_of(&fields);
            for name in ITEM_FIELDS {
                match fields.remove(*name) {
                    Some(Value::Array(items)) => {
                        return Some(RawPage {
                            items,
                            total: outer_total,
                        });
                    }
                    Some(inner @ Value::Object(_)) if depth == 0 => {
                        if let Some(page) = find_rows(inner, depth + 1) {
                            return Some(RawPage {
                                total: page.total.or(outer_total),
                                items: page.items,
                            });
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

fn total_of(fields: &Map<String, Value>) -> Option<usize> {
    TOTAL_FIELDS.iter().find_map(|name| match fields.get(*name)? {
        Value::Number(number) => number.as_u64().map(|total| total as usize),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Unwraps a mutation response body. Empty and non-JSON bodies are success;
/// `isSuccess: false` is a refusal even on HTTP 200.
pub fn unwrap_mutation(body: &str) -> Result<Option<Value>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Ok(None);
    };
    reject_if_unsuccessful(&value)?;
    match value {
        Value::Object(mut fields) if fields.contains_key("isSuccess") => {
            Ok(fields.remove("data").filter(|data| !data.is_null()))
        }
        other => Ok(Some(other)),
    }
}

fn reject_if_unsuccessful(value: &Value) -> Result<(), ApiError> {
    let Value::Object(fields) = value else {
        return Ok(());
    };
    if fields.get("isSuccess").and_then(Value::as_bool) != Some(false) {
        return Ok(());
    }
    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_owned();
    let code = fields.get("code").and_then(|code| match code {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    });
    Err(ApiError::Rejected { code, message })
}
