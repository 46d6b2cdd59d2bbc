// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod envelope;
pub mod error;

pub use envelope::{ITEM_FIELDS, RawPage, TOTAL_FIELDS, unwrap_mutation, unwrap_page};
pub use error::{ApiError, UNKNOWN_ERROR, extract_error_message};

use anyhow::{Context, Result, bail};
use depot_app::{Entity, EntityKind, FormPayload, ListSource, Page, PageQuery, RowKey};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            token: None,
            http,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|error| ApiError::Decode {
            what: "request URL".to_owned(),
            message: format!("{raw}: {error}"),
        })
    }

    /// `GET {endpoint}?{filters}&page=P&pageSize=S`, unwrapped into rows and a total.
    pub fn fetch_raw_page(&self, kind: EntityKind, query: &PageQuery) -> Result<RawPage, ApiError> {
        let mut url = self.endpoint_url(kind.endpoint())?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        debug!(kind = kind.as_str(), %url, "list request");

        let body = self.execute(self.http.get(url.clone()), &url)?;
        let value: Value = serde_json::from_str(&body).map_err(|error| ApiError::Decode {
            what: format!("{} list", kind.label()),
            message: error.to_string(),
        })?;
        unwrap_page(value)
    }

    pub fn list_page<R: Entity>(&self, query: &PageQuery) -> Result<Page<R>, ApiError> {
        let raw = self.fetch_raw_page(R::KIND, query)?;
        let items = raw
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<R>(item).map_err(|error| ApiError::Decode {
                    what: format!("{} row {}", R::KIND.label(), index + 1),
                    message: error.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, raw.total))
    }

    pub fn create(&self, kind: EntityKind, body: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.endpoint_url(kind.endpoint())?;
        self.mutate(self.http.post(url.clone()).json(body), &url)
    }

    pub fn update(&self, kind: EntityKind, id: i64, body: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.resource_url(kind, &[&id.to_string()])?;
        self.mutate(self.http.put(url.clone()).json(body), &url)
    }

    pub fn delete(&self, kind: EntityKind, key: &RowKey) -> Result<Option<Value>, ApiError> {
        let url = self.resource_url(kind, &[key.as_str()])?;
        self.mutate(self.http.delete(url.clone()), &url)
    }

    /// `POST {endpoint}/{key}/{action}`, e.g. `confirm` on an ASN.
    pub fn action(
        &self,
        kind: EntityKind,
        key: &RowKey,
        action: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.resource_url(kind, &[key.as_str(), action])?;
        let request = self.http.post(url.clone());
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        self.mutate(request, &url)
    }

    /// The entity endpoint with one path segment per part. Natural keys may
    /// hold `/`, `?` or `#`, so each part is percent-encoded as a segment.
    pub fn resource_url(&self, kind: EntityKind, parts: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint_url(kind.endpoint())?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Decode {
                what: "request URL".to_owned(),
                message: format!("{} cannot take path segments", self.base_url),
            })?
            .pop_if_empty()
            .extend(parts);
        Ok(url)
    }

    /// Validates a form and sends it: create, update with `id`, or adjust.
    pub fn submit(&self, payload: &FormPayload, id: Option<i64>) -> Result<Option<Value>> {
        let body = payload.to_body()?;
        let kind = payload.kind().entity();
        let response = match (payload, id) {
            (FormPayload::Adjustment(input), _) => {
                self.action(kind, &input.key(), "adjust", Some(&body))?
            }
            (_, Some(id)) => self.update(kind, id, &body)?,
            (_, None) => self.create(kind, &body)?,
        };
        Ok(response)
    }

    fn mutate(&self, request: RequestBuilder, url: &Url) -> Result<Option<Value>, ApiError> {
        let body = self.execute(request, url)?;
        unwrap_mutation(&body).inspect_err(|error| {
            if error.is_rejected() {
                warn!(%url, "request refused: {error}");
            }
        })
    }

    fn execute(&self, request: RequestBuilder, url: &Url) -> Result<String, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().map_err(|source| connection_error(url, source))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|source| connection_error(url, source))?;
        if !status.is_success() {
            let message = extract_error_message(Some(status.as_u16()), &body);
            warn!(%url, status = status.as_u16(), "request failed: {message}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

impl<R: Entity> ListSource<R> for Client {
    fn fetch_page(&mut self, query: &PageQuery) -> Result<Page<R>> {
        Ok(self.list_page::<R>(query)?)
    }
}

fn connection_error(url: &Url, source: reqwest::Error) -> ApiError {
    let mut origin = url.clone();
    origin.set_query(None);
    ApiError::Transport {
        url: origin.to_string(),
        source,
    }
}
