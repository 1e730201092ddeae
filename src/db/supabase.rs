// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase REST client (PostgREST over HTTPS).
//!
//! The managed API does its own pooling, so this is a thin authenticated
//! wrapper: filters are passed as PostgREST query parameters, exact counts
//! come back in the `Content-Range` header when requested via `Prefer`.

use crate::error::AppError;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

/// Authenticated handle to one Supabase project.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    service_key: String,
}

impl SupabaseClient {
    /// Create a client for a project. `project_url` is the project root
    /// (`https://xyz.supabase.co`), without the `/rest/v1` suffix.
    pub fn new(project_url: &str, service_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            service_key,
        }
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Fetch rows matching `params`, deserialized as `T`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let response = self.request(Method::GET, table).query(params).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch rows plus the exact number of rows the filter matches,
    /// ignoring `limit`/`offset`.
    pub async fn select_with_count<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<(Vec<T>, i64), AppError> {
        let response = self
            .request(Method::GET, table)
            .header("Prefer", "count=exact")
            .query(params)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        let total = content_range_total(&response)?;
        Ok((response.json().await?, total))
    }

    /// Exact row count without fetching any rows.
    pub async fn count(&self, table: &str, params: &[(&str, String)]) -> Result<i64, AppError> {
        let response = self
            .request(Method::HEAD, table)
            .header("Prefer", "count=exact")
            .query(params)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        content_range_total(&response)
    }

    /// Update matching rows, returning the updated representation.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<Vec<T>, AppError> {
        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(params)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Liveness probe against the REST root. Never errors.
    pub async fn probe(&self) -> bool {
        match self
            .http
            .get(&self.rest_url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn check_response(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::SupabaseApi(format!("{status}: {body}")))
    }
}

/// Total row count from a PostgREST `Content-Range` header (`0-49/123`).
fn content_range_total(response: &Response) -> Result<i64, AppError> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit('/').next())
        .and_then(|total| total.parse().ok())
        .ok_or_else(|| AppError::SupabaseApi("missing Content-Range total".to_string()))
}
