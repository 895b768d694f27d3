// src/api/client.rs
//! HTTP client for the Notion listing endpoint.
//!
//! Handles authentication and request/response plumbing; parsing lives in
//! [`super::parser`].

use super::types::{BlockBatch, ChildrenRequest};
use crate::config::ReaderConfig;
use crate::constants::NOTION_API_VERSION;
use crate::error::AppError;
use crate::types::{ApiKey, ValidatedUrl};
use reqwest::{header, Client, Response};

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: ValidatedUrl,
}

impl NotionHttpClient {
    /// Creates a client authenticated with the reader's token.
    pub fn new(config: &ReaderConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&config.api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        Ok(headers)
    }

    /// Makes a GET request to `endpoint` (relative to the base URL) with query parameters.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Response, AppError> {
        let url = self.base_url.join_endpoint(endpoint);
        log::debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;

        log::debug!("{} -> {}", endpoint, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::BlockSource for NotionHttpClient {
    async fn list_children(&self, request: ChildrenRequest) -> Result<BlockBatch, AppError> {
        let endpoint = format!("blocks/{}/children", request.page_id.to_hyphenated());
        let query = children_query(&request);
        let response = self.get(&endpoint, &query).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_children_response(result)
    }
}

/// Query parameters of a listing request; `start_cursor` only when resuming.
pub(crate) fn children_query(request: &ChildrenRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![("page_size", request.page_size.to_string())];
    if let Some(cursor) = &request.start_cursor {
        query.push(("start_cursor", cursor.clone()));
    }
    query
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with status and URL.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageId, PageSize};

    fn request(cursor: Option<&str>) -> ChildrenRequest {
        ChildrenRequest {
            page_id: PageId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            page_size: PageSize::new(50).unwrap(),
            start_cursor: cursor.map(str::to_string),
        }
    }

    #[test]
    fn first_request_carries_only_the_page_size() {
        assert_eq!(
            children_query(&request(None)),
            vec![("page_size", "50".to_string())]
        );
    }

    #[test]
    fn resumed_requests_carry_the_cursor() {
        assert_eq!(
            children_query(&request(Some("abc"))),
            vec![
                ("page_size", "50".to_string()),
                ("start_cursor", "abc".to_string())
            ]
        );
    }

    #[test]
    fn headers_carry_bearer_and_version() {
        let key = ApiKey::notion("secret_abcdefghijklmnopqrstuvwxyz").unwrap();
        let headers = NotionHttpClient::create_headers(&key).unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer secret_abcdefghijklmnopqrstuvwxyz"
        );
        assert_eq!(headers.get("Notion-Version").unwrap(), NOTION_API_VERSION);
    }
}
