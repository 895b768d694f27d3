// tests/common/mod.rs
//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use notion_context::{
    parse_children_response, AppError, ApiResponse, BlockBatch, BlockSource, ChatModel,
    ChatRequest, ChildrenRequest, PageId,
};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const PAGE: &str = "550e8400e29b41d4a716446655440000";

pub fn page_id() -> PageId {
    PageId::parse(PAGE).expect("test page id should be valid")
}

/// Loads a listing fixture from `tests/fixtures/children/`.
pub fn fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/children/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path, e))
}

/// Serves scripted listing responses in order and records every request.
///
/// Bodies go through the real response parser, so these tests exercise the
/// same conversion as live traffic.
pub struct FixtureSource {
    responses: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<ChildrenRequest>>,
}

impl FixtureSource {
    pub fn new(responses: Vec<(StatusCode, String)>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serves the named fixtures, all with status 200.
    pub fn pages(names: &[&str]) -> Self {
        Self::new(
            names
                .iter()
                .map(|name| (StatusCode::OK, fixture(name)))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ChildrenRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl BlockSource for FixtureSource {
    async fn list_children(&self, request: ChildrenRequest) -> Result<BlockBatch, AppError> {
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::MalformedResponse("no scripted response left".to_string()))?;

        parse_children_response(ApiResponse {
            data: body,
            status,
            url: "fixture".to_string(),
        })
    }
}

/// Replies to chat requests from a script and records what it was asked.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, AppError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::MalformedResponse("model asked too often".to_string())))
    }
}
