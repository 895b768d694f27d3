// src/pipeline.rs
//! Capability traits for the three stages a run goes through: read the page,
//! answer from it, deliver the result.
//!
//! Each stage can be swapped out on its own, which is how the binary's flows
//! are tested without a network.

use crate::assistant::{Answer, Assistant};
use crate::error::AppError;
use crate::output::{deliver, OutputPlan, OutputReport};
use crate::reader::{PageContent, PageContentReader};
use crate::types::PageId;

/// Retrieves a page's content.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, page_id: &PageId) -> Result<PageContent, AppError>;
}

/// Answers a question from page content.
#[async_trait::async_trait]
pub trait AnswerComposer: Send + Sync {
    async fn compose(&self, query: &str, content: &PageContent) -> Result<Answer, AppError>;
}

/// Sends rendered output to its destinations.
pub trait ResultDelivery {
    fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError>;
}

#[async_trait::async_trait]
impl ContentSource for PageContentReader {
    async fn fetch(&self, page_id: &PageId) -> Result<PageContent, AppError> {
        self.read(page_id).await
    }
}

#[async_trait::async_trait]
impl AnswerComposer for Assistant {
    async fn compose(&self, query: &str, content: &PageContent) -> Result<Answer, AppError> {
        self.answer(query, content).await
    }
}

/// Delivers to the local terminal and filesystem, failing if any target failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDelivery;

impl ResultDelivery for LocalDelivery {
    fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError> {
        let report = deliver(plan);
        match report.failed.first() {
            None => Ok(report),
            Some(first) => Err(AppError::Io(std::io::Error::other(format!(
                "{} of {} outputs failed: {}",
                report.failed.len(),
                report.failed.len() + report.completed.len(),
                first.error
            )))),
        }
    }
}

/// Reads the page once and answers `query` from it.
pub async fn answer_query(
    source: &dyn ContentSource,
    composer: &dyn AnswerComposer,
    page_id: &PageId,
    query: &str,
) -> Result<Answer, AppError> {
    let content = source.fetch(page_id).await?;
    composer.compose(query, &content).await
}
