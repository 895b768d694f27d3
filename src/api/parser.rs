// src/api/parser.rs
//! Turns raw listing responses into blocks.
//!
//! A non-success status fails the whole response. A success body is
//! converted record by record, so one unreadable block becomes a
//! [`Block::Malformed`] instead of sinking its siblings.

use super::client::ApiResponse;
use super::types::{BlockBatch, RawBlockBatch};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{preview_body, AppError, NotionErrorCode};
use crate::model::{Block, BlockKind, CodeBlock, ImageBlock, ImageSource, MalformedBlock, RichTextSpan};
use notion_client::objects::error::Error as NotionError;
use serde::Deserialize;
use serde_json::Value;

/// Parses one response of `GET /blocks/{id}/children`.
pub fn parse_children_response(result: ApiResponse<String>) -> Result<BlockBatch, AppError> {
    if !result.status.is_success() {
        return Err(remote_fetch_error(&result));
    }

    let raw: RawBlockBatch = serde_json::from_str(&result.data).map_err(|e| {
        AppError::MalformedResponse(format!(
            "{} from {}: {}",
            e,
            result.url,
            preview_body(&result.data, ERROR_BODY_PREVIEW_LENGTH)
        ))
    })?;

    Ok(BlockBatch {
        results: raw.results.into_iter().map(convert_block).collect(),
        has_more: raw.has_more,
        next_cursor: raw.next_cursor,
    })
}

/// Builds the fatal error for a non-success listing response.
fn remote_fetch_error(result: &ApiResponse<String>) -> AppError {
    let code = serde_json::from_str::<NotionError>(&result.data)
        .map(|error| NotionErrorCode::from_api_response(&error.code))
        .unwrap_or_else(|_| NotionErrorCode::from_http_status(result.status.as_u16()));

    AppError::RemoteFetch {
        status: result.status,
        code,
        body: preview_body(&result.data, ERROR_BODY_PREVIEW_LENGTH),
    }
}

// ---------------------------------------------------------------------------
// Wire shapes of the payloads we read
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawSpan {
    #[serde(default)]
    text: Option<RawText>,
}

#[derive(Deserialize)]
struct RawText {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawTextPayload {
    #[serde(default)]
    rich_text: Vec<RawSpan>,
}

#[derive(Deserialize)]
struct RawCodePayload {
    #[serde(default)]
    rich_text: Vec<RawSpan>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Deserialize)]
struct RawImagePayload {
    #[serde(default)]
    file: Option<RawFile>,
    #[serde(default)]
    external: Option<RawExternal>,
}

#[derive(Deserialize)]
struct RawFile {
    url: String,
    #[serde(default)]
    expiry_time: Option<String>,
}

#[derive(Deserialize)]
struct RawExternal {
    url: String,
}

fn into_spans(raw: Vec<RawSpan>) -> Vec<RichTextSpan> {
    raw.into_iter()
        .map(|span| RichTextSpan {
            content: span.text.and_then(|t| t.content).unwrap_or_default(),
        })
        .collect()
}

/// Converts one result record into a block. Never fails.
pub fn convert_block(mut record: Value) -> Block {
    let id = record.get("id").and_then(Value::as_str).map(str::to_string);

    let Some(tag) = record.get("type").and_then(Value::as_str).map(str::to_string) else {
        return malformed(id, None, "record has no `type` tag".to_string());
    };

    let kind = BlockKind::from_tag(&tag);
    if let BlockKind::Other(tag) = kind {
        return Block::Other { tag };
    }

    let Some(payload) = record.get_mut(&tag).map(Value::take) else {
        return malformed(id, Some(tag.clone()), format!("missing `{}` payload", tag));
    };

    match decode_payload(&kind, payload) {
        Ok(block) => block,
        Err(reason) => malformed(id, Some(tag), reason),
    }
}

fn decode_payload(kind: &BlockKind, payload: Value) -> Result<Block, String> {
    match kind {
        BlockKind::Code => {
            let code: RawCodePayload = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            Ok(Block::Code(CodeBlock {
                rich_text: into_spans(code.rich_text),
                language: code.language,
            }))
        }
        BlockKind::Image => {
            let image: RawImagePayload = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            let source = match (image.file, image.external) {
                (Some(file), _) => ImageSource::File {
                    url: file.url,
                    expiry_time: file.expiry_time,
                },
                (None, Some(external)) => ImageSource::External { url: external.url },
                (None, None) => return Err("image has neither `file` nor `external`".to_string()),
            };
            Ok(Block::Image(ImageBlock { source }))
        }
        prose => {
            let text: RawTextPayload = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            Block::prose(prose, into_spans(text.rich_text))
                .ok_or_else(|| format!("`{}` is not a text-bearing kind", prose))
        }
    }
}

fn malformed(id: Option<String>, kind: Option<String>, reason: String) -> Block {
    let block = MalformedBlock { id, kind, reason };
    log::warn!("Skipping malformed {}", block);
    Block::Malformed(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn ok(body: Value) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::OK,
            url: "test_url".to_string(),
        }
    }

    #[test]
    fn error_bodies_become_remote_fetch_errors() {
        let result = ApiResponse {
            data: json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find block with ID: abc123",
                "request_id": "req_123"
            })
            .to_string(),
            status: StatusCode::NOT_FOUND,
            url: "test_url".to_string(),
        };

        match parse_children_response(result) {
            Err(AppError::RemoteFetch { status, code, body }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert!(body.contains("abc123"));
            }
            other => panic!("expected RemoteFetch, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_bodies_fall_back_to_the_status() {
        let result = ApiResponse {
            data: "<html>bad gateway</html>".to_string(),
            status: StatusCode::BAD_GATEWAY,
            url: "test_url".to_string(),
        };

        match parse_children_response(result) {
            Err(AppError::RemoteFetch { code, .. }) => {
                assert_eq!(code, NotionErrorCode::HttpStatus(502))
            }
            other => panic!("expected RemoteFetch, got {:?}", other),
        }
    }

    #[test]
    fn missing_envelope_fields_default_to_an_empty_final_page() {
        let batch = parse_children_response(ok(json!({ "object": "list" }))).unwrap();
        assert!(batch.results.is_empty());
        assert!(!batch.has_more);
        assert_eq!(batch.next_cursor, None);
    }

    #[test]
    fn non_json_success_bodies_are_malformed_responses() {
        let result = ApiResponse {
            data: "not json".to_string(),
            status: StatusCode::OK,
            url: "test_url".to_string(),
        };
        assert!(matches!(
            parse_children_response(result),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn spans_without_text_contribute_nothing() {
        let block = convert_block(json!({
            "type": "paragraph",
            "paragraph": { "rich_text": [
                { "type": "text", "text": { "content": "E = " } },
                { "type": "equation", "equation": { "expression": "mc^2" } },
                { "type": "text", "text": { "content": null } }
            ]}
        }));
        assert_eq!(block.rich_text().unwrap(), &[
            RichTextSpan::new("E = "),
            RichTextSpan::new(""),
            RichTextSpan::new(""),
        ]);
    }

    #[test]
    fn code_blocks_keep_their_language() {
        let block = convert_block(json!({
            "type": "code",
            "code": {
                "language": "rust",
                "rich_text": [{ "text": { "content": "fn main() {}" } }]
            }
        }));
        assert_eq!(
            block,
            Block::Code(CodeBlock {
                rich_text: vec![RichTextSpan::new("fn main() {}")],
                language: Some("rust".to_string()),
            })
        );
    }

    #[test]
    fn images_prefer_the_hosted_file() {
        let file = convert_block(json!({
            "type": "image",
            "image": { "type": "file", "file": { "url": "https://x/y.png", "expiry_time": "2024-01-01T00:00:00.000Z" } }
        }));
        assert_eq!(
            file.image(),
            Some(&ImageSource::File {
                url: "https://x/y.png".to_string(),
                expiry_time: Some("2024-01-01T00:00:00.000Z".to_string()),
            })
        );

        let external = convert_block(json!({
            "type": "image",
            "image": { "type": "external", "external": { "url": "https://cdn/z.png" } }
        }));
        assert_eq!(
            external.image(),
            Some(&ImageSource::External {
                url: "https://cdn/z.png".to_string()
            })
        );
    }

    #[test]
    fn unknown_kinds_are_kept_as_other() {
        let block = convert_block(json!({ "type": "divider", "divider": {} }));
        assert_eq!(block, Block::Other { tag: "divider".to_string() });
    }

    #[test]
    fn missing_payloads_are_malformed_not_fatal() {
        let block = convert_block(json!({ "id": "b1", "type": "heading_2" }));
        let malformed = block.as_malformed().expect("should be malformed");
        assert_eq!(malformed.id.as_deref(), Some("b1"));
        assert_eq!(malformed.kind.as_deref(), Some("heading_2"));

        let untyped = convert_block(json!({ "id": "b2" }));
        assert!(untyped.as_malformed().is_some());

        let bad_shape = convert_block(json!({ "type": "paragraph", "paragraph": { "rich_text": "oops" } }));
        assert!(bad_shape.as_malformed().is_some());

        let empty_image = convert_block(json!({ "type": "image", "image": { "caption": [] } }));
        assert!(empty_image.as_malformed().is_some());
    }

    #[test]
    fn one_bad_record_does_not_sink_the_batch() {
        let batch = parse_children_response(ok(json!({
            "object": "list",
            "results": [
                { "type": "paragraph", "paragraph": { "rich_text": [{ "text": { "content": "kept" } }] } },
                { "type": "bulleted_list_item" },
                { "type": "numbered_list_item", "numbered_list_item": { "rich_text": [] } }
            ],
            "has_more": true,
            "next_cursor": "cursor-2"
        })))
        .unwrap();

        assert_eq!(batch.results.len(), 3);
        assert!(batch.results[1].as_malformed().is_some());
        assert!(batch.has_more);
        assert_eq!(batch.next_cursor.as_deref(), Some("cursor-2"));
    }
}
