//! Body decoders for common content types.

use async_trait::async_trait;

use super::{Processed, ResponseProcessor};
use crate::config::{JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
use crate::error_handling::ProcessorError;
use crate::response::{ParsedBody, Response};

fn non_empty_body(response: &Response) -> Option<&[u8]> {
    response.body.as_deref().filter(|body| !body.is_empty())
}

/// Decodes JSON bodies into [`ParsedBody::Json`].
///
/// A missing or empty body is passed through without error. Invalid JSON
/// yields [`ProcessorError::Decode`] and the unmodified response.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResponseProcessor;

#[async_trait]
impl ResponseProcessor for JsonResponseProcessor {
    async fn process(&self, response: Response) -> Processed {
        let Some(body) = non_empty_body(&response) else {
            return Processed::ok(response);
        };
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => Processed::ok(response.with_parsed_body(Some(ParsedBody::Json(value)))),
            Err(source) => Processed::failed(
                response,
                ProcessorError::Decode {
                    content_type: JSON_CONTENT_TYPE.to_string(),
                    source,
                },
            ),
        }
    }
}

/// Decodes UTF-8 bodies into [`ParsedBody::Text`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TextResponseProcessor;

#[async_trait]
impl ResponseProcessor for TextResponseProcessor {
    async fn process(&self, response: Response) -> Processed {
        let Some(body) = non_empty_body(&response) else {
            return Processed::ok(response);
        };
        match String::from_utf8(body.to_vec()) {
            Ok(text) => Processed::ok(response.with_parsed_body(Some(ParsedBody::Text(text)))),
            Err(source) => Processed::failed(
                response,
                ProcessorError::InvalidText {
                    content_type: TEXT_CONTENT_TYPE.to_string(),
                    source,
                },
            ),
        }
    }
}
