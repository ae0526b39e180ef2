pub mod rate_limit;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::model::ProcessingResult;
use crate::{process_workbook, EngineOptions};
use rate_limit::{RateLimitDecision, RateLimiter};

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/octet-stream",
];
pub const FALLBACK_CLIENT: &str = "127.0.0.1";

/// What the transport layer knows about an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    pub name: String,
    pub size: u64,
    /// Declared MIME type. Empty when the client sent none.
    #[serde(default)]
    pub content_type: String,
}

/// Check file name, size and declared type before any parsing happens.
pub fn validate_upload(meta: &UploadMeta) -> Result<(), EngineError> {
    if meta.name.trim().is_empty() {
        return Err(EngineError::UploadRejected("file name is required".into()));
    }

    let lower = meta.name.to_lowercase();
    let has_extension = ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    if !has_extension {
        return Err(EngineError::UploadRejected(
            "the file must have a .xlsx or .xls extension".into(),
        ));
    }

    if meta.size == 0 {
        return Err(EngineError::UploadRejected("the file is empty".into()));
    }
    if meta.size > MAX_FILE_SIZE {
        return Err(EngineError::UploadRejected(format!(
            "the file is too large. Maximum size: {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    // Either the declared type or the extension identifies a spreadsheet.
    let content_type = meta.content_type.trim().to_lowercase();
    let known_type = ACCEPTED_CONTENT_TYPES.contains(&content_type.as_str());
    if !known_type && !has_extension {
        return Err(EngineError::UploadRejected(format!(
            "unsupported content type '{}'",
            meta.content_type
        )));
    }
    if !known_type {
        debug!(content_type = %meta.content_type, "content type not recognized, accepted by extension");
    }

    Ok(())
}

/// Pick the client key for rate limiting from proxy headers.
pub fn client_identity(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    let real = real_ip.map(str::trim).filter(|ip| !ip.is_empty());

    forwarded.or(real).unwrap_or(FALLBACK_CLIENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Ok,
    BadRequest,
    TooManyRequests,
}

impl UploadStatus {
    pub fn code(&self) -> u16 {
        match self {
            UploadStatus::Ok => 200,
            UploadStatus::BadRequest => 400,
            UploadStatus::TooManyRequests => 429,
        }
    }
}

/// Response body: the engine result, plus file details on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    #[serde(flatten)]
    pub result: ProcessingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReply {
    pub status: UploadStatus,
    pub body: UploadBody,
    pub rate_limit: RateLimitDecision,
}

impl UploadReply {
    fn failure(status: UploadStatus, error: String, rate_limit: RateLimitDecision) -> Self {
        Self {
            status,
            body: UploadBody {
                result: ProcessingResult::Failure { error },
                file_name: None,
                file_size: None,
            },
            rate_limit,
        }
    }
}

/// Rate limit, metadata checks and the engine, in that order.
#[derive(Debug, Default)]
pub struct UploadHandler {
    pub limiter: RateLimiter,
    pub options: EngineOptions,
}

impl UploadHandler {
    pub fn new(limiter: RateLimiter, options: EngineOptions) -> Self {
        Self { limiter, options }
    }

    pub fn handle(&self, client: &str, meta: &UploadMeta, bytes: &[u8]) -> UploadReply {
        let decision = self.limiter.check(client);
        self.handle_with(decision, meta, bytes)
    }

    fn handle_with(&self, decision: RateLimitDecision, meta: &UploadMeta, bytes: &[u8]) -> UploadReply {
        if !decision.allowed {
            warn!(file = %meta.name, "rate limit exceeded");
            return UploadReply::failure(
                UploadStatus::TooManyRequests,
                format!(
                    "too many requests. Try again in {} seconds",
                    decision.reset_in_secs()
                ),
                decision,
            );
        }

        if let Err(e) = validate_upload(meta) {
            return UploadReply::failure(UploadStatus::BadRequest, e.to_string(), decision);
        }

        let result = process_workbook(bytes, &self.options);
        if !result.is_success() {
            return UploadReply {
                status: UploadStatus::BadRequest,
                body: UploadBody {
                    result,
                    file_name: None,
                    file_size: None,
                },
                rate_limit: decision,
            };
        }

        info!(file = %meta.name, size = meta.size, "upload processed");
        UploadReply {
            status: UploadStatus::Ok,
            body: UploadBody {
                result,
                file_name: Some(meta.name.clone()),
                file_size: Some(meta.size),
            },
            rate_limit: decision,
        }
    }
}
