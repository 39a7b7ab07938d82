// Classifies generation failures and renders the text shown in the editor

use crate::error::BackendError;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    QuotaExceeded,
    RateLimited,
    Network,
    Generic,
}

fn quota_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)quota\s+exceeded").expect("static regex"))
}

fn rate_limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)rate\s+limit").expect("static regex"))
}

fn network_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\b(network|fetch)").expect("static regex"))
}

pub fn classify(err: &BackendError) -> ErrorCategory {
    match err {
        BackendError::Status { status: 402, .. } => return ErrorCategory::QuotaExceeded,
        BackendError::Status { status: 429, .. } => return ErrorCategory::RateLimited,
        BackendError::Network(_) | BackendError::Timeout(_) => return ErrorCategory::Network,
        _ => {}
    }

    let message = err.to_string();
    if quota_pattern().is_match(&message) {
        ErrorCategory::QuotaExceeded
    } else if rate_limit_pattern().is_match(&message) {
        ErrorCategory::RateLimited
    } else if network_pattern().is_match(&message) {
        ErrorCategory::Network
    } else {
        ErrorCategory::Generic
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: ErrorCategory,
    pub text: String,
}

/// Build the multi-line explanation for `err`. `backend_url` names the server
/// the user should check.
pub fn diagnose(err: &BackendError, backend_url: &str) -> Diagnostic {
    let category = classify(err);
    let message = err.to_string();

    let text = match category {
        ErrorCategory::QuotaExceeded => format!(
            "❌ ERROR: OpenAI API Quota Exceeded

{message}

🔧 How to fix:
1. Go to https://platform.openai.com/account/billing
2. Add a payment method or raise your usage limit
3. Check your current usage and billing status
4. Make sure the server's API key has credits left

⚠️  Note: the free tier has limited usage."
        ),
        ErrorCategory::RateLimited => format!(
            "❌ ERROR: Rate Limit Exceeded

{message}

🔧 How to fix:
1. Wait a few minutes before trying again
2. The server rate-limits generation requests
3. Avoid sending several requests in quick succession
4. A higher OpenAI plan raises the limits

⏳ Please wait and try again in a few moments."
        ),
        ErrorCategory::Network => format!(
            "❌ ERROR: Network Connection Issue

{message}

🔧 How to fix:
1. Check your internet connection
2. Make sure the server at {backend_url} is running
3. Verify the API endpoint is reachable
4. Try again once the connection is back

🌐 Connection troubleshooting required."
        ),
        ErrorCategory::Generic => format!(
            "❌ ERROR: {message}

🔧 Please check:
1. The API server at {backend_url} is running
2. The server's OpenAI API key is configured
3. The OpenAI account has sufficient credits
4. Your network connection is stable

📝 Check the server logs for details."
        ),
    };

    Diagnostic { category, text }
}
