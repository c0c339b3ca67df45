use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use askql_domain::TranslationResult;

use crate::error::TranslationError;

static STATEMENT_START: OnceLock<Regex> = OnceLock::new();
static STATEMENT_END: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructuredReply {
    sql_query: String,
    explanation: String,
}

/// Turns raw AI output into a [`TranslationResult`].
///
/// Tries, in order: a strict decode of the whole text, the same decode after
/// removing code fences or surrounding prose, and finally a keyword scan for
/// the first SQL statement. Only the last tier yields a `fallback_regex`
/// result.
pub fn interpret(raw: &str) -> Result<TranslationResult, TranslationError> {
    if let Some(result) = decode_structured(raw) {
        return Ok(result);
    }

    let stripped = strip_fences(raw);
    if let Some(result) = decode_structured(stripped) {
        tracing::debug!("AI response decoded after removing code fences");
        return Ok(result);
    }
    if let Some(result) = outermost_object(stripped).and_then(decode_structured) {
        tracing::debug!("AI response decoded after removing surrounding prose");
        return Ok(result);
    }

    if let Some(sql) = extract_statement(raw) {
        tracing::warn!(len = raw.len(), "AI response was not JSON; extracted SQL by keyword scan");
        return Ok(TranslationResult::fallback(sql));
    }

    tracing::error!(len = raw.len(), "AI response contained no recognizable SQL");
    Err(TranslationError::UnparseableResponse {
        raw: raw.to_string(),
    })
}

fn decode_structured(text: &str) -> Option<TranslationResult> {
    let reply: StructuredReply = serde_json::from_str(text).ok()?;
    if reply.sql_query.trim().is_empty() {
        return None;
    }
    Some(TranslationResult::structured(reply.sql_query, reply.explanation))
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        let info_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let (info, after) = rest.split_at(info_len);
        if info.is_empty() || info.eq_ignore_ascii_case("json") {
            body = after;
        }
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn extract_statement(text: &str) -> Option<String> {
    let start_re = STATEMENT_START.get_or_init(|| {
        // Upper-case keywords anywhere, any case at the start of a line, or
        // any case mid-line when followed by the rest of a statement's head.
        Regex::new(concat!(
            r"(?m)\b(?:SELECT|WITH|INSERT|UPDATE|DELETE)\b",
            r"|^[ \t]*(?i:select|with|insert|update|delete)\b",
            r#"|(?i:\b(?:select\s+(?:\*|distinct\b|[\w"().,\s]+?\bfrom\b)"#,
            r"|with\s+\w+\s+as\s*\(|insert\s+into\b|update\s+\w+\s+set\b|delete\s+from\b))",
        ))
        .unwrap()
    });
    let end_re = STATEMENT_END.get_or_init(|| Regex::new(r"\n[ \t]*\r?\n|```").unwrap());

    let found = start_re.find(text)?;
    let tail = &text[found.start()..];
    let end = end_re.find(tail).map_or(tail.len(), |m| m.start());
    let statement = tail[..end].trim();
    (!statement.is_empty()).then(|| statement.to_string())
}
