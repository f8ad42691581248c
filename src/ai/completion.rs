//! OpenAI 兼容的 `/chat/completions` 请求与响应解析，两个 provider 共用。

use crate::ai::types::{ChatRequest, ChatResponse, LlmError};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

pub(crate) fn request_body(req: &ChatRequest) -> Value {
    let mut body = serde_json::json!({
        "model": req.model,
        "temperature": req.temperature,
        "max_tokens": req.max_tokens,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.user}
        ]
    });
    if req.json_mode {
        body["response_format"] = serde_json::json!({"type": "json_object"});
    }
    body
}

/// 发送请求；超时重试一次，其余传输错误直接返回
pub(crate) async fn send<F>(build: F) -> Result<ChatResponse, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    let mut resp = None;
    for _ in 0..2 {
        match build().send().await {
            Ok(r) => {
                resp = Some(r);
                break;
            }
            Err(e) if e.is_timeout() => continue,
            Err(e) => return Err(LlmError::Http(e.to_string())),
        }
    }
    let resp = resp.ok_or_else(|| LlmError::Http("timeout".to_string()))?;

    match resp.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LlmError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
        _ => {}
    }

    let status = resp.status();
    let raw = resp
        .text()
        .await
        .map_err(|e| LlmError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(LlmError::Http(format!("{} {}", status.as_u16(), raw)));
    }

    let text = completion_text(&raw)?;
    Ok(ChatResponse {
        text,
        raw: Some(raw),
    })
}

/// 兼容多种返回结构：message.content（字符串或数组）、content、text，以及顶层 output_text
pub(crate) fn completion_text(raw: &str) -> Result<String, LlmError> {
    let v: Value = serde_json::from_str(raw)
        .map_err(|e| LlmError::InvalidResponse(format!("json parse failed: {e}, raw={raw}")))?;

    if let Some(Value::String(s)) = v.get("output_text") {
        return Ok(s.clone());
    }

    let choice0 = v
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| LlmError::InvalidResponse(format!("missing choices[0], raw={raw}")))?;

    let content = choice0
        .get("message")
        .and_then(|m| m.get("content"))
        .or_else(|| choice0.get("content"));

    match content {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Array(arr)) => {
            let parts: Vec<&str> = arr
                .iter()
                .filter_map(|it| it.get("text").and_then(|x| x.as_str()).or_else(|| it.as_str()))
                .collect();
            Ok(parts.join("\n"))
        }
        Some(_) => Err(LlmError::InvalidResponse(format!(
            "unexpected content type, raw={raw}"
        ))),
        None => match choice0.get("text") {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(LlmError::InvalidResponse(format!(
                "missing content/text in choices[0], raw={raw}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_and_array_content() {
        let raw = r#"{"choices":[{"message":{"content":"{\"response\":\"hi\"}"}}]}"#;
        assert_eq!(completion_text(raw).unwrap(), r#"{"response":"hi"}"#);

        let raw = r#"{"choices":[{"message":{"content":[{"text":"a"},"b"]}}]}"#;
        assert_eq!(completion_text(raw).unwrap(), "a\nb");

        let raw = r#"{"choices":[{"text":"plain"}]}"#;
        assert_eq!(completion_text(raw).unwrap(), "plain");
    }

    #[test]
    fn rejects_missing_choices() {
        assert!(matches!(
            completion_text(r#"{"error":"x"}"#),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn json_mode_sets_response_format() {
        let req = ChatRequest::json("m", "sys", "user");
        assert_eq!(request_body(&req)["response_format"]["type"], "json_object");
        let mut plain = req.clone();
        plain.json_mode = false;
        assert!(request_body(&plain).get("response_format").is_none());
    }
}
