use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ImportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ImportError::Timeout
        } else {
            ImportError::Http(e.to_string())
        }
    }
}

/// 上游房源记录。所有字段都可缺省，`id` 可以是数字或字符串。
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawListing {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(deserialize_with = "lenient_string")]
    pub builder: String,
    /// [city, locality, pincode, address]
    #[serde(deserialize_with = "lenient_list")]
    pub location: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(deserialize_with = "lenient_string")]
    pub possession: String,
    #[serde(rename = "type", deserialize_with = "lenient_list")]
    pub kinds: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub type_detail: Vec<String>,
    /// [registration id, registry link]；id 为 "#" 表示未登记
    #[serde(deserialize_with = "lenient_list")]
    pub rera: Vec<String>,
    pub short_description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub keywords: String,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

impl RawListing {
    /// 第 i 个位置字段，空串视为缺失
    pub fn location(&self, i: usize) -> Option<&str> {
        self.location
            .get(i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn is_importable(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

fn scalar_to_string(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn lenient_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(d)?))
}

fn lenient_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items.into_iter().map(scalar_to_string).collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// 解析整个响应体：顶层必须是数组，单条记录解析失败只跳过该条
pub fn parse_listings(body: &str) -> Result<Vec<RawListing>, ImportError> {
    let v: Value =
        serde_json::from_str(body).map_err(|e| ImportError::Malformed(e.to_string()))?;
    let Value::Array(items) = v else {
        return Err(ImportError::Malformed("expected a JSON array".to_string()));
    };

    let mut listings = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawListing>(item) {
            Ok(l) => listings.push(l),
            Err(e) => debug!("skip feed record #{i}: {e}"),
        }
    }
    Ok(listings)
}

#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Http(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn try_fetch(&self) -> Result<Vec<RawListing>, ImportError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ImportError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        parse_listings(&body)
    }

    /// 任何失败都降级为空列表，只记一条 warn
    pub async fn fetch_listings(&self) -> Vec<RawListing> {
        match self.try_fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("listings feed {} unavailable: {e}", self.url);
                Vec::new()
            }
        }
    }
}
