use encoding_rs::{Encoding, WINDOWS_1252};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::config::VotumConfig;
use crate::error::{ExtractError, VotumError};

// Declarations past this offset are ignored, as in browsers.
const META_SCAN_LIMIT: usize = 1024;

/// Downloads pages and decodes them to text.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &VotumConfig) -> Result<Self, VotumError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ExtractError::from)?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its body as text.
    ///
    /// Any non-2xx status is an error; nothing is retried.
    pub async fn fetch(&self, url: &Url) -> Result<String, ExtractError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        debug!(url = %url, len = bytes.len(), "fetched page");

        Ok(decode_body(&bytes, content_type.as_deref()))
    }
}

/// Decode a response body.
///
/// Order of precedence: byte order mark, `Content-Type` charset, a
/// `<meta>` declaration near the top of the document, strict UTF-8 and
/// finally windows-1252, which accepts any byte sequence.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let declared = content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(bytes))
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_with(encoding, bytes);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => decode_with(WINDOWS_1252, bytes),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        debug!(encoding = encoding.name(), "replaced malformed sequences");
    }
    text.into_owned()
}

/// `charset` parameter of a `Content-Type` value.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_owned())
    })
}

/// Charset named by `<meta charset=..>` or an `http-equiv` content type.
fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        let tag_body = &tag[..end];
        if let Some(pos) = tag_body.find("charset=") {
            let value = tag_body[pos + "charset=".len()..]
                .trim_start_matches(['"', '\''])
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
                .collect::<String>();
            if !value.is_empty() {
                return Some(value);
            }
        }
        rest = &tag[end..];
    }
    None
}
