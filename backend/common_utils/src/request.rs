use error_stack::ResultExt;
use hyperswitch_masking::Maskable;
use serde::{Deserialize, Serialize};

use crate::{consts, errors::ParsingError, CustomResult};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    FormUrlEncoded,
    Xml,
}

impl ContentType {
    pub fn as_mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Xml => "text/xml",
        }
    }
}

fn default_request_headers() -> [(String, Maskable<String>); 1] {
    use http::header;

    [(header::VIA.to_string(), consts::USER_AGENT.into())]
}

/// A serialized request body. Bodies are rendered when the request is built so
/// the transport only ever deals with bytes.
pub enum RequestContent {
    Json(String),
    FormUrlEncoded(String),
    Xml(String),
    RawBytes(Vec<u8>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
            Self::Xml(_) => "XmlRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

impl RequestContent {
    pub fn json<T: Serialize>(body: &T) -> CustomResult<Self, ParsingError> {
        serde_json::to_string(body)
            .map(Self::Json)
            .change_context(ParsingError::EncodeError("json"))
    }

    pub fn form_urlencoded<T: Serialize>(body: &T) -> CustomResult<Self, ParsingError> {
        serde_urlencoded::to_string(body)
            .map(Self::FormUrlEncoded)
            .change_context(ParsingError::EncodeError("x-www-form-urlencoded"))
    }

    pub fn xml<T: Serialize>(body: &T) -> CustomResult<Self, ParsingError> {
        quick_xml::se::to_string(body)
            .map(Self::Xml)
            .change_context(ParsingError::EncodeError("xml"))
    }

    pub fn get_body_bytes(&self) -> Vec<u8> {
        match self {
            Self::Json(body) | Self::FormUrlEncoded(body) | Self::Xml(body) => {
                body.as_bytes().to_vec()
            }
            Self::RawBytes(bytes) => bytes.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Json(body) | Self::FormUrlEncoded(body) | Self::Xml(body) => body.len(),
            Self::RawBytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn get_headers_map(&self) -> std::collections::HashMap<String, String> {
        self.headers
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().into_inner()))
            .collect()
    }

    pub fn set_body<T: Into<RequestContent>>(&mut self, body: T) {
        self.body.replace(body.into());
    }

    pub fn add_default_headers(&mut self) {
        self.headers.extend(default_request_headers());
    }

    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn attach_default_headers(mut self) -> Self {
        self.headers.extend(default_request_headers());
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_optional_body<T: Into<RequestContent>>(mut self, body: Option<T>) -> Self {
        body.map(|body| self.body.replace(body.into()));
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use hyperswitch_masking::Mask;

    use super::*;

    #[derive(Serialize)]
    struct Body {
        amount: String,
        order_id: &'static str,
    }

    #[test]
    fn builder_keeps_masked_headers() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://api.example.com/v1/payments")
            .attach_default_headers()
            .headers(vec![(
                "Authorization".to_string(),
                "Passcode secret".to_string().into_masked(),
            )])
            .build();

        let headers = request.get_headers_map();
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Passcode secret"));
        assert_eq!(headers.get("via").map(String::as_str), Some(consts::USER_AGENT));
        assert!(!format!("{request:?}").contains("Passcode secret"));
    }

    #[test]
    fn bodies_render_per_content_type() {
        let body = Body {
            amount: "1.00".to_string(),
            order_id: "ord 1",
        };
        let form = RequestContent::form_urlencoded(&body).unwrap();
        assert_eq!(form.get_body_bytes(), b"amount=1.00&order_id=ord+1".to_vec());

        let json = RequestContent::json(&body).unwrap();
        assert_eq!(
            String::from_utf8(json.get_body_bytes()).unwrap(),
            r#"{"amount":"1.00","order_id":"ord 1"}"#
        );
        assert_eq!(format!("{json:?}"), "JsonRequestBody");
    }
}
