//! The normalized outcome of a gateway call.

use std::{collections::BTreeMap, fmt, str::FromStr};

use common_enums::StandardErrorCode;
use common_utils::{consts::AUTHORIZATION_SEPARATOR, errors::ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::card_verification::{AvsResult, CvvResult};

/// Reference to an earlier transaction, handed back for capture, refund, void
/// and unstore.
///
/// Some vendors need more than one value to find a transaction again, so the
/// token is an ordered list of parts. It renders as the parts joined by `|`
/// and parses back losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizationToken(Vec<String>);

impl AuthorizationToken {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn single(value: impl Into<String>) -> Self {
        Self(vec![value.into()])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn part(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The first part, which is the vendor transaction id for most gateways.
    pub fn primary(&self) -> Option<&str> {
        self.part(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }
}

fn escape_part(part: &str) -> String {
    part.replace('%', "%25").replace(AUTHORIZATION_SEPARATOR, "%7C")
}

fn unescape_part(part: &str) -> String {
    let mut unescaped = String::with_capacity(part.len());
    let mut rest = part;
    while let Some(index) = rest.find('%') {
        unescaped.push_str(&rest[..index]);
        let escape = rest.get(index..index + 3);
        match escape {
            Some("%7C") | Some("%7c") => unescaped.push(AUTHORIZATION_SEPARATOR),
            Some("%25") => unescaped.push('%'),
            _ => {
                unescaped.push('%');
                rest = &rest[index + 1..];
                continue;
            }
        }
        rest = &rest[index + 3..];
    }
    unescaped.push_str(rest);
    unescaped
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|part| escape_part(part))
            .collect::<Vec<_>>()
            .join(&AUTHORIZATION_SEPARATOR.to_string());
        f.write_str(&rendered)
    }
}

impl FromStr for AuthorizationToken {
    type Err = error_stack::Report<ValidationError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field_name: "authorization".to_string(),
            }
            .into());
        }
        Ok(Self(
            value
                .split(AUTHORIZATION_SEPARATOR)
                .map(unescape_part)
                .collect(),
        ))
    }
}

impl Serialize for AuthorizationToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AuthorizationToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

/// Outcome of one payment operation. Built once through
/// [`GatewayResponseBuilder`] and read through accessors afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayResponse {
    success: bool,
    message: String,
    params: BTreeMap<String, String>,
    authorization: Option<AuthorizationToken>,
    avs_result: AvsResult,
    cvv_result: CvvResult,
    test: bool,
    error_code: Option<StandardErrorCode>,
}

impl GatewayResponse {
    pub fn builder(success: bool, message: impl Into<String>) -> GatewayResponseBuilder {
        GatewayResponseBuilder {
            success,
            message: message.into(),
            params: BTreeMap::new(),
            authorization: None,
            avs_result: AvsResult::default(),
            cvv_result: CvvResult::default(),
            test: None,
            error_code: None,
        }
    }

    /// A failed response carrying only a message and a classification.
    pub fn failure(
        message: impl Into<String>,
        error_code: StandardErrorCode,
    ) -> GatewayResponseBuilder {
        Self::builder(false, message).error_code(Some(error_code))
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn authorization(&self) -> Option<&AuthorizationToken> {
        self.authorization.as_ref()
    }

    pub fn avs_result(&self) -> &AvsResult {
        &self.avs_result
    }

    pub fn cvv_result(&self) -> &CvvResult {
        &self.cvv_result
    }

    pub fn is_test(&self) -> bool {
        self.test
    }

    pub fn error_code(&self) -> Option<StandardErrorCode> {
        self.error_code
    }
}

#[derive(Debug, Clone)]
pub struct GatewayResponseBuilder {
    success: bool,
    message: String,
    params: BTreeMap<String, String>,
    authorization: Option<AuthorizationToken>,
    avs_result: AvsResult,
    cvv_result: CvvResult,
    test: Option<bool>,
    error_code: Option<StandardErrorCode>,
}

impl GatewayResponseBuilder {
    pub fn params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn authorization(mut self, authorization: Option<AuthorizationToken>) -> Self {
        self.authorization = authorization.filter(|token| !token.is_empty());
        self
    }

    pub fn avs_result(mut self, avs_result: AvsResult) -> Self {
        self.avs_result = avs_result;
        self
    }

    pub fn cvv_result(mut self, cvv_result: CvvResult) -> Self {
        self.cvv_result = cvv_result;
        self
    }

    pub fn test(mut self, test: bool) -> Self {
        self.test = Some(test);
        self
    }

    /// Set the test flag unless the vendor response already decided it.
    pub fn test_unless_set(mut self, test: bool) -> Self {
        self.test.get_or_insert(test);
        self
    }

    pub fn error_code(mut self, error_code: Option<StandardErrorCode>) -> Self {
        self.error_code = error_code;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn build(self) -> GatewayResponse {
        GatewayResponse {
            success: self.success,
            message: self.message,
            params: self.params,
            authorization: self.authorization,
            avs_result: self.avs_result,
            cvv_result: self.cvv_result,
            test: self.test.unwrap_or(false),
            // successful responses never carry an error code
            error_code: self.error_code.filter(|_| !self.success),
        }
    }
}

/// Flatten a JSON document into `params`. Nested keys are joined with `.`,
/// array items use their index and nulls are skipped.
pub fn params_from_json(value: &serde_json::Value) -> BTreeMap<String, String> {
    fn flatten(prefix: &str, value: &serde_json::Value, params: &mut BTreeMap<String, String>) {
        let key_for = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::String(text) => {
                params.insert(prefix.to_string(), text.clone());
            }
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {
                params.insert(prefix.to_string(), value.to_string());
            }
            serde_json::Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    flatten(&key_for(&index.to_string()), item, params);
                }
            }
            serde_json::Value::Object(map) => {
                for (key, item) in map {
                    flatten(&key_for(key), item, params);
                }
            }
        }
    }

    let mut params = BTreeMap::new();
    flatten("", value, &mut params);
    params
}

/// Several responses produced by one logical operation, such as verify's
/// authorize followed by void. The first response describes the operation
/// when every step succeeded.
#[derive(Debug, Clone, Default)]
pub struct MultiResponse {
    responses: Vec<GatewayResponse>,
}

impl MultiResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, response: GatewayResponse) {
        self.responses.push(response);
    }

    pub fn responses(&self) -> &[GatewayResponse] {
        &self.responses
    }

    pub fn is_success(&self) -> bool {
        !self.responses.is_empty() && self.responses.iter().all(GatewayResponse::is_success)
    }

    /// On failure the last (failing) step is the primary response.
    pub fn primary_response(&self) -> Option<&GatewayResponse> {
        if self.is_success() {
            self.responses.first()
        } else {
            self.responses.last()
        }
    }

    pub fn into_primary_response(self) -> Option<GatewayResponse> {
        let use_first = self.is_success();
        let mut responses = self.responses;
        if use_first {
            responses.into_iter().next()
        } else {
            responses.pop()
        }
    }
}
