use std::collections::BTreeMap;

use common_utils::CustomResult;
use domain_types::{errors, gateway_response::params_from_json, utils::Encode};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

type Error = Report<errors::ConnectorError>;

/// Serialize `data` as an XML fragment under `root_name`, without a declaration.
pub fn serialize_to_xml_string_with_root<T: Serialize>(
    root_name: &str,
    data: &T,
) -> Result<String, Error> {
    quick_xml::se::to_string_with_root(root_name, data)
        .change_context(errors::ConnectorError::RequestEncodingFailed)
        .attach_printable("Failed to serialize XML with root")
}

/// Undo the entity escaping of an XML document nested inside a SOAP string result.
pub fn decode_html_entities(encoded: &str) -> String {
    encoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Flatten a parsed vendor response into response params.
pub(crate) fn response_params<T: Serialize + std::fmt::Debug>(
    response: &T,
) -> CustomResult<BTreeMap<String, String>, errors::ConnectorError> {
    let value = response
        .encode_to_value()
        .change_context(errors::ConnectorError::ResponseHandlingFailed)?;
    Ok(params_from_json(&value))
}

/// Accepts `"1"`, `1` and `true` alike, as some vendors switch between them.
pub fn str_or_i32<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrI32 {
        Str(String),
        I32(i32),
        Bool(bool),
    }

    let value = StrOrI32::deserialize(deserializer)?;
    Ok(match value {
        StrOrI32::Str(value) => value,
        StrOrI32::I32(value) => value.to_string(),
        StrOrI32::Bool(value) => u8::from(value).to_string(),
    })
}

pub fn optional_str_or_i32<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Code(#[serde(deserialize_with = "str_or_i32")] String);

    let value = Option::<Code>::deserialize(deserializer)?;
    Ok(value
        .map(|Code(code)| code)
        .filter(|code| !code.trim().is_empty()))
}

/// Empty strings deserialize as `None`.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}
