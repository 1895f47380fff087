//! Extension traits for decoding vendor payloads and pulling required values
//! out of options.

use error_stack::ResultExt;
use serde::de::DeserializeOwned;

use crate::{
    errors::{self, CustomResult},
    fp_utils::when,
};

/// Decode raw response bytes into typed structures.
pub trait BytesExt {
    /// Convert JSON bytes into a struct, recording `type_name` on failure.
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned;
}

impl BytesExt for bytes::Bytes {
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice::<T>(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from bytes"))
    }
}

/// Decode XML documents with `quick-xml`.
pub trait XmlExt {
    fn parse_xml<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned;
}

impl XmlExt for &str {
    fn parse_xml<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from xml"))
    }
}

/// Decode `key=value&...` bodies.
pub trait UrlEncodedExt {
    fn parse_urlencoded<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned;
}

impl UrlEncodedExt for bytes::Bytes {
    fn parse_urlencoded<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: DeserializeOwned,
    {
        serde_urlencoded::from_bytes(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from form data"))
    }
}

/// Extending functionalities of `Option<T>` for the value-required cases.
pub trait OptionExt<T> {
    /// Return the inner value or a `MissingRequiredField` error naming `field_name`.
    fn get_required_value(
        self,
        field_name: &'static str,
    ) -> CustomResult<T, errors::ValidationError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn get_required_value(
        self,
        field_name: &'static str,
    ) -> CustomResult<T, errors::ValidationError> {
        match self {
            Some(value) => Ok(value),
            None => Err(errors::ValidationError::MissingRequiredField {
                field_name: field_name.to_string(),
            })
            .attach_printable(format!("Missing required field {field_name}")),
        }
    }
}

/// Checks on string values coming from callers.
pub trait StringExt {
    /// `true` for empty or whitespace only strings.
    fn is_blank(&self) -> bool;

    /// Reject blank values with a `MissingRequiredField` error.
    fn require_present(&self, field_name: &'static str)
        -> CustomResult<(), errors::ValidationError>;
}

impl<S: AsRef<str>> StringExt for S {
    fn is_blank(&self) -> bool {
        self.as_ref().trim().is_empty()
    }

    fn require_present(
        &self,
        field_name: &'static str,
    ) -> CustomResult<(), errors::ValidationError> {
        when(self.is_blank(), || {
            Err::<(), _>(errors::ValidationError::MissingRequiredField {
                field_name: field_name.to_string(),
            }
            .into())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        id: String,
    }

    #[test]
    fn parse_struct_reports_type_name() {
        let bytes = bytes::Bytes::from_static(b"{\"id\":\"10000050\"}");
        let sample: Sample = bytes.parse_struct("Sample").unwrap();
        assert_eq!(sample.id, "10000050");

        let broken = bytes::Bytes::from_static(b"<html>");
        let error = broken.parse_struct::<Sample>("Sample").unwrap_err();
        assert!(matches!(
            error.current_context(),
            errors::ParsingError::StructParseFailure("Sample")
        ));
    }

    #[test]
    fn required_values() {
        assert_eq!(Some(5).get_required_value("amount").unwrap(), 5);
        let error = None::<i32>.get_required_value("amount").unwrap_err();
        assert_eq!(
            error.current_context(),
            &errors::ValidationError::MissingRequiredField {
                field_name: "amount".to_string()
            }
        );
        assert!("  ".is_blank());
        assert!("CO".require_present("state").is_ok());
    }
}
