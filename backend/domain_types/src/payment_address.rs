use common_enums::CountryAlpha2;
use common_utils::{consts::STATE_NOT_APPLICABLE, ext_traits::StringExt};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

/// A billing or shipping address as callers hand it over. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub name: Option<Secret<String>>,
    pub company: Option<String>,
    pub address1: Option<Secret<String>>,
    pub address2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    pub country: Option<CountryAlpha2>,
    pub phone: Option<Secret<String>>,
}

fn present(value: &Option<Secret<String>>) -> Option<Secret<String>> {
    value
        .as_ref()
        .filter(|value| !value.peek().is_blank())
        .map(|value| Secret::new(value.peek().trim().to_string()))
}

fn present_plain(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|value| !value.is_blank())
        .map(|value| value.trim().to_string())
}

impl Address {
    /// The state to send, substituting `placeholder` for a blank state when the
    /// country has no state codes. Stays `None` when the country is unknown.
    pub fn state_or_placeholder(&self, placeholder: &str) -> Option<Secret<String>> {
        present(&self.state).or_else(|| {
            self.country
                .filter(|country| !country.requires_state_code())
                .map(|_| Secret::new(placeholder.to_string()))
        })
    }

    /// Copy with blank fields dropped, the rest trimmed and `state_placeholder`
    /// applied as in [`Address::state_or_placeholder`].
    pub fn normalize(&self, state_placeholder: &str) -> Self {
        Self {
            name: present(&self.name),
            company: present_plain(&self.company),
            address1: present(&self.address1),
            address2: present(&self.address2),
            city: present_plain(&self.city),
            state: self.state_or_placeholder(state_placeholder),
            zip: present(&self.zip),
            country: self.country,
            phone: present(&self.phone),
        }
    }

    /// First and last name split on the first whitespace of `name`.
    pub fn split_name(&self) -> (Option<Secret<String>>, Option<Secret<String>>) {
        match present(&self.name) {
            Some(name) => match name.peek().split_once(char::is_whitespace) {
                Some((first, last)) => (
                    Some(Secret::new(first.to_string())),
                    Some(Secret::new(last.trim().to_string())),
                ),
                None => (Some(name), None),
            },
            None => (None, None),
        }
    }
}

/// The keys a vendor uses for each address field. A `None` key is not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFieldNames {
    pub name: Option<&'static str>,
    pub company: Option<&'static str>,
    pub address1: Option<&'static str>,
    pub address2: Option<&'static str>,
    pub city: Option<&'static str>,
    pub state: Option<&'static str>,
    pub zip: Option<&'static str>,
    pub country: Option<&'static str>,
    pub phone: Option<&'static str>,
    /// Sent as the state outside the US and Canada when the caller left it blank.
    pub state_placeholder: &'static str,
}

impl AddressFieldNames {
    pub const STANDARD: Self = Self {
        name: Some("name"),
        company: Some("company"),
        address1: Some("address1"),
        address2: Some("address2"),
        city: Some("city"),
        state: Some("state"),
        zip: Some("zip"),
        country: Some("country"),
        phone: Some("phone"),
        state_placeholder: STATE_NOT_APPLICABLE,
    };

    /// Same keys, every one prefixed (`shipping_` + `address1`).
    pub fn with_prefix(&self, prefix: &'static str) -> PrefixedFieldNames {
        PrefixedFieldNames {
            prefix,
            names: *self,
        }
    }
}

impl Default for AddressFieldNames {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Field names that share a prefix, such as NMI's `shipping_*` keys.
#[derive(Debug, Clone, Copy)]
pub struct PrefixedFieldNames {
    prefix: &'static str,
    names: AddressFieldNames,
}

/// Merge `address` into `target` under the vendor's `names`.
///
/// Absent and blank fields are left out. A blank state becomes the vendor's
/// placeholder when the country is known and is not the US or Canada.
pub fn add_address<T>(target: &mut T, address: Option<&Address>, names: &AddressFieldNames)
where
    T: Extend<(String, Secret<String>)>,
{
    add_prefixed_address(target, address, "", names)
}

/// [`add_address`] with every key prefixed.
pub fn add_address_with_prefix<T>(
    target: &mut T,
    address: Option<&Address>,
    names: &PrefixedFieldNames,
) where
    T: Extend<(String, Secret<String>)>,
{
    add_prefixed_address(target, address, names.prefix, &names.names)
}

fn add_prefixed_address<T>(
    target: &mut T,
    address: Option<&Address>,
    prefix: &str,
    names: &AddressFieldNames,
) where
    T: Extend<(String, Secret<String>)>,
{
    let Some(address) = address.map(|address| address.normalize(names.state_placeholder)) else {
        return;
    };

    let fields = [
        (names.name, address.name),
        (names.company, address.company.map(Secret::new)),
        (names.address1, address.address1),
        (names.address2, address.address2),
        (names.city, address.city.map(Secret::new)),
        (names.state, address.state),
        (names.zip, address.zip),
        (
            names.country,
            address.country.map(|country| Secret::new(country.to_string())),
        ),
        (names.phone, address.phone),
    ];

    target.extend(fields.into_iter().filter_map(|(key, value)| {
        key.zip(value)
            .map(|(key, value)| (format!("{prefix}{key}"), value))
    }));
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn address(country: Option<CountryAlpha2>, state: Option<&str>) -> Address {
        Address {
            name: Some(Secret::new("Jim Smith".to_string())),
            address1: Some(Secret::new("456 My Street".to_string())),
            address2: Some(Secret::new("".to_string())),
            city: Some("Ottawa".to_string()),
            state: state.map(|state| Secret::new(state.to_string())),
            zip: Some(Secret::new("K1C2N6".to_string())),
            country,
            ..Default::default()
        }
    }

    fn merged(address: &Address) -> BTreeMap<String, String> {
        let mut target: Vec<(String, Secret<String>)> = Vec::new();
        add_address(&mut target, Some(address), &AddressFieldNames::STANDARD);
        target
            .into_iter()
            .map(|(key, value)| (key, value.peek().clone()))
            .collect()
    }

    #[test]
    fn blank_state_outside_north_america_gets_placeholder() {
        let fields = merged(&address(Some(CountryAlpha2::DE), Some("  ")));
        assert_eq!(fields.get("state").map(String::as_str), Some("n/a"));
        assert_eq!(fields.get("country").map(String::as_str), Some("DE"));

        let normalized = address(Some(CountryAlpha2::DE), None).normalize(STATE_NOT_APPLICABLE);
        assert_eq!(
            normalized.state.as_ref().map(|s| s.peek().as_str()),
            Some("n/a")
        );
        assert_eq!(normalized.address2, None);
    }

    #[test]
    fn north_american_state_is_kept() {
        let fields = merged(&address(Some(CountryAlpha2::US), Some("CO")));
        assert_eq!(fields.get("state").map(String::as_str), Some("CO"));
    }

    #[test]
    fn missing_state_in_north_america_is_omitted() {
        let fields = merged(&address(Some(CountryAlpha2::CA), None));
        assert!(!fields.contains_key("state"));
        let fields = merged(&address(None, None));
        assert!(!fields.contains_key("state"));
        assert!(!fields.contains_key("country"));
    }

    #[test]
    fn blank_and_absent_fields_are_omitted() {
        let fields = merged(&address(Some(CountryAlpha2::US), Some("CO")));
        assert!(!fields.contains_key("address2"));
        assert!(!fields.contains_key("phone"));
        assert!(!fields.contains_key("company"));
        assert_eq!(fields.get("address1").map(String::as_str), Some("456 My Street"));
    }

    #[test]
    fn vendor_specific_names_and_prefix() {
        let names = AddressFieldNames {
            name: None,
            address1: Some("address_line1"),
            zip: Some("postal_code"),
            state: Some("province"),
            state_placeholder: "--",
            ..AddressFieldNames::STANDARD
        };
        let mut target: Vec<(String, Secret<String>)> = Vec::new();
        add_address_with_prefix(
            &mut target,
            Some(&address(Some(CountryAlpha2::GB), None)),
            &names.with_prefix("shipping_"),
        );
        let fields: BTreeMap<String, String> = target
            .into_iter()
            .map(|(key, value)| (key, value.peek().clone()))
            .collect();
        assert_eq!(fields.get("shipping_province").map(String::as_str), Some("--"));
        assert_eq!(fields.get("shipping_postal_code").map(String::as_str), Some("K1C2N6"));
        assert!(!fields.contains_key("shipping_name"));
    }

    #[test]
    fn name_is_split_on_first_space() {
        let (first, last) = address(None, None).split_name();
        assert_eq!(first.map(|s| s.peek().clone()).as_deref(), Some("Jim"));
        assert_eq!(last.map(|s| s.peek().clone()).as_deref(), Some("Smith"));
    }

    #[test]
    fn missing_address_adds_nothing() {
        let mut target: Vec<(String, Secret<String>)> = Vec::new();
        add_address(&mut target, None, &AddressFieldNames::STANDARD);
        assert!(target.is_empty());
    }
}
