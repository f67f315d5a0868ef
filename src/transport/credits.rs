use serde::de::{Error as DeError, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

/// SMS credit amount (`credits_used`, `remaining_credit`) as the provider spelled it.
///
/// The endpoint sends either a string or a number. Numbers keep their literal
/// token, so `1.00` stays `"1.00"`. Must be decoded straight from JSON text;
/// a `serde_json::Value` has already lost the spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditToken(String);

impl CreditToken {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for CreditToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let token = raw.get().trim();

        if token.starts_with('"') {
            return serde_json::from_str::<String>(token)
                .map(Self)
                .map_err(D::Error::custom);
        }

        serde_json::from_str::<serde_json::Number>(token)
            .map(|_| Self(token.to_owned()))
            .map_err(|_| {
                D::Error::invalid_type(
                    Unexpected::Other(token),
                    &"a credit amount string or number",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_their_spelling() {
        let credits: CreditToken = serde_json::from_str("1.00").unwrap();
        assert_eq!(credits.into_string(), "1.00");

        let credits: CreditToken = serde_json::from_str("-0.50").unwrap();
        assert_eq!(credits.into_string(), "-0.50");
    }

    #[test]
    fn strings_are_unquoted() {
        let credits: CreditToken = serde_json::from_str(r#""99.5""#).unwrap();
        assert_eq!(credits.into_string(), "99.5");
    }

    #[test]
    fn other_json_types_are_rejected() {
        assert!(serde_json::from_str::<CreditToken>("true").is_err());
        assert!(serde_json::from_str::<CreditToken>("[1]").is_err());
        assert!(serde_json::from_str::<CreditToken>(r#"{"n":1}"#).is_err());
    }
}
