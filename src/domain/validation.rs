use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidEmailAddress { input: String },
    InvalidPhoneNumber { input: String },
    InvalidUrl { field: &'static str, input: String },
    InvalidHeader { name: String },
    TooLong { field: &'static str, max: usize, actual: usize },
    InvalidNumber { field: &'static str, input: String },
    MissingBody,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidEmailAddress { input } => write!(f, "invalid email address: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidUrl { field, input } => write!(f, "invalid {field} url: {input}"),
            Self::InvalidHeader { name } => write!(f, "invalid header: {name}"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::InvalidNumber { field, input } => write!(f, "invalid number for {field}: {input}"),
            Self::MissingBody => write!(f, "email needs an html or text body"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::InvalidEmailAddress {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid email address: bad");

        let err = ValidationError::TooLong {
            field: "from",
            max: 11,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "from is too long: 12 characters (max 11)"
        );

        let err = ValidationError::InvalidUrl {
            field: "web_url",
            input: "nope".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid web_url url: nope");

        assert_eq!(
            ValidationError::MissingBody.to_string(),
            "email needs an html or text body"
        );
    }
}
