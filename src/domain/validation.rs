use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing {
        field: &'static str,
    },
    OutOfRange {
        field: &'static str,
        min: u16,
        max: u16,
        actual: u16,
    },
    InvalidPhoneNumber {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} missing"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(f, "{field} out of range: {actual} (expected {min}..={max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
