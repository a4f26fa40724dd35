use std::fmt;

use phonenumber::country;
use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// TextFlow API key, sent as a bearer token.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "API key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Missing { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body.
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Missing { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Verification code submitted by the end user.
///
/// Invariant: non-empty after trimming.
pub struct VerificationCode(String);

impl VerificationCode {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "code";

    /// Create a validated [`VerificationCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Missing { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Provider name shown in the verification message (`provider`).
///
/// With provider `Guest` the recipient gets "Your verification code for Guest is: CODE".
///
/// Invariant: non-empty after trimming.
pub struct ProviderName(String);

impl ProviderName {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "provider";

    /// Create a validated [`ProviderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Missing { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated provider name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number as sent to TextFlow, including the country calling code
/// (for example `+381617581234`).
///
/// Invariant: non-empty after trimming. No format check is performed locally;
/// use [`PhoneNumber::parse`] for that.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "phone number";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_field(Self::FIELD, value)
    }

    /// Same as [`RawPhoneNumber::new`], reporting a missing value under `field`.
    pub(crate) fn with_field(
        field: &'static str,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Missing { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to TextFlow.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Raw value with everything but the last four characters masked, for logs.
    pub fn masked(&self) -> String {
        let chars = self.0.chars().collect::<Vec<_>>();
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let tail = chars[hidden..].iter().collect::<String>();
        format!("{}{tail}", "*".repeat(hidden))
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Send the E.164 form of a locally checked number.
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Phone number checked locally with `phonenumber` before it is sent.
///
/// TextFlow accepts any string and reports bad numbers itself.
pub struct PhoneNumber {
    e164: String,
    calling_code: u16,
}

impl PhoneNumber {
    /// Parse `input`, falling back to `default_region` when it has no `+` prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let input = input.as_ref().trim();
        if input.is_empty() {
            return Err(ValidationError::Missing {
                field: RawPhoneNumber::FIELD,
            });
        }

        let number = phonenumber::parse(default_region, input).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: input.to_owned(),
            }
        })?;

        Ok(Self {
            e164: phonenumber::format(&number)
                .mode(phonenumber::Mode::E164)
                .to_string(),
            calling_code: number.code().value(),
        })
    }

    /// E.164 form, e.g. `+381617581234`.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Country calling code, e.g. `381` for Serbia.
    pub fn calling_code(&self) -> u16 {
        self.calling_code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How many minutes a verification code stays valid (`minutes`).
///
/// Invariant: `1..=1440`. TextFlow uses 30 when the field is omitted.
pub struct ValidityMinutes(u16);

impl ValidityMinutes {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "minutes";
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 1440;
    /// Value the service applies when none is sent.
    pub const SERVICE_DEFAULT: u16 = 30;

    pub fn new(value: u16) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Number of digits in a generated verification code (`code_length`).
///
/// Invariant: `1..=10`. TextFlow uses 4 when the field is omitted.
pub struct CodeLength(u8);

impl CodeLength {
    /// Name used in validation messages.
    pub const FIELD: &'static str = "code length";
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    /// Value the service applies when none is sent.
    pub const SERVICE_DEFAULT: u8 = 4;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
                actual: value.into(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}
