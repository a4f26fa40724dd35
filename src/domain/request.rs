use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CodeLength, MessageText, ProviderName, RawPhoneNumber, ValidityMinutes, VerificationCode,
};

/// Options for a verification SMS. Unset fields are left out of the request so that
/// TextFlow applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOptions {
    pub provider: Option<ProviderName>,
    pub minutes: Option<ValidityMinutes>,
    pub code_length: Option<CodeLength>,
}

impl VerificationOptions {
    pub fn provider(mut self, provider: ProviderName) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn minutes(mut self, minutes: ValidityMinutes) -> Self {
        self.minutes = Some(minutes);
        self
    }

    pub fn code_length(mut self, code_length: CodeLength) -> Self {
        self.code_length = Some(code_length);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSms {
    recipient: RawPhoneNumber,
    text: MessageText,
}

impl SendSms {
    /// Name used in validation messages for the recipient.
    pub const RECIPIENT_FIELD: &'static str = "recipient";

    /// Validate the recipient first, then the text.
    pub fn new(
        recipient: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let recipient = RawPhoneNumber::with_field(Self::RECIPIENT_FIELD, recipient)?;
        let text = MessageText::new(text)?;
        Ok(Self::from_parts(recipient, text))
    }

    pub fn from_parts(recipient: RawPhoneNumber, text: MessageText) -> Self {
        Self { recipient, text }
    }

    pub fn recipient(&self) -> &RawPhoneNumber {
        &self.recipient
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendVerification {
    phone_number: RawPhoneNumber,
    options: VerificationOptions,
}

impl SendVerification {
    pub fn new(
        phone_number: impl Into<String>,
        options: VerificationOptions,
    ) -> Result<Self, ValidationError> {
        let phone_number = RawPhoneNumber::new(phone_number)?;
        Ok(Self::from_parts(phone_number, options))
    }

    pub fn from_parts(phone_number: RawPhoneNumber, options: VerificationOptions) -> Self {
        Self {
            phone_number,
            options,
        }
    }

    pub fn phone_number(&self) -> &RawPhoneNumber {
        &self.phone_number
    }

    pub fn options(&self) -> &VerificationOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCode {
    phone_number: RawPhoneNumber,
    code: VerificationCode,
}

impl VerifyCode {
    /// Validate the phone number first, then the code.
    pub fn new(
        phone_number: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let phone_number = RawPhoneNumber::new(phone_number)?;
        let code = VerificationCode::new(code)?;
        Ok(Self::from_parts(phone_number, code))
    }

    pub fn from_parts(phone_number: RawPhoneNumber, code: VerificationCode) -> Self {
        Self { phone_number, code }
    }

    pub fn phone_number(&self) -> &RawPhoneNumber {
        &self.phone_number
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }
}
