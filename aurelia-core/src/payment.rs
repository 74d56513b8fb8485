use async_trait::async_trait;
use aurelia_shared::{Address, Masked};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

/// Result of a single authorization attempt. `transaction_id` is present
/// exactly when the attempt completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub message: String,
}

impl PaymentOutcome {
    pub fn completed(transaction_id: String, message: impl Into<String>) -> Self {
        Self {
            status: PaymentStatus::Completed,
            transaction_id: Some(transaction_id),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: PaymentStatus::Failed,
            transaction_id: None,
            message: message.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CardError {
    #[error("Invalid card number")]
    InvalidNumber,

    #[error("Invalid expiration month")]
    InvalidExpiryMonth,

    #[error("Card has expired")]
    Expired,

    #[error("Invalid CVC")]
    InvalidCvc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardBrand {
    Visa,
    Mastercard,
    AmericanExpress,
    Discover,
    Unknown,
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Discover => "Discover",
            CardBrand::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Raw card payload as entered at checkout. Expiry year is two-digit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

impl CardDetails {
    /// Fail-fast validation in the order number, month, year, cvc; only the
    /// first failing check is reported.
    pub fn validate(&self) -> Result<(), CardError> {
        self.validate_at(current_two_digit_year())
    }

    /// Validation against an explicit current two-digit year, so expiry
    /// checks stay deterministic under test.
    pub fn validate_at(&self, current_year: u32) -> Result<(), CardError> {
        let digits: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidNumber);
        }

        if self.exp_month < 1 || self.exp_month > 12 {
            return Err(CardError::InvalidExpiryMonth);
        }

        if self.exp_year < current_year {
            return Err(CardError::Expired);
        }

        if self.cvc.len() < 3 || self.cvc.len() > 4 || !self.cvc.chars().all(|c| c.is_ascii_digit())
        {
            return Err(CardError::InvalidCvc);
        }

        Ok(())
    }

    /// Issuer detection from the leading digits.
    pub fn brand(&self) -> CardBrand {
        let digits: String = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.starts_with('4') {
            CardBrand::Visa
        } else if matches!(digits.get(..2), Some("51" | "52" | "53" | "54" | "55")) {
            CardBrand::Mastercard
        } else if matches!(digits.get(..2), Some("34" | "37")) {
            CardBrand::AmericanExpress
        } else if digits.starts_with("6011") || digits.starts_with("65") {
            CardBrand::Discover
        } else {
            CardBrand::Unknown
        }
    }

    /// Card number regrouped in blocks of four for display.
    pub fn display_number(&self) -> String {
        let digits: String = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        digits
            .as_bytes()
            .chunks(4)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn current_two_digit_year() -> u32 {
    (Utc::now().year() % 100) as u32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingDetails {
    pub name: String,
    pub email: Masked<String>,
    pub address: Address,
}

/// Authorization seam. The production implementation simulates a gateway
/// with configurable latency and success rate; tests inject a deterministic
/// double.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(
        &self,
        amount_cents: i64,
        currency: &str,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>>;
}
