use serde::{Deserialize, Serialize};

/// A US shipping/billing address. Rate lookups only key on `state` and
/// `zip_code`; the remaining fields are carried for the order snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    /// Two-letter state code, e.g. "OR".
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// Field names of any required fields left empty, in display order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.street.trim().is_empty() {
            missing.push("street");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.state.trim().is_empty() {
            missing.push("state");
        }
        if self.zip_code.trim().is_empty() {
            missing.push("zip_code");
        }
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        missing
    }
}
