use std::fmt;

use serde::Serialize;

pub const DEFAULT_SUGGESTED_ACTION: &str = "no action suggested";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    OrderIssue,
    AccountAccess,
    ProductInquiry,
    TechnicalSupport,
    Billing,
    #[default]
    Other,
}

impl TicketCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::OrderIssue => "order_issue",
            TicketCategory::AccountAccess => "account_access",
            TicketCategory::ProductInquiry => "product_inquiry",
            TicketCategory::TechnicalSupport => "technical_support",
            TicketCategory::Billing => "billing",
            TicketCategory::Other => "other",
        }
    }

    /// Looks up a variant by its uppercase symbolic name, e.g. `ORDER_ISSUE`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "ORDER_ISSUE" => Some(TicketCategory::OrderIssue),
            "ACCOUNT_ACCESS" => Some(TicketCategory::AccountAccess),
            "PRODUCT_INQUIRY" => Some(TicketCategory::ProductInquiry),
            "TECHNICAL_SUPPORT" => Some(TicketCategory::TechnicalSupport),
            "BILLING" => Some(TicketCategory::Billing),
            "OTHER" => Some(TicketCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered from least to most pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketUrgency {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl TicketUrgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketUrgency::Low => "low",
            TicketUrgency::Medium => "medium",
            TicketUrgency::High => "high",
            TicketUrgency::Critical => "critical",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "LOW" => Some(TicketUrgency::Low),
            "MEDIUM" => Some(TicketUrgency::Medium),
            "HIGH" => Some(TicketUrgency::High),
            "CRITICAL" => Some(TicketUrgency::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for TicketUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSentiment {
    Angry,
    Frustrated,
    #[default]
    Neutral,
    Satisfied,
}

impl CustomerSentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSentiment::Angry => "angry",
            CustomerSentiment::Frustrated => "frustrated",
            CustomerSentiment::Neutral => "neutral",
            CustomerSentiment::Satisfied => "satisfied",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "ANGRY" => Some(CustomerSentiment::Angry),
            "FRUSTRATED" => Some(CustomerSentiment::Frustrated),
            "NEUTRAL" => Some(CustomerSentiment::Neutral),
            "SATISFIED" => Some(CustomerSentiment::Satisfied),
            _ => None,
        }
    }
}

impl fmt::Display for CustomerSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence score, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub const HIGH: Confidence = Confidence(0.9);
    pub const MEDIUM: Confidence = Confidence(0.5);
    pub const LOW: Confidence = Confidence(0.2);

    /// Clamps into `[0, 1]`. NaN falls back to the default.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One classification event for one ticket. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketClassification {
    category: TicketCategory,
    urgency: TicketUrgency,
    sentiment: CustomerSentiment,
    confidence: Confidence,
    key_information: Vec<String>,
    suggested_action: String,
}

impl TicketClassification {
    pub fn new(
        category: TicketCategory,
        urgency: TicketUrgency,
        sentiment: CustomerSentiment,
        confidence: f64,
        key_information: Vec<String>,
        suggested_action: String,
    ) -> Self {
        Self {
            category,
            urgency,
            sentiment,
            confidence: Confidence::new(confidence),
            key_information,
            suggested_action,
        }
    }

    pub fn category(&self) -> TicketCategory {
        self.category
    }

    pub fn urgency(&self) -> TicketUrgency {
        self.urgency
    }

    pub fn sentiment(&self) -> CustomerSentiment {
        self.sentiment
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn key_information(&self) -> &[String] {
        &self.key_information
    }

    pub fn key_information_joined(&self) -> String {
        self.key_information().join(", ")
    }

    pub fn suggested_action(&self) -> &str {
        &self.suggested_action
    }
}

impl Default for TicketClassification {
    fn default() -> Self {
        Self {
            category: TicketCategory::default(),
            urgency: TicketUrgency::default(),
            sentiment: CustomerSentiment::default(),
            confidence: Confidence::default(),
            key_information: Vec::new(),
            suggested_action: DEFAULT_SUGGESTED_ACTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_confidence_into_unit_interval() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.3).value(), 0.0);
        assert_eq!(Confidence::new(0.42).value(), 0.42);
        assert_eq!(Confidence::new(f64::NAN), Confidence::default());
    }

    #[test]
    fn looks_up_symbolic_names() {
        assert_eq!(
            TicketCategory::from_symbol("TECHNICAL_SUPPORT"),
            Some(TicketCategory::TechnicalSupport)
        );
        assert_eq!(TicketCategory::from_symbol("technical_support"), None);
        assert_eq!(
            TicketUrgency::from_symbol("CRITICAL"),
            Some(TicketUrgency::Critical)
        );
        assert_eq!(TicketUrgency::from_symbol("URGENT"), None);
        assert_eq!(
            CustomerSentiment::from_symbol("FRUSTRATED"),
            Some(CustomerSentiment::Frustrated)
        );
        assert_eq!(CustomerSentiment::from_symbol("HAPPY"), None);
    }

    #[test]
    fn orders_urgency_levels() {
        assert!(TicketUrgency::Low < TicketUrgency::Medium);
        assert!(TicketUrgency::High < TicketUrgency::Critical);
    }

    #[test]
    fn default_record_uses_fallback_values() {
        let record = TicketClassification::default();
        assert_eq!(record.category(), TicketCategory::Other);
        assert_eq!(record.urgency(), TicketUrgency::Low);
        assert_eq!(record.sentiment(), CustomerSentiment::Neutral);
        assert_eq!(record.confidence().value(), 0.5);
        assert!(record.key_information().is_empty());
        assert_eq!(record.suggested_action(), "no action suggested");
    }

    #[test]
    fn constructor_clamps_confidence() {
        let record = TicketClassification::new(
            TicketCategory::Billing,
            TicketUrgency::High,
            CustomerSentiment::Angry,
            3.0,
            vec![],
            "refund".to_string(),
        );
        assert_eq!(record.confidence().value(), 1.0);
    }

    #[test]
    fn serializes_wire_values() {
        let record = TicketClassification::new(
            TicketCategory::OrderIssue,
            TicketUrgency::Critical,
            CustomerSentiment::Satisfied,
            0.9,
            vec!["order #123".to_string(), "blue mug".to_string()],
            "ship replacement".to_string(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "order_issue");
        assert_eq!(json["urgency"], "critical");
        assert_eq!(json["sentiment"], "satisfied");
        assert_eq!(json["confidence"], 0.9);
        assert_eq!(json["key_information"][1], "blue mug");
        assert_eq!(record.key_information_joined(), "order #123, blue mug");
    }
}
