//! Line-oriented parsing of a model reply into a [`TicketClassification`].
//!
//! Each line is checked against the label table in order; the first label the
//! line contains decides which field the line feeds, even when its value turns
//! out to be unusable. Unrecognized values leave the field at its running value.

use tracing::debug;

use crate::domain::classification::{
    Confidence, CustomerSentiment, DEFAULT_SUGGESTED_ACTION, TicketCategory,
    TicketClassification, TicketUrgency,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    Category,
    Urgency,
    Sentiment,
    Confidence,
    KeyInformation,
    SuggestedAction,
}

const FIELD_RULES: [(&str, FieldRule); 6] = [
    ("Category", FieldRule::Category),
    ("Urgency", FieldRule::Urgency),
    ("Sentiment", FieldRule::Sentiment),
    ("Confidence", FieldRule::Confidence),
    ("Key Information", FieldRule::KeyInformation),
    ("Suggested Action", FieldRule::SuggestedAction),
];

struct Accumulator {
    category: TicketCategory,
    urgency: TicketUrgency,
    sentiment: CustomerSentiment,
    confidence: Confidence,
    key_information: Vec<String>,
    suggested_action: String,
}

impl Accumulator {
    fn seeded() -> Self {
        Self {
            category: TicketCategory::default(),
            urgency: TicketUrgency::default(),
            sentiment: CustomerSentiment::default(),
            confidence: Confidence::default(),
            key_information: Vec::new(),
            suggested_action: DEFAULT_SUGGESTED_ACTION.to_string(),
        }
    }

    /// Returns whether the value was accepted.
    fn apply(&mut self, rule: FieldRule, value: &str) -> bool {
        match rule {
            FieldRule::Category => {
                let symbol = value.replace(' ', "_").to_uppercase();
                match TicketCategory::from_symbol(&symbol) {
                    Some(category) => self.category = category,
                    None => return false,
                }
            }
            FieldRule::Urgency => match TicketUrgency::from_symbol(&value.to_uppercase()) {
                Some(urgency) => self.urgency = urgency,
                None => return false,
            },
            FieldRule::Sentiment => match CustomerSentiment::from_symbol(&value.to_uppercase()) {
                Some(sentiment) => self.sentiment = sentiment,
                None => return false,
            },
            FieldRule::Confidence => match confidence_bucket(value) {
                Some(confidence) => self.confidence = confidence,
                None => return false,
            },
            FieldRule::KeyInformation => self.key_information.push(value.to_string()),
            FieldRule::SuggestedAction => self.suggested_action = value.to_string(),
        }
        true
    }

    fn finish(self) -> TicketClassification {
        TicketClassification::new(
            self.category,
            self.urgency,
            self.sentiment,
            self.confidence.value(),
            self.key_information,
            self.suggested_action,
        )
    }
}

/// Only the bucket words are understood; stated numbers are ignored.
fn confidence_bucket(value: &str) -> Option<Confidence> {
    match value.to_lowercase().as_str() {
        "high" => Some(Confidence::HIGH),
        "medium" => Some(Confidence::MEDIUM),
        "low" => Some(Confidence::LOW),
        _ => None,
    }
}

fn match_rule(line: &str) -> Option<FieldRule> {
    FIELD_RULES
        .iter()
        .find(|(label, _)| line.contains(label))
        .map(|(_, rule)| *rule)
}

/// Text after the last colon, trimmed. `None` without a colon or value.
fn field_value(line: &str) -> Option<&str> {
    let (_, value) = line.rsplit_once(':')?;
    let value = value.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// Line boundaries besides `\n`: carriage return, vertical tab, form feed,
/// the ASCII file/group/record separators, NEL and the Unicode line and
/// paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}'..='\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// `\r\n` counts as a single break.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|chunk| chunk.split(is_line_break))
}

/// Parses a raw model reply. Never fails: anything unrecognized keeps its default.
pub fn parse_reply(reply: &str) -> TicketClassification {
    let mut acc = Accumulator::seeded();
    let mut recognized = 0usize;

    for line in split_lines(reply) {
        let Some(rule) = match_rule(line) else {
            continue;
        };
        let Some(value) = field_value(line) else {
            continue;
        };
        if acc.apply(rule, value) {
            recognized += 1;
        }
    }

    debug!(recognized, "parsed model reply");
    acc.finish()
}
