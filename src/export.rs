use std::path::Path;

use serde::Serialize;

use crate::domain::classification::TicketClassification;
use crate::error::{AppError, AppResult};

pub const DEFAULT_EXPORT_PATH: &str = "classified_ticket.csv";

/// One flat row per ticket.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    review_text: &'a str,
    category: &'static str,
    urgency: &'static str,
    sentiment: &'static str,
    confidence: f64,
    key_information: String,
    suggested_action: &'a str,
}

impl<'a> ExportRow<'a> {
    fn new(ticket_text: &'a str, classification: &'a TicketClassification) -> Self {
        Self {
            review_text: ticket_text,
            category: classification.category().as_str(),
            urgency: classification.urgency().as_str(),
            sentiment: classification.sentiment().as_str(),
            confidence: classification.confidence().value(),
            key_information: classification.key_information_joined(),
            suggested_action: classification.suggested_action(),
        }
    }
}

/// Overwrites `path` with a header and a single row.
pub fn write_csv(
    path: &Path,
    ticket_text: &str,
    classification: &TicketClassification,
) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| AppError::Export(format!("cannot open {}: {err}", path.display())))?;
    writer
        .serialize(ExportRow::new(ticket_text, classification))
        .map_err(|err| AppError::Export(format!("failed to write row: {err}")))?;
    writer.flush()?;
    Ok(())
}
