use crate::error::{AppError, AppResult};

/// Free-text customer support inquiry submitted for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    text: String,
}

impl Ticket {
    pub fn new(text: impl Into<String>) -> AppResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "please enter a customer care ticket".to_string(),
            ));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_ticket() {
        assert!(matches!(Ticket::new(""), Err(AppError::InvalidInput(_))));
        assert!(matches!(Ticket::new(" \n\t"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn keeps_ticket_text_verbatim() {
        let ticket = Ticket::new("  My order #12 never arrived\n").unwrap();
        assert_eq!(ticket.text(), "  My order #12 never arrived\n");
    }
}
