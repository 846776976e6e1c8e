use tracing::{debug, info};

use crate::cache::ReplyCache;
use crate::context::AppContext;
use crate::domain::classification::TicketClassification;
use crate::domain::reply::parse_reply;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;
use crate::prompt::SYSTEM_PROMPT;

pub struct ClassificationOutcome {
    pub ticket: Ticket,
    pub classification: TicketClassification,
    pub from_cache: bool,
}

pub async fn classify_ticket(
    ctx: &AppContext,
    ticket: Ticket,
    cache: Option<&mut ReplyCache>,
) -> AppResult<ClassificationOutcome> {
    let model = ctx.language_model.model_id().to_string();
    let key = ReplyCache::compute_key(&model, ticket.text());

    if let Some(reply) = cache.as_ref().and_then(|cache| cache.get(&key)) {
        debug!(%model, "using cached model reply");
        let classification = classify_reply(reply);
        return Ok(ClassificationOutcome {
            ticket,
            classification,
            from_cache: true,
        });
    }

    let reply = ctx
        .language_model
        .complete(SYSTEM_PROMPT, ticket.text())
        .await?;

    if let Some(cache) = cache {
        cache.insert(key, &model, &reply);
        cache.save()?;
    }

    let classification = classify_reply(&reply);
    info!(
        %model,
        category = %classification.category(),
        urgency = %classification.urgency(),
        "ticket classified"
    );

    Ok(ClassificationOutcome {
        ticket,
        classification,
        from_cache: false,
    })
}

/// Offline path: the reply was obtained elsewhere.
pub fn classify_reply(reply: &str) -> TicketClassification {
    parse_reply(reply)
}
