use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::cache::ReplyCache;
use crate::context::AppContext;
use crate::domain::classification::TicketClassification;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::export::{DEFAULT_EXPORT_PATH, write_csv};
use crate::workflow::classify::{classify_reply, classify_ticket};

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Print the classification as JSON.
    #[arg(long)]
    pub json: bool,
    /// Save the result as a one-row CSV file.
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXPORT_PATH
    )]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Ticket text. Read from --file or stdin when omitted.
    pub text: Option<String>,
    /// Read the ticket text from a file.
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// Always ask the model, ignoring and not updating the reply cache.
    #[arg(long)]
    pub no_cache: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Read the raw model reply from a file instead of stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run(ctx: &AppContext, args: ClassifyArgs) -> AppResult<()> {
    let text = match args.text {
        Some(text) => text,
        None => read_input(args.file.as_deref())?,
    };
    let ticket = Ticket::new(text)?;

    let mut cache = if args.no_cache || !ctx.config.cache_enabled {
        None
    } else {
        Some(ReplyCache::load()?)
    };

    let outcome = classify_ticket(ctx, ticket, cache.as_mut()).await?;
    if outcome.from_cache {
        info!("classification served from cached reply");
    }

    emit(&outcome.classification, outcome.ticket.text(), &args.output)
}

pub fn run_parse(args: ParseArgs) -> AppResult<()> {
    let reply = read_input(args.file.as_deref())?;
    let classification = classify_reply(&reply);
    emit(&classification, "", &args.output)
}

fn read_input(file: Option<&Path>) -> AppResult<String> {
    if let Some(path) = file {
        return Ok(fs::read_to_string(path)?);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Reading from stdin; finish with Ctrl-D.");
    }
    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    Ok(input)
}

fn emit(
    classification: &TicketClassification,
    ticket_text: &str,
    output: &OutputArgs,
) -> AppResult<()> {
    if output.json {
        let json = serde_json::to_string_pretty(classification)
            .map_err(|err| AppError::Export(format!("failed to render JSON: {err}")))?;
        println!("{json}");
    } else {
        print!("{}", render(classification));
    }

    if let Some(path) = &output.export {
        write_csv(path, ticket_text, classification)?;
        eprintln!("Results saved to {}", path.display());
    }
    Ok(())
}

fn render(classification: &TicketClassification) -> String {
    format!(
        "Classification Results\n\
         Category: {}\n\
         Urgency: {}\n\
         Sentiment: {}\n\
         Confidence: {}\n\
         Key Information: {}\n\
         Suggested Action: {}\n",
        classification.category(),
        classification.urgency(),
        classification.sentiment(),
        classification.confidence(),
        classification.key_information_joined(),
        classification.suggested_action(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reply::parse_reply;

    #[test]
    fn renders_every_field() {
        let classification = parse_reply(
            "Category: billing\nUrgency: medium\nKey Information: A\nKey Information: B",
        );
        assert_eq!(
            render(&classification),
            "Classification Results\n\
             Category: billing\n\
             Urgency: medium\n\
             Sentiment: neutral\n\
             Confidence: 0.5\n\
             Key Information: A, B\n\
             Suggested Action: no action suggested\n"
        );
    }

    #[test]
    fn rendered_output_parses_back_to_same_enums() {
        let classification = parse_reply("Category: product inquiry\nSentiment: angry\nUrgency: low");
        let reparsed = parse_reply(&render(&classification));
        // "product_inquiry" keeps its underscore, which the category lookup accepts.
        assert_eq!(reparsed.category(), classification.category());
        assert_eq!(reparsed.sentiment(), classification.sentiment());
        assert_eq!(reparsed.urgency(), classification.urgency());
    }

    #[test]
    fn reads_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.txt");
        fs::write(&path, "Category: billing\n").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "Category: billing\n");
    }
}
