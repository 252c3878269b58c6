use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use quizdesk::{db::Db, names, Category, EditOp, Existing, Session, SessionSettings, SubmitOutcome};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL server address, or `file:<path>` for a local database.
    #[arg(long, env)]
    url: String,

    /// libSQL authentication token.
    #[arg(long, env, default_value = "")]
    auth_token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or edit one question by applying a JSON list of edits.
    Author {
        #[arg(short, long)]
        category: Category,

        #[arg(short, long)]
        test_id: String,

        /// Edit the stored question with this id instead of creating one.
        #[arg(long)]
        id: Option<i64>,

        /// File holding a JSON array of edit operations.
        #[arg(short, long)]
        edits: PathBuf,

        /// Credential for grammar writes.
        #[arg(long, env = "GRAMMAR_BEARER")]
        bearer: Option<String>,

        /// Seconds to wait for the database on submit. 0 waits indefinitely.
        #[arg(long, env, default_value_t = names::DEFAULT_SUBMIT_TIMEOUT_SECS)]
        submit_timeout_secs: u64,
    },
    /// Print the saved questions of a test.
    List {
        #[arg(short, long)]
        category: Category,

        #[arg(short, long)]
        test_id: String,
    },
    /// Issue a bearer credential for grammar writes.
    IssueToken,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,quizdesk=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let db = Db::new(args.url, args.auth_token).await?;

    match args.command {
        Command::Author {
            category,
            test_id,
            id,
            edits,
            bearer,
            submit_timeout_secs,
        } => {
            let edits = std::fs::read_to_string(&edits)
                .wrap_err_with(|| format!("could not read {}", edits.display()))?;
            let edits: Vec<EditOp> =
                serde_json::from_str(&edits).wrap_err("could not decode edit operations")?;

            let timeout = (submit_timeout_secs > 0).then(|| Duration::from_secs(submit_timeout_secs));
            let mut settings = SessionSettings::new(category, test_id).with_submit_timeout(timeout);
            if let Some(bearer) = bearer {
                settings = settings.with_bearer(bearer);
            }

            let session = Session::new(settings, Arc::new(db));
            session.open(id.map(|id| Existing::Fetch { id })).await?;
            for op in edits {
                session.apply(op)?;
            }

            match session.submit().await? {
                SubmitOutcome::Saved(saved) => {
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                }
                SubmitOutcome::Invalid(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("question has {} invalid fields", errors.len());
                }
                SubmitOutcome::Discarded => bail!("session closed before the question was saved"),
            }
        }
        Command::List { category, test_id } => {
            let saved = db.list_for_test(category, &test_id).await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        Command::IssueToken => {
            println!("{}", db.create_admin_session().await?);
        }
    }

    Ok(())
}
