//! sqlquiz - SQL quizzes graded against your own SQLite database.

mod cli;

use cli::{Cli, Command};
use sql_quizzer::config::Config;
use sql_quizzer::error::{QuizError, Result};
use sql_quizzer::grading::grade_quiz;
use sql_quizzer::quiz::{generate_quiz, FileQuizGenerator, QuizRequest};
use sql_quizzer::session::SessionContext;
use sql_quizzer::{logging, output};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    logging::init(logging::LogTarget::from_flag(cli.log_file));

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let options = config.session_options(cli.working_copy.as_deref());
    let mut context = SessionContext::new(options);

    let bytes = tokio::fs::read(cli.database()).await.map_err(|e| {
        QuizError::io(format!(
            "Failed to read {}: {e}",
            cli.database().display()
        ))
    })?;
    context.load(&bytes).await?;

    let result = dispatch(&cli.command, &context, &config).await;
    context.unload().await?;
    result
}

async fn dispatch(command: &Command, context: &SessionContext, config: &Config) -> Result<()> {
    let session = context.session()?;

    match command {
        Command::Schema { .. } => {
            println!("{}", output::format_session(session));
        }
        Command::Run { sql, .. } => {
            let result = session.execute(sql).await?;
            println!("{}", output::format_result(&result));
        }
        Command::Grade { model, answer, .. } => {
            let outcome = session.grade(model, answer).await;
            println!("{}", output::format_outcome(&outcome));
        }
        Command::Quiz { questions, .. } => {
            let generator = FileQuizGenerator::new(questions);
            let request =
                QuizRequest::from_session(session, &config.quiz.topics, config.quiz.num_questions);
            let items = generate_quiz(session, &generator, &request)
                .await
                .into_items()?;

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut answers = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                println!("Question {}: {}", i + 1, item.question);
                match lines.next_line().await? {
                    Some(line) => answers.push(line),
                    None => break,
                }
            }

            let report = grade_quiz(session, &items, &answers).await;
            println!("\n{}", output::format_report(&items, &report));
        }
    }

    Ok(())
}
