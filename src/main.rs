use std::io::{Write, stderr, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;

use askql::app::action::Action;
use askql::app::completion::{CompletionEngine, CompletionKind};
use askql::app::edit_state::{EditState, char_count};
use askql::app::effect::Effect;
use askql::app::effect_runner::EffectRunner;
use askql::app::ports::QueryExecutor;
use askql::app::reducer::reduce;
use askql::app::schema_context;
use askql::app::schema_session::{SchemaSession, SchemaSnapshot};
use askql::app::state::AppState;
use askql::app::Translator;
use askql::error;
use askql::infra::adapters::{HttpAiClient, PostgresAdapter};
use askql::infra::config::{AppConfig, paths};
use askql::logging::{self, LogTarget};
use askql::ui::adapters::TuiRenderer;
use askql::ui::event::handler::handle_event;
use askql::ui::tui::TuiSession;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PostgreSQL connection string; overrides ASKQL_DSN, DATABASE_URL and the config file
    #[arg(long, global = true)]
    dsn: Option<String>,

    /// Config file (default: <config_dir>/askql/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one question and print the generated SQL
    Ask {
        question: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Run the generated query and print its rows
        #[arg(long)]
        execute: bool,
    },
    /// Print the schema description sent to the AI
    Context,
    /// Print the suggestions the editor would offer
    Complete {
        buffer: String,
        /// Cursor offset in characters (default: end of buffer)
        #[arg(long)]
        cursor: Option<usize>,
    },
}

struct Services {
    config: AppConfig,
    dsn: Option<String>,
    postgres: Arc<PostgresAdapter>,
    translator: Arc<Translator>,
    session: Arc<SchemaSession>,
}

impl Services {
    fn build(args: &Args) -> Result<Self> {
        let config_path = args
            .config
            .clone()
            .or_else(paths::default_config_path)
            .ok_or_else(|| eyre!("could not find config directory; pass --config"))?;
        let config = AppConfig::load(&config_path)?;

        let env = |name: &str| std::env::var(name).ok();
        let dsn = config.resolve_dsn(args.dsn.as_deref(), env);
        let api_key = config.api_key(env);
        if api_key.is_none() {
            tracing::warn!(var = config.api_key_env(), "AI API key is not set");
        }

        let ai = HttpAiClient::new(
            config.ai.provider,
            config.ai.model.clone(),
            api_key,
            Duration::from_secs(config.ai.timeout_secs),
        )?;
        let translator = Translator::new(Arc::new(ai), config.context.budget());
        let postgres = PostgresAdapter::new(config.introspection.timeout_secs)
            .with_execution(config.execution.timeout_secs, config.execution.read_only);

        Ok(Self {
            config,
            dsn,
            postgres: Arc::new(postgres),
            translator: Arc::new(translator),
            session: Arc::new(SchemaSession::new()),
        })
    }

    fn dsn(&self) -> Result<&str> {
        self.dsn
            .as_deref()
            .ok_or_else(|| eyre!("no database configured; pass --dsn or set ASKQL_DSN"))
    }

    async fn load_schema(&self) -> Result<Arc<SchemaSnapshot>> {
        let dsn = self.dsn()?;
        self.session
            .refresh(
                self.postgres.as_ref(),
                dsn,
                &self.config.context.exclude_columns,
            )
            .await
            .map_err(|e| eyre!("{e}\n{}", e.hint()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;

    let args = Args::parse();
    let target = if args.command.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    logging::init(target)?;

    let services = Services::build(&args)?;

    match args.command {
        Some(Command::Ask {
            question,
            json,
            execute,
        }) => ask(&services, &question, json, execute).await,
        Some(Command::Context) => context(&services).await,
        Some(Command::Complete { buffer, cursor }) => complete(&services, &buffer, cursor).await,
        None => run_tui(services).await,
    }
}

async fn ask(services: &Services, question: &str, json: bool, execute: bool) -> Result<()> {
    let snapshot = services.load_schema().await?;

    let result = match services.translator.translate(&snapshot.model, question).await {
        Ok(result) => result,
        Err(e) => {
            let mut err = stderr().lock();
            writeln!(err, "{}\n{}", e.summary(), e.hint())?;
            if let Some(raw) = e.raw_response() {
                writeln!(err, "\nModel reply:\n{raw}")?;
            }
            return Err(e.into());
        }
    };

    let rows = if execute {
        match services.postgres.execute(services.dsn()?, &result.sql_query).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                let mut err = stderr().lock();
                writeln!(err, "{}\n{}", e.summary(), e.hint())?;
                if let Some(details) = e.details() {
                    writeln!(err, "\n{details}")?;
                }
                return Err(e.into());
            }
        }
    } else {
        None
    };

    let mut out = stdout().lock();
    if json {
        let value = match &rows {
            Some(rows) => serde_json::json!({ "translation": result, "result": rows }),
            None => serde_json::to_value(&result)?,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{}", result.sql_query)?;
    writeln!(out)?;
    for line in result.explanation.lines() {
        writeln!(out, "-- {line}")?;
    }
    writeln!(out, "-- source: {}", result.provenance)?;
    if let Some(rows) = rows {
        writeln!(out)?;
        if !rows.columns.is_empty() {
            writeln!(out, "{}", rows.columns.join("\t"))?;
        }
        for row in &rows.rows {
            writeln!(out, "{}", row.join("\t"))?;
        }
        writeln!(out, "-- {}", rows.summary())?;
    }
    Ok(())
}

async fn context(services: &Services) -> Result<()> {
    let snapshot = services.load_schema().await?;
    let text = schema_context::render(&snapshot.model, services.translator.budget());
    write!(stdout().lock(), "{text}")?;
    Ok(())
}

async fn complete(services: &Services, buffer: &str, cursor: Option<usize>) -> Result<()> {
    let snapshot = services.load_schema().await?;
    let cursor = cursor.unwrap_or_else(|| char_count(buffer));
    let edit = EditState::analyze(buffer, cursor)
        .ok_or_else(|| eyre!("cursor {cursor} is past the end of the buffer"))?;

    let engine = CompletionEngine::new();
    if !engine.should_suggest(&edit) {
        return Ok(());
    }

    let mut out = stdout().lock();
    for candidate in engine.candidates(&snapshot.index, &edit) {
        let kind = match candidate.kind {
            CompletionKind::Keyword => "keyword",
            CompletionKind::Table => "table",
            CompletionKind::Column => "column",
        };
        writeln!(out, "{}\t{kind}", candidate.text)?;
    }
    Ok(())
}

async fn run_tui(services: Services) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(256);

    let effect_runner = EffectRunner::new(
        Arc::clone(&services.postgres) as _,
        Arc::clone(&services.postgres) as _,
        Arc::clone(&services.translator),
        Arc::clone(&services.session),
        services.config.context.exclude_columns.clone(),
        action_tx.clone(),
    );

    let mut state = AppState::new(services.dsn.clone());

    let mut tui = TuiSession::new()?;
    tui.enter()?;

    let initial_size = tui.terminal().size()?;
    state.terminal_height = initial_size.height;

    let result = async {
        loop {
            tokio::select! {
                Some(event) = tui.next_event() => {
                    let action = handle_event(event, &state);
                    if !matches!(action, Action::None) {
                        let _ = action_tx.send(action).await;
                    }
                }
                Some(action) = action_rx.recv() => {
                    let now = Instant::now();
                    let mut effects = reduce(&mut state, action, now);

                    if state.is_dirty() && !effects.iter().any(|e| matches!(e, Effect::Render)) {
                        effects.push(Effect::Render);
                    }

                    let mut renderer = TuiRenderer::new(&mut tui);
                    effect_runner.run(effects, &mut renderer, &state)?;
                    state.clear_dirty();
                }
            }

            if state.should_quit {
                break;
            }
        }
        Ok::<(), color_eyre::eyre::Report>(())
    }
    .await;

    tui.exit()?;
    result
}
