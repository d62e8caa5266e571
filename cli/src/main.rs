//! CLI entrypoint for agentm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agentm_application::{
    AgentOptions, BinaryClassifyListInput, BinaryClassifyListUseCase, ChainOfThoughtInput,
    ChainOfThoughtUseCase, ClassifyListInput, ClassifyListUseCase, FilterListInput,
    FilterListUseCase, GenerateObjectInput, GenerateObjectUseCase, GroundedAnswerInput,
    GroundedAnswerUseCase, MapListInput, MapListUseCase, MapOutput, NoProgress, NoUsageRecorder,
    ProgressNotifier, ProjectListInput, ProjectListUseCase, ProviderCompletionClient,
    ReduceListInput, ReduceListUseCase, ShouldContinue, SortListInput, SortListUseCase,
    SummarizeListInput, SummarizeListUseCase, UsageRecorder,
};
use agentm_domain::{AgentError, OutputSchema};
use agentm_infrastructure::{
    ConfigLoader, FileConfig, FileUsageConfig, JsonlUsageStore, OpenAiChatProvider,
    SqliteUsageStore, UsageBackend,
};
use agentm_presentation::{
    Cli, Command, ConsoleFormatter, ListArgs, OutputFormat, ProgressReporter, SimpleProgress,
    read_items, read_text,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde_json::Value;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Client = ProviderCompletionClient<OpenAiChatProvider>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AgentError>() {
                Some(agent_err) => eprintln!("{}", ConsoleFormatter::format_error(agent_err)),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(&cli);
    info!("Starting agentm");

    let config = load_config(&cli)?;

    match &cli.command {
        Command::ShowConfig => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!();
            println!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Usage { session } => return show_usage(&config, session.as_deref(), cli.output),
        _ => {}
    }

    // === Dependency Injection ===
    let provider = Arc::new(OpenAiChatProvider::new(&config.provider)?);
    let session_id = config
        .usage
        .session_id
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y%m%dT%H%M%S%3f").to_string());
    let model = config.provider.model.clone();
    let client = Arc::new(
        ProviderCompletionClient::new(provider, model.clone())
            .with_retry_malformed_output(config.agents.retry_malformed_output)
            .with_usage_recorder(usage_recorder(&config.usage), session_id.clone())
            .with_pricing(config.pricing_for(&model)),
    );
    info!(model = %model, session_id = %session_id, "Completion client ready");

    // Ctrl-C stops new completions; calls already in flight finish.
    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, not starting new completions");
            on_interrupt.cancel();
        }
    });

    let options = AgentOptions::default()
        .with_temperature(config.agents.temperature)
        .with_max_tokens(config.agents.max_tokens)
        .with_parallel_completions(config.agents.parallel_completions)
        .with_error_reporting(cli.error_reporting.into())
        .with_should_continue(ShouldContinue::from_token(cancellation));

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = execute(&cli, &config, client, options, progress.as_ref()).await?;
    println!("{}", output);

    Ok(())
}

fn init_logging(cli: &Cli) {
    // Sort explanations are logged at info
    let verbose = match cli.command {
        Command::Sort {
            log_explanations: true,
            ..
        } => cli.verbose.max(1),
        _ => cli.verbose,
    };

    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
    if let Some(parallel) = cli.parallel {
        config.agents.parallel_completions = parallel;
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            warn!("Invalid configuration: {}", issue);
        }
        bail!(
            "invalid configuration: {}",
            issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        );
    }

    Ok(config)
}

/// Usage store for the configured backend, or a no-op recorder when
/// accounting is disabled or the store cannot be opened.
fn usage_recorder(usage: &FileUsageConfig) -> Arc<dyn UsageRecorder> {
    if !usage.enabled {
        return Arc::new(NoUsageRecorder);
    }
    let Some(path) = usage.resolved_path() else {
        warn!("No data directory for the usage store; usage will not be recorded");
        return Arc::new(NoUsageRecorder);
    };

    let opened: Result<Arc<dyn UsageRecorder>, _> = match usage.backend {
        UsageBackend::Sqlite => {
            SqliteUsageStore::open(&path).map(|s| Arc::new(s) as Arc<dyn UsageRecorder>)
        }
        UsageBackend::Jsonl => {
            JsonlUsageStore::open(&path).map(|s| Arc::new(s) as Arc<dyn UsageRecorder>)
        }
    };
    opened.unwrap_or_else(|e| {
        warn!(
            "Could not open {} usage store at {}: {}",
            usage.backend,
            path.display(),
            e
        );
        Arc::new(NoUsageRecorder)
    })
}

fn show_usage(config: &FileConfig, session: Option<&str>, format: OutputFormat) -> Result<()> {
    if config.usage.backend != UsageBackend::Sqlite {
        bail!("usage summaries need the sqlite usage backend");
    }
    let path = config
        .usage
        .resolved_path()
        .context("no data directory for the usage store")?;
    let store = SqliteUsageStore::open(&path)?;
    let summary = store.summary(session)?;

    let output = match format {
        OutputFormat::Json => ConsoleFormatter::format_json(&summary),
        OutputFormat::Text => ConsoleFormatter::format_usage(&summary),
    };
    println!("{}", output);
    Ok(())
}

fn list_input(list: &ListArgs, options: &AgentOptions) -> Result<(Vec<String>, AgentOptions)> {
    let items = read_items(list.input.as_deref()).context("failed to read items")?;
    let options = match &list.instructions {
        Some(instructions) => options.clone().with_instructions(instructions.clone()),
        None => options.clone(),
    };
    Ok((items, options))
}

fn parse_json(text: &str, what: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{} is not valid JSON", what))
}

/// Read a schema file: either a full `{name, schema, ...}` definition or a
/// bare JSON schema named after the file.
fn load_schema(path: &Path) -> Result<OutputSchema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let value = parse_json(&text, "schema")?;

    if value.get("name").is_some() && value.get("schema").is_some() {
        return serde_json::from_value(value).context("invalid schema definition");
    }
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string();
    Ok(OutputSchema::new(name, value))
}

async fn execute(
    cli: &Cli,
    config: &FileConfig,
    client: Arc<Client>,
    options: AgentOptions,
    progress: &dyn ProgressNotifier,
) -> Result<String> {
    let json = cli.output == OutputFormat::Json;

    let output = match &cli.command {
        Command::Classify { list, categories } => {
            let (items, options) = list_input(list, &options)?;
            let input = ClassifyListInput::new(list.goal.clone(), items, categories.clone())
                .with_options(options);
            let result = ClassifyListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_classified(&result)
            }
        }
        Command::BinaryClassify { list } => {
            let (items, options) = list_input(list, &options)?;
            let input = BinaryClassifyListInput::new(list.goal.clone(), items).with_options(options);
            let result = BinaryClassifyListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_binary_classified(&result)
            }
        }
        Command::Filter { list } => {
            let (items, options) = list_input(list, &options)?;
            let input = FilterListInput::new(list.goal.clone(), items).with_options(options);
            let result = FilterListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_list(&result)
            }
        }
        Command::Map {
            list,
            shape,
            schema,
        } => {
            let output = match (shape, schema) {
                (Some(shape), _) => MapOutput::Shape(parse_json(shape, "--shape")?),
                (None, Some(path)) => MapOutput::Schema(load_schema(path)?),
                (None, None) => bail!("map needs --shape or --schema"),
            };
            let (items, options) = list_input(list, &options)?;
            let input = MapListInput::new(list.goal.clone(), items, output).with_options(options);
            let result = MapListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_mapped(&result)
            }
        }
        Command::Project { list, template } => {
            let (items, options) = list_input(list, &options)?;
            let input = ProjectListInput::new(list.goal.clone(), items, template.clone())
                .with_options(options);
            let result = ProjectListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_projected(&result)
            }
        }
        Command::Summarize { list } => {
            let (items, options) = list_input(list, &options)?;
            let input = SummarizeListInput::new(list.goal.clone(), items).with_options(options);
            let result = SummarizeListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_summarized(&result)
            }
        }
        Command::Sort {
            list,
            log_explanations,
        } => {
            let (items, options) = list_input(list, &options)?;
            let input = SortListInput::new(list.goal.clone(), items)
                .with_options(options.with_log_explanations(*log_explanations));
            let result = SortListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_list(&result)
            }
        }
        Command::Reduce {
            list,
            initial,
            schema,
            max_history,
        } => {
            let initial_value = parse_json(initial, "--initial")?;
            let (items, options) = list_input(list, &options)?;
            let mut input = ReduceListInput::new(list.goal.clone(), items, initial_value)
                .with_max_history(max_history.unwrap_or(config.agents.max_history))
                .with_options(options);
            if let Some(path) = schema {
                input = input.with_schema(load_schema(path)?);
            }
            let result = ReduceListUseCase::new(client)
                .execute_with_progress(input, progress)
                .await?;
            if json {
                ConsoleFormatter::format_json(&result)
            } else {
                ConsoleFormatter::format_value(&result)
            }
        }
        Command::Ask { question, explain } => {
            let input = ChainOfThoughtInput::new(question.clone()).with_options(options);
            let answer = ChainOfThoughtUseCase::new(client).execute(input).await?;
            if json {
                ConsoleFormatter::format_json(&answer)
            } else {
                ConsoleFormatter::format_answer(&answer, *explain)
            }
        }
        Command::Answer {
            question,
            context,
            explain,
        } => {
            let context = read_text(context.as_deref()).context("failed to read context")?;
            let input = GroundedAnswerInput::new(question.clone(), context).with_options(options);
            let answer = GroundedAnswerUseCase::new(client).execute(input).await?;
            if json {
                ConsoleFormatter::format_json(&answer)
            } else {
                ConsoleFormatter::format_answer(&answer, *explain)
            }
        }
        Command::Generate {
            goal,
            schema,
            context,
        } => {
            let mut input =
                GenerateObjectInput::new(goal.clone(), load_schema(schema)?).with_options(options);
            if let Some(path) = context {
                input = input.with_context(read_text(Some(path)).context("failed to read context")?);
            }
            let value = GenerateObjectUseCase::new(client).execute(input).await?;
            ConsoleFormatter::format_json(&value)
        }
        Command::Usage { .. } | Command::ShowConfig => {
            bail!("this command does not run an agent")
        }
    };

    Ok(output)
}
