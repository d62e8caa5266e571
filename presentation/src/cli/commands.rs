//! CLI command definitions

use agentm_application::ErrorReporting;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for agent results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Which failure a list operation reports when several items fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ErrorReportingArg {
    /// The first failure to settle
    #[default]
    FirstSettled,
    /// The failure with the lowest item index
    LowestIndex,
}

impl From<ErrorReportingArg> for ErrorReporting {
    fn from(arg: ErrorReportingArg) -> Self {
        match arg {
            ErrorReportingArg::FirstSettled => ErrorReporting::FirstSettled,
            ErrorReportingArg::LowestIndex => ErrorReporting::LowestIndex,
        }
    }
}

/// CLI arguments for agentm
#[derive(Parser, Debug)]
#[command(name = "agentm")]
#[command(author, version, about = "Run LLM micro-agents over lists of items")]
#[command(long_about = r#"
agentm applies one goal to every item of a list with a language model:
classify, filter, map, project, summarize, sort or reduce. Items are read
one per line from a file or from stdin.

Configuration files are loaded from (in priority order):
1. AGENTM_* environment variables (e.g. AGENTM_PROVIDER__MODEL)
2. --config <path>     Explicit config file
3. ./agentm.toml       Project-level config
4. ~/.config/agentm/config.toml   Global config

Example:
  agentm classify "Is this food healthy?" -c healthy -c unhealthy -i foods.txt
  cat reviews.txt | agentm -j 4 summarize "Summarize the review in one sentence"
  agentm sort "Order from smallest to largest animal" -i animals.txt
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Maximum number of completions in flight at once
    #[arg(short = 'j', long, value_name = "N", global = true)]
    pub parallel: Option<usize>,

    /// Model to use (overrides provider.model)
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Which failure to report when several items fail
    #[arg(long, value_enum, default_value = "first-settled", global = true)]
    pub error_reporting: ErrorReportingArg,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

/// Goal, input and instructions shared by every list agent
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// What the agent should do with each item
    pub goal: String,

    /// File with one item per line (stdin when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Extra instructions appended to the system prompt
    #[arg(long, value_name = "TEXT")]
    pub instructions: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign each item one of the given categories
    Classify {
        #[command(flatten)]
        list: ListArgs,

        /// Allowed category (repeatable)
        #[arg(short, long = "category", value_name = "NAME", required = true)]
        categories: Vec<String>,
    },

    /// Answer a yes/no question for each item
    BinaryClassify {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Keep the items the model does not remove
    Filter {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Transform each item into a JSON object
    Map {
        #[command(flatten)]
        list: ListArgs,

        /// Example output object, e.g. '{"name": "", "year": 0}'
        #[arg(long, value_name = "JSON", conflicts_with = "schema")]
        shape: Option<String>,

        /// JSON schema file for the output object
        #[arg(long, value_name = "PATH")]
        schema: Option<PathBuf>,
    },

    /// Rewrite each item following a template
    Project {
        #[command(flatten)]
        list: ListArgs,

        /// Template describing the projection
        #[arg(short, long, value_name = "TEXT")]
        template: String,
    },

    /// Summarize each item
    Summarize {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Order the items with pairwise model comparisons
    Sort {
        #[command(flatten)]
        list: ListArgs,

        /// Log every comparison with its explanation
        #[arg(long)]
        log_explanations: bool,
    },

    /// Fold the items into one JSON value
    Reduce {
        #[command(flatten)]
        list: ListArgs,

        /// Initial accumulator object
        #[arg(long, value_name = "JSON", default_value = "{\"result\": \"\"}")]
        initial: String,

        /// JSON schema file for the accumulator
        #[arg(long, value_name = "PATH")]
        schema: Option<PathBuf>,

        /// Maximum history messages kept between steps
        #[arg(long, value_name = "N")]
        max_history: Option<usize>,
    },

    /// Answer a question with step-by-step reasoning
    Ask {
        question: String,

        /// Print the reasoning with the answer
        #[arg(long)]
        explain: bool,
    },

    /// Answer a question using only the given context
    Answer {
        question: String,

        /// File holding the context (stdin when omitted)
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,

        /// Print the reasoning with the answer
        #[arg(long)]
        explain: bool,
    },

    /// Generate one JSON object that matches a schema
    Generate {
        goal: String,

        /// JSON schema file for the object
        #[arg(long, value_name = "PATH")]
        schema: PathBuf,

        /// File with reference material
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,
    },

    /// Show recorded token usage and cost
    Usage {
        /// Restrict to one session
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Show configuration sources and the effective configuration
    ShowConfig,
}

impl Command {
    /// Shared list arguments, for the list agents.
    pub fn list_args(&self) -> Option<&ListArgs> {
        match self {
            Command::Classify { list, .. }
            | Command::BinaryClassify { list }
            | Command::Filter { list }
            | Command::Map { list, .. }
            | Command::Project { list, .. }
            | Command::Summarize { list }
            | Command::Sort { list, .. }
            | Command::Reduce { list, .. } => Some(list),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from([
            "agentm", "-j", "4", "classify", "Is it healthy?", "-c", "healthy", "-c",
            "unhealthy", "-i", "foods.txt",
        ])
        .unwrap();

        assert_eq!(cli.parallel, Some(4));
        match cli.command {
            Command::Classify { list, categories } => {
                assert_eq!(list.goal, "Is it healthy?");
                assert_eq!(list.input, Some(PathBuf::from("foods.txt")));
                assert_eq!(categories, vec!["healthy", "unhealthy"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "agentm", "sort", "by size", "--output", "json", "-vv", "--error-reporting",
            "lowest-index",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.error_reporting, ErrorReportingArg::LowestIndex);
        assert!(cli.command.list_args().is_some());
    }

    #[test]
    fn test_classify_requires_categories() {
        let result = Cli::try_parse_from(["agentm", "classify", "goal"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_map_shape_conflicts_with_schema() {
        let result = Cli::try_parse_from([
            "agentm", "map", "goal", "--shape", "{}", "--schema", "s.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_show_config_has_no_list_args() {
        let cli = Cli::try_parse_from(["agentm", "show-config"]).unwrap();
        assert!(cli.command.list_args().is_none());
    }
}
