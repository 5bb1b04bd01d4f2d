use answerbox::Result;
use answerbox::commands::{
    add_entry, ask, clear_suggestions, list_entries, list_suggestions, remove_entry,
    remove_suggestion,
};
use answerbox::config::{run_interactive_config, show_config};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "answerbox")]
#[command(about = "A semantic FAQ assistant that answers from a knowledge base and learns what it cannot answer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama connection and retrieval settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Ask a question
    Ask {
        /// The question text
        query: String,
    },
    /// Add a knowledge entry
    Add {
        /// The question this entry answers
        query: String,
        /// The response to give when the entry matches
        response: String,
        /// Optional tags for the entry
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List all knowledge entries
    List,
    /// Delete a knowledge entry
    Remove {
        /// Entry id to delete
        id: i64,
    },
    /// Manage unanswered-question suggestions
    Suggestions {
        #[command(subcommand)]
        command: SuggestionCommands,
    },
}

#[derive(Subcommand)]
enum SuggestionCommands {
    /// List recorded suggestions
    List,
    /// Delete a suggestion
    Remove {
        /// Suggestion id to delete
        id: i64,
    },
    /// Delete every recorded suggestion
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Ask { query } => {
            ask(&query).await?;
        }
        Commands::Add {
            query,
            response,
            tags,
        } => {
            add_entry(&query, &response, tags).await?;
        }
        Commands::List => {
            list_entries().await?;
        }
        Commands::Remove { id } => {
            remove_entry(id).await?;
        }
        Commands::Suggestions { command } => match command {
            SuggestionCommands::List => {
                list_suggestions().await?;
            }
            SuggestionCommands::Remove { id } => {
                remove_suggestion(id).await?;
            }
            SuggestionCommands::Clear => {
                clear_suggestions().await?;
            }
        },
    }

    Ok(())
}
