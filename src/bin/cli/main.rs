mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartstudy-cli", about = "SmartStudy courses, flashcards and quizzes", version)]
struct Cli {
    /// Use a specific base directory instead of locating one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all courses
    Courses,

    /// Add or delete a course
    #[command(subcommand)]
    Course(CourseCommand),

    /// Manage the contents of a course
    #[command(subcommand)]
    Content(ContentCommand),

    /// Manage the topics of a content
    #[command(subcommand)]
    Topic(TopicCommand),

    /// Show or edit a topic note
    #[command(subcommand)]
    Note(NoteCommand),

    /// Show flashcards for a content or a single topic
    Flashcards {
        /// Course name (case-insensitive prefix match) or id
        course: String,
        /// Content name
        content: String,
        /// Only this topic's deck, generated from its note if missing
        #[arg(long)]
        topic: Option<String>,
        /// Show a single card (1-based)
        #[arg(long)]
        card: Option<usize>,
        /// Rebuild the content deck from the topic decks
        #[arg(long, conflicts_with = "regenerate")]
        rebuild: bool,
        /// Regenerate the topic deck from its note
        #[arg(long, requires = "topic")]
        regenerate: bool,
    },

    /// Take a multiple-choice quiz on a content
    Quiz {
        /// Course name (case-insensitive prefix match) or id
        course: String,
        /// Content name
        content: String,
        /// Discard the cached quiz and generate a new one
        #[arg(long)]
        regenerate: bool,
    },

    /// Manage the generator API key
    #[command(subcommand)]
    Key(KeyCommand),
}

#[derive(Subcommand)]
enum CourseCommand {
    /// Create a course
    Add {
        name: String,
    },
    /// Delete a course and all of its files
    Delete {
        /// Course name or id
        course: String,
    },
}

#[derive(Subcommand)]
enum ContentCommand {
    /// List contents of a course
    List {
        course: String,
    },
    /// Add a content to a course
    Add {
        course: String,
        name: String,
    },
    /// Delete a content with its topics, notes, flashcards and quiz
    Delete {
        course: String,
        content: String,
    },
}

#[derive(Subcommand)]
enum TopicCommand {
    /// List topics of a content
    List {
        course: String,
        content: String,
    },
    /// Add a topic to a content
    Add {
        course: String,
        content: String,
        name: String,
    },
    /// Delete a topic with its note and flashcards
    Delete {
        course: String,
        content: String,
        topic: String,
    },
}

#[derive(Subcommand)]
enum NoteCommand {
    /// Print a topic note
    Show {
        course: String,
        content: String,
        topic: String,
        /// Print the stored HTML instead of plain text
        #[arg(long)]
        raw: bool,
    },
    /// Replace a topic note
    Edit {
        course: String,
        content: String,
        topic: String,
        /// Note text (use "-" or pipe stdin)
        #[arg(long)]
        text: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store the API key in the base directory
    Set {
        key: String,
    },
    /// Show where the API key comes from (masked)
    Show,
}

/// Read text from stdin if piped, or resolve "-" as stdin
fn resolve_text(text: Option<String>) -> anyhow::Result<Option<String>> {
    let read_stdin = || -> anyhow::Result<String> {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
        Ok(buf)
    };

    match text.as_deref() {
        Some("-") => Ok(Some(read_stdin()?)),
        Some(_) => Ok(text),
        None if !std::io::stdin().is_terminal() => {
            let buf = read_stdin()?;
            Ok(if buf.is_empty() { None } else { Some(buf) })
        }
        None => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;
    let format = &cli.format;

    match cli.command {
        Command::Courses => commands::courses::run_list(&app, format, use_color)?,
        Command::Course(CourseCommand::Add { name }) => {
            commands::courses::run_add(&app, &name, format)?;
        }
        Command::Course(CourseCommand::Delete { course }) => {
            commands::courses::run_delete(&app, &course, format)?;
        }
        Command::Content(subcmd) => match subcmd {
            ContentCommand::List { course } => {
                commands::content::run_list(&app, &course, format)?;
            }
            ContentCommand::Add { course, name } => {
                commands::content::run_add(&app, &course, &name, format)?;
            }
            ContentCommand::Delete { course, content } => {
                commands::content::run_delete(&app, &course, &content, format)?;
            }
        },
        Command::Topic(subcmd) => match subcmd {
            TopicCommand::List { course, content } => {
                commands::topic::run_list(&app, &course, &content, format)?;
            }
            TopicCommand::Add { course, content, name } => {
                commands::topic::run_add(&app, &course, &content, &name, format)?;
            }
            TopicCommand::Delete { course, content, topic } => {
                commands::topic::run_delete(&app, &course, &content, &topic, format)?;
            }
        },
        Command::Note(subcmd) => match subcmd {
            NoteCommand::Show { course, content, topic, raw } => {
                commands::note::run_show(&app, &course, &content, &topic, raw, format)?;
            }
            NoteCommand::Edit { course, content, topic, text } => {
                let text = resolve_text(text)?;
                commands::note::run_edit(&app, &course, &content, &topic, text, format)?;
            }
        },
        Command::Flashcards { course, content, topic, card, rebuild, regenerate } => {
            let options = commands::flashcards::FlashcardOptions {
                topic: topic.as_deref(),
                card,
                rebuild,
                regenerate,
            };
            commands::flashcards::run(&app, &course, &content, &options, format, use_color)?;
        }
        Command::Quiz { course, content, regenerate } => {
            commands::quiz::run(&app, &course, &content, regenerate, format, use_color)?;
        }
        Command::Key(KeyCommand::Set { key }) => commands::key::run_set(&app, &key)?,
        Command::Key(KeyCommand::Show) => commands::key::run_show(&app, format)?,
    }

    Ok(())
}
