use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use smartstudy_lib::quiz::{QuizPhase, QuizSession, QuizSynthesizer};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    course: &str,
    content: &str,
    regenerate: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut ctx = app.navigate(course, Some(content), None)?;
    let content = ctx.require_content()?.to_string();
    let store = app.course_store(ctx.require_course()?);
    let generator = app.generator();
    let synthesizer = QuizSynthesizer::new(&store, &generator);

    if regenerate {
        synthesizer.invalidate(&content)?;
    }
    let deck = synthesizer
        .get_or_build_quiz(&content)
        .with_context(|| format!("Failed to build quiz for '{}'", content))?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&deck)?);
        return Ok(());
    }

    let session = ctx.start_quiz(QuizSession::new(&deck)?)?;
    let stdin = io::stdin();
    run_loop(session, stdin.lock(), io::stdout(), use_color)?;
    ctx.leave_quiz();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum QuizInput {
    /// 1-based option number
    Answer(usize),
    Show,
    Next,
    Restart,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> QuizInput {
    let line = line.trim();
    if line.is_empty() {
        return QuizInput::Next;
    }
    match line.to_lowercase().as_str() {
        "s" => QuizInput::Show,
        "n" => QuizInput::Next,
        "r" => QuizInput::Restart,
        "q" => QuizInput::Quit,
        other => other.parse().map(QuizInput::Answer).unwrap_or(QuizInput::Unknown),
    }
}

/// Drive a quiz session from line input until quit or end of input
fn run_loop<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    mut out: W,
    use_color: bool,
) -> Result<()> {
    print_question(session, &mut out, use_color)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            QuizInput::Answer(n) => {
                if session.is_revealed() {
                    writeln!(out, "Already answered. Press Enter for the next question.")?;
                    continue;
                }
                let Some(option) = n.checked_sub(1).and_then(|i| session.current().options.get(i)).cloned()
                else {
                    writeln!(out, "Choose 1-{}", session.current().options.len())?;
                    continue;
                };
                let correct = session.submit(&option).unwrap_or(false);
                if correct {
                    writeln!(out, "{}", paint("Correct!", Color::GREEN, use_color))?;
                } else {
                    let message = format!("Wrong. Answer: {}", session.current().answer);
                    writeln!(out, "{}", paint(&message, Color::RED, use_color))?;
                }
                print_progress(session, &mut out)?;
            }
            QuizInput::Show => {
                session.reveal();
                writeln!(out, "Answer: {}", paint(&session.current().answer, Color::BOLD, use_color))?;
                print_progress(session, &mut out)?;
            }
            QuizInput::Next => {
                if session.advance() {
                    print_question(session, &mut out, use_color)?;
                } else if session.phase() == QuizPhase::Answering {
                    writeln!(out, "Answer with a number, or s to show the answer.")?;
                } else {
                    print_progress(session, &mut out)?;
                }
            }
            QuizInput::Restart => {
                session.restart();
                writeln!(out, "Restarted.")?;
                print_question(session, &mut out, use_color)?;
            }
            QuizInput::Quit => break,
            QuizInput::Unknown => {
                writeln!(out, "Commands: 1-4 answer, s show, Enter next, r restart, q quit")?;
            }
        }
    }

    writeln!(out, "Score: {}/{}", session.score(), session.total())?;
    Ok(())
}

fn print_question<W: Write>(session: &QuizSession, out: &mut W, use_color: bool) -> Result<()> {
    let question = session.current();
    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        paint(&format!("[{}/{}]", session.index() + 1, session.total()), Color::DIM, use_color),
        paint(&question.question, Color::BOLD, use_color)
    )?;
    for (i, option) in question.options.iter().enumerate() {
        writeln!(out, "  {} {}", paint(&format!("{}.", i + 1), Color::CYAN, use_color), option)?;
    }
    Ok(())
}

fn print_progress<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    if session.is_complete() {
        writeln!(
            out,
            "Quiz complete: {}/{}. r to restart, q to quit.",
            session.score(),
            session.total()
        )?;
    } else {
        writeln!(out, "Score: {}/{}. Press Enter for the next question.", session.score(), session.total())?;
    }
    Ok(())
}
