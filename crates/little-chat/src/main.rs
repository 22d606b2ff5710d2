//! A simple program for chatting with a model in the terminal.

#[macro_use]
extern crate tracing;

use std::io::IsTerminal;
use std::process::ExitCode;

use little_chat::core::{ChatSession, ChatSessionBuilder};
use little_chat::{Config, TerminalSink};
use little_chat_openai_model::OpenAIProvider;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Stdin};

const TITLE: &str = "🤖 Simple LLM Chat App";
const PROMPT_HINT: &str = "What is up?";
const HELP: &str = "Commands: /history, /clear, /quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    History,
    Clear,
    Quit,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.red());
            return ExitCode::FAILURE;
        }
    };
    let openai_config = config.openai_config();
    info!(
        "chatting with {} at {}",
        openai_config.model(),
        openai_config.base_url()
    );
    let model_provider = OpenAIProvider::new(openai_config);
    let mut session =
        ChatSessionBuilder::with_model_provider(model_provider).build();

    let mut sink = TerminalSink::stdout();
    sink.print_title(TITLE);
    println!("{}\n", HELP.dimmed());

    let interactive = std::io::stdin().is_terminal();
    let mut stdin = BufReader::new(io::stdin());

    loop {
        sink.print_prompt(PROMPT_HINT);
        let Some(raw) = read_line(&mut stdin).await else {
            break;
        };
        let line = raw.trim();
        // Blank input is never submitted.
        if line.is_empty() {
            continue;
        }
        if interactive {
            let typed = raw.trim_end_matches(['\r', '\n']);
            sink.erase_input_line(PROMPT_HINT, typed);
        }

        match parse_command(line) {
            Some(Command::Quit) => break,
            Some(Command::History) => session.replay(&mut sink),
            Some(Command::Clear) => {
                session.initialize();
                println!("{}", "Conversation cleared.".dimmed());
            }
            None => run_turn(&mut session, &mut sink, line).await,
        }
    }
    sink.commit_live();

    ExitCode::SUCCESS
}

async fn run_turn(
    session: &mut ChatSession,
    sink: &mut TerminalSink,
    text: &str,
) {
    let result = session.submit_user_turn(text, sink).await.map(|_| ());
    sink.commit_live();
    if let Err(err) = result {
        // The turn is dropped; typing again is the retry.
        sink.print_error(&err.to_string());
    }
}

fn parse_command(line: &str) -> Option<Command> {
    match line {
        "/history" => Some(Command::History),
        "/clear" => Some(Command::Clear),
        "/quit" | "/exit" => Some(Command::Quit),
        _ => None,
    }
}

async fn read_line(stdin: &mut BufReader<Stdin>) -> Option<String> {
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
