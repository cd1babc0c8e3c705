//! prologue shell - interactive queries over the bundled engine
//!
//! Usage: prologue [files...]
//!
//! Commands:
//!   :help   - Show help
//!   :quit   - Exit shell
//!   :reset  - Clear the knowledge base

use std::fs;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use prologue::repl::{ExecuteOutcome, InputResult, MetaCommand, ReplState};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "prologue> ";
const CONTINUATION: &str = "......... ";

/// Parse command line arguments. Returns the source files to consult.
fn parse_args(args: &[String]) -> Vec<PathBuf> {
    let mut source_files = Vec::new();
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("prologue v{} - interactive Prolog shell", VERSION);
                println!();
                println!("Usage: prologue [files...]");
                println!();
                println!("Files are consulted as clause programs on startup.");
                println!("At the prompt: '?- goal.' queries, other input asserts clauses.");
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("prologue v{}", VERSION);
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                eprintln!("Try 'prologue --help' for usage information");
                std::process::exit(1);
            }
            _ => source_files.push(PathBuf::from(arg)),
        }
    }
    source_files
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let source_files = parse_args(&args);

    println!("prologue v{} - interactive Prolog shell", VERSION);
    println!("Type :help for help, :quit to exit\n");

    let mut state = ReplState::new();

    for source_file in &source_files {
        match fs::read_to_string(source_file) {
            Ok(source) => {
                if let Err(e) = state.prover.add_theory(&source) {
                    eprintln!("{}: {}", source_file.display(), e);
                }
            }
            Err(e) => eprintln!("{}: {}", source_file.display(), e),
        }
    }

    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), DefaultHistory> =
        Editor::with_config(config).expect("Failed to create editor");

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = if state.input_buffer.is_empty() {
            PROMPT
        } else {
            CONTINUATION
        };

        match rl.readline(prompt) {
            Ok(line) => match state.process_line(&line) {
                InputResult::MetaCommand(cmd) => {
                    if !handle_command(&mut state, cmd) {
                        break;
                    }
                }
                InputResult::Statement(source) => {
                    handle_statement(&mut state, &source);
                }
                InputResult::Incomplete | InputResult::Empty => {}
            },
            Err(ReadlineError::Interrupted) => {
                if !state.input_buffer.is_empty() {
                    state.input_buffer.clear();
                    println!("^C");
                } else {
                    println!("Use :quit or Ctrl-D to exit");
                }
            }
            Err(ReadlineError::Eof) => {
                if let Some(source) = state.force_submit() {
                    handle_statement(&mut state, &source);
                } else {
                    println!("\nGoodbye!");
                    break;
                }
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }
}

/// Handle a meta-command. Returns false if we should exit.
fn handle_command(state: &mut ReplState, cmd: MetaCommand) -> bool {
    match cmd {
        MetaCommand::Help => {
            println!("  ?- goal.        run a query and print its solutions");
            println!("  head :- body.   assert a rule");
            println!("  fact.           assert a fact");
            println!("  :reset          clear the knowledge base");
            println!("  :quit           exit");
        }
        MetaCommand::Quit => {
            println!("Goodbye!");
            return false;
        }
        MetaCommand::Reset => {
            state.reset();
            println!("Knowledge base cleared");
        }
        MetaCommand::Unknown(cmd) => {
            println!("Unknown command '{}'; try :help", cmd);
        }
    }
    true
}

fn handle_statement(state: &mut ReplState, source: &str) {
    match state.execute(source) {
        Ok(ExecuteOutcome::Solutions(lines)) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Ok(ExecuteOutcome::NoSolutions) => println!("false"),
        Ok(ExecuteOutcome::Asserted) => println!("ok"),
        Err(e) => eprintln!("{}", e),
    }
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".prologue_history"))
}
