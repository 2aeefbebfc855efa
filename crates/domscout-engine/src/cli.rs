use crate::backend::Backend;
use crate::pipeline::TableSession;
use domscout_common::formatter::FAIL_MARK;
use domscout_common::protocol::ActionKind;
use std::error::Error;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

impl OutputHandlers {
    /// Handlers that discard everything.
    pub fn silent() -> Self {
        fn sink(_: &str) {}
        Self { out: sink, err: sink }
    }
}

impl Default for OutputHandlers {
    fn default() -> Self {
        fn out(s: &str) {
            println!("{}", s);
        }
        fn err(s: &str) {
            eprintln!("{}", s);
        }
        Self { out, err }
    }
}

/// One entry of the table menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ShowSummary,
    RowAction(ActionKind),
    SaveCsv,
    SaveJson,
    Reload,
    Exit,
    Invalid,
}

impl MenuCommand {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => Self::ShowSummary,
            "2" => Self::RowAction(ActionKind::Edit),
            "3" => Self::RowAction(ActionKind::Delete),
            "4" => Self::SaveCsv,
            "5" => Self::SaveJson,
            "6" => Self::Reload,
            "0" => Self::Exit,
            _ => Self::Invalid,
        }
    }
}

/// A 1-based row number typed by the user.
pub fn parse_row_number(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

pub const MENU_LINES: &[&str] = &[
    "",
    "============================================================",
    "🎮 INTERACTIVE MENU",
    "1. Show table summary",
    "2. Click 'edit' on a row",
    "3. Click 'delete' on a row",
    "4. Save data as CSV",
    "5. Save data as JSON",
    "6. Reload the page",
    "0. Exit",
];

/// Possible outcomes from reading a single menu line.
enum ReadLineResult {
    /// A non-empty input line to process.
    Input(String),
    /// Empty line, re-prompt.
    Skip,
    /// EOF or Ctrl+C.
    Exit,
    /// I/O error while reading.
    Error(io::Error),
}

type StdinLines = tokio::io::Lines<BufReader<tokio::io::Stdin>>;

async fn read_line(reader: &mut StdinLines, prompt: &str, output: OutputHandlers) -> ReadLineResult {
    print!("{}", prompt);
    if let Err(e) = io::stdout().flush() {
        return ReadLineResult::Error(e);
    }

    tokio::select! {
        line = reader.next_line() => classify_line(line),
        _ = tokio::signal::ctrl_c() => {
            (output.out)("\n👋 Interrupted, leaving the menu.");
            ReadLineResult::Exit
        }
    }
}

fn classify_line(result: Result<Option<String>, io::Error>) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() {
                ReadLineResult::Skip
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

/// Interactive loop over an extracted table. Returns on `0`, EOF or Ctrl+C.
pub async fn run_menu<B: Backend + ?Sized>(
    backend: &mut B,
    session: &mut TableSession,
    output: OutputHandlers,
) -> Result<(), Box<dyn Error>> {
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();

    loop {
        for line in MENU_LINES {
            (output.out)(line);
        }

        let choice = match read_line(&mut reader, "\nChoose an option: ", output).await {
            ReadLineResult::Input(line) => line,
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        };

        match MenuCommand::parse(&choice) {
            MenuCommand::ShowSummary => session.show_summary(),
            MenuCommand::RowAction(kind) => {
                let row = match read_line(&mut reader, "Row number: ", output).await {
                    ReadLineResult::Input(line) => parse_row_number(&line),
                    ReadLineResult::Skip => None,
                    ReadLineResult::Exit => break,
                    ReadLineResult::Error(e) => return Err(e.into()),
                };
                match row {
                    Some(row) => {
                        session.click_row_action(backend, row, kind).await;
                    }
                    None => (output.err)(&format!("{} Invalid row number", FAIL_MARK)),
                }
            }
            MenuCommand::SaveCsv => {
                session.save_csv();
            }
            MenuCommand::SaveJson => {
                session.save_json();
            }
            MenuCommand::Reload => {
                if let Err(e) = session.reload(backend).await {
                    (output.err)(&format!("{} {}", FAIL_MARK, e));
                }
            }
            MenuCommand::Exit => break,
            MenuCommand::Invalid => (output.err)(&format!("{} Invalid option", FAIL_MARK)),
        }
    }

    (output.out)("👋 Bye!");
    Ok(())
}
