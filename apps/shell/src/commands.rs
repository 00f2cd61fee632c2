use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::state::{AppState, CommandError};

/// Extension the save prompt appends when the answer has none.
pub const DEFAULT_EXTENSION: &str = "xlsx";

const HELP: &str = "\
Commands:
  add      add stock (merges with an existing item of the same name)
  consume  take stock out and record it in the ledger file
  list     show the current inventory
  save     write the inventory to the ledger file
  load     replace the inventory with a ledger file
  help     show this message
  quit     leave";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Add,
    Consume,
    List,
    Save,
    Load,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command `{0}`; type `help` for a list")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "a" => Ok(Self::Add),
            "consume" | "c" => Ok(Self::Consume),
            "list" | "ls" => Ok(Self::List),
            "save" | "s" => Ok(Self::Save),
            "load" | "open" => Ok(Self::Load),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

/// Append [`DEFAULT_EXTENSION`] to a path answer that has no extension.
pub fn with_default_extension(answer: &str) -> PathBuf {
    let mut path = PathBuf::from(answer);
    if path.extension().is_none() {
        path.set_extension(DEFAULT_EXTENSION);
    }
    path
}

/// Line-oriented front end over [`AppState`].
///
/// Each command prompts for its fields one line at a time. An empty path answer
/// cancels the dialog it stands for; end of input leaves the loop.
pub struct Shell<R, W> {
    state: AppState,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            input,
            output,
        }
    }

    pub fn into_parts(self) -> (AppState, W) {
        (self.state, self.output)
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Stockbook. Type `help` for commands.")?;
        loop {
            let Some(line) = self.ask(">")? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "Error: {err}")?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            self.dispatch(command)?;
        }
        self.output.flush()
    }

    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Add => self.add(),
            Command::Consume => self.consume(),
            Command::List => self.list(),
            Command::Save => self.save(),
            Command::Load => self.load(),
            Command::Help => writeln!(self.output, "{HELP}"),
            Command::Quit => Ok(()),
        }
    }

    fn add(&mut self) -> io::Result<()> {
        let Some([item, quantity, price]) = self.ask_fields(["Item", "Quantity", "Price"])? else {
            return Ok(());
        };
        match self.state.add_item(&item, &quantity, &price) {
            Ok(()) => self.list(),
            Err(err) => self.report(err),
        }
    }

    fn consume(&mut self) -> io::Result<()> {
        let Some([item, quantity, consumer]) =
            self.ask_fields(["Item", "Quantity", "Consumer"])?
        else {
            return Ok(());
        };
        match self.state.consume_item(&item, &quantity, &consumer) {
            Ok(report) => {
                writeln!(self.output, "{report}")?;
                self.list()
            }
            Err(err) => self.report(err),
        }
    }

    fn list(&mut self) -> io::Result<()> {
        let rows = self.state.display_rows();
        if rows.is_empty() {
            return writeln!(self.output, "(no items)");
        }
        for row in rows {
            writeln!(self.output, "  {row}")?;
        }
        Ok(())
    }

    fn save(&mut self) -> io::Result<()> {
        let destination = if self.state.needs_destination() {
            self.ask_path("Save as")?.map(|answer| with_default_extension(&answer))
        } else {
            None
        };
        match self.state.save_file(destination.as_deref()) {
            Ok(()) => writeln!(self.output, "Data saved successfully!"),
            Err(err) => self.report(err),
        }
    }

    fn load(&mut self) -> io::Result<()> {
        let selected = self.ask_path("Open file")?.map(PathBuf::from);
        match self.state.load_file(selected.as_deref()) {
            Ok(_) => {
                writeln!(self.output, "Data loaded successfully!")?;
                self.list()
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: CommandError) -> io::Result<()> {
        match err {
            // A dismissed dialog is silent.
            CommandError::Cancelled => Ok(()),
            err => writeln!(self.output, "Error: {err}"),
        }
    }

    fn ask_fields<const N: usize>(
        &mut self,
        labels: [&str; N],
    ) -> io::Result<Option<[String; N]>> {
        let mut answers: [String; N] = std::array::from_fn(|_| String::new());
        for (answer, label) in answers.iter_mut().zip(labels) {
            match self.ask(&format!("{label}:"))? {
                Some(line) => *answer = line,
                None => return Ok(None),
            }
        }
        Ok(Some(answers))
    }

    /// `None` when the answer is blank or input ended.
    fn ask_path(&mut self, label: &str) -> io::Result<Option<String>> {
        let answer = self.ask(&format!("{label}:"))?;
        Ok(answer
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty()))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}
