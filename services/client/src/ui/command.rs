//! services/client/src/ui/command.rs
//!
//! Parses input lines into user actions.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Upload(PathBuf),
    Say(String),
    Continue,
    Budget(u32),
    Quiz,
    Load,
    /// 1-based question and option numbers.
    Answer { question: usize, option: usize },
    Submit,
    Home,
    Dashboard,
    Take(String),
    Close,
    Dismiss(u64),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '/{0}', type /help for the list")]
    Unknown(String),
    #[error("/{command} expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

impl Command {
    /// Lines starting with `/` are commands; anything else is a chat message.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Say(line.to_string()));
        };
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "help" | "h" => Ok(Command::Help),
            "upload" => non_empty(args, "upload", "a path to a PDF")
                .map(|path| Command::Upload(PathBuf::from(path))),
            "continue" | "next" => Ok(Command::Continue),
            "budget" => args
                .trim_start_matches('€')
                .parse()
                .map(Command::Budget)
                .map_err(|_| CommandError::BadArgument {
                    command: "budget",
                    expected: "an amount in euros",
                }),
            "quiz" => Ok(Command::Quiz),
            "load" => Ok(Command::Load),
            "answer" | "a" => {
                let numbers: Vec<usize> = args
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .unwrap_or_default();
                match numbers.as_slice() {
                    [question, option] if *question > 0 && *option > 0 => Ok(Command::Answer {
                        question: *question,
                        option: *option,
                    }),
                    _ => Err(CommandError::BadArgument {
                        command: "answer",
                        expected: "a question number and an option number",
                    }),
                }
            }
            "submit" => Ok(Command::Submit),
            "home" => Ok(Command::Home),
            "dashboard" | "dash" => Ok(Command::Dashboard),
            "take" => non_empty(args, "take", "a module name")
                .map(|module| Command::Take(module.to_string())),
            "close" => Ok(Command::Close),
            "dismiss" => args.parse().map(Command::Dismiss).map_err(|_| {
                CommandError::BadArgument {
                    command: "dismiss",
                    expected: "a notice number",
                }
            }),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Commands that wait on the backend. The shell runs these in the
    /// background so the loading state can be drawn.
    pub fn needs_backend(&self) -> bool {
        matches!(
            self,
            Command::Upload(_)
                | Command::Say(_)
                | Command::Continue
                | Command::Quiz
                | Command::Load
                | Command::Take(_)
        )
    }

    /// Commands that may run while a request is still in flight.
    pub fn runs_during_request(&self) -> bool {
        matches!(
            self,
            Command::Help | Command::Home | Command::Dashboard | Command::Dismiss(_) | Command::Quit
        )
    }
}

fn non_empty<'a>(
    args: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if args.is_empty() {
        Err(CommandError::BadArgument { command, expected })
    } else {
        Ok(args)
    }
}

pub const HELP: &str = "\
Commands:
  /upload <file.pdf>      upload your resume
  <message>               chat with the assistant
  /continue               show your bundle once the assistant is done
  /budget <euros>         adjust your budget
  /quiz                   take the quiz for your bundle
  /load                   retry loading the quiz
  /answer <q> <option>    answer a quiz question
  /submit                 submit the quiz
  /dashboard, /home       switch pages
  /take <module>          quiz yourself on a module from the dashboard
  /close                  close the dashboard quiz
  /dismiss <n>            dismiss a notice
  /quit                   leave";
