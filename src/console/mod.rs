//! Line-based console I/O.
//!
//! Every interactive prompt in the tool goes through the [`Console`] trait
//! so the scan/decide/act flow can be driven by scripted input in tests.
//! The real implementation reads stdin and uses `rpassword` for secrets.

use std::io::{self, BufRead, Write};

/// Line-oriented prompt/response console.
pub trait Console {
    /// Prints `message` without a trailing newline and reads one line.
    ///
    /// The returned line is trimmed. End of input is an error: the tool has
    /// no non-interactive mode, so a closed stdin cannot be answered.
    fn prompt(&mut self, message: &str) -> io::Result<String>;

    /// Like [`prompt`](Console::prompt), but without echoing the input.
    fn prompt_secret(&mut self, message: &str) -> io::Result<String>;

    /// Prints a line of output.
    fn line(&mut self, message: &str);
}

/// [`Console`] over process stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while awaiting input",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn prompt_secret(&mut self, message: &str) -> io::Result<String> {
        rpassword::prompt_password(message)
    }

    fn line(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Asks a yes/no question, re-prompting until the answer resolves.
///
/// Accepts a case-insensitive `y` or `n` only. There is no default: any
/// other input asks again, indefinitely.
pub fn ask_yes_no(console: &mut dyn Console, message: &str) -> io::Result<bool> {
    loop {
        let answer = console.prompt(message)?;
        match answer.to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted console for unit tests.

    use std::collections::VecDeque;
    use std::io;

    use super::Console;

    /// Replays canned answers and records everything printed.
    pub struct ScriptedConsole {
        answers: VecDeque<String>,
        pub output: Vec<String>,
    }

    impl ScriptedConsole {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
            }
        }
    }

    impl Console for ScriptedConsole {
        fn prompt(&mut self, message: &str) -> io::Result<String> {
            self.output.push(message.to_string());
            self.answers.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
            })
        }

        fn prompt_secret(&mut self, message: &str) -> io::Result<String> {
            self.prompt(message)
        }

        fn line(&mut self, message: &str) {
            self.output.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn yes_no_accepts_either_case() {
        let mut console = ScriptedConsole::new(&["Y"]);
        assert!(ask_yes_no(&mut console, "ok? ").unwrap());

        let mut console = ScriptedConsole::new(&["n"]);
        assert!(!ask_yes_no(&mut console, "ok? ").unwrap());
    }

    #[test]
    fn yes_no_reprompts_on_anything_else() {
        let mut console = ScriptedConsole::new(&["", "yes", "maybe", "y"]);
        assert!(ask_yes_no(&mut console, "ok? ").unwrap());
        // One prompt per attempt.
        assert_eq!(console.output.len(), 4);
    }

    #[test]
    fn yes_no_surfaces_end_of_input() {
        let mut console = ScriptedConsole::new(&[]);
        assert!(ask_yes_no(&mut console, "ok? ").is_err());
    }
}
