/**
 * Definitions of data structures used by several modules, such as `QuizError` and the
 * structs that hold command-line arguments.
 */
use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use structopt::StructOpt;


pub type Result<T> = ::std::result::Result<T, QuizError>;


#[derive(Debug)]
pub enum QuizError {
    /// For when the user requests a question bank that does not exist.
    BankNotFound(PathBuf),
    /// For JSON errors.
    Json(serde_json::Error),
    Io(io::Error),
    /// A bank entry violates one of the structural invariants of a question. `index`
    /// is the zero-based position of the entry in the bank file.
    InvalidQuestion { index: usize, reason: String },
    /// No questions left to ask after filtering.
    EmptyQuiz,
    BankTooSmall { requested: usize, available: usize },
    /// A command-line option has a value that cannot be used.
    InvalidOption(String),
    /// A line of input could not be decoded as text.
    InvalidInput,
    ReadlineInterrupted,
}


impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuizError::BankNotFound(ref path) => {
                write!(f, "could not find question bank '{}'", path.to_string_lossy())
            },
            QuizError::Json(ref err) => {
                write!(f, "could not parse JSON ({})", err)
            },
            QuizError::Io(ref err) => {
                write!(f, "IO error ({})", err)
            },
            QuizError::InvalidQuestion { index, ref reason } => {
                write!(f, "invalid question at position {}: {}", index, reason)
            },
            QuizError::EmptyQuiz => {
                write!(f, "no questions found")
            },
            QuizError::BankTooSmall { requested, available } => {
                write!(
                    f,
                    "question bank too small ({} requested, {} available)",
                    requested,
                    available,
                )
            },
            QuizError::InvalidOption(ref message) => {
                write!(f, "{}", message)
            },
            QuizError::InvalidInput => {
                write!(f, "input was not valid UTF-8")
            },
            QuizError::ReadlineInterrupted => {
                Ok(())
            },
        }
    }
}


impl error::Error for QuizError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            QuizError::Json(ref err) => Some(err),
            QuizError::Io(ref err) => Some(err),
            _ => None,
        }
    }
}


impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}


impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::Json(err)
    }
}


/// Holds the command-line configuration for the application.
#[derive(StructOpt)]
#[structopt(name = "exam", about = "Take a timed multiple-choice exam from the command line.")]
pub struct Options {
    /// Do not emit colorized output.
    #[structopt(long = "no-color")]
    pub no_color: bool,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Take an exam.
    #[structopt(name = "take")]
    Take(TakeOptions),
    /// Count questions or topics in a question bank.
    #[structopt(name = "count")]
    Count(CountOptions),
}

#[derive(StructOpt)]
pub struct TakeOptions {
    /// Path to a JSON question bank. The built-in bank is used if omitted.
    #[structopt(parse(from_os_str))]
    pub bank: Option<PathBuf>,
    /// Number of questions in the exam. The full-length exam is 54 questions in 8100
    /// seconds.
    #[structopt(short = "n", default_value = "20")]
    pub num_to_ask: usize,
    /// Total time limit for the exam, in seconds.
    #[structopt(short = "t", long = "time-limit", default_value = "3000")]
    pub time_limit: u64,
    /// Review every missed question at the end of the exam.
    #[structopt(long = "review")]
    pub review: bool,
    /// Seed for the random question selection, to reproduce an exam.
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
    /// Ask the questions in the order they appear in the bank.
    #[structopt(long = "in-order")]
    pub in_order: bool,
    #[structopt(flatten)]
    pub filter_opts: FilterOptions,
}

#[derive(StructOpt)]
pub struct CountOptions {
    /// Path to a JSON question bank. The built-in bank is used if omitted.
    #[structopt(parse(from_os_str))]
    pub bank: Option<PathBuf>,
    /// List topics instead of counting questions.
    #[structopt(long = "list-topics")]
    pub list_topics: bool,
    #[structopt(flatten)]
    pub filter_opts: FilterOptions,
}

/// These filtering options are shared between the `take` and `count` subcommands.
#[derive(StructOpt)]
pub struct FilterOptions {
    /// Only include questions with the given topic.
    #[structopt(long = "topic", number_of_values = 1)]
    pub topics: Vec<String>,
    /// Exclude questions with the given topic.
    #[structopt(long = "exclude", number_of_values = 1)]
    pub exclude: Vec<String>,
    /// Only include questions whose prompt contains the keyword.
    #[structopt(short = "k", long = "keyword", number_of_values = 1)]
    pub keywords: Vec<String>,
}


impl TakeOptions {
    #[allow(dead_code)]
    pub fn new() -> Self {
        TakeOptions {
            bank: None, num_to_ask: 20, time_limit: 3000, review: false, seed: None,
            in_order: false, filter_opts: FilterOptions::new(),
        }
    }

    /// Reject option values that would make the exam meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.num_to_ask == 0 {
            return Err(QuizError::InvalidOption(
                String::from("number of questions must be positive")
            ));
        }
        if self.time_limit == 0 {
            return Err(QuizError::InvalidOption(
                String::from("time limit must be positive")
            ));
        }
        Ok(())
    }
}


impl FilterOptions {
    #[allow(dead_code)]
    pub fn new() -> Self {
        FilterOptions {
            topics: Vec::new(), exclude: Vec::new(), keywords: Vec::new(),
        }
    }
}
