/**
 * Take a timed multiple-choice exam from the command line.
 */
#[macro_use]
mod iohelper;
mod common;
mod engine;
mod parser;
mod question;
mod report;
mod sampler;
mod timer;
mod ui;

use std::io;
use std::io::Write;

use colored::*;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use common::{Command, CountOptions, QuizError, Result, TakeOptions};
use question::QuestionBank;
use report::Report;
use timer::SystemClock;
use ui::CmdUI;


fn main() {
    pretty_env_logger::init();
    let options = common::Options::from_args();

    if options.no_color {
        colored::control::set_override(false);
    }

    let result = match options.cmd {
        Command::Take(options) => {
            main_take(options)
        },
        Command::Count(options) => {
            main_count(options)
        },
    };

    if let Err(e) = result {
        if !is_broken_pipe(&e) {
            eprintln!("{}: {}", "Error".red(), e);
            ::std::process::exit(2);
        }
    }
}


/// The main function for the `take` subcommand.
fn main_take(options: TakeOptions) -> Result<()> {
    options.validate()?;

    let bank = question::load_bank(options.bank.as_deref())?;
    info!("Loaded {} questions", bank.len());
    let candidates = bank.filter(&options.filter_opts);
    if candidates.is_empty() {
        return Err(QuizError::EmptyQuiz);
    }
    if candidates.len() < options.num_to_ask {
        return Err(QuizError::BankTooSmall {
            requested: options.num_to_ask,
            available: candidates.len(),
        });
    }

    let exam = if options.in_order {
        sampler::in_order(&candidates, options.num_to_ask)
    } else {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        sampler::sample(&candidates, options.num_to_ask, &mut rng)
    };
    info!("Sampled {} of {} questions", exam.len(), candidates.len());

    let mut ui = CmdUI::new();
    ui.instructions(exam.len(), options.time_limit)?;
    let outcome = engine::run_exam(&exam, &mut ui, &SystemClock, options.time_limit)?;

    let report = Report::from_outcome(&outcome, options.review);
    ui.results(&report, outcome.elapsed)
}


/// The main function for the `count` subcommand.
fn main_count(options: CountOptions) -> Result<()> {
    let bank = question::load_bank(options.bank.as_deref())?;
    let filtered = bank.filter(&options.filter_opts);
    if options.list_topics {
        list_topics(&filtered)?;
    } else {
        my_println!("{}", filtered.len())?;
    }
    Ok(())
}


fn list_topics(questions: &[&question::Question]) -> Result<()> {
    let counts = QuestionBank::topic_counts(questions);
    if counts.is_empty() {
        my_println!("No questions found.")?;
    } else {
        my_println!("Available topics:")?;
        for (topic, count) in counts.iter() {
            my_println!("  {} ({})", topic, count)?;
        }
    }
    Ok(())
}


fn is_broken_pipe(e: &QuizError) -> bool {
    if let QuizError::Io(e) = e {
        if let io::ErrorKind::BrokenPipe = e.kind() {
            return true;
        }
    }
    false
}
