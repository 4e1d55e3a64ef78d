/**
 * The exam loop: present each question, read answers until one is valid, grade it, and
 * keep score until the exam is finished, the time runs out, or the user quits.
 */
use std::collections::BTreeSet;

use log::{debug, info, warn};

use super::common::{QuizError, Result};
use super::parser::{parse, ParsedAnswer};
use super::question::Question;
use super::report::TopicTally;
use super::timer::{format_mmss, Clock, TimeBudget};


/// Everything the exam loop needs from the user interface.
pub trait ExamUi {
    /// Show question `number` of `total` along with the time left.
    fn question(
        &mut self, number: usize, total: usize, remaining: &str, question: &Question,
    ) -> Result<()>;
    /// Read one line of input. `Ok(None)` means the input has ended.
    fn prompt(&mut self) -> Result<Option<String>>;
    fn invalid(&mut self) -> Result<()>;
    fn correct(&mut self) -> Result<()>;
    /// `correction` is the correct answer as letters, e.g. "A,C".
    fn incorrect(&mut self, correction: &str) -> Result<()>;
    fn time_up(&mut self) -> Result<()>;
    fn quit(&mut self) -> Result<()>;
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every question was answered.
    Completed,
    TimedOut,
    /// The user quit before the end.
    Aborted,
}


/// The answer given to one question, and whether it was right.
#[derive(Debug, Clone)]
pub struct AttemptRecord<'a> {
    pub question: &'a Question,
    pub chosen: BTreeSet<usize>,
    pub correct: bool,
}


/// Everything that happened in one run of the exam.
#[derive(Debug)]
pub struct ExamOutcome<'a> {
    pub termination: Termination,
    pub correct: usize,
    pub attempted: usize,
    pub tally: TopicTally,
    /// Graded questions, in the order they were asked.
    pub attempts: Vec<AttemptRecord<'a>>,
    /// Seconds from the start of the exam to the end.
    pub elapsed: u64,
}


enum Response {
    Chosen(BTreeSet<usize>),
    TimedOut,
    Quit,
}


impl<'a> ExamOutcome<'a> {
    fn new() -> Self {
        ExamOutcome {
            termination: Termination::Completed,
            correct: 0,
            attempted: 0,
            tally: TopicTally::new(),
            attempts: Vec::new(),
            elapsed: 0,
        }
    }

    fn grade(&mut self, question: &'a Question, chosen: BTreeSet<usize>) -> bool {
        let correct = question.grade(&chosen);
        self.attempted += 1;
        if correct {
            self.correct += 1;
        }
        self.tally.record(&question.topic, correct);
        self.attempts.push(AttemptRecord { question, chosen, correct });
        correct
    }
}


/// Ask every question in `exam` with a total time limit of `time_limit` seconds, which
/// starts counting down immediately.
///
/// The time limit is checked before each question is shown and before and after each
/// line of input is read. A question whose answer arrives after the deadline is not
/// graded.
pub fn run_exam<'a, U, C>(
    exam: &[&'a Question], ui: &mut U, clock: &C, time_limit: u64,
) -> Result<ExamOutcome<'a>>
where
    U: ExamUi + ?Sized,
    C: Clock + ?Sized,
{
    let budget = TimeBudget::new(clock.now(), time_limit);
    let mut outcome = ExamOutcome::new();
    info!("Starting exam of {} questions with {}s limit", exam.len(), time_limit);

    for (i, &question) in exam.iter().enumerate() {
        let remaining = budget.remaining(clock.now());
        if remaining == 0 {
            outcome.termination = Termination::TimedOut;
            break;
        }

        ui.question(i + 1, exam.len(), &format_mmss(remaining), question)?;
        match ask(question, ui, clock, &budget)? {
            Response::Chosen(chosen) => {
                if outcome.grade(question, chosen) {
                    ui.correct()?;
                } else {
                    ui.incorrect(&question.correct_letters())?;
                }
            },
            Response::TimedOut => {
                outcome.termination = Termination::TimedOut;
                break;
            },
            Response::Quit => {
                outcome.termination = Termination::Aborted;
                break;
            },
        }
    }

    match outcome.termination {
        Termination::TimedOut => ui.time_up()?,
        Termination::Aborted => ui.quit()?,
        Termination::Completed => {},
    }

    outcome.elapsed = budget.elapsed(clock.now());
    info!(
        "Exam ended ({:?}): {}/{} correct after {}s",
        outcome.termination,
        outcome.correct,
        outcome.attempted,
        outcome.elapsed,
    );
    Ok(outcome)
}


/// Read lines until one parses as an answer to `question`.
fn ask<U, C>(question: &Question, ui: &mut U, clock: &C, budget: &TimeBudget) -> Result<Response>
where
    U: ExamUi + ?Sized,
    C: Clock + ?Sized,
{
    loop {
        if budget.is_expired(clock.now()) {
            return Ok(Response::TimedOut);
        }

        let raw = match ui.prompt() {
            Ok(Some(raw)) => raw,
            // Ctrl+D and Ctrl+C end the exam like the quit token does.
            Ok(None) | Err(QuizError::ReadlineInterrupted) => {
                return Ok(Response::Quit);
            },
            Err(QuizError::InvalidInput) => {
                debug!("Undecodable answer line");
                ui.invalid()?;
                continue;
            },
            // The answers so far are kept, so the exam ends as if the user quit.
            Err(e) => {
                warn!("Ending exam after input error: {}", e);
                return Ok(Response::Quit);
            },
        };

        if budget.is_expired(clock.now()) {
            return Ok(Response::TimedOut);
        }

        match parse(&raw, question.multi_select, question.options.len()) {
            ParsedAnswer::Selection(chosen) => {
                return Ok(Response::Chosen(chosen));
            },
            ParsedAnswer::Quit => {
                return Ok(Response::Quit);
            },
            ParsedAnswer::Invalid => {
                debug!("Invalid answer {:?}", raw);
                ui.invalid()?;
            },
        }
    }
}
