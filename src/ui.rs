/**
 * The command-line user interface for taking exams.
 */
use std::io::Write;

use colored::*;

use super::common::{QuizError, Result};
use super::engine::ExamUi;
use super::iohelper::{prettyprint, prettyprint_colored, prompt};
use super::question::{letter, Question};
use super::report::{MissedItem, Report};
use super::timer::format_mmss;


const RULE_WIDTH: usize = 70;


pub struct CmdUI {
    editor: rustyline::Editor<()>,
}


impl CmdUI {
    pub fn new() -> Self {
        Self {
            editor: rustyline::Editor::<()>::new(),
        }
    }

    pub fn instructions(&mut self, total: usize, time_limit: u64) -> Result<()> {
        my_print!("\n")?;
        my_println!("Questions:  {}", total)?;
        my_println!("Time limit: {}", format_mmss(time_limit))?;
        prettyprint_colored(
            "Answer with a letter, or a list of letters such as A,C when more than one \
             answer applies. Type 'q' to quit.",
            "",
            Some(Color::BrightBlue),
            None,
        )?;
        my_print!("\n")
    }

    pub fn results(&mut self, report: &Report, elapsed: u64) -> Result<()> {
        my_print!("\n")?;
        my_println!("{}", "=".repeat(RULE_WIDTH))?;
        my_println!("RESULTS")?;
        my_println!("{}", "=".repeat(RULE_WIDTH))?;
        if report.attempted == 0 {
            return my_println!("No questions attempted.");
        }

        my_println!("Attempted: {}", report.attempted)?;
        my_println!("Correct:   {}", format!("{}", report.correct).green())?;
        my_println!("Score:     {}", format!("{:.1}%", report.percent).cyan())?;
        my_println!("Time used: {}", format_mmss(elapsed))?;

        my_println!("\nTopic breakdown:")?;
        for row in report.topics.iter() {
            my_println!(
                "  {:18}  {:2}/{:2}  ({:5.1}%)",
                row.topic,
                row.correct,
                row.attempted,
                row.percent(),
            )?;
        }

        if !report.missed.is_empty() {
            my_println!("\nReview of missed questions:")?;
            for (i, item) in report.missed.iter().enumerate() {
                self.review(i + 1, item)?;
            }
        }
        my_print!("\n")
    }

    fn review(&mut self, number: usize, item: &MissedItem) -> Result<()> {
        my_println!("{}", "-".repeat(RULE_WIDTH))?;
        let prefix = format!("  ({}) ", number);
        prettyprint_colored(&item.prompt, &prefix, None, Some(Color::Cyan))?;
        my_print!("\n")?;
        for option in item.options.iter() {
            let (verdict, color) = if option.correct {
                ("CORRECT", Color::Green)
            } else {
                ("WRONG", Color::Red)
            };
            prettyprint(&option.text, &format!("     {}. ", option.letter))?;
            if let Some(note) = &option.note {
                let prefix = format!("        {}: ", verdict);
                prettyprint_colored(note, &prefix, None, Some(color))?;
            } else {
                my_println!("        {}", verdict.color(color))?;
            }
        }
        my_println!("\n  Your answer: {}", item.chosen.red())?;
        if let Some(explanation) = &item.explanation {
            prettyprint(explanation, "  Explanation: ")?;
        }
        Ok(())
    }
}


impl ExamUi for CmdUI {
    fn question(
        &mut self, number: usize, total: usize, remaining: &str, question: &Question,
    ) -> Result<()> {
        my_println!("{}", "=".repeat(RULE_WIDTH))?;
        my_println!(
            "Q{}/{}  |  Topic: {}  |  Time left: {}",
            number,
            total,
            question.topic.cyan(),
            remaining,
        )?;
        my_print!("\n")?;
        prettyprint(&question.prompt, "")?;
        my_print!("\n")?;
        for (i, option) in question.options.iter().enumerate() {
            prettyprint(option, &format!("  {}. ", letter(i)))?;
        }
        if question.multi_select {
            my_println!("\n(Select ALL that apply. Example: A,C)")
        } else {
            my_println!("\n(Select ONE answer.)")
        }
    }

    fn prompt(&mut self) -> Result<Option<String>> {
        prompt(&mut self.editor, "Your answer: ")
    }

    fn invalid(&mut self) -> Result<()> {
        my_println!("Invalid input. Try again (e.g., A or A,C).")
    }

    fn correct(&mut self) -> Result<()> {
        my_println!("{}\n", "Correct!".green())
    }

    fn incorrect(&mut self, correction: &str) -> Result<()> {
        my_println!("{} Correct answer: {}\n", "Incorrect.".red(), correction.green())
    }

    fn time_up(&mut self) -> Result<()> {
        my_println!("\n{}", "Time is up!".red())
    }

    fn quit(&mut self) -> Result<()> {
        my_println!("\nExiting exam early.")
    }
}
