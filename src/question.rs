/**
 * The question bank: questions, structural validation, and loading banks from JSON.
 */
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use super::common::{FilterOptions, QuizError, Result};


/// The letters used to label options. A question cannot have more options than this.
pub const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BUILTIN_BANK: &str = include_str!("../banks/python_practice.json");


/// Represents a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    /// Option `i` is labelled with the `i`-th letter of `LETTERS`.
    pub options: Vec<String>,
    /// Indices into `options` of the correct choices.
    pub correct: BTreeSet<usize>,
    /// If true, the user may pick more than one option.
    pub multi_select: bool,
    pub topic: String,
    pub explanation: Option<String>,
    /// Notes for individual options, keyed by option index. Shown in the review.
    pub option_notes: BTreeMap<usize, String>,
}


/// An immutable collection of questions that have all passed validation.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
}


/// One entry of a JSON question bank, before validation.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct BankEntry {
    prompt: String,
    options: Vec<String>,
    correct: Vec<usize>,
    /// Derived from the number of correct answers if omitted.
    #[serde(default)]
    multi_select: Option<bool>,
    #[serde(default = "default_topic")]
    topic: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    explanations: BTreeMap<usize, String>,
}


fn default_topic() -> String {
    String::from("General")
}


impl Question {
    /// Return a new single-select question with the first option correct.
    #[allow(dead_code)]
    pub fn new(prompt: &str, options: &[&str], topic: &str) -> Self {
        Question {
            prompt: String::from(prompt),
            options: options.iter().map(|o| String::from(*o)).collect(),
            correct: [0].iter().cloned().collect(),
            multi_select: false,
            topic: String::from(topic),
            explanation: None,
            option_notes: BTreeMap::new(),
        }
    }

    /// Check the structural invariants of the question, returning a description of
    /// the first one that is violated.
    pub fn check(&self) -> ::std::result::Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err(String::from("question has an empty prompt"));
        }
        if self.options.is_empty() {
            return Err(String::from("question has no options"));
        }
        if self.options.len() > LETTERS.len() {
            return Err(format!(
                "question has {} options but at most {} are allowed",
                self.options.len(),
                LETTERS.len(),
            ));
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(format!("option {} is empty", letter(index)));
        }
        if self.correct.is_empty() {
            return Err(String::from("question has no correct answer"));
        }
        if let Some(&index) = self.correct.iter().find(|&&i| i >= self.options.len()) {
            return Err(format!(
                "correct answer {} is out of range for {} options",
                index,
                self.options.len(),
            ));
        }
        if !self.multi_select && self.correct.len() != 1 {
            return Err(String::from(
                "single-select question must have exactly one correct answer"
            ));
        }
        if let Some(&index) = self.option_notes.keys().find(|&&i| i >= self.options.len()) {
            return Err(format!("explanation for nonexistent option {}", index));
        }
        Ok(())
    }

    /// Return true if `chosen` is exactly the set of correct options.
    pub fn grade(&self, chosen: &BTreeSet<usize>) -> bool {
        *chosen == self.correct
    }

    /// The correct answer as it should be displayed, e.g. "A,C".
    pub fn correct_letters(&self) -> String {
        letters(&self.correct)
    }
}


impl BankEntry {
    fn into_question(self) -> Question {
        let correct: BTreeSet<usize> = self.correct.into_iter().collect();
        let multi_select = self.multi_select.unwrap_or(correct.len() > 1);
        Question {
            prompt: self.prompt,
            options: self.options,
            correct,
            multi_select,
            topic: self.topic,
            explanation: self.explanation,
            option_notes: self.explanations,
        }
    }
}


impl QuestionBank {
    /// Build a bank, failing on the first question that violates an invariant.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        for (index, question) in questions.iter().enumerate() {
            question.check()
                .map_err(|reason| QuizError::InvalidQuestion { index, reason })?;
        }
        Ok(QuestionBank { questions })
    }

    /// Parse a bank from a JSON array of entries. Entries whose prompt repeats an
    /// earlier one are dropped.
    pub fn from_json(data: &str) -> Result<Self> {
        let entries: Vec<BankEntry> = serde_json::from_str(data)?;

        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            if !seen.insert(entry.prompt.clone()) {
                warn!("Dropping entry {} with duplicate prompt", index);
                continue;
            }
            questions.push(entry.into_question());
        }
        debug!("Parsed {} questions from JSON", questions.len());
        QuestionBank::new(questions)
    }

    #[allow(dead_code)]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Return the questions that satisfy the command-line filters (e.g., `--topic` and
    /// `--exclude`), in bank order.
    pub fn filter(&self, options: &FilterOptions) -> Vec<&Question> {
        self.questions.iter().filter(|q| filter_question(q, options)).collect()
    }

    /// Count the questions of each topic.
    pub fn topic_counts<'a>(questions: &[&'a Question]) -> BTreeMap<&'a str, usize> {
        let mut counts = BTreeMap::new();
        for &q in questions.iter() {
            *counts.entry(q.topic.as_str()).or_insert(0) += 1;
        }
        counts
    }
}


/// Load the bank at `path`, or the built-in bank if no path is given.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(path) => {
            let data = fs::read_to_string(path).map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    QuizError::BankNotFound(path.to_path_buf())
                } else {
                    QuizError::Io(err)
                }
            })?;
            QuestionBank::from_json(&data)
        },
        None => QuestionBank::from_json(BUILTIN_BANK),
    }
}


/// Render a set of option indices as sorted, comma-separated letters.
pub fn letters(indices: &BTreeSet<usize>) -> String {
    indices.iter()
        .filter_map(|&i| LETTERS.chars().nth(i))
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}


/// The letter that labels option `index`.
pub fn letter(index: usize) -> char {
    LETTERS.chars().nth(index).unwrap_or('?')
}


/// Return `true` if `q` satisfies the constraints in `options`.
fn filter_question(q: &Question, options: &FilterOptions) -> bool {
    // Either no topics were specified, or `q` has one of them.
    (options.topics.is_empty() || options.topics.iter().any(|t| *t == q.topic))
        && options.exclude.iter().all(|t| *t != q.topic)
        && filter_question_by_keywords(q, &options.keywords)
}


/// Return `true` if the prompt of `q` contains all specified keywords.
fn filter_question_by_keywords(q: &Question, keywords: &[String]) -> bool {
    let prompt = q.prompt.to_lowercase();
    keywords.iter().all(|keyword| prompt.contains(keyword.to_lowercase().as_str()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_select_is_derived_from_correct_answers() {
        let bank = QuestionBank::from_json(r#"[
            {"prompt": "one", "options": ["a", "b"], "correct": [1], "topic": "T"},
            {"prompt": "two", "options": ["a", "b", "c"], "correct": [0, 2], "topic": "T"}
        ]"#).unwrap();

        assert!(!bank.questions()[0].multi_select);
        assert!(bank.questions()[1].multi_select);
        assert_eq!(bank.questions()[1].correct_letters(), "A,C");
    }

    #[test]
    fn missing_topic_defaults_to_general() {
        let bank = QuestionBank::from_json(
            r#"[{"prompt": "one", "options": ["a", "b"], "correct": [0]}]"#
        ).unwrap();
        assert_eq!(bank.questions()[0].topic, "General");
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let result = QuestionBank::from_json(r#"[
            {"prompt": "one", "options": ["a", "b"], "correct": [0]},
            {"prompt": "two", "options": ["a", "b"], "correct": [2]}
        ]"#);
        match result {
            Err(QuizError::InvalidQuestion { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidQuestion, got {:?}", other),
        }
    }

    #[test]
    fn blank_option_is_rejected() {
        let result = QuestionBank::from_json(r#"[
            {"prompt": "one", "options": ["a", "b"], "correct": [0]},
            {"prompt": "two", "options": ["a", " ", "c"], "correct": [0]}
        ]"#);
        match result {
            Err(QuizError::InvalidQuestion { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, "option B is empty");
            },
            other => panic!("Expected InvalidQuestion, got {:?}", other),
        }
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let result = QuestionBank::from_json(
            r#"[{"prompt": "", "options": ["a", "b"], "correct": [0]}]"#
        );
        assert!(matches!(result, Err(QuizError::InvalidQuestion { index: 0, .. })));
    }

    #[test]
    fn empty_correct_set_is_rejected() {
        let result = QuestionBank::from_json(
            r#"[{"prompt": "one", "options": ["a", "b"], "correct": []}]"#
        );
        assert!(matches!(result, Err(QuizError::InvalidQuestion { index: 0, .. })));
    }

    #[test]
    fn single_select_with_two_answers_is_rejected() {
        let result = QuestionBank::from_json(r#"[
            {"prompt": "one", "options": ["a", "b"], "correct": [0, 1], "multi_select": false}
        ]"#);
        assert!(matches!(result, Err(QuizError::InvalidQuestion { index: 0, .. })));
    }

    #[test]
    fn note_for_missing_option_is_rejected() {
        let result = QuestionBank::from_json(r#"[
            {"prompt": "one", "options": ["a", "b"], "correct": [0],
             "explanations": {"5": "nope"}}
        ]"#);
        assert!(matches!(result, Err(QuizError::InvalidQuestion { index: 0, .. })));
    }

    #[test]
    fn duplicate_prompts_are_dropped() {
        let bank = QuestionBank::from_json(r#"[
            {"prompt": "same", "options": ["a", "b"], "correct": [0]},
            {"prompt": "same", "options": ["c", "d"], "correct": [1]},
            {"prompt": "other", "options": ["a", "b"], "correct": [1]}
        ]"#).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].options, vec![s("a"), s("b")]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(QuestionBank::from_json("{"), Err(QuizError::Json(_))));
    }

    #[test]
    fn builtin_bank_is_valid() {
        let bank = load_bank(None).unwrap();
        assert!(bank.len() >= 20);
    }

    #[test]
    fn missing_bank_file_is_reported() {
        let result = load_bank(Some(Path::new("tests/banks/does_not_exist.json")));
        assert!(matches!(result, Err(QuizError::BankNotFound(_))));
    }

    #[test]
    fn grading_ignores_order() {
        let mut q = Question::new("q", &["a", "b", "c", "d"], "T");
        q.multi_select = true;
        q.correct = [1, 3].iter().cloned().collect();

        let forward: BTreeSet<usize> = vec![1, 3].into_iter().collect();
        let backward: BTreeSet<usize> = vec![3, 1].into_iter().collect();
        assert!(q.grade(&forward));
        assert!(q.grade(&backward));
        assert!(!q.grade(&[1].iter().cloned().collect()));
    }

    #[test]
    fn can_filter_by_topic() {
        let bank = QuestionBank::new(vec![
            Question::new("What is a tuple?", &["a", "b"], "Basics"),
            Question::new("What is a closure?", &["a", "b"], "Scope"),
        ]).unwrap();

        let mut options = FilterOptions::new();
        assert_eq!(bank.filter(&options).len(), 2);

        options.topics.push(s("Scope"));
        let filtered = bank.filter(&options);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].topic, "Scope");

        options.topics.clear();
        options.exclude.push(s("Scope"));
        assert_eq!(bank.filter(&options)[0].topic, "Basics");
    }

    #[test]
    fn can_filter_by_keyword() {
        let bank = QuestionBank::new(vec![
            Question::new("What is a tuple?", &["a", "b"], "Basics"),
            Question::new("What is a closure?", &["a", "b"], "Scope"),
        ]).unwrap();

        let mut options = FilterOptions::new();
        options.keywords.push(s("CLOSURE"));
        assert_eq!(bank.filter(&options).len(), 1);

        options.keywords.push(s("tuple"));
        assert_eq!(bank.filter(&options).len(), 0);
    }

    #[test]
    fn letters_are_sorted() {
        let indices: BTreeSet<usize> = vec![3, 0, 1].into_iter().collect();
        assert_eq!(letters(&indices), "A,B,D");
        assert_eq!(letter(2), 'C');
    }

    fn s(mystr: &str) -> String {
        String::from(mystr)
    }
}
