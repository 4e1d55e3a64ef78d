/**
 * Reduce the outcome of an exam to a score, a per-topic breakdown, and an optional
 * review of the questions that were missed.
 */
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::engine::{AttemptRecord, ExamOutcome};
use super::question::{letter, letters};


/// Running count of correct and attempted questions for each topic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopicTally {
    counts: BTreeMap<String, TopicCount>,
}


#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TopicCount {
    pub correct: usize,
    pub attempted: usize,
}


impl TopicTally {
    pub fn new() -> Self {
        TopicTally { counts: BTreeMap::new() }
    }

    pub fn record(&mut self, topic: &str, correct: bool) {
        let count = self.counts.entry(topic.to_string()).or_insert_with(TopicCount::default);
        count.attempted += 1;
        if correct {
            count.correct += 1;
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, topic: &str) -> Option<TopicCount> {
        self.counts.get(topic).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TopicCount)> {
        self.counts.iter()
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct TopicRow {
    pub topic: String,
    pub correct: usize,
    pub attempted: usize,
}


impl TopicRow {
    pub fn percent(&self) -> f64 {
        percent(self.correct, self.attempted)
    }
}


/// One option of a missed question as shown in the review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOption {
    pub letter: char,
    pub text: String,
    pub correct: bool,
    pub note: Option<String>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct MissedItem {
    pub prompt: String,
    pub options: Vec<ReviewOption>,
    /// The letters the user chose, e.g. "A,B".
    pub chosen: String,
    pub explanation: Option<String>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub attempted: usize,
    pub correct: usize,
    pub percent: f64,
    /// Most attempted topics first; among equals, the weakest first.
    pub topics: Vec<TopicRow>,
    /// Empty unless a review was requested.
    pub missed: Vec<MissedItem>,
}


impl Report {
    /// Build the report for a finished exam.
    pub fn from_outcome(outcome: &ExamOutcome, review: bool) -> Self {
        let missed = if review { Some(outcome.attempts.as_slice()) } else { None };
        aggregate(outcome.correct, outcome.attempted, &outcome.tally, missed)
    }
}


/// Build a report from the totals and the topic tally. If `missed` is given, every
/// incorrect attempt in it is included in the review.
pub fn aggregate(
    correct: usize,
    attempted: usize,
    tally: &TopicTally,
    missed: Option<&[AttemptRecord]>,
) -> Report {
    let mut topics: Vec<TopicRow> = tally.iter()
        .map(|(topic, count)| TopicRow {
            topic: topic.clone(),
            correct: count.correct,
            attempted: count.attempted,
        })
        .collect();
    topics.sort_by(cmp_topic_rows);

    let missed: Vec<MissedItem> = missed
        .map(|attempts| {
            attempts.iter().filter(|a| !a.correct).map(review_item).collect()
        })
        .unwrap_or_default();

    Report {
        attempted,
        correct,
        percent: percent(correct, attempted),
        topics,
        missed,
    }
}


fn review_item(attempt: &AttemptRecord) -> MissedItem {
    let q = attempt.question;
    let options = q.options.iter().enumerate()
        .map(|(i, text)| ReviewOption {
            letter: letter(i),
            text: text.clone(),
            correct: q.correct.contains(&i),
            note: q.option_notes.get(&i).cloned(),
        })
        .collect();
    MissedItem {
        prompt: q.prompt.clone(),
        options,
        chosen: letters(&attempt.chosen),
        explanation: q.explanation.clone(),
    }
}


/// Sort by number attempted, descending, then by percentage correct, ascending.
fn cmp_topic_rows(a: &TopicRow, b: &TopicRow) -> Ordering {
    b.attempted.cmp(&a.attempted)
        // a.correct / a.attempted vs. b.correct / b.attempted, without floating point.
        .then_with(|| (a.correct * b.attempted).cmp(&(b.correct * a.attempted)))
}


fn percent(correct: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        (correct as f64) / (attempted as f64) * 100.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use crate::question::Question;

    #[test]
    fn nothing_attempted_scores_zero() {
        let report = aggregate(0, 0, &TopicTally::new(), None);
        assert_eq!(report.percent, 0.0);
        assert!(report.topics.is_empty());
        assert!(report.missed.is_empty());
    }

    #[test]
    fn percentage_is_computed() {
        let report = aggregate(3, 4, &TopicTally::new(), None);
        assert_eq!(report.percent, 75.0);
    }

    #[test]
    fn tally_counts_correct_and_attempted() {
        let mut tally = TopicTally::new();
        tally.record("Basics", true);
        tally.record("Basics", false);
        tally.record("Scope", false);

        assert_eq!(tally.get("Basics"), Some(TopicCount { correct: 1, attempted: 2 }));
        assert_eq!(tally.get("Scope"), Some(TopicCount { correct: 0, attempted: 1 }));
        assert_eq!(tally.get("OOP"), None);
    }

    #[test]
    fn topics_sorted_by_attempts_then_weakest_first() {
        let mut tally = TopicTally::new();
        record(&mut tally, "Basics", 2, 2);
        record(&mut tally, "Generators", 1, 3);
        record(&mut tally, "OOP", 3, 3);
        record(&mut tally, "Scope", 0, 1);
        record(&mut tally, "Strings", 1, 2);

        let report = aggregate(7, 11, &tally, None);
        let order: Vec<&str> = report.topics.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(order, vec!["Generators", "OOP", "Strings", "Basics", "Scope"]);
        assert!((report.topics[0].percent() - 33.3).abs() < 0.1);
    }

    #[test]
    fn review_lists_only_missed_questions() {
        let mut hit = Question::new("Which is a list?", &["[]", "()"], "Basics");
        hit.explanation = Some(String::from("Square brackets make a list."));
        let mut miss = Question::new("Pick the falsy values", &["0", "[]", "'a'"], "Basics");
        miss.multi_select = true;
        miss.correct = set(&[0, 1]);
        miss.explanation = Some(String::from("Empty containers and zero are falsy."));
        miss.option_notes.insert(2, String::from("Non-empty strings are truthy."));

        let attempts = vec![
            AttemptRecord { question: &hit, chosen: set(&[0]), correct: true },
            AttemptRecord { question: &miss, chosen: set(&[0, 2]), correct: false },
        ];
        let mut tally = TopicTally::new();
        tally.record("Basics", true);
        tally.record("Basics", false);

        let report = aggregate(1, 2, &tally, Some(attempts.as_slice()));
        assert_eq!(report.missed.len(), 1);

        let item = &report.missed[0];
        assert_eq!(item.prompt, "Pick the falsy values");
        assert_eq!(item.chosen, "A,C");
        assert_eq!(item.explanation.as_deref(), Some("Empty containers and zero are falsy."));
        let flags: Vec<(char, bool)> = item.options.iter().map(|o| (o.letter, o.correct)).collect();
        assert_eq!(flags, vec![('A', true), ('B', true), ('C', false)]);
        assert_eq!(item.options[2].note.as_deref(), Some("Non-empty strings are truthy."));
        assert_eq!(item.options[0].note, None);
    }

    #[test]
    fn review_is_empty_when_not_requested() {
        let q = Question::new("Which is a list?", &["[]", "()"], "Basics");
        let attempts = vec![AttemptRecord { question: &q, chosen: set(&[1]), correct: false }];
        let mut tally = TopicTally::new();
        tally.record("Basics", false);

        assert_eq!(aggregate(0, 1, &tally, None).missed.len(), 0);
        assert_eq!(aggregate(0, 1, &tally, Some(attempts.as_slice())).missed.len(), 1);
    }

    fn record(tally: &mut TopicTally, topic: &str, correct: usize, attempted: usize) {
        for i in 0..attempted {
            tally.record(topic, i < correct);
        }
    }

    fn set(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().cloned().collect()
    }
}
