/**
 * Choose the questions for an exam so that the topics of the bank are represented as
 * evenly as possible.
 *
 * The questions are split into one bucket per topic and each bucket is shuffled, as is
 * the order of the buckets. Questions are then dealt out round-robin, one from each
 * bucket per pass, until enough have been chosen.
 */
use std::collections::HashMap;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::question::Question;


struct TopicBucket<'a> {
    topic: &'a str,
    questions: Vec<&'a Question>,
    /// Index of the next unused question in `questions`.
    next: usize,
}


impl<'a> TopicBucket<'a> {
    fn take(&mut self) -> Option<&'a Question> {
        let q = self.questions.get(self.next).cloned();
        if q.is_some() {
            self.next += 1;
        }
        q
    }

    fn leftovers(&self) -> &[&'a Question] {
        &self.questions[self.next..]
    }
}


/// Choose `min(count, questions.len())` distinct questions with balanced topics.
pub fn sample<'a, R>(questions: &[&'a Question], count: usize, rng: &mut R) -> Vec<&'a Question>
where
    R: Rng + ?Sized,
{
    sample_capped(questions, count, usize::MAX, rng)
}


/// Like `sample`, but round-robin dealing takes at most `per_topic` questions from any
/// one topic. Slots still open afterwards are filled uniformly from the questions left.
fn sample_capped<'a, R>(
    questions: &[&'a Question], count: usize, per_topic: usize, rng: &mut R,
) -> Vec<&'a Question>
where
    R: Rng + ?Sized,
{
    let target = count.min(questions.len());
    let mut buckets = partition(questions);
    for bucket in buckets.iter_mut() {
        bucket.questions.shuffle(rng);
    }
    buckets.shuffle(rng);

    let mut exam = Vec::with_capacity(target);
    let mut passes = 0;
    while exam.len() < target {
        let before = exam.len();
        for bucket in buckets.iter_mut() {
            if exam.len() == target {
                break;
            }
            if bucket.next >= per_topic {
                continue;
            }
            if let Some(q) = bucket.take() {
                exam.push(q);
            }
        }
        passes += 1;

        if exam.len() == before {
            break;
        }
    }
    debug!(
        "Chose {} questions in {} round-robin passes over {} topics",
        exam.len(),
        passes,
        buckets.len(),
    );

    if exam.len() < target {
        let leftovers: Vec<&Question> = buckets.iter()
            .flat_map(|b| b.leftovers().iter().cloned())
            .collect();
        let needed = target - exam.len();
        debug!("Drawing {} more questions uniformly from {} left over", needed, leftovers.len());
        exam.extend(leftovers.choose_multiple(rng, needed).cloned());
    }

    exam
}


/// Take the first `count` questions in order.
pub fn in_order<'a>(questions: &[&'a Question], count: usize) -> Vec<&'a Question> {
    questions.iter().take(count).cloned().collect()
}


/// Split `questions` into one bucket per topic, in order of first appearance.
fn partition<'a>(questions: &[&'a Question]) -> Vec<TopicBucket<'a>> {
    let mut buckets: Vec<TopicBucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &q in questions.iter() {
        let topic = q.topic.as_str();
        let i = *index.entry(topic).or_insert_with(|| {
            buckets.push(TopicBucket { topic, questions: Vec::new(), next: 0 });
            buckets.len() - 1
        });
        buckets[i].questions.push(q);
    }
    debug!(
        "Topics: {}",
        buckets.iter().map(|b| b.topic).collect::<Vec<_>>().join(", ")
    );
    buckets
}
