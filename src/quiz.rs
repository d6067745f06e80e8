//! Guess-the-country session: which country is up, how many chances are left,
//! the score, and when to move on. Time is passed in by the caller.

use crate::data::CountryEntry;
use crate::hash::shuffle;
use std::time::{Duration, Instant};
use tracing::info;

/// Pause after a correct guess before the next country
pub const CORRECT_DELAY: Duration = Duration::from_millis(1500);
/// Pause after the answer is revealed
pub const REVEAL_DELAY: Duration = Duration::from_millis(3000);
/// How long result text stays on screen
pub const RESULT_VISIBLE: Duration = Duration::from_millis(2000);

/// Outcome of one submitted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong { chances_left: u32 },
    /// Out of chances; the answer was shown
    Revealed { answer: String },
    /// Not taking answers right now
    Ignored,
}

/// Text shown after a guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub positive: bool,
    pub until: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Asking,
    /// Waiting to move to the next country
    Advancing { at: Instant },
    Finished,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    countries: Vec<CountryEntry>,
    index: usize,
    chances_used: u32,
    max_chances: u32,
    score: u32,
    phase: Phase,
    feedback: Option<Feedback>,
}

impl QuizSession {
    /// Pick up to `size` distinct countries from `catalog` in an order fixed by `seed`
    pub fn new(catalog: &[CountryEntry], size: usize, max_chances: u32, seed: u64) -> Self {
        let mut countries = catalog.to_vec();
        countries.sort_by(|a, b| a.cca2.cmp(&b.cca2));
        countries.dedup_by(|a, b| a.cca2 == b.cca2);
        shuffle(&mut countries, seed);
        countries.truncate(size);
        info!(countries = countries.len(), seed, "started quiz session");

        let phase = if countries.is_empty() {
            Phase::Finished
        } else {
            Phase::Asking
        };
        Self {
            countries,
            index: 0,
            chances_used: 0,
            max_chances: max_chances.max(1),
            score: 0,
            phase,
            feedback: None,
        }
    }

    pub fn current(&self) -> Option<&CountryEntry> {
        match self.phase {
            Phase::Finished => None,
            _ => self.countries.get(self.index),
        }
    }

    /// (1-based question number, total)
    pub fn progress(&self) -> (usize, usize) {
        let total = self.countries.len();
        ((self.index + 1).min(total), total)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_chances(&self) -> u32 {
        self.max_chances
    }

    pub fn chances_left(&self) -> u32 {
        self.max_chances - self.chances_used
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The result text, while it is still on screen
    pub fn feedback(&self, now: Instant) -> Option<&Feedback> {
        self.feedback.as_ref().filter(|f| now < f.until)
    }

    pub fn submit(&mut self, guess: &str, now: Instant) -> Verdict {
        if self.phase != Phase::Asking {
            return Verdict::Ignored;
        }
        let Some(country) = self.countries.get(self.index) else {
            return Verdict::Ignored;
        };
        let code = country.cca2.clone();
        let answer = country.name.clone();

        if guess.trim().to_lowercase() == answer.to_lowercase() {
            self.score += 1;
            self.phase = Phase::Advancing { at: now + CORRECT_DELAY };
            self.show("Correct!".to_string(), true, now);
            info!(country = %code, score = self.score, "correct guess");
            return Verdict::Correct;
        }

        self.chances_used += 1;
        if self.chances_used < self.max_chances {
            self.show("Incorrect! Try again.".to_string(), false, now);
            Verdict::Wrong {
                chances_left: self.chances_left(),
            }
        } else {
            info!(country = %code, "out of chances");
            self.phase = Phase::Advancing { at: now + REVEAL_DELAY };
            self.show(format!("It is {answer}"), false, now);
            Verdict::Revealed { answer }
        }
    }

    /// Move on once the pause after a guess has elapsed. Returns the country
    /// that just became current.
    pub fn poll(&mut self, now: Instant) -> Option<&CountryEntry> {
        let Phase::Advancing { at } = self.phase else {
            return None;
        };
        if now < at {
            return None;
        }

        self.index += 1;
        self.chances_used = 0;
        if self.index < self.countries.len() {
            self.phase = Phase::Asking;
            self.countries.get(self.index)
        } else {
            self.index = self.countries.len().saturating_sub(1);
            self.phase = Phase::Finished;
            self.show("Game over".to_string(), true, now);
            info!(score = self.score, total = self.countries.len(), "quiz finished");
            None
        }
    }

    fn show(&mut self, text: String, positive: bool, now: Instant) {
        self.feedback = Some(Feedback {
            text,
            positive,
            until: now + RESULT_VISIBLE,
        });
    }
}
