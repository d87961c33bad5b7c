use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use super::{SummaryError, SummaryGenerator};
use crate::config::SummaryConfig;

static NUMBERED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]\.").expect("valid numbered line regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stand-in summarizer: waits a bounded random delay, then answers from
/// keyword rules. Optionally fails at a configured rate.
#[derive(Debug, Clone)]
pub struct KeywordSummarizer {
    min_delay: Duration,
    max_delay: Duration,
    failure_rate: f64,
}

impl KeywordSummarizer {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
            failure_rate: 0.0,
        }
    }

    pub fn from_config(config: &SummaryConfig) -> Self {
        let (min, max) = config.delay_range();
        Self::new(min, max).with_failure_rate(config.failure_rate)
    }

    /// Probability in `[0, 1]` that a call rejects.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    fn delay(&self) -> Duration {
        if self.max_delay == self.min_delay {
            return self.min_delay;
        }
        rand::thread_rng().gen_range(self.min_delay..=self.max_delay)
    }

    fn should_fail(&self) -> bool {
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }
}

impl Default for KeywordSummarizer {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

#[async_trait]
impl SummaryGenerator for KeywordSummarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        let delay = self.delay();
        let fail = self.should_fail();

        tokio::time::sleep(delay).await;

        if fail {
            return Err(SummaryError("simulated generator failure".to_string()));
        }
        Ok(summarize_text(content))
    }
}

/// The keyword rules, without the delay.
///
/// Keywords are matched case-insensitively, first match wins:
/// "shopping list", "meeting", "recipe", "book", then a word count.
pub fn summarize_text(content: &str) -> String {
    let lower = content.to_lowercase();

    if lower.contains("shopping list") {
        let items = content
            .split('\n')
            .filter(|line| line.trim().starts_with('-'))
            .count();
        return format!(
            "A shopping list containing {} items including groceries and household supplies.",
            items
        );
    }

    if lower.contains("meeting") {
        return "Meeting notes covering project updates, goals, and action items for team follow-up."
            .to_string();
    }

    if lower.contains("recipe") {
        return format!(
            "Recipe instructions detailing {} ingredients and preparation steps.",
            numbered_lines(content)
        );
    }

    if lower.contains("book") {
        return format!(
            "A curated list of {} book recommendations for personal development and entertainment.",
            numbered_lines(content)
        );
    }

    // Blank content still splits into one (empty) piece and reads "1 words".
    let words = WHITESPACE_RE.split(content).count();
    let plural = if words == 1 && !content.trim().is_empty() {
        ""
    } else {
        "s"
    };
    format!(
        "A note containing {} word{} discussing various topics and ideas.",
        words, plural
    )
}

fn numbered_lines(content: &str) -> usize {
    content
        .split('\n')
        .filter(|line| NUMBERED_LINE_RE.is_match(line))
        .count()
}
