use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AgendoError;
use crate::input::Prompter;
use crate::models::event::EventDraft;
use crate::parse;

/// Turns the free-form token tail of an `add` command into a complete
/// [`EventDraft`], prompting for whatever the tokens did not cover.
///
/// Tokens are classified greedily, time probed before date, so a bare hour
/// like "15" is always a start time. A token matching neither grammar is a
/// category, and everything after the category joins into the event name.
/// Ambiguity is never an error: unclassified fields degrade into prompts.
///
/// Accepted token shapes (fields not listed are prompted for):
///   (time) | (date)
///   (time) (date) | (date) (time) | (time|date) (category)
///   (time) (date) (end-time) | (date) (time) (end-time)
///   (time) (date) (category) (name...) | (date) (time) (category) (name...)
///   (time|date) (category) (name...)
///   (time) (date) (end-time) (category) (name...)
///
/// The only error is a closed input channel, which aborts resolution with no
/// partial draft.
pub fn resolve_event(
    tokens: &[String],
    now: NaiveDateTime,
    prompter: &mut dyn Prompter,
) -> Result<EventDraft, AgendoError> {
    let mut state = ArgumentState::default();
    state.classify(tokens, now);
    state.fill_by_prompting(now, prompter)
}

/// Which fields the positional pass managed to pin down, and their values.
/// Lives only for one resolution call.
#[derive(Debug, Default)]
struct ArgumentState {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    end: Option<NaiveDateTime>,
    category: Option<String>,
    name: Option<String>,
}

impl ArgumentState {
    fn classify(&mut self, tokens: &[String], now: NaiveDateTime) {
        match tokens {
            [] => {}
            [single] => self.classify_single(single, now),
            [first, second] => self.classify_pair(first, second, now),
            [first, second, rest @ ..] => {
                self.classify_pair(first, second, now);
                if let (Some(date), Some(time)) = (self.date, self.time) {
                    self.classify_tail(date.and_time(time), rest, now);
                } else if self.date.is_some() || self.time.is_some() {
                    // The pair fallback already took tokens[1] as category,
                    // so the rest is the name.
                    self.name = Some(rest.join(" "));
                }
                // Neither half parsed: leave everything to the prompts.
            }
        }
    }

    fn classify_single(&mut self, token: &str, now: NaiveDateTime) {
        if let Some(time) = parse::parse_time(token, now.time()) {
            self.time = Some(time);
        } else if let Some(date) = parse::parse_date(token, now.date()) {
            self.date = Some(date);
        } else {
            self.category = Some(token.to_string());
        }
    }

    fn classify_pair(&mut self, first: &str, second: &str, now: NaiveDateTime) {
        // (time, date)?
        let combined = parse::combine_time_then_date(first, second, now);
        if let (Some(time), Some(date)) = (combined.time, combined.date) {
            self.time = Some(time);
            self.date = Some(date);
            return;
        }
        if combined.time.is_some() {
            // (time, category)
            self.time = combined.time;
            self.category = Some(second.to_string());
            return;
        }
        // (date, time)?
        let combined = parse::combine_date_then_time(first, second, now);
        if let (Some(date), Some(time)) = (combined.date, combined.time) {
            self.date = Some(date);
            self.time = Some(time);
        } else if combined.date.is_some() {
            // (date, category)
            self.date = combined.date;
            self.category = Some(second.to_string());
        }
        // Neither token parsed: leave both halves open.
    }

    /// Start date and time are already fixed from the first two tokens;
    /// `rest` is everything from tokens[2] on.
    fn classify_tail(&mut self, start: NaiveDateTime, rest: &[String], now: NaiveDateTime) {
        if let Some(end_time) = parse::parse_time(&rest[0], now.time()) {
            // Positional end time lands on the start's day; an end at or
            // before the start means the event crosses midnight, so it moves
            // to the next day.
            let mut end = start.date().and_time(end_time);
            if end <= start {
                end = end + Duration::days(1);
            }
            self.end = Some(end);
            if rest.len() > 1 {
                self.category = Some(rest[1].clone());
            }
            if rest.len() > 2 {
                self.name = Some(rest[2..].join(" "));
            }
        } else {
            self.category = Some(rest[0].clone());
            if rest.len() > 1 {
                self.name = Some(rest[1..].join(" "));
            }
        }
    }

    /// Asks for every still-open field, in order: date, begin time, end time,
    /// category, name. Malformed answers re-ask the same question; an end at
    /// or before the start re-asks only the end time, it is never wrapped to
    /// the next day.
    fn fill_by_prompting(
        self,
        now: NaiveDateTime,
        prompter: &mut dyn Prompter,
    ) -> Result<EventDraft, AgendoError> {
        let date = match self.date {
            Some(date) => date,
            None => loop {
                let answer = prompter.prompt_line("date of event")?;
                match parse::parse_date(&answer, now.date()) {
                    Some(date) => break date,
                    None => prompter.warn("Wrong formatting!"),
                }
            },
        };
        let time = match self.time {
            Some(time) => time,
            None => loop {
                let answer = prompter.prompt_line("begin time of event")?;
                match parse::parse_time(&answer, now.time()) {
                    Some(time) => break time,
                    None => prompter.warn("Wrong formatting!"),
                }
            },
        };
        let start = date.and_time(time);

        let end = match self.end {
            Some(end) => end,
            None => loop {
                let answer = prompter.prompt_line("end time of event")?;
                match parse::parse_time(&answer, now.time()) {
                    Some(end_time) => {
                        let end = date.and_time(end_time);
                        if end <= start {
                            prompter.warn("End time cannot be before start time!");
                        } else {
                            break end;
                        }
                    }
                    None => prompter.warn("Wrong formatting!"),
                }
            },
        };

        let category = match self.category {
            Some(category) => category,
            None => prompter.prompt_line("category of event")?,
        };
        let name = match self.name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => prompter.prompt_line("name of event")?,
        };

        Ok(EventDraft {
            start,
            end,
            category,
            name,
        })
    }
}
