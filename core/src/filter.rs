//! Client-side event filtering.
//!
//! `matches` is a pure predicate: each populated criterion is an independent
//! gate and an event is kept only if every gate passes. Empty criteria are
//! skipped, so `FilterCriteria::default()` keeps everything.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EventResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {0:?}")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Difficulty criterion; `Any` disables the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    Any,
    Only(Difficulty),
}

impl FromStr for DifficultyFilter {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            return Ok(DifficultyFilter::Any);
        }
        s.parse().map(DifficultyFilter::Only)
    }
}

/// An event as shown in a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListableEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub price: f64,
    pub location: String,
    pub sport: String,
    /// ISO date, e.g. `2025-12-12`.
    pub date: String,
}

impl TryFrom<&EventResponse> for ListableEvent {
    type Error = ParseDifficultyError;

    fn try_from(e: &EventResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: e.event_id.clone(),
            title: e.event_name.clone(),
            description: e.description.clone(),
            difficulty: e.event_difficulty.parse()?,
            price: e.price,
            location: e.location.formatted_address.clone(),
            sport: e.exercise_type.clone(),
            date: date_part(&e.start_time).to_string(),
        })
    }
}

fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// User-specified constraints on a listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Free text matched against title, description, location and sport.
    pub query: String,
    pub difficulty: DifficultyFilter,
    /// `None` is unbounded.
    pub max_price: Option<f64>,
    pub location: String,
    pub sport: String,
    /// Exact ISO date; `None` or empty matches any date.
    pub date: Option<String>,
}

/// Whether `event` passes every populated criterion.
pub fn matches(event: &ListableEvent, criteria: &FilterCriteria) -> bool {
    let query = criteria.query.trim();
    if !query.is_empty() {
        let haystack = format!(
            "{} {} {} {}",
            event.title, event.description, event.location, event.sport
        );
        if !contains_folded(&haystack, query) {
            return false;
        }
    }

    if let DifficultyFilter::Only(wanted) = criteria.difficulty {
        if event.difficulty != wanted {
            return false;
        }
    }

    if let Some(max) = criteria.max_price {
        // A NaN bound admits nothing rather than disabling the gate.
        if max.is_nan() || event.price > max {
            return false;
        }
    }

    let location = criteria.location.trim();
    if !location.is_empty() && !contains_folded(&event.location, location) {
        return false;
    }

    let sport = criteria.sport.trim();
    if !sport.is_empty() && !contains_folded(&event.sport, sport) {
        return false;
    }

    match criteria.date.as_deref() {
        Some(date) if !date.is_empty() => event.date == date,
        _ => true,
    }
}

/// Events that pass `criteria`, in input order.
pub fn filter_events<'a>(events: &'a [ListableEvent], criteria: &FilterCriteria) -> Vec<&'a ListableEvent> {
    events.iter().filter(|e| matches(e, criteria)).collect()
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fysiken() -> ListableEvent {
        ListableEvent {
            id: "1".to_string(),
            title: "Crossfit at Fysiken".to_string(),
            description: "High intensity WOD with a coach".to_string(),
            difficulty: Difficulty::Advanced,
            price: 200.0,
            location: "Göteborg".to_string(),
            sport: "Crossfit".to_string(),
            date: "2025-12-12".to_string(),
        }
    }

    #[test]
    fn default_criteria_match_everything() {
        assert!(matches(&fysiken(), &FilterCriteria::default()));
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            query: "crossfit".to_string(),
            ..Default::default()
        };
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn query_spans_fields_with_single_spaces() {
        let criteria = FilterCriteria {
            query: "coach göteborg".to_string(),
            ..Default::default()
        };
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn whitespace_query_is_ignored() {
        let criteria = FilterCriteria {
            query: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn query_miss() {
        let criteria = FilterCriteria {
            query: "yoga".to_string(),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));
    }

    #[test]
    fn difficulty_must_equal() {
        let mut criteria = FilterCriteria {
            difficulty: DifficultyFilter::Only(Difficulty::Beginner),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));
        criteria.difficulty = DifficultyFilter::Only(Difficulty::Advanced);
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn max_price_is_inclusive() {
        let mut criteria = FilterCriteria {
            max_price: Some(100.0),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));
        criteria.max_price = Some(200.0);
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn nan_max_price_matches_nothing() {
        let criteria = FilterCriteria {
            max_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));
    }

    #[test]
    fn location_and_sport_substrings() {
        let criteria = FilterCriteria {
            location: "stockholm".to_string(),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));

        let criteria = FilterCriteria {
            location: " GÖTE ".to_string(),
            sport: "cross".to_string(),
            ..Default::default()
        };
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn date_is_exact_string_equality() {
        let mut criteria = FilterCriteria {
            date: Some("2025-12-13".to_string()),
            ..Default::default()
        };
        assert!(!matches(&fysiken(), &criteria));
        criteria.date = Some("2025-12-12".to_string());
        assert!(matches(&fysiken(), &criteria));
        criteria.date = Some(String::new());
        assert!(matches(&fysiken(), &criteria));
    }

    #[test]
    fn filter_events_keeps_order() {
        let mut cheap = fysiken();
        cheap.id = "2".to_string();
        cheap.price = 50.0;
        let events = vec![fysiken(), cheap];
        let criteria = FilterCriteria {
            max_price: Some(100.0),
            ..Default::default()
        };
        let kept = filter_events(&events, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "2");
    }

    #[test]
    fn difficulty_filter_parses_any() {
        assert_eq!("any".parse::<DifficultyFilter>(), Ok(DifficultyFilter::Any));
        assert_eq!(
            "intermediate".parse::<DifficultyFilter>(),
            Ok(DifficultyFilter::Only(Difficulty::Intermediate))
        );
        assert!("expert".parse::<DifficultyFilter>().is_err());
    }

    #[test]
    fn date_part_strips_time() {
        assert_eq!(date_part("2025-12-12T18:00:00Z"), "2025-12-12");
        assert_eq!(date_part("2025-12-12"), "2025-12-12");
    }
}
