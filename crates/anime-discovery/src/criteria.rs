//! User-selected filter criteria.
//!
//! `FilterCriteria` is built once per discovery run through
//! `FilterCriteriaBuilder`, which validates ranges and keeps every
//! category's include and exclude sets disjoint.

use crate::error::DiscoveryError;
use serde::Serialize;
use shared::TagCategory;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Years the catalog date filter can express
const VALID_YEARS: RangeInclusive<i32> = 1900..=2999;

/// Tri-state selection of a single category item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    None,
    Include,
    Exclude,
}

/// Disjoint include/exclude sets for one tag category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFilter {
    include: BTreeSet<u32>,
    exclude: BTreeSet<u32>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as required. Removes it from the exclude set.
    pub fn include(&mut self, id: u32) {
        self.exclude.remove(&id);
        self.include.insert(id);
    }

    /// Mark `id` as forbidden. Removes it from the include set.
    pub fn exclude(&mut self, id: u32) {
        self.include.remove(&id);
        self.exclude.insert(id);
    }

    pub fn clear(&mut self, id: u32) {
        self.include.remove(&id);
        self.exclude.remove(&id);
    }

    pub fn state(&self, id: u32) -> Toggle {
        if self.include.contains(&id) {
            Toggle::Include
        } else if self.exclude.contains(&id) {
            Toggle::Exclude
        } else {
            Toggle::None
        }
    }

    /// Advance `id` through none -> include -> exclude -> none
    pub fn cycle(&mut self, id: u32) -> Toggle {
        match self.state(id) {
            Toggle::None => self.include(id),
            Toggle::Include => self.exclude(id),
            Toggle::Exclude => self.clear(id),
        }
        self.state(id)
    }

    pub fn included(&self) -> &BTreeSet<u32> {
        &self.include
    }

    pub fn excluded(&self) -> &BTreeSet<u32> {
        &self.exclude
    }
}

/// All constraints for one discovery run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub types: BTreeSet<String>,

    pub min_episodes: Option<u32>,
    pub max_episodes: Option<u32>,

    pub decade: Option<i32>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,

    pub min_score: Option<f64>,
    pub max_score: Option<f64>,

    pub genres: CategoryFilter,
    pub themes: CategoryFilter,
    pub demographics: CategoryFilter,
    pub strict_mode: bool,

    // Lower-cased substring needles
    pub studios: Vec<String>,
    pub producers: Vec<String>,
    pub directors: Vec<String>,
    pub seiyuus: Vec<String>,
}

impl FilterCriteria {
    pub fn builder() -> FilterCriteriaBuilder {
        FilterCriteriaBuilder::default()
    }

    pub fn category(&self, category: TagCategory) -> &CategoryFilter {
        match category {
            TagCategory::Genre => &self.genres,
            TagCategory::Theme => &self.themes,
            TagCategory::Demographic => &self.demographics,
        }
    }

    pub fn has_episode_bounds(&self) -> bool {
        self.min_episodes.is_some() || self.max_episodes.is_some()
    }

    /// Inclusive year range sent to the catalog.
    ///
    /// A decade wins over explicit years; a single explicit year bounds
    /// both ends.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        if let Some(decade) = self.decade {
            return Some((decade, decade.saturating_add(9)));
        }
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(year), None) | (None, Some(year)) => Some((year, year)),
            (None, None) => None,
        }
    }
}

/// Split a comma-separated filter into trimmed, lower-cased needles
pub fn parse_needles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|needle| needle.trim().to_lowercase())
        .filter(|needle| !needle.is_empty())
        .collect()
}

/// Builder for `FilterCriteria`
#[derive(Debug, Clone, Default)]
pub struct FilterCriteriaBuilder {
    criteria: FilterCriteria,
}

impl FilterCriteriaBuilder {
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.criteria.types.insert(item_type.into());
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn min_episodes(mut self, min: u32) -> Self {
        self.criteria.min_episodes = Some(min);
        self
    }

    pub fn max_episodes(mut self, max: u32) -> Self {
        self.criteria.max_episodes = Some(max);
        self
    }

    pub fn decade(mut self, decade: i32) -> Self {
        self.criteria.decade = Some(decade);
        self
    }

    pub fn start_year(mut self, year: i32) -> Self {
        self.criteria.start_year = Some(year);
        self
    }

    pub fn end_year(mut self, year: i32) -> Self {
        self.criteria.end_year = Some(year);
        self
    }

    pub fn min_score(mut self, score: f64) -> Self {
        self.criteria.min_score = Some(score);
        self
    }

    pub fn max_score(mut self, score: f64) -> Self {
        self.criteria.max_score = Some(score);
        self
    }

    pub fn include(mut self, category: TagCategory, id: u32) -> Self {
        self.category_mut(category).include(id);
        self
    }

    pub fn exclude(mut self, category: TagCategory, id: u32) -> Self {
        self.category_mut(category).exclude(id);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.criteria.strict_mode = strict;
        self
    }

    pub fn studios(mut self, raw: &str) -> Self {
        self.criteria.studios = parse_needles(raw);
        self
    }

    pub fn producers(mut self, raw: &str) -> Self {
        self.criteria.producers = parse_needles(raw);
        self
    }

    pub fn directors(mut self, raw: &str) -> Self {
        self.criteria.directors = parse_needles(raw);
        self
    }

    pub fn seiyuus(mut self, raw: &str) -> Self {
        self.criteria.seiyuus = parse_needles(raw);
        self
    }

    fn category_mut(&mut self, category: TagCategory) -> &mut CategoryFilter {
        match category {
            TagCategory::Genre => &mut self.criteria.genres,
            TagCategory::Theme => &mut self.criteria.themes,
            TagCategory::Demographic => &mut self.criteria.demographics,
        }
    }

    /// Validate and produce the criteria
    pub fn build(self) -> Result<FilterCriteria, DiscoveryError> {
        let c = self.criteria;

        for score in [c.min_score, c.max_score].into_iter().flatten() {
            if !(0.0..=10.0).contains(&score) || (score * 2.0).fract() != 0.0 {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "score {} must be between 0 and 10 in steps of 0.5",
                    score
                )));
            }
        }
        if let (Some(min), Some(max)) = (c.min_score, c.max_score) {
            if min > max {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "minimum score {} exceeds maximum score {}",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (c.min_episodes, c.max_episodes) {
            if min > max {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "minimum episodes {} exceeds maximum episodes {}",
                    min, max
                )));
            }
        }
        if let (Some(start), Some(end)) = (c.start_year, c.end_year) {
            if start > end {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "start year {} is after end year {}",
                    start, end
                )));
            }
        }
        for year in [c.decade, c.start_year, c.end_year].into_iter().flatten() {
            if !VALID_YEARS.contains(&year) {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "year {} must be between {} and {}",
                    year,
                    VALID_YEARS.start(),
                    VALID_YEARS.end()
                )));
            }
        }
        if let Some(decade) = c.decade {
            if decade % 10 != 0 {
                return Err(DiscoveryError::InvalidCriteria(format!(
                    "decade {} must be a multiple of ten",
                    decade
                )));
            }
        }

        Ok(c)
    }
}
