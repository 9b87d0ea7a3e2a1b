//! What a student should ideally be eligible for in their first term.

use super::pick_list::{PickList, PickListMerger};
use super::types::{join_labels, CalculusRequirement, Course, IdealFirstTerm, IdealFirstTermKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

const CORE_ONLY_TEXT: &str = "three credits of AUCC 1B courses";

/// Courses accepted by "MATH 117 or higher".
const FROM_117_UP: &[Course] = &[
    Course::M117,
    Course::M118,
    Course::M124,
    Course::M120,
    Course::M125,
    Course::M126,
    Course::M141,
    Course::M155,
    Course::M156,
    Course::M160,
];

/// The first-term recommendation for a set of majors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendedFirstTerm {
    /// No majors were selected
    #[default]
    Undetermined,
    CoreOnly,
    /// Every course in `named` and one option of each alternative, plus any one of `pick`
    Courses {
        named: BTreeSet<Course>,
        /// Named calculus choices, by priority
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        alternatives: Vec<CalculusRequirement>,
        pick: BTreeSet<Course>,
    },
}

impl RecommendedFirstTerm {
    /// Combines the ideal first terms of several majors.
    ///
    /// Named courses are unioned. Pick lists (including "course or higher" entries) lose any
    /// course already named and are then merged; courses the merge promotes become named.
    /// Named calculus alternatives are kept whole and never reduce a pick list.
    pub fn from_ideals<'a, I>(ideals: I) -> Self
    where
        I: IntoIterator<Item = &'a IdealFirstTerm>,
    {
        let ideals: Vec<&IdealFirstTerm> = ideals.into_iter().collect();

        if ideals.is_empty() {
            return RecommendedFirstTerm::Undetermined;
        }
        if ideals.iter().all(|i| i.kind == IdealFirstTermKind::CoreOnly) {
            return RecommendedFirstTerm::CoreOnly;
        }

        let mut named: BTreeSet<Course> = ideals
            .iter()
            .filter(|i| i.kind == IdealFirstTermKind::NamedList)
            .flat_map(|i| i.courses.iter().copied())
            .collect();

        let mut alternatives: Vec<CalculusRequirement> = ideals
            .iter()
            .filter(|i| i.kind == IdealFirstTermKind::NamedList)
            .filter_map(|i| i.calculus)
            .collect();
        alternatives.sort_by_key(|c| c.rank());
        alternatives.dedup();

        let mut picks = Vec::new();
        for ideal in &ideals {
            let Some(mut pick) = pick_list_for(ideal) else {
                continue;
            };
            for &course in &named {
                pick.remove(course);
            }
            if !pick.is_satisfied() {
                picks.push(pick);
            }
        }

        let merged = PickListMerger::merge(&picks);
        named.extend(merged.named);

        RecommendedFirstTerm::Courses {
            named,
            alternatives,
            pick: merged.pick.courses,
        }
    }

    /// Text completing "Ideally, you would be eligible to register for ___".
    ///
    /// # Returns
    /// * `Some(String)` - e.g. `MATH 117, MATH 118, and MATH 124 as well as MATH 141 or MATH 155`
    /// * `None` - If there is nothing to recommend
    pub fn text(&self) -> Option<String> {
        match self {
            RecommendedFirstTerm::Undetermined => None,
            RecommendedFirstTerm::CoreOnly => Some(CORE_ONLY_TEXT.to_string()),
            RecommendedFirstTerm::Courses {
                named,
                alternatives,
                pick,
            } => {
                let no_named = named.is_empty() && alternatives.is_empty();
                match (no_named, pick.is_empty()) {
                    (true, true) => None,
                    (true, false) => Some(pick_text(pick)),
                    (false, true) => Some(named_text(named, alternatives)),
                    (false, false) => Some(format!(
                        "{} as well as {}",
                        named_text(named, alternatives),
                        pick_text(pick)
                    )),
                }
            }
        }
    }
}

fn pick_list_for(ideal: &IdealFirstTerm) -> Option<PickList> {
    match ideal.kind {
        IdealFirstTermKind::CoreOnly | IdealFirstTermKind::NamedList => None,
        IdealFirstTermKind::PickList => Some(PickList::new(
            PickList::DEFAULT_CREDITS,
            ideal.courses.iter().copied(),
        )),
        IdealFirstTermKind::CourseOrHigher => {
            let Some(&floor) = ideal.courses.iter().min() else {
                warn!("'Course or higher' first term names no course");
                return None;
            };
            Some(PickList::new(
                PickList::DEFAULT_CREDITS,
                FROM_117_UP.iter().copied().filter(|&c| c >= floor),
            ))
        }
    }
}

fn named_text(courses: &BTreeSet<Course>, alternatives: &[CalculusRequirement]) -> String {
    let labels: Vec<String> = courses
        .iter()
        .map(|c| c.label().to_string())
        .chain(alternatives.iter().map(|a| a.label()))
        .collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    join_labels(&labels, "and")
}

fn pick_text(courses: &BTreeSet<Course>) -> String {
    let labels: Vec<&str> = courses.iter().map(|c| c.label()).collect();
    if labels.len() > 2 {
        format!("any of {}", join_labels(&labels, "or"))
    } else {
        join_labels(&labels, "or")
    }
}
