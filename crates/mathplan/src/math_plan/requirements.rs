//! Merging the math requirements of every major a student is considering into one set.

use super::catalog::Major;
use super::first_term::RecommendedFirstTerm;
use super::pick_list::{MergedPickList, PickList, PickListMerger};
use super::student_status::StudentStatus;
use super::types::{CalculusRequirement, Course, GradeGates, MinimumGrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Precalculus courses a named-course walk can start from, lowest first.
const FIRST_NAMED_CANDIDATES: [Course; 5] = [
    Course::M117,
    Course::M118,
    Course::M124,
    Course::M125,
    Course::M126,
];

/// The combined math requirements for a set of majors.
///
/// `named_precalculus` and `implicit_courses` never overlap. Together they are every precalculus
/// course the student must complete or place out of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// Every selected major only needs AUCC core credits
    pub core_only: bool,
    pub named_precalculus: BTreeSet<Course>,
    /// Prerequisites of named courses (and of the calculus requirement) not named themselves
    pub implicit_courses: BTreeSet<Course>,
    pub named_calculus: CalculusRequirement,
    /// Pick lists still open after completions and named courses, in canonical order
    pub pick_lists: Vec<PickList>,
    /// Courses that must be passed with a minimum grade
    pub grade_gates: GradeGates,
    pub first_term: RecommendedFirstTerm,
}

impl Requirements {
    /// Requirements for majors that need only core credits.
    pub fn core_only(first_term: RecommendedFirstTerm) -> Self {
        Self {
            core_only: true,
            first_term,
            ..Default::default()
        }
    }

    /// True when nothing beyond core credits is asked for.
    pub fn is_empty(&self) -> bool {
        self.named_precalculus.is_empty()
            && self.named_calculus.is_none()
            && self.pick_lists.is_empty()
    }

    /// The lowest named precalculus course a student should work toward.
    pub fn first_named_precalculus(&self) -> Option<Course> {
        FIRST_NAMED_CANDIDATES
            .into_iter()
            .find(|c| self.named_precalculus.contains(c))
    }

    /// The first course the student should try to become eligible for: the lowest named
    /// precalculus course, else the easiest calculus option.
    pub fn first_named_course(&self) -> Option<Course> {
        self.first_named_precalculus()
            .or_else(|| self.named_calculus.options().first().copied())
    }

    pub fn minimum_grade(&self, course: Course) -> MinimumGrade {
        self.grade_gates
            .get(&course)
            .copied()
            .unwrap_or(MinimumGrade::Passing)
    }

    pub fn is_gated(&self, course: Course) -> bool {
        self.grade_gates.contains_key(&course)
    }

    /// The open pick lists merged into one requirement.
    pub fn merged_pick_lists(&self) -> MergedPickList {
        PickListMerger::merge(&self.pick_lists)
    }
}

impl fmt::Display for Requirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.core_only {
            return f.write_str("3 Credits of AUCC 1B core");
        }

        let mut parts: Vec<String> = self
            .named_precalculus
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        if !self.named_calculus.is_none() {
            parts.push(self.named_calculus.label());
        }
        let mut out = parts.join(", ");

        if !self.implicit_courses.is_empty() {
            let implicit: Vec<&str> = self.implicit_courses.iter().map(|c| c.label()).collect();
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("[implicit: {}]", implicit.join(", ")));
        }

        let mut tail: Vec<String> = self.pick_lists.iter().map(|p| p.to_string()).collect();
        let gated: Vec<&str> = self
            .grade_gates
            .iter()
            .filter(|(_, m)| **m == MinimumGrade::BMinus)
            .map(|(c, _)| c.label())
            .collect();
        if !gated.is_empty() {
            tail.push(format!("(Needs B- or higher in {})", gated.join(", ")));
        }
        for part in tail {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(&part);
        }

        f.write_str(&out)
    }
}

/// Builds [`Requirements`] from a set of majors.
pub struct RequirementAggregator;

impl RequirementAggregator {
    /// Aggregates the requirements of the majors a student is considering.
    ///
    /// # Arguments
    /// * `majors` - Majors of interest, in any order
    /// * `status` - The student's record, used only to drop pick lists already satisfied
    ///
    /// # Returns
    /// * `Requirements` - Identical for any ordering of `majors`
    pub fn aggregate(majors: &[&Major], status: &StudentStatus) -> Requirements {
        let first_term = RecommendedFirstTerm::from_ideals(majors.iter().map(|m| &m.ideal_first_term));

        if majors.iter().all(|m| m.requirement.is_core_only()) {
            return Requirements::core_only(first_term);
        }

        let named_precalculus: BTreeSet<Course> = majors
            .iter()
            .flat_map(|m| m.requirement.named_precalculus().iter().copied())
            .collect();
        let named_calculus =
            CalculusRequirement::resolve(majors.iter().map(|m| m.requirement.named_calculus()));

        let implicit_courses = implicit_courses(&named_precalculus, named_calculus);
        let pick_lists = open_pick_lists(majors, &named_precalculus, named_calculus, status);

        let requirements = Requirements {
            core_only: false,
            named_precalculus,
            implicit_courses,
            named_calculus,
            pick_lists,
            grade_gates: named_calculus.grade_gates(),
            first_term,
        };

        debug!(
            majors = majors.len(),
            requirements = %requirements,
            "Aggregated major requirements"
        );

        requirements
    }
}

/// Courses implied by the calculus requirement and the prerequisites of named courses.
fn implicit_courses(
    named: &BTreeSet<Course>,
    calculus: CalculusRequirement,
) -> BTreeSet<Course> {
    calculus
        .implied_courses()
        .iter()
        .chain(named.iter().flat_map(|c| c.prerequisites()))
        .copied()
        .filter(|c| !named.contains(c))
        .collect()
}

fn open_pick_lists(
    majors: &[&Major],
    named: &BTreeSet<Course>,
    calculus: CalculusRequirement,
    status: &StudentStatus,
) -> Vec<PickList> {
    let mut lists = Vec::new();

    for major in majors {
        let Some(rule) = major.requirement.pick_rule() else {
            continue;
        };
        if rule.is_subsumed(calculus, |c| status.has_completed(c)) {
            continue;
        }

        let mut pick = PickList::new(PickList::DEFAULT_CREDITS, rule.allowed.iter().copied());
        for course in status.completed_courses() {
            // No pick list offers MATH 127; it stands in for MATH 120
            let course = if course == Course::M127 { Course::M120 } else { course };
            pick.remove(course);
        }
        for &course in named {
            pick.remove(course);
        }

        if !pick.is_satisfied() {
            lists.push(pick);
        }
    }

    lists.sort();
    lists.dedup();
    lists
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::math_plan::types::{IdealFirstTerm, MajorRequirement};

    pub fn major(id: u32, requirement: MajorRequirement) -> Major {
        Major {
            id,
            question_numbers: vec![id],
            program_codes: Vec::new(),
            name: format!("Major {id}"),
            college: "Test College".to_string(),
            requirement,
            ideal_first_term: IdealFirstTerm::core_only(),
        }
    }

    pub fn majors(requirements: &[MajorRequirement]) -> Vec<Major> {
        requirements
            .iter()
            .enumerate()
            .map(|(i, &r)| major(1000 + i as u32, r))
            .collect()
    }

    pub fn aggregate(majors: &[Major], status: &StudentStatus) -> Requirements {
        let refs: Vec<&Major> = majors.iter().collect();
        RequirementAggregator::aggregate(&refs, status)
    }
}
