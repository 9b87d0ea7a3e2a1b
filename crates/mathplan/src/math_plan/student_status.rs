//! A student's completions, transfer credit, and placement results, distilled into the
//! questions the planner asks.

use super::types::{Course, MinimumGrade};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Placement result that makes a student eligible for MATH 117 and MATH 120.
const PLACED_INTO_117: &str = "M 100C";

/// A completed or transferred course as it appears in the student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCredit {
    pub course_id: String,
    #[serde(default)]
    pub grade: Option<String>,
}

/// A placement exam result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCredit {
    pub course_id: String,
    /// `P` (placed out) or `C` (credit earned) count; anything else does not
    pub exam_placed: String,
}

impl PlacementCredit {
    fn counts(&self) -> bool {
        matches!(self.exam_placed.trim(), "P" | "C")
    }
}

/// Raw student data handed to the planner by the records layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub completed: Vec<CourseCredit>,
    #[serde(default)]
    pub transfer: Vec<CourseCredit>,
    #[serde(default)]
    pub placement: Vec<PlacementCredit>,
    /// Placement attempts on record, including ones that earned nothing
    #[serde(default)]
    pub placement_attempts: u32,
}

// Completing any of these means a student is past the prerequisite in question.
const PAST_117: &[Course] = &[
    Course::M117,
    Course::M118,
    Course::M124,
    Course::M125,
    Course::M126,
    Course::M120,
    Course::M127,
    Course::M141,
    Course::M155,
    Course::M156,
    Course::M157,
    Course::M159,
    Course::M160,
    Course::M161,
    Course::M229,
    Course::M269,
];
const PAST_118: &[Course] = &[
    Course::M118,
    Course::M120,
    Course::M127,
    Course::M124,
    Course::M125,
    Course::M126,
    Course::M141,
    Course::M155,
    Course::M156,
    Course::M157,
    Course::M159,
    Course::M160,
    Course::M161,
    Course::M229,
    Course::M269,
];
const PAST_125: &[Course] = &[
    Course::M125,
    Course::M127,
    Course::M126,
    Course::M155,
    Course::M156,
    Course::M157,
    Course::M159,
    Course::M160,
    Course::M161,
];
const READY_FOR_141: &[Course] = &[
    Course::M118,
    Course::M120,
    Course::M127,
    Course::M141,
    Course::M155,
    Course::M156,
    Course::M157,
    Course::M159,
    Course::M160,
    Course::M161,
];
const READY_FOR_155: &[Course] = &[
    Course::M127,
    Course::M141,
    Course::M155,
    Course::M156,
    Course::M157,
    Course::M159,
    Course::M160,
    Course::M161,
];
const READY_FOR_160: &[Course] = &[
    Course::M127,
    Course::M156,
    Course::M159,
    Course::M160,
    Course::M161,
];

/// Courses counted toward the AUCC core credit total.
const CORE_COURSES: &[Course] = &[
    Course::M117,
    Course::M118,
    Course::M124,
    Course::M125,
    Course::M126,
    Course::M120,
    Course::M127,
];

/// What the planner knows about one student for the duration of one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentStatus {
    /// Grades on record per course, from completions and transfer credit
    completions: BTreeMap<Course, Vec<Option<String>>>,
    placed_out: BTreeSet<Course>,
    placed_into_117: bool,
    placement_attempts: u32,
}

impl StudentStatus {
    /// Builds a status from a raw record. Course ids the planner doesn't know are skipped.
    pub fn from_record(record: &StudentRecord) -> Self {
        let mut status = StudentStatus {
            placement_attempts: record.placement_attempts,
            ..Default::default()
        };

        for credit in record.completed.iter().chain(record.transfer.iter()) {
            match Course::from_course_id(&credit.course_id) {
                Some(course) => status
                    .completions
                    .entry(course)
                    .or_default()
                    .push(credit.grade.clone()),
                None => debug!(course_id = %credit.course_id, "Ignoring unrecognized completed course"),
            }
        }

        for placement in record.placement.iter().filter(|p| p.counts()) {
            if placement.course_id.trim() == PLACED_INTO_117 {
                status.placed_into_117 = true;
                continue;
            }
            match Course::from_course_id(&placement.course_id) {
                Some(course) => {
                    status.placed_out.insert(course);
                }
                None => debug!(course_id = %placement.course_id, "Ignoring unrecognized placement result"),
            }
        }

        status
    }

    pub fn has_completed(&self, course: Course) -> bool {
        self.completions.contains_key(&course)
    }

    /// True if any completion of the course meets the minimum grade.
    pub fn has_completed_with_grade(&self, course: Course, minimum: MinimumGrade) -> bool {
        self.completions
            .get(&course)
            .is_some_and(|grades| grades.iter().any(|g| minimum.is_met_by(g.as_deref())))
    }

    pub fn has_completed_any(&self, courses: &[Course]) -> bool {
        courses.iter().any(|&c| self.has_completed(c))
    }

    fn has_completed_any_with_grade(&self, courses: &[Course], minimum: MinimumGrade) -> bool {
        courses
            .iter()
            .any(|&c| self.has_completed_with_grade(c, minimum))
    }

    pub fn placed_out_of(&self, course: Course) -> bool {
        self.placed_out.contains(&course)
    }

    /// Credit by placement, or by completion meeting the minimum grade.
    pub fn has_credit(&self, course: Course, minimum: MinimumGrade) -> bool {
        self.placed_out_of(course) || self.has_completed_with_grade(course, minimum)
    }

    /// All completed and transferred courses, in catalog order.
    pub fn completed_courses(&self) -> impl Iterator<Item = Course> + '_ {
        self.completions.keys().copied()
    }

    pub fn is_placement_completed(&self) -> bool {
        self.placement_attempts > 0 || !self.placed_out.is_empty() || self.placed_into_117
    }

    /// Whether the student currently satisfies the prerequisites of a course.
    pub fn is_eligible_for(&self, course: Course) -> bool {
        match course {
            Course::M101 => true,
            Course::M117 | Course::M120 => self.placed_into_117 || self.has_completed_any(PAST_117),
            Course::M118 => self.placed_out_of(Course::M117) || self.has_completed_any(PAST_117),
            Course::M124 | Course::M125 => {
                self.placed_out_of(Course::M118) || self.has_completed_any(PAST_118)
            }
            Course::M126 => self.placed_out_of(Course::M125) || self.has_completed_any(PAST_125),
            Course::M141 => {
                self.placed_out_of(Course::M118) || self.has_completed_any(READY_FOR_141)
            }
            Course::M155 => self.is_eligible_for_155(),
            Course::M156 | Course::M160 => self.is_eligible_for_156_or_160(),
            Course::M127
            | Course::M157
            | Course::M159
            | Course::M161
            | Course::M229
            | Course::M269 => false,
        }
    }

    fn is_eligible_for_155(&self) -> bool {
        let has_124 = self.has_credit(Course::M124, MinimumGrade::Passing)
            || self.has_completed(Course::M120);
        let has_125 = self.has_credit(Course::M125, MinimumGrade::Passing);

        (has_124 && has_125) || self.has_completed_any(READY_FOR_155)
    }

    fn is_eligible_for_156_or_160(&self) -> bool {
        let b = MinimumGrade::BMinus;
        let has_124 = self.has_credit(Course::M124, b)
            || self.has_completed_any_with_grade(&[Course::M120, Course::M155], b);
        let has_126 = self.has_credit(Course::M126, b);

        (has_124 && has_126) || self.has_completed_any_with_grade(READY_FOR_160, b)
    }

    /// Distinct precalculus credits completed toward the AUCC core.
    pub fn credits_of_core_completed(&self) -> u32 {
        CORE_COURSES
            .iter()
            .filter(|&&c| self.has_completed(c))
            .map(|c| c.credits())
            .sum()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_empty_record() {
        let status = StudentStatus::default();
        assert!(status.is_eligible_for(Course::M101));
        assert!(!status.is_eligible_for(Course::M117));
        assert!(!status.is_placement_completed());
        assert_eq!(status.credits_of_core_completed(), 0);
    }

    #[test]
    fn test_course_id_forms_are_merged() {
        let status = status_with(&[("M 117", Some("B")), ("MATH118", None), ("PHIL 100", None)], &[]);
        assert!(status.has_completed(Course::M117));
        assert!(status.has_completed(Course::M118));
        assert_eq!(status.completed_courses().count(), 2);
    }

    #[test]
    fn test_transfer_credit_counts_as_completion() {
        let status = StudentStatus::from_record(&StudentRecord {
            transfer: completed(&[("M 124", Some("TB"))]),
            ..Default::default()
        });
        assert!(status.has_completed_with_grade(Course::M124, MinimumGrade::BMinus));
        assert!(!status.is_eligible_for(Course::M126));
        assert!(status.is_eligible_for(Course::M125));
    }

    #[test]
    fn test_grade_gate() {
        let status = status_with(&[("M 126", Some("C")), ("M 126", Some("B+"))], &[]);
        assert!(status.has_completed_with_grade(Course::M126, MinimumGrade::BMinus));

        let status = status_with(&[("M 126", Some("C"))], &[]);
        assert!(status.has_completed(Course::M126));
        assert!(!status.has_completed_with_grade(Course::M126, MinimumGrade::BMinus));
    }

    #[test]
    fn test_placement_results_must_count() {
        let status = StudentStatus::from_record(&StudentRecord {
            placement: vec![
                PlacementCredit {
                    course_id: "M 117".to_string(),
                    exam_placed: "N".to_string(),
                },
                PlacementCredit {
                    course_id: "M 100C".to_string(),
                    exam_placed: "C".to_string(),
                },
            ],
            placement_attempts: 1,
            ..Default::default()
        });
        assert!(!status.placed_out_of(Course::M117));
        assert!(status.is_eligible_for(Course::M117));
        assert!(status.is_eligible_for(Course::M120));
        assert!(!status.is_eligible_for(Course::M118));
        assert!(status.is_placement_completed());
    }

    #[test]
    fn test_eligibility_from_placement() {
        let status = status_with(&[], &["M 100C", "M 117", "M 118"]);
        assert!(status.is_eligible_for(Course::M117));
        assert!(status.is_eligible_for(Course::M118));
        assert!(status.is_eligible_for(Course::M124));
        assert!(status.is_eligible_for(Course::M125));
        assert!(status.is_eligible_for(Course::M141));
        assert!(!status.is_eligible_for(Course::M126));
        assert!(!status.is_eligible_for(Course::M155));
    }

    #[test]
    fn test_eligibility_for_155() {
        let status = status_with(&[("M 120", None), ("M 125", Some("C"))], &[]);
        assert!(status.is_eligible_for(Course::M155));

        let status = status_with(&[("M 124", None)], &[]);
        assert!(!status.is_eligible_for(Course::M155));

        let status = status_with(&[("M 141", Some("D"))], &[]);
        assert!(status.is_eligible_for(Course::M155));
    }

    #[test]
    fn test_eligibility_for_160_needs_b_minus() {
        let status = status_with(&[("M 124", Some("B-")), ("M 126", Some("C+"))], &[]);
        assert!(!status.is_eligible_for(Course::M160));

        let status = status_with(&[("M 124", Some("A")), ("M 126", Some("B"))], &[]);
        assert!(status.is_eligible_for(Course::M160));
        assert!(status.is_eligible_for(Course::M156));

        let status = status_with(&[("M 126", Some("A"))], &["M 124"]);
        assert!(status.is_eligible_for(Course::M160));

        let status = status_with(&[("M 155", Some("B")), ("M 126", None)], &[]);
        assert!(status.is_eligible_for(Course::M160));
    }

    #[test]
    fn test_credits_of_core_completed() {
        let status = status_with(
            &[("M 117", None), ("MATH 117", None), ("M 120", None), ("M 160", None)],
            &[],
        );
        assert_eq!(status.credits_of_core_completed(), 4);
    }
}
