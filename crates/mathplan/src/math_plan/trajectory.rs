//! Resolving requirements against a student's record into a per-course trajectory.

use super::requirements::Requirements;
use super::student_status::StudentStatus;
use super::types::{Course, TrajectoryStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-course status for every precalculus course the student needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedTrajectory {
    pub statuses: BTreeMap<Course, TrajectoryStatus>,
    /// MATH 120 may stand in for 117, 118 and 124 (only offered when none of them is named)
    pub include_120_option: bool,
}

impl Default for RecommendedTrajectory {
    fn default() -> Self {
        Self {
            statuses: Course::TRACKED
                .into_iter()
                .map(|c| (c, TrajectoryStatus::NotNeeded))
                .collect(),
            include_120_option: false,
        }
    }
}

impl RecommendedTrajectory {
    pub fn status(&self, course: Course) -> TrajectoryStatus {
        self.statuses.get(&course).copied().unwrap_or_default()
    }

    pub fn is_needed(&self, course: Course) -> bool {
        self.status(course).is_needed()
    }

    pub fn is_ineligible(&self, course: Course) -> bool {
        self.status(course) == TrajectoryStatus::Ineligible
    }

    /// True when the student can't yet take MATH 117.
    pub fn is_placement_needed(&self) -> bool {
        self.is_ineligible(Course::M117)
    }

    pub fn includes_120_option(&self) -> bool {
        self.include_120_option
    }

    /// Courses on the trajectory, with their statuses, in catalog order.
    pub fn needed_courses(&self) -> impl Iterator<Item = (Course, TrajectoryStatus)> + '_ {
        self.statuses
            .iter()
            .filter(|(_, s)| s.is_needed())
            .map(|(&c, &s)| (c, s))
    }

    fn set_if_unresolved(&mut self, course: Course, status: TrajectoryStatus) {
        if course.is_tracked() && !self.is_needed(course) {
            self.statuses.insert(course, status);
        }
    }
}

/// Turns [`Requirements`] into a [`RecommendedTrajectory`] for one student.
pub struct TrajectoryResolver;

impl TrajectoryResolver {
    /// Resolves a trajectory.
    ///
    /// Named courses are resolved first, then implicit prerequisites, then any course the
    /// calculus requirement implies. Each open pick list then pulls in its lowest unresolved
    /// courses until the trajectory covers its credits.
    pub fn resolve(requirements: &Requirements, status: &StudentStatus) -> RecommendedTrajectory {
        let mut trajectory = RecommendedTrajectory::default();
        if requirements.core_only {
            return trajectory;
        }

        let status_of = |course: Course| course_status(course, requirements, status);

        for &course in &requirements.named_precalculus {
            trajectory.set_if_unresolved(course, status_of(course));
        }
        let named_120_sequence = [Course::M117, Course::M118, Course::M124]
            .iter()
            .any(|c| requirements.named_precalculus.contains(c));

        for &course in &requirements.implicit_courses {
            trajectory.set_if_unresolved(course, status_of(course));
        }
        for &course in requirements.named_calculus.implied_courses() {
            trajectory.set_if_unresolved(course, status_of(course));
        }

        for pick in &requirements.pick_lists {
            let mut pick = pick.clone();
            for (course, _) in trajectory.needed_courses().collect::<Vec<_>>() {
                pick.remove(course);
            }

            while pick.credits > 0 {
                let Some(lowest) = pick.lowest() else {
                    break;
                };
                if lowest.is_tracked() {
                    trajectory.set_if_unresolved(lowest, status_of(lowest));
                    pick.remove(lowest);
                } else {
                    // MATH 120 is offered through the 120 option, not as its own slot
                    pick.discard(lowest);
                }
            }
        }

        trajectory.include_120_option = !named_120_sequence
            && trajectory.is_needed(Course::M117)
            && trajectory.is_needed(Course::M118)
            && trajectory.is_needed(Course::M124);

        trajectory
    }
}

/// Where the student stands with one course. Only gated courses can need a better grade.
fn course_status(
    course: Course,
    requirements: &Requirements,
    status: &StudentStatus,
) -> TrajectoryStatus {
    if status.has_completed_with_grade(course, requirements.minimum_grade(course)) {
        TrajectoryStatus::CompletedSufficient
    } else if status.has_completed(course) {
        TrajectoryStatus::CompletedNeedsBetterGrade
    } else if status.is_eligible_for(course) {
        TrajectoryStatus::Eligible
    } else {
        TrajectoryStatus::Ineligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math_plan::requirements::test_support::{aggregate, majors};
    use crate::math_plan::student_status::test_support::status_with;
    use crate::math_plan::types::MajorRequirement as R;
    use Course::*;
    use TrajectoryStatus::*;

    fn resolve(reqs: &[R], status: &StudentStatus) -> RecommendedTrajectory {
        let requirements = aggregate(&majors(reqs), status);
        TrajectoryResolver::resolve(&requirements, status)
    }

    #[test]
    fn test_core_only_needs_nothing() {
        let t = resolve(&[R::CoreOnly], &StudentStatus::default());
        assert_eq!(t.needed_courses().count(), 0);
        assert!(!t.is_placement_needed());
        assert!(!t.includes_120_option());
    }

    #[test]
    fn test_named_sequence_without_credit() {
        let t = resolve(&[R::M117M118M124], &StudentStatus::default());
        assert_eq!(t.status(M117), Ineligible);
        assert_eq!(t.status(M118), Ineligible);
        assert_eq!(t.status(M124), Ineligible);
        assert_eq!(t.status(M125), NotNeeded);
        assert!(t.is_placement_needed());
        assert!(!t.includes_120_option());
    }

    #[test]
    fn test_completed_and_eligible() {
        let status = status_with(&[("M 117", Some("C"))], &[]);
        let t = resolve(&[R::M117M118M125], &status);
        assert_eq!(t.status(M117), CompletedSufficient);
        assert_eq!(t.status(M118), Eligible);
        assert_eq!(t.status(M125), Ineligible);
    }

    #[test]
    fn test_grade_gate_only_applies_to_gated_courses() {
        let status = status_with(&[("M 124", Some("C")), ("M 125", Some("C"))], &[]);

        let t = resolve(&[R::M160], &status);
        assert_eq!(t.status(M124), CompletedNeedsBetterGrade);
        assert_eq!(t.status(M125), CompletedSufficient);

        let t = resolve(&[R::M155], &status);
        assert_eq!(t.status(M124), CompletedSufficient);
    }

    #[test]
    fn test_top_tier_with_placement() {
        let status = status_with(&[], &["M 100C", "M 117", "M 118"]);
        let t = resolve(&[R::M160], &status);
        assert_eq!(t.status(M117), Eligible);
        assert_eq!(t.status(M118), Eligible);
        assert_eq!(t.status(M124), Eligible);
        assert_eq!(t.status(M125), Eligible);
        assert_eq!(t.status(M126), Ineligible);
        assert!(!t.is_placement_needed());
        assert!(t.includes_120_option());
    }

    #[test]
    fn test_named_101() {
        let t = resolve(&[R::M117M101], &StudentStatus::default());
        assert_eq!(t.status(M101), Eligible);
        assert_eq!(t.status(M117), Ineligible);
    }

    #[test]
    fn test_pick_list_pulls_lowest_courses() {
        let t = resolve(&[R::Pick117_118_124_120], &StudentStatus::default());
        assert!(t.is_needed(M117));
        assert!(t.is_needed(M118));
        assert!(t.is_needed(M124));
        assert!(!t.is_needed(M125));
        assert!(t.includes_120_option());
    }

    #[test]
    fn test_pick_list_counts_resolved_courses() {
        let status = status_with(&[("M 117", None)], &[]);
        // completed 117 and named 118/124 use up all three credits
        let t = resolve(&[R::Pick117_118_124_120_125_126, R::M118M124M125], &status);
        assert!(t.is_needed(M118));
        assert!(t.is_needed(M124));
        assert!(t.is_needed(M125));
        assert!(!t.is_needed(M126));
    }

    #[test]
    fn test_pick_list_extends_past_named_courses() {
        let t = resolve(
            &[R::Pick118_124_125_126_155_160, R::M117M101],
            &StudentStatus::default(),
        );
        assert_eq!(t.status(M101), Eligible);
        assert_eq!(t.status(M117), Ineligible);
        assert!(t.is_needed(M118));
        assert!(t.is_needed(M124));
        assert!(t.is_needed(M125));
        assert!(!t.is_needed(M126));
    }

    #[test]
    fn test_implicit_courses_count_toward_pick_list() {
        let t = resolve(
            &[R::Pick118_124_125_126_155_160, R::M126],
            &StudentStatus::default(),
        );
        // named 126 plus implicit 118 and 125 cover the three credits
        assert!(!t.is_needed(M124));
        assert_eq!(t.status(M126), Ineligible);
    }

    #[test]
    fn test_every_named_and_implicit_course_is_resolved() {
        let status = StudentStatus::default();
        for reqs in [
            vec![R::M124M125M126M155],
            vec![R::M117M118M124M125M141Or155, R::M156Or160],
            vec![R::M141Or155Or160, R::Pick117_118_125_141],
        ] {
            let requirements = aggregate(&majors(&reqs), &status);
            let t = TrajectoryResolver::resolve(&requirements, &status);
            for course in requirements
                .named_precalculus
                .iter()
                .chain(requirements.implicit_courses.iter())
            {
                assert!(t.is_needed(*course), "{course} unresolved for {reqs:?}");
            }
        }
    }
}
