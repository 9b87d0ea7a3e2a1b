//! Choosing the single most useful next action for a student.

use super::requirements::Requirements;
use super::student_status::StudentStatus;
use super::trajectory::RecommendedTrajectory;
use super::types::{CalculusTier, Course, MinimumGrade, NextStep};
use tracing::warn;

/// Picks one [`NextStep`] from requirements and a resolved trajectory.
pub struct NextStepAdvisor;

impl NextStepAdvisor {
    /// Computes the next step.
    ///
    /// The target is, in order: nothing (core only), the lowest named precalculus course, the
    /// calculus anchor, then the lowest course left in any pick list.
    pub fn advise(
        requirements: &Requirements,
        trajectory: &RecommendedTrajectory,
        status: &StudentStatus,
    ) -> NextStep {
        if requirements.core_only {
            return NextStep::PlacementNotNeeded;
        }

        if let Some(first) = requirements.first_named_precalculus() {
            return step_toward(first, trajectory);
        }

        match requirements.named_calculus.tier() {
            Some(CalculusTier::Low) => step_toward_141(trajectory, status),
            Some(CalculusTier::Mid) => step_toward_155(trajectory, status),
            Some(CalculusTier::Top) => step_toward_160(trajectory, status),
            None => step_from_pick_lists(requirements, trajectory),
        }
    }
}

/// Walks down the prerequisite chain of a precalculus course.
///
/// The result is the immediate prerequisite, extended downward while the course just added is
/// itself out of reach.
fn step_toward(target: Course, trajectory: &RecommendedTrajectory) -> NextStep {
    if !trajectory.is_ineligible(target) {
        return NextStep::AlreadyEligible;
    }

    let chain = target.prerequisites();
    let Some(&immediate) = chain.first() else {
        return if target == Course::M117 {
            NextStep::PlaceInto117
        } else {
            NextStep::AlreadyEligible
        };
    };

    let mut span = vec![immediate];
    for pair in chain.windows(2) {
        if !trajectory.is_ineligible(pair[0]) {
            break;
        }
        span.push(pair[1]);
    }

    NextStep::place_out_of(span.iter().copied()).unwrap_or_else(|| {
        warn!(target = %target, span = ?span, "No next step matches prerequisite span");
        NextStep::PlacementNotNeeded
    })
}

fn step_toward_141(trajectory: &RecommendedTrajectory, status: &StudentStatus) -> NextStep {
    if status.is_eligible_for(Course::M141) {
        NextStep::AlreadyEligible
    } else if trajectory.is_ineligible(Course::M118) {
        NextStep::PlaceOut117_118
    } else {
        NextStep::PlaceOut118
    }
}

fn step_toward_155(trajectory: &RecommendedTrajectory, status: &StudentStatus) -> NextStep {
    let ineligible = |c| trajectory.is_ineligible(c);

    if status.is_eligible_for(Course::M155) {
        NextStep::AlreadyEligible
    } else if status.has_credit(Course::M125, MinimumGrade::Passing) {
        if !ineligible(Course::M124) {
            NextStep::PlaceOut124
        } else if ineligible(Course::M118) {
            NextStep::PlaceOut117_118_124
        } else {
            NextStep::PlaceOut118_124
        }
    } else if status.has_credit(Course::M124, MinimumGrade::Passing) {
        if !ineligible(Course::M125) {
            NextStep::PlaceOut125
        } else if ineligible(Course::M118) {
            NextStep::PlaceOut117_118_125
        } else {
            NextStep::PlaceOut118_125
        }
    } else if !ineligible(Course::M124) && !ineligible(Course::M125) {
        NextStep::PlaceOut124_125
    } else if ineligible(Course::M118) {
        NextStep::PlaceOut117_118_124_125
    } else {
        NextStep::PlaceOut118_124_125
    }
}

/// MATH 156 and MATH 160 need 124 and 126 at B- or higher.
fn step_toward_160(trajectory: &RecommendedTrajectory, status: &StudentStatus) -> NextStep {
    let ineligible = |c| trajectory.is_ineligible(c);

    if status.is_eligible_for(Course::M160) {
        NextStep::AlreadyEligible
    } else if status.has_credit(Course::M124, MinimumGrade::BMinus) {
        if status.has_credit(Course::M126, MinimumGrade::Passing) || !ineligible(Course::M126) {
            NextStep::PlaceOut126
        } else if !ineligible(Course::M125) {
            NextStep::PlaceOut125_126
        } else if ineligible(Course::M118) {
            NextStep::PlaceOut117_118_125_126
        } else {
            NextStep::PlaceOut118_125_126
        }
    } else if status.has_credit(Course::M126, MinimumGrade::BMinus) {
        if status.has_credit(Course::M124, MinimumGrade::Passing) || !ineligible(Course::M124) {
            NextStep::PlaceOut124
        } else if ineligible(Course::M118) {
            NextStep::PlaceOut117_118_124
        } else {
            NextStep::PlaceOut118_124
        }
    } else if !ineligible(Course::M126) {
        NextStep::PlaceOut124_126
    } else if !ineligible(Course::M125) || !ineligible(Course::M124) {
        NextStep::PlaceOut124_125_126
    } else if ineligible(Course::M118) {
        NextStep::PlaceOut117_118_124_125_126
    } else {
        NextStep::PlaceOut118_124_125_126
    }
}

fn step_from_pick_lists(requirements: &Requirements, trajectory: &RecommendedTrajectory) -> NextStep {
    let Some(lowest) = requirements.pick_lists.iter().filter_map(|p| p.lowest()).min() else {
        warn!("No named courses and no pick lists; nothing to advise");
        return NextStep::PlacementNotNeeded;
    };

    match lowest {
        Course::M117 | Course::M118 | Course::M124 | Course::M125 | Course::M126 => {
            step_toward(lowest, trajectory)
        }
        Course::M101
        | Course::M120
        | Course::M127
        | Course::M141
        | Course::M155
        | Course::M156
        | Course::M157
        | Course::M159
        | Course::M160
        | Course::M161
        | Course::M229
        | Course::M269 => {
            warn!(lowest = %lowest, "Lowest pick list course has no placement path");
            NextStep::PlacementNotNeeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math_plan::pick_list::PickList;
    use crate::math_plan::requirements::test_support::{aggregate, majors};
    use crate::math_plan::student_status::test_support::status_with;
    use crate::math_plan::trajectory::TrajectoryResolver;
    use crate::math_plan::types::{MajorRequirement as R, TrajectoryStatus};

    fn advise(reqs: &[R], status: &StudentStatus) -> NextStep {
        let requirements = aggregate(&majors(reqs), status);
        let trajectory = TrajectoryResolver::resolve(&requirements, status);
        NextStepAdvisor::advise(&requirements, &trajectory, status)
    }

    fn trajectory_with(statuses: &[(Course, TrajectoryStatus)]) -> RecommendedTrajectory {
        let mut t = RecommendedTrajectory::default();
        for &(course, status) in statuses {
            t.statuses.insert(course, status);
        }
        t
    }

    #[test]
    fn test_core_only() {
        assert_eq!(
            advise(&[R::CoreOnly], &StudentStatus::default()),
            NextStep::PlacementNotNeeded
        );
        assert_eq!(advise(&[], &StudentStatus::default()), NextStep::PlacementNotNeeded);
    }

    #[test]
    fn test_named_117_without_credit() {
        assert_eq!(
            advise(&[R::M117M118M124], &StudentStatus::default()),
            NextStep::PlaceInto117
        );
    }

    #[test]
    fn test_named_117_already_eligible() {
        let status = status_with(&[], &["M 100C"]);
        assert_eq!(advise(&[R::M117M118M124], &status), NextStep::AlreadyEligible);
    }

    #[test]
    fn test_prerequisite_chain_walk() {
        use TrajectoryStatus::*;

        let t = trajectory_with(&[(Course::M118, Ineligible)]);
        assert_eq!(step_toward(Course::M118, &t), NextStep::PlaceOut117);

        let t = trajectory_with(&[(Course::M124, Ineligible), (Course::M118, Eligible)]);
        assert_eq!(step_toward(Course::M124, &t), NextStep::PlaceOut118);

        let t = trajectory_with(&[(Course::M125, Ineligible), (Course::M118, Ineligible)]);
        assert_eq!(step_toward(Course::M125, &t), NextStep::PlaceOut117_118);

        let t = trajectory_with(&[(Course::M126, Ineligible), (Course::M125, Eligible)]);
        assert_eq!(step_toward(Course::M126, &t), NextStep::PlaceOut125);

        let t = trajectory_with(&[
            (Course::M126, Ineligible),
            (Course::M125, Ineligible),
            (Course::M118, Eligible),
        ]);
        assert_eq!(step_toward(Course::M126, &t), NextStep::PlaceOut118_125);

        let t = trajectory_with(&[
            (Course::M126, Ineligible),
            (Course::M125, Ineligible),
            (Course::M118, Ineligible),
        ]);
        assert_eq!(step_toward(Course::M126, &t), NextStep::PlaceOut117_118_125);

        let t = trajectory_with(&[(Course::M126, CompletedNeedsBetterGrade)]);
        assert_eq!(step_toward(Course::M126, &t), NextStep::AlreadyEligible);
    }

    #[test]
    fn test_named_126_needs_125() {
        let status = status_with(&[("M 117", None), ("M 118", None)], &[]);
        assert_eq!(advise(&[R::M126], &status), NextStep::PlaceOut125);
    }

    #[test]
    fn test_141_tier() {
        assert_eq!(
            advise(&[R::M141], &StudentStatus::default()),
            NextStep::PlaceOut117_118
        );
        let status = status_with(&[("M 117", None)], &[]);
        assert_eq!(advise(&[R::M141Or155Or160], &status), NextStep::PlaceOut118);
        let status = status_with(&[], &["M 118"]);
        assert_eq!(advise(&[R::M141], &status), NextStep::AlreadyEligible);
    }

    #[test]
    fn test_155_tier() {
        assert_eq!(
            advise(&[R::M155], &StudentStatus::default()),
            NextStep::PlaceOut117_118_124_125
        );

        let status = status_with(&[("M 117", None)], &[]);
        assert_eq!(advise(&[R::M155Or160], &status), NextStep::PlaceOut118_124_125);

        let status = status_with(&[], &["M 100C", "M 117", "M 118"]);
        assert_eq!(advise(&[R::M155], &status), NextStep::PlaceOut124_125);

        let status = status_with(&[("M 125", None), ("M 118", None)], &[]);
        assert_eq!(advise(&[R::M155], &status), NextStep::PlaceOut124);

        let status = status_with(&[("M 124", None)], &[]);
        assert_eq!(advise(&[R::M155], &status), NextStep::PlaceOut125);

        let status = status_with(&[("M 124", None), ("M 125", None)], &[]);
        assert_eq!(advise(&[R::M155], &status), NextStep::AlreadyEligible);
    }

    #[test]
    fn test_160_tier_from_scratch() {
        assert_eq!(
            advise(&[R::M160], &StudentStatus::default()),
            NextStep::PlaceOut117_118_124_125_126
        );

        let status = status_with(&[("M 117", None)], &[]);
        assert_eq!(advise(&[R::M156], &status), NextStep::PlaceOut118_124_125_126);
    }

    #[test]
    fn test_160_tier_with_placement_through_118() {
        let status = status_with(&[], &["M 100C", "M 117", "M 118"]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut124_125_126);
    }

    #[test]
    fn test_160_tier_with_125_done() {
        let status = status_with(&[("M 118", None), ("M 125", Some("A"))], &[]);
        assert_eq!(advise(&[R::M156Or160], &status), NextStep::PlaceOut124_126);
    }

    #[test]
    fn test_160_tier_with_strong_124() {
        let status = status_with(&[("M 124", Some("B")), ("M 118", None)], &[]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut125_126);

        let status = status_with(&[("M 124", Some("B")), ("M 126", Some("C"))], &[]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut126);
    }

    #[test]
    fn test_160_tier_with_strong_126() {
        let status = status_with(&[("M 126", Some("A")), ("M 124", Some("C"))], &[]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut124);

        let status = status_with(&[("M 126", Some("A"))], &[]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut124);

        // Placing out of 126 says nothing about 118
        let status = status_with(&[], &["M 126"]);
        assert_eq!(advise(&[R::M160], &status), NextStep::PlaceOut117_118_124);
    }

    #[test]
    fn test_160_tier_eligible() {
        let status = status_with(&[("M 124", Some("A")), ("M 126", Some("B-"))], &[]);
        assert_eq!(advise(&[R::M160], &status), NextStep::AlreadyEligible);
    }

    #[test]
    fn test_named_precalculus_outranks_calculus() {
        let status = StudentStatus::default();
        assert_eq!(advise(&[R::M126, R::M160], &status), NextStep::PlaceOut117_118_125);
    }

    #[test]
    fn test_pick_list_target() {
        assert_eq!(
            advise(&[R::Pick117_118_124_120], &StudentStatus::default()),
            NextStep::PlaceInto117
        );

        let status = status_with(&[("M 117", None)], &[]);
        assert_eq!(
            advise(&[R::Pick117_118_124_120_125_126], &status),
            NextStep::AlreadyEligible
        );

        assert_eq!(
            advise(&[R::Pick118_124_125_126_155_160], &StudentStatus::default()),
            NextStep::PlaceOut117
        );
    }

    #[test]
    fn test_pick_list_lowest_without_placement_path() {
        let requirements = Requirements {
            pick_lists: vec![PickList::new(3, [Course::M120])],
            ..Default::default()
        };
        let trajectory = RecommendedTrajectory::default();
        assert_eq!(
            NextStepAdvisor::advise(&requirements, &trajectory, &StudentStatus::default()),
            NextStep::PlacementNotNeeded
        );
    }

    #[test]
    fn test_nothing_to_advise() {
        let requirements = Requirements::default();
        assert_eq!(
            NextStepAdvisor::advise(
                &requirements,
                &RecommendedTrajectory::default(),
                &StudentStatus::default()
            ),
            NextStep::PlacementNotNeeded
        );
    }
}
