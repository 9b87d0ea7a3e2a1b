//! Math placement planning.
//!
//! Given the majors a student is considering and their record, aggregates the math requirements
//! of those majors, resolves which precalculus courses the student needs and where they stand
//! with each, and picks the one thing they should do next.

mod cache;
mod catalog;
mod error;
mod first_term;
mod next_step;
mod pick_list;
mod processor;
mod requirements;
mod student_status;
mod trajectory;
mod types;

pub use cache::{CacheStats, PlanCache, PlanKey, StudentKey};
pub use catalog::{Catalog, CollegeCatalog, Major, MajorEntry};
pub use error::MathPlanError;
pub use first_term::RecommendedFirstTerm;
pub use next_step::NextStepAdvisor;
pub use pick_list::{MergedPickList, PickList, PickListMerger};
pub use processor::{MathPlan, MathPlanProcessor, PlanRequest, PlannedMajor};
pub use requirements::{RequirementAggregator, Requirements};
pub use student_status::{CourseCredit, PlacementCredit, StudentRecord, StudentStatus};
pub use trajectory::{RecommendedTrajectory, TrajectoryResolver};
pub use types::*;
