//! Computing complete math plans, with caching, for the HTTP layer.

use super::cache::{PlanCache, PlanKey, StudentKey};
use super::catalog::{Catalog, Major};
use super::error::MathPlanError;
use super::next_step::NextStepAdvisor;
use super::requirements::{RequirementAggregator, Requirements};
use super::student_status::{StudentRecord, StudentStatus};
use super::trajectory::{RecommendedTrajectory, TrajectoryResolver};
use super::types::NextStep;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A request for one student's plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub student_id: String,
    /// Question numbers or program codes
    pub majors: Vec<String>,
    #[serde(default)]
    pub record: StudentRecord,
}

/// A major as it appears in a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMajor {
    pub id: u32,
    pub name: String,
    pub college: String,
}

impl From<&Major> for PlannedMajor {
    fn from(major: &Major) -> Self {
        Self {
            id: major.id,
            name: major.name.clone(),
            college: major.college.clone(),
        }
    }
}

/// Everything computed for one student and one set of majors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathPlan {
    pub majors: Vec<PlannedMajor>,
    pub requirements: Requirements,
    pub trajectory: RecommendedTrajectory,
    pub next_step: NextStep,
    pub placement_needed: bool,
    pub message: String,
    /// Fills the blank in "Ideally, you would be eligible to register for ___"
    pub first_term_text: Option<String>,
    pub credits_of_core_completed: u32,
    pub placement_completed: bool,
    pub computed_at: DateTime<Utc>,
}

/// Resolves majors against the catalog and computes plans.
pub struct MathPlanProcessor {
    catalog: Arc<Catalog>,
    cache: PlanCache,
}

impl MathPlanProcessor {
    pub fn new(catalog: Arc<Catalog>, cache: PlanCache) -> Self {
        Self { catalog, cache }
    }

    /// Looks up every requested major.
    ///
    /// # Arguments
    /// * `major_ids` - Question numbers or program codes
    ///
    /// # Returns
    /// * `Ok(Vec<&Major>)` - Distinct majors, in request order
    /// * `Err(MathPlanError::UnknownMajor)` - For the first id the catalog doesn't know
    pub fn resolve_majors(&self, major_ids: &[String]) -> Result<Vec<&Major>, MathPlanError> {
        let mut majors: Vec<&Major> = Vec::with_capacity(major_ids.len());

        for id in major_ids {
            let major = self
                .catalog
                .find(id)
                .ok_or_else(|| MathPlanError::UnknownMajor { id: id.clone() })?;
            if !majors.iter().any(|m| m.id == major.id) {
                majors.push(major);
            }
        }

        Ok(majors)
    }

    /// Computes a plan from resolved majors. Never fails.
    pub fn compute(majors: &[&Major], status: &StudentStatus) -> MathPlan {
        let requirements = RequirementAggregator::aggregate(majors, status);
        let trajectory = TrajectoryResolver::resolve(&requirements, status);
        let next_step = NextStepAdvisor::advise(&requirements, &trajectory, status);

        debug!(
            requirements = %requirements,
            next_step = %next_step.code(),
            "Computed math plan"
        );

        MathPlan {
            majors: majors.iter().map(|&m| PlannedMajor::from(m)).collect(),
            first_term_text: requirements.first_term.text(),
            requirements,
            trajectory,
            next_step,
            placement_needed: next_step.placement_needed(),
            message: next_step.message(),
            credits_of_core_completed: status.credits_of_core_completed(),
            placement_completed: status.is_placement_completed(),
            computed_at: Utc::now(),
        }
    }

    /// Computes a student's plan, using the cache if available.
    ///
    /// # Arguments
    /// * `request` - Student id, majors of interest, and the student's record
    /// * `force_refresh` - If true, bypass the cache
    ///
    /// # Returns
    /// * `Ok(MathPlan)` - The plan
    /// * `Err(MathPlanError)` - If the request is malformed or names an unknown major
    pub fn plan_for_student(
        &self,
        request: &PlanRequest,
        force_refresh: bool,
    ) -> Result<MathPlan, MathPlanError> {
        let correlation_id = generate_correlation_id();

        if request.student_id.trim().is_empty() {
            warn!(correlation_id = %correlation_id, "Plan request without a student id");
            return Err(MathPlanError::InvalidRequest {
                message: "student_id must not be empty".to_string(),
            });
        }

        let student = StudentKey::from_student_id(&request.student_id);
        info!(
            correlation_id = %correlation_id,
            student = %student,
            majors = request.majors.len(),
            "Starting math plan computation"
        );

        let majors = self.resolve_majors(&request.majors).inspect_err(|e| {
            warn!(correlation_id = %correlation_id, error = %e, "Could not resolve majors");
        })?;
        let key = PlanKey::new(student, majors.iter().map(|m| m.id));

        if !force_refresh {
            if let Some(cached) = self.cache.get(&key) {
                info!(correlation_id = %correlation_id, key = %key, "Returning cached math plan");
                return Ok(cached);
            }
        }

        let start = Instant::now();
        let status = StudentStatus::from_record(&request.record);
        let plan = Self::compute(&majors, &status);
        self.cache.insert(key, plan.clone());

        info!(
            correlation_id = %correlation_id,
            next_step = %plan.next_step.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Math plan computed"
        );

        Ok(plan)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }
}

/// Generates a short id for correlating the log lines of one request.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
