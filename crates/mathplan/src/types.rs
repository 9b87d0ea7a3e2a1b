use crate::math_plan::MathPlanProcessor;
use chrono::{DateTime, Utc};

/// State shared by every request handler.
pub struct AppState {
    pub processor: MathPlanProcessor,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(processor: MathPlanProcessor) -> Self {
        Self {
            processor,
            started_at: Utc::now(),
        }
    }
}
