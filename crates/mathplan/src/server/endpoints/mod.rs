pub mod math_plan;
pub mod status;
