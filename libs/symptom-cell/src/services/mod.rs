pub mod action_plan;
pub mod catalogue;
pub mod engine;
pub mod extraction;
pub mod red_flags;
pub mod relationships;
pub mod relief;
pub mod response;
pub mod urgency;

pub use action_plan::action_plan;
pub use engine::{follow_up_questions, SymptomAssessmentEngine};
pub use extraction::extract_symptoms;
pub use red_flags::detect_red_flags;
pub use relationships::map_relationships;
pub use relief::recommend_relief;
pub use response::{response_from, MedicalResponseGenerator};
pub use urgency::score_urgency;
