pub mod databases;
pub mod pipeline;
pub mod scoring;
pub mod tables;

pub use databases::{FoodDatabase, OpenFoodFactsClient, UsdaClient};
pub use pipeline::FoodRecognitionService;
pub use scoring::{health_score, overall_confidence};
