// =====================================================================================
// FOOD CELL - MEAL PHOTO RECOGNITION AND NUTRITION SCORING
// =====================================================================================
//
// Four stages per request:
// - vision model lists the foods and portions in a photo
// - a text model estimates nutrients per portion
// - USDA FoodData Central and OpenFoodFacts are searched concurrently and
//   override the estimate when they know the food
// - healthier alternatives from a model, or a static swap table
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{FoodAnalysis, FoodItem, FoodRecognitionError, Nutrients};
pub use router::create_food_router;
pub use services::FoodRecognitionService;
