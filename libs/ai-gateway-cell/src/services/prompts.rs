use crate::models::{FoodSuggestionRequest, GoalRequest, NutritionPlanRequest};

pub const NUTRITIONIST_SYSTEM: &str = "You are a clinical nutritionist. Give evidence-based, \
practical dietary guidance. Never diagnose. Respond with JSON only.";

pub const COACH_SYSTEM: &str = "You are a health coach who sets safe, realistic goals. \
Weight change should not exceed 1 kg per week. Respond with JSON only.";

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn nutrition_plan_prompt(request: &NutritionPlanRequest, baseline_kcal: Option<u32>) -> String {
    let mut profile = Vec::new();
    if let Some(age) = request.age {
        profile.push(format!("age {}", age));
    }
    if let Some(sex) = &request.sex {
        profile.push(format!("sex {}", sex));
    }
    if let Some(w) = request.weight_kg {
        profile.push(format!("weight {:.1} kg", w));
    }
    if let Some(h) = request.height_cm {
        profile.push(format!("height {:.0} cm", h));
    }
    if let Some(activity) = &request.activity_level {
        profile.push(format!("activity {}", activity));
    }

    format!(
        "Create a one-day nutrition plan.\n\
         Goal: {goal}\n\
         Conditions: {conditions}\n\
         Dietary restrictions: {restrictions}\n\
         Profile: {profile}\n\
         Estimated energy need: {kcal}\n\n\
         Return a JSON object with keys: \"daily_calories\" (number), \
         \"protein_g\", \"carbs_g\", \"fat_g\" (numbers), \"recommended_foods\", \
         \"foods_to_avoid\", \"meal_ideas\", \"tips\" (arrays of short strings).",
        goal = request.goal.as_deref().unwrap_or("general health"),
        conditions = join_or_none(&request.conditions),
        restrictions = join_or_none(&request.dietary_restrictions),
        profile = if profile.is_empty() { "not provided".to_string() } else { profile.join(", ") },
        kcal = baseline_kcal
            .map(|k| format!("{} kcal/day", k))
            .unwrap_or_else(|| "unknown".to_string()),
    )
}

pub fn goal_prompt(request: &GoalRequest) -> String {
    format!(
        "Turn this health goal into a weekly plan.\n\
         Goal: {}\n\
         Current weight: {}\n\
         Target weight: {}\n\
         Timeframe: {}\n\
         Conditions: {}\n\n\
         Return a JSON object with keys: \"realistic\" (boolean), \
         \"milestones\" (array of {{\"week\": number, \"target\": string}}), \
         \"habits\" (array of short strings).",
        request.goal,
        request.current_weight_kg.map(|w| format!("{:.1} kg", w)).unwrap_or_else(|| "unknown".into()),
        request.target_weight_kg.map(|w| format!("{:.1} kg", w)).unwrap_or_else(|| "unknown".into()),
        request.timeframe_weeks.map(|w| format!("{} weeks", w)).unwrap_or_else(|| "not set".into()),
        join_or_none(&request.conditions),
    )
}

pub fn food_suggestion_prompt(request: &FoodSuggestionRequest) -> String {
    format!(
        "Suggest up to 6 foods or simple dishes for {meal}.\n\
         Goal: {goal}\n\
         Conditions: {conditions}\n\
         Exclude: {exclude}\n\n\
         Return a JSON object with keys: \"suggestions\" (array of short strings) \
         and \"rationale\" (one sentence).",
        meal = request.meal_type.as_deref().unwrap_or("any meal"),
        goal = request.goal.as_deref().unwrap_or("general health"),
        conditions = join_or_none(&request.conditions),
        exclude = join_or_none(&request.exclude),
    )
}
