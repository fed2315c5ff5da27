//! Static answers used when no model is reachable.

pub struct FallbackPlan {
    pub recommended_foods: &'static [&'static str],
    pub foods_to_avoid: &'static [&'static str],
    pub meal_ideas: &'static [&'static str],
    pub tips: &'static [&'static str],
}

pub const GENERAL: FallbackPlan = FallbackPlan {
    recommended_foods: &["vegetables", "fruit", "whole grains", "legumes", "fish", "nuts"],
    foods_to_avoid: &["sugary drinks", "highly processed snacks", "excess alcohol"],
    meal_ideas: &[
        "Oatmeal with berries and walnuts",
        "Lentil and vegetable soup with wholegrain bread",
        "Grilled fish with brown rice and steamed greens",
    ],
    tips: &[
        "Fill half your plate with vegetables",
        "Drink water through the day",
        "Keep regular meal times",
    ],
};

const WEIGHT_LOSS: FallbackPlan = FallbackPlan {
    recommended_foods: &["leafy greens", "lean poultry", "eggs", "beans", "berries", "greek yogurt"],
    foods_to_avoid: &["fried foods", "sugary drinks", "pastries", "large portions of refined carbs"],
    meal_ideas: &[
        "Vegetable omelette with a side salad",
        "Chicken and chickpea salad bowl",
        "Stir-fried tofu with mixed vegetables",
    ],
    tips: &[
        "Aim for a modest daily deficit of about 500 kcal",
        "Include protein at every meal to stay full",
        "Eat slowly and stop when satisfied",
    ],
};

const MUSCLE_GAIN: FallbackPlan = FallbackPlan {
    recommended_foods: &["chicken", "salmon", "eggs", "cottage cheese", "quinoa", "oats", "milk"],
    foods_to_avoid: &["skipping meals", "heavily processed meats"],
    meal_ideas: &[
        "Overnight oats with milk, banana and peanut butter",
        "Salmon with quinoa and roasted vegetables",
        "Turkey and bean chili",
    ],
    tips: &[
        "Target roughly 1.6 g of protein per kg of body weight",
        "Spread protein across four meals",
        "Pair training days with a modest calorie surplus",
    ],
};

const DIABETES: FallbackPlan = FallbackPlan {
    recommended_foods: &["non-starchy vegetables", "whole grains", "legumes", "nuts", "fish"],
    foods_to_avoid: &["sugary drinks", "white bread", "sweets", "fruit juice"],
    meal_ideas: &[
        "Grilled chicken with quinoa and broccoli",
        "Chickpea salad with olive oil dressing",
        "Greek yogurt with nuts and cinnamon",
    ],
    tips: &[
        "Pair carbohydrates with protein or fat",
        "Keep carbohydrate portions consistent between meals",
        "Check blood glucose as advised by your care team",
    ],
};

const HYPERTENSION: FallbackPlan = FallbackPlan {
    recommended_foods: &["leafy greens", "bananas", "beets", "oats", "low-fat dairy", "berries"],
    foods_to_avoid: &["salty snacks", "processed meats", "canned soups", "pickled foods"],
    meal_ideas: &[
        "Oatmeal with banana and flaxseed",
        "Spinach salad with salmon and beets",
        "Bean and vegetable stew without added salt",
    ],
    tips: &[
        "Keep sodium under about 2,300 mg per day",
        "Season with herbs and citrus instead of salt",
        "Follow a DASH-style eating pattern",
    ],
};

const HEART_HEALTH: FallbackPlan = FallbackPlan {
    recommended_foods: &["oily fish", "olive oil", "nuts", "oats", "beans", "vegetables"],
    foods_to_avoid: &["trans fats", "fried foods", "processed meats", "excess butter"],
    meal_ideas: &[
        "Mackerel with roasted vegetables",
        "Lentil salad with olive oil and lemon",
        "Porridge with walnuts and apple",
    ],
    tips: &[
        "Swap saturated fats for unsaturated fats",
        "Eat oily fish twice a week",
        "Choose high-fibre foods",
    ],
};

/// Picks the fallback entry for a goal or condition label.
pub fn plan_for(goal: &str, conditions: &[String]) -> &'static FallbackPlan {
    let mut labels = vec![goal.to_lowercase()];
    labels.extend(conditions.iter().map(|c| c.to_lowercase()));

    // Medical conditions take precedence over lifestyle goals.
    for label in &labels {
        if label.contains("diabet") || label.contains("blood sugar") {
            return &DIABETES;
        }
        if label.contains("hypertension") || label.contains("blood pressure") {
            return &HYPERTENSION;
        }
        if label.contains("heart") || label.contains("cholesterol") || label.contains("cardio") {
            return &HEART_HEALTH;
        }
    }
    for label in &labels {
        if label.contains("loss") || label.contains("lose") || label.contains("weight_loss") {
            return &WEIGHT_LOSS;
        }
        if label.contains("muscle") || label.contains("gain") || label.contains("bulk") {
            return &MUSCLE_GAIN;
        }
    }
    &GENERAL
}

pub fn goal_habits(goal: &str) -> &'static [&'static str] {
    let goal = goal.to_lowercase();
    if goal.contains("loss") || goal.contains("lose") {
        &[
            "Log meals for the first two weeks",
            "Walk 30 minutes on most days",
            "Weigh in once a week at the same time",
        ]
    } else if goal.contains("muscle") || goal.contains("gain") {
        &[
            "Strength train three times a week",
            "Eat a protein-rich snack after training",
            "Sleep seven to nine hours",
        ]
    } else {
        &[
            "Set one small, specific habit per week",
            "Track progress weekly",
            "Review the plan with your clinician",
        ]
    }
}
