//! Built-in typical values used when neither a model nor a database
//! answers. Keys are matched as whole words against the food name.

use shared_utils::text::{contains_phrase, normalize};

use crate::models::Nutrients;

const fn per_100g(
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    sugar_g: f64,
    fiber_g: f64,
    saturated_fat_g: f64,
    sodium_mg: f64,
) -> Nutrients {
    Nutrients { calories, protein_g, carbs_g, fat_g, sugar_g, fiber_g, saturated_fat_g, sodium_mg }
}

/// Most specific keys first.
const TYPICAL_VALUES: &[(&str, Nutrients)] = &[
    ("french fries", per_100g(312.0, 3.4, 41.0, 15.0, 0.3, 3.8, 2.3, 210.0)),
    ("brown rice", per_100g(112.0, 2.3, 24.0, 0.8, 0.4, 1.8, 0.2, 5.0)),
    ("fried chicken", per_100g(246.0, 19.0, 8.0, 15.0, 0.0, 0.4, 4.0, 400.0)),
    ("apple", per_100g(52.0, 0.3, 14.0, 0.2, 10.0, 2.4, 0.0, 1.0)),
    ("banana", per_100g(89.0, 1.1, 23.0, 0.3, 12.0, 2.6, 0.1, 1.0)),
    ("orange", per_100g(47.0, 0.9, 12.0, 0.1, 9.0, 2.4, 0.0, 0.0)),
    ("rice", per_100g(130.0, 2.7, 28.0, 0.3, 0.1, 0.4, 0.1, 1.0)),
    ("bread", per_100g(265.0, 9.0, 49.0, 3.2, 5.0, 2.7, 0.7, 491.0)),
    ("pasta", per_100g(158.0, 5.8, 31.0, 0.9, 0.6, 1.8, 0.2, 1.0)),
    ("chicken", per_100g(165.0, 31.0, 0.0, 3.6, 0.0, 0.0, 1.0, 74.0)),
    ("salmon", per_100g(208.0, 20.0, 0.0, 13.0, 0.0, 0.0, 3.1, 59.0)),
    ("beef", per_100g(250.0, 26.0, 0.0, 15.0, 0.0, 0.0, 6.0, 72.0)),
    ("egg", per_100g(155.0, 13.0, 1.1, 11.0, 1.1, 0.0, 3.3, 124.0)),
    ("pizza", per_100g(266.0, 11.0, 33.0, 10.0, 3.6, 2.3, 4.5, 598.0)),
    ("burger", per_100g(295.0, 17.0, 24.0, 14.0, 5.0, 1.3, 5.2, 414.0)),
    ("fries", per_100g(312.0, 3.4, 41.0, 15.0, 0.3, 3.8, 2.3, 210.0)),
    ("salad", per_100g(20.0, 1.4, 3.5, 0.2, 1.5, 1.8, 0.0, 30.0)),
    ("broccoli", per_100g(34.0, 2.8, 7.0, 0.4, 1.7, 2.6, 0.0, 33.0)),
    ("potato", per_100g(77.0, 2.0, 17.0, 0.1, 0.8, 2.2, 0.0, 6.0)),
    ("cheese", per_100g(402.0, 25.0, 1.3, 33.0, 0.5, 0.0, 21.0, 621.0)),
    ("yogurt", per_100g(59.0, 10.0, 3.6, 0.4, 3.2, 0.0, 0.1, 36.0)),
    ("oatmeal", per_100g(71.0, 2.5, 12.0, 1.5, 0.5, 1.7, 0.3, 49.0)),
    ("soda", per_100g(41.0, 0.0, 10.6, 0.0, 10.6, 0.0, 0.0, 4.0)),
    ("chocolate", per_100g(546.0, 4.9, 61.0, 31.0, 48.0, 7.0, 19.0, 24.0)),
    ("cake", per_100g(371.0, 5.0, 53.0, 15.0, 35.0, 1.0, 5.0, 300.0)),
    ("ice cream", per_100g(207.0, 3.5, 24.0, 11.0, 21.0, 0.7, 6.8, 80.0)),
];

/// Used for foods the table does not know.
pub const GENERIC_PER_100G: Nutrients = per_100g(200.0, 8.0, 25.0, 8.0, 5.0, 2.0, 2.5, 300.0);

pub fn typical_values(name: &str) -> Option<Nutrients> {
    let name = normalize(name);
    TYPICAL_VALUES
        .iter()
        .find(|(key, _)| contains_phrase(&name, key))
        .map(|(_, nutrients)| *nutrients)
}

const SWAPS: &[(&str, &str)] = &[
    ("fries", "Oven-baked potato wedges with the skin on"),
    ("fried", "The same food grilled or baked instead of fried"),
    ("soda", "Sparkling water with a slice of lemon"),
    ("burger", "A lean turkey or bean burger on a wholegrain bun"),
    ("pizza", "Thin-crust pizza with extra vegetables and less cheese"),
    ("white rice", "Brown rice or quinoa"),
    ("rice", "Brown rice or quinoa"),
    ("bread", "Wholegrain bread"),
    ("pasta", "Wholewheat pasta with a vegetable sauce"),
    ("cake", "Fresh fruit with plain yogurt"),
    ("ice cream", "Frozen yogurt or blended frozen banana"),
    ("chocolate", "A small piece of dark chocolate (70% cocoa or more)"),
    ("cheese", "A smaller portion of a strong-flavoured cheese"),
];

const GENERAL_SWAPS: &[&str] = &[
    "Add a portion of vegetables or salad to the plate",
    "Choose water instead of sugary drinks",
];

pub fn static_alternatives(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = normalize(name);
        if let Some((_, swap)) = SWAPS.iter().find(|(key, _)| contains_phrase(&name, key)) {
            if !out.iter().any(|s| s == swap) {
                out.push(swap.to_string());
            }
        }
    }
    out.extend(GENERAL_SWAPS.iter().map(|s| s.to_string()));
    out
}
