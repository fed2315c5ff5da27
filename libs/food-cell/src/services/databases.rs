// =====================================================================================
// FOOD DATABASE CLIENTS - USDA FOODDATA CENTRAL AND OPENFOODFACTS
// =====================================================================================

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{DatabaseHit, NutrientSource, Nutrients};

const DATABASE_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait FoodDatabase: Send + Sync {
    fn source(&self) -> NutrientSource;

    /// Best per-100 g match for `query`, if any.
    async fn search(&self, query: &str) -> Result<Option<DatabaseHit>>;
}

/// The configured databases, USDA first.
pub fn databases_from_config(config: &AppConfig) -> Vec<Box<dyn FoodDatabase>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(DATABASE_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            error!("Falling back to default HTTP client: {}", e);
            Client::new()
        });

    vec![
        Box::new(UsdaClient::new(
            &config.usda_base_url,
            &config.usda_api_key,
            client.clone(),
        )),
        Box::new(OpenFoodFactsClient::new(&config.openfoodfacts_base_url, client)),
    ]
}

async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("API error ({}): {}", status, body));
    }
    Ok(response.json::<T>().await?)
}

// -------------------------------------------------------------------------------------
// USDA FoodData Central
// -------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaSearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaFood {
    description: String,
    #[serde(default)]
    food_nutrients: Vec<UsdaNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaNutrient {
    #[serde(default)]
    nutrient_number: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

pub struct UsdaClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl UsdaClient {
    pub fn new(base_url: &str, api_key: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    fn nutrients(food: &UsdaFood) -> Nutrients {
        let value = |number: &str| {
            food.food_nutrients
                .iter()
                .find(|n| n.nutrient_number.as_deref() == Some(number))
                .and_then(|n| n.value)
                .unwrap_or(0.0)
        };
        Nutrients {
            calories: value("208"),
            protein_g: value("203"),
            fat_g: value("204"),
            carbs_g: value("205"),
            sugar_g: value("269"),
            fiber_g: value("291"),
            sodium_mg: value("307"),
            saturated_fat_g: value("606"),
        }
    }
}

#[async_trait]
impl FoodDatabase for UsdaClient {
    fn source(&self) -> NutrientSource {
        NutrientSource::Usda
    }

    async fn search(&self, query: &str) -> Result<Option<DatabaseHit>> {
        let url = format!("{}/foods/search", self.base_url);
        debug!("USDA search for {}", query);
        let response: UsdaSearchResponse = get_json(self.client.get(&url).query(&[
            ("api_key", self.api_key.as_str()),
            ("query", query),
            ("pageSize", "1"),
            ("dataType", "Foundation,SR Legacy"),
        ]))
        .await?;

        Ok(response
            .foods
            .into_iter()
            .next()
            .map(|food| DatabaseHit {
                source: NutrientSource::Usda,
                per_100g: Self::nutrients(&food),
                description: food.description,
            })
            .filter(|hit| hit.per_100g.calories > 0.0))
    }
}

// -------------------------------------------------------------------------------------
// OpenFoodFacts
// -------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OffSearchResponse {
    #[serde(default)]
    products: Vec<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: Value,
}

pub struct OpenFoodFactsClient {
    base_url: String,
    client: Client,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn nutrients(nutriments: &Value) -> Nutrients {
        let value = |key: &str| nutriments.get(key).and_then(number).unwrap_or(0.0);
        Nutrients {
            calories: value("energy-kcal_100g"),
            protein_g: value("proteins_100g"),
            carbs_g: value("carbohydrates_100g"),
            fat_g: value("fat_100g"),
            sugar_g: value("sugars_100g"),
            fiber_g: value("fiber_100g"),
            saturated_fat_g: value("saturated-fat_100g"),
            // reported in grams
            sodium_mg: value("sodium_100g") * 1000.0,
        }
    }
}

/// OpenFoodFacts mixes numbers and numeric strings.
fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[async_trait]
impl FoodDatabase for OpenFoodFactsClient {
    fn source(&self) -> NutrientSource {
        NutrientSource::OpenFoodFacts
    }

    async fn search(&self, query: &str) -> Result<Option<DatabaseHit>> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        debug!("OpenFoodFacts search for {}", query);
        let response: OffSearchResponse = get_json(self.client.get(&url).query(&[
            ("search_terms", query),
            ("search_simple", "1"),
            ("action", "process"),
            ("json", "1"),
            ("page_size", "1"),
        ]))
        .await?;

        Ok(response
            .products
            .into_iter()
            .next()
            .map(|product| DatabaseHit {
                source: NutrientSource::OpenFoodFacts,
                per_100g: Self::nutrients(&product.nutriments),
                description: product.product_name.unwrap_or_else(|| query.to_string()),
            })
            .filter(|hit| hit.per_100g.calories > 0.0))
    }
}
