/*
 * Responsibility
 * - Comidas の request/response DTO (wire 名は nombre / paisOrigen)
 */
use serde::{Deserialize, Serialize};

use crate::repos::food_repo::{Food, FoodFields};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub nombre: String,
    pub pais_origen: String,
}

impl FoodRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.nombre.trim().is_empty() {
            return Err("nombre is required");
        }
        if self.pais_origen.trim().is_empty() {
            return Err("paisOrigen is required");
        }
        Ok(())
    }

    pub fn into_fields(self) -> FoodFields {
        FoodFields {
            name: self.nombre.trim().to_string(),
            origin_country: self.pais_origen.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodResponse {
    pub id: i64,
    pub nombre: String,
    pub pais_origen: String,
}

impl From<Food> for FoodResponse {
    fn from(food: Food) -> Self {
        Self {
            id: food.id,
            nombre: food.name,
            pais_origen: food.origin_country,
        }
    }
}
