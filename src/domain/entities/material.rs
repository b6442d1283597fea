use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub specification: Option<String>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "quantity")]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    /// Local write time, stamped by the store on every upsert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl MaterialRecord {
    /// Builds a locally-originated record for `draft` under a fresh id.
    pub fn from_draft(id: String, draft: MaterialDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            specification: draft.specification,
            unit: draft.unit,
            price: draft.price,
            stock: draft.stock,
            image_url: draft.image_url,
            description: draft.description,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            last_modified: None,
        }
    }

    pub fn apply_patch(&mut self, patch: &MaterialPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(specification) = &patch.specification {
            self.specification = Some(specification.clone());
        }
        if let Some(unit) = &patch.unit {
            self.unit = unit.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = Some(image_url.clone());
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        self.updated_at = now;
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }
}

/// Input for creating a material.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraft {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub specification: Option<String>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "quantity")]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MaterialDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_price(mut self, unit: impl Into<String>, price: f64) -> Self {
        self.unit = unit.into();
        self.price = price;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Material name cannot be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Material category cannot be empty".to_string());
        }
        validate_amounts(Some(self.price), Some(self.stock))
    }
}

/// Partial update; `None` fields keep the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "quantity")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MaterialPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Material name cannot be empty".to_string());
            }
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err("Material category cannot be empty".to_string());
            }
        }
        validate_amounts(self.price, self.stock)
    }
}

fn validate_amounts(price: Option<f64>, stock: Option<i64>) -> Result<(), String> {
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            return Err(format!("Material price must be a non-negative number: {price}"));
        }
    }
    if let Some(stock) = stock {
        if stock < 0 {
            return Err(format!("Material stock cannot be negative: {stock}"));
        }
    }
    Ok(())
}
