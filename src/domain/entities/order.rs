use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Unknown order status: {other}")),
        }
    }
}

/// One line of an order. `material_name`/`material_unit` are joined from the
/// local materials table on read and stay `None` when the material is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub material_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_unit: Option<String>,
}

impl OrderLineItem {
    pub fn from_draft(draft: &OrderLineItemDraft) -> Self {
        Self {
            material_id: draft.material_id.clone(),
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            subtotal: draft.quantity as f64 * draft.unit_price,
            material_name: None,
            material_unit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl OrderRecord {
    pub fn from_draft(id: String, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        let order_number = draft
            .order_number
            .filter(|number| !number.trim().is_empty())
            .unwrap_or_else(|| generate_order_number(now));
        let items: Vec<OrderLineItem> = draft.items.iter().map(OrderLineItem::from_draft).collect();

        let mut record = Self {
            id,
            order_number,
            customer_name: draft.customer_name,
            status: draft.status,
            total_amount: 0.0,
            items,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            last_modified: None,
        };
        record.recompute_total();
        record
    }

    pub fn apply_patch(&mut self, patch: &OrderPatch, now: DateTime<Utc>) {
        if let Some(customer_name) = &patch.customer_name {
            self.customer_name = customer_name.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        // The item list is one value: replaced whole, never merged. The total
        // only changes with it.
        if let Some(items) = &patch.items {
            self.items = items.iter().map(OrderLineItem::from_draft).collect();
            self.recompute_total();
        }
        self.updated_at = now;
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    pub fn recompute_total(&mut self) {
        self.total_amount = self.items.iter().map(|item| item.subtotal).sum();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemDraft {
    pub material_id: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl OrderLineItemDraft {
    pub fn new(material_id: impl Into<String>, quantity: i64, unit_price: f64) -> Self {
        Self {
            material_id: material_id.into(),
            quantity,
            unit_price,
        }
    }
}

/// Input for creating an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderLineItemDraft>,
}

impl OrderDraft {
    pub fn new(customer_name: impl Into<String>, items: Vec<OrderLineItemDraft>) -> Self {
        Self {
            order_number: None,
            customer_name: customer_name.into(),
            status: OrderStatus::Pending,
            items,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("Customer name cannot be empty".to_string());
        }
        validate_items(&self.items)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderLineItemDraft>>,
}

impl OrderPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(customer_name) = &self.customer_name {
            if customer_name.trim().is_empty() {
                return Err("Customer name cannot be empty".to_string());
            }
        }
        match &self.items {
            Some(items) => validate_items(items),
            None => Ok(()),
        }
    }
}

fn validate_items(items: &[OrderLineItemDraft]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for item in items {
        if item.material_id.trim().is_empty() {
            return Err("Line item material id cannot be empty".to_string());
        }
        if item.quantity <= 0 {
            return Err(format!(
                "Line item quantity must be positive for material {}",
                item.material_id
            ));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(format!(
                "Line item unit price must be non-negative for material {}",
                item.material_id
            ));
        }
        if !seen.insert(item.material_id.as_str()) {
            return Err(format!(
                "Material {} appears more than once in the order",
                item.material_id
            ));
        }
    }
    Ok(())
}

fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", now.format("%Y%m%d"), &suffix[..8])
}
