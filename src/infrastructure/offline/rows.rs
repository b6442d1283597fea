use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub specification: Option<String>,
    pub unit: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_deleted: bool,
    pub last_modified: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub status: String,
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_deleted: bool,
    pub last_modified: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderLineItemRow {
    pub order_id: String,
    pub material_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub material_name: Option<String>,
    pub material_unit: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OfflineActionRow {
    pub id: String,
    pub action_type: String,
    pub entity: String,
    pub entity_id: String,
    pub payload: String,
    pub timestamp: i64,
    pub synced: bool,
    pub retry_count: i64,
    pub last_error: Option<String>,
}
