use super::rows::{MaterialRow, OfflineActionRow, OrderLineItemRow, OrderRow};
use crate::domain::entities::{
    MaterialRecord, OfflineActionRecord, OrderLineItem, OrderRecord, OrderStatus,
};
use crate::domain::value_objects::{
    EntityId, EntityType, OfflineActionId, OfflineActionType, OfflinePayload,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use std::str::FromStr;

pub(super) fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        AppError::DeserializationError(format!("Invalid timestamp millis: {millis}"))
    })
}

pub(super) fn line_item_key(order_id: &str, material_id: &str) -> String {
    format!("{order_id}:{material_id}")
}

pub(super) fn material_from_row(row: MaterialRow) -> Result<MaterialRecord, AppError> {
    Ok(MaterialRecord {
        id: row.id,
        name: row.name,
        category: row.category,
        specification: row.specification,
        unit: row.unit,
        price: row.price,
        stock: row.stock,
        image_url: row.image_url,
        description: row.description,
        created_at: millis_to_datetime(row.created_at)?,
        updated_at: millis_to_datetime(row.updated_at)?,
        is_deleted: row.is_deleted,
        last_modified: Some(millis_to_datetime(row.last_modified)?),
    })
}

pub(super) fn line_item_from_row(row: OrderLineItemRow) -> OrderLineItem {
    OrderLineItem {
        material_id: row.material_id,
        quantity: row.quantity,
        unit_price: row.unit_price,
        subtotal: row.subtotal,
        material_name: row.material_name,
        material_unit: row.material_unit,
    }
}

pub(super) fn order_from_row(
    row: OrderRow,
    items: Vec<OrderLineItem>,
) -> Result<OrderRecord, AppError> {
    let status = OrderStatus::from_str(&row.status).map_err(AppError::DeserializationError)?;

    Ok(OrderRecord {
        id: row.id,
        order_number: row.order_number,
        customer_name: row.customer_name,
        status,
        total_amount: row.total_amount,
        items,
        created_at: millis_to_datetime(row.created_at)?,
        updated_at: millis_to_datetime(row.updated_at)?,
        is_deleted: row.is_deleted,
        last_modified: Some(millis_to_datetime(row.last_modified)?),
    })
}

pub(super) fn action_from_row(row: OfflineActionRow) -> Result<OfflineActionRecord, AppError> {
    let id = OfflineActionId::new(row.id).map_err(AppError::DeserializationError)?;
    let action_type =
        OfflineActionType::from_str(&row.action_type).map_err(AppError::DeserializationError)?;
    let entity = EntityType::from_str(&row.entity).map_err(AppError::DeserializationError)?;
    let entity_id = EntityId::new(row.entity_id).map_err(AppError::DeserializationError)?;
    let payload =
        OfflinePayload::from_json_str(&row.payload).map_err(AppError::DeserializationError)?;
    let retry_count = u32::try_from(row.retry_count).map_err(|_| {
        AppError::DeserializationError(format!("Invalid retry count: {}", row.retry_count))
    })?;

    Ok(OfflineActionRecord {
        id,
        action_type,
        entity,
        entity_id,
        payload,
        timestamp: millis_to_datetime(row.timestamp)?,
        synced: row.synced,
        retry_count,
        last_error: row.last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_row() -> OfflineActionRow {
        OfflineActionRow {
            id: "a-1".into(),
            action_type: "UPDATE".into(),
            entity: "MATERIAL".into(),
            entity_id: "m-1".into(),
            payload: r#"{"id":"m-1","stock":42}"#.into(),
            timestamp: 1_700_000_000_000,
            synced: false,
            retry_count: 2,
            last_error: Some("timeout".into()),
        }
    }

    #[test]
    fn action_row_maps_to_domain() {
        let action = action_from_row(action_row()).unwrap();
        assert_eq!(action.action_type, OfflineActionType::Update);
        assert_eq!(action.entity, EntityType::Material);
        assert_eq!(action.entity_id.as_str(), "m-1");
        assert_eq!(action.payload.as_json()["stock"], 42);
        assert_eq!(action.retry_count, 2);
        assert_eq!(action.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn unknown_action_type_is_a_deserialization_error() {
        let mut row = action_row();
        row.action_type = "UPSERT".into();
        assert!(matches!(
            action_from_row(row),
            Err(AppError::DeserializationError(_))
        ));
    }

    #[test]
    fn unknown_order_status_is_rejected() {
        let row = OrderRow {
            id: "o-1".into(),
            order_number: "ORD-1".into(),
            customer_name: "Acme".into(),
            status: "lost".into(),
            total_amount: 0.0,
            created_at: 0,
            updated_at: 0,
            is_deleted: false,
            last_modified: 0,
        };
        assert!(order_from_row(row, Vec::new()).is_err());
    }

    #[test]
    fn line_item_key_joins_ids() {
        assert_eq!(line_item_key("o-1", "m-2"), "o-1:m-2");
    }
}
