pub(super) const UPSERT_MATERIAL: &str = r#"
    INSERT INTO materials (
        id, name, category, specification, unit, price, stock,
        image_url, description, created_at, updated_at, is_deleted, last_modified
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        category = excluded.category,
        specification = excluded.specification,
        unit = excluded.unit,
        price = excluded.price,
        stock = excluded.stock,
        image_url = excluded.image_url,
        description = excluded.description,
        created_at = excluded.created_at,
        updated_at = excluded.updated_at,
        is_deleted = excluded.is_deleted,
        last_modified = excluded.last_modified
"#;

pub(super) const SELECT_MATERIALS: &str = r#"
    SELECT id, name, category, specification, unit, price, stock,
           image_url, description, created_at, updated_at, is_deleted, last_modified
    FROM materials
    WHERE is_deleted = 0
    ORDER BY last_modified DESC
"#;

pub(super) const SELECT_MATERIAL_BY_ID: &str = r#"
    SELECT id, name, category, specification, unit, price, stock,
           image_url, description, created_at, updated_at, is_deleted, last_modified
    FROM materials
    WHERE id = ?1 AND is_deleted = 0
"#;

pub(super) const COUNT_MATERIALS: &str = r#"
    SELECT COUNT(*) FROM materials WHERE is_deleted = 0
"#;

pub(super) const UPSERT_ORDER: &str = r#"
    INSERT INTO orders (
        id, order_number, customer_name, status, total_amount,
        created_at, updated_at, is_deleted, last_modified
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(id) DO UPDATE SET
        order_number = excluded.order_number,
        customer_name = excluded.customer_name,
        status = excluded.status,
        total_amount = excluded.total_amount,
        created_at = excluded.created_at,
        updated_at = excluded.updated_at,
        is_deleted = excluded.is_deleted,
        last_modified = excluded.last_modified
"#;

pub(super) const DELETE_LINE_ITEMS_BY_ORDER: &str = r#"
    DELETE FROM order_line_items WHERE order_id = ?1
"#;

pub(super) const INSERT_LINE_ITEM: &str = r#"
    INSERT INTO order_line_items (id, order_id, material_id, quantity, unit_price, subtotal)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub(super) const SELECT_ORDERS: &str = r#"
    SELECT id, order_number, customer_name, status, total_amount,
           created_at, updated_at, is_deleted, last_modified
    FROM orders
    WHERE is_deleted = 0
    ORDER BY last_modified DESC
"#;

pub(super) const SELECT_ORDER_BY_ID: &str = r#"
    SELECT id, order_number, customer_name, status, total_amount,
           created_at, updated_at, is_deleted, last_modified
    FROM orders
    WHERE id = ?1 AND is_deleted = 0
"#;

pub(super) const COUNT_ORDERS: &str = r#"
    SELECT COUNT(*) FROM orders WHERE is_deleted = 0
"#;

pub(super) const SELECT_LINE_ITEMS_FOR_LIVE_ORDERS: &str = r#"
    SELECT li.order_id, li.material_id, li.quantity, li.unit_price, li.subtotal,
           m.name AS material_name, m.unit AS material_unit
    FROM order_line_items li
    JOIN orders o ON o.id = li.order_id AND o.is_deleted = 0
    LEFT JOIN materials m ON m.id = li.material_id AND m.is_deleted = 0
    ORDER BY li.order_id, li.rowid
"#;

pub(super) const SELECT_LINE_ITEMS_BY_ORDER: &str = r#"
    SELECT li.order_id, li.material_id, li.quantity, li.unit_price, li.subtotal,
           m.name AS material_name, m.unit AS material_unit
    FROM order_line_items li
    LEFT JOIN materials m ON m.id = li.material_id AND m.is_deleted = 0
    WHERE li.order_id = ?1
    ORDER BY li.rowid
"#;

pub(super) const INSERT_OFFLINE_ACTION: &str = r#"
    INSERT INTO offline_actions (
        id, action_type, entity, entity_id, payload, timestamp, synced, retry_count, last_error
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub(super) const SELECT_OFFLINE_ACTIONS: &str = r#"
    SELECT id, action_type, entity, entity_id, payload, timestamp, synced, retry_count, last_error
    FROM offline_actions
    ORDER BY timestamp ASC, rowid ASC
"#;

pub(super) const SELECT_UNSYNCED_ACTIONS: &str = r#"
    SELECT id, action_type, entity, entity_id, payload, timestamp, synced, retry_count, last_error
    FROM offline_actions
    WHERE synced = 0
    ORDER BY timestamp ASC, rowid ASC
"#;

pub(super) const SELECT_OFFLINE_ACTION_BY_ID: &str = r#"
    SELECT id, action_type, entity, entity_id, payload, timestamp, synced, retry_count, last_error
    FROM offline_actions
    WHERE id = ?1
"#;

pub(super) const COUNT_UNSYNCED_ACTIONS: &str = r#"
    SELECT COUNT(*) FROM offline_actions WHERE synced = 0
"#;

pub(super) const MARK_ACTION_SYNCED: &str = r#"
    UPDATE offline_actions SET synced = 1 WHERE id = ?1
"#;

pub(super) const RECORD_ACTION_ERROR: &str = r#"
    UPDATE offline_actions
    SET last_error = ?2,
        retry_count = ?3
    WHERE id = ?1
"#;

pub(super) const DELETE_OFFLINE_ACTION: &str = r#"
    DELETE FROM offline_actions WHERE id = ?1
"#;

pub(super) const DELETE_SYNCED_ACTIONS: &str = r#"
    DELETE FROM offline_actions WHERE synced = 1
"#;

pub(super) const PURGE_MATERIAL_TOMBSTONES: &str = r#"
    DELETE FROM materials
    WHERE is_deleted = 1
      AND NOT EXISTS (
          SELECT 1 FROM offline_actions a
          WHERE a.synced = 0 AND a.entity = 'MATERIAL' AND a.entity_id = materials.id
      )
"#;

pub(super) const PURGE_ORDER_TOMBSTONES: &str = r#"
    DELETE FROM orders
    WHERE is_deleted = 1
      AND NOT EXISTS (
          SELECT 1 FROM offline_actions a
          WHERE a.synced = 0 AND a.entity = 'ORDER' AND a.entity_id = orders.id
      )
"#;

pub(super) const CLEAR_ALL_TABLES: [&str; 5] = [
    "DELETE FROM order_line_items",
    "DELETE FROM orders",
    "DELETE FROM materials",
    "DELETE FROM offline_actions",
    "DELETE FROM sync_status",
];

pub(super) const SELECT_SYNC_STATUS: &str = r#"
    SELECT value FROM sync_status WHERE key = ?1
"#;

pub(super) const UPSERT_SYNC_STATUS: &str = r#"
    INSERT INTO sync_status (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;
