mod common;

use chrono::Utc;
use common::offline_support::{plywood, server_material, setup_offline_service};
use inventory_offline::{
    AppError, EntityType, LocalStore, MaterialDraft, MaterialPatch, OfflineActionId,
    OfflineActionType, OrderDraft, OrderLineItemDraft, OrderPatch, OrderStatus,
};

#[tokio::test]
async fn offline_crud_keeps_net_effect_and_one_action_per_call() {
    let ctx = setup_offline_service(false).await;

    let created = ctx.service.create_material(plywood()).await.unwrap();
    let updated = ctx
        .service
        .update_material(
            &created.id,
            MaterialPatch {
                stock: Some(42),
                ..MaterialPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.stock, 42);
    assert_eq!(ctx.service.get_material(&created.id).await.unwrap().stock, 42);

    ctx.service.delete_material(&created.id).await.unwrap();

    assert!(ctx.service.get_materials().await.is_empty());
    assert!(ctx.service.get_material(&created.id).await.is_none());

    let actions = ctx.service.get_offline_actions().await.unwrap();
    let kinds: Vec<OfflineActionType> = actions.iter().map(|a| a.action_type).collect();
    assert_eq!(
        kinds,
        vec![
            OfflineActionType::Create,
            OfflineActionType::Update,
            OfflineActionType::Delete
        ]
    );
    assert!(actions.iter().all(|a| a.entity == EntityType::Material));
    assert!(actions.iter().all(|a| a.entity_id.as_str() == created.id));
    assert_eq!(actions[2].payload.as_json()["id"], created.id.as_str());
    assert!(actions.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(ctx.remote.call_count(), 0);
}

#[tokio::test]
async fn quantity_alias_creates_one_pending_action() {
    let ctx = setup_offline_service(false).await;
    let draft: MaterialDraft =
        serde_json::from_str(r#"{"name":"Plywood","category":"Wood","quantity":50}"#).unwrap();

    let record = ctx.service.create_material(draft).await.unwrap();
    assert_eq!(record.stock, 50);

    let actions = ctx.service.list_unsynced_actions().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_type, OfflineActionType::Create);
    assert_eq!(actions[0].payload.as_json()["stock"], 50);
}

#[tokio::test]
async fn order_line_items_round_trip_and_are_replaced_whole() {
    let ctx = setup_offline_service(false).await;
    let board = ctx.service.create_material(plywood()).await.unwrap();
    let screws = ctx
        .service
        .create_material(MaterialDraft::new("Screws", "Hardware").with_price("box", 4.0))
        .await
        .unwrap();

    let order = ctx
        .service
        .create_order(OrderDraft::new(
            "Acme Builders",
            vec![
                OrderLineItemDraft::new(&board.id, 4, 12.5),
                OrderLineItemDraft::new(&screws.id, 2, 4.0),
                OrderLineItemDraft::new("m-unknown", 1, 1.0),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(order.total_amount, 59.0);

    let stored = ctx.service.get_order(&order.id).await.unwrap();
    assert_eq!(stored.items.len(), 3);
    assert_eq!(stored.items[0].material_id, board.id);
    assert_eq!(stored.items[0].material_name.as_deref(), Some("Plywood"));
    assert_eq!(stored.items[0].material_unit.as_deref(), Some("sheet"));
    assert_eq!(stored.items[1].material_name.as_deref(), Some("Screws"));
    assert!(stored.items[2].material_name.is_none());
    assert_eq!(stored.total_amount, 59.0);

    let updated = ctx
        .service
        .update_order(
            &order.id,
            OrderPatch {
                status: Some(OrderStatus::Confirmed),
                items: Some(vec![OrderLineItemDraft::new(&screws.id, 10, 4.0)]),
                ..OrderPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_amount, 40.0);

    let orders = ctx.service.get_orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Confirmed);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].quantity, 10);
    assert_eq!(orders[0].items[0].subtotal, 40.0);
}

#[tokio::test]
async fn pending_count_follows_mark_synced_and_keeps_the_action() {
    let ctx = setup_offline_service(false).await;
    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 0);

    ctx.service.create_material(plywood()).await.unwrap();
    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 1);

    let action = ctx.service.get_offline_actions().await.unwrap().remove(0);
    ctx.service.mark_action_synced(&action.id).await.unwrap();

    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 0);
    let actions = ctx.service.get_offline_actions().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].synced);
    assert!(ctx.service.list_unsynced_actions().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_action_error_counts_every_attempt() {
    let ctx = setup_offline_service(false).await;
    ctx.service.create_material(plywood()).await.unwrap();
    let action = ctx.service.get_offline_actions().await.unwrap().remove(0);

    for _ in 0..3 {
        ctx.service
            .update_action_error(&action.id, "network down")
            .await
            .unwrap();
    }

    let stored = ctx.service.get_offline_actions().await.unwrap().remove(0);
    assert_eq!(stored.retry_count, 3);
    assert_eq!(stored.last_error.as_deref(), Some("network down"));
    assert!(!stored.synced);
}

#[tokio::test]
async fn unknown_targets_report_not_found() {
    let ctx = setup_offline_service(false).await;
    let missing = OfflineActionId::generate();

    assert!(matches!(
        ctx.service.mark_action_synced(&missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.service.update_action_error(&missing, "boom").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.service
            .update_material("m-missing", MaterialPatch::default())
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(ctx.service.get_offline_actions().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_unknown_record_still_queues_the_action() {
    let ctx = setup_offline_service(false).await;

    ctx.service.delete_order("o-remote-only").await.unwrap();

    let actions = ctx.service.get_offline_actions().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_type, OfflineActionType::Delete);
    assert_eq!(actions[0].entity, EntityType::Order);
    assert_eq!(actions[0].payload.as_json()["id"], "o-remote-only");
}

#[tokio::test]
async fn invalid_input_is_rejected_without_side_effects() {
    let ctx = setup_offline_service(false).await;

    let result = ctx
        .service
        .create_material(MaterialDraft::new("", "Wood"))
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    let result = ctx
        .service
        .create_order(OrderDraft::new(
            "Acme",
            vec![OrderLineItemDraft::new("m-1", 0, 1.0)],
        ))
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 0);
    assert!(ctx.service.get_materials().await.is_empty());
}

#[tokio::test]
async fn connected_reads_mirror_remote_data_for_later_offline_use() {
    let ctx = setup_offline_service(true).await;
    ctx.remote
        .seed_material(server_material("m-1", "Plywood", 50))
        .await;
    ctx.remote
        .seed_material(server_material("m-2", "Cement", 8))
        .await;

    let online = ctx.service.get_materials().await;
    assert_eq!(online.len(), 2);

    ctx.connection.set_connected(false);
    let calls = ctx.remote.call_count();
    let offline = ctx.service.get_materials().await;
    assert_eq!(offline.len(), 2);
    assert_eq!(ctx.service.get_material("m-2").await.unwrap().name, "Cement");
    assert_eq!(ctx.remote.call_count(), calls);
}

#[tokio::test]
async fn mirroring_does_not_overwrite_rows_with_pending_actions() {
    let ctx = setup_offline_service(false).await;
    let local = ctx.service.create_material(plywood()).await.unwrap();

    let mut stale = local.clone();
    stale.name = "Plywood (server)".into();
    stale.stock = 1;
    ctx.remote.seed_material(stale).await;
    ctx.remote
        .seed_material(server_material("m-server", "Cement", 8))
        .await;

    ctx.connection.set_connected(true);
    let materials = ctx.service.get_materials().await;

    assert_eq!(materials.len(), 2);
    let kept = materials.iter().find(|m| m.id == local.id).unwrap();
    assert_eq!(kept.name, "Plywood");
    assert_eq!(kept.stock, 50);
}

#[tokio::test]
async fn connected_writes_go_to_the_remote_and_skip_the_queue() {
    let ctx = setup_offline_service(true).await;

    let created = ctx.service.create_material(plywood()).await.unwrap();
    assert!(created.id.starts_with("m-srv-"));
    assert!(ctx.remote.material(&created.id).await.is_some());
    assert!(ctx.store.query_material_by_id(&created.id).await.unwrap().is_some());

    ctx.service.delete_material(&created.id).await.unwrap();
    assert!(ctx.remote.material(&created.id).await.is_none());
    assert!(ctx.store.query_material_by_id(&created.id).await.unwrap().is_none());

    assert!(ctx.service.get_offline_actions().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_remote_write_falls_back_to_the_queue() {
    let ctx = setup_offline_service(true).await;
    ctx.remote.set_failing(true);

    let created = ctx.service.create_material(plywood()).await.unwrap();

    assert!(ctx.remote.material(&created.id).await.is_none());
    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 1);
    assert_eq!(ctx.service.get_materials().await.len(), 1);
}

#[tokio::test]
async fn stats_reflect_local_counts_and_last_sync() {
    let ctx = setup_offline_service(false).await;
    let stats = ctx.service.get_offline_stats().await;
    assert_eq!(stats.material_count, 0);
    assert!(stats.last_sync_at.is_none());

    ctx.service.create_material(plywood()).await.unwrap();
    ctx.service
        .create_order(OrderDraft::new("Acme", Vec::new()))
        .await
        .unwrap();
    let synced_at = Utc::now();
    ctx.service.record_sync_completed(synced_at).await.unwrap();

    let stats = ctx.service.get_offline_stats().await;
    assert_eq!(stats.material_count, 1);
    assert_eq!(stats.order_count, 1);
    assert_eq!(stats.pending_action_count, 2);
    assert_eq!(
        stats.last_sync_at.map(|at| at.timestamp()),
        Some(synced_at.timestamp())
    );
}

#[tokio::test]
async fn clear_offline_data_empties_everything() {
    let ctx = setup_offline_service(false).await;
    ctx.service.create_material(plywood()).await.unwrap();
    ctx.service
        .create_order(OrderDraft::new("Acme", Vec::new()))
        .await
        .unwrap();

    ctx.service.clear_offline_data().await.unwrap();

    assert!(ctx.service.get_materials().await.is_empty());
    assert!(ctx.service.get_orders().await.is_empty());
    assert!(ctx.service.get_offline_actions().await.unwrap().is_empty());
    let stats = ctx.service.get_offline_stats().await;
    assert_eq!(stats.pending_action_count, 0);
}

#[tokio::test]
async fn connected_write_queues_behind_pending_actions_for_the_same_record() {
    let ctx = setup_offline_service(true).await;
    ctx.remote
        .seed_material(server_material("m-1", "Plywood", 5))
        .await;
    assert_eq!(ctx.service.get_materials().await.len(), 1);

    ctx.connection.set_connected(false);
    ctx.service
        .update_material(
            "m-1",
            MaterialPatch {
                stock: Some(42),
                ..MaterialPatch::default()
            },
        )
        .await
        .unwrap();

    ctx.connection.set_connected(true);
    let updated = ctx
        .service
        .update_material(
            "m-1",
            MaterialPatch {
                stock: Some(10),
                ..MaterialPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.stock, 10);
    assert_eq!(ctx.remote.material("m-1").await.unwrap().stock, 5);
    let queued = ctx.service.list_unsynced_actions().await.unwrap();
    let stocks: Vec<_> = queued
        .iter()
        .map(|action| action.payload.as_json()["stock"].clone())
        .collect();
    assert_eq!(stocks, vec![serde_json::json!(42), serde_json::json!(10)]);

    for action in queued {
        ctx.service.mark_action_synced(&action.id).await.unwrap();
    }
    ctx.service
        .update_material(
            "m-1",
            MaterialPatch {
                stock: Some(7),
                ..MaterialPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ctx.remote.material("m-1").await.unwrap().stock, 7);
    assert_eq!(ctx.service.get_pending_actions_count().await.unwrap(), 0);
}

#[tokio::test]
async fn connected_delete_queues_behind_a_pending_create() {
    let ctx = setup_offline_service(false).await;
    let created = ctx.service.create_material(plywood()).await.unwrap();

    ctx.connection.set_connected(true);
    ctx.service.delete_material(&created.id).await.unwrap();

    let kinds: Vec<OfflineActionType> = ctx
        .service
        .list_unsynced_actions()
        .await
        .unwrap()
        .iter()
        .map(|action| action.action_type)
        .collect();
    assert_eq!(
        kinds,
        vec![OfflineActionType::Create, OfflineActionType::Delete]
    );
    assert_eq!(ctx.remote.call_count(), 0);
}

#[tokio::test]
async fn stats_degrade_to_zero_when_the_store_fails() {
    let ctx = setup_offline_service(false).await;
    ctx.service.create_material(plywood()).await.unwrap();
    ctx.service.record_sync_completed(Utc::now()).await.unwrap();

    ctx.store.close().await.unwrap();
    let stats = ctx.service.get_offline_stats().await;

    assert_eq!(stats.material_count, 0);
    assert_eq!(stats.order_count, 0);
    assert_eq!(stats.pending_action_count, 0);
    assert!(stats.last_sync_at.is_none());
}

#[tokio::test]
async fn reads_fall_back_to_the_envelope_when_the_store_fails() {
    let ctx = setup_offline_service(true).await;
    ctx.remote
        .seed_material(server_material("m-1", "Plywood", 50))
        .await;
    assert_eq!(ctx.service.get_materials().await.len(), 1);

    ctx.store.close().await.unwrap();
    ctx.connection.set_connected(false);

    let materials = ctx.service.get_materials().await;
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].id, "m-1");
    assert_eq!(ctx.service.get_material("m-1").await.unwrap().stock, 50);
    assert!(ctx.service.get_orders().await.is_empty());
}
