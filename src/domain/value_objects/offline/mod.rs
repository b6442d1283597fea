pub mod action_id;
pub mod action_type;
pub mod entity_id;
pub mod entity_type;
pub mod payload;
pub mod sync_status_key;

pub use action_id::OfflineActionId;
pub use action_type::OfflineActionType;
pub use entity_id::EntityId;
pub use entity_type::EntityType;
pub use payload::OfflinePayload;
pub use sync_status_key::SyncStatusKey;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_type_round_trips_through_text() {
        for kind in [
            OfflineActionType::Create,
            OfflineActionType::Update,
            OfflineActionType::Delete,
        ] {
            assert_eq!(OfflineActionType::from_str(kind.as_str()), Ok(kind));
        }
        assert!(OfflineActionType::from_str("UPSERT").is_err());
    }

    #[test]
    fn entity_type_rejects_unknown() {
        assert_eq!(EntityType::from_str("ORDER"), Ok(EntityType::Order));
        assert!(EntityType::from_str("customer").is_err());
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(OfflineActionId::new("  ".into()).is_err());
        assert!(EntityId::new(String::new()).is_err());
        assert_ne!(OfflineActionId::generate(), OfflineActionId::generate());
    }

    #[test]
    fn payload_rejects_null() {
        assert!(OfflinePayload::new(serde_json::Value::Null).is_err());
        let payload = OfflinePayload::from_json_str(r#"{"id":"m-1"}"#).unwrap();
        assert_eq!(payload.as_json()["id"], "m-1");
    }

    #[test]
    fn sync_status_keys_map_known_names() {
        assert_eq!(SyncStatusKey::from("last_sync_at"), SyncStatusKey::LastSyncAt);
        assert_eq!(
            SyncStatusKey::from("device_label"),
            SyncStatusKey::Custom("device_label".into())
        );
    }
}
