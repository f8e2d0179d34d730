//! Property-based tests for import identifiers and offline validation

use pingone_framework::{Resource, parse_import_id};
use proptest::prelude::*;
use serde_json::json;
use terraform_provider_pingone::resources;

fn uuid() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

proptest! {
    #[test]
    fn test_well_formed_ids_populate_every_component(segments in prop::collection::vec(uuid(), 1..5)) {
        for resource in resources::all() {
            let Some(components) = resource.import_components() else {
                continue;
            };
            if components.len() != segments.len() || resource.type_name() == "pingone_notification_template_content" {
                continue;
            }

            let id = segments.join(resource.import_separator());
            let imported = parse_import_id(&id, &components, resource.import_separator()).unwrap();
            prop_assert_eq!(imported.id(), segments.last().map(String::as_str));
            for (component, segment) in components.iter().zip(&segments) {
                if !component.primary {
                    prop_assert_eq!(imported.get(component.attribute), Some(segment.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_wrong_segment_count_is_one_error(segments in prop::collection::vec(uuid(), 1..6)) {
        for resource in resources::all() {
            let Some(components) = resource.import_components() else {
                continue;
            };
            if components.len() == segments.len() {
                continue;
            }

            let id = segments.join(resource.import_separator());
            let err = parse_import_id(&id, &components, resource.import_separator()).unwrap_err();
            prop_assert!(err.detail.starts_with("Invalid import ID specified"), "{}", err.detail);
            prop_assert!(err.path.is_none());
        }
    }

    #[test]
    fn test_validation_never_mutates_config(name in "[a-zA-Z0-9 ._-]{0,40}", enabled in any::<bool>()) {
        let config = json!({
            "environment_id": "11111111-1111-1111-1111-111111111111",
            "name": name,
            "enabled": enabled,
            "http_endpoint_url": "http://insecure.example.org",
            "format": "ACTIVITY",
            "filter_options": {"included_action_types": []}
        });
        let before = config.clone();
        let diags = resources::WebhookResource.schema().validate_config(&config);

        prop_assert_eq!(&config, &before);
        prop_assert!(diags.has_error());
        for diagnostic in diags.errors() {
            prop_assert!(diagnostic.path.is_some(), "{}", diagnostic.summary);
        }
    }
}
