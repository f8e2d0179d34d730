//! Version 0 → 1 gateway state.
//!
//! Version 0 kept Kerberos settings as flat `kerberos_*` attributes, LDAP user
//! types as a `user_type` set with a single-element `user_migration` list, and
//! RADIUS clients as a `radius_client` set.

use pingone_framework::Diagnostics;
use pingone_framework::upgrade::{collapse_single_element_list, group_fields, nullify, rekey_by_name};
use serde_json::{Map, Value as Json};

const KERBEROS_FIELDS: &[(&str, &str)] = &[
    ("kerberos_service_account_upn", "service_account_upn"),
    ("kerberos_service_account_password", "service_account_password"),
    ("kerberos_retain_previous_credentials_mins", "retain_previous_credentials_mins"),
];

fn get(object: &Map<String, Json>, name: &str) -> Json {
    object.get(name).cloned().unwrap_or(Json::Null)
}

fn upgrade_new_user_lookup(user_migration: &Json) -> Json {
    match collapse_single_element_list(user_migration) {
        Json::Object(migration) => {
            let mut lookup = Map::new();
            lookup.insert("ldap_filter_pattern".into(), get(&migration, "lookup_filter_pattern"));
            lookup.insert("population_id".into(), get(&migration, "population_id"));
            lookup.insert("attribute_mappings".into(), get(&migration, "attribute_mapping"));
            Json::Object(lookup)
        }
        _ => Json::Null,
    }
}

fn upgrade_user_type(user_type: &Map<String, Json>) -> Map<String, Json> {
    let mut upgraded = Map::new();
    for kept in ["id", "password_authority", "search_base_dn", "user_link_attributes"] {
        upgraded.insert(kept.into(), get(user_type, kept));
    }
    upgraded.insert("allow_password_changes".into(), get(user_type, "push_password_changes_to_ldap"));
    upgraded.insert("update_user_on_successful_authentication".into(), Json::Bool(false));
    upgraded.insert(
        "new_user_lookup".into(),
        upgrade_new_user_lookup(&get(user_type, "user_migration")),
    );
    upgraded
}

pub(super) fn v0_to_v1(prior: &Json) -> Result<Json, Diagnostics> {
    let Some(prior_object) = prior.as_object() else {
        return Err(Diagnostics::from_error(
            "Unable to Upgrade Resource State",
            "The prior gateway state is not an object. Please report this issue to the provider maintainers.",
        ));
    };

    let mut state = prior_object.clone();
    let kerberos = group_fields(prior, KERBEROS_FIELDS);
    for (old, _) in KERBEROS_FIELDS {
        state.remove(*old);
    }
    state.insert("kerberos".into(), kerberos);

    let user_types = rekey_by_name(&get(prior_object, "user_type"), "name", upgrade_user_type)?;
    state.remove("user_type");
    state.insert("user_types".into(), user_types);

    let radius_clients = state.remove("radius_client").unwrap_or(Json::Null);
    state.insert("radius_clients".into(), radius_clients);

    nullify(&mut state, &["follow_referrals", "radius_network_policy_server"]);
    Ok(Json::Object(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ldap_state_is_regrouped() {
        let prior = json!({
            "id": "g1",
            "environment_id": "e1",
            "name": "ldap",
            "description": null,
            "type": "LDAP",
            "enabled": true,
            "bind_dn": "cn=admin",
            "bind_password": "pw",
            "connection_security": "TLS",
            "kerberos_service_account_upn": "svc@EXAMPLE.COM",
            "kerberos_service_account_password": null,
            "kerberos_retain_previous_credentials_mins": 30,
            "servers": ["ldap:636"],
            "validate_tls_certificates": true,
            "vendor": "PingDirectory",
            "radius_davinci_policy_id": null,
            "radius_default_shared_secret": null,
            "radius_client": null,
            "user_type": [{
                "id": "ut1",
                "name": "Employees",
                "password_authority": "LDAP",
                "search_base_dn": "ou=people",
                "user_link_attributes": ["uid"],
                "push_password_changes_to_ldap": true,
                "user_migration": [{
                    "lookup_filter_pattern": "(uid=${identifier})",
                    "population_id": "p1",
                    "attribute_mapping": [{"name": "username", "value": "${ldapAttributes.uid}"}]
                }]
            }]
        });

        let upgraded = v0_to_v1(&prior).unwrap();
        assert_eq!(
            upgraded["kerberos"],
            json!({
                "service_account_upn": "svc@EXAMPLE.COM",
                "service_account_password": null,
                "retain_previous_credentials_mins": 30
            })
        );
        assert!(upgraded.get("kerberos_service_account_upn").is_none());
        assert!(upgraded.get("user_type").is_none());
        assert!(upgraded.get("radius_client").is_none());

        let employees = &upgraded["user_types"]["Employees"];
        assert_eq!(employees["allow_password_changes"], json!(true));
        assert_eq!(employees["update_user_on_successful_authentication"], json!(false));
        assert_eq!(employees["new_user_lookup"]["ldap_filter_pattern"], json!("(uid=${identifier})"));
        assert_eq!(employees["new_user_lookup"]["attribute_mappings"][0]["name"], json!("username"));
        assert!(employees.get("name").is_none());

        assert_eq!(upgraded["follow_referrals"], Json::Null);
        assert_eq!(upgraded["radius_network_policy_server"], Json::Null);
        assert_eq!(upgraded["connection_security"], json!("TLS"));
    }

    #[test]
    fn test_radius_state_is_renamed() {
        let prior = json!({
            "id": "g2",
            "type": "RADIUS",
            "radius_client": [{"ip": "10.0.0.1", "shared_secret": null}],
            "user_type": [],
            "kerberos_service_account_upn": null
        });
        let upgraded = v0_to_v1(&prior).unwrap();
        assert_eq!(upgraded["radius_clients"], json!([{"ip": "10.0.0.1", "shared_secret": null}]));
        assert_eq!(upgraded["user_types"], Json::Null);
        assert_eq!(upgraded["kerberos"], Json::Null);
    }

    #[test]
    fn test_duplicate_user_type_names_fail() {
        let prior = json!({
            "user_type": [
                {"name": "a", "user_migration": []},
                {"name": "a", "user_migration": []}
            ]
        });
        assert!(v0_to_v1(&prior).unwrap_err().has_error());
    }
}
