//! `pingone_licenses`

use std::collections::BTreeSet;

use async_trait::async_trait;
use pingone_framework::validator::{at_least_n_elements, exactly_one_of, length_at_least, one_of};
use pingone_framework::{
    Attribute, AttributeType, DataSource, DataSourceReadRequest, DataSourceReadResponse, NestingMode, Schema, Value,
};
use pingone_sdk::management::License;
use pingone_sdk::{DefaultClassifier, ProviderContext, RetryPolicy, collect_pages, invoke};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::link_id_attribute;
use crate::resources::{decode, encode};

const FILTERABLE_ATTRIBUTES: &[&str] = &["name", "package", "status"];
const SELECTORS: &[&str] = &["scim_filter", "data_filters"];

/// Lists license IDs in an organization, narrowed by SCIM or by data filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicensesDataSource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct LicensesDataSourceModel {
    id: Value<String>,
    organization_id: Value<String>,
    scim_filter: Value<String>,
    data_filters: Value<Vec<DataFilterModel>>,
    ids: Value<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct DataFilterModel {
    name: Value<String>,
    values: Value<BTreeSet<String>>,
}

/// Keeps the licenses whose filtered attributes each hold one of the
/// filter's values. A license without the attribute never matches.
fn filter_licenses(filters: &[DataFilterModel], licenses: Vec<License>) -> Vec<License> {
    licenses
        .into_iter()
        .filter(|license| {
            filters.iter().all(|filter| {
                let Some(values) = filter.values.as_known() else {
                    return true;
                };
                license
                    .attribute(filter.name.value_str())
                    .is_some_and(|value| values.contains(value))
            })
        })
        .collect()
}

#[async_trait]
impl DataSource for LicensesDataSource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_licenses"
    }

    fn schema(&self) -> Schema {
        Schema::new("Datasource to retrieve multiple PingOne license IDs selected by a SCIM filter or a name/value list combination.")
            .attribute("id", Attribute::string("The ID of the resource.").computed())
            .attribute(
                "organization_id",
                link_id_attribute("The ID of the organization to retrieve licenses for."),
            )
            .attribute(
                "scim_filter",
                Attribute::string(&format!(
                    "A SCIM filter to apply to the license selection.  A SCIM filter offers the greatest flexibility in filtering licenses.  Filterable attributes are `{}`.  If the attribute filter is `status`, available values are `ACTIVE`, `EXPIRED`, `FUTURE` and `TERMINATED`.",
                    FILTERABLE_ATTRIBUTES.join("`, `")
                ))
                .optional()
                .validator(length_at_least(1))
                .validator(exactly_one_of(SELECTORS)),
            )
            .attribute(
                "data_filters",
                Attribute::nested(
                    NestingMode::List,
                    vec![
                        (
                            "name",
                            Attribute::string("The attribute name to filter on.")
                                .required()
                                .validator(one_of(FILTERABLE_ATTRIBUTES)),
                        ),
                        (
                            "values",
                            Attribute::set(AttributeType::String, "The possible values (case sensitive) of the attribute defined in the `name` parameter to filter.")
                                .required()
                                .validator(at_least_n_elements(1)),
                        ),
                    ],
                    "Individual data filters to apply to the license selection.  If the attribute filter is `status`, available values are `ACTIVE`, `EXPIRED`, `FUTURE` and `TERMINATED`.",
                )
                .optional()
                .validator(at_least_n_elements(1))
                .validator(exactly_one_of(SELECTORS)),
            )
            .attribute(
                "ids",
                Attribute::list(
                    AttributeType::String,
                    "The list of resulting IDs of licenses that have been successfully retrieved and filtered.",
                )
                .computed(),
            )
    }

    #[instrument(skip_all, fields(data_source = "pingone_licenses"))]
    async fn read(&self, ctx: &ProviderContext, request: DataSourceReadRequest) -> DataSourceReadResponse {
        let mut response = DataSourceReadResponse::default();
        let Some(mut data) = decode::<LicensesDataSourceModel>(&request.config, &mut response.diagnostics) else {
            return response;
        };

        let scim_filter = data.scim_filter.as_known().map(String::as_str);
        if scim_filter.is_none() && data.data_filters.as_known().is_none() {
            response.diagnostics.add_error(
                "Missing parameter",
                "Cannot find the requested licenses. scim_filter or data_filters must be set.",
            );
            return response;
        }

        let client = &ctx.client;
        let organization_id = data.organization_id.value_str();

        let (licenses, diags) = invoke(
            ctx,
            "ReadAllLicenses",
            || async move { collect_pages(client.licenses(organization_id, scim_filter)?).await.into_response() },
            &DefaultClassifier,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        if response.diagnostics.has_error() {
            return response;
        }

        let mut licenses = licenses.unwrap_or_default();
        if let Some(filters) = data.data_filters.as_known() {
            let before = licenses.len();
            licenses = filter_licenses(filters, licenses);
            debug!(before, after = licenses.len(), "Applied data filters");
        }

        data.id = data.organization_id.clone();
        data.ids = Value::known(licenses.into_iter().map(|license| license.id).collect());
        response.state = encode(&data, &mut response.diagnostics);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORG: &str = "11111111-1111-1111-1111-111111111111";

    fn license(id: &str, package: &str, status: &str) -> License {
        serde_json::from_value(json!({"id": id, "name": "Licence", "package": package, "status": status})).unwrap()
    }

    fn filter(name: &str, values: &[&str]) -> DataFilterModel {
        DataFilterModel {
            name: Value::string(name),
            values: Value::known(values.iter().map(|v| (*v).to_string()).collect()),
        }
    }

    fn ids(licenses: &[License]) -> Vec<&str> {
        licenses.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_every_filter_must_match() {
        let licenses = vec![
            license("l1", "MFA", "ACTIVE"),
            license("l2", "MFA", "EXPIRED"),
            license("l3", "RISK", "ACTIVE"),
        ];
        let kept = filter_licenses(&[filter("package", &["MFA"]), filter("status", &["ACTIVE"])], licenses);
        assert_eq!(ids(&kept), ["l1"]);
    }

    #[test]
    fn test_filter_values_are_alternatives() {
        let licenses = vec![license("l1", "MFA", "ACTIVE"), license("l2", "MFA", "FUTURE")];
        let kept = filter_licenses(&[filter("status", &["ACTIVE", "FUTURE"])], licenses);
        assert_eq!(ids(&kept), ["l1", "l2"]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let kept = filter_licenses(&[filter("package", &["mfa"])], vec![license("l1", "MFA", "ACTIVE")]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_scim_and_data_filters_conflict() {
        let diags = LicensesDataSource.schema().validate_config(&json!({
            "organization_id": ORG,
            "scim_filter": "status eq \"ACTIVE\"",
            "data_filters": [{"name": "status", "values": ["ACTIVE"]}]
        }));
        assert!(diags.has_error());
    }

    #[test]
    fn test_unknown_filter_name_rejected() {
        let diags = LicensesDataSource.schema().validate_config(&json!({
            "organization_id": ORG,
            "data_filters": [{"name": "id", "values": ["l1"]}]
        }));
        let paths: Vec<String> = diags
            .errors()
            .filter_map(|d| d.path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, ["data_filters[0].name"]);
    }

    #[test]
    fn test_data_filters_accepted() {
        let diags = LicensesDataSource.schema().validate_config(&json!({
            "organization_id": ORG,
            "data_filters": [
                {"name": "package", "values": ["MFA"]},
                {"name": "status", "values": ["ACTIVE", "FUTURE"]}
            ]
        }));
        assert!(!diags.has_error(), "{diags:?}");
    }
}
