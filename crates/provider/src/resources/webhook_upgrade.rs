//! Version 0 → 1 webhook state: `filter_options` moved from a one-element
//! list block to a single nested object.

use pingone_framework::Diagnostics;
use pingone_framework::upgrade::collapse_single_element_list;
use serde_json::Value as Json;

pub(super) fn v0_to_v1(prior: &Json) -> Result<Json, Diagnostics> {
    let Some(prior) = prior.as_object() else {
        return Err(Diagnostics::from_error(
            "Unable to Upgrade Resource State",
            "The prior webhook state is not an object. Please report this issue to the provider maintainers.",
        ));
    };

    let mut state = prior.clone();
    let filter_options = state
        .get("filter_options")
        .map_or(Json::Null, collapse_single_element_list);
    state.insert("filter_options".into(), filter_options);
    Ok(Json::Object(state))
}
