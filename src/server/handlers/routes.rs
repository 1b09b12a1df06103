use std::collections::HashMap;

use axum::extract::{Extension, Form, Json};

use crate::{api::DynAPI, entities::RouteSummary, error::Error, mirror::parse_waypoints};

/// Takes the submitted `marker_<i>` fields and checks the path is routable.
pub async fn create(
    Extension(api): Extension<DynAPI>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<RouteSummary>, Error> {
    let waypoints = parse_waypoints(&form)?;
    let summary = api.plan_route(waypoints).await?;

    Ok(summary.into())
}
