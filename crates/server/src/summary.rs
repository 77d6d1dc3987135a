//! Summary API endpoint

use std::collections::BTreeMap;

use api_types::summary::{BucketView, SummaryView};
use axum::{Extension, Json, extract::State};
use engine::{Bucket, User};

use crate::{ServerError, server::ServerState};

fn buckets(map: BTreeMap<String, Bucket>) -> BTreeMap<String, BucketView> {
    map.into_iter()
        .map(|(key, bucket)| {
            (
                key,
                BucketView {
                    total_minor: bucket.total.cents(),
                    count: bucket.count,
                },
            )
        })
        .collect()
}

/// Handle requests for the caller's expense summary
pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<SummaryView>, ServerError> {
    let summary = state.engine.summary(&user.id).await?;

    Ok(Json(SummaryView {
        total_minor: summary.total.cents(),
        count: summary.count,
        average_minor: summary.average.cents(),
        by_category: buckets(summary.by_category),
        by_month: buckets(summary.by_month),
    }))
}
