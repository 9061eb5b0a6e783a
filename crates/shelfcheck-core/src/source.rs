//! The seam between the pipeline and whatever serves product data.

use std::collections::HashMap;
use std::future::Future;

use crate::asin::Asin;
use crate::product::ProductRecord;

/// A batched product lookup.
///
/// Implementations must fetch the whole identifier set in as few round trips
/// as the upstream allows rather than one request per identifier.
/// Identifiers the upstream has no data for are simply absent from the
/// result; only transport-level failures are errors.
pub trait ProductSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get_items(
        &self,
        asins: &[Asin],
    ) -> impl Future<Output = Result<Vec<ProductRecord>, Self::Error>> + Send;
}

/// Indexes records by their own reported identifier. A later duplicate
/// replaces an earlier one.
#[must_use]
pub fn index_by_asin(records: Vec<ProductRecord>) -> HashMap<Asin, ProductRecord> {
    records
        .into_iter()
        .map(|record| (record.asin.clone(), record))
        .collect()
}
