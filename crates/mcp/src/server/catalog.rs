//! Capability catalog: what the backend advertises, with parameter hints.

use crate::server::schemas::parameters_for_name;
use crate::types::OperationDescriptor;
use jdbc_bridge_api::{BackendApi, OperationSummary};
use tracing::{debug, warn};

/// Outcome of asking the backend for its operations.
///
/// An unavailable listing renders as an empty list but stays distinguishable
/// from a backend that genuinely reports nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogListing {
    Available(Vec<OperationDescriptor>),
    Unavailable { reason: String },
}

impl CatalogListing {
    /// Descriptors to advertise; empty when the listing is unavailable.
    pub fn operations(&self) -> &[OperationDescriptor] {
        match self {
            CatalogListing::Available(operations) => operations,
            CatalogListing::Unavailable { .. } => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CatalogListing::Available(_))
    }
}

/// Query the backend listing and attach the known parameter schemas.
pub async fn list_operations<B: BackendApi + ?Sized>(backend: &B) -> CatalogListing {
    match backend.fetch_operations().await {
        Ok(summaries) => {
            debug!(count = summaries.len(), "backend listed operations");
            CatalogListing::Available(summaries.into_iter().map(describe).collect())
        }
        Err(error) => {
            warn!(%error, "operation listing unavailable");
            CatalogListing::Unavailable {
                reason: error.to_string(),
            }
        }
    }
}

fn describe(summary: OperationSummary) -> OperationDescriptor {
    let parameters = parameters_for_name(&summary.name);
    OperationDescriptor {
        description: summary.description.unwrap_or_default(),
        parameters,
        name: summary.name,
    }
}
