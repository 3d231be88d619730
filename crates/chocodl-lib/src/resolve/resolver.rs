use super::types::{ResolvedPackage, ResolvedPackages};
use crate::catalog::CatalogClient;
use crate::request::{PackageRequest, dedupe_requests};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::instrument::WithSubscriber;

/// Resolves every distinct request concurrently and waits for all of them.
///
/// One task is spawned per identifier. Failures degrade the affected package
/// only, so the result always holds one entry per distinct identifier, in
/// input order.
pub async fn resolve_all(
    client: &CatalogClient,
    requests: Vec<PackageRequest>,
) -> ResolvedPackages {
    let requests = dedupe_requests(requests);
    if requests.is_empty() {
        return ResolvedPackages::default();
    }

    tracing::info!("Resolving {} packages...", requests.len());

    let mut futs = FuturesUnordered::new();
    for (position, request) in requests.iter().cloned().enumerate() {
        let client = client.clone();
        let handle =
            tokio::spawn(async move { client.resolve(request).await }.with_current_subscriber());
        futs.push(async move { (position, handle.await) });
    }

    let mut slots: Vec<Option<ResolvedPackage>> = vec![None; requests.len()];
    while let Some((position, joined)) = futs.next().await {
        let resolved = match joined {
            Ok(resolved) => resolved,
            Err(err) => {
                let request = requests[position].clone();
                tracing::warn!(
                    "Package '{}' could not be resolved: {}",
                    request.identifier,
                    err
                );
                ResolvedPackage::unresolved(request)
            }
        };
        slots[position] = Some(resolved);
    }

    ResolvedPackages::from_ordered(slots.into_iter().flatten().collect())
}
