use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use super::model::{ComponentDescriptor, Requirement};
use super::source::MetadataSource;
use crate::core::error::{PackError, PackResult};

/// Which pin a resolution round looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    Exact,
    Suggested,
}

impl Round {
    fn pin<'r>(self, requirement: &'r Requirement) -> Option<&'r str> {
        match self {
            Round::Exact => requirement.exact_version.as_deref(),
            Round::Suggested => requirement.suggested_version.as_deref(),
        }
    }
}

/// Working state of one `resolve` call.
#[derive(Debug, Default)]
struct Closure {
    resolved: BTreeMap<String, ComponentDescriptor>,
    pending: BTreeMap<String, Requirement>,
}

impl Closure {
    /// Add a fetched component and record its requirements as pending.
    ///
    /// Components already resolved are ignored, as are requirements on ids
    /// that are already resolved.
    fn add(&mut self, component: ComponentDescriptor) {
        if self.resolved.contains_key(&component.id) {
            return;
        }

        for requirement in &component.requirements {
            let id = &requirement.dependency_id;
            if *id == component.id || self.resolved.contains_key(id) {
                continue;
            }
            match self.pending.entry(id.clone()) {
                Entry::Occupied(mut entry) => {
                    if entry.get().conflicts_with(requirement) {
                        warn!(
                            "{} requires {} {}, keeping earlier pin {}",
                            component.id,
                            id,
                            requirement.exact_version.as_deref().unwrap_or_default(),
                            entry.get().exact_version.as_deref().unwrap_or_default()
                        );
                    }
                    entry.get_mut().merge_from(requirement);
                }
                Entry::Vacant(entry) => {
                    entry.insert(requirement.clone());
                }
            }
        }

        self.resolved.insert(component.id.clone(), component);
    }

    /// Drop pending entries for ids that got resolved in the meantime.
    fn prune(&mut self) {
        let resolved = &self.resolved;
        self.pending.retain(|id, _| !resolved.contains_key(id));
    }

    /// Take every pending entry that has a pin for `round`.
    fn take_round(&mut self, round: Round) -> Vec<(String, String)> {
        let batch: Vec<(String, String)> = self
            .pending
            .iter()
            .filter_map(|(id, req)| round.pin(req).map(|v| (id.clone(), v.to_string())))
            .collect();
        for (id, _) in &batch {
            self.pending.remove(id);
        }
        batch
    }
}

/// Ordered result of a resolution plus the tags the manifest needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    components: Vec<ComponentDescriptor>,
    primary_id: String,
    seed_ids: BTreeSet<String>,
}

impl Resolution {
    fn new<'s>(
        resolved: BTreeMap<String, ComponentDescriptor>,
        primary_id: &str,
        seed_ids: impl IntoIterator<Item = &'s String>,
    ) -> Self {
        let mut components: Vec<ComponentDescriptor> = resolved.into_values().collect();
        components.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        Self {
            components,
            primary_id: primary_id.to_string(),
            seed_ids: seed_ids.into_iter().cloned().collect(),
        }
    }

    /// Components sorted by ascending `order`, ties broken by id.
    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.components
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn is_primary(&self, id: &str) -> bool {
        self.primary_id == id
    }

    /// Pulled in purely transitively: neither primary nor seeded.
    pub fn is_dependency_only(&self, id: &str) -> bool {
        !self.is_primary(id) && !self.seed_ids.contains(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.components.len()
    }
}

/// Computes the dependency closure of a seed set against a metadata source.
///
/// Resolution works in rounds. Every round fetches all pending requirements
/// that carry an exact pin; only when such a round finds nothing to do are
/// the suggested pins tried. When neither kind of round has anything left to
/// fetch, the remaining ids end the resolution with
/// [`PackError::UnresolvedDependency`].
///
/// Fetches inside a round run concurrently (up to `concurrency`) but their
/// results are applied in id order after the whole round completed, so the
/// outcome does not depend on response timing.
pub struct ComponentResolver<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    concurrency: usize,
}

impl<'a, S: MetadataSource + ?Sized> ComponentResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            concurrency: 8,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Resolve `seed` (component id → version) into its full closure.
    ///
    /// `primary_id` names the base runtime component; it is only used for
    /// tagging and does not have to be part of the seed.
    pub async fn resolve(
        &self,
        seed: &BTreeMap<String, String>,
        primary_id: &str,
    ) -> PackResult<Resolution> {
        info!("Resolving {} seed components", seed.len());

        let mut closure = Closure::default();

        let seeds = seed
            .iter()
            .map(|(id, version)| (id.clone(), version.clone()))
            .collect();
        for component in self.fetch_all(seeds).await? {
            closure.add(component);
        }
        closure.prune();

        while !closure.pending.is_empty() {
            if self.run_round(&mut closure, Round::Exact).await? {
                continue;
            }
            if self.run_round(&mut closure, Round::Suggested).await? {
                continue;
            }
            let missing: Vec<String> = closure.pending.into_keys().collect();
            return Err(PackError::UnresolvedDependency(missing));
        }

        let resolution = Resolution::new(closure.resolved, primary_id, seed.keys());
        info!("Resolved {} components", resolution.len());
        Ok(resolution)
    }

    /// Returns whether the round resolved anything.
    async fn run_round(&self, closure: &mut Closure, round: Round) -> PackResult<bool> {
        let batch = closure.take_round(round);
        if batch.is_empty() {
            return Ok(false);
        }

        debug!(
            "{:?} round: {}",
            round,
            batch
                .iter()
                .map(|(id, v)| format!("{id}@{v}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        for component in self.fetch_all(batch).await? {
            closure.add(component);
        }
        closure.prune();

        Ok(true)
    }

    /// Fetch a batch, keeping input order. The first failure aborts the batch.
    async fn fetch_all(&self, batch: Vec<(String, String)>) -> PackResult<Vec<ComponentDescriptor>> {
        let source = self.source;
        stream::iter(batch)
            .map(|(id, version)| async move {
                debug!("Fetching {} {}", id, version);
                source.fetch(&id, &version).await
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
