//! Resource pool construction.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use courthub_core::error::{AppError, codes};
use courthub_core::types::id::{ResourceId, ServiceId};
use courthub_database::CatalogStore;
use courthub_entity::resource::Resource;
use courthub_entity::slot::SlotConfig;

use super::tier::TieredResources;

/// The interchangeable resources a slot can be booked on.
///
/// Every member shares the same slot-config base price.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    /// Members in fetch order. Never empty.
    pub resources: Vec<Resource>,
    /// Slot configuration of every member.
    pub configs: HashMap<ResourceId, SlotConfig>,
    /// The shared base price.
    pub base_price: Decimal,
}

impl ResourcePool {
    /// Member ids in fetch order.
    pub fn ids(&self) -> Vec<ResourceId> {
        self.resources.iter().map(|r| r.id).collect()
    }

    /// Member ids sorted ascending.
    pub fn sorted_ids(&self) -> Vec<ResourceId> {
        let mut ids = self.ids();
        ids.sort();
        ids
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.resources.len()
    }

    /// The first member; its slot configuration drives quoting.
    pub fn primary(&self) -> Result<(&Resource, &SlotConfig), AppError> {
        let primary = self
            .resources
            .first()
            .ok_or_else(|| AppError::conflict("Resource pool is empty").with_code(codes::NO_VALID_POOL))?;
        let config = self.configs.get(&primary.id).ok_or_else(|| {
            AppError::configuration(format!("Resource {} has no slot configuration", primary.id))
        })?;
        Ok((primary, config))
    }

    /// Members partitioned into allocation tiers.
    pub fn tiers(&self) -> TieredResources {
        TieredResources::classify(&self.resources)
    }
}

/// Pick the largest group of equally-priced resources.
///
/// Resources without a configuration are dropped. Ties go to the group whose
/// price was encountered first in fetch order.
pub fn select_pool(
    resources: Vec<Resource>,
    configs: Vec<SlotConfig>,
) -> Result<ResourcePool, AppError> {
    if resources.is_empty() {
        return Err(AppError::conflict("No resources available for this activity")
            .with_code(codes::NO_RESOURCES_AVAILABLE));
    }

    let mut by_resource: HashMap<ResourceId, SlotConfig> = configs
        .into_iter()
        .map(|config| (config.resource_id, config))
        .collect();

    let mut groups: Vec<(Decimal, Vec<Resource>)> = Vec::new();
    for resource in resources {
        let Some(config) = by_resource.get(&resource.id) else {
            warn!(resource_id = %resource.id, "Resource has no slot configuration, excluded from pool");
            continue;
        };
        let price = config.base_price;
        match groups.iter_mut().find(|(p, _)| *p == price) {
            Some((_, members)) => members.push(resource),
            None => groups.push((price, vec![resource])),
        }
    }

    let mut best: Option<(Decimal, Vec<Resource>)> = None;
    for group in groups {
        if best.as_ref().is_none_or(|b| group.1.len() > b.1.len()) {
            best = Some(group);
        }
    }
    let (base_price, members) = best.ok_or_else(|| {
        AppError::conflict("No priced resources available for this activity")
            .with_code(codes::NO_VALID_POOL)
    })?;

    let configs = members
        .iter()
        .filter_map(|r| by_resource.remove(&r.id).map(|c| (r.id, c)))
        .collect();

    Ok(ResourcePool {
        resources: members,
        configs,
        base_price,
    })
}

/// Resolves resource pools from the catalog.
#[derive(Clone)]
pub struct PoolBuilder {
    catalog: Arc<dyn CatalogStore>,
}

impl std::fmt::Debug for PoolBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolBuilder").finish_non_exhaustive()
    }
}

impl PoolBuilder {
    /// Creates a new pool builder.
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Build the pool for an activity at a service.
    pub async fn build(
        &self,
        service_id: ServiceId,
        activity_code: &str,
    ) -> Result<ResourcePool, AppError> {
        let resources = self
            .catalog
            .find_resources_for_activity(service_id, activity_code)
            .await?;
        let ids: Vec<ResourceId> = resources.iter().map(|r| r.id).collect();
        let configs = if ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_slot_configs(&ids).await?
        };

        let pool = select_pool(resources, configs)?;
        debug!(
            service_id = %service_id,
            activity = %activity_code,
            pool_size = pool.size(),
            base_price = %pool.base_price,
            "Resolved resource pool"
        );
        Ok(pool)
    }
}
