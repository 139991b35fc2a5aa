//! Exclusive / multi-activity partitioning.

use courthub_core::types::id::ResourceId;
use courthub_entity::resource::{Resource, ResourceTier};

/// Resources split into allocation tiers, each in fetch order.
#[derive(Debug, Clone, Default)]
pub struct TieredResources {
    /// Resources dedicated to one activity. Tried first.
    pub exclusive: Vec<ResourceId>,
    /// Resources shared across activities.
    pub multi_activity: Vec<ResourceId>,
}

impl TieredResources {
    /// Partition resources by tier, preserving order within each tier.
    pub fn classify(resources: &[Resource]) -> Self {
        let mut tiers = Self::default();
        for resource in resources {
            match resource.tier() {
                ResourceTier::Exclusive => tiers.exclusive.push(resource.id),
                ResourceTier::MultiActivity => tiers.multi_activity.push(resource.id),
            }
        }
        tiers
    }

    /// All resources in allocation priority order.
    pub fn in_priority_order(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.exclusive
            .iter()
            .chain(self.multi_activity.iter())
            .copied()
    }

    /// Total number of resources.
    pub fn len(&self) -> usize {
        self.exclusive.len() + self.multi_activity.len()
    }

    /// Whether there are no resources at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
