//! Allocation tiers for resources.

use serde::{Deserialize, Serialize};

/// Priority tier a resource falls into for allocation.
///
/// Exclusive resources serve exactly one activity and are always tried
/// before resources shared across activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceTier {
    /// Supports exactly one activity.
    Exclusive,
    /// Supports two or more activities.
    MultiActivity,
}

impl ResourceTier {
    /// Classify by activity count.
    pub fn for_activity_count(count: usize) -> Self {
        if count > 1 {
            Self::MultiActivity
        } else {
            Self::Exclusive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_activity_is_exclusive() {
        assert_eq!(ResourceTier::for_activity_count(1), ResourceTier::Exclusive);
        assert_eq!(ResourceTier::for_activity_count(2), ResourceTier::MultiActivity);
    }

    #[test]
    fn test_exclusive_sorts_first() {
        assert!(ResourceTier::Exclusive < ResourceTier::MultiActivity);
    }
}
