//! Effective price evaluation for generated slots.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use courthub_core::error::AppError;
use courthub_core::types::id::ResourceId;
use courthub_core::types::round_money;
use courthub_database::CatalogStore;
use courthub_entity::slot::{DayType, PriceRule, SlotConfig, TimeRange};

use super::generator::{SlotIter, generate_slots};

/// Price a slot starting at `slot_start` on a day of type `day`.
///
/// Every matching rule's surcharge is added; only the highest-priority
/// match may override the base price. Equal priorities keep declaration
/// order.
pub fn evaluate_price(
    slot_start: NaiveTime,
    base_price: Decimal,
    day: DayType,
    rules: &[PriceRule],
) -> Decimal {
    let mut matching: Vec<&PriceRule> = rules
        .iter()
        .filter(|rule| rule.matches(day, slot_start))
        .collect();
    matching.sort_by(|a, b| b.priority.cmp(&a.priority));

    let base = matching
        .first()
        .and_then(|top| top.override_price)
        .unwrap_or(base_price);
    let surcharges: Decimal = matching.iter().filter_map(|rule| rule.surcharge).sum();

    round_money(base + surcharges)
}

/// A resource's slot configuration together with its price rules.
#[derive(Debug, Clone)]
pub struct PriceSheet {
    /// The enabled slot configuration.
    pub config: SlotConfig,
    /// Price rules in declaration order.
    pub rules: Vec<PriceRule>,
}

impl PriceSheet {
    /// Load the sheet for one resource.
    pub async fn load(catalog: &dyn CatalogStore, resource_id: ResourceId) -> Result<Self, AppError> {
        let config = catalog
            .find_slot_configs(&[resource_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::configuration(format!("Resource {resource_id} has no slot configuration"))
            })?;
        let rules = catalog.find_price_rules(config.id).await?;
        Ok(Self { config, rules })
    }

    /// The day's slot grid.
    pub fn slots(&self) -> Result<SlotIter, AppError> {
        generate_slots(&self.config)
    }

    /// Effective price of the slot starting at `start` on `date`.
    pub fn price_at(&self, start: NaiveTime, date: NaiveDate) -> Decimal {
        evaluate_price(start, self.config.base_price, DayType::of(date), &self.rules)
    }

    /// Sum of the effective prices of consecutive sub-slots.
    pub fn price_of(&self, slots: &[TimeRange], date: NaiveDate) -> Decimal {
        round_money(slots.iter().map(|s| self.price_at(s.start, date)).sum())
    }
}
