// Totals shown next to the filter screen rows. All of them are computed
// by the store, nothing here loads venues.
use crate::catalog::Catalog;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::record::{Field, PriceTier};

pub const DEALS: &str = "sum_deals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSummary {
    pub cheap: u64,
    pub moderate: u64,
    pub expensive: u64,
    pub deals: i64,
}
impl FilterSummary {
    pub fn load(executor: &QueryExecutor, catalog: &Catalog) -> Result<Self> {
        Ok(Self {
            cheap: executor.count(Some(catalog.tier_predicate(PriceTier::Low).as_ref()))?,
            moderate: executor.count(Some(catalog.tier_predicate(PriceTier::Medium).as_ref()))?,
            expensive: executor.count(Some(catalog.tier_predicate(PriceTier::High).as_ref()))?,
            deals: executor.aggregate(DEALS, Field::SpecialCount)?.total,
        })
    }
    pub fn tier_count(&self, tier: PriceTier) -> u64 {
        match tier {
            PriceTier::Low => self.cheap,
            PriceTier::Medium => self.moderate,
            PriceTier::High => self.expensive,
        }
    }
    pub fn tier_label(&self, tier: PriceTier) -> String {
        let count = self.tier_count(tier);
        format!("{} bubble tea {}", count, if count == 1 { "place" } else { "places" })
    }
    pub fn deals_label(&self) -> String {
        format!("{} {}", self.deals, if self.deals == 1 { "deal" } else { "deals" })
    }
}
