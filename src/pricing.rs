//! Price lookups for equipment and whole builds.

use serde::{Deserialize, Serialize};

use crate::models::{AquariumBuild, Equipment, PriceQuote};

/// The cheapest quote in `quotes`. The earliest quote wins a tie.
pub fn cheapest_quote(quotes: &[PriceQuote]) -> Option<&PriceQuote> {
    quotes.iter().fold(None, |cheapest, quote| match cheapest {
        Some(best) if best.price <= quote.price => Some(best),
        _ => Some(quote),
    })
}

impl Equipment {
    pub fn cheapest_quote(&self) -> Option<&PriceQuote> {
        cheapest_quote(&self.price_quotes)
    }

    pub fn cheapest_price(&self) -> Option<f64> {
        self.cheapest_quote().map(|q| q.price)
    }
}

/// Display totals for the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTotals {
    /// Sum of each line's cheapest price. Quantity does not scale it.
    pub equipment_total: f64,
    pub equipment_lines: usize,
    pub fish_count: u64,
    pub plant_count: u64,
}

impl BuildTotals {
    pub fn of(build: &AquariumBuild) -> Self {
        let equipment_total = build
            .equipment
            .iter()
            .map(|line| line.item.cheapest_price().unwrap_or(0.0))
            .fold(0.0, |total, price| total + price);

        Self {
            equipment_total,
            equipment_lines: build.equipment.len(),
            fish_count: build.fish.iter().map(|l| u64::from(l.quantity)).sum(),
            plant_count: build.plants.iter().map(|l| u64::from(l.quantity)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentCategory, LineItem};

    fn quote(source: &str, price: f64) -> PriceQuote {
        PriceQuote {
            source: source.to_string(),
            price,
            url: "#".to_string(),
        }
    }

    fn equipment(id: &str, prices: &[f64]) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: id.to_string(),
            category: EquipmentCategory::Tank,
            model_number: None,
            price_quotes: prices.iter().map(|p| quote("Shop", *p)).collect(),
            specs: None,
        }
    }

    #[test]
    fn picks_the_minimum_price() {
        let quotes = vec![quote("A", 100.0), quote("B", 80.0), quote("C", 120.0)];
        let cheapest = cheapest_quote(&quotes).unwrap();
        assert_eq!(cheapest.price, 80.0);
        assert_eq!(cheapest.source, "B");
    }

    #[test]
    fn first_quote_wins_a_tie() {
        let quotes = vec![quote("A", 50.0), quote("B", 50.0)];
        assert_eq!(cheapest_quote(&quotes).unwrap().source, "A");
    }

    #[test]
    fn no_quotes_means_no_price() {
        assert!(cheapest_quote(&[]).is_none());
        assert!(equipment("bare", &[]).cheapest_price().is_none());
    }

    #[test]
    fn totals_count_each_line_once() {
        let mut build = AquariumBuild::default();
        build.equipment.push(LineItem::new(equipment("tank", &[100.0, 80.0, 120.0]), 1));
        build.equipment.push(LineItem::new(equipment("rock", &[5.0, 6.0]), 4));
        build.equipment.push(LineItem::new(equipment("bare", &[]), 2));

        let totals = BuildTotals::of(&build);
        assert_eq!(totals.equipment_total, 85.0);
        assert_eq!(totals.equipment_lines, 3);
        assert_eq!(totals.fish_count, 0);
    }

    #[test]
    fn empty_build_totals_positive_zero() {
        let totals = BuildTotals::of(&AquariumBuild::default());
        assert!(totals.equipment_total.is_sign_positive());
        assert_eq!(
            serde_json::to_value(&totals).unwrap()["equipmentTotal"],
            serde_json::json!(0.0)
        );
        assert_eq!(format!("{:.2}", totals.equipment_total), "0.00");
    }
}
