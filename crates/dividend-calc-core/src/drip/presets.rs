use serde::Serialize;

use crate::drip::validation::DripFormInput;

/// A named starting scenario for the DRIP calculator.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: DripFormInput,
}

struct PresetRow {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    initial_investment: &'static str,
    share_price: &'static str,
    annual_dividend: &'static str,
    monthly_contribution: &'static str,
    dividend_growth_rate: &'static str,
    share_appreciation_rate: &'static str,
    years: u32,
}

const PRESETS: [PresetRow; 6] = [
    PresetRow {
        key: "conservative",
        name: "Conservative Retiree",
        description: "Low-risk, stable dividend stocks with moderate growth",
        initial_investment: "100000",
        share_price: "100",
        annual_dividend: "4",
        monthly_contribution: "500",
        dividend_growth_rate: "3",
        share_appreciation_rate: "5",
        years: 20,
    },
    PresetRow {
        key: "aggressive",
        name: "Aggressive Growth",
        description: "High-growth dividend aristocrats with lower current yield",
        initial_investment: "50000",
        share_price: "150",
        annual_dividend: "3",
        monthly_contribution: "1000",
        dividend_growth_rate: "10",
        share_appreciation_rate: "12",
        years: 30,
    },
    PresetRow {
        key: "fire",
        name: "Early Retirement (FIRE)",
        description: "Path to financial independence with high savings rate",
        initial_investment: "25000",
        share_price: "75",
        annual_dividend: "3.75",
        monthly_contribution: "2500",
        dividend_growth_rate: "7",
        share_appreciation_rate: "8",
        years: 15,
    },
    PresetRow {
        key: "aristocrats",
        name: "Dividend Aristocrats",
        description: "Blue-chip stocks with 25+ years of dividend growth",
        initial_investment: "75000",
        share_price: "120",
        annual_dividend: "4.80",
        monthly_contribution: "750",
        dividend_growth_rate: "7",
        share_appreciation_rate: "8",
        years: 25,
    },
    PresetRow {
        key: "high_yield",
        name: "High Yield Focus",
        description: "REITs and high-yield stocks for immediate income",
        initial_investment: "150000",
        share_price: "50",
        annual_dividend: "4",
        monthly_contribution: "250",
        dividend_growth_rate: "4",
        share_appreciation_rate: "4",
        years: 20,
    },
    PresetRow {
        key: "young_investor",
        name: "Young Investor",
        description: "Starting small with time on your side",
        initial_investment: "5000",
        share_price: "50",
        annual_dividend: "1.50",
        monthly_contribution: "300",
        dividend_growth_rate: "8",
        share_appreciation_rate: "10",
        years: 40,
    },
];

/// All presets assume a 15% dividend tax rate.
const PRESET_TAX_RATE: &str = "15";

impl PresetRow {
    fn build(&self) -> Preset {
        Preset {
            key: self.key,
            name: self.name,
            description: self.description,
            inputs: DripFormInput {
                ticker: String::new(),
                initial_investment: self.initial_investment.to_string(),
                share_price: self.share_price.to_string(),
                annual_dividend: self.annual_dividend.to_string(),
                monthly_contribution: self.monthly_contribution.to_string(),
                dividend_growth_rate: self.dividend_growth_rate.to_string(),
                share_appreciation_rate: self.share_appreciation_rate.to_string(),
                tax_rate: PRESET_TAX_RATE.to_string(),
                years_to_calculate: self.years.to_string(),
                reinvest_dividends: true,
            },
        }
    }
}

/// All presets in display order.
pub fn presets() -> Vec<Preset> {
    PRESETS.iter().map(PresetRow::build).collect()
}

/// Look up a preset by key (`"fire"`, `"high_yield"`, ...).
pub fn preset(key: &str) -> Option<Preset> {
    PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(key))
        .map(PresetRow::build)
}

pub fn preset_keys() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drip::projection::project;
    use crate::drip::validation::{validate, DripInput};

    #[test]
    fn test_every_preset_validates_and_projects() {
        for p in presets() {
            assert!(validate(&p.inputs).is_empty(), "preset {} invalid", p.key);
            let input = DripInput::try_from(&p.inputs).unwrap();
            let projection = project(&input).unwrap();
            assert_eq!(
                projection.results.len(),
                input.years_to_calculate as usize,
                "preset {}",
                p.key
            );
        }
    }

    #[test]
    fn test_lookup_by_key() {
        let fire = preset("fire").unwrap();
        assert_eq!(fire.name, "Early Retirement (FIRE)");
        assert_eq!(fire.inputs.years_to_calculate, "15");
        assert!(preset("HIGH_YIELD").is_some());
        assert!(preset("moonshot").is_none());
        assert_eq!(preset_keys().len(), 6);
    }
}
