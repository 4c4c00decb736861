//! Lumber catalog and estimating arithmetic

use crate::error::{CodexError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_WASTE_PERCENT: u32 = 30;
pub const DEFAULT_WASTE_PERCENT: u32 = 10;

const MM_PER_INCH: f64 = 25.4;
const CUBIC_INCHES_PER_BOARD_FOOT: f64 = 144.0;

/// Measurement system used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" => Ok(UnitSystem::Metric),
            _ => Err(format!("Invalid unit system: {}. Valid: imperial, metric", s)),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Imperial => f.write_str("imperial"),
            UnitSystem::Metric => f.write_str("metric"),
        }
    }
}

/// Actual (not nominal) size in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub thickness: f64,
    pub width: f64,
    pub length: f64,
}

impl Dimensions {
    pub fn board_feet(&self) -> f64 {
        self.thickness * self.width * self.length / CUBIC_INCHES_PER_BOARD_FOOT
    }

    pub fn display(&self, units: UnitSystem) -> String {
        match units {
            UnitSystem::Imperial => format!(
                "{}\" x {}\" x {}\"",
                self.thickness, self.width, self.length
            ),
            UnitSystem::Metric => format!(
                "{:.0} mm x {:.0} mm x {:.0} mm",
                self.thickness * MM_PER_INCH,
                self.width * MM_PER_INCH,
                self.length * MM_PER_INCH
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumberProduct {
    pub key: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub actual: Dimensions,
}

const fn product(
    key: &'static str,
    name: &'static str,
    price: f64,
    (thickness, width, length): (f64, f64, f64),
) -> LumberProduct {
    LumberProduct {
        key,
        name,
        price,
        actual: Dimensions {
            thickness,
            width,
            length,
        },
    }
}

/// Store prices for the products the workshop usually buys
pub const CATALOG: [LumberProduct; 17] = [
    product("2x4x8", "2x4 - 8ft", 5.99, (1.5, 3.5, 96.0)),
    product("2x4x10", "2x4 - 10ft", 7.99, (1.5, 3.5, 120.0)),
    product("2x4x12", "2x4 - 12ft", 9.99, (1.5, 3.5, 144.0)),
    product("2x6x8", "2x6 - 8ft", 8.99, (1.5, 5.5, 96.0)),
    product("2x6x10", "2x6 - 10ft", 11.99, (1.5, 5.5, 120.0)),
    product("2x6x12", "2x6 - 12ft", 14.99, (1.5, 5.5, 144.0)),
    product("2x8x8", "2x8 - 8ft", 12.99, (1.5, 7.25, 96.0)),
    product("2x8x12", "2x8 - 12ft", 18.99, (1.5, 7.25, 144.0)),
    product("2x10x8", "2x10 - 8ft", 16.99, (1.5, 9.25, 96.0)),
    product("2x10x12", "2x10 - 12ft", 24.99, (1.5, 9.25, 144.0)),
    product("2x12x8", "2x12 - 8ft", 21.99, (1.5, 11.25, 96.0)),
    product("2x12x12", "2x12 - 12ft", 32.99, (1.5, 11.25, 144.0)),
    product("4x4x8", "4x4 Post - 8ft", 14.99, (3.5, 3.5, 96.0)),
    product("4x4x10", "4x4 Post - 10ft", 18.99, (3.5, 3.5, 120.0)),
    product("plywood_1/2", "Plywood 4x8 - 1/2\"", 45.99, (0.5, 48.0, 96.0)),
    product("plywood_3/4", "Plywood 4x8 - 3/4\"", 59.99, (0.75, 48.0, 96.0)),
    product("osb_7/16", "OSB 4x8 - 7/16\"", 32.99, (0.4375, 48.0, 96.0)),
];

pub fn lookup(key: &str) -> Result<&'static LumberProduct> {
    CATALOG
        .iter()
        .find(|p| p.key == key.trim())
        .ok_or_else(|| CodexError::UnknownLumber(key.to_string()))
}

pub fn validate_waste(percent: u32) -> Result<()> {
    if percent > MAX_WASTE_PERCENT {
        return Err(CodexError::InvalidInput(format!(
            "Waste factor must be between 0% and {}%",
            MAX_WASTE_PERCENT
        )));
    }
    Ok(())
}

/// Quantity to buy once waste is included, rounded up to whole pieces.
///
/// Integer arithmetic so that 10 boards at 10% is exactly 11. Fails when
/// the padded quantity no longer fits a `u32`.
pub fn with_waste(quantity: u32, waste_percent: u32) -> Result<u32> {
    let scaled = quantity as u64 * (100 + waste_percent as u64);
    u32::try_from(scaled.div_ceil(100)).map_err(|_| {
        CodexError::InvalidInput(format!(
            "Quantity {} is too large with {}% waste",
            quantity, waste_percent
        ))
    })
}

/// Multiplier form of a waste percentage (10 -> 1.10)
pub fn waste_multiplier(waste_percent: u32) -> f64 {
    1.0 + waste_percent as f64 / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickCalc {
    pub product: &'static LumberProduct,
    pub quantity: u32,
    pub waste_percent: u32,
    pub adjusted_quantity: u32,
    pub total_cost: f64,
}

pub fn quick_calc(key: &str, quantity: u32, waste_percent: u32) -> Result<QuickCalc> {
    let product = lookup(key)?;
    if quantity == 0 {
        return Err(CodexError::InvalidInput(
            "Quantity must be at least 1".to_string(),
        ));
    }
    validate_waste(waste_percent)?;

    let adjusted_quantity = with_waste(quantity, waste_percent)?;
    Ok(QuickCalc {
        product,
        quantity,
        waste_percent,
        adjusted_quantity,
        total_cost: adjusted_quantity as f64 * product.price,
    })
}

impl QuickCalc {
    pub fn purchase_description(&self) -> String {
        format!("{}x {}", self.adjusted_quantity, self.product.name)
    }
}

/// A saved quick calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumberCalculation {
    pub id: String,
    pub lumber_type: String,
    pub lumber_name: String,
    pub quantity: u32,
    pub adjusted_quantity: u32,
    /// Multiplier, e.g. 1.1
    pub waste_factor: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    pub created_at: NaiveDateTime,
}

impl LumberCalculation {
    pub fn from_calc(calc: &QuickCalc, id: String, created_at: NaiveDateTime) -> Self {
        LumberCalculation {
            id,
            lumber_type: calc.product.key.to_string(),
            lumber_name: calc.product.name.to_string(),
            quantity: calc.quantity,
            adjusted_quantity: calc.adjusted_quantity,
            waste_factor: waste_multiplier(calc.waste_percent),
            unit_price: calc.product.price,
            total_cost: calc.total_cost,
            created_at,
        }
    }
}

/// One line of a project estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    #[serde(rename = "type")]
    pub lumber_type: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl ProjectItem {
    pub fn new(key: &str, quantity: u32) -> Result<Self> {
        let product = lookup(key)?;
        if quantity == 0 {
            return Err(CodexError::InvalidInput(
                "Quantity must be at least 1".to_string(),
            ));
        }
        Ok(ProjectItem {
            lumber_type: product.key.to_string(),
            name: product.name.to_string(),
            quantity,
            price: product.price,
        })
    }

    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

pub fn project_subtotal(items: &[ProjectItem]) -> f64 {
    items.iter().map(ProjectItem::line_total).sum()
}

/// (subtotal, total with waste)
pub fn project_totals(items: &[ProjectItem], waste_percent: u32) -> (f64, f64) {
    let subtotal = project_subtotal(items);
    (subtotal, subtotal * waste_multiplier(waste_percent))
}

/// A saved multi-item estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEstimate {
    pub id: String,
    pub name: String,
    pub items: Vec<ProjectItem>,
    pub subtotal: f64,
    /// Multiplier, e.g. 1.1
    pub waste_factor: f64,
    pub total: f64,
    pub created_at: NaiveDateTime,
}

impl ProjectEstimate {
    pub fn build(
        name: &str,
        items: Vec<ProjectItem>,
        waste_percent: u32,
        id: String,
        created_at: NaiveDateTime,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(CodexError::InvalidInput(
                "Add at least one item before saving the project".to_string(),
            ));
        }
        validate_waste(waste_percent)?;

        let (subtotal, total) = project_totals(&items, waste_percent);
        let name = name.trim();
        Ok(ProjectEstimate {
            id,
            name: if name.is_empty() {
                "Unnamed Project".to_string()
            } else {
                name.to_string()
            },
            items,
            subtotal,
            waste_factor: waste_multiplier(waste_percent),
            total,
            created_at,
        })
    }
}
