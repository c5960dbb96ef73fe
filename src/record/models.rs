//! Defines the canonical record shapes consumed by every filter, aggregation
//! and export in the crate.
//!
//! The API returns records in several historical shapes (legacy integer IDs
//! next to opaque database IDs, embedded part names next to joined lookup
//! tables). Those variants stay at the decode boundary; everything in this
//! module is already resolved.

use time::Date;

/// The sentinel the API uses for an unresolved or unknown part name.
pub const UNRESOLVED_NAME: &str = "N/A";

// ============================================================================
// STOCK MOVEMENTS
// ============================================================================

/// Which way a ledger entry moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Stock added to inventory (a purchase).
    In,
    /// Stock removed from inventory (a sale).
    Out,
}

/// A canonical stock ledger entry, either stock-in or stock-out.
#[derive(Debug, Clone, PartialEq)]
pub struct StockMovement {
    /// Identifier unique within the collection. Opaque, never parsed.
    pub id: String,
    /// Human readable identifier: the legacy sequence ID when the record has
    /// one, otherwise a short prefix of [StockMovement::id]. Display only,
    /// never used for lookups.
    pub display_id: String,
    /// Opaque reference to the related part.
    pub part_ref: String,
    /// Resolved part name, [UNRESOLVED_NAME] when the reference does not
    /// resolve.
    pub part_name: String,
    /// Units moved. Missing or malformed quantities normalize to zero.
    pub quantity: u32,
    /// Unit buying price, when known.
    pub buying_price: Option<f64>,
    /// Unit selling price, when known. Stock-in entries have none.
    pub selling_price: Option<f64>,
    /// The date string exactly as the API sent it.
    pub raw_date: String,
    /// The calendar date, when [StockMovement::raw_date] parsed. Records
    /// without a parsable date never match a dated filter window.
    pub date: Option<Date>,
    /// Whether the entry adds or removes stock.
    pub direction: Direction,
}

impl StockMovement {
    /// The unit price that values this movement: the selling price for
    /// stock-out, the buying price for stock-in.
    pub fn unit_price(&self) -> Option<f64> {
        match self.direction {
            Direction::In => self.buying_price,
            Direction::Out => self.selling_price,
        }
    }

    /// Quantity times unit price, zero when the price is unknown.
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price().unwrap_or(0.0)
    }
}

// ============================================================================
// PARTS
// ============================================================================

/// How well stocked a part is relative to its low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// Quantity is zero.
    OutOfStock,
    /// Quantity is at or below the low-stock threshold.
    LowStock,
    /// Quantity is above the low-stock threshold.
    InStock,
}

impl StockStatus {
    /// The label shown in part listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}

/// A spare part as tracked by the inventory, with its lookups resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Identifier unique within the part collection. Opaque, never parsed.
    pub id: String,
    /// Human readable identifier, display only.
    pub display_id: String,
    /// The part name, [UNRESOLVED_NAME] when the API sent none.
    pub name: String,
    /// Resolved category name, [UNRESOLVED_NAME] when unknown.
    pub category: String,
    /// Resolved manufacturer name, [UNRESOLVED_NAME] when unknown.
    pub manufacturer: String,
    /// Units currently on hand.
    pub quantity: u32,
    /// Unit buying price, when set.
    pub buying_price: Option<f64>,
    /// Unit selling price, when set.
    pub selling_price: Option<f64>,
    /// Quantity floor below which the part counts as under-stocked.
    pub low_stock_threshold: u32,
}

impl Part {
    /// Classifies the part's stock level against its threshold.
    pub fn stock_status(&self) -> StockStatus {
        if self.quantity == 0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Quantity times buying price, zero when the price is unknown.
    pub fn total_buy_amount(&self) -> f64 {
        self.quantity as f64 * self.buying_price.unwrap_or(0.0)
    }

    /// Quantity times selling price, zero when the price is unknown.
    pub fn total_sell_amount(&self) -> f64 {
        self.quantity as f64 * self.selling_price.unwrap_or(0.0)
    }

    /// What selling the whole quantity would earn over what it cost.
    pub fn potential_profit(&self) -> f64 {
        self.total_sell_amount() - self.total_buy_amount()
    }
}

// ============================================================================
// LOOKUP COLLECTIONS
// ============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Identifier unique within the category collection.
    pub id: String,
    /// The category name.
    pub name: String,
}

/// A part manufacturer.
#[derive(Debug, Clone, PartialEq)]
pub struct Manufacturer {
    /// Identifier unique within the manufacturer collection.
    pub id: String,
    /// The manufacturer name.
    pub name: String,
}
