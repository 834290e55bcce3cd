use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Share of the price above the base-cost threshold paid to the partner.
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Product family derived from a free-text category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Shirt,
    Hat,
    Mug,
    Other,
}

impl ProductKind {
    /// Case-insensitive substring match, checked in declaration order.
    pub fn from_category(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("shirt") {
            ProductKind::Shirt
        } else if label.contains("hat") || label.contains("cap") {
            ProductKind::Hat
        } else if label.contains("mug") {
            ProductKind::Mug
        } else {
            ProductKind::Other
        }
    }

    /// Base production cost per item; nothing below it is commissionable.
    pub fn threshold(self) -> Decimal {
        match self {
            ProductKind::Shirt => Decimal::new(14, 0),
            ProductKind::Hat => Decimal::new(8, 0),
            ProductKind::Mug => Decimal::new(7, 0),
            ProductKind::Other => Decimal::ZERO,
        }
    }

    pub fn recommended_range(self) -> PriceRange {
        let (min, max) = match self {
            ProductKind::Shirt => (1999, 2999),
            ProductKind::Hat => (1499, 2499),
            ProductKind::Mug => (1299, 1999),
            ProductKind::Other => (999, 2999),
        };
        PriceRange {
            min: Decimal::new(min, 2),
            max: Decimal::new(max, 2),
        }
    }
}

/// A category as clients send it: either a bare label or a category object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    Label(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl CategoryRef {
    pub fn label(&self) -> &str {
        match self {
            CategoryRef::Label(label) => label,
            CategoryRef::Detailed { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ProductKind {
        ProductKind::from_category(self.label())
    }
}

impl Default for CategoryRef {
    fn default() -> Self {
        CategoryRef::Label(String::new())
    }
}

impl From<&str> for CategoryRef {
    fn from(label: &str) -> Self {
        CategoryRef::Label(label.to_string())
    }
}

impl From<String> for CategoryRef {
    fn from(label: String) -> Self {
        CategoryRef::Label(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Split of one unit price between partner and platform.
///
/// Amounts are exact; round with [`super::round_money`] only for display or
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CommissionBreakdown {
    pub price: Decimal,
    pub kind: ProductKind,
    pub threshold: Decimal,
    pub commission_rate: Decimal,
    pub commissionable_amount: Decimal,
    pub commission: Decimal,
    pub platform_fee: Decimal,
}

pub fn category_threshold(category: &str) -> Decimal {
    ProductKind::from_category(category).threshold()
}

pub fn recommended_price_range(category: &str) -> PriceRange {
    ProductKind::from_category(category).recommended_range()
}

/// Commission for a single unit sold at `price` in `category`.
///
/// Unknown categories have a zero threshold, so the whole price is
/// commissionable.
pub fn calculate_commission(price: Decimal, category: &str) -> CommissionBreakdown {
    let kind = ProductKind::from_category(category);
    let threshold = kind.threshold();
    let commissionable_amount = (price - threshold).max(Decimal::ZERO);
    let commission = commissionable_amount * COMMISSION_RATE;

    CommissionBreakdown {
        price,
        kind,
        threshold,
        commission_rate: COMMISSION_RATE,
        commissionable_amount,
        commission,
        platform_fee: price - commission,
    }
}
