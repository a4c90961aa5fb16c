//! Priced quote lines

use serde::{Deserialize, Serialize};
use template_engine::{Record, Value};

use crate::error::Violation;
use crate::format::{format_currency, format_meters, format_quantity};

/// Fields of each line-item record in the template context
pub const ITEM_FIELDS: &[&str] = &[
    "index",
    "productName",
    "pricingTypeLabel",
    "specification",
    "unitPriceNote",
    "subtotal",
];

/// How a line item's price is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    /// Price per piece
    Unit,
    /// Price per square metre of width x height
    SquareMeter,
    /// Price per linear metre of width
    LinearMeter,
    /// One flat price regardless of quantity
    Fixed,
}

impl PricingType {
    /// Human label printed on the quote
    pub fn label(&self) -> &'static str {
        match self {
            PricingType::Unit => "Per unit",
            PricingType::SquareMeter => "Per square meter",
            PricingType::LinearMeter => "Per linear meter",
            PricingType::Fixed => "Fixed price",
        }
    }

    /// Unit suffix for the per-unit price annotation
    fn unit_suffix(&self) -> Option<&'static str> {
        match self {
            PricingType::Unit => Some("un"),
            PricingType::SquareMeter => Some("m²"),
            PricingType::LinearMeter => Some("m"),
            PricingType::Fixed => None,
        }
    }
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// One priced line of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_name: String,
    pub pricing_type: PricingType,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Width in metres; the length for linear pricing
    #[serde(default)]
    pub width: Option<f64>,
    /// Height in metres
    #[serde(default)]
    pub height: Option<f64>,
    pub unit_price: f64,
    /// Print the unit price next to the specification
    #[serde(default)]
    pub show_unit_price: bool,
}

impl LineItem {
    pub fn new(product_name: impl Into<String>, pricing_type: PricingType, unit_price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            pricing_type,
            quantity: 1.0,
            width: None,
            height: None,
            unit_price,
            show_unit_price: false,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.width = Some(length);
        self
    }

    pub fn with_unit_price_shown(mut self) -> Self {
        self.show_unit_price = true;
        self
    }

    /// Priced measure of one piece: area, length, or 1
    pub fn measure(&self) -> f64 {
        match self.pricing_type {
            PricingType::SquareMeter => self.width.unwrap_or(0.0) * self.height.unwrap_or(0.0),
            PricingType::LinearMeter => self.width.unwrap_or(0.0),
            PricingType::Unit | PricingType::Fixed => 1.0,
        }
    }

    pub fn subtotal(&self) -> f64 {
        match self.pricing_type {
            PricingType::Fixed => self.unit_price,
            _ => self.measure() * self.quantity * self.unit_price,
        }
    }

    /// Dimensions and quantity as printed, e.g. `1.20 m x 0.80 m (0.96 m²) x 3`
    pub fn specification(&self) -> String {
        let quantity = format_quantity(self.quantity);
        match self.pricing_type {
            PricingType::Unit => format!("{} un", quantity),
            PricingType::SquareMeter => format!(
                "{} x {} ({:.2} m²) x {}",
                format_meters(self.width.unwrap_or(0.0)),
                format_meters(self.height.unwrap_or(0.0)),
                self.measure(),
                quantity
            ),
            PricingType::LinearMeter => {
                format!("{} x {}", format_meters(self.width.unwrap_or(0.0)), quantity)
            }
            PricingType::Fixed => String::new(),
        }
    }

    /// Per-unit price annotation such as `R$ 45.00/m²`, empty when hidden
    pub fn unit_price_note(&self, currency_symbol: &str) -> String {
        match self.pricing_type.unit_suffix() {
            Some(suffix) if self.show_unit_price => {
                format!("{}/{}", format_currency(self.unit_price, currency_symbol), suffix)
            }
            _ => String::new(),
        }
    }

    /// Template record for this line; `index` is 1-based
    pub fn to_record(&self, index: usize, currency_symbol: &str) -> Record {
        let mut record = Record::new();
        record.insert("index".into(), Value::from(index));
        record.insert("productName".into(), self.product_name.clone().into());
        record.insert("pricingTypeLabel".into(), self.pricing_type.label().into());
        record.insert("specification".into(), self.specification().into());
        record.insert("unitPriceNote".into(), self.unit_price_note(currency_symbol).into());
        record.insert(
            "subtotal".into(),
            format_currency(self.subtotal(), currency_symbol).into(),
        );
        record
    }

    pub(crate) fn validate(&self, path: &str, violations: &mut Vec<Violation>) {
        let field = |name: &str| format!("{}.{}", path, name);

        if self.product_name.trim().is_empty() {
            violations.push(Violation::new(field("productName"), "is required"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            violations.push(Violation::new(field("quantity"), "must be greater than zero"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            violations.push(Violation::new(field("unitPrice"), "must not be negative"));
        }

        let needs_width = matches!(
            self.pricing_type,
            PricingType::SquareMeter | PricingType::LinearMeter
        );
        let needs_height = self.pricing_type == PricingType::SquareMeter;
        if needs_width && !is_positive(self.width) {
            violations.push(Violation::new(
                field("width"),
                format!("is required for {} pricing", self.pricing_type.label().to_lowercase()),
            ));
        }
        if needs_height && !is_positive(self.height) {
            violations.push(Violation::new(
                field("height"),
                format!("is required for {} pricing", self.pricing_type.label().to_lowercase()),
            ));
        }
    }
}

fn is_positive(value: Option<f64>) -> bool {
    value.is_some_and(|v| v.is_finite() && v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_meter_item() {
        let item = LineItem::new("Banner", PricingType::SquareMeter, 50.0)
            .with_dimensions(1.2, 0.8)
            .with_quantity(3.0)
            .with_unit_price_shown();
        assert!((item.measure() - 0.96).abs() < 1e-9);
        assert!((item.subtotal() - 144.0).abs() < 1e-9);
        assert_eq!(item.specification(), "1.20 m x 0.80 m (0.96 m²) x 3");
        assert_eq!(item.unit_price_note("R$"), "R$ 50.00/m²");
    }

    #[test]
    fn test_linear_and_unit_items() {
        let strip = LineItem::new("LED strip", PricingType::LinearMeter, 20.0).with_length(2.5);
        assert_eq!(strip.subtotal(), 50.0);
        assert_eq!(strip.specification(), "2.50 m x 1");

        let mugs = LineItem::new("Mug", PricingType::Unit, 12.5).with_quantity(4.0);
        assert_eq!(mugs.subtotal(), 50.0);
        assert_eq!(mugs.specification(), "4 un");
        assert_eq!(mugs.unit_price_note("R$"), "");
    }

    #[test]
    fn test_fixed_item_ignores_quantity() {
        let install = LineItem::new("Installation", PricingType::Fixed, 300.0)
            .with_quantity(2.0)
            .with_unit_price_shown();
        assert_eq!(install.subtotal(), 300.0);
        assert_eq!(install.specification(), "");
        assert_eq!(install.unit_price_note("R$"), "");
    }

    #[test]
    fn test_to_record() {
        let record = LineItem::new("Banner", PricingType::Unit, 100.0).to_record(1, "R$");
        assert_eq!(record.get("index"), Some(&Value::Number(1.0)));
        assert_eq!(record.get("productName"), Some(&Value::from("Banner")));
        assert_eq!(record.get("pricingTypeLabel"), Some(&Value::from("Per unit")));
        assert_eq!(record.get("subtotal"), Some(&Value::from("R$ 100.00")));

        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = ITEM_FIELDS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_zero_priced_item_subtotal_is_formatted_text() {
        let record = LineItem::new("Sample", PricingType::Unit, 0.0).to_record(1, "R$");
        let subtotal = record.get("subtotal").unwrap();
        assert_eq!(subtotal, &Value::from("R$ 0.00"));
        assert!(subtotal.is_truthy());
    }

    #[test]
    fn test_validation() {
        let item = LineItem::new("", PricingType::SquareMeter, -1.0)
            .with_quantity(0.0)
            .with_length(1.0);
        let mut violations = Vec::new();
        item.validate("quote.items[0]", &mut violations);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "quote.items[0].productName",
                "quote.items[0].quantity",
                "quote.items[0].unitPrice",
                "quote.items[0].height",
            ]
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let item: LineItem = serde_json::from_str(
            r#"{"productName": "Sign", "pricingType": "square_meter", "unitPrice": 80, "width": 2, "height": 1}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 1.0);
        assert!(!item.show_unit_price);
        assert_eq!(item.subtotal(), 160.0);
    }
}
