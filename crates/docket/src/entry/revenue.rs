//! Revenue statement line items.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::ColumnConfig;
use crate::error::FieldError;
use crate::filter::{names, FilterState, Predicate};

use super::{value, Record, ToolKind};

/// Product a revenue line was paid on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Oil,
    Gas,
    Ngl,
    Condensate,
    #[default]
    Other,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::Oil,
        Product::Gas,
        Product::Ngl,
        Product::Condensate,
        Product::Other,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Product::Oil => "Oil",
            Product::Gas => "Gas",
            Product::Ngl => "NGL",
            Product::Condensate => "Condensate",
            Product::Other => "Other",
        }
    }

    /// Parse a product label or statement product code, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(p) = Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(value))
        {
            return Some(p);
        }
        match value.to_ascii_uppercase().as_str() {
            "01" | "O" => Some(Product::Oil),
            "02" | "G" | "NATURAL GAS" => Some(Product::Gas),
            "03" | "PLANT PRODUCTS" => Some(Product::Ngl),
            _ => None,
        }
    }
}

schema_fields! {
    /// Editable fields of a [`RevenueLine`].
    pub enum RevenueField {
        PropertyName => "property_name",
        PropertyNumber => "property_number",
        Product => "product",
        SalesDate => "sales_date",
        OwnerVolume => "owner_volume",
        OwnerValue => "owner_value",
        Taxes => "taxes",
        Deductions => "deductions",
        NetValue => "net_value",
        InterestType => "interest_type",
        DecimalInterest => "decimal_interest",
        CheckNumber => "check_number",
        Flagged => "flagged",
        FlagReason => "flag_reason",
    }
}

/// One line of a revenue statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueLine {
    /// Position of the line on the statement; the entry key.
    pub line_number: String,

    #[serde(default)]
    pub property_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_number: Option<String>,

    #[serde(default)]
    pub product: Product,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_volume: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductions: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_interest: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,

    #[serde(default)]
    pub flagged: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

impl RevenueLine {
    /// Create an unflagged line for a property and product.
    pub fn new(
        line_number: impl Into<String>,
        property_name: impl Into<String>,
        product: Product,
    ) -> Self {
        Self {
            line_number: line_number.into(),
            property_name: property_name.into(),
            property_number: None,
            product,
            sales_date: None,
            owner_volume: None,
            owner_value: None,
            taxes: None,
            deductions: None,
            net_value: None,
            interest_type: None,
            decimal_interest: None,
            check_number: None,
            flagged: false,
            flag_reason: None,
        }
    }

    /// Set the net value.
    pub fn with_net_value(mut self, net_value: f64) -> Self {
        self.net_value = Some(net_value);
        self
    }

    /// Flag the line for review.
    pub fn flagged(mut self, reason: impl Into<String>) -> Self {
        self.flagged = true;
        self.flag_reason = Some(reason.into());
        self
    }
}

fn number(value: Option<f64>) -> Option<Cow<'static, str>> {
    value.map(|n| Cow::Owned(n.to_string()))
}

impl Record for RevenueLine {
    type Field = RevenueField;

    const TOOL: ToolKind = ToolKind::Revenue;

    fn key(&self) -> &str {
        &self.line_number
    }

    fn is_flagged(&self) -> bool {
        self.flagged
    }

    fn flag_reason(&self) -> Option<&str> {
        self.flag_reason.as_deref()
    }

    fn value(&self, field: RevenueField) -> Option<Cow<'_, str>> {
        match field {
            RevenueField::PropertyName => Some(Cow::Borrowed(self.property_name.as_str())),
            RevenueField::PropertyNumber => self.property_number.as_deref().map(Cow::Borrowed),
            RevenueField::Product => Some(Cow::Borrowed(self.product.label())),
            RevenueField::SalesDate => self
                .sales_date
                .map(|d| Cow::Owned(d.format("%Y-%m-%d").to_string())),
            RevenueField::OwnerVolume => number(self.owner_volume),
            RevenueField::OwnerValue => number(self.owner_value),
            RevenueField::Taxes => number(self.taxes),
            RevenueField::Deductions => number(self.deductions),
            RevenueField::NetValue => number(self.net_value),
            RevenueField::InterestType => self.interest_type.as_deref().map(Cow::Borrowed),
            RevenueField::DecimalInterest => number(self.decimal_interest),
            RevenueField::CheckNumber => self.check_number.as_deref().map(Cow::Borrowed),
            RevenueField::Flagged => {
                Some(Cow::Borrowed(if self.flagged { "true" } else { "false" }))
            }
            RevenueField::FlagReason => self.flag_reason.as_deref().map(Cow::Borrowed),
        }
    }

    fn set(&mut self, field: RevenueField, v: &Value) -> Result<(), FieldError> {
        match field {
            RevenueField::PropertyName => self.property_name = value::text("property_name", v)?,
            RevenueField::PropertyNumber => {
                self.property_number = value::optional_text("property_number", v)?
            }
            RevenueField::Product => {
                self.product = v.as_str().and_then(Product::parse).ok_or(
                    FieldError::InvalidValue {
                        field: "product",
                        expected: "product",
                    },
                )?
            }
            RevenueField::SalesDate => self.sales_date = value::optional_date("sales_date", v)?,
            RevenueField::OwnerVolume => {
                self.owner_volume = value::optional_number("owner_volume", v)?
            }
            RevenueField::OwnerValue => {
                self.owner_value = value::optional_number("owner_value", v)?
            }
            RevenueField::Taxes => self.taxes = value::optional_number("taxes", v)?,
            RevenueField::Deductions => self.deductions = value::optional_number("deductions", v)?,
            RevenueField::NetValue => self.net_value = value::optional_number("net_value", v)?,
            RevenueField::InterestType => {
                self.interest_type = value::optional_text("interest_type", v)?
            }
            RevenueField::DecimalInterest => {
                self.decimal_interest = value::optional_number("decimal_interest", v)?
            }
            RevenueField::CheckNumber => {
                self.check_number = value::optional_text("check_number", v)?
            }
            RevenueField::Flagged => self.flagged = value::boolean("flagged", v)?,
            RevenueField::FlagReason => {
                self.flag_reason = value::optional_text("flag_reason", v)?
            }
        }
        Ok(())
    }

    fn predicates() -> Vec<Predicate<RevenueField>> {
        vec![
            Predicate::category(names::PRODUCTS, RevenueField::Product),
            Predicate::hide_flagged(names::HIDE_FLAGGED),
            Predicate::exact(names::SELECTED_PROPERTY, RevenueField::PropertyName),
        ]
    }

    fn default_filters() -> FilterState {
        FilterState::new()
            .with_flag(names::HIDE_FLAGGED, false)
            .with_choice(names::SELECTED_PROPERTY, None)
    }

    fn columns() -> ColumnConfig {
        ColumnConfig::new()
            .pinned("property_name", "Property")
            .hidden("property_number", "Property #")
            .shown("product", "Product")
            .shown("sales_date", "Sales Date")
            .hidden("owner_volume", "Volume")
            .shown("owner_value", "Owner Value")
            .shown("taxes", "Taxes")
            .shown("deductions", "Deductions")
            .pinned("net_value", "Net Value")
            .hidden("interest_type", "Interest Type")
            .hidden("decimal_interest", "Decimal Interest")
            .hidden("check_number", "Check #")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_codes() {
        assert_eq!(Product::parse("ngl"), Some(Product::Ngl));
        assert_eq!(Product::parse("02"), Some(Product::Gas));
        assert_eq!(Product::parse("sulfur"), None);
    }

    #[test]
    fn test_product_defaults_to_other() {
        assert_eq!(Product::default(), Product::Other);
        let line: RevenueLine =
            serde_json::from_value(json!({"line_number": "1", "property_name": "Smith 1-H"}))
                .unwrap();
        assert_eq!(line.product, Product::Other);
    }

    #[test]
    fn test_set_numeric_field() {
        let mut line = RevenueLine::new("3", "Smith 1-12H", Product::Oil);
        line.set(RevenueField::NetValue, &json!("$1,020.75")).unwrap();
        assert_eq!(line.net_value, Some(1020.75));

        let err = line.set(RevenueField::Taxes, &json!(true)).unwrap_err();
        assert!(matches!(err, FieldError::InvalidValue { field: "taxes", .. }));
        assert_eq!(line.taxes, None);
    }

    #[test]
    fn test_sales_date_round_trip() {
        let mut line = RevenueLine::new("3", "Smith 1-12H", Product::Gas);
        line.set(RevenueField::SalesDate, &json!("01/31/2025")).unwrap();
        let encoded = serde_json::to_value(&line).unwrap();
        assert_eq!(encoded["sales_date"], json!("2025-01-31"));
    }
}
