use rust_decimal::Decimal;

use super::GoodsType;
use crate::options::OptionValue;

/// One line of an order, sent inside `orderLines`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Line description shown on the invoice.
    pub description: String,
    /// Merchant's item number.
    pub item_id: String,
    /// Number of units.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate in percent.
    pub tax_percent: Option<Decimal>,
    /// Tax amount for the whole line.
    pub tax_amount: Option<Decimal>,
    /// Unit of measure, e.g. `kg`.
    pub unit_code: Option<String>,
    /// Discount in percent.
    pub discount: Option<Decimal>,
    /// Line category.
    pub goods_type: Option<GoodsType>,
    /// Product image link.
    pub image_url: Option<String>,
    /// Product page link.
    pub product_url: Option<String>,
}

impl OrderLine {
    /// Creates a line with the mandatory fields set.
    pub fn new(
        description: impl Into<String>,
        item_id: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            item_id: item_id.into(),
            quantity,
            unit_price,
            tax_percent: None,
            tax_amount: None,
            unit_code: None,
            discount: None,
            goods_type: None,
            image_url: None,
            product_url: None,
        }
    }

    /// Sets the line category.
    #[must_use]
    pub fn with_goods_type(mut self, goods_type: GoodsType) -> Self {
        self.goods_type = Some(goods_type);
        self
    }

    /// Sets the tax rate.
    #[must_use]
    pub fn with_tax_percent(mut self, tax_percent: Decimal) -> Self {
        self.tax_percent = Some(tax_percent);
        self
    }

    /// Flattens into the map the gateway expects.
    #[must_use]
    pub fn to_option_value(&self) -> OptionValue {
        OptionValue::map_from([
            ("description", Some(OptionValue::from(self.description.clone()))),
            ("itemId", Some(OptionValue::from(self.item_id.clone()))),
            ("quantity", Some(OptionValue::Decimal(self.quantity))),
            ("unitPrice", Some(OptionValue::Decimal(self.unit_price))),
            ("taxPercent", self.tax_percent.map(OptionValue::Decimal)),
            ("taxAmount", self.tax_amount.map(OptionValue::Decimal)),
            ("unitCode", self.unit_code.clone().map(OptionValue::from)),
            ("discount", self.discount.map(OptionValue::Decimal)),
            ("goodsType", self.goods_type.map(OptionValue::from)),
            ("imageUrl", self.image_url.clone().map(OptionValue::from)),
            ("productUrl", self.product_url.clone().map(OptionValue::from)),
        ])
    }

    /// Converts a slice of lines to the `orderLines` list value.
    #[must_use]
    pub fn list(lines: &[Self]) -> OptionValue {
        OptionValue::List(lines.iter().map(Self::to_option_value).collect())
    }
}
