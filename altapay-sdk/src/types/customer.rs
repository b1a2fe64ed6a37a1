use chrono::NaiveDate;

use crate::options::OptionValue;

/// A postal address, sent as `billing_*` or `shipping_*` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerAddress {
    /// First name.
    pub firstname: Option<String>,
    /// Last name.
    pub lastname: Option<String>,
    /// Street and number.
    pub address: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Region or state.
    pub region: Option<String>,
    /// ISO 3166 country code.
    pub country: Option<String>,
}

impl CustomerAddress {
    fn pairs(&self, prefix: &str) -> Vec<(String, Option<OptionValue>)> {
        [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("address", &self.address),
            ("postal", &self.postal_code),
            ("city", &self.city),
            ("region", &self.region),
            ("country", &self.country),
        ]
        .into_iter()
        .map(|(name, value)| (format!("{prefix}_{name}"), value.clone().map(OptionValue::from)))
        .collect()
    }
}

/// Customer details passed as `customer_info`.
///
/// Unset fields are left out of the request.
///
/// # Examples
///
/// ```
/// use altapay_sdk::{options::OptionValue, types::CustomerInfo};
///
/// let info = CustomerInfo { email: Some("buyer@example.com".to_owned()), ..Default::default() };
/// let OptionValue::Map(pairs) = info.to_option_value() else { unreachable!() };
/// assert_eq!(pairs[0].0, "email");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    /// Email address.
    pub email: Option<String>,
    /// Customer's user name in the shop.
    pub username: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Name of the customer's bank.
    pub bank_name: Option<String>,
    /// Phone number of the customer's bank.
    pub bank_phone: Option<String>,
    /// Date of birth.
    pub birthdate: Option<NaiveDate>,
    /// Gender, `M` or `F`.
    pub gender: Option<String>,
    /// Company registration number for business customers.
    pub organisation_number: Option<String>,
    /// Billing address.
    pub billing: Option<CustomerAddress>,
    /// Shipping address.
    pub shipping: Option<CustomerAddress>,
}

impl CustomerInfo {
    /// Flattens into the map the gateway expects.
    #[must_use]
    pub fn to_option_value(&self) -> OptionValue {
        let text = |value: &Option<String>| value.clone().map(OptionValue::from);
        let mut pairs = vec![
            ("email".to_owned(), text(&self.email)),
            ("username".to_owned(), text(&self.username)),
            ("customer_phone".to_owned(), text(&self.phone)),
            ("bank_name".to_owned(), text(&self.bank_name)),
            ("bank_phone".to_owned(), text(&self.bank_phone)),
            (
                "birthdate".to_owned(),
                self.birthdate.map(|date| OptionValue::from(date.format("%Y-%m-%d").to_string())),
            ),
            ("gender".to_owned(), text(&self.gender)),
            ("organisationNumber".to_owned(), text(&self.organisation_number)),
        ];
        if let Some(billing) = &self.billing {
            pairs.extend(billing.pairs("billing"));
        }
        if let Some(shipping) = &self.shipping {
            pairs.extend(shipping.pairs("shipping"));
        }
        OptionValue::map_from(pairs)
    }
}

impl From<&CustomerInfo> for OptionValue {
    fn from(value: &CustomerInfo) -> Self {
        value.to_option_value()
    }
}
