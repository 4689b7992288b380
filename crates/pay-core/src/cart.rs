//! # Cart Types
//!
//! The demo cart shown on the checkout page.
//! Built in at startup, or loaded from `config/cart.toml`; never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    JPY,
    CHF,
}

impl Currency {
    /// Returns the ISO 4217 currency code, as Adyen expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Convert from minor units back to decimal
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF ",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price with amount in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (cents for EUR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Format for display (e.g., "€59.99")
    pub fn display(&self) -> String {
        if self.currency.decimal_places() == 0 {
            format!("{}{}", self.currency.symbol(), self.amount)
        } else {
            format!(
                "{}{:.2}",
                self.currency.symbol(),
                self.currency.from_minor_units(self.amount)
            )
        }
    }
}

/// A line in the demo cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Unit price in minor units
    pub price_cents: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents,
            quantity,
        }
    }

    /// Unit price × quantity, in minor units
    pub fn total_cents(&self) -> i64 {
        self.price_cents * self.quantity as i64
    }
}

/// Fixed cart presented at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub currency: Currency,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// The two-item demo cart
    pub fn demo() -> Self {
        Self {
            currency: Currency::EUR,
            items: vec![
                CartItem::new("1", "Wireless Headphones", 5999, 1),
                CartItem::new("2", "USB-C Hub", 3499, 1),
            ],
        }
    }

    /// Sum of unit price × quantity over all items
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(CartItem::total_cents).sum()
    }

    pub fn total(&self) -> Price {
        Price::from_cents(self.total_cents(), self.currency)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load a cart from TOML (`currency = "EUR"` plus `[[items]]` tables)
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::demo()
    }
}
