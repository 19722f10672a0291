/// Dataset names used on the CLI and in reports.
/// These match the tables the cleaned batches are loaded into downstream.
pub const USER_DATASET: &str = "user";
pub const CARD_DATASET: &str = "card";
pub const STORE_DATASET: &str = "store";
pub const PRODUCT_DATASET: &str = "product";
pub const ORDERS_DATASET: &str = "orders";
pub const EVENTS_DATASET: &str = "events";

// Column names expected from the record sources
pub const JOIN_DATE: &str = "join_date";
pub const DATE_OF_BIRTH: &str = "date_of_birth";
pub const CARD_NUMBER: &str = "card_number";
pub const CARD_PROVIDER: &str = "card_provider";
pub const DATE_PAYMENT_CONFIRMED: &str = "date_payment_confirmed";
pub const CONTINENT: &str = "continent";
pub const OPENING_DATE: &str = "opening_date";
pub const STAFF_NUMBERS: &str = "staff_numbers";
pub const ADDRESS: &str = "address";
pub const WEIGHT: &str = "weight";
pub const DATE_ADDED: &str = "date_added";
pub const REMOVED: &str = "removed";
pub const TIME_PERIOD: &str = "time_period";

/// String that sources use in place of a real null
pub const NULL_MARKER: &str = "NULL";

/// An immutable set of accepted values for one categorical column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl Vocabulary {
    /// Exact, case-sensitive membership
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| *v == value)
    }
}

pub const CARD_PROVIDERS: Vocabulary = Vocabulary {
    name: "card_provider",
    values: &[
        "VISA 16 digit",
        "JCB 16 digit",
        "VISA 13 digit",
        "JCB 15 digit",
        "VISA 19 digit",
        "Diners Club / Carte Blanche",
        "American Express",
        "Maestro",
        "Discover",
        "Mastercard",
    ],
};

pub const CONTINENTS: Vocabulary = Vocabulary {
    name: "continent",
    values: &["Europe", "America"],
};

pub const TIME_PERIODS: Vocabulary = Vocabulary {
    name: "time_period",
    values: &["Evening", "Midday", "Morning", "Late_Hours", "NULL"],
};

/// Get all supported dataset names
pub fn get_supported_datasets() -> Vec<&'static str> {
    vec![
        USER_DATASET,
        CARD_DATASET,
        STORE_DATASET,
        PRODUCT_DATASET,
        ORDERS_DATASET,
        EVENTS_DATASET,
    ]
}
