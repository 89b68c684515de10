use serde::{Deserialize, Serialize};

/// Regional conventions for parsing and displaying values.
///
/// The default follows pt-BR spreadsheets: `1.234,56`, `15/01/2024`, `SIM`/`NÃO`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    /// Decimal separator (default: ',')
    pub decimal_separator: char,
    /// Thousands separator (default: '.')
    pub thousands_separator: char,
    /// Read `01/02/2024` as 1 February (default: true)
    pub day_first: bool,
    /// Display token for `true`
    pub yes: String,
    /// Display token for `false`
    pub no: String,
}

impl Default for Locale {
    fn default() -> Self {
        Locale {
            decimal_separator: ',',
            thousands_separator: '.',
            day_first: true,
            yes: "SIM".to_string(),
            no: "NÃO".to_string(),
        }
    }
}

impl Locale {
    /// `1,234.56`, month-first dates, `Yes`/`No`.
    #[must_use]
    pub fn en_us() -> Self {
        Locale {
            decimal_separator: '.',
            thousands_separator: ',',
            day_first: false,
            yes: "Yes".to_string(),
            no: "No".to_string(),
        }
    }

    /// Set the decimal and thousands separators
    #[must_use]
    pub fn with_separators(mut self, decimal: char, thousands: char) -> Self {
        self.decimal_separator = decimal;
        self.thousands_separator = thousands;
        self
    }

    /// Set the date order
    #[must_use]
    pub fn with_day_first(mut self, day_first: bool) -> Self {
        self.day_first = day_first;
        self
    }
}
