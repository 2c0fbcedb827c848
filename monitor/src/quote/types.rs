use std::fmt;

use crate::quote::QuoteError;

/// Exchange a code is routed to on the quote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Shanghai,
    Shenzhen,
}

impl Market {
    pub fn prefix(self) -> &'static str {
        match self {
            Market::Shanghai => "sh",
            Market::Shenzhen => "sz",
        }
    }
}

/// Tradable instrument identifier, e.g. `600519`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentCode(String);

impl InstrumentCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Codes with a leading `6` trade in Shanghai; everything else in Shenzhen.
    pub fn market(&self) -> Market {
        if self.0.starts_with('6') {
            Market::Shanghai
        } else {
            Market::Shenzhen
        }
    }

    /// Symbol as the quote endpoint expects it, e.g. `sh600519`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.market().prefix(), self.0)
    }
}

impl fmt::Display for InstrumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered pair of instruments; the spread is always `a - b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    pub a: InstrumentCode,
    pub b: InstrumentCode,
}

impl Pair {
    pub fn new(a: InstrumentCode, b: InstrumentCode) -> Self {
        Self { a, b }
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.a, self.b)
    }
}

/// Latest quote for one instrument. Fetched fresh every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub display_name: String,
    pub latest_price: f64,
    pub previous_close: f64,
}

impl Quote {
    /// Same-day change relative to the previous close.
    ///
    /// Undefined, and therefore an error, when the previous close is zero.
    pub fn change_ratio(&self) -> Result<f64, QuoteError> {
        if self.previous_close == 0.0 {
            return Err(QuoteError::ZeroPreviousClose);
        }
        Ok((self.latest_price - self.previous_close) / self.previous_close)
    }
}
