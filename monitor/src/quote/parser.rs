//! Parser for the tilde-delimited quote line, e.g.
//!
//! `v_sh600000="1~浦发银行~600000~7.50~7.48~7.49~...";`
//!
//! Field 1 is the display name, field 3 the latest price and field 4 the
//! previous close.

use crate::quote::{Quote, QuoteError};

const NAME_FIELD: usize = 1;
const LATEST_FIELD: usize = 3;
const PREV_CLOSE_FIELD: usize = 4;
const MIN_FIELDS: usize = 5;

pub fn parse_quote_line(body: &str) -> Result<Quote, QuoteError> {
    let fields: Vec<&str> = body.split('~').collect();
    if fields.len() < MIN_FIELDS {
        return Err(QuoteError::Malformed(fields.len()));
    }

    Ok(Quote {
        display_name: fields[NAME_FIELD].trim().to_string(),
        latest_price: parse_price("latest price", fields[LATEST_FIELD])?,
        previous_close: parse_price("previous close", fields[PREV_CLOSE_FIELD])?,
    })
}

fn parse_price(field: &'static str, raw: &str) -> Result<f64, QuoteError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QuoteError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
