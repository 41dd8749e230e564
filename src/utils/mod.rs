//! Shared helpers

pub mod dates;

pub use dates::{
    display_stored_date, format_date, format_display_date, now_timestamp, parse_date,
    parse_date_input, parse_display_date, today,
};
