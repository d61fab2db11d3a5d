mod account;
mod address;
mod booking;
mod distance;
mod quote;
mod rates;
mod vehicle;

pub use account::{
    normalize_email, Account, CreateAccountParams, Permission, RegisterParams, Role,
};
pub use address::Address;
pub use booking::{Booking, BookingFilter, BookingRequest, Status as BookingStatus};
pub use distance::DistanceOutcome;
pub use quote::{PriceQuote, QuoteRequest, QuoteResponse};
pub use rates::{RateTable, RateTableUpdate};
pub use vehicle::Vehicle;

#[cfg(test)]
pub(crate) use booking::test_booking;
