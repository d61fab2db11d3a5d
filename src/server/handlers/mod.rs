pub mod accounts;
pub mod bookings;
pub mod quotes;
pub mod settings;
