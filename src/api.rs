use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{
    Account, Booking, BookingFilter, BookingRequest, CreateAccountParams, Permission, QuoteRequest,
    QuoteResponse, RateTable, RateTableUpdate, RegisterParams,
};
use crate::error::Error;

#[async_trait]
pub trait QuoteAPI {
    async fn create_quote(&self, user: User, request: QuoteRequest)
        -> Result<QuoteResponse, Error>;
}

#[async_trait]
pub trait SettingsAPI {
    async fn find_rates(&self, user: User) -> Result<RateTable, Error>;
    async fn update_rates(&self, user: User, update: RateTableUpdate) -> Result<RateTable, Error>;
}

#[async_trait]
pub trait BookingAPI {
    async fn create_booking(&self, user: User, request: BookingRequest) -> Result<Booking, Error>;
    async fn find_booking(&self, user: User, id: Uuid) -> Result<Booking, Error>;
    async fn list_bookings(&self, user: User, filter: BookingFilter)
        -> Result<Vec<Booking>, Error>;
    async fn accept_booking(&self, user: User, id: Uuid) -> Result<Booking, Error>;
    async fn collect_booking(&self, user: User, id: Uuid) -> Result<Booking, Error>;
    async fn deliver_booking(&self, user: User, id: Uuid) -> Result<Booking, Error>;
    async fn cancel_booking(
        &self,
        user: User,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Booking, Error>;
    async fn delete_booking(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait AccountAPI {
    async fn register_customer(&self, params: RegisterParams) -> Result<Account, Error>;
    async fn create_account(&self, user: User, params: CreateAccountParams)
        -> Result<Account, Error>;
    async fn find_account(&self, user: User, id: Uuid) -> Result<Account, Error>;
    async fn list_accounts(&self, user: User) -> Result<Vec<Account>, Error>;
    async fn update_account_permissions(
        &self,
        user: User,
        id: Uuid,
        permissions: Vec<Permission>,
    ) -> Result<Account, Error>;
    async fn delete_account(&self, user: User, id: Uuid) -> Result<(), Error>;
    async fn resolve_user(&self, id: Uuid) -> Result<User, Error>;
}

pub trait API: QuoteAPI + SettingsAPI + BookingAPI + AccountAPI {}
