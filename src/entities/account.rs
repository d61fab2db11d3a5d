use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Account {
    #[polar(attribute)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Worker,
    Admin,
}

impl Role {
    pub fn name(&self) -> String {
        match self {
            Self::Customer => "customer".into(),
            Self::Worker => "worker".into(),
            Self::Admin => "admin".into(),
        }
    }
}

/// Grants held by worker accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageBookings,
    ManagePricing,
    ManageAccounts,
}

impl Permission {
    pub fn name(&self) -> String {
        match self {
            Self::ManageBookings => "manage_bookings".into(),
            Self::ManagePricing => "manage_pricing".into(),
            Self::ManageAccounts => "manage_accounts".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAccountParams {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Account {
    pub fn new(name: String, email: String, role: Role, permissions: Vec<Permission>) -> Self {
        let permissions = match role {
            Role::Worker => permissions,
            _ => vec![],
        };

        Self {
            id: Uuid::new_v4(),
            name: name.trim().into(),
            email: normalize_email(&email),
            role,
            permissions,
            created_at: Utc::now(),
        }
    }

    pub fn set_permissions(&mut self, permissions: Vec<Permission>) {
        if self.role == Role::Worker {
            self.permissions = permissions;
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[test]
fn only_workers_hold_permissions() {
    let worker = Account::new(
        "W".into(),
        "w@example.com".into(),
        Role::Worker,
        vec![Permission::ManageBookings],
    );
    assert_eq!(worker.permissions, vec![Permission::ManageBookings]);

    let mut customer = Account::new(
        "C".into(),
        "c@example.com".into(),
        Role::Customer,
        vec![Permission::ManagePricing],
    );
    assert!(customer.permissions.is_empty());

    customer.set_permissions(vec![Permission::ManageAccounts]);
    assert!(customer.permissions.is_empty());
}

#[test]
fn emails_are_normalized() {
    let account = Account::new(
        " Ada ".into(),
        " Ada@Example.COM ".into(),
        Role::Customer,
        vec![],
    );

    assert_eq!(account.name, "Ada");
    assert_eq!(account.email, "ada@example.com");
}
