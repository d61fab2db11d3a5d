use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Account;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl User {
    fn id_equals(&self, id: Uuid) -> bool {
        self.id == id
    }

    fn has_role(&self, role: String) -> bool {
        self.roles.iter().any(|x| x == &role)
    }

    fn has_permission(&self, permission: String) -> bool {
        self.permissions.iter().any(|x| x == &permission)
    }
}

impl From<&Account> for User {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            roles: vec![account.role.name()],
            permissions: account.permissions.iter().map(|p| p.name()).collect(),
        }
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id)
            .add_attribute_getter("roles", |recv: &User| recv.roles.clone())
            .add_method("id_equals", User::id_equals)
            .add_method("has_role", User::has_role)
            .add_method("has_permission", User::has_permission)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}

#[test]
fn user_from_worker_account() {
    use crate::entities::{Permission, Role};

    let account = Account::new(
        "Sam".into(),
        "sam@example.com".into(),
        Role::Worker,
        vec![Permission::ManagePricing],
    );
    let user = User::from(&account);

    assert_eq!(user.id, account.id);
    assert!(user.has_role("worker".into()));
    assert!(!user.has_role("admin".into()));
    assert!(user.has_permission("manage_pricing".into()));
    assert!(!user.has_permission("manage_bookings".into()));
}
