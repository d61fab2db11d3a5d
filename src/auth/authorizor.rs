use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::{Account, Booking};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class())?;
    o.register_class(User::get_polar_class())?;
    o.register_class(Booking::get_polar_class())?;
    o.register_class(Account::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[cfg(test)]
fn user(role: &str, permissions: &[&str]) -> User {
    use uuid::Uuid;

    User {
        id: Uuid::new_v4(),
        roles: vec![role.into()],
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

#[test]
fn customer_owns_booking_test() {
    use crate::entities::test_booking;

    let authorizor = new().unwrap();

    let customer = user("customer", &[]);
    let stranger = user("customer", &[]);
    let booking = test_booking(customer.id);

    for action in ["read", "cancel"] {
        let result = authorizor.is_allowed(customer.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), true);

        let result = authorizor.is_allowed(stranger.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), false);
    }

    for action in ["accept", "collect", "deliver", "delete"] {
        let result = authorizor.is_allowed(customer.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), false);
    }
}

#[test]
fn worker_booking_permission_test() {
    use crate::entities::test_booking;

    let authorizor = new().unwrap();

    let booking = test_booking(uuid::Uuid::new_v4());
    let dispatcher = user("worker", &["manage_bookings"]);
    let pricer = user("worker", &["manage_pricing"]);

    for action in ["read", "accept", "collect", "deliver", "cancel"] {
        let result = authorizor.is_allowed(dispatcher.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), true);

        let result = authorizor.is_allowed(pricer.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), false);
    }

    let result = authorizor.is_allowed(dispatcher.clone(), "delete", booking.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(dispatcher, "list_all_bookings", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(pricer.clone(), "update_rates", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(pricer, "list_all_bookings", Platform::default());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn admin_role_test() {
    use crate::entities::test_booking;

    let authorizor = new().unwrap();

    let admin = user("admin", &[]);
    let booking = test_booking(uuid::Uuid::new_v4());

    for action in ["read", "accept", "cancel", "delete"] {
        let result = authorizor.is_allowed(admin.clone(), action, booking.clone());
        assert_eq!(result.unwrap(), true);
    }

    for action in ["update_rates", "manage_accounts", "manage_admins", "list_all_bookings"] {
        let result = authorizor.is_allowed(admin.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }
}

#[test]
fn platform_actions_for_customers_test() {
    let authorizor = new().unwrap();

    let customer = user("customer", &[]);

    for action in ["quote", "create_booking", "read_rates"] {
        let result = authorizor.is_allowed(customer.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }

    for action in ["update_rates", "manage_accounts", "manage_admins", "list_all_bookings"] {
        let result = authorizor.is_allowed(customer.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), false);
    }
}

#[test]
fn account_access_test() {
    use crate::entities::{Account, Role};

    let authorizor = new().unwrap();

    let account = Account::new("A".into(), "a@example.com".into(), Role::Customer, vec![]);
    let owner = User::from(&account);
    let other = user("customer", &[]);
    let manager = user("worker", &["manage_accounts"]);

    let result = authorizor.is_allowed(owner.clone(), "read", account.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner, "delete", account.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(other, "read", account.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(manager.clone(), "delete", account);
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(manager, "manage_admins", Platform::default());
    assert_eq!(result.unwrap(), false);
}
