use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::{Account, Bid, Car, Rental};

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class()).unwrap();
    o.register_class(User::get_polar_class()).unwrap();
    o.register_class(Account::get_polar_class()).unwrap();
    o.register_class(Car::get_polar_class()).unwrap();
    o.register_class(Rental::get_polar_class()).unwrap();
    o.register_class(Bid::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[cfg(test)]
fn user_with_role(role: &str) -> User {
    use uuid::Uuid;

    User {
        id: Uuid::new_v4(),
        roles: vec![role.into()],
    }
}

#[test]
fn admin_blanket_rule_test() {
    use crate::entities::Rental;
    use uuid::Uuid;

    let authorizor = new();
    let admin = user_with_role("admin");

    let rental = Rental::new(Uuid::new_v4(), Uuid::new_v4(), "A".into(), "B".into());

    let result = authorizor.is_allowed(admin.clone(), "delete", rental.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(admin.clone(), "override_status", rental.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(admin.clone(), "create_car", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(admin.clone(), "list_accounts", Platform::default());
    assert_eq!(result.unwrap(), true);
}

#[test]
fn customer_rental_ownership_test() {
    use crate::entities::Rental;
    use uuid::Uuid;

    let authorizor = new();
    let customer = user_with_role("customer");
    let stranger = user_with_role("customer");

    let rental = Rental::new(customer.id, Uuid::new_v4(), "A".into(), "B".into());

    for action in ["read", "accept_bid", "reject_bid", "read_bids", "delete"] {
        let result = authorizor.is_allowed(customer.clone(), action, rental.clone());
        assert_eq!(result.unwrap(), true, "owner denied {}", action);

        let result = authorizor.is_allowed(stranger.clone(), action, rental.clone());
        assert_eq!(result.unwrap(), false, "stranger allowed {}", action);
    }

    let result = authorizor.is_allowed(customer.clone(), "override_status", rental.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn driver_rental_visibility_test() {
    use crate::entities::Rental;
    use uuid::Uuid;

    let authorizor = new();
    let driver = user_with_role("driver");
    let other_driver = user_with_role("driver");

    let mut rental = Rental::new(Uuid::new_v4(), Uuid::new_v4(), "A".into(), "B".into());

    // any driver may read a pending rental
    let result = authorizor.is_allowed(driver.clone(), "read", rental.clone());
    assert_eq!(result.unwrap(), true);

    rental.assign_driver(driver.id).unwrap();

    // once ongoing, only the assigned driver keeps read access
    let result = authorizor.is_allowed(driver.clone(), "read", rental.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(other_driver.clone(), "read", rental.clone());
    assert_eq!(result.unwrap(), false);

    // drivers never control the rental itself
    let result = authorizor.is_allowed(driver.clone(), "accept_bid", rental.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "delete", rental.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn bid_ownership_test() {
    use crate::entities::Bid;
    use uuid::Uuid;

    let authorizor = new();
    let driver = user_with_role("driver");
    let other_driver = user_with_role("driver");
    let customer = user_with_role("customer");

    let bid = Bid::new(Uuid::new_v4(), driver.id, 50.0, "Banani".into()).unwrap();

    let result = authorizor.is_allowed(driver.clone(), "read", bid.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(other_driver.clone(), "read", bid.clone());
    assert_eq!(result.unwrap(), false);

    // non-admins cannot delete bids
    let result = authorizor.is_allowed(driver.clone(), "delete", bid.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(customer.clone(), "delete", bid.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn platform_role_gates_test() {
    let authorizor = new();
    let customer = user_with_role("customer");
    let driver = user_with_role("driver");

    let result = authorizor.is_allowed(customer.clone(), "create_rental", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(driver.clone(), "create_rental", Platform::default());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "create_bid", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(customer.clone(), "create_bid", Platform::default());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "list_available", Platform::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(customer.clone(), "list_available", Platform::default());
    assert_eq!(result.unwrap(), false);

    // record writes with no rule fall through to admin only
    let result = authorizor.is_allowed(customer.clone(), "create_car", Platform::default());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(driver.clone(), "list_accounts", Platform::default());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn account_self_service_test() {
    use crate::entities::{Account, Role};

    let authorizor = new();

    let account =
        Account::new("Anika".into(), "anika@example.com".into(), Role::Customer).unwrap();
    let me = User::new(account.id, Role::Customer);
    let someone_else = user_with_role("customer");

    let result = authorizor.is_allowed(me.clone(), "read", account.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(me.clone(), "update", account.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(someone_else.clone(), "read", account.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(me.clone(), "delete", account.clone());
    assert_eq!(result.unwrap(), false);
}
