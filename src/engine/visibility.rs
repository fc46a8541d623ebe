//! Pure record-scoping functions, recomputed on every read. The engine's
//! list operations fetch the full collections and narrow them here; no
//! result is ever cached.

use std::collections::HashSet;

use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Bid, Rental};

/// Admin: everything. Customer: own requests. Driver: assigned jobs.
pub fn visible_rentals(actor: &User, rentals: &[Rental]) -> Vec<Rental> {
    if actor.is_admin() {
        return rentals.to_vec();
    }

    rentals
        .iter()
        .filter(|rental| {
            rental.customer_id == actor.id || rental.driver_id == Some(actor.id)
        })
        .cloned()
        .collect()
}

/// The driver jobs feed: pending rentals the driver has not bid on. A bid
/// in any status hides the rental; a rejected driver does not see the job
/// again.
pub fn available_rentals(actor: &User, rentals: &[Rental], bids: &[Bid]) -> Vec<Rental> {
    let bid_on: HashSet<Uuid> = bids
        .iter()
        .filter(|bid| bid.driver_id == actor.id)
        .map(|bid| bid.rental_id)
        .collect();

    rentals
        .iter()
        .filter(|rental| rental.is_pending() && !bid_on.contains(&rental.id))
        .cloned()
        .collect()
}

/// Admin: everything. Driver: their own bids, any status. Customer: bids
/// reaching them through their own rentals.
pub fn visible_bids(actor: &User, rentals: &[Rental], bids: &[Bid]) -> Vec<Bid> {
    if actor.is_admin() {
        return bids.to_vec();
    }

    if actor.is_driver() {
        return bids
            .iter()
            .filter(|bid| bid.driver_id == actor.id)
            .cloned()
            .collect();
    }

    let owned: HashSet<Uuid> = rentals
        .iter()
        .filter(|rental| rental.customer_id == actor.id)
        .map(|rental| rental.id)
        .collect();

    bids.iter()
        .filter(|bid| owned.contains(&bid.rental_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    fn rental(customer_id: Uuid) -> Rental {
        Rental::new(customer_id, Uuid::new_v4(), "A".into(), "B".into())
    }

    fn bid(rental_id: Uuid, driver_id: Uuid) -> Bid {
        Bid::new(rental_id, driver_id, 50.0, "A".into()).unwrap()
    }

    #[test]
    fn customer_sees_only_own_rentals() {
        let customer = User::new(Uuid::new_v4(), Role::Customer);
        let mine = rental(customer.id);
        let theirs = rental(Uuid::new_v4());

        let visible = visible_rentals(&customer, &[mine.clone(), theirs]);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, mine.id);
    }

    #[test]
    fn assigned_driver_sees_their_rental() {
        let driver = User::new(Uuid::new_v4(), Role::Driver);

        let mut assigned = rental(Uuid::new_v4());
        assigned.assign_driver(driver.id).unwrap();
        let unrelated = rental(Uuid::new_v4());

        let visible = visible_rentals(&driver, &[assigned.clone(), unrelated]);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, assigned.id);
    }

    #[test]
    fn admin_sees_everything() {
        let admin = User::new(Uuid::new_v4(), Role::Admin);
        let rentals = [rental(Uuid::new_v4()), rental(Uuid::new_v4())];

        assert_eq!(visible_rentals(&admin, &rentals).len(), 2);
    }

    #[test]
    fn jobs_feed_excludes_bid_on_and_non_pending() {
        let driver = User::new(Uuid::new_v4(), Role::Driver);

        // r1: pending, no bid by the driver
        let r1 = rental(Uuid::new_v4());
        // r2: pending, the driver already bid
        let r2 = rental(Uuid::new_v4());
        // r3: ongoing
        let mut r3 = rental(Uuid::new_v4());
        r3.assign_driver(Uuid::new_v4()).unwrap();

        let bids = [
            bid(r2.id, driver.id),
            bid(r1.id, Uuid::new_v4()), // someone else's bid does not hide r1
        ];

        let feed = available_rentals(&driver, &[r1.clone(), r2, r3], &bids);

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, r1.id);
    }

    #[test]
    fn rejected_bid_still_hides_the_job() {
        let driver = User::new(Uuid::new_v4(), Role::Driver);
        let r = rental(Uuid::new_v4());

        let mut b = bid(r.id, driver.id);
        b.reject().unwrap();

        assert!(available_rentals(&driver, &[r], &[b]).is_empty());
    }

    #[test]
    fn driver_sees_own_bids_in_any_status() {
        let driver = User::new(Uuid::new_v4(), Role::Driver);
        let r = rental(Uuid::new_v4());

        let mut rejected = bid(r.id, driver.id);
        rejected.reject().unwrap();
        let pending = bid(r.id, driver.id);
        let someone_elses = bid(r.id, Uuid::new_v4());

        let visible = visible_bids(&driver, &[r], &[rejected, pending, someone_elses]);

        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|b| b.driver_id == driver.id));
    }

    #[test]
    fn customer_sees_bids_through_own_rentals_only() {
        let customer = User::new(Uuid::new_v4(), Role::Customer);

        let mine = rental(customer.id);
        let theirs = rental(Uuid::new_v4());

        let on_mine = bid(mine.id, Uuid::new_v4());
        let on_theirs = bid(theirs.id, Uuid::new_v4());

        let visible = visible_bids(&customer, &[mine, theirs], &[on_mine.clone(), on_theirs]);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, on_mine.id);
    }
}
