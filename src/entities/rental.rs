use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A customer's request to be driven from `starting_point` to `destination`
/// in a specific car. `driver_id` is set exactly once, when a bid is
/// accepted and the rental leaves `Pending`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rental {
    pub id: Uuid,
    pub status: Status,
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub starting_point: String,
    pub destination: String,
    pub driver_id: Option<Uuid>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Ongoing,
    Completed,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Ongoing => "ongoing".into(),
            Self::Completed => "completed".into(),
        }
    }
}

impl Rental {
    pub fn new(customer_id: Uuid, car_id: Uuid, starting_point: String, destination: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: Status::Pending,
            customer_id,
            car_id,
            starting_point,
            destination,
            driver_id: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Pending -> Ongoing, caused by accepting exactly one bid.
    #[tracing::instrument]
    pub fn assign_driver(&mut self, driver_id: Uuid) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Ongoing;
                self.driver_id = Some(driver_id);
                Ok(())
            }
            _ => Err(Error::conflict("rental already has an accepted bid")),
        }
    }

    /// Ongoing -> Completed, the only terminal transition on the normal path.
    #[tracing::instrument]
    pub fn complete(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Ongoing => {
                self.status = Status::Completed;
                Ok(())
            }
            _ => Err(Error::conflict("rental is not ongoing")),
        }
    }

    /// Admin escape hatch; bypasses the transition preconditions.
    #[tracing::instrument]
    pub fn force_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl PolarClass for Rental {
    fn get_polar_class_builder() -> oso::ClassBuilder<Rental> {
        oso::Class::builder()
            .name("Rental")
            .add_attribute_getter("id", |recv: &Rental| recv.id.clone())
            .add_attribute_getter("customer_id", |recv: &Rental| recv.customer_id.clone())
            .add_attribute_getter("driver_id", |recv: &Rental| recv.driver_id.clone())
            .add_attribute_getter("status", |recv: &Rental| recv.status.name())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Rental::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rental() -> Rental {
        Rental::new(Uuid::new_v4(), Uuid::new_v4(), "A".into(), "B".into())
    }

    #[test]
    fn created_pending_without_driver() {
        let rental = rental();

        assert_eq!(rental.status, Status::Pending);
        assert!(rental.driver_id.is_none());
    }

    #[test]
    fn assign_driver_moves_to_ongoing() {
        let mut rental = rental();
        let driver_id = Uuid::new_v4();

        rental.assign_driver(driver_id).unwrap();

        assert_eq!(rental.status, Status::Ongoing);
        assert_eq!(rental.driver_id, Some(driver_id));
    }

    #[test]
    fn assign_driver_twice_conflicts() {
        let mut rental = rental();

        rental.assign_driver(Uuid::new_v4()).unwrap();
        let err = rental.assign_driver(Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn complete_requires_ongoing() {
        let mut rental = rental();

        assert!(matches!(rental.complete(), Err(Error::Conflict(_))));

        rental.assign_driver(Uuid::new_v4()).unwrap();
        rental.complete().unwrap();

        assert_eq!(rental.status, Status::Completed);
        assert!(matches!(rental.complete(), Err(Error::Conflict(_))));
    }

    #[test]
    fn force_status_bypasses_preconditions() {
        let mut rental = rental();

        rental.force_status(Status::Completed);
        assert_eq!(rental.status, Status::Completed);

        rental.force_status(Status::Pending);
        assert_eq!(rental.status, Status::Pending);
    }
}
