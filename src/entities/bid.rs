use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A driver's competing offer on a pending rental. Accepted and rejected
/// are terminal; a bid never leaves either state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub status: Status,
    pub rental_id: Uuid,
    pub driver_id: Uuid,
    pub amount: f64,
    pub driver_location: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Accepted => "accepted".into(),
            Self::Rejected => "rejected".into(),
        }
    }
}

impl Bid {
    pub fn new(
        rental_id: Uuid,
        driver_id: Uuid,
        amount: f64,
        driver_location: String,
    ) -> Result<Self, Error> {
        if !(amount > 0.0) {
            return Err(Error::validation("bid amount must be positive"));
        }

        if driver_location.trim().is_empty() {
            return Err(Error::validation("driver location is required"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            status: Status::Pending,
            rental_id,
            driver_id,
            amount,
            driver_location,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    #[tracing::instrument]
    pub fn accept(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Accepted;
                Ok(())
            }
            _ => Err(Error::conflict("bid is already resolved")),
        }
    }

    #[tracing::instrument]
    pub fn reject(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Rejected;
                Ok(())
            }
            _ => Err(Error::conflict("bid is already resolved")),
        }
    }
}

impl PolarClass for Bid {
    fn get_polar_class_builder() -> oso::ClassBuilder<Bid> {
        oso::Class::builder()
            .name("Bid")
            .add_attribute_getter("id", |recv: &Bid| recv.id.clone())
            .add_attribute_getter("rental_id", |recv: &Bid| recv.rental_id.clone())
            .add_attribute_getter("driver_id", |recv: &Bid| recv.driver_id.clone())
            .add_attribute_getter("status", |recv: &Bid| recv.status.name())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Bid::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(amount: f64) -> Result<Bid, Error> {
        Bid::new(Uuid::new_v4(), Uuid::new_v4(), amount, "Dhanmondi".into())
    }

    #[test]
    fn created_pending() {
        let bid = bid(50.0).unwrap();
        assert_eq!(bid.status, Status::Pending);
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(matches!(bid(0.0), Err(Error::Validation(_))));
        assert!(matches!(bid(-10.0), Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_blank_location() {
        let err = Bid::new(Uuid::new_v4(), Uuid::new_v4(), 50.0, "  ".into()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn accepted_is_terminal() {
        let mut bid = bid(50.0).unwrap();

        bid.accept().unwrap();
        assert_eq!(bid.status, Status::Accepted);

        assert!(matches!(bid.accept(), Err(Error::Conflict(_))));
        assert!(matches!(bid.reject(), Err(Error::Conflict(_))));
        assert_eq!(bid.status, Status::Accepted);
    }

    #[test]
    fn rejected_is_terminal() {
        let mut bid = bid(50.0).unwrap();

        bid.reject().unwrap();
        assert_eq!(bid.status, Status::Rejected);

        assert!(matches!(bid.reject(), Err(Error::Conflict(_))));
        assert!(matches!(bid.accept(), Err(Error::Conflict(_))));
        assert_eq!(bid.status, Status::Rejected);
    }
}
