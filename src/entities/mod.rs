mod account;
mod bid;
mod car;
mod rental;

pub use account::{Account, AccountPatch, Role};
pub use bid::{Bid, Status as BidStatus};
pub use car::{Car, CarDetails, CarPatch, Condition, FuelType};
pub use rental::{Rental, Status as RentalStatus};
