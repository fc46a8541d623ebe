use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A rentable asset. Cars live independently of rentals; deleting or
/// renting a car never touches rental history.
#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Car {
    #[polar(attribute)]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub image: String,
    pub fuel_type: FuelType,
    pub passenger_capacity: u32,
    pub color: String,
    pub condition: Condition,
    pub rating: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Octane,
    Hybrid,
    Electric,
    Diesel,
    Petrol,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    New,
    Used,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarDetails {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub image: String,
    pub fuel_type: FuelType,
    pub passenger_capacity: u32,
    pub color: String,
    pub condition: Condition,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CarPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub image: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub passenger_capacity: Option<u32>,
    pub color: Option<String>,
    pub condition: Option<Condition>,
    pub rating: Option<f64>,
}

impl Car {
    pub fn new(details: CarDetails) -> Result<Self, Error> {
        if details.name.trim().is_empty() {
            return Err(Error::validation("car name is required"));
        }

        if details.passenger_capacity == 0 {
            return Err(Error::validation("passenger capacity must be positive"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: details.name,
            brand: details.brand,
            model: details.model,
            image: details.image,
            fuel_type: details.fuel_type,
            passenger_capacity: details.passenger_capacity,
            color: details.color,
            condition: details.condition,
            rating: None,
        })
    }

    pub fn apply(&mut self, patch: CarPatch) -> Result<(), Error> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(Error::validation("car name is required"));
            }
            self.name = name;
        }

        if let Some(capacity) = patch.passenger_capacity {
            if capacity == 0 {
                return Err(Error::validation("passenger capacity must be positive"));
            }
            self.passenger_capacity = capacity;
        }

        if let Some(brand) = patch.brand {
            self.brand = brand;
        }

        if let Some(model) = patch.model {
            self.model = model;
        }

        if let Some(image) = patch.image {
            self.image = image;
        }

        if let Some(fuel_type) = patch.fuel_type {
            self.fuel_type = fuel_type;
        }

        if let Some(color) = patch.color {
            self.color = color;
        }

        if let Some(condition) = patch.condition {
            self.condition = condition;
        }

        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CarDetails {
        CarDetails {
            name: "City Runner".into(),
            brand: "Toyota".into(),
            model: "Axio".into(),
            image: "https://example.com/axio.jpg".into(),
            fuel_type: FuelType::Hybrid,
            passenger_capacity: 4,
            color: "white".into(),
            condition: Condition::Used,
        }
    }

    #[test]
    fn new_car_has_no_rating() {
        let car = Car::new(details()).unwrap();
        assert!(car.rating.is_none());
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut d = details();
        d.passenger_capacity = 0;

        assert!(matches!(Car::new(d), Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_blank_name() {
        let mut d = details();
        d.name = " ".into();

        assert!(matches!(Car::new(d), Err(Error::Validation(_))));
    }

    #[test]
    fn apply_patches_selected_fields() {
        let mut car = Car::new(details()).unwrap();

        car.apply(CarPatch {
            color: Some("black".into()),
            rating: Some(4.5),
            ..CarPatch::default()
        })
        .unwrap();

        assert_eq!(car.color, "black");
        assert_eq!(car.rating, Some(4.5));
        assert_eq!(car.brand, "Toyota");
    }

    #[test]
    fn apply_rejects_zero_capacity() {
        let mut car = Car::new(details()).unwrap();

        let err = car
            .apply(CarPatch {
                passenger_capacity: Some(0),
                ..CarPatch::default()
            })
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }
}
