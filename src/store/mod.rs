//! Record store - persistent airline records with referential integrity

mod error;
mod models;
mod schema;
mod store;
pub mod validate;

pub use error::{StoreError, StoreResult};
pub use models::{
    Airport, Booking, EmployeeRole, Employee, EntityKind, Flight, FlightAssignment, FlightStatus,
    Meal, NewAirport, NewAssignment, NewBooking, NewEmployee, NewFlight, NewMeal, NewPassenger,
    NewService, Passenger, Service,
};
pub use store::RecordStore;
