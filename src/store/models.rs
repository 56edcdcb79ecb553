//! Record types stored by the record store

use super::error::ParseEnumError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of record the store keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Airport,
    Employee,
    Flight,
    FlightAssignment,
    Passenger,
    Booking,
    Meal,
    Service,
}

impl EntityKind {
    /// Every kind, in the order rows must be deleted (dependents first)
    pub const DELETE_ORDER: [EntityKind; 8] = [
        EntityKind::Booking,
        EntityKind::FlightAssignment,
        EntityKind::Passenger,
        EntityKind::Flight,
        EntityKind::Employee,
        EntityKind::Airport,
        EntityKind::Meal,
        EntityKind::Service,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Airport => "airports",
            EntityKind::Employee => "employees",
            EntityKind::Flight => "flights",
            EntityKind::FlightAssignment => "flight_assignments",
            EntityKind::Passenger => "passengers",
            EntityKind::Booking => "bookings",
            EntityKind::Meal => "meals",
            EntityKind::Service => "services",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Airport => "airport",
            EntityKind::Employee => "employee",
            EntityKind::Flight => "flight",
            EntityKind::FlightAssignment => "flight assignment",
            EntityKind::Passenger => "passenger",
            EntityKind::Booking => "booking",
            EntityKind::Meal => "meal",
            EntityKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// What an employee does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Pilot,
    FlightAttendant,
    GroundStaff,
    Administrative,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Pilot => "pilot",
            EmployeeRole::FlightAttendant => "flight_attendant",
            EmployeeRole::GroundStaff => "ground_staff",
            EmployeeRole::Administrative => "administrative",
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical values plus the legacy display labels
/// ("Flight Attendant", "Aircraft Mechanic", "PILOT", ...).
impl FromStr for EmployeeRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "pilot" => Ok(EmployeeRole::Pilot),
            "flight_attendant" => Ok(EmployeeRole::FlightAttendant),
            "ground_staff" | "aircraft_mechanic" => Ok(EmployeeRole::GroundStaff),
            "administrative" => Ok(EmployeeRole::Administrative),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Lifecycle state of a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
    Completed,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
            FlightStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "scheduled" => Ok(FlightStatus::Scheduled),
            "delayed" => Ok(FlightStatus::Delayed),
            "cancelled" | "canceled" => Ok(FlightStatus::Cancelled),
            "completed" => Ok(FlightStatus::Completed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

macro_rules! sql_text_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

sql_text_enum!(EmployeeRole);
sql_text_enum!(FlightStatus);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Airport {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAirport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: EmployeeRole,
    pub email: String,
    pub phone: String,
    pub hire_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: EmployeeRole,
    pub email: String,
    pub phone: String,
    /// Defaults to the creation time
    pub hire_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// A flight, with both airports resolved to their codes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub departure_airport_id: i64,
    pub departure_code: String,
    pub arrival_airport_id: i64,
    pub arrival_code: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub aircraft_type: String,
    pub status: FlightStatus,
    pub base_price: f64,
}

impl Flight {
    /// Route label such as `JFK-LAX`
    pub fn route(&self) -> String {
        format!("{}-{}", self.departure_code, self.arrival_code)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFlight {
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub aircraft_type: String,
    /// Defaults to scheduled
    pub status: Option<FlightStatus>,
    pub base_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightAssignment {
    pub id: i64,
    pub flight_id: i64,
    pub flight_number: String,
    pub employee_row_id: i64,
    pub employee_id: String,
    pub assignment_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub flight_number: String,
    pub employee_id: String,
    /// Defaults to today (UTC)
    pub assignment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passenger {
    pub id: i64,
    pub passport_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub loyalty_points: i64,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPassenger {
    pub passport_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub loyalty_points: i64,
}

/// A booking, with flight and passenger resolved to their natural keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: i64,
    pub booking_reference: String,
    pub flight_id: i64,
    pub flight_number: String,
    pub passenger_id: i64,
    pub passport_number: String,
    pub passenger_name: String,
    pub booking_date: DateTime<Utc>,
    pub seat_number: String,
    pub meal_preference: String,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBooking {
    /// Generated (`BK` + 6 digits) when absent
    pub booking_reference: Option<String>,
    pub flight_number: String,
    pub passport_number: String,
    /// Defaults to the creation time
    pub booking_date: Option<DateTime<Utc>>,
    pub seat_number: String,
    pub meal_preference: String,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_accepts_legacy_labels() {
        assert_eq!("pilot".parse::<EmployeeRole>().unwrap(), EmployeeRole::Pilot);
        assert_eq!("PILOT".parse::<EmployeeRole>().unwrap(), EmployeeRole::Pilot);
        assert_eq!(
            "Flight Attendant".parse::<EmployeeRole>().unwrap(),
            EmployeeRole::FlightAttendant
        );
        assert_eq!(
            "FLIGHT_ATTENDANT".parse::<EmployeeRole>().unwrap(),
            EmployeeRole::FlightAttendant
        );
        assert_eq!(
            "Aircraft Mechanic".parse::<EmployeeRole>().unwrap(),
            EmployeeRole::GroundStaff
        );
        assert_eq!(
            " administrative ".parse::<EmployeeRole>().unwrap(),
            EmployeeRole::Administrative
        );
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "captain".parse::<EmployeeRole>().unwrap_err();
        assert_eq!(err.kind, "role");
        assert_eq!(err.value, "captain");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            FlightStatus::Scheduled,
            FlightStatus::Delayed,
            FlightStatus::Cancelled,
            FlightStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<FlightStatus>().unwrap(), status);
        }
        assert!("boarding".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_delete_order_covers_every_table() {
        let mut tables: Vec<_> = EntityKind::DELETE_ORDER.iter().map(|k| k.table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), 8);
    }

    #[test]
    fn test_flight_route_label() {
        let flight = Flight {
            id: 1,
            flight_number: "SK001-1".into(),
            departure_airport_id: 1,
            departure_code: "JFK".into(),
            arrival_airport_id: 2,
            arrival_code: "LAX".into(),
            departure_time: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            arrival_time: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            aircraft_type: "Boeing 737".into(),
            status: FlightStatus::Scheduled,
            base_price: 300.0,
        };
        assert_eq!(flight.route(), "JFK-LAX");
    }
}
