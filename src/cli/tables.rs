//! Table rows for console output

use crate::analytics::{Chart, ChartEntry};
use crate::store::{
    Airport, Booking, Employee, EntityKind, Flight, FlightAssignment, Meal, Passenger, Service,
};
use tabled::Tabled;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

#[derive(Tabled)]
pub struct AirportRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Timezone")]
    timezone: String,
}

impl From<&Airport> for AirportRow {
    fn from(a: &Airport) -> Self {
        Self {
            code: a.code.clone(),
            name: a.name.clone(),
            city: a.city.clone(),
            country: a.country.clone(),
            timezone: a.timezone.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct EmployeeRow {
    #[tabled(rename = "ID")]
    employee_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Hired")]
    hired: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(e: &Employee) -> Self {
        Self {
            employee_id: e.employee_id.clone(),
            name: e.full_name(),
            role: e.role.to_string(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            hired: e.hire_date.format("%Y-%m-%d").to_string(),
            active: yes_no(e.is_active),
        }
    }
}

#[derive(Tabled)]
pub struct FlightRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Flight> for FlightRow {
    fn from(f: &Flight) -> Self {
        Self {
            number: f.flight_number.clone(),
            from: f.departure_code.clone(),
            to: f.arrival_code.clone(),
            departure: f.departure_time.format(TIME_FORMAT).to_string(),
            arrival: f.arrival_time.format(TIME_FORMAT).to_string(),
            aircraft: f.aircraft_type.clone(),
            status: f.status.to_string(),
            price: money(f.base_price),
        }
    }
}

#[derive(Tabled)]
pub struct AssignmentRow {
    #[tabled(rename = "Flight")]
    flight: String,
    #[tabled(rename = "Employee")]
    employee: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl From<&FlightAssignment> for AssignmentRow {
    fn from(a: &FlightAssignment) -> Self {
        Self {
            flight: a.flight_number.clone(),
            employee: a.employee_id.clone(),
            date: a.assignment_date.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct PassengerRow {
    #[tabled(rename = "Passport")]
    passport: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Points")]
    points: i64,
}

impl From<&Passenger> for PassengerRow {
    fn from(p: &Passenger) -> Self {
        Self {
            passport: p.passport_number.clone(),
            name: p.full_name(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            points: p.loyalty_points,
        }
    }
}

#[derive(Tabled)]
pub struct BookingRow {
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Flight")]
    flight: String,
    #[tabled(rename = "Passenger")]
    passenger: String,
    #[tabled(rename = "Seat")]
    seat: String,
    #[tabled(rename = "Meal")]
    meal: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            reference: b.booking_reference.clone(),
            flight: b.flight_number.clone(),
            passenger: b.passenger_name.clone(),
            seat: b.seat_number.clone(),
            meal: b.meal_preference.clone(),
            price: money(b.total_price),
        }
    }
}

#[derive(Tabled)]
pub struct MealRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Meal> for MealRow {
    fn from(m: &Meal) -> Self {
        Self {
            name: m.name.clone(),
            description: m.description.clone(),
            category: m.category.clone(),
            price: money(m.price),
            available: yes_no(m.is_available),
        }
    }
}

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Service> for ServiceRow {
    fn from(s: &Service) -> Self {
        Self {
            name: s.name.clone(),
            description: s.description.clone(),
            price: money(s.price),
            available: yes_no(s.is_available),
        }
    }
}

#[derive(Tabled)]
pub struct ChartRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

impl ChartRow {
    const BAR_WIDTH: f64 = 30.0;

    pub fn rows(chart: &Chart) -> Vec<ChartRow> {
        let max = chart
            .entries
            .iter()
            .map(|e| e.value)
            .fold(0.0_f64, f64::max);
        chart.entries.iter().map(|e| Self::from_entry(e, max)).collect()
    }

    fn from_entry(entry: &ChartEntry, max: f64) -> Self {
        let width = if max > 0.0 {
            (entry.value / max * Self::BAR_WIDTH).round() as usize
        } else {
            0
        };
        let value = if entry.value.fract() == 0.0 {
            format!("{}", entry.value as i64)
        } else {
            money(entry.value)
        };
        Self {
            label: entry.label.clone(),
            value,
            share: format!("{:.1}%", entry.share),
            bar: "█".repeat(width),
        }
    }
}

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Rows")]
    rows: usize,
}

impl CountRow {
    pub fn new(kind: EntityKind, rows: usize) -> Self {
        Self {
            table: kind.table().to_string(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ChartEntry;

    #[test]
    fn test_chart_rows_scale_bars() {
        let chart = Chart {
            title: "Flights".into(),
            value_label: "Flights".into(),
            entries: vec![
                ChartEntry {
                    label: "JFK-LAX".into(),
                    value: 4.0,
                    share: 80.0,
                },
                ChartEntry {
                    label: "LHR-DXB".into(),
                    value: 1.0,
                    share: 20.0,
                },
            ],
        };
        let rows = ChartRow::rows(&chart);
        assert_eq!(rows[0].bar.chars().count(), 30);
        assert_eq!(rows[1].bar.chars().count(), 8);
        assert_eq!(rows[0].value, "4");
        assert_eq!(rows[0].share, "80.0%");
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(450.0), "450.00");
        assert_eq!(money(15.5), "15.50");
    }
}
