//! Aggregate views over stored records
//!
//! Each chart is one pass over a record list into an ordered map.

use crate::store::{Booking, Employee, EmployeeRole, Flight};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One bar (or slice) of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub label: String,
    pub value: f64,
    /// Share of the chart total, 0-100
    pub share: f64,
}

/// A labelled series ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub value_label: String,
    pub entries: Vec<ChartEntry>,
}

impl Chart {
    fn from_values<K: ToString>(
        title: &str,
        value_label: &str,
        values: impl IntoIterator<Item = (K, f64)>,
    ) -> Self {
        let values: Vec<(String, f64)> = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let total: f64 = values.iter().map(|(_, v)| v).sum();

        let entries = values
            .into_iter()
            .map(|(label, value)| ChartEntry {
                label,
                value,
                share: if total > 0.0 {
                    value / total * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            title: title.to_string(),
            value_label: value_label.to_string(),
            entries,
        }
    }

    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value)
    }
}

/// Number of flights per route
pub fn flight_distribution(flights: &[Flight]) -> Chart {
    let mut routes: BTreeMap<String, u64> = BTreeMap::new();
    for flight in flights {
        *routes.entry(flight.route()).or_default() += 1;
    }
    Chart::from_values(
        "Flight Distribution by Route",
        "Flights",
        routes.into_iter().map(|(k, v)| (k, v as f64)),
    )
}

/// Sum of booking totals per route. Routes without bookings show zero.
pub fn revenue_by_route(flights: &[Flight], bookings: &[Booking]) -> Chart {
    let route_of: HashMap<i64, String> = flights.iter().map(|f| (f.id, f.route())).collect();

    let mut revenue: BTreeMap<String, f64> =
        route_of.values().map(|route| (route.clone(), 0.0)).collect();
    for booking in bookings {
        if let Some(route) = route_of.get(&booking.flight_id) {
            *revenue.entry(route.clone()).or_default() += booking.total_price;
        }
    }
    Chart::from_values("Revenue by Route", "Revenue", revenue)
}

/// Head count per role, in declaration order, empty roles omitted
pub fn employee_distribution(employees: &[Employee]) -> Chart {
    let mut roles: BTreeMap<EmployeeRole, u64> = BTreeMap::new();
    for employee in employees {
        *roles.entry(employee.role).or_default() += 1;
    }
    Chart::from_values(
        "Employee Distribution by Role",
        "Employees",
        roles.into_iter().map(|(k, v)| (k, v as f64)),
    )
}

/// Bookings made per day
pub fn booking_trends(bookings: &[Booking]) -> Chart {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for booking in bookings {
        *days.entry(booking.booking_date.date_naive()).or_default() += 1;
    }
    Chart::from_values(
        "Booking Trends",
        "Bookings",
        days.into_iter().map(|(k, v)| (k, v as f64)),
    )
}
