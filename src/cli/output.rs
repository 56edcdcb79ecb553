//! Output handlers for CLI commands
//!
//! Supports console (tables), JSON, and quiet output modes.

use crate::store::EntityKind;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// Output mode for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Console,
    Json,
    Quiet,
}

impl OutputMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "quiet" => Self::Quiet,
            _ => Self::Console,
        }
    }
}

/// Events emitted while a command runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutputEvent {
    Created { entity: EntityKind, key: String },
    Cleared { rows: usize },
    Info { message: String },
    Error { message: String },
    Debug { message: String },
}

/// A set of records, pre-rendered for every output mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub title: String,
    pub count: usize,
    pub records: serde_json::Value,
    #[serde(skip)]
    pub table: String,
}

impl Listing {
    /// Build from display rows plus the records they were derived from
    pub fn new<R: Tabled, T: Serialize>(title: &str, rows: Vec<R>, records: &[T]) -> Self {
        let count = rows.len();
        let table = if rows.is_empty() {
            String::new()
        } else {
            Table::new(rows).with(Style::rounded()).to_string()
        };

        Self {
            title: title.to_string(),
            count,
            records: serde_json::to_value(records).unwrap_or_default(),
            table,
        }
    }
}

/// Output handler trait
pub trait OutputHandler {
    /// Emit an event
    fn emit(&self, event: OutputEvent);

    /// Show a set of records
    fn listing(&self, listing: &Listing);
}

/// Console output handler
pub struct ConsoleHandler {
    debug: bool,
}

impl ConsoleHandler {
    /// Create a new console handler
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl OutputHandler for ConsoleHandler {
    fn emit(&self, event: OutputEvent) {
        match event {
            OutputEvent::Created { entity, key } => {
                println!(
                    "✓ {} {} added successfully",
                    Self::capitalize(&entity.to_string()),
                    key
                );
            }
            OutputEvent::Cleared { rows } => {
                println!("✓ All data cleared ({} rows)", rows);
            }
            OutputEvent::Info { message } => {
                println!("{}", message);
            }
            OutputEvent::Error { message } => {
                eprintln!("✗ {}", message);
            }
            OutputEvent::Debug { message } => {
                if self.debug {
                    eprintln!("[debug] {}", message);
                }
            }
        }
    }

    fn listing(&self, listing: &Listing) {
        println!("{}", listing.title);
        if listing.count == 0 {
            println!("  (no {})", listing.title.to_lowercase());
        } else {
            println!("{}", listing.table);
        }
    }
}

/// JSON output handler
pub struct JsonHandler {
    pretty: bool,
}

impl JsonHandler {
    /// Create a new JSON handler
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        if let Ok(s) = json {
            println!("{}", s);
        }
    }
}

impl OutputHandler for JsonHandler {
    fn emit(&self, event: OutputEvent) {
        if matches!(event, OutputEvent::Debug { .. }) {
            return;
        }
        self.print_json(&event);
    }

    fn listing(&self, listing: &Listing) {
        self.print_json(listing);
    }
}

/// Quiet handler: bare tables and errors only
pub struct QuietHandler;

impl OutputHandler for QuietHandler {
    fn emit(&self, event: OutputEvent) {
        if let OutputEvent::Error { message } = event {
            eprintln!("{}", message);
        }
    }

    fn listing(&self, listing: &Listing) {
        if listing.count > 0 {
            println!("{}", listing.table);
        }
    }
}

/// Create an output handler based on mode
pub fn create_handler(mode: OutputMode, debug: bool) -> Box<dyn OutputHandler> {
    match mode {
        OutputMode::Console => Box::new(ConsoleHandler::new(debug)),
        OutputMode::Json => Box::new(JsonHandler::new(true)),
        OutputMode::Quiet => Box::new(QuietHandler),
    }
}

/// Handler that records everything it is given
#[cfg(test)]
#[derive(Default)]
pub struct RecordingHandler {
    pub events: std::cell::RefCell<Vec<OutputEvent>>,
    pub listings: std::cell::RefCell<Vec<Listing>>,
}

#[cfg(test)]
impl OutputHandler for RecordingHandler {
    fn emit(&self, event: OutputEvent) {
        self.events.borrow_mut().push(event);
    }

    fn listing(&self, listing: &Listing) {
        self.listings.borrow_mut().push(listing.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "Code")]
        code: String,
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!(OutputMode::from_str("json"), OutputMode::Json);
        assert_eq!(OutputMode::from_str("JSON"), OutputMode::Json);
        assert_eq!(OutputMode::from_str("quiet"), OutputMode::Quiet);
        assert_eq!(OutputMode::from_str("console"), OutputMode::Console);
        assert_eq!(OutputMode::from_str("unknown"), OutputMode::Console);
    }

    #[test]
    fn test_listing_renders_table_and_records() {
        let rows = vec![Row { code: "JFK".into() }, Row { code: "LAX".into() }];
        let records = vec!["JFK", "LAX"];
        let listing = Listing::new("Airports", rows, &records);

        assert_eq!(listing.count, 2);
        assert!(listing.table.contains("Code"));
        assert!(listing.table.contains("JFK"));
        assert_eq!(listing.records, serde_json::json!(["JFK", "LAX"]));
    }

    #[test]
    fn test_empty_listing() {
        let listing = Listing::new::<Row, String>("Airports", Vec::new(), &[]);
        assert_eq!(listing.count, 0);
        assert!(listing.table.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = OutputEvent::Created {
            entity: EntityKind::Airport,
            key: "JFK".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Created");
        assert_eq!(json["entity"], "airport");
        assert_eq!(json["key"], "JFK");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(ConsoleHandler::capitalize("flight assignment"), "Flight assignment");
        assert_eq!(ConsoleHandler::capitalize(""), "");
    }

    #[test]
    fn test_recording_handler_captures_events() {
        let handler = RecordingHandler::default();
        handler.emit(OutputEvent::Info {
            message: "hello".into(),
        });
        handler.emit(OutputEvent::Cleared { rows: 3 });
        assert_eq!(handler.events.borrow().len(), 2);
    }

    #[test]
    fn test_create_handler() {
        let _ = create_handler(OutputMode::Console, false);
        let _ = create_handler(OutputMode::Json, false);
        let _ = create_handler(OutputMode::Quiet, false);
    }
}
