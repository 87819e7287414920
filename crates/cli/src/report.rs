use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;

/// One callback fired during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    Flag {
        name: String,
    },
    #[serde(rename = "option")]
    Value {
        name: String,
        value: String,
    },
    Argument {
        name: String,
        value: String,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag { name } => write!(f, "flag {name}"),
            Self::Value { name, value } => write!(f, "option {name}={value}"),
            Self::Argument { name, value } => write!(f, "argument {name}={value}"),
        }
    }
}

/// Collects events from parser callbacks.
///
/// Callbacks only get shared access, so events sit behind a `RefCell`.
#[derive(Debug, Default)]
pub struct Recorder {
    events: RefCell<Vec<Event>>,
}

impl Recorder {
    pub fn flag(&self, name: &str) {
        self.push(Event::Flag {
            name: name.to_string(),
        });
    }

    pub fn value(&self, name: &str, value: &str) {
        self.push(Event::Value {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn argument(&self, name: &str, value: &str) {
        self.push(Event::Argument {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn push(&self, event: Event) {
        tracing::trace!(%event, "callback fired");
        self.events.borrow_mut().push(event);
    }

    pub fn into_report(self, program: String) -> Report {
        let events = self.events.into_inner();

        let mut flags: IndexMap<String, usize> = IndexMap::new();
        let mut options: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut arguments: IndexMap<String, Vec<String>> = IndexMap::new();
        for event in &events {
            match event {
                Event::Flag { name } => *flags.entry(name.clone()).or_default() += 1,
                Event::Value { name, value } => {
                    options.entry(name.clone()).or_default().push(value.clone())
                }
                Event::Argument { name, value } => {
                    arguments.entry(name.clone()).or_default().push(value.clone())
                }
            }
        }

        Report {
            program,
            events,
            flags,
            options,
            arguments,
        }
    }
}

/// Result of one `parse` run, serialized for `--json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub program: String,
    pub events: Vec<Event>,
    /// Flag name to number of occurrences.
    pub flags: IndexMap<String, usize>,
    pub options: IndexMap<String, Vec<String>>,
    /// Positional value name to values, in slot order.
    pub arguments: IndexMap<String, Vec<String>>,
}
