use crate::value::{Function, Value};
use std::sync::{Arc, Mutex, PoisonError};

/// Output sink for module side effects (`console.log`)
/// Modules receive it as an injected dependency so tests can capture output
pub trait Console: Send + Sync {
    fn log(&self, line: &str);
}

/// Console that prints each line to stdout
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdoutConsole {
    fn log(&self, line: &str) {
        println!("{}", line);
    }
}

/// Console that records lines without printing
#[derive(Debug, Default)]
pub struct CollectingConsole {
    lines: Mutex<Vec<String>>,
}

impl CollectingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Console for CollectingConsole {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// A `log` function value: joins its arguments with spaces and writes one line
pub fn log_function(console: Arc<dyn Console>) -> Function {
    Function::new("log", move |args| {
        let line = args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        console.log(&line);
        Ok(Value::Undefined)
    })
}
