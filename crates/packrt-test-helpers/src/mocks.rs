//! Mock module factories for testing

use packrt_core::{Exports, Loader, ModuleFactory, ModuleRecord, Result, RuntimeError, Value};
use std::cell::Cell;
use std::rc::Rc;

/// A factory that counts its invocations and exports `calls`
#[derive(Debug, Clone, Default)]
pub struct CountingFactory {
    calls: Rc<Cell<usize>>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter; stays readable after the factory is boxed into a registry
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ModuleFactory for CountingFactory {
    fn instantiate(&self, _module: &ModuleRecord, exports: &Exports, _loader: &Loader) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        let calls = Rc::clone(&self.calls);
        exports.define_live("calls", move || Value::from(calls.get() as f64));
        Ok(())
    }
}

/// A factory that exports `before`, then fails with `message`
#[derive(Debug, Clone)]
pub struct FailingFactory {
    message: String,
    attempts: Rc<Cell<usize>>,
}

impl FailingFactory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: Rc::new(Cell::new(0)),
        }
    }

    pub fn attempts(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.attempts)
    }
}

impl ModuleFactory for FailingFactory {
    fn instantiate(&self, _module: &ModuleRecord, exports: &Exports, _loader: &Loader) -> Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        exports.define_value("before", true);
        Err(RuntimeError::thrown(self.message.clone()))
    }
}
