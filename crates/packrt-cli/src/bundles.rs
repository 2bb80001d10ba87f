//! Demo bundles shipped with the runner.

use packrt_core::{
    accessor, define_exports, log_function, mark_as_namespace, Console, Exports, Function,
    Registry, Result, RuntimeError, Value,
};
use std::cell::OnceCell;
use std::rc::Rc;
use std::sync::Arc;

pub struct Bundle {
    pub name: &'static str,
    pub description: &'static str,
    pub entry: &'static str,
    pub build: fn(Arc<dyn Console>) -> Result<Registry>,
}

pub const BUNDLES: &[Bundle] = &[
    Bundle {
        name: "two-module",
        description: "index.js calls funcA from a.js, then logs from funcB",
        entry: "./src/index.js",
        build: two_module,
    },
    Bundle {
        name: "circular",
        description: "even.js and odd.js import each other; main.js asks both",
        entry: "./src/main.js",
        build: circular,
    },
];

pub fn find(name: &str) -> Option<&'static Bundle> {
    BUNDLES.iter().find(|bundle| bundle.name == name)
}

fn two_module(console: Arc<dyn Console>) -> Result<Registry> {
    let log = log_function(console);
    let log_b = log.clone();

    Registry::builder()
        .module("./src/a.js", move |_, exports, _| {
            mark_as_namespace(exports);
            let log = log.clone();
            let func_a = Function::new("funcA", move |_| log.call(&[Value::from("in funcA")]));
            define_exports(exports, [("funcA", accessor(move || func_a.clone().into()))]);
            Ok(())
        })
        .module("./src/index.js", move |_, exports, loader| {
            mark_as_namespace(exports);
            let a = loader.load("./src/a.js")?;
            let log = log_b.clone();
            let func_b = Function::new("funcB", move |_| {
                a.call("funcA", &[])?;
                log.call(&[Value::from("in funcB")])
            });
            define_exports(exports, [("funcB", accessor(move || func_b.clone().into()))]);
            exports.call("funcB", &[])?;
            Ok(())
        })
        .build()
}

fn circular(console: Arc<dyn Console>) -> Result<Registry> {
    let log = log_function(console);

    Registry::builder()
        .module("./src/even.js", |_, exports, loader| {
            mark_as_namespace(exports);
            // Filled in once odd.js returns; odd.js sees our container before that.
            let odd: Rc<OnceCell<Exports>> = Rc::default();
            let linked = Rc::clone(&odd);
            let is_even = Function::new("isEven", move |args| {
                let n = count_arg(args)?;
                if n == 0.0 {
                    return Ok(Value::from(true));
                }
                linked
                    .get()
                    .ok_or_else(|| RuntimeError::thrown("isOdd is not available yet"))?
                    .call("isOdd", &[Value::from(n - 1.0)])
            });
            define_exports(exports, [("isEven", accessor(move || is_even.clone().into()))]);
            let _ = odd.set(loader.load("./src/odd.js")?);
            Ok(())
        })
        .module("./src/odd.js", |_, exports, loader| {
            mark_as_namespace(exports);
            let even = loader.load("./src/even.js")?;
            let is_odd = Function::new("isOdd", move |args| {
                let n = count_arg(args)?;
                if n == 0.0 {
                    return Ok(Value::from(false));
                }
                even.call("isEven", &[Value::from(n - 1.0)])
            });
            define_exports(exports, [("isOdd", accessor(move || is_odd.clone().into()))]);
            Ok(())
        })
        .module("./src/main.js", move |_, exports, loader| {
            mark_as_namespace(exports);
            let even = loader.load("./src/even.js")?;
            let odd = loader.load("./src/odd.js")?;
            let n = Value::from(7);
            let is_even = even.call("isEven", std::slice::from_ref(&n))?;
            let is_odd = odd.call("isOdd", std::slice::from_ref(&n))?;
            log.call(&[Value::from("isEven(7) ="), is_even.clone()])?;
            log.call(&[Value::from("isOdd(7) ="), is_odd])?;
            exports.define_value("sevenIsEven", is_even);
            Ok(())
        })
        .build()
}

fn count_arg(args: &[Value]) -> Result<f64> {
    match args.first().and_then(Value::as_number) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n),
        _ => Err(RuntimeError::thrown("expected a non-negative integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packrt_core::{bootstrap, CollectingConsole, LoaderConfig};

    #[test]
    fn test_every_bundle_runs() {
        for bundle in BUNDLES {
            let console = Arc::new(CollectingConsole::new());
            let registry = (bundle.build)(console.clone()).unwrap();
            bootstrap(registry, &LoaderConfig::with_entry(bundle.entry)).unwrap();
            assert!(!console.lines().is_empty(), "{} logged nothing", bundle.name);
        }
    }

    #[test]
    fn test_circular_bundle_output() {
        let console = Arc::new(CollectingConsole::new());
        let registry = circular(console.clone()).unwrap();
        bootstrap(registry, &LoaderConfig::with_entry("./src/main.js")).unwrap();
        assert_eq!(
            console.lines(),
            vec!["isEven(7) = false", "isOdd(7) = true"]
        );
    }

    #[test]
    fn test_find_bundle() {
        assert!(find("two-module").is_some());
        assert!(find("missing").is_none());
    }
}
