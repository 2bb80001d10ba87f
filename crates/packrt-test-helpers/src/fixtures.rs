//! Test fixtures - module registries for testing

use packrt_core::console::log_function;
use packrt_core::{
    accessor, define_exports, mark_as_namespace, Console, Exports, Function, Registry,
    RuntimeError, Value,
};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

pub const A_JS: &str = "./src/a.js";
pub const INDEX_JS: &str = "./src/index.js";
pub const EVEN_JS: &str = "./src/even.js";
pub const ODD_JS: &str = "./src/odd.js";

/// `index.js` imports `funcA` from `a.js`, defines `funcB` and calls it.
/// Loading `index.js` logs `in funcA` then `in funcB`.
pub fn two_module_registry(console: Arc<dyn Console>) -> Registry {
    let log_a = log_function(Arc::clone(&console));
    let log_b = log_function(console);

    Registry::builder()
        .module(A_JS, move |_module, exports, _loader| {
            mark_as_namespace(exports);
            let log = log_a.clone();
            let func_a = Function::new("funcA", move |_| log.call(&[Value::from("in funcA")]));
            define_exports(exports, [("funcA", accessor(move || func_a.clone().into()))]);
            Ok(())
        })
        .module(INDEX_JS, move |_module, exports, loader| {
            mark_as_namespace(exports);
            let a = loader.load(A_JS)?;
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
        .expect("fixture registry has unique ids")
}

/// `even.js` and `odd.js` import each other. Each declares its export before
/// requesting the other and only reads the other's export at call time.
pub fn circular_registry() -> Registry {
    Registry::builder()
        .module(EVEN_JS, |_module, exports, loader| {
            mark_as_namespace(exports);
            let odd = Rc::new(std::cell::OnceCell::<Exports>::new());
            let is_even = {
                let odd = Rc::clone(&odd);
                Function::new("isEven", move |args| {
                    let n = number_arg(args)?;
                    if n == 0.0 {
                        return Ok(Value::from(true));
                    }
                    let odd = odd
                        .get()
                        .ok_or_else(|| RuntimeError::thrown("odd.js is not linked yet"))?;
                    odd.call("isOdd", &[Value::from(n - 1.0)])
                })
            };
            define_exports(exports, [("isEven", accessor(move || is_even.clone().into()))]);
            let _ = odd.set(loader.load(ODD_JS)?);
            Ok(())
        })
        .module(ODD_JS, |_module, exports, loader| {
            mark_as_namespace(exports);
            let even = loader.load(EVEN_JS)?;
            let is_odd = Function::new("isOdd", move |args| {
                let n = number_arg(args)?;
                if n == 0.0 {
                    return Ok(Value::from(false));
                }
                even.call("isEven", &[Value::from(n - 1.0)])
            });
            define_exports(exports, [("isOdd", accessor(move || is_odd.clone().into()))]);
            Ok(())
        })
        .build()
        .expect("fixture registry has unique ids")
}

fn number_arg(args: &[Value]) -> Result<f64, RuntimeError> {
    args.first()
        .and_then(Value::as_number)
        .ok_or_else(|| RuntimeError::thrown("expected a number argument"))
}

/// A registry of modules `m0..mN` where module `i` loads each id in `deps[i]`
/// in order. Returns the per-module execution counters alongside.
pub fn graph_registry(deps: &[Vec<usize>]) -> (Registry, Rc<Vec<Cell<u32>>>) {
    let counts: Rc<Vec<Cell<u32>>> = Rc::new(deps.iter().map(|_| Cell::new(0)).collect());
    let mut builder = Registry::builder();
    for (index, edges) in deps.iter().enumerate() {
        let edges = edges.clone();
        let counts = Rc::clone(&counts);
        builder = builder.module(module_name(index), move |_module, exports, loader| {
            counts[index].set(counts[index].get() + 1);
            exports.define_value("index", index as f64);
            for dep in &edges {
                loader.load(&module_name(*dep))?;
            }
            Ok(())
        });
    }
    let registry = builder.build().expect("graph ids are unique");
    (registry, counts)
}

pub fn module_name(index: usize) -> String {
    format!("m{}", index)
}
