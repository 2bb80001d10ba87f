//! Namespace marker and default-export interop.

use crate::exports::{Exports, NamespaceMeta};
use crate::value::Value;

/// String tag carried by every marked namespace
pub const TO_STRING_TAG: &str = "Module";

/// Name of the default export inside a namespace
pub const DEFAULT_EXPORT: &str = "default";

/// Tag `exports` as an ES module namespace. Re-marking is a no-op.
pub fn mark_as_namespace(exports: &Exports) {
    exports.set_namespace_meta(NamespaceMeta {
        to_string_tag: TO_STRING_TAG,
        es_module: true,
    });
}

/// The value an `import x from "..."` binds to.
///
/// A marked namespace yields its `default` entry; an unmarked container is a
/// CommonJS-style module whose whole exports object is the default.
pub fn default_export(exports: &Exports) -> Value {
    if exports.is_namespace() {
        exports.get(DEFAULT_EXPORT).unwrap_or_default()
    } else {
        Value::Namespace(exports.clone())
    }
}
