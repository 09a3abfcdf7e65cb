use std::collections::{BTreeMap, HashMap, HashSet};

/// Values with a notion of "nothing in here".
///
/// Strings and collections are empty when they have no elements; `None` is
/// empty; a JSON value is empty when it is `null`, `""`, `[]` or `{}`.
/// Numbers and booleans are never empty.
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> IsEmpty for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> IsEmpty for HashSet<T, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IsEmpty> IsEmpty for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, IsEmpty::is_empty_value)
    }
}

impl<T: IsEmpty + ?Sized> IsEmpty for &T {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl IsEmpty for serde_json::Value {
    fn is_empty_value(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(a) => a.is_empty(),
            serde_json::Value::Object(o) => o.is_empty(),
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
        }
    }
}

pub fn empty<T: IsEmpty + ?Sized>(v: &T) -> bool {
    v.is_empty_value()
}

pub fn not_empty<T: IsEmpty + ?Sized>(v: &T) -> bool {
    !v.is_empty_value()
}

pub fn equal<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    a == b
}

pub fn contains<T: PartialEq>(list: &[T], v: &T) -> bool {
    list.contains(v)
}

/// `default` when `v` is empty, otherwise `v`.
pub fn if_empty<T: IsEmpty>(v: T, default: T) -> T {
    if v.is_empty_value() {
        default
    } else {
        v
    }
}

/// `replacement` when `v` is not empty, otherwise `v`.
pub fn if_not_empty<T: IsEmpty>(v: T, replacement: T) -> T {
    if v.is_empty_value() {
        v
    } else {
        replacement
    }
}

pub fn if_null<T>(v: Option<T>, default: T) -> T {
    v.unwrap_or(default)
}

pub fn if_not_null<T>(v: Option<T>, replacement: T) -> Option<T> {
    v.map(|_| replacement)
}
