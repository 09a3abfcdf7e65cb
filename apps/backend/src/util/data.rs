use serde::Serialize;

/// A `{ label, value }` pair, the shape select boxes and lookup lists expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelValue<V> {
    pub label: String,
    pub value: V,
}

pub fn lv<V>(label: impl Into<String>, value: V) -> LabelValue<V> {
    LabelValue {
        label: label.into(),
        value,
    }
}

/// [`lv`] with the arguments the other way round.
pub fn vl<V>(value: V, label: impl Into<String>) -> LabelValue<V> {
    lv(label, value)
}

/// Deep copy.
pub fn copy<T: Clone>(v: &T) -> T {
    v.clone()
}
