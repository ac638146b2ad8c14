use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Key of an entry in [`Attributes`].
///
/// Keys are marker types, usually private to the interceptor that defines them,
/// so two interceptors can never collide on a key by accident. The associated
/// `Value` is the type stored under the key.
///
/// # Example
///
/// ```ignore
/// use rtc_interceptor::{AttributeKey, Attributes};
///
/// struct Retransmitted;
///
/// impl AttributeKey for Retransmitted {
///     type Value = bool;
/// }
///
/// let mut attributes = Attributes::new();
/// attributes.insert::<Retransmitted>(true);
/// assert_eq!(attributes.get::<Retransmitted>(), Some(&true));
/// ```
pub trait AttributeKey: 'static {
    /// Type of the value stored under this key
    type Value: Send + Sync + 'static;
}

/// Per-call metadata bag shared by the stages of one read or write call.
///
/// A fresh, empty `Attributes` is created for every call through a
/// [`Chain`](crate::Chain) and dropped when the call returns, so entries never
/// leak from one packet to the next. Stages use it to pass sideband information
/// to each other (e.g. "this packet is a retransmission") without widening the
/// [`Stage`](crate::Stage) signatures.
#[derive(Default)]
pub struct Attributes {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Attributes {
    /// Create an empty metadata bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under key `K`, returning the previous value if any.
    pub fn insert<K: AttributeKey>(&mut self, value: K::Value) -> Option<K::Value> {
        self.entries
            .insert(TypeId::of::<K>(), Box::new(value))
            .and_then(|prev| prev.downcast::<K::Value>().ok())
            .map(|prev| *prev)
    }

    /// Get a reference to the value stored under key `K`.
    pub fn get<K: AttributeKey>(&self) -> Option<&K::Value> {
        self.entries
            .get(&TypeId::of::<K>())
            .and_then(|value| value.downcast_ref::<K::Value>())
    }

    /// Get a mutable reference to the value stored under key `K`.
    pub fn get_mut<K: AttributeKey>(&mut self) -> Option<&mut K::Value> {
        self.entries
            .get_mut(&TypeId::of::<K>())
            .and_then(|value| value.downcast_mut::<K::Value>())
    }

    /// Remove and return the value stored under key `K`.
    pub fn remove<K: AttributeKey>(&mut self) -> Option<K::Value> {
        self.entries
            .remove(&TypeId::of::<K>())
            .and_then(|value| value.downcast::<K::Value>().ok())
            .map(|value| *value)
    }

    pub fn contains<K: AttributeKey>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;
    impl AttributeKey for Tag {
        type Value = &'static str;
    }

    struct RetransmitCount;
    impl AttributeKey for RetransmitCount {
        type Value = u32;
    }

    // Same value type as Tag, different key.
    struct OtherTag;
    impl AttributeKey for OtherTag {
        type Value = &'static str;
    }

    #[test]
    fn test_attributes_insert_get() {
        let mut attributes = Attributes::new();
        assert!(attributes.is_empty());

        assert_eq!(attributes.insert::<Tag>("A"), None);
        assert_eq!(attributes.insert::<RetransmitCount>(3), None);

        assert_eq!(attributes.get::<Tag>(), Some(&"A"));
        assert_eq!(attributes.get::<RetransmitCount>(), Some(&3));
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_attributes_keys_are_distinct_types() {
        let mut attributes = Attributes::new();
        attributes.insert::<Tag>("A");

        assert!(attributes.contains::<Tag>());
        assert!(!attributes.contains::<OtherTag>());
        assert_eq!(attributes.get::<OtherTag>(), None);
    }

    #[test]
    fn test_attributes_replace_returns_previous() {
        let mut attributes = Attributes::new();
        attributes.insert::<Tag>("A");
        assert_eq!(attributes.insert::<Tag>("B"), Some("A"));
        assert_eq!(attributes.get::<Tag>(), Some(&"B"));
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_attributes_get_mut_remove_clear() {
        let mut attributes = Attributes::new();
        attributes.insert::<RetransmitCount>(1);

        if let Some(count) = attributes.get_mut::<RetransmitCount>() {
            *count += 1;
        }
        assert_eq!(attributes.get::<RetransmitCount>(), Some(&2));

        assert_eq!(attributes.remove::<RetransmitCount>(), Some(2));
        assert_eq!(attributes.remove::<RetransmitCount>(), None);

        attributes.insert::<Tag>("A");
        attributes.clear();
        assert!(attributes.is_empty());
    }
}
