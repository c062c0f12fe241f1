//! FITS header records: an insertion-ordered keyword → scalar value mapping.

/// A scalar FITS card value. HISPEC simulation headers only ever carry
/// strings, integers and floats.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> HeaderValue {
        HeaderValue::Str(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> HeaderValue {
        HeaderValue::Str(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> HeaderValue {
        HeaderValue::Int(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> HeaderValue {
        HeaderValue::Float(value)
    }
}

/// An ordered collection of FITS cards.
///
/// Cards are written out in insertion order. Setting an existing keyword
/// replaces its value in place. `Clone` is a deep copy; a cloned record
/// shares nothing with the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderRecord {
    cards: Vec<(String, HeaderValue)>,
}

impl HeaderRecord {
    pub fn new() -> HeaderRecord {
        HeaderRecord::default()
    }

    /// Set `keyword` to `value`, keeping the keyword's original position if
    /// it is already present.
    pub fn set<V: Into<HeaderValue>>(&mut self, keyword: &str, value: V) {
        let value = value.into();
        match self.cards.iter_mut().find(|(k, _)| k == keyword) {
            Some((_, v)) => *v = value,
            None => self.cards.push((keyword.to_string(), value)),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.cards.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_preserves_insertion_order() {
        let mut h = HeaderRecord::new();
        h.set("UT", "10:00:00.000000");
        h.set("AIRMASS", 1.2);
        h.set("FRAMENUM", 3_i64);

        let keys: Vec<&str> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["UT", "AIRMASS", "FRAMENUM"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut h = HeaderRecord::new();
        h.set("FILTER", "y");
        h.set("TARGNAME", "flat");
        h.set("FILTER", "J");

        assert_eq!(h.len(), 2);
        assert_eq!(h.get("FILTER"), Some(&HeaderValue::Str("J".to_string())));
        let keys: Vec<&str> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["FILTER", "TARGNAME"]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = HeaderRecord::new();
        original.set("EL", 60.0);

        let mut copy = original.clone();
        copy.set("EL", 10.0);
        copy.set("INST", "hispec");

        assert_eq!(original.len(), 1);
        assert_eq!(original.get("EL"), Some(&HeaderValue::Float(60.0)));
        assert!(!original.contains("INST"));
    }
}
