//! Decoded values and the per-call response envelope.

/// The value produced by a documented status code.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    List(Vec<T>),
    Single(T),
    /// The endpoint documents this status as carrying no value (e.g. a 404
    /// meaning "nothing here").
    Empty,
}

impl<T> Decoded<T> {
    pub fn into_list(self) -> Option<Vec<T>> {
        match self {
            Decoded::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_single(self) -> Option<T> {
        match self {
            Decoded::Single(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_empty_marker(&self) -> bool {
        matches!(self, Decoded::Empty)
    }
}

/// A completed call: the raw exchange plus whatever was decoded from it.
///
/// `parsed` is `None` only when the status was undocumented and the client
/// runs in lenient mode. A documented "no content" status is
/// `Some(Decoded::Empty)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub parsed: Option<Decoded<T>>,
}

impl<T> Envelope<T> {
    pub fn into_parsed(self) -> Option<Decoded<T>> {
        self.parsed
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Decoded::List(vec![1, 2]).into_list(), Some(vec![1, 2]));
        assert_eq!(Decoded::Single(3).into_list(), None);
        assert_eq!(Decoded::Single(3).into_single(), Some(3));
        assert!(Decoded::<u8>::Empty.is_empty_marker());
        assert!(!Decoded::List(Vec::<u8>::new()).is_empty_marker());
    }

    #[test]
    fn envelope_exposes_parsed_value() {
        let envelope = Envelope {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
            parsed: Some(Decoded::<u8>::Empty),
        };
        assert!(!envelope.is_success());
        assert_eq!(envelope.into_parsed(), Some(Decoded::Empty));
    }
}
