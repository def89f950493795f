use std::fmt;
use crate::common::error::{ArangoError, Result};

/// Forward-only reader over the items of one listing call.
///
/// [`ResponseReader::read`] hands out the next item or
/// [`ArangoError::NoMoreDocuments`] once the listing is exhausted. Items are
/// materialized lazily, one per read. A reader cannot be rewound; list again
/// to start over.
pub struct ResponseReader<T> {
    items: Box<dyn Iterator<Item = T> + Send>,
}

impl<T> ResponseReader<T> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        ResponseReader {
            items: Box::new(items.into_iter()),
        }
    }

    pub fn read(&mut self) -> Result<T> {
        self.items.next().ok_or(ArangoError::NoMoreDocuments)
    }
}

impl<T> Iterator for ResponseReader<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }
}

impl<T> fmt::Debug for ResponseReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseReader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_until_exhausted() {
        let mut reader = ResponseReader::new(vec![1, 2]);
        assert_eq!(reader.read().unwrap(), 1);
        assert_eq!(reader.read().unwrap(), 2);
        assert!(reader.read().unwrap_err().is_no_more_documents());
        assert!(reader.read().unwrap_err().is_no_more_documents());
    }

    #[test]
    fn test_iterator_and_read_share_position() {
        let mut reader = ResponseReader::new(vec!["a", "b", "c"]);
        assert_eq!(reader.read().unwrap(), "a");
        assert_eq!(reader.collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
