use crate::{FakeHttpError, Result};
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Ordered header multimap
///
/// Names keep the order in which they were first inserted and each name
/// keeps its values in insertion order. Names are compared exactly as
/// stored, so `Custom-Header` and `custom-header` are different entries.
///
/// # Examples
///
/// ```
/// use fakehttp::HeaderFields;
///
/// let mut headers = HeaderFields::new();
/// headers.append("Set-Cookie", "a=1");
/// headers.append("Set-Cookie", "b=2");
/// assert_eq!(headers.first("Set-Cookie"), Some("a=1"));
/// assert_eq!(headers.get("Set-Cookie").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Appends a value, creating the entry when the name is new
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Replaces every value of `name` with `value`, keeping the entry's position
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Returns every value of `name`
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.entries[idx].1.as_slice())
    }

    /// Returns the first value of `name`
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates names and their values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts to an `http::HeaderMap`
    ///
    /// Names are lowercased by the conversion; values per name keep their order.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, values) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FakeHttpError::InvalidHeader(format!("{name}: {e}")))?;
            for value in values {
                let header_value = HeaderValue::from_str(value)
                    .map_err(|e| FakeHttpError::InvalidHeader(format!("{name}: {e}")))?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a HeaderFields {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a [String])> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut headers = HeaderFields::new();
        headers.append("B", "1");
        headers.append("A", "2");
        headers.append("B", "3");

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(headers.get("B").unwrap(), ["1", "3"]);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_missing_name() {
        let headers = HeaderFields::new();
        assert!(headers.is_empty());
        assert_eq!(headers.get("Missing"), None);
        assert_eq!(headers.first("Missing"), None);
        assert!(!headers.contains("Missing"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut headers = HeaderFields::new();
        headers.append("Content-Type", "text/plain");
        assert_eq!(headers.first("content-type"), None);
    }

    #[test]
    fn test_set_replaces_values() {
        let mut headers = HeaderFields::new();
        headers.append("X", "1");
        headers.append("Y", "2");
        headers.append("X", "3");
        headers.set("X", "4");

        assert_eq!(headers.get("X").unwrap(), ["4"]);
        let names: Vec<&str> = (&headers).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_to_header_map() {
        let mut headers = HeaderFields::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("Set-Cookie", "b=2");
        headers.append("Content-Length", "0");

        let map = headers.to_header_map().unwrap();
        let cookies: Vec<&str> = map
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(map.get("content-length").unwrap(), "0");
    }

    #[test]
    fn test_to_header_map_rejects_invalid_name() {
        let mut headers = HeaderFields::new();
        headers.append("Bad Header", "value");
        assert!(matches!(
            headers.to_header_map(),
            Err(FakeHttpError::InvalidHeader(_))
        ));
    }
}
