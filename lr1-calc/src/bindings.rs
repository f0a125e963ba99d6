//! # bindings
//!
//! The variable environment used by evaluation: a flat, insertion-ordered map
//! from names to numbers built on [`indexmap::IndexMap`].
//!
//! ## Example
//! ```rust
//! # use lr1_calc::Bindings;
//! let mut env = Bindings::new();
//! env.set("x", 2.5);
//! assert_eq!(env.get("x").unwrap(), 2.5);
//! assert!(env.get("y").is_err());
//! ```

use crate::{CalcError, EvalError};
use indexmap::IndexMap;
use smartstring::alias::String;

/// Maps variable names to values.
///
/// Names are stored in the order they were first bound. Rebinding a name
/// replaces its value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    tab: IndexMap<String, f64>,
}

impl Bindings {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
        }
    }

    /// Builds an environment from alternating `NAME VALUE` arguments, as
    /// given on the command line.
    ///
    /// # Examples
    /// ```
    /// # use lr1_calc::Bindings;
    /// let env = Bindings::from_pairs(["a", "3", "b", "-1.5"]).unwrap();
    /// assert_eq!(env.get("b").unwrap(), -1.5);
    /// assert!(Bindings::from_pairs(["a"]).is_err());
    /// ```
    pub fn from_pairs<I, S>(args: I) -> Result<Self, CalcError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bindings = Self::new();
        let mut args = args.into_iter();
        while let Some(name) = args.next() {
            let name = name.as_ref();
            let value = args
                .next()
                .ok_or_else(|| CalcError::MissingValue(String::from(name)))?;
            let value = value
                .as_ref()
                .parse::<f64>()
                .map_err(|source| CalcError::InvalidValue {
                    name: String::from(name),
                    source,
                })?;
            bindings.set(name, value);
        }
        Ok(bindings)
    }

    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Binds `name` to `value`, returning the previous value if any.
    pub fn set(&mut self, name: impl AsRef<str>, value: f64) -> Option<f64> {
        self.tab.insert(String::from(name.as_ref()), value)
    }

    /// Looks up `name`.
    ///
    /// Returns [`EvalError::UnboundVariable`] if the name was never bound.
    pub fn get(&self, name: &str) -> Result<f64, EvalError> {
        self.tab
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(String::from(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tab.contains_key(name)
    }

    /// Iterates over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.tab.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut bindings = Self::new();
        bindings.extend(iter);
        bindings
    }
}

impl<K: AsRef<str>> Extend<(K, f64)> for Bindings {
    fn extend<T: IntoIterator<Item = (K, f64)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_empty() {
        let env = Bindings::new();
        assert_eq!(env.len(), 0);
        assert!(env.is_empty());
        assert!(!env.contains("x"));
    }

    #[test]
    fn rebinding_replaces_value_and_keeps_order() {
        let mut env = Bindings::new();
        assert_eq!(env.set("a", 1.0), None);
        env.set("b", 2.0);
        assert_eq!(env.set("a", 10.0), Some(1.0));

        assert_eq!(env.len(), 2);
        let pairs: Vec<_> = env.iter().collect();
        assert_eq!(pairs, vec![("a", 10.0), ("b", 2.0)]);
    }

    #[test]
    fn unbound_lookup_names_the_variable() {
        let env: Bindings = [("x", 1.0)].into_iter().collect();
        match env.get("y") {
            Err(EvalError::UnboundVariable(name)) => assert_eq!(name.as_str(), "y"),
            other => panic!("expected UnboundVariable, got {:?}", other),
        }
    }

    #[test]
    fn from_pairs_later_binding_wins() {
        let env = Bindings::from_pairs(["v", "1", "w", "2e3", "v", "0.25"]).unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("v").unwrap(), 0.25);
        assert_eq!(env.get("w").unwrap(), 2000.0);
    }

    #[test]
    fn from_pairs_reports_bad_arguments() {
        let err = Bindings::from_pairs(["x", "1", "y"]).unwrap_err();
        assert!(matches!(err, CalcError::MissingValue(ref name) if name == "y"));

        let err = Bindings::from_pairs(["x", "one"]).unwrap_err();
        assert!(matches!(err, CalcError::InvalidValue { ref name, .. } if name == "x"));
        assert!(err.to_string().contains("'x'"));

        assert!(Bindings::from_pairs(Vec::<&str>::new()).unwrap().is_empty());
    }

    #[test]
    fn extend_adds_and_overwrites() {
        let mut env = Bindings::new();
        env.extend([("p", 1.0), ("q", 2.0)]);
        env.extend(vec![(std::string::String::from("p"), 3.0)]);
        assert_eq!(env.get("p").unwrap(), 3.0);
        assert_eq!(env.get("q").unwrap(), 2.0);
    }
}
