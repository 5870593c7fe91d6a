//! Named predicates and predicate factories used by `|check` suffixes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;

use crate::error::RouterError;

/// A compiled validator: a boolean test over a captured parameter's raw
/// string value.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl Predicate {
    fn new(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the predicate against a captured value.
    #[must_use]
    pub fn test(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

type Factory = Arc<dyn Fn(&str) -> Option<Predicate> + Send + Sync>;

/// Resolves `|check` suffixes to [`Predicate`]s, either by looking up a named
/// fixed predicate (`isnum`, `nozero`) or by invoking a named factory
/// (`min`, `max`, `regexp`) with an argument.
///
/// Factory-produced predicates are cached under their normalized `check`
/// string (e.g. `min:18`, or `regexp:^\d+$` once a leading `^...$` has been
/// rewritten) so that repeated patterns, such as a compiled [`Regex`], are
/// built once.
pub struct ValidatorRegistry {
    predicates: RwLock<HashMap<String, Predicate>>,
    factories: HashMap<String, Factory>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("predicates", &self.predicates.read().len())
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl ValidatorRegistry {
    /// Builds a registry seeded with the built-in `isnum`/`nozero` predicates
    /// and the `min`/`max`/`regexp` factories.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut predicates = HashMap::new();
        predicates.insert(
            "isnum".to_string(),
            Predicate::new(|v: &str| !v.is_empty() && v.parse::<i64>().is_ok()),
        );
        predicates.insert(
            "nozero".to_string(),
            Predicate::new(|v: &str| !v.is_empty()),
        );

        let mut factories: HashMap<String, Factory> = HashMap::new();
        factories.insert(
            "min".to_string(),
            Arc::new(|arg: &str| {
                let min: i64 = arg.parse().ok()?;
                Some(Predicate::new(move |v: &str| {
                    v.parse::<i64>().is_ok_and(|n| n >= min)
                }))
            }),
        );
        factories.insert(
            "max".to_string(),
            Arc::new(|arg: &str| {
                let max: i64 = arg.parse().ok()?;
                Some(Predicate::new(move |v: &str| {
                    v.parse::<i64>().is_ok_and(|n| n <= max)
                }))
            }),
        );
        factories.insert(
            "regexp".to_string(),
            Arc::new(|arg: &str| {
                let re = Regex::new(arg).ok()?;
                Some(Predicate::new(move |v: &str| re.is_match(v)))
            }),
        );

        Self {
            predicates: RwLock::new(predicates),
            factories,
        }
    }

    /// Registers or replaces a named fixed predicate.
    pub fn register_predicate(&self, name: impl Into<String>, predicate: Predicate) {
        self.predicates.write().insert(name.into(), predicate);
    }

    /// Resolves a `|check` suffix to a [`Predicate`].
    ///
    /// A leading `^` is treated as shorthand for `regexp:^...`. Everything
    /// up to the first `:` is the predicate/factory name; a name with no `:`
    /// must be a fixed predicate already in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownPredicate`] if the name (or, for a
    /// factory call, the factory name) isn't registered, or
    /// [`RouterError::InvalidPredicateArgument`] if a factory rejects its
    /// argument.
    pub fn resolve(&self, check: &str) -> Result<Predicate, RouterError> {
        let normalized = if let Some(rest) = check.strip_prefix('^') {
            format!("regexp:^{rest}")
        } else {
            check.to_string()
        };

        if let Some(p) = self.predicates.read().get(&normalized) {
            return Ok(p.clone());
        }

        match normalized.split_once(':') {
            None => self
                .predicates
                .read()
                .get(&normalized)
                .cloned()
                .ok_or_else(|| RouterError::unknown_predicate(&normalized)),
            Some((factory_name, arg)) => {
                let factory = self
                    .factories
                    .get(factory_name)
                    .ok_or_else(|| RouterError::unknown_predicate(factory_name))?;
                let predicate = factory(arg).ok_or_else(|| {
                    RouterError::invalid_predicate_argument(factory_name, arg)
                })?;
                self.predicates
                    .write()
                    .insert(normalized, predicate.clone());
                Ok(predicate)
            }
        }
    }
}
