//! Value decorators
//!
//! A decorator is a named pure `&str -> String` transform. Decorators are
//! attached to a key with `{key|name|name}` and applied left to right, each
//! consuming the output of the previous one.

use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;

/// Signature of a decorator transform
pub type DecoratorFn = fn(&str) -> String;

pub const TRIM: &str = "trim";
pub const VERBATIM: &str = "verbatim";
pub const UPPERCASE: &str = "uppercase";
pub const LOWERCASE: &str = "lowercase";

fn trim(value: &str) -> String {
    value.trim().to_string()
}

fn verbatim(value: &str) -> String {
    value.to_string()
}

fn uppercase(value: &str) -> String {
    value.to_uppercase()
}

fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// A named value transform
#[derive(Clone, Copy)]
pub struct Decorator {
    name: &'static str,
    transform: DecoratorFn,
}

impl Decorator {
    /// Creates a decorator from a name and a transform
    pub const fn new(name: &'static str, transform: DecoratorFn) -> Self {
        Self { name, transform }
    }

    pub const fn trim() -> Self {
        Self::new(TRIM, trim)
    }

    pub const fn verbatim() -> Self {
        Self::new(VERBATIM, verbatim)
    }

    pub const fn uppercase() -> Self {
        Self::new(UPPERCASE, uppercase)
    }

    pub const fn lowercase() -> Self {
        Self::new(LOWERCASE, lowercase)
    }

    /// Returns the registered name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the transform
    pub fn apply(&self, value: &str) -> String {
        (self.transform)(value)
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decorator").field(&self.name).finish()
    }
}

impl PartialEq for Decorator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Decorator {}

/// Ordered list of decorators applied to a single value
///
/// Most keys carry one or two decorators, so they are stored inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratorChain(SmallVec<[Decorator; 4]>);

impl DecoratorChain {
    /// Creates an empty chain, which leaves values unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain holding a single decorator
    pub fn single(decorator: Decorator) -> Self {
        let mut chain = Self::new();
        chain.push(decorator);
        chain
    }

    /// Appends a decorator to the end of the chain
    pub fn push(&mut self, decorator: Decorator) {
        self.0.push(decorator);
    }

    /// Applies every decorator in order
    pub fn apply(&self, value: &str) -> String {
        let mut iter = self.0.iter();
        let Some(first) = iter.next() else {
            return value.to_string();
        };
        iter.fold(first.apply(value), |current, decorator| {
            decorator.apply(&current)
        })
    }

    /// Returns the decorator names in application order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(Decorator::name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Decorator> for DecoratorChain {
    fn from_iter<I: IntoIterator<Item = Decorator>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Registry of decorators, looked up case-insensitively
#[derive(Debug, Clone)]
pub struct DecoratorRegistry {
    decorators: IndexMap<String, Decorator>,
}

impl DecoratorRegistry {
    /// Creates a registry without any decorators
    pub fn empty() -> Self {
        Self {
            decorators: IndexMap::new(),
        }
    }

    /// Creates a registry with `trim`, `verbatim`, `uppercase` and `lowercase`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for decorator in [
            Decorator::trim(),
            Decorator::verbatim(),
            Decorator::uppercase(),
            Decorator::lowercase(),
        ] {
            registry.insert(decorator);
        }
        registry
    }

    /// Registers a decorator, replacing any existing one with the same name
    pub fn register(&mut self, name: &'static str, transform: DecoratorFn) {
        self.insert(Decorator::new(name, transform));
    }

    fn insert(&mut self, decorator: Decorator) {
        self.decorators
            .insert(decorator.name().to_lowercase(), decorator);
    }

    /// Looks up a decorator by name, ignoring case and surrounding whitespace
    pub fn get(&self, name: &str) -> Option<Decorator> {
        self.decorators
            .get(&name.trim().to_lowercase())
            .copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decorators.values().map(Decorator::name)
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl Default for DecoratorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
