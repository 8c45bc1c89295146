//! # Filter & Sorter Expressions
//!
//! A tiny language for narrowing and ordering the cached comments:
//!
//! ```text
//! expr := ["!"] name [":" argument]
//!
//! tag:remote      filter: carries tag "remote"
//! !rated          filter: has no rating
//! rating          sorter: highest rating first, unrated last
//! !recent         sorter: oldest first
//! ```
//!
//! Filters and sorters share the grammar but resolve against separate
//! registries. `!` inverts a filter's boolean result and flips the sign of a
//! sorter's key. For 0/1 priority sorters (`tag`, `contains`) the flip turns
//! "matching first" into "matching last".
//!
//! Compiled expressions read annotations at evaluation time, so tagging or
//! rating an item is reflected the next time a selection is computed.

use std::fmt;
use std::str::FromStr;

use crate::core::item::Item;
use crate::core::store::AnnotationStore;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    Empty,
    TooManySeparators(String),
    UnknownOperator(String),
    MissingArgument(&'static str),
    UnexpectedArgument(&'static str),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Empty => write!(f, "empty expression"),
            ExprError::TooManySeparators(expr) => write!(f, "too many ':' in '{expr}'"),
            ExprError::UnknownOperator(name) => write!(f, "unknown operator '{name}'"),
            ExprError::MissingArgument(name) => {
                write!(f, "'{name}' needs an argument ({name}:<value>)")
            }
            ExprError::UnexpectedArgument(name) => write!(f, "'{name}' takes no argument"),
        }
    }
}

impl std::error::Error for ExprError {}

// ============================================================================
// Parsing
// ============================================================================

/// Parsed, not yet resolved, expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub name: String,
    pub argument: Option<String>,
    pub inverted: bool,
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (inverted, body) = match s.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if body.is_empty() {
            return Err(ExprError::Empty);
        }

        let mut parts = body.splitn(3, ':');
        let name = parts.next().unwrap_or_default().to_string();
        let argument = parts.next().map(str::to_string);
        if parts.next().is_some() {
            return Err(ExprError::TooManySeparators(s.to_string()));
        }

        Ok(Expr {
            name,
            argument,
            inverted,
        })
    }
}

// ============================================================================
// Registries
// ============================================================================

pub type Predicate = Box<dyn Fn(&Item, &AnnotationStore) -> bool + Send + Sync>;
pub type KeyFn = Box<dyn Fn(&Item, &AnnotationStore) -> SortKey + Send + Sync>;

/// A named operator factory. `build` receives the argument, or `""` for
/// operators that take none.
pub struct Operator<F> {
    pub name: &'static str,
    pub takes_argument: bool,
    pub description: &'static str,
    build: fn(&str) -> F,
}

pub static FILTERS: &[Operator<Predicate>] = &[
    Operator {
        name: "tag",
        takes_argument: true,
        description: "carries the tag",
        build: |tag| {
            let tag = tag.to_string();
            Box::new(move |item: &Item, annotations: &AnnotationStore| {
                annotations.has_tag(item.id, &tag)
            })
        },
    },
    Operator {
        name: "rated",
        takes_argument: false,
        description: "has a rating",
        build: |_| {
            Box::new(|item: &Item, annotations: &AnnotationStore| {
                annotations.rating(item.id).is_some()
            })
        },
    },
    Operator {
        name: "contains",
        takes_argument: true,
        description: "body contains the text (any case)",
        build: |needle| {
            let needle = needle.to_string();
            Box::new(move |item: &Item, _: &AnnotationStore| item.text_contains(&needle))
        },
    },
    Operator {
        name: "by",
        takes_argument: true,
        description: "written by the user",
        build: |author| {
            let author = author.to_string();
            Box::new(move |item: &Item, _: &AnnotationStore| {
                item.by.as_deref() == Some(author.as_str())
            })
        },
    },
];

pub static SORTERS: &[Operator<KeyFn>] = &[
    Operator {
        name: "tag",
        takes_argument: true,
        description: "tagged first",
        build: |tag| {
            let tag = tag.to_string();
            Box::new(move |item: &Item, annotations: &AnnotationStore| {
                SortKey::priority(annotations.has_tag(item.id, &tag))
            })
        },
    },
    Operator {
        name: "recent",
        takes_argument: false,
        description: "newest first",
        build: |_| {
            Box::new(|item: &Item, _: &AnnotationStore| SortKey::Value(-i128::from(item.time)))
        },
    },
    Operator {
        name: "rating",
        takes_argument: false,
        description: "highest rating first, unrated last",
        build: |_| {
            Box::new(|item: &Item, annotations: &AnnotationStore| {
                match annotations.rating(item.id) {
                    Some(rating) => SortKey::Value(-i128::from(rating)),
                    None => SortKey::Infinity,
                }
            })
        },
    },
    Operator {
        name: "contains",
        takes_argument: true,
        description: "matching bodies first",
        build: |needle| {
            let needle = needle.to_string();
            Box::new(move |item: &Item, _: &AnnotationStore| {
                SortKey::priority(item.text_contains(&needle))
            })
        },
    },
];

fn resolve<F>(registry: &[Operator<F>], expr: &Expr) -> Result<F, ExprError> {
    let op = registry
        .iter()
        .find(|op| op.name == expr.name)
        .ok_or_else(|| ExprError::UnknownOperator(expr.name.clone()))?;

    match (&expr.argument, op.takes_argument) {
        (Some(arg), true) => Ok((op.build)(arg)),
        (None, false) => Ok((op.build)("")),
        (None, true) => Err(ExprError::MissingArgument(op.name)),
        (Some(_), false) => Err(ExprError::UnexpectedArgument(op.name)),
    }
}

/// `name, name:<arg>, ...` for help screens.
pub fn registry_summary<F>(registry: &[Operator<F>]) -> String {
    registry
        .iter()
        .map(|op| {
            if op.takes_argument {
                format!("{}:<arg> ({})", op.name, op.description)
            } else {
                format!("{} ({})", op.name, op.description)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Sort keys
// ============================================================================

/// Totally ordered sort key. `Infinity` sorts after every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    NegInfinity,
    Value(i128),
    Infinity,
}

impl SortKey {
    fn priority(matches: bool) -> Self {
        SortKey::Value(if matches { 0 } else { 1 })
    }

    pub fn negate(self) -> Self {
        match self {
            SortKey::NegInfinity => SortKey::Infinity,
            SortKey::Value(v) => SortKey::Value(-v),
            SortKey::Infinity => SortKey::NegInfinity,
        }
    }
}

// ============================================================================
// Compiled expressions
// ============================================================================

pub struct Filter {
    source: String,
    inverted: bool,
    predicate: Predicate,
}

impl Filter {
    pub fn compile(text: &str) -> Result<Self, ExprError> {
        let expr: Expr = text.parse()?;
        let predicate = resolve(FILTERS, &expr)?;
        Ok(Self {
            source: text.to_string(),
            inverted: expr.inverted,
            predicate,
        })
    }

    pub fn matches(&self, item: &Item, annotations: &AnnotationStore) -> bool {
        (self.predicate)(item, annotations) != self.inverted
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.source).finish()
    }
}

pub struct Sorter {
    source: String,
    inverted: bool,
    key: KeyFn,
}

impl Sorter {
    pub fn compile(text: &str) -> Result<Self, ExprError> {
        let expr: Expr = text.parse()?;
        let key = resolve(SORTERS, &expr)?;
        Ok(Self {
            source: text.to_string(),
            inverted: expr.inverted,
            key,
        })
    }

    pub fn key(&self, item: &Item, annotations: &AnnotationStore) -> SortKey {
        let key = (self.key)(item, annotations);
        if self.inverted { key.negate() } else { key }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Sorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sorter").field(&self.source).finish()
    }
}

/// Compiles every expression or none: the first error aborts the batch.
pub fn compile_filters<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Filter>, ExprError> {
    texts.iter().map(|t| Filter::compile(t.as_ref())).collect()
}

/// Compiles every expression or none: the first error aborts the batch.
pub fn compile_sorters<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Sorter>, ExprError> {
    texts.iter().map(|t| Sorter::compile(t.as_ref())).collect()
}

/// Comments passing every filter, ordered by the sorters.
///
/// One stable sort per sorter, last declared first, so the first sorter is
/// the outermost key and remaining ties keep the input order.
pub fn select<'a, I>(
    items: I,
    filters: &[Filter],
    sorters: &[Sorter],
    annotations: &AnnotationStore,
) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut selected: Vec<&Item> = items
        .into_iter()
        .filter(|item| item.is_comment())
        .filter(|item| filters.iter().all(|f| f.matches(item, annotations)))
        .collect();

    for sorter in sorters.iter().rev() {
        selected.sort_by_key(|item| sorter.key(item, annotations));
    }
    selected
}
