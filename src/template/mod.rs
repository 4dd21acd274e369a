//! YAML skeleton generation for configuration types.
//!
//! A configuration type describes its layout once through [`Template`], and
//! [`render`] turns that description into a commented YAML file that users can
//! copy and edit.
//!
//! # Examples
//!
//! ```rust
//! use config_watcher::template::{Field, Template, render};
//!
//! struct ServerConfig;
//!
//! impl Template for ServerConfig {
//!     fn fields() -> Vec<Field> {
//!         vec![
//!             Field::string("host").default("localhost").help("The hostname"),
//!             Field::scalar("port").default("8080").help("The port number"),
//!         ]
//!     }
//! }
//!
//! assert_eq!(
//!     render::<ServerConfig>(),
//!     "host: \"localhost\" # The hostname\nport: 8080        # The port number\n"
//! );
//! ```

mod render;

pub use render::{render, render_fields};

/// Types that can describe their configuration layout.
pub trait Template {
    /// Top-level fields, in output order.
    fn fields() -> Vec<Field>;
}

/// Shape of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Quoted string value.
    String,
    /// Unquoted value: numbers, booleans, durations.
    Scalar,
    /// Sequence of scalars.
    List,
    /// Sequence of records sharing the given layout.
    Records(Vec<Field>),
    /// Free-form string map.
    Map,
    /// Nested section.
    Section(Vec<Field>),
}

/// One entry of a configuration layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    kind: FieldKind,
    defaults: Vec<String>,
    placeholder: Option<String>,
    help: Option<String>,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            defaults: Vec::new(),
            placeholder: None,
            help: None,
        }
    }

    /// A quoted string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// An unquoted scalar field.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    /// A list of scalars.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    /// A list of records with the given layout.
    pub fn records(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Records(fields))
    }

    /// A string-to-string map.
    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Map)
    }

    /// A nested section with the given layout.
    pub fn section(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Section(fields))
    }

    /// Default value shown in the template. Lists accept repeated calls, one
    /// item per call.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.defaults.push(value.into());
        self
    }

    /// Default items for a list field.
    pub fn defaults<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults.extend(values.into_iter().map(Into::into));
        self
    }

    /// Example value shown when the field has no default.
    pub fn placeholder(mut self, value: impl Into<String>) -> Self {
        self.placeholder = Some(value.into());
        self
    }

    /// Help text rendered as a trailing comment. Empty text means no comment.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into()).filter(|text| !text.is_empty());
        self
    }

    /// The YAML key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's shape.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}
