use std::fmt;

use parquet::basic::{Repetition, Type as PhysicalType};

/// Resolution of a time or timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Milliseconds
    Millis,
    /// Microseconds
    Micros,
    /// Nanoseconds
    Nanos,
}

impl TimeUnit {
    /// Multiplier that converts milliseconds into this unit
    pub fn per_milli(self) -> i64 {
        match self {
            TimeUnit::Millis => 1,
            TimeUnit::Micros => 1_000,
            TimeUnit::Nanos => 1_000_000,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Millis => write!(f, "MILLIS"),
            TimeUnit::Micros => write!(f, "MICROS"),
            TimeUnit::Nanos => write!(f, "NANOS"),
        }
    }
}

/// Logical annotation refining how a physical type is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAnnotation {
    /// UTF-8 string on BYTE_ARRAY
    String,
    /// Days since epoch on INT32
    Date,
    /// Unscaled decimal
    Decimal {
        /// Total digits
        precision: u8,
        /// Fractional digits
        scale: u8,
    },
    /// Time of day
    Time {
        /// Resolution
        unit: TimeUnit,
        /// Whether the value is normalized to UTC
        adjusted_to_utc: bool,
    },
    /// Instant or local date-time
    Timestamp {
        /// Resolution
        unit: TimeUnit,
        /// True for instants (normalized to UTC)
        adjusted_to_utc: bool,
    },
    /// 16-byte UUID on FIXED_LEN_BYTE_ARRAY
    Uuid,
    /// Narrow integer stored in INT32/INT64
    Integer {
        /// 8, 16, 32 or 64
        bit_width: u8,
        /// Signedness
        signed: bool,
    },
    /// JSON document on BYTE_ARRAY
    Json,
    /// Enum label on BYTE_ARRAY
    Enum,
}

impl fmt::Display for LogicalAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "STRING"),
            Self::Date => write!(f, "DATE"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            Self::Time {
                unit,
                adjusted_to_utc,
            } => write!(f, "TIME({unit},{adjusted_to_utc})"),
            Self::Timestamp {
                unit,
                adjusted_to_utc,
            } => write!(f, "TIMESTAMP({unit},{adjusted_to_utc})"),
            Self::Uuid => write!(f, "UUID"),
            Self::Integer { bit_width, signed } => write!(f, "INTEGER({bit_width},{signed})"),
            Self::Json => write!(f, "JSON"),
            Self::Enum => write!(f, "ENUM"),
        }
    }
}

/// A primitive (leaf) node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveNode {
    /// Physical storage type
    pub physical_type: PhysicalType,
    /// Optional logical annotation
    pub logical: Option<LogicalAnnotation>,
    /// Byte length for FIXED_LEN_BYTE_ARRAY, 0 otherwise
    pub type_length: i32,
}

/// The shape of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf column
    Primitive(PrimitiveNode),
    /// Group of named fields
    Struct {
        /// Fields in declaration order
        fields: Vec<SchemaNode>,
    },
    /// Three-level list: `<name> → repeated "list" → element`
    List {
        /// Element node
        element: Box<SchemaNode>,
    },
    /// Three-level map: `<name> → repeated "key_value" → key, value`
    Map {
        /// Key node, must be required
        key: Box<SchemaNode>,
        /// Value node
        value: Box<SchemaNode>,
    },
}

/// A node of the logical schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    /// Field name
    pub name: String,
    /// Whether the field is required or optional
    pub repetition: Repetition,
    /// Node shape
    pub kind: NodeKind,
}

/// Name of the repeated group inside a list node.
pub const LIST_GROUP_NAME: &str = "list";
/// Name of the repeated group inside a map node.
pub const MAP_GROUP_NAME: &str = "key_value";

impl SchemaNode {
    /// Create a required primitive node
    pub fn primitive(name: impl Into<String>, physical_type: PhysicalType) -> Self {
        Self {
            name: name.into(),
            repetition: Repetition::REQUIRED,
            kind: NodeKind::Primitive(PrimitiveNode {
                physical_type,
                logical: None,
                type_length: 0,
            }),
        }
    }

    /// Create a required struct node
    pub fn structure(name: impl Into<String>, fields: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            repetition: Repetition::REQUIRED,
            kind: NodeKind::Struct { fields },
        }
    }

    /// Create a required list node
    pub fn list(name: impl Into<String>, element: SchemaNode) -> Self {
        Self {
            name: name.into(),
            repetition: Repetition::REQUIRED,
            kind: NodeKind::List {
                element: Box::new(element),
            },
        }
    }

    /// Create a required map node
    pub fn map(name: impl Into<String>, key: SchemaNode, value: SchemaNode) -> Self {
        Self {
            name: name.into(),
            repetition: Repetition::REQUIRED,
            kind: NodeKind::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
        }
    }

    /// Mark the node optional
    pub fn optional(self) -> Self {
        self.with_repetition(Repetition::OPTIONAL)
    }

    /// Set the node repetition
    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        self.repetition = repetition;
        self
    }

    /// Set the logical annotation of a primitive node; no-op on groups
    pub fn with_logical(mut self, logical: LogicalAnnotation) -> Self {
        if let NodeKind::Primitive(primitive) = &mut self.kind {
            primitive.logical = Some(logical);
        }
        self
    }

    /// Set the byte length of a FIXED_LEN_BYTE_ARRAY node; no-op on groups
    pub fn with_length(mut self, length: i32) -> Self {
        if let NodeKind::Primitive(primitive) = &mut self.kind {
            primitive.type_length = length;
        }
        self
    }

    /// Whether the node may be null
    pub fn is_optional(&self) -> bool {
        self.repetition == Repetition::OPTIONAL
    }

    /// Number of primitive leaves under (and including) this node
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Primitive(_) => 1,
            NodeKind::Struct { fields } => fields.iter().map(SchemaNode::leaf_count).sum(),
            NodeKind::List { element } => element.leaf_count(),
            NodeKind::Map { key, value } => key.leaf_count() + value.leaf_count(),
        }
    }

    pub(crate) fn collect_leaf_paths(&self, path: &mut super::SchemaPath, out: &mut Vec<super::SchemaPath>) {
        path.push(&self.name);
        match &self.kind {
            NodeKind::Primitive(_) => out.push(path.clone()),
            NodeKind::Struct { fields } => {
                for field in fields {
                    field.collect_leaf_paths(path, out);
                }
            }
            NodeKind::List { element } => {
                path.push(LIST_GROUP_NAME);
                element.collect_leaf_paths(path, out);
                path.pop();
            }
            NodeKind::Map { key, value } => {
                path.push(MAP_GROUP_NAME);
                key.collect_leaf_paths(path, out);
                value.collect_leaf_paths(path, out);
                path.pop();
            }
        }
        path.pop();
    }
}

/// Root of a logical schema: an ordered list of top-level fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    /// Schema name, not part of any column path
    pub name: String,
    /// Top-level fields
    pub fields: Vec<SchemaNode>,
}

impl MessageSchema {
    /// Create a schema from its top-level fields
    pub fn new(name: impl Into<String>, fields: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Number of primitive leaves
    pub fn leaf_count(&self) -> usize {
        self.fields.iter().map(SchemaNode::leaf_count).sum()
    }

    /// Paths of every primitive leaf in depth-first order
    pub fn leaf_paths(&self) -> Vec<super::SchemaPath> {
        let mut out = Vec::with_capacity(self.leaf_count());
        let mut path = super::SchemaPath::root();
        for field in &self.fields {
            field.collect_leaf_paths(&mut path, &mut out);
        }
        out
    }
}
