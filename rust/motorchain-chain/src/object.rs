use std::fmt::{Display, Formatter};

use motorchain_common::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of the key used by `Table<ID, _>` dynamic fields.
pub const OBJECT_ID_TYPE: &str = "0x2::object::ID";

/// A fully qualified Move struct type, `<package>::<module>::<name>`.
///
/// Type strings coming back from a node embed the package address, which is
/// subject to the same padding ambiguity as any other identifier. Comparing
/// parsed tags avoids false negatives on `0x2::...` versus `0x000...2::...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    /// Package the type was published in
    pub package: ObjectId,
    /// Module declaring the type
    pub module: String,
    /// Struct name, without type parameters
    pub name: String,
}

impl StructTag {
    /// Builds a tag from its parts.
    pub fn new(package: ObjectId, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parses a type string such as `0x2::table::Table<0x2::object::ID, bool>`.
    /// Type parameters are dropped. Returns `None` for anything that is not a
    /// three-part struct path.
    pub fn parse(type_string: &str) -> Option<Self> {
        let base = match type_string.find('<') {
            Some(index) => &type_string[..index],
            None => type_string,
        };

        let mut parts = base.trim().split("::");
        let package = parts.next()?.parse().ok()?;
        let module = parts.next()?;
        let name = parts.next()?;

        if parts.next().is_some() || module.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self::new(package, module, name))
    }
}

impl Display for StructTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.name)
    }
}

/// An object as returned by the chain, with its Move content flattened to
/// the `fields` JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    /// The object's id
    pub object_id: ObjectId,
    /// Full Move type of the object, when the node reported one
    pub object_type: Option<String>,
    /// Move struct fields, `Value::Null` for packages or when content was not
    /// requested
    pub fields: Value,
}

impl ObjectData {
    /// Parsed [`StructTag`] of this object's type.
    pub fn struct_tag(&self) -> Option<StructTag> {
        self.object_type.as_deref().and_then(StructTag::parse)
    }

    /// Looks up a nested field with a JSON pointer, e.g. `/authorized/fields/id/id`.
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.fields.pointer(pointer)
    }
}

/// Reads a Move integer. Nodes render `u8`..`u32` as JSON numbers and
/// `u64`+ as decimal strings.
pub fn move_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Reads a Move `ID`/`UID`, rendered either as a bare string or as
/// `{ "id": "0x..." }`.
pub fn move_object_id(value: &Value) -> Option<ObjectId> {
    match value {
        Value::String(text) => text.parse().ok(),
        Value::Object(map) => map.get("id").and_then(move_object_id),
        _ => None,
    }
}

/// Owned-object filter, serialized in the node's externally tagged format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectFilter {
    /// Objects of exactly this struct type
    StructType(String),
    /// Objects matching any of the nested filters
    MatchAny(Vec<ObjectFilter>),
}

impl ObjectFilter {
    /// A `MatchAny` over the given struct types.
    pub fn any_struct_type<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ObjectFilter::MatchAny(
            types
                .into_iter()
                .map(|struct_type| ObjectFilter::StructType(struct_type.into()))
                .collect(),
        )
    }

    /// Whether an object of the given type passes this filter.
    pub fn matches(&self, tag: &StructTag) -> bool {
        match self {
            ObjectFilter::StructType(struct_type) => {
                StructTag::parse(struct_type).as_ref() == Some(tag)
            }
            ObjectFilter::MatchAny(filters) => filters.iter().any(|filter| filter.matches(tag)),
        }
    }
}

/// Key of a dynamic field, e.g. an entry in a `Table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicFieldName {
    /// Move type of the key
    #[serde(rename = "type")]
    pub type_name: String,
    /// JSON rendering of the key value
    pub value: Value,
}

impl DynamicFieldName {
    /// Key for a `Table<ID, _>` entry.
    pub fn object_id(id: &ObjectId) -> Self {
        Self {
            type_name: OBJECT_ID_TYPE.to_owned(),
            value: Value::String(id.to_string()),
        }
    }
}

/// Opaque pagination cursor handed back by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub Value);

/// One page of a paginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page, in the node's order
    pub data: Vec<T>,
    /// Cursor to request the following page with
    pub next_cursor: Option<Cursor>,
    /// Whether another page follows
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// A single, final page.
    pub fn last(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
            has_next_page: false,
        }
    }
}

/// A Move event emitted by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// Full Move type of the event
    pub event_type: String,
    /// Event payload
    pub parsed_json: Value,
    /// Checkpoint timestamp in milliseconds
    pub timestamp_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn it_parses_struct_tags_with_generics() {
        let tag = StructTag::parse("0x2::table::Table<0x2::object::ID, bool>").unwrap();

        assert_eq!(tag.package, ObjectId::from_literal("0x2"));
        assert_eq!(tag.module, "table");
        assert_eq!(tag.name, "Table");
    }

    #[test]
    fn it_rejects_malformed_type_strings() {
        assert_eq!(StructTag::parse("vehicle::AdminCap"), None);
        assert_eq!(StructTag::parse("0x2::a::b::c"), None);
        assert_eq!(StructTag::parse("nothex::vehicle::AdminCap"), None);
        assert_eq!(StructTag::parse("0x2::::AdminCap"), None);
    }

    #[test]
    fn it_matches_filters_on_canonical_types() {
        let filter = ObjectFilter::any_struct_type([
            "0x00000000000000000000000000000000000000000000000000000000000000ab::vehicle::AdminCap",
            "0xab::vehicle::ThirdPartyCap",
        ]);

        assert!(filter.matches(&StructTag::parse("0xAB::vehicle::AdminCap").unwrap()));
        assert!(filter.matches(&StructTag::parse("0xab::vehicle::ThirdPartyCap").unwrap()));
        assert!(!filter.matches(&StructTag::parse("0xab::vehicle::Car").unwrap()));
    }

    #[test]
    fn it_serializes_filters_in_node_format() {
        let filter = ObjectFilter::any_struct_type(["0x2::a::B"]);

        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "MatchAny": [{ "StructType": "0x2::a::B" }] })
        );
    }

    #[test]
    fn it_reads_move_integers_and_ids() {
        assert_eq!(move_u64(&json!(2)), Some(2));
        assert_eq!(move_u64(&json!("18446744073709551615")), Some(u64::MAX));
        assert_eq!(move_u64(&json!(true)), None);

        assert_eq!(
            move_object_id(&json!({ "id": "0x5" })),
            Some(ObjectId::from_literal("0x5"))
        );
        assert_eq!(move_object_id(&json!(5)), None);
    }
}
