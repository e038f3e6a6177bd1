//! Declarative CMS schema for the `product` document type.
//!
//! The content system owns validation and storage of products; this module
//! only declares the shape it should enforce. [`product_schema`] builds the
//! declaration and it serializes to the CMS's JSON schema format:
//!
//! ```
//! let schema = loomwise_core::schema::product_schema();
//! let json = serde_json::to_value(&schema).unwrap();
//!
//! assert_eq!(json["name"], "product");
//! assert_eq!(json["type"], "document");
//! assert_eq!(json["fields"][1]["options"]["source"], "name");
//! ```

use serde::Serialize;

/// Name of the product document type.
pub const PRODUCT_TYPE: &str = "product";

/// Name of the category document type products reference.
pub const CATEGORY_TYPE: &str = "category";

/// A top-level CMS document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSchema {
    pub name: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    kind: DocumentKind,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
enum DocumentKind {
    Document,
}

impl DocumentSchema {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all fields carrying a `required` rule, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name)
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub ty: FieldType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<Rule>,
}

impl Field {
    const fn new(name: &'static str, title: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            title,
            ty,
            validation: Vec::new(),
        }
    }

    fn rule(mut self, rule: Rule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Whether the CMS must reject documents missing this field.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validation.contains(&Rule::Required)
    }
}

/// The CMS type of a field, with its type-specific options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldType {
    String,
    Number,
    Image,
    /// Generated from another field of the same document.
    Slug { options: SlugOptions },
    /// Points at exactly one document of one of the listed types.
    Reference { to: Vec<TypeRef> },
    /// Ordered list of anonymous objects. No length limits are declared.
    Array { of: Vec<ObjectType> },
    Color { options: ColorOptions },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugOptions {
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOptions {
    pub disable_alpha: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub name: &'static str,
}

/// An inline object type used as an array member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectType {
    #[serde(rename = "type")]
    kind: ObjectKind,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
enum ObjectKind {
    Object,
}

/// A validation rule applied by the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "flag", rename_all = "camelCase")]
pub enum Rule {
    Required,
    Min { value: i64 },
}

/// Build the `product` document schema.
#[must_use]
pub fn product_schema() -> DocumentSchema {
    let color_image = ObjectType {
        kind: ObjectKind::Object,
        fields: vec![
            Field::new(
                "color",
                "Color",
                FieldType::Color {
                    options: ColorOptions {
                        disable_alpha: true,
                    },
                },
            ),
            Field::new("image", "Image", FieldType::Image),
        ],
    };

    DocumentSchema {
        name: PRODUCT_TYPE,
        title: "Products",
        kind: DocumentKind::Document,
        fields: vec![
            Field::new("name", "Name", FieldType::String).rule(Rule::Required),
            Field::new(
                "slug",
                "Slug",
                FieldType::Slug {
                    options: SlugOptions { source: "name" },
                },
            ),
            Field::new(
                "colorImageMap",
                "Color & Image Map",
                FieldType::Array {
                    of: vec![color_image],
                },
            ),
            Field::new("description", "Description", FieldType::String).rule(Rule::Required),
            Field::new("price", "Price", FieldType::Number)
                .rule(Rule::Required)
                .rule(Rule::Min { value: 0 }),
            Field::new(
                "category",
                "Category",
                FieldType::Reference {
                    to: vec![TypeRef {
                        name: CATEGORY_TYPE,
                    }],
                },
            )
            .rule(Rule::Required),
        ],
    }
}
