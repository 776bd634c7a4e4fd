//! Items

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{orders::ValidationError, uuids::TypedUuid};

/// Catalog product marker.
#[derive(Debug)]
pub struct Product;

/// Saved design marker.
#[derive(Debug)]
pub struct Design;

/// Product identifier.
pub type ProductUuid = TypedUuid<Product>;

/// Design identifier.
pub type DesignUuid = TypedUuid<Design>;

/// What kind of thing an item reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A catalog product.
    Product,

    /// A saved design.
    Design,
}

impl ItemKind {
    /// Wire literal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Design => "design",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "design" => Ok(Self::Design),
            other => Err(ValidationError::UnknownLiteral {
                field: "itemKind",
                value: other.to_string(),
            }),
        }
    }
}

/// A purchasable thing: either a catalog product or a saved design, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemReference {
    /// A catalog product.
    Product(ProductUuid),

    /// A saved design.
    Design(DesignUuid),
}

impl ItemReference {
    /// Build a reference from its persisted parts.
    pub const fn from_parts(kind: ItemKind, uuid: uuid::Uuid) -> Self {
        match kind {
            ItemKind::Product => Self::Product(ProductUuid::from_uuid(uuid)),
            ItemKind::Design => Self::Design(DesignUuid::from_uuid(uuid)),
        }
    }

    /// Which kind of item this is.
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::Design(_) => ItemKind::Design,
        }
    }

    /// The raw identifier, without its kind.
    pub const fn uuid(&self) -> uuid::Uuid {
        match self {
            Self::Product(uuid) => uuid.into_uuid(),
            Self::Design(uuid) => uuid.into_uuid(),
        }
    }
}

impl Display for ItemReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.kind(), self.uuid())
    }
}

impl From<ProductUuid> for ItemReference {
    fn from(value: ProductUuid) -> Self {
        Self::Product(value)
    }
}

impl From<DesignUuid> for ItemReference {
    fn from(value: DesignUuid) -> Self {
        Self::Design(value)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn same_uuid_different_kind_is_a_different_item() {
        let raw = Uuid::now_v7();

        assert_ne!(
            ItemReference::from_parts(ItemKind::Product, raw),
            ItemReference::from_parts(ItemKind::Design, raw)
        );
    }

    #[test]
    fn from_parts_preserves_kind_and_uuid() {
        let raw = Uuid::now_v7();
        let reference = ItemReference::from_parts(ItemKind::Design, raw);

        assert_eq!(reference.kind(), ItemKind::Design);
        assert_eq!(reference.uuid(), raw);
        assert_eq!(reference.to_string(), format!("design:{raw}"));
    }

    #[test]
    fn item_kind_parses_wire_literals() -> TestResult {
        assert_eq!("product".parse::<ItemKind>()?, ItemKind::Product);
        assert_eq!("design".parse::<ItemKind>()?, ItemKind::Design);
        assert!("sofa".parse::<ItemKind>().is_err());

        Ok(())
    }
}
