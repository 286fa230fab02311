use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub category: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TempComment {
    pub id: i32,
    pub comment: String,
    pub rating: f64,
    pub item: i32,
    pub userid: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub comment: String,
    pub rating: f64,
    pub item: i32,
    pub userid: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Taste {
    pub id: i32,
    pub item: i32,
    pub taste: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Holiday {
    pub id: i32,
    pub item: i32,
    pub holiday: String,
}

/// Values for an item that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub brand: String,
    pub category: i32,
    pub comment: Option<String>,
}

/// Values for a temp or approved comment that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub comment: String,
    pub rating: f64,
    pub item: i32,
    pub userid: i32,
}

/// A single field of a partial update.
///
/// A key missing from the JSON body deserializes to `Absent` through
/// `#[serde(default)]`; an explicit `null` becomes `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Value(value),
            None => Field::Null,
        })
    }
}

/// Body of `PATCH /items/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub brand: Field<String>,
    #[serde(default)]
    pub category: Field<i32>,
    #[serde(default)]
    pub comment: Field<String>,
}

/// Raised when a patch tries to null out a required column
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field '{0}' cannot be null")]
pub struct NullField(pub &'static str);

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.brand.is_absent()
            && self.category.is_absent()
            && self.comment.is_absent()
    }

    /// Merge into a loaded item. Absent fields keep the stored value, `null`
    /// clears the optional comment.
    pub fn apply(self, item: &mut Item) -> Result<(), NullField> {
        match self.title {
            Field::Absent => {}
            Field::Null => return Err(NullField("title")),
            Field::Value(title) => item.title = title,
        }
        match self.brand {
            Field::Absent => {}
            Field::Null => return Err(NullField("brand")),
            Field::Value(brand) => item.brand = brand,
        }
        match self.category {
            Field::Absent => {}
            Field::Null => return Err(NullField("category")),
            Field::Value(category) => item.category = category,
        }
        match self.comment {
            Field::Absent => {}
            Field::Null => item.comment = None,
            Field::Value(comment) => item.comment = Some(comment),
        }
        Ok(())
    }
}
