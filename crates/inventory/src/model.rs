//! Entity model: categories, items, drawers and slot positions.
//!
//! Field names follow the snapshot document (`camelCase` on the wire). The
//! types are plain data; the invariants tying them together (slot exclusivity,
//! placements inside existing drawers) are owned by the store.

use serde::{Deserialize, Deserializer, Serialize};

use toolbox_core::{CategoryId, DrawerId, Entity, ItemId, ValueObject};

/// A named group of items. `order` is an advisory display key only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub order: i64,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Address of one slot: `(drawer, row, column)`, zero-based.
///
/// A reference, not an owner: it only means something while a drawer with
/// this id exists and the coordinates are inside its grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPosition {
    pub drawer_id: DrawerId,
    pub r: u32,
    pub c: u32,
}

impl ValueObject for SlotPosition {}

impl SlotPosition {
    pub fn new(drawer_id: impl Into<DrawerId>, r: u32, c: u32) -> Self {
        Self {
            drawer_id: drawer_id.into(),
            r,
            c,
        }
    }
}

impl core::fmt::Display for SlotPosition {
    /// One-based, the way slots are labelled for people.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (r{}, c{})", self.drawer_id, self.r + 1, self.c + 1)
    }
}

/// A named `rows × cols` grid of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawer {
    pub id: DrawerId,
    pub name: String,
    pub rows: u32,
    pub cols: u32,
}

impl Entity for Drawer {
    type Id = DrawerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Drawer {
    pub fn new(id: impl Into<DrawerId>, name: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rows,
            cols,
        }
    }

    /// True when `pos` addresses an in-bounds slot of this drawer.
    pub fn contains(&self, pos: &SlotPosition) -> bool {
        pos.drawer_id == self.id && pos.r < self.rows && pos.c < self.cols
    }

    pub fn slot_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Every slot of the drawer in row-major order.
    pub fn slots(&self) -> impl Iterator<Item = SlotPosition> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).map(move |c| SlotPosition::new(self.id.clone(), r, c))
        })
    }
}

/// Placement state of a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement<'a> {
    Unplaced,
    Placed(&'a SlotPosition),
}

/// A tool in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// `None` means uncategorized; written as `""` in snapshots.
    #[serde(default, with = "category_ref")]
    pub category_id: Option<CategoryId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub pos: Option<SlotPosition>,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Item {
    pub fn placement(&self) -> Placement<'_> {
        match &self.pos {
            Some(pos) => Placement::Placed(pos),
            None => Placement::Unplaced,
        }
    }

    pub fn is_placed_at(&self, pos: &SlotPosition) -> bool {
        self.pos.as_ref() == Some(pos)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Text searched by free-text queries: name, notes, location and tags.
    pub fn search_text(&self) -> String {
        format!("{} {} {} {}", self.name, self.notes, self.location, self.tags.join(" "))
    }
}

pub(crate) fn default_quantity() -> u32 {
    1
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire encoding of an optional category reference: absent ⇔ `""`.
mod category_ref {
    use serde::{Deserialize, Deserializer, Serializer};
    use toolbox_core::CategoryId;

    pub fn serialize<S>(value: &Option<CategoryId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map(CategoryId::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(CategoryId::from))
    }
}
