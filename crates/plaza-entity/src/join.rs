//! Join-shape normalization for embedded sub-records.
//!
//! The backend is inconsistent about how it embeds a joined relation: the
//! same select clause can yield a single object or a one-element collection
//! depending on how the relationship is resolved. Every record that crosses
//! into the application goes through [`one_or_many`], which canonicalizes
//! the shape: a collection unwraps to its first element, an object passes
//! through, and an empty collection or null becomes `None`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Deserializes a joined sub-record that may arrive as either a single
/// object or a collection. Pair with `#[serde(default)]` so an absent key
/// also normalizes to `None`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(OneOrMany::One(item)) => Some(item),
        Some(OneOrMany::Many(items)) => items.into_iter().next(),
    })
}
