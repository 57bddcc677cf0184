use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod clients;
pub mod products;
pub mod users;

/// Keeps an explicit `null` apart from an absent field: absent is `None`,
/// `null` is `Some(None)`. Use with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
