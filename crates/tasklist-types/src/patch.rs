// ============================================================================
// Tri-state Patch Values
// ============================================================================
//
// A partial update must tell apart three situations for an optional field:
// - the key is missing        -> leave the stored value alone
// - the key is present, null  -> clear the stored value
// - the key carries a value   -> overwrite the stored value
//
// `Option<T>` collapses the first two, so update bodies use `Patch<T>` with
// `#[serde(default, skip_serializing_if = "Patch::is_absent")]`.
//
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Transform a value; errors short-circuit, null and absent pass through.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(f(value)?),
        })
    }

    /// Write this patch into a nullable slot. Returns true if the slot was touched.
    pub fn apply_to(self, slot: &mut Option<T>) -> bool {
        match self {
            Patch::Absent => false,
            Patch::Null => {
                *slot = None;
                true
            }
            Patch::Value(value) => {
                *slot = Some(value);
                true
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    // Only invoked when the key exists; a missing key falls back to `Default`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => value.serialize(serializer),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}
