//! Partial-update merge utility
//!
//! PATCH request bodies only carry the fields a client wants to change. Each
//! request DTO describes that with two field shapes:
//!
//! - `Option<T>` for fields that are required on the entity. `None` (the field
//!   was omitted or sent as `null`) leaves the entity value untouched.
//! - [`Patch<T>`] for fields that are optional on the entity. Omitting the field
//!   leaves it untouched, an explicit `null` clears it and a value replaces it.
//!
//! Omission therefore never clears anything. DTOs implement [`Merge`] with one
//! line per field using [`set_if_present`] and [`Patch::apply_to`].
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use todoback_shared::patch::{set_if_present, Merge, Patch};
//!
//! struct Profile {
//!     name: String,
//!     avatar: Option<String>,
//! }
//!
//! #[derive(Deserialize)]
//! struct ProfilePatch {
//!     name: Option<String>,
//!     #[serde(default)]
//!     avatar: Patch<String>,
//! }
//!
//! impl Merge<Profile> for ProfilePatch {
//!     fn merge_into(self, target: &mut Profile) {
//!         set_if_present(&mut target.name, self.name);
//!         self.avatar.apply_to(&mut target.avatar);
//!     }
//! }
//!
//! let mut profile = Profile { name: "old".into(), avatar: Some("a.png".into()) };
//! let patch: ProfilePatch = serde_json::from_str(r#"{"avatar": null}"#).unwrap();
//! patch.merge_into(&mut profile);
//!
//! assert_eq!(profile.name, "old");
//! assert_eq!(profile.avatar, None);
//! ```

use serde::{Deserialize, Deserializer};

/// Tri-state value for a patchable optional field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was not part of the request
    Absent,
    /// Field was sent as an explicit `null`
    Null,
    /// Field was sent with a value
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// Returns true if the field was omitted from the request
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Returns the new value if one was supplied
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Applies the patch to an optional target field
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(value) => *target = Some(value),
        }
    }
}

// `Absent` comes from `#[serde(default)]` on the field; anything the
// deserializer actually sees is either `null` or a value.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Copies the supplied fields of a request DTO onto an entity
pub trait Merge<T> {
    fn merge_into(self, target: &mut T);
}

/// Overwrites `target` when the request carried a value
pub fn set_if_present<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        image: Patch<u32>,
    }

    #[test]
    fn test_missing_field_is_absent() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.image.is_absent());
    }

    #[test]
    fn test_null_field_is_null() {
        let body: Body = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(body.image, Patch::Null);
    }

    #[test]
    fn test_value_field_is_value() {
        let body: Body = serde_json::from_str(r#"{"image": 7}"#).unwrap();
        assert_eq!(body.image.value(), Some(&7));
    }

    #[test]
    fn test_apply_to() {
        let mut target = Some(1);
        Patch::Absent.apply_to(&mut target);
        assert_eq!(target, Some(1));

        Patch::Value(2).apply_to(&mut target);
        assert_eq!(target, Some(2));

        Patch::Null.apply_to(&mut target);
        assert_eq!(target, None);
    }

    #[test]
    fn test_set_if_present() {
        let mut title = String::from("keep");
        set_if_present(&mut title, None);
        assert_eq!(title, "keep");

        set_if_present(&mut title, Some("new".to_string()));
        assert_eq!(title, "new");
    }
}
