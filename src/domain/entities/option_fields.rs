use serde::{Deserialize, Serialize};

/// Represents optional field semantics in PATCH/UPDATE requests.
///
/// - `Unchanged` → field not touched
/// - `SetToNull` → explicitly null
/// - `SetToValue` → set to provided value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<T> OptionField<T> {
    /// Convert to nested option:
    /// - `None` → unchanged
    /// - `Some(None)` → set null
    /// - `Some(Some(T))` → set to value
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Unchanged => None,
            Self::SetToNull => Some(None),
            Self::SetToValue(v) => Some(Some(v)),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// If `SetToValue`, consumes and returns inner value.
    pub fn take_value(self) -> Option<T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl<T> From<Option<Option<T>>> for OptionField<T> {
    fn from(opt: Option<Option<T>>) -> Self {
        match opt {
            None => OptionField::Unchanged,
            Some(None) => OptionField::SetToNull,
            Some(Some(v)) => OptionField::SetToValue(v),
        }
    }
}

pub type PatchString = OptionField<String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_option_round_trips_through_variants() {
        assert!(PatchString::from(None).is_unchanged());
        assert_eq!(PatchString::from(Some(None)).into_option(), Some(None));
        assert_eq!(
            PatchString::from(Some(Some("x".to_string()))).value_ref().map(String::as_str),
            Some("x")
        );
    }

    #[test]
    fn missing_fields_deserialize_as_unchanged() {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Patch {
            name: PatchString,
            color: PatchString,
        }

        let patch: Patch = serde_json::from_str(r#"{"name": {"SetToValue": "Beta"}}"#).unwrap();
        assert_eq!(patch.name.take_value().as_deref(), Some("Beta"));
        assert!(patch.color.is_unchanged());
    }
}
