//! The order draft and its fields.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::form::FormError;
use super::quantity::Quantity;

/// One of the seven fields of an [`OrderDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Name,
    Email,
    Phone,
    Address,
    Color,
    Size,
    Quantity,
}

impl DraftField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::Color,
        Self::Size,
        Self::Quantity,
    ];

    /// The input name, which is also the JSON key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Color => "color",
            Self::Size => "size",
            Self::Quantity => "quantity",
        }
    }

    /// Human-readable label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Address => "Delivery Address",
            Self::Color => "Selected Color",
            Self::Size => "Selected Size",
            Self::Quantity => "Quantity",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DraftField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_owned()))
    }
}

/// The in-progress, unsaved order record held in the form.
///
/// Text fields hold exactly what the user typed. Serializes to a JSON object
/// with the seven field names as keys and `quantity` as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub color: String,
    pub size: String,
    pub quantity: Quantity,
}

impl OrderDraft {
    /// Produce a new draft with one field replaced by raw input.
    ///
    /// Text fields store `raw` unchanged. `quantity` is coerced with
    /// [`Quantity::from_input`], so this never fails.
    #[must_use]
    pub fn update_field(mut self, field: DraftField, raw: &str) -> Self {
        match field {
            DraftField::Name => self.name = raw.to_owned(),
            DraftField::Email => self.email = raw.to_owned(),
            DraftField::Phone => self.phone = raw.to_owned(),
            DraftField::Address => self.address = raw.to_owned(),
            DraftField::Color => self.color = raw.to_owned(),
            DraftField::Size => self.size = raw.to_owned(),
            DraftField::Quantity => self.quantity = Quantity::from_input(raw),
        }
        self
    }

    /// Current value of a field as display text.
    #[must_use]
    pub fn value(&self, field: DraftField) -> String {
        match field {
            DraftField::Name => self.name.clone(),
            DraftField::Email => self.email.clone(),
            DraftField::Phone => self.phone.clone(),
            DraftField::Address => self.address.clone(),
            DraftField::Color => self.color.clone(),
            DraftField::Size => self.size.clone(),
            DraftField::Quantity => self.quantity.to_string(),
        }
    }

    /// Fields that would stop a browser from submitting the form: empty
    /// required text, or an email that is not `local@domain`.
    ///
    /// Whitespace-only text counts as filled in. Email is trimmed first, the
    /// way a browser sanitizes an email input.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|&field| match field {
                DraftField::Quantity => false,
                DraftField::Email => Email::parse(self.email.trim()).is_err(),
                _ => self.value(field).is_empty(),
            })
            .collect()
    }

    /// Run the required-field check.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = self.invalid_fields();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(FormError::Validation { fields })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ana() -> OrderDraft {
        OrderDraft {
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            phone: "555".to_string(),
            address: "1 Main St".to_string(),
            color: "Red".to_string(),
            size: "M".to_string(),
            quantity: Quantity::new(2),
        }
    }

    #[test]
    fn test_default_draft() {
        let draft = OrderDraft::default();
        for field in DraftField::ALL {
            if field == DraftField::Quantity {
                assert_eq!(draft.value(field), "1");
            } else {
                assert_eq!(draft.value(field), "");
            }
        }
    }

    #[test]
    fn test_update_text_field_touches_only_that_field() {
        let before = ana();
        for field in DraftField::ALL {
            if field == DraftField::Quantity {
                continue;
            }
            let after = before.clone().update_field(field, "  <changed>\n");
            for other in DraftField::ALL {
                if other == field {
                    assert_eq!(after.value(other), "  <changed>\n");
                } else {
                    assert_eq!(after.value(other), before.value(other));
                }
            }
        }
    }

    #[test]
    fn test_update_quantity() {
        let draft = OrderDraft::default();
        assert_eq!(draft.clone().update_field(DraftField::Quantity, "0").quantity.get(), 1);
        assert_eq!(draft.clone().update_field(DraftField::Quantity, "-9").quantity.get(), 1);
        assert_eq!(draft.clone().update_field(DraftField::Quantity, "5").quantity.get(), 5);
        assert_eq!(draft.update_field(DraftField::Quantity, "five").quantity.get(), 1);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("address".parse::<DraftField>().unwrap(), DraftField::Address);
        assert!(matches!(
            "coupon".parse::<DraftField>(),
            Err(FormError::UnknownField(name)) if name == "coupon"
        ));
    }

    #[test]
    fn test_serializes_seven_keys() {
        let value = serde_json::to_value(ana()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 7);
        for field in DraftField::ALL {
            assert!(object.contains_key(field.name()), "missing {field}");
        }
        assert_eq!(value["quantity"], serde_json::json!(2));
        assert_eq!(value["name"], serde_json::json!("Ana"));
    }

    #[test]
    fn test_deserialize_fills_missing_with_defaults() {
        let draft: OrderDraft = serde_json::from_str(r#"{"name":"Ana","quantity":0}"#).unwrap();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.email, "");
        assert_eq!(draft.quantity, Quantity::MIN);
    }

    #[test]
    fn test_validate_complete_draft() {
        assert!(ana().validate().is_ok());
    }

    #[test]
    fn test_validate_lists_invalid_fields() {
        let draft = ana()
            .update_field(DraftField::Phone, "")
            .update_field(DraftField::Email, "not-an-email");
        let Err(FormError::Validation { fields }) = draft.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(fields, vec![DraftField::Email, DraftField::Phone]);
    }

    #[test]
    fn test_validate_accepts_whitespace_only_text() {
        let draft = ana()
            .update_field(DraftField::Name, " ")
            .update_field(DraftField::Address, "\n")
            .update_field(DraftField::Email, " a@b.com ");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_default_draft_flags_all_text_fields() {
        assert_eq!(OrderDraft::default().invalid_fields().len(), 6);
    }
}
