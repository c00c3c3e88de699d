//! Contact record.

use serde::Serialize;

use super::validation::{
    self, ValidationError, MAX_ADDRESS_LENGTH, MAX_ID_LENGTH, MAX_NAME_LENGTH, PHONE_LENGTH,
};
use super::DomainRecord;

/// A contact entry.
///
/// Field constraints:
/// - `contact_id`: 1-10 characters after trimming, immutable
/// - `first_name` / `last_name`: 1-10 characters after trimming
/// - `phone`: exactly 10 ASCII digits
/// - `address`: 1-30 characters after trimming
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    contact_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
    version: i64,
}

/// New values for every mutable `Contact` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPatch {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl Contact {
    /// Creates a validated contact with version 0.
    pub fn new(
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        Self::hydrate(contact_id, first_name, last_name, phone, address, 0)
    }

    /// Reconstructs a contact from stored fields, keeping its stored version.
    ///
    /// Used by persistence mappers; applies the same structural validation
    /// as [`Contact::new`].
    pub fn hydrate(
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
        version: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            contact_id: validation::validate_trimmed_length(
                contact_id,
                "contactId",
                1,
                MAX_ID_LENGTH,
            )?,
            first_name: validation::validate_trimmed_length(
                first_name,
                "firstName",
                1,
                MAX_NAME_LENGTH,
            )?,
            last_name: validation::validate_trimmed_length(
                last_name,
                "lastName",
                1,
                MAX_NAME_LENGTH,
            )?,
            phone: validation::validate_digits(phone, "phone", PHONE_LENGTH)?,
            address: validation::validate_trimmed_length(address, "address", 1, MAX_ADDRESS_LENGTH)?,
            version,
        })
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl DomainRecord for Contact {
    type Patch = ContactPatch;

    const KIND: &'static str = "contact";
    const ID_FIELD: &'static str = "contactId";

    fn record_id(&self) -> &str {
        &self.contact_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, patch: &ContactPatch) -> Result<(), ValidationError> {
        // Validate every incoming value before mutating any field.
        let first_name =
            validation::validate_trimmed_length(&patch.first_name, "firstName", 1, MAX_NAME_LENGTH)?;
        let last_name =
            validation::validate_trimmed_length(&patch.last_name, "lastName", 1, MAX_NAME_LENGTH)?;
        let phone = validation::validate_digits(&patch.phone, "phone", PHONE_LENGTH)?;
        let address =
            validation::validate_trimmed_length(&patch.address, "address", 1, MAX_ADDRESS_LENGTH)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.phone = phone;
        self.address = address;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Contact {
        Contact::new("C1", "Ada", "Lovelace", "5551234567", "12 Analytical Way").unwrap()
    }

    #[test]
    fn new_trims_and_validates() {
        let contact = Contact::new(" C1 ", "  Ada ", "Lovelace", "5551234567", " 12 Way ").unwrap();
        assert_eq!(contact.contact_id(), "C1");
        assert_eq!(contact.first_name(), "Ada");
        assert_eq!(contact.address(), "12 Way");
        assert_eq!(contact.version(), 0);
    }

    #[test]
    fn new_rejects_bad_phone() {
        let err = Contact::new("C1", "Ada", "Lovelace", "555-123-45", "addr").unwrap_err();
        assert_eq!(err.field, "phone");
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut contact = sample();
        let bad = ContactPatch {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone: "not-a-phone".to_string(),
            address: "17 Navy Yard".to_string(),
        };
        assert!(contact.apply(&bad).is_err());
        // Nothing changed, including the fields that would have validated.
        assert_eq!(contact, sample());
    }

    #[test]
    fn apply_updates_all_mutable_fields() {
        let mut contact = sample();
        let patch = ContactPatch {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone: "5559876543".to_string(),
            address: "17 Navy Yard".to_string(),
        };
        contact.apply(&patch).unwrap();
        assert_eq!(contact.first_name(), "Grace");
        assert_eq!(contact.phone(), "5559876543");
        // The id never changes.
        assert_eq!(contact.contact_id(), "C1");
    }
}
