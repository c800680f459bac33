// 👤 Customer Entity
//
// Identified by name within the registry. Email is free text.

use indexmap::IndexMap;
use std::fmt;

use crate::error::RegistryError;
use crate::records::CustomerRecord;

/// Partial update: only the `Some` fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CustomerUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        CustomerUpdate {
            name: Some(name.into()),
            email: None,
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        CustomerUpdate {
            name: None,
            email: Some(email.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    email: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Customer {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Overwrite the `Some` fields. Empty values leave the field as it is.
    pub fn modify_info(&mut self, update: CustomerUpdate) {
        if let Some(name) = update.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(email) = update.email.filter(|e| !e.is_empty()) {
            self.email = email;
        }
    }

    pub fn to_record(&self) -> CustomerRecord {
        CustomerRecord {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customer Name: {}", self.name)?;
        write!(f, "Email: {}", self.email)
    }
}

/// Customers keyed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: IndexMap<String, Customer>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer unless the name is taken.
    pub fn register(&mut self, customer: Customer) -> bool {
        if self.customers.contains_key(customer.name()) {
            return false;
        }
        self.customers.insert(customer.name().to_string(), customer);
        true
    }

    /// Insert or overwrite. Last write wins; the old entry is returned.
    pub fn upsert(&mut self, customer: Customer) -> Option<Customer> {
        self.customers.insert(customer.name().to_string(), customer)
    }

    pub fn get(&self, name: &str) -> Option<&Customer> {
        self.customers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.customers.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Customer> {
        self.customers.shift_remove(name)
    }

    /// Apply `update` and re-key under the resulting name.
    ///
    /// Renaming onto another customer's name is refused before any change.
    pub fn update(&mut self, name: &str, update: CustomerUpdate) -> Result<(), RegistryError> {
        if !self.customers.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if let Some(new_name) = update.name.as_deref().filter(|n| !n.is_empty()) {
            if new_name != name && self.customers.contains_key(new_name) {
                return Err(RegistryError::NameTaken(new_name.to_string()));
            }
        }

        let mut customer = self
            .customers
            .shift_remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        customer.modify_info(update);
        self.customers.insert(customer.name().to_string(), customer);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_info() {
        let mut customer = Customer::new("Johnny Cash", "john@cash.com");

        customer.modify_info(CustomerUpdate::email("johnnycash@cash.com"));

        assert_eq!(customer.email(), "johnnycash@cash.com");
        assert_eq!(customer.name(), "Johnny Cash");
    }

    #[test]
    fn test_modify_info_accepts_any_email() {
        let mut customer = Customer::new("Johnny Cash", "john@cash.com");
        customer.modify_info(CustomerUpdate::email("not an email"));
        assert_eq!(customer.email(), "not an email");
    }

    #[test]
    fn test_modify_info_ignores_empty_values() {
        let mut customer = Customer::new("Johnny Cash", "john@cash.com");
        customer.modify_info(CustomerUpdate {
            name: Some(String::new()),
            email: Some(String::new()),
        });
        assert_eq!(customer, Customer::new("Johnny Cash", "john@cash.com"));
    }

    #[test]
    fn test_to_record() {
        let record = Customer::new("Jimmy Page", "JP@LedZep.com").to_record();
        assert_eq!(record.name, "Jimmy Page");
        assert_eq!(record.email, "JP@LedZep.com");
    }

    #[test]
    fn test_register_vs_upsert() {
        let mut registry = CustomerRegistry::new();

        assert!(registry.register(Customer::new("Eddie VH", "evh@esp.com")));
        assert!(!registry.register(Customer::new("Eddie VH", "other@esp.com")));
        assert_eq!(registry.get("Eddie VH").unwrap().email(), "evh@esp.com");

        let old = registry.upsert(Customer::new("Eddie VH", "eddie@5150.com"));
        assert_eq!(old.unwrap().email(), "evh@esp.com");
        assert_eq!(registry.get("Eddie VH").unwrap().email(), "eddie@5150.com");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_rekeys() {
        let mut registry = CustomerRegistry::new();
        registry.register(Customer::new("Eddie VH", "evh@esp.com"));

        registry.update("Eddie VH", CustomerUpdate::rename("Eddie VanH")).unwrap();

        assert!(registry.contains("Eddie VanH"));
        assert!(!registry.contains("Eddie VH"));
        assert_eq!(registry.get("Eddie VanH").unwrap().email(), "evh@esp.com");
    }

    #[test]
    fn test_update_refuses_collision() {
        let mut registry = CustomerRegistry::new();
        registry.register(Customer::new("Lars Ulrich", "lars@metallica.com"));
        registry.register(Customer::new("Kirk Hammett", "KH@metallica.com"));

        let result = registry.update("Kirk Hammett", CustomerUpdate::rename("Lars Ulrich"));

        assert_eq!(result, Err(RegistryError::NameTaken("Lars Ulrich".to_string())));
        assert_eq!(registry.get("Lars Ulrich").unwrap().email(), "lars@metallica.com");
        assert!(registry.contains("Kirk Hammett"));
    }
}
