//! Approval workflow
//!
//! An ordered, resizable list of approval roles. Role names are free text and
//! may repeat; the signature payload is opaque and forwarded unchanged.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn empty_signature() -> Value {
    Value::Object(serde_json::Map::new())
}

/// One approval slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRole {
    /// Editable role label
    pub role_name: String,
    /// Payload from the signature-capture collaborator
    #[serde(default = "empty_signature")]
    pub signature_data: Value,
}

impl ApprovalRole {
    /// Unsigned role
    #[must_use]
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            signature_data: empty_signature(),
        }
    }

    /// Whether a signature payload has been supplied
    #[must_use]
    pub fn is_signed(&self) -> bool {
        match &self.signature_data {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

/// Ordered approval roles of one form instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApprovalWorkflow {
    roles: Vec<ApprovalRole>,
}

impl ApprovalWorkflow {
    /// Create empty workflow
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { roles: Vec::new() }
    }

    /// Workflow with one unsigned role per name
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: names.into_iter().map(ApprovalRole::new).collect(),
        }
    }

    /// Append an unsigned role; returns its index
    pub fn add_role(&mut self, role_name: impl Into<String>) -> usize {
        self.roles.push(ApprovalRole::new(role_name));
        tracing::debug!(roles = self.roles.len(), "approval role added");
        self.roles.len() - 1
    }

    /// Remove the role at `index`; later roles shift down by one
    ///
    /// # Errors
    /// Returns `RoleOutOfRange` if `index >= len`
    pub fn remove_role(&mut self, index: usize) -> Result<ApprovalRole, StoreError> {
        self.check(index)?;
        let role = self.roles.remove(index);
        tracing::debug!(index, roles = self.roles.len(), "approval role removed");
        Ok(role)
    }

    /// Replace a role's name, returning the old one
    ///
    /// # Errors
    /// Returns `RoleOutOfRange` if `index >= len`
    pub fn rename_role(
        &mut self,
        index: usize,
        role_name: impl Into<String>,
    ) -> Result<String, StoreError> {
        self.check(index)?;
        Ok(std::mem::replace(
            &mut self.roles[index].role_name,
            role_name.into(),
        ))
    }

    /// Replace a role's signature payload, returning the old one
    ///
    /// # Errors
    /// Returns `RoleOutOfRange` if `index >= len`
    pub fn set_signature(&mut self, index: usize, payload: Value) -> Result<Value, StoreError> {
        self.check(index)?;
        Ok(std::mem::replace(
            &mut self.roles[index].signature_data,
            payload,
        ))
    }

    /// Roles in order
    #[inline]
    #[must_use]
    pub fn roles(&self) -> &[ApprovalRole] {
        &self.roles
    }

    /// One role
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ApprovalRole> {
        self.roles.get(index)
    }

    /// Number of roles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if there are no roles
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn check(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.roles.len() {
            return Err(StoreError::RoleOutOfRange {
                index,
                len: self.roles.len(),
            });
        }
        Ok(())
    }
}
