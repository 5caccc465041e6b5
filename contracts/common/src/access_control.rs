//! Access Control Module
//!
//! Role-based permissions for reward issuance. The deployer of a token holds
//! `DefaultAdmin` and may grant or revoke roles; only holders of `Minter`
//! may create reward tokens.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Vec, FluxError, FluxResult};
use crate::types::Address;

// ============================================================================
// Types
// ============================================================================

/// Token roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum Role {
    /// Can grant and revoke roles
    DefaultAdmin,
    /// Can mint tokens
    Minter,
}

impl Role {
    /// Canonical role name
    pub fn name(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Role::Minter => "MINTER_ROLE",
        }
    }

    /// 32-byte role identifier; the admin role is all zeros
    pub fn id(&self) -> [u8; 32] {
        match self {
            Role::DefaultAdmin => [0u8; 32],
            _ => {
                let digest = Sha256::digest(self.name().as_bytes());
                let mut id = [0u8; 32];
                id.copy_from_slice(&digest);
                id
            }
        }
    }
}

/// Role assignment for an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Address with the role
    pub address: Address,
    /// Assigned role
    pub role: Role,
    /// Who granted it
    pub granted_by: Address,
    /// Whether the assignment is still in force
    pub is_active: bool,
}

impl RoleAssignment {
    /// Create an active assignment
    pub fn new(address: Address, role: Role, granted_by: Address) -> Self {
        Self {
            address,
            role,
            granted_by,
            is_active: true,
        }
    }
}

/// Access control state
#[derive(Debug, Clone)]
pub struct AccessControlState {
    /// Deployer, holds an irrevocable admin role
    pub admin: Address,
    /// Role assignments
    pub roles: Vec<RoleAssignment>,
}

impl AccessControlState {
    /// Create new state with `admin` as the default admin
    pub fn new(admin: Address) -> Self {
        let mut roles = Vec::new();
        roles.push(RoleAssignment::new(admin, Role::DefaultAdmin, admin));
        Self { admin, roles }
    }
}

// ============================================================================
// Core Access Control Functions
// ============================================================================

/// Check if address has a specific role
pub fn has_role(state: &AccessControlState, address: &Address, role: Role) -> bool {
    state
        .roles
        .iter()
        .any(|r| r.address == *address && r.role == role && r.is_active)
}

/// Grant a role to an address. Returns false if it was already held.
pub fn grant_role(
    state: &mut AccessControlState,
    granter: Address,
    grantee: Address,
    role: Role,
) -> FluxResult<bool> {
    if !has_role(state, &granter, Role::DefaultAdmin) {
        return Err(FluxError::AdminOnly);
    }

    if has_role(state, &grantee, role) {
        return Ok(false);
    }

    state.roles.push(RoleAssignment::new(grantee, role, granter));
    Ok(true)
}

/// Revoke a role from an address. Returns false if it was not held.
pub fn revoke_role(
    state: &mut AccessControlState,
    revoker: Address,
    target: Address,
    role: Role,
) -> FluxResult<bool> {
    // The deployer keeps admin forever
    if target == state.admin && role == Role::DefaultAdmin {
        return Err(FluxError::InvalidOperation);
    }

    if !has_role(state, &revoker, Role::DefaultAdmin) {
        return Err(FluxError::AdminOnly);
    }

    let mut revoked = false;
    for r in state.roles.iter_mut() {
        if r.address == target && r.role == role && r.is_active {
            r.is_active = false;
            revoked = true;
        }
    }

    Ok(revoked)
}

/// All active roles of an address
pub fn roles_of(state: &AccessControlState, address: &Address) -> Vec<Role> {
    let mut roles: Vec<Role> = state
        .roles
        .iter()
        .filter(|r| r.address == *address && r.is_active)
        .map(|r| r.role)
        .collect();
    roles.sort();
    roles.dedup();
    roles
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Address {
        [1u8; 32]
    }

    fn farm() -> Address {
        [2u8; 32]
    }

    fn stranger() -> Address {
        [3u8; 32]
    }

    #[test]
    fn test_new_state() {
        let state = AccessControlState::new(admin());
        assert!(has_role(&state, &admin(), Role::DefaultAdmin));
        assert!(!has_role(&state, &admin(), Role::Minter));
    }

    #[test]
    fn test_role_ids() {
        assert_eq!(Role::DefaultAdmin.id(), [0u8; 32]);
        assert_ne!(Role::Minter.id(), [0u8; 32]);
        assert_eq!(Role::Minter.name(), "MINTER_ROLE");
    }

    #[test]
    fn test_grant_role() {
        let mut state = AccessControlState::new(admin());

        assert!(grant_role(&mut state, admin(), farm(), Role::Minter).unwrap());
        assert!(has_role(&state, &farm(), Role::Minter));

        // Granting twice is a no-op
        assert!(!grant_role(&mut state, admin(), farm(), Role::Minter).unwrap());
        assert_eq!(state.roles.len(), 2);
    }

    #[test]
    fn test_grant_role_unauthorized() {
        let mut state = AccessControlState::new(admin());
        let result = grant_role(&mut state, stranger(), stranger(), Role::Minter);
        assert_eq!(result, Err(FluxError::AdminOnly));
    }

    #[test]
    fn test_revoke_role() {
        let mut state = AccessControlState::new(admin());
        grant_role(&mut state, admin(), farm(), Role::Minter).unwrap();

        assert!(revoke_role(&mut state, admin(), farm(), Role::Minter).unwrap());
        assert!(!has_role(&state, &farm(), Role::Minter));
        assert!(!revoke_role(&mut state, admin(), farm(), Role::Minter).unwrap());
    }

    #[test]
    fn test_cannot_revoke_deployer_admin() {
        let mut state = AccessControlState::new(admin());
        let result = revoke_role(&mut state, admin(), admin(), Role::DefaultAdmin);
        assert_eq!(result, Err(FluxError::InvalidOperation));
    }

    #[test]
    fn test_roles_of() {
        let mut state = AccessControlState::new(admin());
        grant_role(&mut state, admin(), admin(), Role::Minter).unwrap();
        assert_eq!(roles_of(&state, &admin()), vec![Role::DefaultAdmin, Role::Minter]);
        assert!(roles_of(&state, &stranger()).is_empty());
    }
}
