use serde::{Deserialize, Serialize};

use degen_core::{LedgerError, LedgerResult, PrincipalId};

/// Holds the single privileged principal of a token deployment.
///
/// The owner is fixed at construction; there is no transfer operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: PrincipalId,
}

impl AccessControl {
    pub fn new(owner: PrincipalId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    pub fn is_owner(&self, caller: PrincipalId) -> bool {
        self.owner == caller
    }

    /// Guard for owner-only operations.
    ///
    /// - No IO
    /// - No panics
    /// - Must run before the guarded operation touches any state
    pub fn require_owner(&self, caller: PrincipalId) -> LedgerResult<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::NotOwner)
        }
    }
}
