//! Transaction type codes and their display labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a ledger transaction, as carried in its numeric type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    /// Unknown or unset type.
    #[default]
    None = 0,
    /// Token supply issuance.
    Supply = 1,
    /// Value transfer between accounts.
    Transfer = 2,
    /// Delegate vote.
    Vote = 3,
    /// Delegate registration.
    RegisterDelegate = 4,
    /// Signature by another party.
    OtherSign = 5,
    /// Signature transaction.
    Sign = 6,
    /// Lock funds.
    Lock = 7,
    /// Unlock funds.
    Unlock = 8,
}

impl TransactionType {
    /// Every type in code order.
    pub const ALL: [TransactionType; 9] = [
        TransactionType::None,
        TransactionType::Supply,
        TransactionType::Transfer,
        TransactionType::Vote,
        TransactionType::RegisterDelegate,
        TransactionType::OtherSign,
        TransactionType::Sign,
        TransactionType::Lock,
        TransactionType::Unlock,
    ];

    /// Map a raw type code; anything out of range becomes `None`.
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(TransactionType::None)
    }

    /// Numeric type code.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Display label, e.g. `"TransferTransaction"`.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::None => "None",
            TransactionType::Supply => "SupplyTransaction",
            TransactionType::Transfer => "TransferTransaction",
            TransactionType::Vote => "VoteTransaction",
            TransactionType::RegisterDelegate => "RegisterDelegateTransaction",
            TransactionType::OtherSign => "OtherSignTransaction",
            TransactionType::Sign => "SignTransaction",
            TransactionType::Lock => "LockTransaction",
            TransactionType::Unlock => "UnlockTransaction",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<TransactionType> for u8 {
    fn from(tx_type: TransactionType) -> Self {
        tx_type.code()
    }
}
