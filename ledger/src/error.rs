use stay_registry::FeeTokenError;
use stay_types::{AccountAddress, Timestamp, TokenId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("zero address")]
    ZeroAddress,

    #[error("{from} does not own token {token_id}")]
    WrongFrom { from: AccountAddress, token_id: TokenId },

    #[error("{caller} is not authorized for token {token_id}")]
    Unauthorized { caller: AccountAddress, token_id: TokenId },

    #[error("caller is not the host")]
    OnlyHost,

    #[error("transfers are paused")]
    TransferWhilePaused,

    #[error("spender already owns token {token_id}")]
    ApprovalExisted { token_id: TokenId },

    #[error("permit spender already owns token {token_id}")]
    ApprovalToCurrentOwner { token_id: TokenId },

    #[error("operator must differ from the caller")]
    WrongOperator,

    #[error("invalid token id range: {from_id} > {to_id}")]
    InvalidTokenId { from_id: TokenId, to_id: TokenId },

    #[error("recipient did not acknowledge the safe transfer")]
    UnsafeRecipient,

    #[error("permit deadline {deadline} has passed")]
    PermitExpired { deadline: Timestamp },

    #[error("invalid permit signature")]
    InvalidPermitSignature,

    #[error("range does not map to exactly one booking")]
    MismatchedBookingIds,

    #[error("range does not span the booking from check-in to check-out")]
    InvalidCheckoutTokenId,

    #[error("fee computation overflowed")]
    FeeOverflow,

    // Deliberately transparent: integrators distinguish ledger-level from
    // fee-token-level failures by the variant.
    #[error(transparent)]
    FeeToken(#[from] FeeTokenError),
}
