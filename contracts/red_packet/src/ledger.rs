//! Calls into the token contract that holds packet funds.
//!
//! Calls go through the typed `SimpleErc20Ref` builder, so a renamed message
//! or a changed argument list breaks the build rather than the payout.

use ink::primitives::AccountId;
use simple_erc20::Error as TokenError;

pub type Balance = u128;

/// What `try_invoke` hands back for a token message returning `Result<(), Error>`.
pub type TokenCallResult = Result<ink::MessageResult<Result<(), TokenError>>, ink::env::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The token contract ran and refused the transfer.
    Token(TokenError),
    /// The call never produced a token result (trap, missing contract, bad selector).
    Dispatch,
}

#[cfg(not(test))]
pub use self::onchain::{transfer, transfer_from};

#[cfg(test)]
pub use self::mock::{transfer, transfer_from};

/// Only a token result of `Ok(())` counts as a completed transfer.
pub fn settle(result: TokenCallResult) -> Result<(), LedgerError> {
    match result {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(err))) => Err(LedgerError::Token(err)),
        Ok(Err(_)) | Err(_) => Err(LedgerError::Dispatch),
    }
}

#[cfg(not(test))]
mod onchain {
    use super::{settle, AccountId, Balance, LedgerError};
    use ink::codegen::TraitCallBuilder;
    use ink::env::call::FromAccountId;
    use ink::env::DefaultEnvironment;
    use simple_erc20::SimpleErc20Ref;

    fn token_ref(token: AccountId) -> SimpleErc20Ref {
        <SimpleErc20Ref as FromAccountId<DefaultEnvironment>>::from_account_id(token)
    }

    /// `token.transfer_from(from, to, value)` with this contract as spender.
    pub fn transfer_from(
        token: AccountId,
        from: AccountId,
        to: AccountId,
        value: Balance,
    ) -> Result<(), LedgerError> {
        let mut erc20 = token_ref(token);
        settle(erc20.call_mut().transfer_from(from, to, value).try_invoke())
    }

    /// `token.transfer(to, value)` out of this contract's balance.
    pub fn transfer(token: AccountId, to: AccountId, value: Balance) -> Result<(), LedgerError> {
        let mut erc20 = token_ref(token);
        settle(erc20.call_mut().transfer(to, value).try_invoke())
    }
}
