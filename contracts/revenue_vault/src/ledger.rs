//! Calls into the ERC-20 contracts whose revenue the vault shares out.

use ink::primitives::AccountId;
use simple_erc20::Error as TokenError;

pub type Balance = u128;

pub type TransferCallResult =
    Result<ink::MessageResult<Result<(), TokenError>>, ink::env::Error>;
pub type BalanceCallResult = Result<ink::MessageResult<Balance>, ink::env::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The token contract ran and refused the transfer.
    Token(TokenError),
    /// The call never produced a token result.
    Dispatch,
}

#[cfg(not(test))]
pub use self::onchain::{balance_of, transfer};

#[cfg(test)]
pub use self::mock::{balance_of, transfer};

pub fn settle_transfer(result: TransferCallResult) -> Result<(), LedgerError> {
    match result {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(err))) => Err(LedgerError::Token(err)),
        Ok(Err(_)) | Err(_) => Err(LedgerError::Dispatch),
    }
}

pub fn settle_balance(result: BalanceCallResult) -> Result<Balance, LedgerError> {
    match result {
        Ok(Ok(balance)) => Ok(balance),
        Ok(Err(_)) | Err(_) => Err(LedgerError::Dispatch),
    }
}

#[cfg(not(test))]
mod onchain {
    use super::{settle_balance, settle_transfer, AccountId, Balance, LedgerError};
    use ink::codegen::TraitCallBuilder;
    use ink::env::call::FromAccountId;
    use ink::env::DefaultEnvironment;
    use simple_erc20::SimpleErc20Ref;

    fn token_ref(token: AccountId) -> SimpleErc20Ref {
        <SimpleErc20Ref as FromAccountId<DefaultEnvironment>>::from_account_id(token)
    }

    pub fn balance_of(token: AccountId, owner: AccountId) -> Result<Balance, LedgerError> {
        let erc20 = token_ref(token);
        settle_balance(erc20.call().balance_of(owner).try_invoke())
    }

    pub fn transfer(token: AccountId, to: AccountId, value: Balance) -> Result<(), LedgerError> {
        let mut erc20 = token_ref(token);
        settle_transfer(erc20.call_mut().transfer(to, value).try_invoke())
    }
}
