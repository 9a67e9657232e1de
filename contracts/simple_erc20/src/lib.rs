#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::simple_erc20::{Error, SimpleErc20, SimpleErc20Ref};

/// # SimpleErc20
///
/// Plain ERC-20 ledger backing the red packets: metadata, balances and
/// allowances. The whole supply (`initial_supply × 10^decimals`) is minted
/// to the deployer.
#[ink::contract]
mod simple_erc20 {
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    #[ink(storage)]
    pub struct SimpleErc20 {
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: Balance,
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
    }

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        InsufficientBalance,
        InsufficientAllowance,
        /// Tokens cannot be sent to the zero account.
        InvalidAddress,
        Overflow,
    }

    impl SimpleErc20 {
        /// Mints `initial_supply` whole tokens (scaled by `decimals`) to the caller.
        #[ink(constructor)]
        pub fn new(
            name: String,
            symbol: String,
            decimals: u8,
            initial_supply: Balance,
        ) -> Result<Self, Error> {
            let caller = Self::env().caller();
            let total = 10u128
                .checked_pow(u32::from(decimals))
                .and_then(|unit| initial_supply.checked_mul(unit))
                .ok_or(Error::Overflow)?;

            let mut balances = Mapping::default();
            balances.insert(caller, &total);

            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: total,
            });

            Ok(Self {
                name,
                symbol,
                decimals,
                total_supply: total,
                balances,
                allowances: Mapping::default(),
            })
        }

        #[ink(message)]
        pub fn name(&self) -> String {
            self.name.clone()
        }

        #[ink(message)]
        pub fn symbol(&self) -> String {
            self.symbol.clone()
        }

        #[ink(message)]
        pub fn decimals(&self) -> u8 {
            self.decimals
        }

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> Balance {
            self.balances.get(owner).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let from = self.env().caller();
            self.process_transfer(from, to, value)
        }

        /// Moves `value` from `from` to `to`, spending the caller's allowance.
        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let caller = self.env().caller();
            let allowance = self.allowance(from, caller);

            if allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            self.process_transfer(from, to, value)?;
            self.allowances.insert((from, caller), &(allowance - value));
            Ok(())
        }

        fn process_transfer(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            if to == AccountId::from([0x0; 32]) {
                return Err(Error::InvalidAddress);
            }

            let from_bal = self.balance_of(from);
            if from_bal < value {
                return Err(Error::InsufficientBalance);
            }

            // Self-transfers must not mint.
            self.balances.insert(from, &(from_bal - value));
            let to_bal = self.balance_of(to);
            let credited = to_bal.checked_add(value).ok_or(Error::Overflow)?;
            self.balances.insert(to, &credited);

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value,
            });
            Ok(())
        }
    }

}
