#![cfg_attr(not(feature = "std"), no_std, no_main)]

mod ledger;

pub use self::revenue_vault::{Error, RevenueVault, RevenueVaultRef, TokenId};

pub mod constants {
    /// Stands for the chain's native currency in the supported-token list.
    /// Always entry 0.
    pub const NATIVE_TOKEN: [u8; 32] = [0x0; 32];

    /// 0.01 native (18 decimals) per vault NFT.
    pub const MINT_PRICE: u128 = 10_000_000_000_000_000;

    /// Fixed-point scale of the per-NFT reward accumulator.
    pub const REWARD_PRECISION: u128 = 1_000_000_000_000;

    pub const FIRST_TOKEN_ID: u32 = 1;

    /// Bounds the per-call loop over new NFTs and supported tokens.
    pub const MAX_MINT_PER_CALL: u32 = 50;
}

/// # Revenue Vault
///
/// Sells numbered vault NFTs and shares every revenue token the vault
/// receives pro rata across all NFTs in existence.
///
/// ```text
///   buyer ──mint(n) + n × 0.01──► [RevenueVault]
///   anyone ─native / ERC-20────► [RevenueVault] ──claim(token)──► holder
/// ```
///
/// Revenue becomes claimable once distributed. Distribution runs on
/// `trigger_distribution`, on every `claim` and before every `mint`, so an
/// NFT only earns from revenue that arrived after it was minted.
///
/// Mint payments are not revenue. They accumulate as proceeds the owner
/// withdraws. Accrued rewards belong to the NFT and move with it on transfer.
#[ink::contract]
mod revenue_vault {
    use crate::constants::*;
    use crate::ledger::{self, LedgerError};
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;

    pub type TokenId = u32;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct RevenueVault {
        owner: AccountId,
        /// Revenue tokens, native first.
        supported_tokens: Vec<AccountId>,

        // NFT ownership with owner enumeration.
        total_supply: TokenId,
        owners: Mapping<TokenId, AccountId>,
        balances: Mapping<AccountId, u32>,
        owned_tokens: Mapping<(AccountId, u32), TokenId>,
        owned_index: Mapping<TokenId, u32>,

        /// Scaled reward per NFT accumulated since deployment, per token.
        acc_reward_per_share: Mapping<AccountId, u128>,
        reward_debt: Mapping<(AccountId, TokenId), u128>,
        /// Distributed but not yet claimed, per token.
        accounted: Mapping<AccountId, Balance>,
        /// Native mint payments not yet withdrawn by the owner.
        mint_proceeds: Balance,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        #[ink(topic)]
        id: TokenId,
    }

    #[ink(event)]
    pub struct TokenSupported {
        #[ink(topic)]
        token: AccountId,
    }

    #[ink(event)]
    pub struct RevenueDeposited {
        #[ink(topic)]
        from: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct RevenueDistributed {
        #[ink(topic)]
        token: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct RewardClaimed {
        #[ink(topic)]
        token: AccountId,
        #[ink(topic)]
        holder: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct ProceedsWithdrawn {
        #[ink(topic)]
        to: AccountId,
        amount: Balance,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        NotOwner,
        /// Zero or oversized mint, zero account, or unknown NFT id.
        InvalidArgs,
        /// Less than `count × MINT_PRICE` was sent with `mint`.
        InsufficientPayment,
        TokenNotSupported,
        AlreadySupported,
        NotTokenOwner,
        /// A token or native transfer was refused, or a token could not be queried.
        TokenCallFailed,
        Overflow,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl RevenueVault {
        #[ink(constructor)]
        pub fn new() -> Self {
            let mut supported_tokens = Vec::new();
            supported_tokens.push(AccountId::from(NATIVE_TOKEN));
            Self {
                owner: Self::env().caller(),
                supported_tokens,
                total_supply: 0,
                owners: Mapping::default(),
                balances: Mapping::default(),
                owned_tokens: Mapping::default(),
                owned_index: Mapping::default(),
                acc_reward_per_share: Mapping::default(),
                reward_debt: Mapping::default(),
                accounted: Mapping::default(),
                mint_proceeds: 0,
            }
        }

        // =================================================================
        // REVENUE TOKENS
        // =================================================================

        #[ink(message)]
        pub fn add_supported_token(&mut self, token: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            if self.is_supported(token) {
                return Err(Error::AlreadySupported);
            }
            self.supported_tokens.push(token);
            self.env().emit_event(TokenSupported { token });
            Ok(())
        }

        /// Entry `index` of the supported list; index 0 is the native token.
        #[ink(message)]
        pub fn supported_tokens(&self, index: u32) -> Option<AccountId> {
            self.supported_tokens.get(index as usize).copied()
        }

        #[ink(message)]
        pub fn supported_token_count(&self) -> u32 {
            self.supported_tokens.len() as u32
        }

        // =================================================================
        // MINTING
        // =================================================================

        /// Mints `count` NFTs to the caller for `count × MINT_PRICE`.
        ///
        /// Pending revenue is distributed to existing holders first. Returns
        /// the first new id; ids are consecutive.
        #[ink(message, payable)]
        pub fn mint(&mut self, count: u32) -> Result<TokenId, Error> {
            if count == 0 || count > MAX_MINT_PER_CALL {
                return Err(Error::InvalidArgs);
            }
            let price = MINT_PRICE
                .checked_mul(Balance::from(count))
                .ok_or(Error::Overflow)?;
            let paid = self.env().transferred_value();
            if paid < price {
                return Err(Error::InsufficientPayment);
            }

            let proceeds = self.mint_proceeds.checked_add(paid).ok_or(Error::Overflow)?;
            let first = self.total_supply.checked_add(FIRST_TOKEN_ID).ok_or(Error::Overflow)?;
            let supply = self.total_supply.checked_add(count).ok_or(Error::Overflow)?;

            for token in self.supported_tokens.clone() {
                self.distribute(token, paid)?;
            }
            self.mint_proceeds = proceeds;

            let to = self.env().caller();
            for id in first..=supply {
                for token in &self.supported_tokens {
                    let acc = self.acc_reward_per_share.get(token).unwrap_or(0);
                    self.reward_debt.insert((*token, id), &acc);
                }
                self.owners.insert(id, &to);
                self.add_to_enumeration(to, id)?;
                self.env().emit_event(Transfer {
                    from: None,
                    to: Some(to),
                    id,
                });
            }
            self.total_supply = supply;

            Ok(first)
        }

        // =================================================================
        // REVENUE
        // =================================================================

        /// Accepts native revenue. Plain balance transfers count the same.
        #[ink(message, payable)]
        pub fn deposit(&mut self) {
            let amount = self.env().transferred_value();
            self.env().emit_event(RevenueDeposited {
                from: self.env().caller(),
                amount,
            });
        }

        /// Shares everything received in `token` since the last distribution
        /// across the current NFTs. Returns the amount distributed.
        #[ink(message)]
        pub fn trigger_distribution(&mut self, token: AccountId) -> Result<Balance, Error> {
            self.ensure_supported(token)?;
            self.distribute(token, 0)
        }

        /// Pays the caller everything its NFTs have earned in `token`.
        ///
        /// Rewards stay owed if the payout fails. Returns the amount paid.
        #[ink(message)]
        pub fn claim(&mut self, token: AccountId) -> Result<Balance, Error> {
            self.ensure_supported(token)?;
            self.distribute(token, 0)?;

            let holder = self.env().caller();
            let owed: Vec<(TokenId, Balance)> = self
                .tokens_of(holder)
                .into_iter()
                .map(|id| (id, self.owed(token, id)))
                .filter(|(_, amount)| *amount > 0)
                .collect();
            let total = owed
                .iter()
                .try_fold(0 as Balance, |sum, (_, amount)| sum.checked_add(*amount))
                .ok_or(Error::Overflow)?;
            if total == 0 {
                return Ok(0);
            }

            self.pay(token, holder, total)?;

            for (id, amount) in owed {
                let debt = self.reward_debt.get((token, id)).unwrap_or(0);
                let settled = amount
                    .checked_mul(REWARD_PRECISION)
                    .and_then(|scaled| debt.checked_add(scaled))
                    .ok_or(Error::Overflow)?;
                self.reward_debt.insert((token, id), &settled);
            }
            let accounted = self.accounted.get(token).unwrap_or(0);
            self.accounted
                .insert(token, &accounted.checked_sub(total).ok_or(Error::Overflow)?);

            self.env().emit_event(RewardClaimed {
                token,
                holder,
                amount: total,
            });
            Ok(total)
        }

        /// Distributed, unclaimed reward of NFT `id` in `token`.
        #[ink(message)]
        pub fn pending_reward(&self, token: AccountId, id: TokenId) -> Result<Balance, Error> {
            self.ensure_supported(token)?;
            if !self.owners.contains(id) {
                return Err(Error::InvalidArgs);
            }
            Ok(self.owed(token, id))
        }

        /// Sum of `pending_reward` over every NFT `owner` holds.
        #[ink(message)]
        pub fn pending_reward_all(&self, token: AccountId, owner: AccountId) -> Result<Balance, Error> {
            self.ensure_supported(token)?;
            self.tokens_of(owner)
                .into_iter()
                .try_fold(0 as Balance, |sum, id| sum.checked_add(self.owed(token, id)))
                .ok_or(Error::Overflow)
        }

        // =================================================================
        // NFT
        // =================================================================

        /// Moves NFT `id` with its unclaimed rewards to `to`.
        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, id: TokenId) -> Result<(), Error> {
            let from = self.owners.get(id).ok_or(Error::InvalidArgs)?;
            if from != self.env().caller() {
                return Err(Error::NotTokenOwner);
            }
            if to == AccountId::from(NATIVE_TOKEN) {
                return Err(Error::InvalidArgs);
            }

            self.remove_from_enumeration(from, id)?;
            self.add_to_enumeration(to, id)?;
            self.owners.insert(id, &to);

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                id,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> u32 {
            self.balances.get(owner).unwrap_or(0)
        }

        #[ink(message)]
        pub fn owner_of(&self, id: TokenId) -> Option<AccountId> {
            self.owners.get(id)
        }

        #[ink(message)]
        pub fn token_of_owner_by_index(&self, owner: AccountId, index: u32) -> Option<TokenId> {
            self.owned_tokens.get((owner, index))
        }

        #[ink(message)]
        pub fn total_supply(&self) -> TokenId {
            self.total_supply
        }

        // =================================================================
        // ADMIN FUNCTIONS
        // =================================================================

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn mint_proceeds(&self) -> Balance {
            self.mint_proceeds
        }

        /// Sends all accumulated mint payments to the owner.
        #[ink(message)]
        pub fn withdraw_proceeds(&mut self) -> Result<Balance, Error> {
            self.ensure_owner()?;
            let amount = self.mint_proceeds;
            if amount == 0 {
                return Ok(0);
            }

            let to = self.owner;
            self.pay(AccountId::from(NATIVE_TOKEN), to, amount)?;
            self.mint_proceeds = 0;

            self.env().emit_event(ProceedsWithdrawn { to, amount });
            Ok(amount)
        }

        // =================================================================
        // INTERNALS
        // =================================================================

        /// `in_flight` is native value received by the running call that is
        /// not revenue.
        fn distribute(&mut self, token: AccountId, in_flight: Balance) -> Result<Balance, Error> {
            let supply = Balance::from(self.total_supply);
            if supply == 0 {
                return Ok(0);
            }

            let accounted = self.accounted.get(token).unwrap_or(0);
            let (held, reserved) = if token == AccountId::from(NATIVE_TOKEN) {
                let reserved = accounted
                    .saturating_add(self.mint_proceeds)
                    .saturating_add(in_flight)
                    .saturating_add(self.env().minimum_balance());
                (self.env().balance(), reserved)
            } else {
                let held = ledger::balance_of(token, self.env().account_id())
                    .map_err(|err| Self::token_call_failed(token, err))?;
                (held, accounted)
            };

            let fresh = held.saturating_sub(reserved);
            let increment = fresh.checked_mul(REWARD_PRECISION).ok_or(Error::Overflow)? / supply;
            if increment == 0 {
                return Ok(0);
            }
            // Rounding dust stays undistributed until the next round.
            let distributed = increment.checked_mul(supply).ok_or(Error::Overflow)? / REWARD_PRECISION;

            let acc = self
                .acc_reward_per_share
                .get(token)
                .unwrap_or(0)
                .checked_add(increment)
                .ok_or(Error::Overflow)?;
            let accounted = accounted.checked_add(distributed).ok_or(Error::Overflow)?;
            self.acc_reward_per_share.insert(token, &acc);
            self.accounted.insert(token, &accounted);

            self.env().emit_event(RevenueDistributed {
                token,
                amount: distributed,
            });
            Ok(distributed)
        }

        fn owed(&self, token: AccountId, id: TokenId) -> Balance {
            let acc = self.acc_reward_per_share.get(token).unwrap_or(0);
            let debt = self.reward_debt.get((token, id)).unwrap_or(0);
            acc.saturating_sub(debt) / REWARD_PRECISION
        }

        fn pay(&mut self, token: AccountId, to: AccountId, amount: Balance) -> Result<(), Error> {
            if token == AccountId::from(NATIVE_TOKEN) {
                self.env().transfer(to, amount).map_err(|err| {
                    ink::env::debug_println!("revenue_vault: native transfer failed: {:?}", err);
                    Error::TokenCallFailed
                })
            } else {
                ledger::transfer(token, to, amount).map_err(|err| Self::token_call_failed(token, err))
            }
        }

        fn tokens_of(&self, owner: AccountId) -> Vec<TokenId> {
            (0..self.balance_of(owner))
                .filter_map(|index| self.owned_tokens.get((owner, index)))
                .collect()
        }

        fn add_to_enumeration(&mut self, owner: AccountId, id: TokenId) -> Result<(), Error> {
            let index = self.balance_of(owner);
            self.owned_tokens.insert((owner, index), &id);
            self.owned_index.insert(id, &index);
            self.balances
                .insert(owner, &index.checked_add(1).ok_or(Error::Overflow)?);
            Ok(())
        }

        /// Swap-remove: the owner's last NFT takes the freed slot.
        fn remove_from_enumeration(&mut self, owner: AccountId, id: TokenId) -> Result<(), Error> {
            let last = self.balance_of(owner).checked_sub(1).ok_or(Error::Overflow)?;
            let index = self.owned_index.get(id).ok_or(Error::InvalidArgs)?;
            if index != last {
                let moved = self
                    .owned_tokens
                    .get((owner, last))
                    .ok_or(Error::InvalidArgs)?;
                self.owned_tokens.insert((owner, index), &moved);
                self.owned_index.insert(moved, &index);
            }
            self.owned_tokens.remove((owner, last));
            self.owned_index.remove(id);
            self.balances.insert(owner, &last);
            Ok(())
        }

        fn is_supported(&self, token: AccountId) -> bool {
            self.supported_tokens.contains(&token)
        }

        fn ensure_supported(&self, token: AccountId) -> Result<(), Error> {
            if !self.is_supported(token) {
                return Err(Error::TokenNotSupported);
            }
            Ok(())
        }

        fn ensure_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(())
        }

        fn token_call_failed(token: AccountId, err: LedgerError) -> Error {
            ink::env::debug_println!("revenue_vault: token {:?} call failed: {:?}", token, err);
            Error::TokenCallFailed
        }
    }

    impl Default for RevenueVault {
        fn default() -> Self {
            Self::new()
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::ledger::mock;
        use ink::env::{test, DefaultEnvironment};

        type Env = DefaultEnvironment;

        const ONE_NATIVE: Balance = 1_000_000_000_000_000_000;
        const ONE_USDC: Balance = 1_000_000;

        fn accounts() -> test::DefaultAccounts<Env> {
            test::default_accounts::<Env>()
        }

        fn set_caller(account: AccountId) {
            test::set_caller::<Env>(account);
        }

        fn contract_account() -> AccountId {
            AccountId::from([0x42; 32])
        }

        fn native() -> AccountId {
            AccountId::from(NATIVE_TOKEN)
        }

        fn usdc() -> AccountId {
            AccountId::from([0x5c; 32])
        }

        fn native_balance(account: AccountId) -> Balance {
            test::get_account_balance::<Env>(account).unwrap_or(0)
        }

        fn existential_deposit() -> Balance {
            ink::env::minimum_balance::<Env>()
        }

        /// Adds native funds to the vault as the runtime does before a call.
        fn credit_vault(amount: Balance) {
            let balance = native_balance(contract_account());
            test::set_account_balance::<Env>(contract_account(), balance + amount);
        }

        /// alice deploys and lists USDC; the vault holds only its deposit.
        fn deploy() -> RevenueVault {
            mock::reset();
            test::set_callee::<Env>(contract_account());
            test::set_account_balance::<Env>(contract_account(), existential_deposit());
            set_caller(accounts().alice);
            let mut vault = RevenueVault::new();
            vault.add_supported_token(usdc()).expect("usdc listed");
            vault
        }

        fn mint_paying(
            vault: &mut RevenueVault,
            buyer: AccountId,
            count: u32,
            paid: Balance,
        ) -> Result<TokenId, Error> {
            set_caller(buyer);
            credit_vault(paid);
            test::set_value_transferred::<Env>(paid);
            let minted = vault.mint(count);
            test::set_value_transferred::<Env>(0);
            minted
        }

        fn mint_as(vault: &mut RevenueVault, buyer: AccountId, count: u32) -> TokenId {
            mint_paying(vault, buyer, count, MINT_PRICE * Balance::from(count)).expect("minted")
        }

        /// bob and charlie hold ten NFTs each.
        fn deploy_with_holders() -> RevenueVault {
            let mut vault = deploy();
            mint_as(&mut vault, accounts().bob, 10);
            mint_as(&mut vault, accounts().charlie, 10);
            vault
        }

        /// Recorded events of type `E`, told apart by their signature topic.
        /// `RevenueDeposited` and `RevenueDistributed` encode to the same shape.
        fn emitted<E: ink::env::Event + scale::Decode>() -> Vec<E> {
            let signature = E::SIGNATURE_TOPIC.map(|topic| topic.to_vec());
            test::recorded_events()
                .filter(|event| event.topics.first() == signature.as_ref())
                .filter_map(|event| <E as scale::DecodeAll>::decode_all(&mut &event.data[..]).ok())
                .collect()
        }

        // ── Supported tokens ──────────────────────────────────────────────────

        #[ink::test]
        fn native_token_listed_first_and_usdc_second() {
            let vault = deploy();
            assert_eq!(vault.owner(), accounts().alice);
            assert_eq!(vault.supported_tokens(0), Some(native()));
            assert_eq!(vault.supported_tokens(1), Some(usdc()));
            assert_eq!(vault.supported_tokens(2), None);
            assert_eq!(vault.supported_token_count(), 2);
            assert_eq!(emitted::<TokenSupported>().len(), 1);
        }

        #[ink::test]
        fn only_owner_adds_supported_tokens() {
            let mut vault = deploy();
            set_caller(accounts().bob);
            assert_eq!(
                vault.add_supported_token(AccountId::from([0x77; 32])),
                Err(Error::NotOwner)
            );
            assert_eq!(vault.supported_token_count(), 2);
        }

        #[ink::test]
        fn supported_token_listed_once() {
            let mut vault = deploy();
            assert_eq!(vault.add_supported_token(usdc()), Err(Error::AlreadySupported));
            assert_eq!(vault.add_supported_token(native()), Err(Error::AlreadySupported));
        }

        // ── Minting ───────────────────────────────────────────────────────────

        #[ink::test]
        fn mint_assigns_consecutive_ids_to_buyer() {
            let mut vault = deploy();
            let accs = accounts();

            assert_eq!(mint_as(&mut vault, accs.bob, 1), 1);
            assert_eq!(vault.balance_of(accs.bob), 1);
            assert_eq!(vault.owner_of(1), Some(accs.bob));

            assert_eq!(mint_as(&mut vault, accs.charlie, 3), 2);
            assert_eq!(vault.total_supply(), 4);
            assert_eq!(vault.owner_of(4), Some(accs.charlie));
            assert_eq!(vault.token_of_owner_by_index(accs.charlie, 2), Some(4));
            assert_eq!(vault.token_of_owner_by_index(accs.charlie, 3), None);
            assert_eq!(vault.mint_proceeds(), 4 * MINT_PRICE);

            let minted = emitted::<Transfer>();
            assert_eq!(minted.len(), 4);
            assert_eq!(minted[3].from, None);
            assert_eq!(minted[3].to, Some(accs.charlie));
            assert_eq!(minted[3].id, 4);
        }

        #[ink::test]
        fn mint_with_insufficient_payment_rejected() {
            let mut vault = deploy();
            assert_eq!(
                mint_paying(&mut vault, accounts().bob, 1, MINT_PRICE / 2),
                Err(Error::InsufficientPayment)
            );
            assert_eq!(
                mint_paying(&mut vault, accounts().bob, 10, 9 * MINT_PRICE),
                Err(Error::InsufficientPayment)
            );
            assert_eq!(vault.total_supply(), 0);
            assert_eq!(vault.balance_of(accounts().bob), 0);
            assert_eq!(vault.mint_proceeds(), 0);
        }

        #[ink::test]
        fn mint_count_must_be_in_range() {
            let mut vault = deploy();
            assert_eq!(mint_paying(&mut vault, accounts().bob, 0, MINT_PRICE), Err(Error::InvalidArgs));
            let too_many = MAX_MINT_PER_CALL + 1;
            assert_eq!(
                mint_paying(&mut vault, accounts().bob, too_many, MINT_PRICE * Balance::from(too_many)),
                Err(Error::InvalidArgs)
            );
        }

        // ── Native revenue ────────────────────────────────────────────────────

        #[ink::test]
        fn native_revenue_split_by_holdings_excluding_mint_payments() {
            let mut vault = deploy_with_holders();
            let accs = accounts();

            set_caller(accs.alice);
            credit_vault(2 * ONE_NATIVE);
            test::set_value_transferred::<Env>(2 * ONE_NATIVE);
            vault.deposit();
            test::set_value_transferred::<Env>(0);

            let before = native_balance(accs.bob);
            set_caller(accs.bob);
            assert_eq!(vault.claim(native()), Ok(ONE_NATIVE));
            assert_eq!(native_balance(accs.bob), before + ONE_NATIVE);

            set_caller(accs.charlie);
            assert_eq!(vault.claim(native()), Ok(ONE_NATIVE));

            // only the deposit and the mint proceeds remain
            assert_eq!(
                native_balance(contract_account()),
                existential_deposit() + 20 * MINT_PRICE
            );
            let distributed = emitted::<RevenueDistributed>();
            assert_eq!(distributed.len(), 1);
            assert_eq!(distributed[0].amount, 2 * ONE_NATIVE);
        }

        #[ink::test]
        fn owner_withdraws_mint_proceeds() {
            let mut vault = deploy_with_holders();
            let alice = accounts().alice;
            let before = native_balance(alice);

            set_caller(alice);
            assert_eq!(vault.withdraw_proceeds(), Ok(20 * MINT_PRICE));
            assert_eq!(native_balance(alice), before + 20 * MINT_PRICE);
            assert_eq!(vault.mint_proceeds(), 0);
            assert_eq!(native_balance(contract_account()), existential_deposit());
            assert_eq!(vault.withdraw_proceeds(), Ok(0));

            // proceeds were never revenue
            assert_eq!(vault.trigger_distribution(native()), Ok(0));
        }

        #[ink::test]
        fn non_owner_cannot_withdraw_proceeds() {
            let mut vault = deploy_with_holders();
            set_caller(accounts().bob);
            assert_eq!(vault.withdraw_proceeds(), Err(Error::NotOwner));
            assert_eq!(vault.mint_proceeds(), 20 * MINT_PRICE);
        }

        // ── ERC-20 revenue ────────────────────────────────────────────────────

        #[ink::test]
        fn usdc_revenue_split_after_trigger() {
            let mut vault = deploy_with_holders();
            let accs = accounts();
            mock::mint(usdc(), contract_account(), 200 * ONE_USDC);

            set_caller(accs.bob);
            assert_eq!(vault.trigger_distribution(usdc()), Ok(200 * ONE_USDC));

            let first = vault.token_of_owner_by_index(accs.bob, 0).unwrap();
            assert_eq!(vault.pending_reward(usdc(), first), Ok(10 * ONE_USDC));
            assert_eq!(vault.pending_reward_all(usdc(), accs.bob), Ok(100 * ONE_USDC));

            assert_eq!(vault.claim(usdc()), Ok(100 * ONE_USDC));
            assert_eq!(mock::holding(usdc(), accs.bob), 100 * ONE_USDC);
            assert_eq!(mock::holding(usdc(), contract_account()), 100 * ONE_USDC);
            assert_eq!(vault.pending_reward_all(usdc(), accs.bob), Ok(0));
            assert_eq!(vault.pending_reward_all(usdc(), accs.charlie), Ok(100 * ONE_USDC));

            let claimed = emitted::<RewardClaimed>();
            assert_eq!(claimed.len(), 1);
            assert_eq!(claimed[0].holder, accs.bob);
            assert_eq!(claimed[0].token, usdc());
        }

        #[ink::test]
        fn second_claim_pays_nothing() {
            let mut vault = deploy_with_holders();
            mock::mint(usdc(), contract_account(), 200 * ONE_USDC);
            set_caller(accounts().bob);
            assert_eq!(vault.claim(usdc()), Ok(100 * ONE_USDC));
            assert_eq!(vault.claim(usdc()), Ok(0));
            assert_eq!(vault.trigger_distribution(usdc()), Ok(0));
        }

        #[ink::test]
        fn late_minter_earns_only_later_revenue() {
            let mut vault = deploy();
            let accs = accounts();
            mint_as(&mut vault, accs.bob, 10);

            // arrives before charlie mints, never explicitly distributed
            mock::mint(usdc(), contract_account(), 100 * ONE_USDC);
            mint_as(&mut vault, accs.charlie, 10);
            assert_eq!(vault.pending_reward_all(usdc(), accs.bob), Ok(100 * ONE_USDC));
            assert_eq!(vault.pending_reward_all(usdc(), accs.charlie), Ok(0));

            mock::mint(usdc(), contract_account(), 100 * ONE_USDC);
            assert_eq!(vault.trigger_distribution(usdc()), Ok(100 * ONE_USDC));
            assert_eq!(vault.pending_reward_all(usdc(), accs.bob), Ok(150 * ONE_USDC));
            assert_eq!(vault.pending_reward_all(usdc(), accs.charlie), Ok(50 * ONE_USDC));
        }

        #[ink::test]
        fn failed_payout_keeps_rewards_owed() {
            let mut vault = deploy_with_holders();
            mock::mint(usdc(), contract_account(), 200 * ONE_USDC);

            set_caller(accounts().bob);
            mock::reject_next_transfer();
            assert_eq!(vault.claim(usdc()), Err(Error::TokenCallFailed));
            assert_eq!(vault.pending_reward_all(usdc(), accounts().bob), Ok(100 * ONE_USDC));
            assert!(emitted::<RewardClaimed>().is_empty());

            assert_eq!(vault.claim(usdc()), Ok(100 * ONE_USDC));
        }

        #[ink::test]
        fn unsupported_token_rejected() {
            let mut vault = deploy_with_holders();
            let unknown = AccountId::from([0x77; 32]);
            assert_eq!(vault.trigger_distribution(unknown), Err(Error::TokenNotSupported));
            assert_eq!(vault.claim(unknown), Err(Error::TokenNotSupported));
            assert_eq!(vault.pending_reward(unknown, 1), Err(Error::TokenNotSupported));
            assert_eq!(
                vault.pending_reward_all(unknown, accounts().bob),
                Err(Error::TokenNotSupported)
            );
        }

        #[ink::test]
        fn pending_reward_unknown_id_rejected() {
            let vault = deploy_with_holders();
            assert_eq!(vault.pending_reward(usdc(), 21), Err(Error::InvalidArgs));
        }

        #[ink::test]
        fn revenue_without_holders_stays_undistributed() {
            let mut vault = deploy();
            mock::mint(usdc(), contract_account(), 100 * ONE_USDC);
            assert_eq!(vault.trigger_distribution(usdc()), Ok(0));

            // the first buyer picks it up at the next distribution
            mint_as(&mut vault, accounts().bob, 1);
            assert_eq!(vault.trigger_distribution(usdc()), Ok(100 * ONE_USDC));
            assert_eq!(vault.pending_reward(usdc(), 1), Ok(100 * ONE_USDC));
        }

        #[ink::test]
        fn rounding_dust_carried_to_next_distribution() {
            let mut vault = deploy();
            mint_as(&mut vault, accounts().bob, 3);
            mock::mint(usdc(), contract_account(), 100);

            // 100 × 10^12 / 3 leaves a remainder, so one unit waits
            assert_eq!(vault.trigger_distribution(usdc()), Ok(99));
            assert_eq!(vault.pending_reward_all(usdc(), accounts().bob), Ok(99));

            mock::mint(usdc(), contract_account(), 2);
            assert_eq!(vault.trigger_distribution(usdc()), Ok(3));
        }

        // ── NFT transfers ─────────────────────────────────────────────────────

        #[ink::test]
        fn rewards_follow_transferred_nft() {
            let mut vault = deploy();
            let accs = accounts();
            mint_as(&mut vault, accs.bob, 2);
            mock::mint(usdc(), contract_account(), 100 * ONE_USDC);
            vault.trigger_distribution(usdc()).unwrap();

            set_caller(accs.bob);
            assert_eq!(vault.transfer(accs.django, 1), Ok(()));
            assert_eq!(vault.owner_of(1), Some(accs.django));
            assert_eq!(vault.token_of_owner_by_index(accs.bob, 0), Some(2));
            assert_eq!(vault.token_of_owner_by_index(accs.bob, 1), None);
            assert_eq!(vault.token_of_owner_by_index(accs.django, 0), Some(1));

            assert_eq!(vault.pending_reward_all(usdc(), accs.bob), Ok(50 * ONE_USDC));
            set_caller(accs.django);
            assert_eq!(vault.claim(usdc()), Ok(50 * ONE_USDC));
            assert_eq!(mock::holding(usdc(), accs.django), 50 * ONE_USDC);
        }

        #[ink::test]
        fn only_holder_transfers_nft() {
            let mut vault = deploy_with_holders();
            let accs = accounts();
            set_caller(accs.charlie);
            assert_eq!(vault.transfer(accs.charlie, 1), Err(Error::NotTokenOwner));
            assert_eq!(vault.transfer(accs.charlie, 99), Err(Error::InvalidArgs));

            set_caller(accs.bob);
            assert_eq!(vault.transfer(native(), 1), Err(Error::InvalidArgs));
            assert_eq!(vault.owner_of(1), Some(accs.bob));
            assert_eq!(vault.balance_of(accs.bob), 10);
        }
    }
}
