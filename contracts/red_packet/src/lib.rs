#![cfg_attr(not(feature = "std"), no_std, no_main)]

mod ledger;

pub use self::red_packet::{
    Commitment, Error, Packet, PacketId, PacketInfo, RedPacket, RedPacketRef,
};

pub mod constants {
    /// Id handed to the first packet. Ids are sequential and never reused.
    pub const FIRST_PACKET_ID: u64 = 1;

    /// The null account: never a valid token or owner.
    pub const ZERO_ACCOUNT: [u8; 32] = [0x0; 32];
}

/// # Red Packet
///
/// Password-gated, one-time-claimable token allocations.
///
/// ```text
///   creator ──create_packet──► [RedPacket] ──transfer_from──► [token]
///   claimant ──claim_packet──► [RedPacket] ──transfer───────► [token]
/// ```
///
/// A packet holds `amount` of one ERC-20 `token`, pulled from its creator at
/// creation. Anyone presenting the password can claim it once; the whole
/// amount goes to the claimant and the packet becomes inert.
///
/// Lifecycle per packet: `Created → Claimed` (terminal). Records are never
/// deleted, so claimed packets stay queryable.
///
/// Only the Keccak-256 commitment of the password is stored.
#[ink::contract]
mod red_packet {
    use crate::constants::*;
    use crate::ledger::{self, LedgerError};
    use ink::env::hash::{HashOutput, Keccak256};
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    pub type PacketId = u64;
    pub type Commitment = [u8; 32];

    // =========================================================================
    // STORAGE
    // =========================================================================

    /// Stored packet record. Its id is the `packets` map key, not a field.
    #[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct Packet {
        pub creator: AccountId,
        pub token: AccountId,
        pub amount: Balance,
        pub password_hash: Commitment,
        pub claimed: bool,
    }

    /// Public view of a packet. The commitment is not exposed.
    #[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub struct PacketInfo {
        pub id: PacketId,
        pub creator: AccountId,
        pub token: AccountId,
        pub amount: Balance,
        pub claimed: bool,
    }

    #[ink(storage)]
    pub struct RedPacket {
        owner: AccountId,
        /// Id the next created packet receives.
        next_packet_id: PacketId,
        packets: Mapping<PacketId, Packet>,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Created {
        #[ink(topic)]
        id: PacketId,
        #[ink(topic)]
        creator: AccountId,
        #[ink(topic)]
        token: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct Claimed {
        #[ink(topic)]
        id: PacketId,
        #[ink(topic)]
        claimant: AccountId,
        amount: Balance,
    }

    /// Owner pulled funds out of custody without touching any packet.
    #[ink(event)]
    pub struct EmergencyWithdrawal {
        #[ink(topic)]
        token: AccountId,
        to: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous_owner: AccountId,
        #[ink(topic)]
        new_owner: AccountId,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        /// Zero amount, zero account, or unknown packet id.
        InvalidArgs,
        WrongPassword,
        AlreadyClaimed,
        NotOwner,
        /// The token contract refused the transfer or could not be called.
        TransferFailed,
        /// Packet ids exhausted.
        Overflow,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl RedPacket {
        #[ink(constructor)]
        pub fn new() -> Self {
            Self {
                owner: Self::env().caller(),
                next_packet_id: FIRST_PACKET_ID,
                packets: Mapping::default(),
            }
        }

        /// Locks `amount` of `token` behind `password`.
        ///
        /// The caller must have approved this contract for at least `amount`
        /// on `token`. Returns the new packet id.
        #[ink(message)]
        pub fn create_packet(
            &mut self,
            token: AccountId,
            amount: Balance,
            password: String,
        ) -> Result<PacketId, Error> {
            if amount == 0 || token == AccountId::from(ZERO_ACCOUNT) {
                return Err(Error::InvalidArgs);
            }

            let creator = self.env().caller();
            let id = self.next_packet_id;
            let next_id = id.checked_add(1).ok_or(Error::Overflow)?;

            let custody = self.env().account_id();
            ledger::transfer_from(token, creator, custody, amount)
                .map_err(|err| Self::transfer_failed(token, err))?;

            self.packets.insert(
                id,
                &Packet {
                    creator,
                    token,
                    amount,
                    password_hash: commit(&password),
                    claimed: false,
                },
            );
            self.next_packet_id = next_id;

            self.env().emit_event(Created {
                id,
                creator,
                token,
                amount,
            });

            Ok(id)
        }

        /// Pays the whole packet to the caller if `password` matches.
        ///
        /// Checks run existence, then claimed flag, then password, so a spent
        /// packet answers `AlreadyClaimed` whatever password is offered. The
        /// packet is marked claimed only once the payout transfer succeeded.
        #[ink(message)]
        pub fn claim_packet(&mut self, id: PacketId, password: String) -> Result<(), Error> {
            let mut packet = self.packets.get(id).ok_or(Error::InvalidArgs)?;

            if packet.claimed {
                return Err(Error::AlreadyClaimed);
            }
            if commit(&password) != packet.password_hash {
                return Err(Error::WrongPassword);
            }

            let claimant = self.env().caller();
            ledger::transfer(packet.token, claimant, packet.amount)
                .map_err(|err| Self::transfer_failed(packet.token, err))?;

            packet.claimed = true;
            self.packets.insert(id, &packet);

            self.env().emit_event(Claimed {
                id,
                claimant,
                amount: packet.amount,
            });

            Ok(())
        }

        #[ink(message)]
        pub fn get_packet_info(&self, id: PacketId) -> Result<PacketInfo, Error> {
            let packet = self.packets.get(id).ok_or(Error::InvalidArgs)?;
            Ok(PacketInfo {
                id,
                creator: packet.creator,
                token: packet.token,
                amount: packet.amount,
                claimed: packet.claimed,
            })
        }

        /// Number of packets ever created, which is also the latest id.
        #[ink(message)]
        pub fn packet_count(&self) -> PacketId {
            self.next_packet_id - FIRST_PACKET_ID
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        // =================================================================
        // ADMIN FUNCTIONS
        // =================================================================

        /// Sends `amount` of `token` held by this contract to the owner.
        ///
        /// Bypasses packet accounting: unclaimed packets may end up
        /// under-funded until the tokens are returned.
        #[ink(message)]
        pub fn emergency_withdraw(&mut self, token: AccountId, amount: Balance) -> Result<(), Error> {
            self.ensure_owner()?;

            let to = self.owner;
            ledger::transfer(token, to, amount)
                .map_err(|err| Self::transfer_failed(token, err))?;

            self.env().emit_event(EmergencyWithdrawal { token, to, amount });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            if new_owner == AccountId::from(ZERO_ACCOUNT) {
                return Err(Error::InvalidArgs);
            }

            let previous_owner = self.owner;
            self.owner = new_owner;

            self.env().emit_event(OwnershipTransferred {
                previous_owner,
                new_owner,
            });
            Ok(())
        }

        fn ensure_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(())
        }

        fn transfer_failed(token: AccountId, err: LedgerError) -> Error {
            ink::env::debug_println!("red_packet: token {:?} transfer failed: {:?}", token, err);
            Error::TransferFailed
        }
    }

    impl Default for RedPacket {
        fn default() -> Self {
            Self::new()
        }
    }

    fn commit(password: &str) -> Commitment {
        let mut output = <Keccak256 as HashOutput>::Type::default();
        ink::env::hash_bytes::<Keccak256>(password.as_bytes(), &mut output);
        output
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}
