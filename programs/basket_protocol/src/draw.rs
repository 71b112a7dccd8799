use anchor_lang::prelude::*;

use crate::{
    accounting::select_winner_index,
    constants::REQUEST_TIMEOUT_SLOTS,
    errors::BasketError,
    state::{Broker, RandomnessRequest, RequestStatus},
    utils::request_correlation,
};

// -------------------------
// Shared lottery state machine
// Pending -> Fulfilled -> Settled, or Pending -> TimedOut
// -------------------------

/// Snapshots the current draw window into a fresh request.
pub fn open_request(
    broker: &mut Broker,
    broker_key: &Pubkey,
    request: &mut RandomnessRequest,
    requester: Pubkey,
    bump: u8,
    current_slot: u64,
) -> Result<()> {
    require!(!broker.pending_request, BasketError::RequestPending);
    require!(broker.entry_count > broker.draw_start, BasketError::NoEntries);

    let request_id = broker.request_count;
    let draw_start = broker.draw_start;
    let draw_end = broker.entry_count;

    request.broker = *broker_key;
    request.request_id = request_id;
    request.bump = bump;
    request.requester = requester;
    request.correlation =
        request_correlation(broker_key, request_id, draw_start, draw_end, current_slot);
    request.draw_start = draw_start;
    request.draw_end = draw_end;
    request.status = RequestStatus::Pending;
    request.value = [0u8; 32];
    request.winner_index = 0;
    request.winner = Pubkey::default();
    request.prize = 0;
    request.requested_slot = current_slot;
    request.fulfilled_slot = 0;
    request.settled_slot = 0;

    broker.request_count = broker
        .request_count
        .checked_add(1)
        .ok_or(BasketError::MathOverflow)?;
    broker.pending_request = true;

    Ok(())
}

pub fn is_expired(request: &RandomnessRequest, current_slot: u64) -> bool {
    current_slot > request.requested_slot.saturating_add(REQUEST_TIMEOUT_SLOTS)
}

/// Applies an oracle value: picks the winner, consumes the snapshot and
/// reserves the current pot as this draw's prize.
pub fn resolve_request(
    broker: &mut Broker,
    request: &mut RandomnessRequest,
    value: [u8; 32],
    current_slot: u64,
) -> Result<u64> {
    require!(
        request.status == RequestStatus::Pending,
        BasketError::RequestNotPending
    );
    require!(!is_expired(request, current_slot), BasketError::RequestTimeout);

    let winner_index = select_winner_index(&value, request.draw_start, request.draw_end)?;

    let prize = broker.pot;
    broker.reserved_pot = broker
        .reserved_pot
        .checked_add(prize)
        .ok_or(BasketError::MathOverflow)?;
    broker.pot = 0;

    request.value = value;
    request.winner_index = winner_index;
    request.prize = prize;
    request.status = RequestStatus::Fulfilled;
    request.fulfilled_slot = current_slot;

    // entries up to draw_end are consumed by this draw
    broker.draw_start = request.draw_end;
    broker.pending_request = false;

    Ok(winner_index)
}

/// Gives up on a request nobody fulfilled in time. The draw window stays open.
pub fn expire_request(
    broker: &mut Broker,
    request: &mut RandomnessRequest,
    current_slot: u64,
) -> Result<()> {
    require!(
        request.status == RequestStatus::Pending,
        BasketError::RequestNotPending
    );
    require!(is_expired(request, current_slot), BasketError::RequestNotExpired);

    request.status = RequestStatus::TimedOut;
    broker.pending_request = false;

    Ok(())
}

/// Releases the prize reserved at fulfillment to the winner. Returns the prize.
pub fn settle_request(
    broker: &mut Broker,
    request: &mut RandomnessRequest,
    winner: Pubkey,
    current_slot: u64,
) -> Result<u64> {
    require!(
        request.status == RequestStatus::Fulfilled,
        BasketError::RandomnessNotFulfilled
    );

    let prize = request.prize;
    broker.reserved_pot = broker
        .reserved_pot
        .checked_sub(prize)
        .ok_or(BasketError::MathOverflow)?;

    request.winner = winner;
    request.status = RequestStatus::Settled;
    request.settled_slot = current_slot;

    Ok(prize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn code(err: Error) -> u32 {
        match err {
            Error::AnchorError(e) => e.error_code_number,
            Error::ProgramError(e) => panic!("unexpected program error: {:?}", e),
        }
    }

    fn broker_with_entries(entry_count: u64) -> Broker {
        Broker {
            basket: Pubkey::new_unique(),
            basket_mint: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            bump: 255,
            oracle_pubkey: Pubkey::new_unique(),
            redemption_fee_bps: 500,
            pot: 0,
            reserved_pot: 0,
            pot_vault: Pubkey::new_unique(),
            pot_vault_bump: 254,
            entry_count,
            total_minted: entry_count * 10,
            total_redeemed: 0,
            draw_start: 0,
            request_count: 0,
            pending_request: false,
            version: 1,
        }
    }

    fn blank_request() -> RandomnessRequest {
        RandomnessRequest {
            broker: Pubkey::default(),
            request_id: 0,
            bump: 0,
            requester: Pubkey::default(),
            correlation: [0u8; 32],
            draw_start: 0,
            draw_end: 0,
            status: RequestStatus::TimedOut,
            value: [0u8; 32],
            winner_index: 0,
            winner: Pubkey::default(),
            prize: 0,
            requested_slot: 0,
            fulfilled_slot: 0,
            settled_slot: 0,
        }
    }

    fn opened(broker: &mut Broker, slot: u64) -> RandomnessRequest {
        let key = Pubkey::new_unique();
        let mut request = blank_request();
        open_request(broker, &key, &mut request, Pubkey::new_unique(), 200, slot).unwrap();
        request
    }

    #[test]
    fn no_entries_means_no_request() {
        let mut broker = broker_with_entries(0);
        let mut request = blank_request();

        let err = open_request(&mut broker, &Pubkey::new_unique(), &mut request, Pubkey::new_unique(), 1, 10)
            .unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::NoEntries));
        assert!(!broker.pending_request);
        assert_eq!(broker.request_count, 0);
    }

    #[test]
    fn open_request_snapshots_the_window() {
        let mut broker = broker_with_entries(5);
        let request = opened(&mut broker, 100);

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!((request.draw_start, request.draw_end), (0, 5));
        assert_eq!(request.request_id, 0);
        assert_eq!(request.requested_slot, 100);
        assert!(broker.pending_request);
        assert_eq!(broker.request_count, 1);
    }

    #[test]
    fn only_one_pending_request_per_broker() {
        let mut broker = broker_with_entries(3);
        let _first = opened(&mut broker, 100);

        let mut second = blank_request();
        let err = open_request(&mut broker, &Pubkey::new_unique(), &mut second, Pubkey::new_unique(), 1, 101)
            .unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RequestPending));
    }

    #[test]
    fn fulfillment_picks_winner_and_consumes_snapshot() {
        let mut broker = broker_with_entries(4);
        let mut request = opened(&mut broker, 100);

        // entries minted while the request was pending belong to the next draw
        broker.entry_count = 6;

        let mut value = [0u8; 32];
        value[0] = 7;
        let idx = resolve_request(&mut broker, &mut request, value, 150).unwrap();

        assert_eq!(idx, 3);
        assert_eq!(request.status, RequestStatus::Fulfilled);
        assert_eq!(request.winner_index, 3);
        assert_eq!(request.fulfilled_slot, 150);
        assert_eq!(broker.draw_start, 4);
        assert!(!broker.pending_request);

        // the next draw only sees entries 4 and 5
        let next = opened(&mut broker, 200);
        assert_eq!((next.draw_start, next.draw_end), (4, 6));
    }

    #[test]
    fn late_fulfillment_times_out() {
        let mut broker = broker_with_entries(2);
        let mut request = opened(&mut broker, 100);

        let late = 100 + REQUEST_TIMEOUT_SLOTS + 1;
        let err = resolve_request(&mut broker, &mut request, [1u8; 32], late).unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RequestTimeout));
        assert_eq!(request.status, RequestStatus::Pending);

        // at the boundary it is still accepted
        let mut broker = broker_with_entries(2);
        let mut request = opened(&mut broker, 100);
        assert!(resolve_request(&mut broker, &mut request, [1u8; 32], 100 + REQUEST_TIMEOUT_SLOTS).is_ok());
    }

    #[test]
    fn double_fulfillment_is_rejected() {
        let mut broker = broker_with_entries(2);
        let mut request = opened(&mut broker, 100);

        resolve_request(&mut broker, &mut request, [1u8; 32], 101).unwrap();
        let err = resolve_request(&mut broker, &mut request, [2u8; 32], 102).unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RequestNotPending));
        assert_eq!(request.value, [1u8; 32]);
    }

    #[test]
    fn expiry_frees_the_broker_without_consuming_entries() {
        let mut broker = broker_with_entries(3);
        let mut request = opened(&mut broker, 100);

        let err = expire_request(&mut broker, &mut request, 100 + REQUEST_TIMEOUT_SLOTS).unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RequestNotExpired));

        expire_request(&mut broker, &mut request, 100 + REQUEST_TIMEOUT_SLOTS + 1).unwrap();
        assert_eq!(request.status, RequestStatus::TimedOut);
        assert!(!broker.pending_request);
        assert_eq!(broker.draw_start, 0);

        // reissue covers the same entries under a new id
        let again = opened(&mut broker, 5_000);
        assert_eq!(again.request_id, 1);
        assert_eq!((again.draw_start, again.draw_end), (0, 3));
    }

    #[test]
    fn settlement_pays_the_reserved_prize_once() {
        let mut broker = broker_with_entries(2);
        broker.pot = 500_000_000;
        let mut request = opened(&mut broker, 100);

        let winner = Pubkey::new_unique();
        let err = settle_request(&mut broker, &mut request, winner, 101).unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RandomnessNotFulfilled));

        resolve_request(&mut broker, &mut request, [9u8; 32], 101).unwrap();
        assert_eq!(request.prize, 500_000_000);
        assert_eq!((broker.pot, broker.reserved_pot), (0, 500_000_000));

        let prize = settle_request(&mut broker, &mut request, winner, 102).unwrap();
        assert_eq!(prize, 500_000_000);
        assert_eq!((broker.pot, broker.reserved_pot), (0, 0));
        assert_eq!(request.status, RequestStatus::Settled);
        assert_eq!(request.winner, winner);

        let err = settle_request(&mut broker, &mut request, winner, 103).unwrap_err();
        assert_eq!(code(err), u32::from(BasketError::RandomnessNotFulfilled));
    }

    #[test]
    fn prizes_do_not_depend_on_claim_order() {
        let mut broker = broker_with_entries(2);
        broker.pot = 100;
        let mut first = opened(&mut broker, 100);
        resolve_request(&mut broker, &mut first, [1u8; 32], 101).unwrap();

        // fees collected after the first draw belong to the next one
        broker.pot += 900;
        broker.entry_count = 4;
        let mut second = opened(&mut broker, 200);
        resolve_request(&mut broker, &mut second, [2u8; 32], 201).unwrap();
        assert_eq!(broker.reserved_pot, 1_000);

        // claimed out of order
        let second_prize = settle_request(&mut broker, &mut second, Pubkey::new_unique(), 300).unwrap();
        let first_prize = settle_request(&mut broker, &mut first, Pubkey::new_unique(), 301).unwrap();

        assert_eq!(first_prize, 100);
        assert_eq!(second_prize, 900);
        assert_eq!((broker.pot, broker.reserved_pot), (0, 0));
    }

    #[test]
    fn fees_after_fulfillment_stay_for_the_next_draw() {
        let mut broker = broker_with_entries(1);
        broker.pot = 50;
        let mut request = opened(&mut broker, 10);
        resolve_request(&mut broker, &mut request, [3u8; 32], 11).unwrap();

        broker.pot += 7;
        let prize = settle_request(&mut broker, &mut request, Pubkey::new_unique(), 12).unwrap();

        assert_eq!(prize, 50);
        assert_eq!(broker.pot, 7);
        assert_eq!(broker.reserved_pot, 0);
    }
}
