//! Optional booking tracking.
//!
//! When enabled, a host-outbound transfer records the contiguous id range it
//! covered plus an opaque payload as one booking. Transferring the whole
//! range back to the zero address (returning the nights to the host) deletes
//! the booking again; partial or straddling ranges are rejected before any
//! state moves.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use stay_types::TokenId;
use std::collections::HashMap;

/// A contiguous stay: lowest and highest night id transferred together,
/// plus whatever the integrator attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub check_in: TokenId,
    pub check_out: TokenId,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct BookingStore {
    next_id: u64,
    bookings: HashMap<u64, Booking>,
    booking_ids: HashMap<TokenId, u64>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            bookings: HashMap::new(),
            booking_ids: HashMap::new(),
        }
    }
}

impl BookingStore {
    pub fn booking(&self, id: u64) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    pub fn booking_id_of(&self, token_id: TokenId) -> Option<u64> {
        self.booking_ids.get(&token_id).copied()
    }

    /// Record a booking covering `[check_in, check_out]`. Returns its id.
    pub fn record(&mut self, check_in: TokenId, check_out: TokenId, data: &[u8]) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.bookings.insert(
            id,
            Booking {
                check_in,
                check_out,
                data: data.to_vec(),
            },
        );
        for raw in check_in.value()..=check_out.value() {
            self.booking_ids.insert(TokenId::new(raw), id);
        }
        id
    }

    /// Check that `[from_id, to_id]` covers exactly one booking, end to end.
    /// Returns the booking id to pass to [`BookingStore::delete`].
    pub fn validate_release(&self, from_id: TokenId, to_id: TokenId) -> Result<u64, LedgerError> {
        let first = self.booking_ids.get(&from_id);
        let last = self.booking_ids.get(&to_id);
        let id = match (first, last) {
            (Some(a), Some(b)) if a == b => *a,
            _ => return Err(LedgerError::MismatchedBookingIds),
        };
        // Unwrap is safe: booking_ids only ever points at live records.
        let booking = &self.bookings[&id];
        if booking.check_in != from_id || booking.check_out != to_id {
            return Err(LedgerError::InvalidCheckoutTokenId);
        }
        Ok(id)
    }

    /// Delete a booking and all of its per-token links.
    pub fn delete(&mut self, id: u64) {
        if let Some(booking) = self.bookings.remove(&id) {
            for raw in booking.check_in.value()..=booking.check_out.value() {
                self.booking_ids.remove(&TokenId::new(raw));
            }
        }
    }
}
