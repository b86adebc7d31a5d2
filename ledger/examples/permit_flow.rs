//! End-to-end walkthrough: deploy a ledger, open it up, sell a stay to a
//! guest with a signed permit, and watch the fee meter run.
//!
//! Run with `RUST_LOG=debug cargo run --example permit_flow` to see the
//! engine's tracing output.

use std::error::Error;
use std::sync::{Arc, Mutex};

use stay_crypto::generate_keypair;
use stay_ledger::{sign_permit, LedgerOptions, NightLedger};
use stay_registry::{FeeToken, MemoryFeeToken, MemoryRegistry, Registry, SharedFeeToken};
use stay_types::{AccountAddress, Timestamp, TokenId};

fn main() -> Result<(), Box<dyn Error>> {
    stay_utils::init_tracing();

    let host_keys = generate_keypair();
    let host = AccountAddress::from_public_key(&host_keys.public);
    let operator = AccountAddress::from_public_key(&generate_keypair().public);
    let treasury = AccountAddress::from_public_key(&generate_keypair().public);
    let ledger_account = AccountAddress::from_public_key(&generate_keypair().public);
    let guest = AccountAddress::from_public_key(&generate_keypair().public);
    let courier = AccountAddress::from_public_key(&generate_keypair().public);

    let fee_token = Arc::new(Mutex::new(MemoryFeeToken::new()));
    {
        let mut token = fee_token.lock().unwrap();
        // The ledger account pays for host-initiated transfers; the host's
        // own wallet covers courier-submitted ones via allowance.
        token.mint(&ledger_account, 10_000);
        token.mint(&host, 1_000);
        token.approve(&host, &ledger_account, 1_000);
    }
    let shared: SharedFeeToken = fee_token.clone();
    let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new(
        operator,
        treasury.clone(),
        shared,
        200,
    ));

    let mut ledger = NightLedger::new(
        host.clone(),
        ledger_account.clone(),
        registry,
        "Nites at the Lighthouse",
        "NITE",
        "https://nites.example/meta/",
        LedgerOptions {
            track_bookings: true,
        },
    )?;
    ledger.unpause(&host)?;

    // The host sells three consecutive nights directly.
    let (check_in, check_out) = (TokenId::new(20_260_901), TokenId::new(20_260_903));
    ledger.safe_bulk_transfer_from(&host, &host, &guest, check_in, check_out, b"booking-0001")?;
    println!("guest now holds {} nights", ledger.balance_of(&guest)?);
    println!(
        "treasury collected {} fee units",
        fee_token.lock().unwrap().balance_of(&treasury)
    );

    // Off-band, the host signs a permit letting a courier move one more
    // night; the courier submits it and the transfer in a single call.
    let night = TokenId::new(20_260_904);
    let deadline = Timestamp::now().plus(3_600);
    let sig = sign_permit(
        ledger.permit_domain(),
        &host_keys,
        &courier,
        night,
        ledger.sig_nonces(&host),
        deadline,
    );
    ledger.transfer_with_permit(&courier, &guest, night, deadline, &sig, Timestamp::now())?;
    println!("night {} owner: {}", night, ledger.owner_of(night));
    println!("{} events emitted", ledger.events().len());

    Ok(())
}
