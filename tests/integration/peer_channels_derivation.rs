//! Property 10: peer-channel account derivation is stable for a fixed
//! public key, exercised across repeated calls and two distinct keys.

use channels_core::bodies::peer_channels::derive_account;

use crate::common::fixtures::keypair;

#[test]
fn derivation_is_stable_across_calls_and_distinguishes_keys() {
    let (_secret_a, public_a) = keypair();
    let (_secret_b, public_b) = keypair();

    let bytes_a = public_a.serialize();
    let bytes_b = public_b.serialize();

    let first = derive_account(&bytes_a);
    let second = derive_account(&bytes_a);
    assert_eq!(first, second);
    assert_eq!(first.token, bytes_a[..16]);

    let other = derive_account(&bytes_b);
    assert_ne!(first.account_id, other.account_id);
}
