//! Web push subscription key generation.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use push_core::SubscriptionKeys;
use rand::RngCore as _;

/// Generate a fresh P-256 public key and auth secret for a subscription.
pub fn generate_subscription_keys() -> SubscriptionKeys {
    let secret = p256::SecretKey::random(&mut rand::rngs::OsRng);
    let public = secret.public_key().to_encoded_point(false);

    let mut auth = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut auth);

    SubscriptionKeys {
        p256dh: URL_SAFE_NO_PAD.encode(public.as_bytes()),
        auth: URL_SAFE_NO_PAD.encode(auth),
    }
}
