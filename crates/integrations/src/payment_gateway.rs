//! PAYable-style payment gateway adapter.
//!
//! The outbound checkout request carries a two-step SHA-512 check-value:
//! `hash1 = SHA512(merchant_token)` uppercase hex, then
//! `hash2 = SHA512("merchant_key|invoice_id|amount|currency|hash1")`
//! uppercase hex. `hash2` is the authentication field on the wire;
//! `merchant_token` itself is never sent. The actual PAYable HTTP envelope
//! is out of scope here — `initiate_checkout` synthesizes the gateway's
//! acknowledgement locally, the same way the dev SMS transport logs a code
//! instead of calling a real provider. Inbound webhook verification is
//! deliberately lighter than the outbound signing: it only checks the
//! notification is well-formed (non-empty `uid`/`invoice_id`) — the
//! authoritative check is the orchestrator's cross-check of `uid` against
//! the `payment_uid` recorded at InitiatePayment time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use uuid::Uuid;

use transit_types::enums::PaymentEnvironment;

#[derive(Debug, Clone)]
pub struct PaymentGateway {
    pub merchant_id: String,
    pub merchant_key: String,
    pub merchant_token: String,
    pub environment: PaymentEnvironment,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub merchant_id: String,
    pub invoice_id: String,
    pub amount: String,
    pub currency: String,
    pub check_value: String,
    pub redirect_url: String,
}

/// The gateway's checkout acknowledgement — `uid` is what a later webhook
/// notification must echo back for the orchestrator's cross-check.
#[derive(Debug, Clone)]
pub struct CheckoutResponse {
    pub uid: String,
    pub status_indicator: String,
    pub payment_page: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub status: String,
    pub uid: String,
    pub invoice_id: String,
    pub amount: String,
    pub currency_code: String,
    pub payment_status: String,
    pub transaction_id: String,
    pub status_indicator: String,
}

fn sha512_hex_upper(input: &str) -> String {
    let digest = Sha512::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02X}", b)).collect()
}

impl PaymentGateway {
    pub fn redirect_base_url(&self) -> &'static str {
        match self.environment {
            PaymentEnvironment::Production => "https://payable.example.com/pay",
            _ => "https://sandbox.payable.example.com/pay",
        }
    }

    fn hash1(&self) -> String {
        sha512_hex_upper(&self.merchant_token)
    }

    fn check_value(&self, invoice_id: &str, amount: Decimal, currency: &str) -> String {
        let hash1 = self.hash1();
        let input = format!(
            "{}|{}|{}|{}|{}",
            self.merchant_key, invoice_id, amount, currency, hash1
        );
        sha512_hex_upper(&input)
    }

    pub fn build_checkout_request(
        &self,
        invoice_id: &str,
        amount: Decimal,
        currency: &str,
        redirect_url: &str,
    ) -> CheckoutRequest {
        CheckoutRequest {
            merchant_id: self.merchant_id.clone(),
            invoice_id: invoice_id.to_string(),
            amount: amount.to_string(),
            currency: currency.to_string(),
            check_value: self.check_value(invoice_id, amount, currency),
            redirect_url: redirect_url.to_string(),
        }
    }

    /// "Sends" a signed checkout request and returns the gateway's ack. No
    /// outbound HTTP call is made — a real PAYable envelope is out of
    /// scope, so the uid/status are generated locally in the gateway's own
    /// shape, the way `DevSmsTransport` stands in for a real SMS provider.
    pub fn initiate_checkout(&self, request: &CheckoutRequest) -> CheckoutResponse {
        CheckoutResponse {
            uid: format!("UID-{}", Uuid::new_v4()),
            status_indicator: "PENDING".to_string(),
            payment_page: format!(
                "{}?invoice_id={}",
                self.redirect_base_url(),
                request.invoice_id
            ),
        }
    }

    /// Requires a well-formed notification (non-empty `uid`/`invoice_id`).
    /// Does NOT check a signature — webhook trust is established by the
    /// orchestrator's separate cross-check against the stored `payment_uid`.
    pub fn verify_notification(&self, notification: &PaymentNotification) -> bool {
        !notification.uid.trim().is_empty() && !notification.invoice_id.trim().is_empty()
    }

    pub fn notification_succeeded(notification: &PaymentNotification) -> bool {
        notification.payment_status.eq_ignore_ascii_case("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PaymentGateway {
        PaymentGateway {
            merchant_id: "M001".into(),
            merchant_key: "secret-key".into(),
            merchant_token: "secret-token".into(),
            environment: PaymentEnvironment::Sandbox,
        }
    }

    fn notification(uid: &str, invoice_id: &str, payment_status: &str) -> PaymentNotification {
        PaymentNotification {
            status: "2".into(),
            uid: uid.into(),
            invoice_id: invoice_id.into(),
            amount: "1500.00".into(),
            currency_code: "LKR".into(),
            payment_status: payment_status.into(),
            transaction_id: "TXN-1".into(),
            status_indicator: "2".into(),
        }
    }

    #[test]
    fn checkout_request_check_value_is_deterministic() {
        let gw = gateway();
        let a = gw.build_checkout_request("INV-1", Decimal::new(150000, 2), "LKR", "https://x");
        let b = gw.build_checkout_request("INV-1", Decimal::new(150000, 2), "LKR", "https://x");
        assert_eq!(a.check_value, b.check_value);
    }

    #[test]
    fn initiate_checkout_returns_a_fresh_uid_per_call() {
        let gw = gateway();
        let request = gw.build_checkout_request("INV-1", Decimal::new(150000, 2), "LKR", "https://x");
        let a = gw.initiate_checkout(&request);
        let b = gw.initiate_checkout(&request);
        assert_ne!(a.uid, b.uid);
        assert_eq!(a.status_indicator, "PENDING");
    }

    #[test]
    fn verify_notification_accepts_well_formed_payload() {
        let gw = gateway();
        assert!(gw.verify_notification(&notification("UID-1", "INV-1", "SUCCESS")));
    }

    #[test]
    fn verify_notification_rejects_missing_uid() {
        let gw = gateway();
        assert!(!gw.verify_notification(&notification("", "INV-1", "SUCCESS")));
    }

    #[test]
    fn notification_succeeded_is_case_insensitive() {
        assert!(PaymentGateway::notification_succeeded(&notification(
            "UID-1", "INV-1", "success"
        )));
        assert!(!PaymentGateway::notification_succeeded(&notification(
            "UID-1", "INV-1", "FAILED"
        )));
    }
}
