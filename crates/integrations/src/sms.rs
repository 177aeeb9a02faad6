//! SMS transport for OTP delivery. Real carrier integration is out of
//! scope; the dev transport logs the code so local/staging flows work
//! without a contracted provider.

use async_trait::async_trait;

#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send_otp(&self, phone: &str, code: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct DevSmsTransport;

#[async_trait]
impl SmsTransport for DevSmsTransport {
    async fn send_otp(&self, phone: &str, code: &str) -> anyhow::Result<()> {
        tracing::info!(phone, code, "dev SMS transport: would send OTP");
        Ok(())
    }
}
