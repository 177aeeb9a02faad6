pub mod payment_gateway;
pub mod session_token;
pub mod sms;

pub use payment_gateway::{PaymentGateway, PaymentNotification};
pub use session_token::SessionTokenIssuer;
pub use sms::SmsTransport;
