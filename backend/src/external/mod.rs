//! External API integrations

pub mod payment_gateway;

pub use payment_gateway::PaymentGatewayClient;
