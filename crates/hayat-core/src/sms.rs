use async_trait::async_trait;

/// Outbound SMS transport. Fire-and-forget from the core's point of
/// view: a send attempt counts as a notification whether or not the
/// carrier eventually delivers it.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, to: &str, body: &str);
}

#[async_trait]
impl<T: SmsGateway + ?Sized> SmsGateway for std::sync::Arc<T> {
    async fn send(&self, to: &str, body: &str) {
        (**self).send(to, body).await;
    }
}

/// Discards messages; used in tests and when no gateway is configured.
#[derive(Default)]
pub struct NullGateway;

#[async_trait]
impl SmsGateway for NullGateway {
    async fn send(&self, _to: &str, _body: &str) {}
}
