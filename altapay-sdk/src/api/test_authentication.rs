use std::sync::{Arc, LazyLock};

use tracing::warn;

use super::{ApiCore, Operation, SchemaCell, cached_schema, store_schema};
use crate::{
    auth::AuthProvider,
    error::Result,
    options::OptionSchema,
    request::{HttpMethod, OperationMeta},
    response::TestAuthenticationResponse,
    transport::Transport,
};

static SCHEMA: SchemaCell = LazyLock::new(|| store_schema(OptionSchema::builder().build()));

/// Checks that the credentials are accepted (`testAuthentication`).
#[derive(Debug)]
pub struct TestAuthentication<T> {
    core: ApiCore<T>,
}

impl<T: Transport> TestAuthentication<T> {
    /// Creates the operation.
    pub fn new(auth: impl AuthProvider + 'static, transport: Arc<T>) -> Self {
        Self { core: ApiCore::new(auth, transport) }
    }

    /// Runs the check and returns the typed response.
    ///
    /// # Errors
    ///
    /// Returns the classified transport, response or business error.
    pub async fn execute(&mut self) -> Result<TestAuthenticationResponse> {
        self.core.execute::<Self>().await
    }

    /// Returns true if the gateway accepted the credentials.
    ///
    /// Failures are logged and reported as `false`.
    pub async fn call(&mut self) -> bool {
        match self.execute().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "authentication test failed");
                false
            }
        }
    }
}

impl<T: Transport> Operation for TestAuthentication<T> {
    type Transport = T;
    type Response = TestAuthenticationResponse;

    const META: OperationMeta = OperationMeta {
        name: "TestAuthentication",
        method: HttpMethod::Get,
        endpoint: "testAuthentication",
    };

    fn schema() -> Result<&'static OptionSchema> {
        cached_schema(&SCHEMA)
    }

    fn core(&self) -> &ApiCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ApiCore<T> {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Authentication, transport::MockTransport};

    #[tokio::test]
    async fn test_call_reports_outcome_as_bool() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_xml(
                200,
                "<APIResponse><Header><ErrorCode>0</ErrorCode></Header>\
                 <Body><Result>OK</Result></Body></APIResponse>",
            )
            .push_xml(401, "");
        let mut op = TestAuthentication::new(Authentication::new("u", "p"), Arc::clone(&transport));

        assert!(op.call().await);
        assert!(!op.call().await);
        assert!(!op.call().await);
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn test_schema_is_empty() {
        let schema = TestAuthentication::<MockTransport>::schema().unwrap();
        assert_eq!(schema.keys().count(), 0);
    }
}
