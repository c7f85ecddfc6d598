use mockito::{Mock, Server, ServerGuard};
use sea_orm::{
    sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection,
};
use trackwire::provider::PaymentProviderClient;

use crate::{constant::TEST_PROVIDER_TOKEN, error::TestError};

pub struct TestAppState {
    pub db: DatabaseConnection,
    pub provider: PaymentProviderClient,
}

pub struct TestSetup {
    pub server: ServerGuard,
    pub state: TestAppState,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;

        let provider = PaymentProviderClient::new(&mock_server.url(), TEST_PROVIDER_TOKEN)?;

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestSetup {
            server: mock_server,
            state: TestAppState { db, provider },
            mocks: Vec::new(),
        })
    }

    /// Convert TestAppState into any type that can be constructed from its
    /// fields, typically the server's AppState.
    pub fn state<T>(&self) -> T
    where
        T: From<(DatabaseConnection, PaymentProviderClient)>,
    {
        T::from((self.state.db.clone(), self.state.provider.clone()))
    }

    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.state.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Creates the composite unique indexes the migrations add in
    /// production; `create_table_from_entity` only covers single-column
    /// constraints.
    pub async fn with_tracking_indexes(&self) -> Result<(), TestError> {
        self.state
            .db
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \
                 \"idx-campaign_partner-campaign_id-partner_id\" \
                 ON \"campaign_partner\" (\"campaign_id\", \"partner_id\")",
            )
            .await?;

        Ok(())
    }

    /// Registers a mock disbursement endpoint returning the given provider
    /// transaction id, expected to be hit `hits` times.
    pub fn with_disbursement_endpoint(&mut self, provider_txn_id: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", "/v1/disbursements")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                "{{\"id\": \"{provider_txn_id}\", \"status\": \"submitted\"}}"
            ))
            .expect(hits)
            .create()
    }

    /// Registers a mock disbursement endpoint that rejects every call.
    pub fn with_failing_disbursement_endpoint(&mut self, status: usize) -> Mock {
        self.server
            .mock("POST", "/v1/disbursements")
            .with_status(status)
            .with_body("{\"error\": \"insufficient balance\"}")
            .create()
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        TestSetup::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

#[macro_export]
macro_rules! test_setup_with_tracking_tables {
    // Pattern 1: No extra entities
    () => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::Vendor),
                schema.create_table_from_entity(entity::prelude::Partner),
                schema.create_table_from_entity(entity::prelude::Campaign),
                schema.create_table_from_entity(entity::prelude::CampaignPartner),
                schema.create_table_from_entity(entity::prelude::EventType),
                schema.create_table_from_entity(entity::prelude::PartnerLink),
                schema.create_table_from_entity(entity::prelude::VisitorCookie),
                schema.create_table_from_entity(entity::prelude::Click),
            ];
            setup.with_tables(stmts).await?;
            setup.with_tracking_indexes().await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};

    // Pattern 2: Extra entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::Vendor),
                schema.create_table_from_entity(entity::prelude::Partner),
                schema.create_table_from_entity(entity::prelude::Campaign),
                schema.create_table_from_entity(entity::prelude::CampaignPartner),
                schema.create_table_from_entity(entity::prelude::EventType),
                schema.create_table_from_entity(entity::prelude::PartnerLink),
                schema.create_table_from_entity(entity::prelude::VisitorCookie),
                schema.create_table_from_entity(entity::prelude::Click),
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;
            setup.with_tracking_indexes().await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}
